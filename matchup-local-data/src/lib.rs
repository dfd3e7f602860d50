use std::{
    env,
    fs::File,
    path::Path,
};

use anyhow::{
    Context,
    Error,
    Result,
};
use matchup_data::{
    UsageData,
    UsageSpread,
    UsageStore,
};

/// An implementation of [`UsageStore`] that reads usage statistics locally from disk.
///
/// The backing file is a single JSON document mapping species names to recorded spreads.
#[derive(Debug)]
pub struct LocalUsageStore {
    data: UsageData,
}

impl LocalUsageStore {
    /// Creates a new instance of [`LocalUsageStore`] that reads from the given file.
    ///
    /// Fails if the path does not exist, does not point to a file, or cannot be parsed.
    pub fn new(path: String) -> Result<Self> {
        if !Path::new(&path).is_file() {
            return Err(Error::msg(format!(
                "Usage statistics file for LocalUsageStore ({path}) does not exist",
            )));
        }
        let data = serde_json::from_reader(
            File::open(&path).context("failed to read usage statistics")?,
        )
        .context("failed to parse usage statistics")?;
        Ok(Self { data })
    }

    /// Creates a new instance of [`LocalUsageStore`] that reads from the file at the given
    /// environment variable.
    pub fn new_from_env(env_var: &str) -> Result<Self> {
        Self::new(env::var(env_var).context(format!("{env_var} not defined"))?)
    }
}

impl UsageStore for LocalUsageStore {
    fn get_spreads_by_name(&self, name: &str) -> Result<Option<Vec<UsageSpread>>> {
        Ok(self.data.get(name).map(|spreads| spreads.to_vec()))
    }
}
