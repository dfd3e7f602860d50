use anyhow::Result;
use matchup_data::{
    UsageData,
    UsageSpread,
    UsageStore,
};

/// An in-memory usage statistics store for tests.
#[derive(Default)]
pub struct TestUsageStore {
    data: UsageData,
}

impl TestUsageStore {
    /// Adds candidate spreads for a species.
    pub fn add_spreads(&mut self, species: &str, spreads: Vec<UsageSpread>) {
        self.data.insert(species, spreads);
    }
}

impl UsageStore for TestUsageStore {
    fn get_spreads_by_name(&self, name: &str) -> Result<Option<Vec<UsageSpread>>> {
        Ok(self.data.get(name).map(|spreads| spreads.to_vec()))
    }
}
