use std::fmt;

use anyhow::Result;
use hashbrown::HashMap;
use serde::Deserialize;
use unicase::UniCase;

use crate::{
    Nature,
    StatTable,
};

/// A stat spread for one species, as observed in usage statistics.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UsageSpread {
    /// Nature.
    pub nature: Nature,
    /// Effort values.
    #[serde(default)]
    pub evs: StatTable,
    /// Share of recorded teams using this spread, out of 100.
    pub usage: f64,
}

impl fmt::Display for UsageSpread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{}/{}/{}/{}/{} ({:.1}%)",
            self.nature,
            self.evs.hp,
            self.evs.atk,
            self.evs.def,
            self.evs.spa,
            self.evs.spd,
            self.evs.spe,
            self.usage,
        )
    }
}

/// Usage statistics: commonly used stat spreads, keyed by species name.
///
/// Species lookup is case-insensitive.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(from = "HashMap<String, Vec<UsageSpread>>")]
pub struct UsageData {
    spreads: HashMap<UniCase<String>, Vec<UsageSpread>>,
}

impl UsageData {
    /// Looks up the spreads recorded for a species.
    pub fn get(&self, species: &str) -> Option<&[UsageSpread]> {
        self.spreads
            .get(&UniCase::new(species.to_owned()))
            .map(|spreads| spreads.as_slice())
    }

    /// Inserts the spreads for a species, replacing any existing entry.
    pub fn insert<S>(&mut self, species: S, spreads: Vec<UsageSpread>)
    where
        S: Into<String>,
    {
        self.spreads.insert(UniCase::new(species.into()), spreads);
    }
}

impl From<HashMap<String, Vec<UsageSpread>>> for UsageData {
    fn from(value: HashMap<String, Vec<UsageSpread>>) -> Self {
        Self {
            spreads: value
                .into_iter()
                .map(|(species, spreads)| (UniCase::new(species), spreads))
                .collect(),
        }
    }
}

/// Collection of usage statistics for matchup analysis.
///
/// This trait can be implemented for different data sources, such as an external database or disk.
pub trait UsageStore: Send + Sync {
    /// Gets the commonly used stat spreads for a species by name.
    ///
    /// Lookup is case-insensitive. `Ok(None)` means the table has no entry for the species.
    fn get_spreads_by_name(&self, name: &str) -> Result<Option<Vec<UsageSpread>>>;
}
