use anyhow::{
    Error,
    Result,
};
use matchup_data::{
    Nature,
    PartialStatTable,
    StatTable,
    UsageSpread,
    UsageStore,
};

use crate::team::{
    Combatant,
    ResolvedSpread,
    SpreadState,
};

/// Selection of a stat spread for a combatant with an unconfirmed spread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadSelection {
    /// A preset spread, by index into the candidate list for the combatant's species.
    Preset(usize),
    /// A manually-entered spread.
    Manual {
        nature: Nature,
        evs: PartialStatTable,
    },
}

/// Looks up candidate spreads for a species, most common first.
///
/// Returns `None` when the store has no data for the species at all.
pub fn spread_candidates(
    store: &dyn UsageStore,
    species: &str,
) -> Result<Option<Vec<UsageSpread>>> {
    store.get_spreads_by_name(species)
}

/// Resolves a combatant's spread from the given selection.
///
/// A preset selection is validated against the candidate list for the combatant's species, so an
/// index from a stale candidate list fails rather than silently picking a different spread.
pub fn resolve_spread(
    store: &dyn UsageStore,
    combatant: &mut Combatant,
    selection: SpreadSelection,
) -> Result<()> {
    let resolved = match selection {
        SpreadSelection::Preset(index) => {
            let candidates = spread_candidates(store, &combatant.name)?.ok_or_else(|| {
                Error::msg(format!("no usage statistics for {}", combatant.name))
            })?;
            let candidate = candidates.get(index).ok_or_else(|| {
                Error::msg(format!(
                    "spread {index} is out of range for {}",
                    combatant.name
                ))
            })?;
            ResolvedSpread {
                nature: candidate.nature,
                evs: candidate.evs.clone(),
            }
        }
        SpreadSelection::Manual { nature, evs } => ResolvedSpread {
            nature,
            evs: StatTable::from(&evs),
        },
    };
    combatant.spread = SpreadState::Resolved(resolved);
    Ok(())
}
