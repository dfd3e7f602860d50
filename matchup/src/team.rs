use matchup_data::{
    Nature,
    StatTable,
};

/// A stat spread confirmed for one combatant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpread {
    /// Nature.
    pub nature: Nature,
    /// Effort values.
    pub evs: StatTable,
}

/// The spread state of a combatant.
///
/// A combatant imported from a partial export starts unresolved. An unresolved combatant cannot
/// be materialized for damage calculation, so the spread must be resolved first, either from
/// usage statistics or manual entry.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum SpreadState {
    /// The true spread is unknown, and none has been chosen.
    #[default]
    Unresolved,
    /// The spread has been confirmed.
    Resolved(ResolvedSpread),
}

impl SpreadState {
    /// The resolved spread, if any.
    pub fn resolved(&self) -> Option<&ResolvedSpread> {
        match self {
            Self::Unresolved => None,
            Self::Resolved(spread) => Some(spread),
        }
    }

    /// Whether the spread has been resolved.
    pub fn is_resolved(&self) -> bool {
        self.resolved().is_some()
    }
}

/// One member of an imported roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combatant {
    /// Species name.
    ///
    /// Nicknames are resolved to the species at import.
    pub name: String,
    /// Held item.
    pub item: Option<String>,
    /// Ability.
    pub ability: Option<String>,
    /// Tera type, if the combatant declares one.
    pub tera_type: Option<String>,
    /// Level, typically between 1 and 100.
    pub level: u8,
    /// Individual values.
    pub ivs: StatTable,
    /// Stat spread.
    pub spread: SpreadState,
    /// Moves, in the order they were listed.
    pub moves: Vec<String>,
}
