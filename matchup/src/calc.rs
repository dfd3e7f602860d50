use anyhow::{
    Error,
    Result,
};
use matchup_data::{
    Nature,
    StatTable,
};

use crate::{
    common::Range,
    team::Combatant,
};

/// Battlefield conditions shared by every matchup in a calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Battle format name.
    pub format: String,
    /// Active weather, if any.
    pub weather: Option<String>,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            format: "Doubles".to_owned(),
            weather: None,
        }
    }
}

/// A fully-specified battle participant, ready to hand to a damage calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mon {
    pub name: String,
    pub level: u64,
    pub item: Option<String>,
    pub ability: Option<String>,
    pub nature: Nature,
    pub evs: StatTable,
    pub ivs: StatTable,
    /// Set only when the Mon is actively Terastallized for the calculation.
    pub tera_type: Option<String>,
}

impl Mon {
    /// Builds a Mon from a roster combatant.
    ///
    /// Fails if the combatant's spread has not been resolved. The Tera type carries over only
    /// when `tera_active` is set, so the same combatant can be calculated in both states.
    pub fn from_combatant(combatant: &Combatant, tera_active: bool) -> Result<Self> {
        let spread = combatant
            .spread
            .resolved()
            .ok_or_else(|| Error::msg(format!("spread for {} is not resolved", combatant.name)))?;
        Ok(Self {
            name: combatant.name.clone(),
            level: combatant.level as u64,
            item: combatant.item.clone(),
            ability: combatant.ability.clone(),
            nature: spread.nature,
            evs: spread.evs.clone(),
            ivs: combatant.ivs.clone(),
            tera_type: tera_active
                .then(|| combatant.tera_type.clone())
                .flatten(),
        })
    }
}

/// The result of one simulated move use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DamageSummary {
    /// Total damage across the move's rolls.
    pub damage: Range,
    /// Human-readable lines describing how the damage came about.
    pub description: Vec<String>,
}

impl DamageSummary {
    pub fn describe(&self) -> String {
        self.description.join("\n")
    }
}

/// Damage calculation oracle.
///
/// The matchup engine is generic over this trait, so calculations can run against any backend
/// that can build its own combatant representation and simulate one move at a time.
pub trait DamageCalc: Send + Sync {
    /// Backend representation of a combatant.
    type Combatant;

    /// Constructs the backend representation of a Mon.
    ///
    /// Fails when the backend does not recognize the Mon, such as an unknown species.
    fn construct(&self, mon: &Mon) -> Result<Self::Combatant>;

    /// The combatant's maximum HP.
    fn max_hp(&self, combatant: &Self::Combatant) -> u64;

    /// Whether the move deals no direct damage.
    ///
    /// Unknown moves are reported as damaging, so they surface as calculation failures rather
    /// than being silently skipped.
    fn is_status_move(&self, mov: &str) -> bool;

    /// Simulates the attacker using a move against the defender.
    fn damage(
        &self,
        attacker: &Self::Combatant,
        defender: &Self::Combatant,
        mov: &str,
        field: &Field,
    ) -> Result<DamageSummary>;
}
