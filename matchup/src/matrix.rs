use ahash::HashSet;
use anyhow::Result;
use log::warn;

use crate::{
    calc::{
        DamageCalc,
        Field,
        Mon,
    },
    common::Range,
    severity::{
        Severity,
        classify,
    },
    team::Combatant,
};

/// Input to a matchup calculation.
///
/// Tera sets hold roster indices of combatants that should be calculated in their Terastallized
/// form. Indices outside the roster are ignored.
#[derive(Debug, Clone)]
pub struct MatchupInput<'i> {
    /// The attacking roster.
    pub attackers: &'i [Combatant],
    /// The defending roster.
    pub defenders: &'i [Combatant],
    /// Attacker indices that are Terastallized.
    pub attacker_tera: &'i HashSet<usize>,
    /// Defender indices that are Terastallized.
    pub defender_tera: &'i HashSet<usize>,
    /// Battlefield conditions.
    pub field: &'i Field,
}

/// Damage dealt by a single move in one matchup.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveDamage {
    pub mov: String,
    /// Total damage across the move's rolls.
    pub damage: Range,
    /// Lowest roll, as a percentage of the defender's maximum HP.
    pub min_percent: f64,
    /// Highest roll, as a percentage of the defender's maximum HP.
    pub max_percent: f64,
    /// The defender's maximum HP under the calculation.
    pub defender_hp: u64,
    /// Human-readable lines describing how the damage came about.
    pub description: Vec<String>,
}

impl MoveDamage {
    pub fn severity(&self) -> Severity {
        classify(self.min_percent, self.max_percent)
    }
}

/// The outcome of one move in one matchup.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// The move deals no direct damage.
    Status { mov: String },
    /// The move was simulated successfully.
    Damage(MoveDamage),
    /// The calculation failed for this move alone.
    Failed { mov: String, error: String },
}

impl MoveOutcome {
    pub fn mov(&self) -> &str {
        match self {
            Self::Status { mov } => mov,
            Self::Damage(damage) => &damage.mov,
            Self::Failed { mov, .. } => mov,
        }
    }
}

/// One attacker-defender matchup, with one outcome per attacker move, in move order.
pub type MatchupCell = Vec<MoveOutcome>;

/// All matchups for a single attacker, in defender order.
///
/// A missing cell means the matchup could not be calculated at all, such as when the defender
/// could not be constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchupRow {
    pub attacker: String,
    pub cells: Vec<Option<MatchupCell>>,
}

/// A full attacker-by-defender matchup matrix, in roster order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchupMatrix {
    pub rows: Vec<MatchupRow>,
}

fn construct<C>(calc: &C, combatant: &Combatant, tera_active: bool) -> Result<C::Combatant>
where
    C: DamageCalc,
{
    calc.construct(&Mon::from_combatant(combatant, tera_active)?)
}

fn cell_outcomes<C>(
    calc: &C,
    attacker: &Combatant,
    attacker_mon: &C::Combatant,
    defender_mon: &C::Combatant,
    field: &Field,
) -> MatchupCell
where
    C: DamageCalc,
{
    let defender_hp = calc.max_hp(defender_mon);
    attacker
        .moves
        .iter()
        .map(|mov| {
            if calc.is_status_move(mov) {
                return MoveOutcome::Status { mov: mov.clone() };
            }
            match calc.damage(attacker_mon, defender_mon, mov, field) {
                Ok(summary) => {
                    let (min_percent, max_percent) = summary.damage.percent_of(defender_hp);
                    MoveOutcome::Damage(MoveDamage {
                        mov: mov.clone(),
                        damage: summary.damage,
                        min_percent,
                        max_percent,
                        defender_hp,
                        description: summary.description,
                    })
                }
                Err(error) => MoveOutcome::Failed {
                    mov: mov.clone(),
                    error: format!("{error:#}"),
                },
            }
        })
        .collect()
}

/// Calculates the full matchup matrix for the given input.
///
/// The matrix always has one row per attacker and one cell slot per defender. Failures are
/// isolated to the smallest scope that caused them: an attacker that cannot be constructed
/// yields a row of missing cells, a defender that cannot be constructed yields a missing cell in
/// every row, and a move that cannot be simulated yields a failed outcome in its cell.
pub fn calculate_matchups<C>(calc: &C, input: MatchupInput) -> MatchupMatrix
where
    C: DamageCalc,
{
    let mut matrix = MatchupMatrix::default();
    for (attacker_index, attacker) in input.attackers.iter().enumerate() {
        let mut row = MatchupRow {
            attacker: attacker.name.clone(),
            cells: Vec::with_capacity(input.defenders.len()),
        };
        let attacker_mon = match construct(
            calc,
            attacker,
            input.attacker_tera.contains(&attacker_index),
        ) {
            Ok(mon) => mon,
            Err(error) => {
                warn!("failed to construct {}: {error:#}", attacker.name);
                row.cells.resize(input.defenders.len(), None);
                matrix.rows.push(row);
                continue;
            }
        };
        for (defender_index, defender) in input.defenders.iter().enumerate() {
            let defender_mon = match construct(
                calc,
                defender,
                input.defender_tera.contains(&defender_index),
            ) {
                Ok(mon) => mon,
                Err(error) => {
                    warn!("failed to construct {}: {error:#}", defender.name);
                    row.cells.push(None);
                    continue;
                }
            };
            row.cells.push(Some(cell_outcomes(
                calc,
                attacker,
                &attacker_mon,
                &defender_mon,
                input.field,
            )));
        }
        matrix.rows.push(row);
    }
    matrix
}
