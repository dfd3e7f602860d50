use serde_string_enum::{
    DeserializeLabeledStringEnum,
    SerializeLabeledStringEnum,
};

/// Severity of a damaging move against a defender, by percentage of maximum HP.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, SerializeLabeledStringEnum, DeserializeLabeledStringEnum,
)]
pub enum Severity {
    /// Even the lowest roll knocks the defender out.
    #[string = "certain-kill"]
    CertainKill,
    /// The highest roll knocks the defender out.
    #[string = "likely-kill"]
    LikelyKill,
    /// The highest roll deals at least half of the defender's HP.
    #[string = "heavy"]
    Heavy,
    /// The highest roll deals at least a quarter of the defender's HP.
    #[string = "moderate"]
    Moderate,
    /// The move barely scratches the defender.
    #[string = "light"]
    Light,
}

/// Classifies a damage range, given as percentages of the defender's maximum HP.
///
/// Boundaries are inclusive: a move whose best roll is exactly half of the defender's HP is
/// heavy, not moderate.
pub fn classify(min_percent: f64, max_percent: f64) -> Severity {
    if min_percent >= 100.0 {
        Severity::CertainKill
    } else if max_percent >= 100.0 {
        Severity::LikelyKill
    } else if max_percent >= 50.0 {
        Severity::Heavy
    } else if max_percent >= 25.0 {
        Severity::Moderate
    } else {
        Severity::Light
    }
}
