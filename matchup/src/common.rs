use std::fmt;

/// An inclusive range of integers, such as the possible rolls of a damage calculation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range(u64, u64);

impl Range {
    /// Creates a new range.
    pub fn new(min: u64, max: u64) -> Self {
        assert!(min <= max, "range start exceeds range end");
        Self(min, max)
    }

    /// The minimum value in the range.
    pub fn min(&self) -> u64 {
        self.0
    }

    /// The maximum value in the range (inclusive).
    pub fn max(&self) -> u64 {
        self.1
    }

    /// Checks if a value is in range.
    pub fn contains(&self, v: u64) -> bool {
        v >= self.min() && v <= self.max()
    }

    /// The bounds of the range as percentages of the given total.
    pub fn percent_of(&self, total: u64) -> (f64, f64) {
        (
            self.min() as f64 / total as f64 * 100.0,
            self.max() as f64 / total as f64 * 100.0,
        )
    }
}

impl From<u64> for Range {
    fn from(value: u64) -> Self {
        Self::new(value, value)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.0, self.1)
    }
}
