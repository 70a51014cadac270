use std::fmt;

// ---------------------------------------------------------------------------
// IncomeCategory – the stratification bucket
// ---------------------------------------------------------------------------

/// Upper edges of buckets 1..=4. Bucket 5 is everything above the last edge.
///
/// Intervals are right-closed: `(-inf, 1.5]`, `(1.5, 3.0]`, `(3.0, 4.5]`,
/// `(4.5, 6.0]`, `(6.0, inf)`.
pub const INCOME_BIN_EDGES: [f64; 4] = [1.5, 3.0, 4.5, 6.0];

/// Ordinal stratum label derived from a continuous value, `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IncomeCategory(u8);

impl IncomeCategory {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = INCOME_BIN_EDGES.len() as u8 + 1;

    /// Bucket a value. `value` must not be NaN.
    pub fn of(value: f64) -> Self {
        let below = INCOME_BIN_EDGES.iter().take_while(|&&edge| value > edge).count();
        IncomeCategory(below as u8 + 1)
    }

    pub fn label(self) -> u8 {
        self.0
    }
}

impl fmt::Display for IncomeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bucket every value of the stratification column.
pub fn income_categories(values: &[f64]) -> Vec<IncomeCategory> {
    values.iter().map(|&v| IncomeCategory::of(v)).collect()
}
