/// Data layer: table loading, stratification, splitting and writing.
///
/// Architecture:
/// ```text
///   raw_data_dir/housing.csv (.parquet)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  locate file, parse → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  strata   │  median_income → IncomeCategory 1..=5
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  split    │  seeded stratified shuffle → train / test indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  Table subsets → CSV
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod split;
pub mod strata;
pub mod writer;
