/// Derivations over a loaded dataset: column matching, normalization,
/// ranking and descriptive statistics. All functions are pure.

pub mod columns;
pub mod normalize;
pub mod rank;
pub mod stats;

pub use columns::{match_column, match_columns, pick_column, IndicatorColumnMap};
pub use normalize::{normalize_indicators, normalize_value, RadarProfile};
pub use rank::{competition_rank, rank_by_year};
pub use stats::BoxSummary;
