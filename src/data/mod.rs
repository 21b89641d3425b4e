/// Data layer: core types, sources, loading, derivation and filtering.
///
/// Architecture:
/// ```text
///  remote URL / local paths / upload
///        │
///        ▼
///   ┌──────────┐
///   │  source   │  fallback chain, memoized per SourceKey
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  .csv / .json / .parquet → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  prepare  │  schema, continents, ranks, maxima → HappinessDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  continent selection → visible indices
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod prepare;
pub mod source;
