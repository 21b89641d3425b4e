//! World Happiness dataset pipeline: loading with source fallback,
//! country → continent resolution, indicator column matching,
//! normalization and per-year ranking.

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod geo;
