//! Configuration types: pattern catalog, search parameters, oracle location.

mod catalog;
mod config;

pub use catalog::PatternCatalog;
pub use config::{ConfigError, CrossoverType, LossCompaction, OracleConfig, SearchConfig};
