//! Adventure aggregation service
//!
//! This library provides the core functionality for merging geocoding,
//! weather, news and model-generated plan data into one travel-suggestion
//! payload, with per-provider timeouts and graceful degradation.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod providers;
pub mod web;

// Re-export core types for public API
pub use aggregator::Aggregator;
pub use config::AggregatorConfig;
pub use error::{AggregatorError, INTERNAL_ERROR_MESSAGE, INVALID_INPUT_MESSAGE};
pub use models::{
    AdventurePlan, AdventureRequest, AdventureResponse, Outcome, ProviderResult, RequestKind,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AggregatorError>;
