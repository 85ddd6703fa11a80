//! Travel search source plugins with extensible trait-based architecture.
//!
//! This module defines the [`TripSource`] trait that all travel sources
//! implement. New sources can be added by implementing the trait and
//! registering them with the [`SourceRegistry`].
//!
//! Every source scrapes one third-party site through a WebDriver-controlled
//! browser; there is no schema negotiation with the upstream site beyond the
//! literal CSS selectors each source carries. The upstream DOM staying stable
//! is an external contract, not something this crate can enforce.

mod ctrip;
mod fliggy;
mod qunar;
mod qunar_rail;
mod rail12306;
mod registry;

pub mod mock;

pub use mock::MockSource;
pub use registry::{SourceCapabilities, SourceRegistry};

use crate::models::{FlightQuery, FlightSearchResult, TrainQuery, TrainSearchResult};
use async_trait::async_trait;

/// The TripSource trait defines the interface for all travel search plugins.
///
/// # Implementing a New Source
///
/// 1. Create a struct holding whatever browser/tuning config the site needs
/// 2. Implement `id`, `name`, `capabilities`, and the search method(s) the
///    site supports
/// 3. Register it in [`SourceRegistry::new`]
#[async_trait]
pub trait TripSource: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source, e.g. "ctrip", "12306".
    fn id(&self) -> &str;

    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Describe the capabilities of this source.
    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::empty()
    }

    /// Whether this source supports flight search.
    fn supports_flight_search(&self) -> bool {
        self.capabilities()
            .contains(SourceCapabilities::FLIGHT_SEARCH)
    }

    /// Whether this source supports train search.
    fn supports_train_search(&self) -> bool {
        self.capabilities()
            .contains(SourceCapabilities::TRAIN_SEARCH)
    }

    /// Search one-way flights matching the query.
    async fn search_flights(
        &self,
        _query: &FlightQuery,
    ) -> Result<FlightSearchResult, SourceError> {
        Err(SourceError::NotImplemented)
    }

    /// Search one-way trains matching the query.
    async fn search_trains(&self, _query: &TrainQuery) -> Result<TrainSearchResult, SourceError> {
        Err(SourceError::NotImplemented)
    }
}

/// Errors that can occur when interacting with a source.
///
/// Navigation and selector-timeout failures surface as [`SourceError::Browser`]
/// and propagate uncaught; an empty record list is not an error and is
/// indistinguishable from a partial scrape.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The requested operation is not implemented for this source
    #[error("Operation not implemented for this source")]
    NotImplemented,

    /// WebDriver command, navigation, or selector-wait failure
    #[error("Browser error: {0}")]
    Browser(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Parsing error (HTML, JSON, selector)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Source not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<fantoccini::error::CmdError> for SourceError {
    fn from(err: fantoccini::error::CmdError) -> Self {
        SourceError::Browser(err.to_string())
    }
}

impl From<fantoccini::error::NewSessionError> for SourceError {
    fn from(err: fantoccini::error::NewSessionError) -> Self {
        SourceError::Browser(format!("failed to start WebDriver session: {}", err))
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}
