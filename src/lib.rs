//! # Trip Search MCP
//!
//! A Model Context Protocol (MCP) server for searching one-way flights and
//! train tickets on Chinese travel sites by driving a real browser through
//! WebDriver and scraping the rendered result pages.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (FlightListing, TrainListing, queries)
//! - [`sources`]: Travel site plugins with extensible trait-based architecture
//! - [`browser`]: WebDriver session handling, scroll loading, pagination
//! - [`extract`]: Pure HTML-to-record extraction, testable against fixtures
//! - [`mcp`]: MCP protocol implementation and server
//! - [`utils`]: Markdown rendering of results
//! - [`config`]: Configuration management

pub mod browser;
pub mod config;
pub mod extract;
pub mod mcp;
pub mod models;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use models::{FlightListing, TrainListing};
pub use sources::{SourceRegistry, TripSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
