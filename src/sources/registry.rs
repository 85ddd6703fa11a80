//! Registry for managing travel search source plugins.

use std::collections::HashMap;
use std::sync::Arc;

use super::{
    ctrip::CtripSource, fliggy::FliggySource, qunar::QunarSource, qunar_rail::QunarRailSource,
    rail12306::Rail12306Source, SourceError, TripSource,
};
use crate::config::Config;

bitflags::bitflags! {
    /// Capabilities that a source can support
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SourceCapabilities: u32 {
        const FLIGHT_SEARCH = 1 << 0;
        const TRAIN_SEARCH = 1 << 1;
    }
}

/// Preferred source for the train tool; the others stay reachable through
/// the CLI's `--source` selector.
const PREFERRED_TRAIN_SOURCE: &str = "12306";

/// Registry for all available travel sources.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    sources: HashMap<String, Arc<dyn TripSource>>,
}

impl SourceRegistry {
    /// Create a new registry with all available sources.
    pub fn new(config: &Config) -> Self {
        let mut registry = Self {
            sources: HashMap::new(),
        };

        registry.register(Arc::new(CtripSource::new(config)));
        registry.register(Arc::new(QunarSource::new(config)));
        registry.register(Arc::new(FliggySource::new(config)));
        registry.register(Arc::new(Rail12306Source::new(config)));
        registry.register(Arc::new(QunarRailSource::new(config)));

        registry
    }

    /// Register a new source.
    pub fn register(&mut self, source: Arc<dyn TripSource>) {
        self.sources.insert(source.id().to_string(), source);
    }

    /// Get a source by ID.
    pub fn get(&self, id: &str) -> Option<&Arc<dyn TripSource>> {
        self.sources.get(id)
    }

    /// Get a source by ID, returning an error if not found.
    pub fn get_required(&self, id: &str) -> Result<&Arc<dyn TripSource>, SourceError> {
        self.get(id)
            .ok_or_else(|| SourceError::NotFound(format!("Source '{}' not found", id)))
    }

    /// Get all registered sources.
    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn TripSource>> {
        self.sources.values()
    }

    /// Get all source IDs.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(|s| s.as_str())
    }

    /// Get sources that support a specific capability.
    pub fn with_capability(&self, capability: SourceCapabilities) -> Vec<&Arc<dyn TripSource>> {
        self.all()
            .filter(|s| s.capabilities().contains(capability))
            .collect()
    }

    /// Get sources that support flight search.
    pub fn flight_sources(&self) -> Vec<&Arc<dyn TripSource>> {
        self.with_capability(SourceCapabilities::FLIGHT_SEARCH)
    }

    /// Get sources that support train search.
    pub fn train_sources(&self) -> Vec<&Arc<dyn TripSource>> {
        self.with_capability(SourceCapabilities::TRAIN_SEARCH)
    }

    /// The train source the MCP tool queries: 12306 when registered, else
    /// any train-capable source.
    pub fn preferred_train_source(&self) -> Option<&Arc<dyn TripSource>> {
        self.get(PREFERRED_TRAIN_SOURCE)
            .filter(|s| s.supports_train_search())
            .or_else(|| self.train_sources().first().copied())
    }

    /// Check if a source exists.
    pub fn has(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    /// Get the number of registered sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
