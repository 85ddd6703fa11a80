//! Mock source for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::models::{
    FlightQuery, FlightSearchResult, SearchResult, TrainQuery, TrainSearchResult,
};
use crate::sources::{SourceCapabilities, SourceError, TripSource};

/// A mock source returning predefined responses.
#[derive(Debug)]
pub struct MockSource {
    id: String,
    capabilities: SourceCapabilities,
    flight_result: Mutex<Option<FlightSearchResult>>,
    train_result: Mutex<Option<TrainSearchResult>>,
    failure: Mutex<Option<String>>,
}

impl MockSource {
    /// Create a mock source with the given ID and capabilities.
    pub fn new(id: impl Into<String>, capabilities: SourceCapabilities) -> Self {
        Self {
            id: id.into(),
            capabilities,
            flight_result: Mutex::new(None),
            train_result: Mutex::new(None),
            failure: Mutex::new(None),
        }
    }

    /// Set the flight search result to return.
    pub fn set_flight_result(&self, result: FlightSearchResult) {
        *self.flight_result.lock().unwrap() = Some(result);
    }

    /// Set the train search result to return.
    pub fn set_train_result(&self, result: TrainSearchResult) {
        *self.train_result.lock().unwrap() = Some(result);
    }

    /// Make every search fail with the given message.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }
}

#[async_trait]
impl TripSource for MockSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    fn capabilities(&self) -> SourceCapabilities {
        self.capabilities
    }

    async fn search_flights(
        &self,
        _query: &FlightQuery,
    ) -> Result<FlightSearchResult, SourceError> {
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(SourceError::Other(message));
        }
        Ok(self
            .flight_result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| SearchResult::new(Vec::new(), "https://mock.test/flights")))
    }

    async fn search_trains(&self, _query: &TrainQuery) -> Result<TrainSearchResult, SourceError> {
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(SourceError::Other(message));
        }
        Ok(self
            .train_result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| SearchResult::new(Vec::new(), "https://mock.test/trains")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FlightListing;

    #[tokio::test]
    async fn returns_configured_flight_result() {
        let mock = MockSource::new("mock", SourceCapabilities::FLIGHT_SEARCH);
        mock.set_flight_result(SearchResult::new(
            vec![FlightListing {
                airline_name: "测试航空".to_string(),
                ..Default::default()
            }],
            "https://mock.test/set",
        ));

        let result = mock
            .search_flights(&FlightQuery::new("a", "b", "2024-01-01"))
            .await
            .unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.source_url, "https://mock.test/set");
    }

    #[tokio::test]
    async fn configured_failure_wins() {
        let mock = MockSource::new("mock", SourceCapabilities::FLIGHT_SEARCH);
        mock.fail_with("session lost");

        let result = mock
            .search_flights(&FlightQuery::new("a", "b", "2024-01-01"))
            .await;
        assert!(matches!(result, Err(SourceError::Other(_))));
    }
}
