//! Listing records scraped from travel result pages.

use serde::{Deserialize, Serialize};

/// One flight offer scraped from a results page.
///
/// Every field is an extraction-cleaned display string; no numeric parsing is
/// performed. A sub-element missing from the DOM extracts as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightListing {
    /// Carrier name. Primary identifier: records without one are dropped.
    pub airline_name: String,

    /// Flight number, e.g. "MU5101".
    pub flight_no: String,

    /// Departure time as displayed, e.g. "07:30".
    pub depart_time: String,

    /// Departure airport (may include terminal).
    pub depart_airport: String,

    /// Arrival time as displayed.
    pub arrive_time: String,

    /// Arrival airport (may include terminal).
    pub arrive_airport: String,

    /// Stop/transfer description from the route column; `""` for a direct flight.
    pub transfer: String,

    /// Displayed price, e.g. "¥1250".
    pub price: String,

    /// Whether the route column carried a transfer marker.
    pub is_transfer: bool,
}

impl FlightListing {
    /// Whether the record carries its primary identifier.
    pub fn has_identity(&self) -> bool {
        !self.airline_name.is_empty()
    }
}

/// Price and remaining-ticket count for one fare class.
///
/// Fare classes are positional: the result table renders one column per seat
/// category and the extractor keeps that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareClass {
    /// Displayed price, `""` when the cell carried no fare.
    pub price: String,

    /// Remaining tickets as displayed ("有", "12", "无"); `"-"` when the
    /// summary attribute had no remaining-count segment.
    pub tickets_left: String,
}

/// One train offer scraped from a left-ticket table row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainListing {
    /// Train number, e.g. "G102". Primary identifier.
    pub train_no: String,

    /// Departure station.
    pub start_station: String,

    /// Arrival station.
    pub end_station: String,

    /// Departure time as displayed.
    pub start_time: String,

    /// Arrival time as displayed.
    pub end_time: String,

    /// Journey duration as displayed, e.g. "4:28".
    pub duration: String,

    /// Ordered fare classes, one per seat-category column.
    pub fares: Vec<FareClass>,
}

impl TrainListing {
    /// Whether the record carries its primary identifier.
    pub fn has_identity(&self) -> bool {
        !self.train_no.is_empty()
    }
}

/// The sole return shape of a search: the scraped records plus the URL of the
/// page they came from, cited in output for traceability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult<T> {
    pub records: Vec<T>,
    pub source_url: String,
}

impl<T> SearchResult<T> {
    pub fn new(records: Vec<T>, source_url: impl Into<String>) -> Self {
        Self {
            records,
            source_url: source_url.into(),
        }
    }
}

/// Flight search result.
pub type FlightSearchResult = SearchResult<FlightListing>;

/// Train search result.
pub type TrainSearchResult = SearchResult<TrainListing>;
