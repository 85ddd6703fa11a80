//! Core data structures for trip search.

mod listing;
mod search;

pub use listing::{
    FareClass, FlightListing, FlightSearchResult, SearchResult, TrainListing, TrainSearchResult,
};
pub use search::{validate_date, FlightQuery, QueryError, TrainQuery};
