//! Search query models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while validating a search query.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Missing {0}")]
    MissingField(&'static str),
}

/// Validate a `YYYY-MM-DD` departure date string.
///
/// The parsed date must round-trip to the same string, so unpadded forms
/// like `2024-5-1` are rejected; the sites build URLs and form fields from
/// this value verbatim.
pub fn validate_date(date: &str) -> Result<(), QueryError> {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) if parsed.format("%Y-%m-%d").to_string() == date => Ok(()),
        _ => Err(QueryError::InvalidDate(date.to_string())),
    }
}

/// A one-way flight search. City names are free text; each source resolves
/// them to whatever code its listing URLs need.
///
/// Queries are built per call and discarded after use; nothing is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightQuery {
    /// Departure city name, e.g. "重庆".
    pub dep_city: String,

    /// Arrival city name.
    pub arr_city: String,

    /// Departure date, `YYYY-MM-DD`.
    pub dep_date: String,
}

impl FlightQuery {
    pub fn new(
        dep_city: impl Into<String>,
        arr_city: impl Into<String>,
        dep_date: impl Into<String>,
    ) -> Self {
        Self {
            dep_city: dep_city.into(),
            arr_city: arr_city.into(),
            dep_date: dep_date.into(),
        }
    }

    pub fn validate(&self) -> Result<(), QueryError> {
        if self.dep_city.trim().is_empty() {
            return Err(QueryError::MissingField("departure city"));
        }
        if self.arr_city.trim().is_empty() {
            return Err(QueryError::MissingField("arrival city"));
        }
        validate_date(&self.dep_date)
    }
}

/// A one-way train search between two free-text station names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainQuery {
    /// Departure station name, e.g. "北京".
    pub dep_station: String,

    /// Arrival station name.
    pub arr_station: String,

    /// Departure date, `YYYY-MM-DD`.
    pub dep_date: String,
}

impl TrainQuery {
    pub fn new(
        dep_station: impl Into<String>,
        arr_station: impl Into<String>,
        dep_date: impl Into<String>,
    ) -> Self {
        Self {
            dep_station: dep_station.into(),
            arr_station: arr_station.into(),
            dep_date: dep_date.into(),
        }
    }

    pub fn validate(&self) -> Result<(), QueryError> {
        if self.dep_station.trim().is_empty() {
            return Err(QueryError::MissingField("departure station"));
        }
        if self.arr_station.trim().is_empty() {
            return Err(QueryError::MissingField("arrival station"));
        }
        validate_date(&self.dep_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_dates() {
        assert_eq!(validate_date("2023-10-01"), Ok(()));
        assert_eq!(validate_date("2024-02-29"), Ok(()));
    }

    #[test]
    fn rejects_malformed_dates() {
        for bad in [
            "2023/10/01",
            "2023-13-01",
            "2023-02-30",
            "2023-2-3",
            "tomorrow",
            "",
        ] {
            assert!(validate_date(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn flight_query_requires_both_cities() {
        let query = FlightQuery::new("", "北京", "2023-10-01");
        assert_eq!(
            query.validate(),
            Err(QueryError::MissingField("departure city"))
        );

        let query = FlightQuery::new("重庆", "北京", "2023-10-01");
        assert_eq!(query.validate(), Ok(()));
    }

    #[test]
    fn train_query_validates_date() {
        let query = TrainQuery::new("北京", "上海", "01-10-2023");
        assert!(matches!(query.validate(), Err(QueryError::InvalidDate(_))));
    }
}
