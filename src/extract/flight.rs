//! Flight listing extraction, one selector map per provider.

use super::{css, select_text};
use crate::models::FlightListing;
use crate::sources::SourceError;
use regex::Regex;
use scraper::Html;

/// Extract Ctrip flight boxes from a loaded results page.
///
/// The broad `.flight-box` selector also picks up structural rows (headers,
/// ads, spacers); those have no airline name and are filtered out.
pub fn extract_ctrip_flights(html: &str) -> Result<Vec<FlightListing>, SourceError> {
    let document = Html::parse_document(html);
    let boxes = css(".flight-box")?;
    let airline_name = css(".airline-name")?;
    let plane_no = css(".plane-No")?;
    let depart_time = css(".depart-box .time")?;
    let depart_airport = css(".depart-box .airport")?;
    let arrive_time = css(".arrive-box .time")?;
    let arrive_airport = css(".arrive-box .airport")?;
    let arrow_box = css(".arrow-box")?;
    let price = css(".flight-price .price")?;
    let transfer_mark = css(".arrow-transfer")?;

    let mut listings = Vec::new();
    for node in document.select(&boxes) {
        let listing = FlightListing {
            airline_name: select_text(node, &airline_name),
            flight_no: select_text(node, &plane_no),
            depart_time: select_text(node, &depart_time),
            depart_airport: select_text(node, &depart_airport),
            arrive_time: select_text(node, &arrive_time),
            arrive_airport: select_text(node, &arrive_airport),
            transfer: select_text(node, &arrow_box),
            price: select_text(node, &price),
            is_transfer: node.select(&transfer_mark).next().is_some(),
        };
        if listing.has_identity() {
            listings.push(listing);
        }
    }
    Ok(listings)
}

/// Extract Qunar flight items.
///
/// Qunar renders the carrier and flight number as one combined text field;
/// the trailing 6-character alphanumeric code is the flight number and the
/// remainder is the carrier name. Items whose combined field carries no
/// carrier name are filtered out.
pub fn extract_qunar_flights(html: &str) -> Result<Vec<FlightListing>, SourceError> {
    let document = Html::parse_document(html);
    let items = css(".m-airfly-item")?;
    let airline = css(".airline")?;
    let depart_time = css(".sep-lf .time")?;
    let depart_airport = css(".sep-lf .airport")?;
    let arrive_time = css(".sep-rt .time")?;
    let arrive_airport = css(".sep-rt .airport")?;
    let transfer = css(".trans-wrap")?;
    let price = css(".prc-wp .price")?;

    let airline_re = Regex::new(r"^(?P<name>.*?)[,\s]*(?P<code>[A-Z0-9]{6})$")
        .map_err(|e| SourceError::Parse(format!("airline pattern: {}", e)))?;

    let mut listings = Vec::new();
    for node in document.select(&items) {
        let combined = select_text(node, &airline);
        let (name, code) = match airline_re.captures(combined.trim()) {
            Some(caps) => (caps["name"].trim().to_string(), caps["code"].to_string()),
            None => (combined.trim().to_string(), String::new()),
        };

        let transfer_text = select_text(node, &transfer);
        let listing = FlightListing {
            airline_name: name,
            flight_no: code,
            depart_time: select_text(node, &depart_time),
            depart_airport: select_text(node, &depart_airport),
            arrive_time: select_text(node, &arrive_time),
            arrive_airport: select_text(node, &arrive_airport),
            is_transfer: !transfer_text.is_empty(),
            transfer: transfer_text,
            price: select_text(node, &price),
        };
        if listing.has_identity() {
            listings.push(listing);
        }
    }
    Ok(listings)
}

/// Extract Fliggy flight rows.
pub fn extract_fliggy_flights(html: &str) -> Result<Vec<FlightListing>, SourceError> {
    let document = Html::parse_document(html);
    let rows = css(".flight-list-item")?;
    let airline_name = css(".airline-name")?;
    let flight_no = css(".flight-no")?;
    let depart_time = css(".depart .time")?;
    let depart_airport = css(".depart .airport")?;
    let arrive_time = css(".arrive .time")?;
    let arrive_airport = css(".arrive .airport")?;
    let stopover = css(".stopover")?;
    let price = css(".price-box .price")?;
    let transfer_mark = css(".stopover-mark")?;

    let mut listings = Vec::new();
    for node in document.select(&rows) {
        let listing = FlightListing {
            airline_name: select_text(node, &airline_name),
            flight_no: select_text(node, &flight_no),
            depart_time: select_text(node, &depart_time),
            depart_airport: select_text(node, &depart_airport),
            arrive_time: select_text(node, &arrive_time),
            arrive_airport: select_text(node, &arrive_airport),
            transfer: select_text(node, &stopover),
            price: select_text(node, &price),
            is_transfer: node.select(&transfer_mark).next().is_some(),
        };
        if listing.has_identity() {
            listings.push(listing);
        }
    }
    Ok(listings)
}
