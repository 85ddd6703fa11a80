//! Train listing extraction from result tables.

use super::{css, select_lines, select_text};
use crate::models::{FareClass, TrainListing};
use crate::sources::SourceError;
use regex::Regex;
use scraper::{ElementRef, Html};

/// Extract train rows from the 12306 left-ticket table.
///
/// Each visible row holds one `colspan` cell with the train summary (number,
/// stations, times, duration) followed by one cell per seat category. The
/// seat cells carry their price and remaining count inside an `aria-label`
/// summary attribute; a cell with no such attribute still occupies a fare
/// column, so an empty pair is appended to keep positions aligned.
pub fn extract_left_ticket_rows(html: &str) -> Result<Vec<TrainListing>, SourceError> {
    let document = Html::parse_document(html);
    let rows = css("#queryLeftTable tr")?;
    let cells = css("td")?;
    let train_link = css(".train a")?;
    let stations = css(".cdz")?;
    let times = css(".cds")?;
    let duration = css(".ls")?;

    // Price runs to the "，" separating it from the remaining-count segment,
    // or to the end when that segment is absent.
    let price_re = Regex::new(r"票价([^，]*)")
        .map_err(|e| SourceError::Parse(format!("fare pattern: {}", e)))?;
    let left_re = Regex::new(r"余票(.*)$")
        .map_err(|e| SourceError::Parse(format!("fare pattern: {}", e)))?;

    let mut listings = Vec::new();
    for row in document.select(&rows) {
        if is_hidden(row) {
            continue;
        }

        let mut listing = TrainListing::default();
        for cell in row.select(&cells) {
            if cell.value().attr("colspan").is_some() {
                listing.train_no = select_text(cell, &train_link);

                let station_lines = select_lines(cell, &stations);
                listing.start_station = station_lines.first().cloned().unwrap_or_default();
                listing.end_station = station_lines.get(1).cloned().unwrap_or_default();

                let time_lines = select_lines(cell, &times);
                listing.start_time = time_lines.first().cloned().unwrap_or_default();
                listing.end_time = time_lines.get(1).cloned().unwrap_or_default();

                listing.duration = select_text(cell, &duration);
            } else if let Some(label) = cell.value().attr("aria-label") {
                listing.fares.push(parse_fare_label(label, &price_re, &left_re));
            } else {
                listing.fares.push(FareClass::default());
            }
        }

        if listing.has_identity() {
            listings.push(listing);
        }
    }
    Ok(listings)
}

/// Pull the price and remaining-count capture groups out of a seat cell's
/// summary attribute. The remaining count falls back to the `-` sentinel when
/// its segment is absent.
fn parse_fare_label(label: &str, price_re: &Regex, left_re: &Regex) -> FareClass {
    let price = price_re
        .captures(label)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    let tickets_left = left_re
        .captures(label)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| "-".to_string());

    FareClass {
        price,
        tickets_left,
    }
}

fn is_hidden(row: ElementRef<'_>) -> bool {
    row.value()
        .attr("style")
        .map(|style| style.replace(' ', "").contains("display:none"))
        .unwrap_or(false)
}

/// Extract train rows from a Qunar Rail listing page (one of several while
/// paginating).
pub fn extract_qunar_train_rows(html: &str) -> Result<Vec<TrainListing>, SourceError> {
    let document = Html::parse_document(html);
    let rows = css("#trainList .list-item")?;
    let train_no = css(".train-no")?;
    let start_station = css(".depart-station")?;
    let end_station = css(".arrive-station")?;
    let start_time = css(".depart-time")?;
    let end_time = css(".arrive-time")?;
    let duration = css(".duration")?;
    let seats = css(".seat-item")?;
    let seat_price = css(".price")?;
    let seat_left = css(".left-num")?;

    let mut listings = Vec::new();
    for row in document.select(&rows) {
        let mut listing = TrainListing {
            train_no: select_text(row, &train_no),
            start_station: select_text(row, &start_station),
            end_station: select_text(row, &end_station),
            start_time: select_text(row, &start_time),
            end_time: select_text(row, &end_time),
            duration: select_text(row, &duration),
            fares: Vec::new(),
        };

        for seat in row.select(&seats) {
            let left = select_text(seat, &seat_left);
            listing.fares.push(FareClass {
                price: select_text(seat, &seat_price),
                tickets_left: if left.is_empty() {
                    "-".to_string()
                } else {
                    left
                },
            });
        }

        if listing.has_identity() {
            listings.push(listing);
        }
    }
    Ok(listings)
}
