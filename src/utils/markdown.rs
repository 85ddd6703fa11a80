//! Markdown table rendering for search results.
//!
//! Tool responses are Markdown rather than raw JSON so that MCP clients can
//! show them to a reader directly. All values are display strings straight
//! from extraction; an empty string renders as `-` so every row has the same
//! column count.

use crate::models::{FlightListing, FlightSearchResult, TrainListing, TrainSearchResult};

/// Render a cell value, substituting `-` for an empty string.
fn cell(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn row(cells: &[&str]) -> String {
    format!("| {} |", cells.join(" | "))
}

fn divider(columns: usize) -> String {
    row(&vec!["---"; columns])
}

/// Render flight listings as a Markdown table.
pub fn render_flight_table(listings: &[FlightListing]) -> String {
    let mut lines = Vec::with_capacity(listings.len() + 2);
    lines.push(row(&[
        "Airline",
        "Flight",
        "Departure",
        "From",
        "Arrival",
        "To",
        "Route",
        "Price",
        "Transfer",
    ]));
    lines.push(divider(9));

    for listing in listings {
        lines.push(row(&[
            cell(&listing.airline_name),
            cell(&listing.flight_no),
            cell(&listing.depart_time),
            cell(&listing.depart_airport),
            cell(&listing.arrive_time),
            cell(&listing.arrive_airport),
            cell(&listing.transfer),
            cell(&listing.price),
            if listing.is_transfer { "Yes" } else { "No" },
        ]));
    }

    lines.join("\n")
}

/// Render train listings as a Markdown table.
///
/// Fare classes are positional, and different trains can carry different
/// numbers of them; the table gets one `Fare N` column per position up to the
/// widest row, and trains without that position render `-`.
pub fn render_train_table(listings: &[TrainListing]) -> String {
    let fare_columns = listings.iter().map(|l| l.fares.len()).max().unwrap_or(0);

    let mut header = vec![
        "Train".to_string(),
        "From".to_string(),
        "To".to_string(),
        "Departure".to_string(),
        "Arrival".to_string(),
        "Duration".to_string(),
    ];
    for i in 1..=fare_columns {
        header.push(format!("Fare {}", i));
    }

    let mut lines = Vec::with_capacity(listings.len() + 2);
    lines.push(row(&header.iter().map(String::as_str).collect::<Vec<_>>()));
    lines.push(divider(header.len()));

    for listing in listings {
        let mut cells = vec![
            cell(&listing.train_no).to_string(),
            cell(&listing.start_station).to_string(),
            cell(&listing.end_station).to_string(),
            cell(&listing.start_time).to_string(),
            cell(&listing.end_time).to_string(),
            cell(&listing.duration).to_string(),
        ];
        for i in 0..fare_columns {
            cells.push(match listing.fares.get(i) {
                Some(fare) if !fare.price.is_empty() => {
                    if fare.tickets_left.is_empty() {
                        fare.price.clone()
                    } else {
                        format!("{} ({})", fare.price, fare.tickets_left)
                    }
                }
                _ => "-".to_string(),
            });
        }
        lines.push(row(&cells.iter().map(String::as_str).collect::<Vec<_>>()));
    }

    lines.join("\n")
}

/// Render one provider's flight results as a titled section with provenance.
pub fn render_flight_section(title: &str, result: &FlightSearchResult) -> String {
    if result.records.is_empty() {
        return format!("## {}\n\nNo flights found.\n\nSource: {}", title, result.source_url);
    }
    format!(
        "## {}\n\n{}\n\nSource: {}",
        title,
        render_flight_table(&result.records),
        result.source_url
    )
}

/// Render one provider's train results as a titled section with provenance.
pub fn render_train_section(title: &str, result: &TrainSearchResult) -> String {
    if result.records.is_empty() {
        return format!("## {}\n\nNo trains found.\n\nSource: {}", title, result.source_url);
    }
    format!(
        "## {}\n\n{}\n\nSource: {}",
        title,
        render_train_table(&result.records),
        result.source_url
    )
}
