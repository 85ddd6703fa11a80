//! Qunar flight search source.

use async_trait::async_trait;

use crate::browser::{load_all, with_page, ScrollConfig};
use crate::config::{BrowserConfig, Config};
use crate::extract::extract_qunar_flights;
use crate::models::{FlightQuery, FlightSearchResult, SearchResult};
use crate::sources::{SourceCapabilities, SourceError, TripSource};

const LISTING_READY_SELECTOR: &str = ".m-fly-list";

/// Qunar one-way flight listings.
///
/// Takes the city names directly in the list URL (no code resolution) and
/// scroll-loads the result list before extraction.
#[derive(Debug, Clone)]
pub struct QunarSource {
    browser: BrowserConfig,
    scroll: ScrollConfig,
}

impl QunarSource {
    pub fn new(config: &Config) -> Self {
        Self {
            browser: config.browser.clone(),
            scroll: config.scroll.clone(),
        }
    }
}

#[async_trait]
impl TripSource for QunarSource {
    fn id(&self) -> &str {
        "qunar"
    }

    fn name(&self) -> &str {
        "Qunar"
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::FLIGHT_SEARCH
    }

    async fn search_flights(&self, query: &FlightQuery) -> Result<FlightSearchResult, SourceError> {
        query
            .validate()
            .map_err(|e| SourceError::InvalidRequest(e.to_string()))?;

        let url = format!(
            "https://flight.qunar.com/site/oneway_list.htm?searchDepartureAirport={}&searchArrivalAirport={}&searchDepartureTime={}",
            urlencoding::encode(&query.dep_city),
            urlencoding::encode(&query.arr_city),
            query.dep_date
        );
        tracing::debug!(%url, "searching Qunar flights");

        let nav_url = url.clone();
        let scroll = self.scroll.clone();
        let records = with_page(&self.browser, move |page| {
            Box::pin(async move {
                page.goto(&nav_url).await?;
                page.wait_for(LISTING_READY_SELECTOR).await?;
                load_all(page, &scroll).await?;
                let html = page.source().await?;
                extract_qunar_flights(&html)
            })
        })
        .await?;

        tracing::info!(count = records.len(), "Qunar flight search finished");
        Ok(SearchResult::new(records, url))
    }
}
