//! Fliggy flight search source.

use async_trait::async_trait;

use crate::browser::{load_all, with_page, ScrollConfig};
use crate::config::{BrowserConfig, Config};
use crate::extract::extract_fliggy_flights;
use crate::models::{FlightQuery, FlightSearchResult, SearchResult};
use crate::sources::{SourceCapabilities, SourceError, TripSource};

const LISTING_READY_SELECTOR: &str = ".flight-list";

/// Fliggy one-way flight listings. Scroll-loading, direct city names.
#[derive(Debug, Clone)]
pub struct FliggySource {
    browser: BrowserConfig,
    scroll: ScrollConfig,
}

impl FliggySource {
    pub fn new(config: &Config) -> Self {
        Self {
            browser: config.browser.clone(),
            scroll: config.scroll.clone(),
        }
    }
}

#[async_trait]
impl TripSource for FliggySource {
    fn id(&self) -> &str {
        "fliggy"
    }

    fn name(&self) -> &str {
        "Fliggy"
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::FLIGHT_SEARCH
    }

    async fn search_flights(&self, query: &FlightQuery) -> Result<FlightSearchResult, SourceError> {
        query
            .validate()
            .map_err(|e| SourceError::InvalidRequest(e.to_string()))?;

        let url = format!(
            "https://sjipiao.fliggy.com/flight_search_result.htm?depCityName={}&arrCityName={}&depDate={}",
            urlencoding::encode(&query.dep_city),
            urlencoding::encode(&query.arr_city),
            query.dep_date
        );
        tracing::debug!(%url, "searching Fliggy flights");

        let nav_url = url.clone();
        let scroll = self.scroll.clone();
        let records = with_page(&self.browser, move |page| {
            Box::pin(async move {
                page.goto(&nav_url).await?;
                page.wait_for(LISTING_READY_SELECTOR).await?;
                load_all(page, &scroll).await?;
                let html = page.source().await?;
                extract_fliggy_flights(&html)
            })
        })
        .await?;

        tracing::info!(count = records.len(), "Fliggy flight search finished");
        Ok(SearchResult::new(records, url))
    }
}
