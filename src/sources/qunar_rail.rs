//! Qunar Rail train search source (paginated listing).

use async_trait::async_trait;
use std::time::Duration;

use crate::browser::{drain_pages, with_page, PageCursor, PageDriver};
use crate::config::{BrowserConfig, Config, PaginationConfig};
use crate::extract::extract_qunar_train_rows;
use crate::models::{SearchResult, TrainListing, TrainQuery, TrainSearchResult};
use crate::sources::{SourceCapabilities, SourceError, TripSource};

const LISTING_SELECTOR: &str = "#trainList";
const NEXT_CONTROL_SELECTOR: &str = ".m-page .next";

/// Class name marking the "next page" control as exhausted.
const DISABLED_MARKER: &str = "disabled";

/// Qunar Rail train listings.
///
/// This site paginates instead of scroll-loading: results span several pages
/// reached by clicking a "next" control, which carries a disabled marker
/// class on the last page.
#[derive(Debug, Clone)]
pub struct QunarRailSource {
    browser: BrowserConfig,
    pagination: PaginationConfig,
}

impl QunarRailSource {
    pub fn new(config: &Config) -> Self {
        Self {
            browser: config.browser.clone(),
            pagination: config.pagination.clone(),
        }
    }
}

/// Cursor over the live Qunar Rail listing.
struct RailCursor<'a> {
    page: &'a mut PageDriver,
}

#[async_trait]
impl PageCursor for RailCursor<'_> {
    type Record = TrainListing;

    async fn read_page(&mut self) -> Result<Vec<TrainListing>, SourceError> {
        self.page.wait_for(LISTING_SELECTOR).await?;
        let html = self.page.source().await?;
        extract_qunar_train_rows(&html)
    }

    async fn has_next(&mut self) -> Result<bool, SourceError> {
        // A missing control means a single-page result set.
        match self.page.attr(NEXT_CONTROL_SELECTOR, "class").await? {
            Some(class) => Ok(!class.split_whitespace().any(|c| c == DISABLED_MARKER)),
            None => Ok(false),
        }
    }

    async fn next_page(&mut self) -> Result<(), SourceError> {
        self.page.click(NEXT_CONTROL_SELECTOR).await
    }
}

#[async_trait]
impl TripSource for QunarRailSource {
    fn id(&self) -> &str {
        "qunar_rail"
    }

    fn name(&self) -> &str {
        "Qunar Rail"
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::TRAIN_SEARCH
    }

    async fn search_trains(&self, query: &TrainQuery) -> Result<TrainSearchResult, SourceError> {
        query
            .validate()
            .map_err(|e| SourceError::InvalidRequest(e.to_string()))?;

        let url = format!(
            "https://train.qunar.com/trainList.htm?fromStation={}&toStation={}&date={}&searchType=stasta",
            urlencoding::encode(&query.dep_station),
            urlencoding::encode(&query.arr_station),
            query.dep_date
        );
        tracing::debug!(%url, "searching Qunar Rail trains");

        let nav_url = url.clone();
        let max_pages = self.pagination.max_pages;
        let page_delay = Duration::from_millis(self.pagination.page_delay_ms);
        let records = with_page(&self.browser, move |page| {
            Box::pin(async move {
                page.goto(&nav_url).await?;
                let mut cursor = RailCursor { page };
                drain_pages(&mut cursor, max_pages, page_delay).await
            })
        })
        .await?;

        tracing::info!(count = records.len(), "Qunar Rail train search finished");
        Ok(SearchResult::new(records, url))
    }
}
