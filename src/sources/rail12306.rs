//! 12306 train search source.

use async_trait::async_trait;
use serde_json::json;

use crate::browser::with_page;
use crate::config::{BrowserConfig, Config};
use crate::extract::extract_left_ticket_rows;
use crate::models::{SearchResult, TrainQuery, TrainSearchResult};
use crate::sources::{SourceCapabilities, SourceError, TripSource};

const LEFT_TICKET_URL: &str = "https://kyfw.12306.cn/otn/leftTicket/init";
const RESULT_TABLE_SELECTOR: &str = "#queryLeftTable";

/// In-page script copying the hidden station code for a station name.
///
/// 12306 keeps a `station_names` blob on `window` shaped
/// `@bjb|北京北|VAP|beijingbei|bjb|...`; the visible text field is paired
/// with a hidden input that must hold the station's code for the query
/// button to work. An unknown station writes `""`, and the site then reports
/// no results on its own.
const STATION_CODE_SCRIPT: &str = "\
    const entry = ((window.station_names || '').split('@'))\
        .find(item => item.split('|')[1] === arguments[1]);\
    document.querySelector(arguments[0]).value = entry ? entry.split('|')[2] : '';";

/// 12306 left-ticket search.
///
/// Unlike the flight sources this one is form-driven: the query page is a
/// single URL, and the search is performed by filling the station and date
/// fields and clicking the query button. Results arrive in one table; no
/// scroll loading or pagination is involved.
#[derive(Debug, Clone)]
pub struct Rail12306Source {
    browser: BrowserConfig,
}

impl Rail12306Source {
    pub fn new(config: &Config) -> Self {
        Self {
            browser: config.browser.clone(),
        }
    }
}

#[async_trait]
impl TripSource for Rail12306Source {
    fn id(&self) -> &str {
        "12306"
    }

    fn name(&self) -> &str {
        "China Railway 12306"
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::TRAIN_SEARCH
    }

    async fn search_trains(&self, query: &TrainQuery) -> Result<TrainSearchResult, SourceError> {
        query
            .validate()
            .map_err(|e| SourceError::InvalidRequest(e.to_string()))?;

        tracing::debug!(
            dep = %query.dep_station,
            arr = %query.arr_station,
            date = %query.dep_date,
            "searching 12306 trains"
        );

        let dep = query.dep_station.clone();
        let arr = query.arr_station.clone();
        let date = query.dep_date.clone();
        let records = with_page(&self.browser, move |page| {
            Box::pin(async move {
                page.goto(LEFT_TICKET_URL).await?;

                page.fill("#fromStationText", &dep).await?;
                page.execute(STATION_CODE_SCRIPT, vec![json!("#fromStation"), json!(dep)])
                    .await?;

                page.fill("#toStationText", &arr).await?;
                page.execute(STATION_CODE_SCRIPT, vec![json!("#toStation"), json!(arr)])
                    .await?;

                page.fill("#train_date", &date).await?;
                page.click("#query_ticket").await?;
                page.wait_for(RESULT_TABLE_SELECTOR).await?;

                let html = page.source().await?;
                extract_left_ticket_rows(&html)
            })
        })
        .await?;

        tracing::info!(count = records.len(), "12306 train search finished");
        Ok(SearchResult::new(records, LEFT_TICKET_URL))
    }
}
