//! Ctrip flight search source.

use async_trait::async_trait;
use serde_json::Value;

use crate::browser::{load_all, with_page, ScrollConfig};
use crate::config::{BrowserConfig, Config};
use crate::extract::extract_ctrip_flights;
use crate::models::{FlightQuery, FlightSearchResult, SearchResult};
use crate::sources::{SourceCapabilities, SourceError, TripSource};

const POI_SEARCH_URL: &str = "https://flights.ctrip.com/international/search/api/poi/search";
const LISTING_READY_SELECTOR: &str = ".flight-list";

/// Ctrip one-way flight listings.
///
/// The listing URL wants resolved city codes, so each search first hits the
/// POI search API to turn the free-text city names into codes. The results
/// page renders lazily on scroll, so the incremental loader runs before
/// extraction.
#[derive(Debug, Clone)]
pub struct CtripSource {
    browser: BrowserConfig,
    scroll: ScrollConfig,
    poi_url: String,
}

impl CtripSource {
    pub fn new(config: &Config) -> Self {
        Self {
            browser: config.browser.clone(),
            scroll: config.scroll.clone(),
            poi_url: POI_SEARCH_URL.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_poi_url(mut self, url: impl Into<String>) -> Self {
        self.poi_url = url.into();
        self
    }

    /// Resolve a free-text city name to the code Ctrip's listing URLs use.
    ///
    /// An unknown city resolves to `""`, matching the upstream API's
    /// behavior of returning no candidates rather than an error.
    pub async fn city_code(&self, city: &str) -> Result<String, SourceError> {
        let url = format!(
            "{}?key={}&filterAirport=true",
            self.poi_url,
            urlencoding::encode(city)
        );

        let response = reqwest::get(&url).await?;
        if !response.status().is_success() {
            return Err(SourceError::Network(format!(
                "city code lookup for '{}' returned {}",
                city,
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        Ok(extract_city_code(&body))
    }
}

fn extract_city_code(body: &Value) -> String {
    body.get("Data")
        .and_then(|data| data.get(0))
        .and_then(|candidate| candidate.get("Code"))
        .and_then(|code| code.as_str())
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl TripSource for CtripSource {
    fn id(&self) -> &str {
        "ctrip"
    }

    fn name(&self) -> &str {
        "Ctrip"
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::FLIGHT_SEARCH
    }

    async fn search_flights(&self, query: &FlightQuery) -> Result<FlightSearchResult, SourceError> {
        query
            .validate()
            .map_err(|e| SourceError::InvalidRequest(e.to_string()))?;

        let dep_code = self.city_code(&query.dep_city).await?;
        let arr_code = self.city_code(&query.arr_city).await?;

        let url = format!(
            "https://flights.ctrip.com/online/list/oneway-{}-{}?_=1&depdate={}&cabin=Y_S_C_F",
            dep_code, arr_code, query.dep_date
        );
        tracing::debug!(%url, "searching Ctrip flights");

        let nav_url = url.clone();
        let scroll = self.scroll.clone();
        let records = with_page(&self.browser, move |page| {
            Box::pin(async move {
                page.goto(&nav_url).await?;
                page.wait_for(LISTING_READY_SELECTOR).await?;
                load_all(page, &scroll).await?;
                let html = page.source().await?;
                extract_ctrip_flights(&html)
            })
        })
        .await?;

        tracing::info!(count = records.len(), "Ctrip flight search finished");
        Ok(SearchResult::new(records, url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn city_code_reads_first_candidate() {
        let body = json!({"Data": [{"Code": "CKG", "Name": "重庆"}, {"Code": "XXX"}]});
        assert_eq!(extract_city_code(&body), "CKG");
    }

    #[test]
    fn city_code_defaults_to_empty() {
        assert_eq!(extract_city_code(&json!({"Data": []})), "");
        assert_eq!(extract_city_code(&json!({})), "");
        assert_eq!(extract_city_code(&json!({"Data": [{"Code": 42}]})), "");
    }

    #[tokio::test]
    async fn city_code_hits_the_poi_api() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_query(mockito::Matcher::UrlEncoded(
                "key".into(),
                "北京".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"Data":[{"Code":"BJS"}]}"#)
            .create_async()
            .await;

        let source = CtripSource::new(&Config::default()).with_poi_url(server.url());
        let code = source.city_code("北京").await.unwrap();

        assert_eq!(code, "BJS");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn city_code_surfaces_http_failures() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(502)
            .create_async()
            .await;

        let source = CtripSource::new(&Config::default()).with_poi_url(server.url());
        let result = source.city_code("北京").await;

        assert!(matches!(result, Err(SourceError::Network(_))));
    }

    #[tokio::test]
    async fn rejects_invalid_dates_before_launching_a_browser() {
        let source = CtripSource::new(&Config::default());
        let query = FlightQuery::new("重庆", "北京", "not-a-date");

        let result = source.search_flights(&query).await;
        assert!(matches!(result, Err(SourceError::InvalidRequest(_))));
    }
}
