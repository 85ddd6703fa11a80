//! Tool handlers aggregating results across sources.

use std::sync::Arc;

use serde_json::{json, Value};

use super::tools::ToolHandler;
use crate::models::{FlightQuery, TrainQuery};
use crate::sources::TripSource;
use crate::utils::{render_flight_section, render_train_section};

/// Preferred train source when several are registered.
const PREFERRED_TRAIN_SOURCE: &str = "12306";

fn text_response(text: String) -> Value {
    json!({
        "content": [{
            "type": "text",
            "text": text
        }]
    })
}

fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("Missing '{}' parameter", key))
}

/// Handler for the `getFlightInfo` tool.
///
/// Queries every flight-capable source concurrently and concatenates one
/// Markdown section per site. Any source failing fails the whole call; a
/// partial answer silently missing a site would read as "that site has no
/// flights", which is worse than an error.
///
/// Each search runs in its own task and every task is joined before an
/// error is reported, so a failing source never cancels a sibling
/// mid-scrape and each one still closes its own browser session.
#[derive(Debug)]
pub struct GetFlightInfoHandler {
    pub sources: Arc<Vec<Arc<dyn TripSource>>>,
}

#[async_trait::async_trait]
impl ToolHandler for GetFlightInfoHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let from = required_str(&args, "from")?;
        let to = required_str(&args, "to")?;
        let date = required_str(&args, "date")?;

        let query = FlightQuery::new(from, to, date);
        query.validate().map_err(|e| e.to_string())?;

        let searches: Vec<_> = self
            .sources
            .iter()
            .filter(|s| s.supports_flight_search())
            .map(|source| {
                let source = Arc::clone(source);
                let query = query.clone();
                tokio::spawn(async move {
                    let result = source
                        .search_flights(&query)
                        .await
                        .map_err(|e| format!("{}: {}", source.name(), e))?;
                    Ok::<String, String>(render_flight_section(source.name(), &result))
                })
            })
            .collect();

        if searches.is_empty() {
            return Err("No flight search sources available".to_string());
        }

        let mut sections = Vec::with_capacity(searches.len());
        let mut first_error = None;
        for search in searches {
            match search.await {
                Ok(Ok(section)) => sections.push(section),
                Ok(Err(e)) => {
                    first_error.get_or_insert(e);
                }
                Err(e) => {
                    first_error.get_or_insert(format!("flight search task failed: {}", e));
                }
            }
        }
        if let Some(error) = first_error {
            return Err(error);
        }

        Ok(text_response(sections.join("\n\n")))
    }
}

/// Handler for the `getTrainInfo` tool.
///
/// Queries a single train source: 12306 when available, otherwise the first
/// train-capable one.
#[derive(Debug)]
pub struct GetTrainInfoHandler {
    pub sources: Arc<Vec<Arc<dyn TripSource>>>,
}

#[async_trait::async_trait]
impl ToolHandler for GetTrainInfoHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let dep = required_str(&args, "depStation")?;
        let arr = required_str(&args, "arrStation")?;
        let date = required_str(&args, "depDate")?;

        let query = TrainQuery::new(dep, arr, date);
        query.validate().map_err(|e| e.to_string())?;

        let source = self
            .sources
            .iter()
            .find(|s| s.id() == PREFERRED_TRAIN_SOURCE && s.supports_train_search())
            .or_else(|| self.sources.iter().find(|s| s.supports_train_search()))
            .ok_or("No train search sources available")?;

        let result = source
            .search_trains(&query)
            .await
            .map_err(|e| format!("{}: {}", source.name(), e))?;

        Ok(text_response(render_train_section(source.name(), &result)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FlightListing, FlightSearchResult, SearchResult, TrainListing};
    use crate::sources::{MockSource, SourceCapabilities, SourceError};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    fn flight_sources(mocks: Vec<MockSource>) -> Arc<Vec<Arc<dyn TripSource>>> {
        Arc::new(
            mocks
                .into_iter()
                .map(|m| Arc::new(m) as Arc<dyn TripSource>)
                .collect(),
        )
    }

    fn response_text(value: &Value) -> &str {
        value["content"][0]["text"].as_str().unwrap()
    }

    #[tokio::test]
    async fn flight_tool_renders_one_section_per_source() {
        let a = MockSource::new("a", SourceCapabilities::FLIGHT_SEARCH);
        a.set_flight_result(SearchResult::new(
            vec![FlightListing {
                airline_name: "东方航空".to_string(),
                ..Default::default()
            }],
            "https://a.test",
        ));
        let b = MockSource::new("b", SourceCapabilities::FLIGHT_SEARCH);

        let handler = GetFlightInfoHandler {
            sources: flight_sources(vec![a, b]),
        };
        let response = handler
            .execute(json!({"from": "上海", "to": "北京", "date": "2024-05-01"}))
            .await
            .unwrap();

        let text = response_text(&response);
        assert!(text.contains("东方航空"));
        assert!(text.contains("Source: https://a.test"));
        assert!(text.contains("No flights found."));
    }

    /// Source that takes a while and records whether its search (and thus
    /// its session teardown) ran to completion.
    #[derive(Debug)]
    struct SlowSource {
        completed: Arc<AtomicBool>,
    }

    #[async_trait::async_trait]
    impl crate::sources::TripSource for SlowSource {
        fn id(&self) -> &str {
            "slow"
        }

        fn name(&self) -> &str {
            "Slow Source"
        }

        fn capabilities(&self) -> SourceCapabilities {
            SourceCapabilities::FLIGHT_SEARCH
        }

        async fn search_flights(
            &self,
            _query: &FlightQuery,
        ) -> Result<FlightSearchResult, SourceError> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.completed.store(true, Ordering::SeqCst);
            Ok(SearchResult::new(Vec::new(), "https://slow.test"))
        }
    }

    #[tokio::test]
    async fn one_failing_source_fails_the_flight_aggregate() {
        let ok = MockSource::new("ok", SourceCapabilities::FLIGHT_SEARCH);
        let bad = MockSource::new("bad", SourceCapabilities::FLIGHT_SEARCH);
        bad.fail_with("session lost");

        let handler = GetFlightInfoHandler {
            sources: flight_sources(vec![ok, bad]),
        };
        let result = handler
            .execute(json!({"from": "上海", "to": "北京", "date": "2024-05-01"}))
            .await;

        assert!(result.unwrap_err().contains("session lost"));
    }

    #[tokio::test]
    async fn failing_source_does_not_cancel_its_siblings() {
        let completed = Arc::new(AtomicBool::new(false));
        let slow = SlowSource {
            completed: completed.clone(),
        };
        let broken = MockSource::new("broken", SourceCapabilities::FLIGHT_SEARCH);
        broken.fail_with("session lost");

        let handler = GetFlightInfoHandler {
            sources: Arc::new(vec![
                Arc::new(slow) as Arc<dyn TripSource>,
                Arc::new(broken) as Arc<dyn TripSource>,
            ]),
        };
        let result = handler
            .execute(json!({"from": "上海", "to": "北京", "date": "2024-05-01"}))
            .await;

        // The aggregate still fails, but only after every search has run to
        // completion and released its session.
        assert!(result.unwrap_err().contains("session lost"));
        assert!(completed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn flight_tool_rejects_missing_and_malformed_parameters() {
        let handler = GetFlightInfoHandler {
            sources: flight_sources(vec![]),
        };

        let missing = handler.execute(json!({"from": "上海", "to": "北京"})).await;
        assert_eq!(missing.unwrap_err(), "Missing 'date' parameter");

        let bad_date = handler
            .execute(json!({"from": "上海", "to": "北京", "date": "05/01/2024"}))
            .await;
        assert!(bad_date.unwrap_err().contains("05/01/2024"));
    }

    #[tokio::test]
    async fn train_tool_prefers_12306() {
        let other = MockSource::new("other_rail", SourceCapabilities::TRAIN_SEARCH);
        other.set_train_result(SearchResult::new(Vec::new(), "https://other.test"));
        let preferred = MockSource::new("12306", SourceCapabilities::TRAIN_SEARCH);
        preferred.set_train_result(SearchResult::new(
            vec![TrainListing {
                train_no: "G102".to_string(),
                ..Default::default()
            }],
            "https://12306.test",
        ));

        let handler = GetTrainInfoHandler {
            sources: flight_sources(vec![other, preferred]),
        };
        let response = handler
            .execute(json!({
                "depStation": "北京",
                "arrStation": "上海",
                "depDate": "2024-05-01"
            }))
            .await
            .unwrap();

        let text = response_text(&response);
        assert!(text.contains("G102"));
        assert!(text.contains("Source: https://12306.test"));
    }
}
