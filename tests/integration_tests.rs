//! Integration tests exercising the registry, tool layer, and server wiring
//! without a live browser.

use std::sync::Arc;

use serde_json::json;
use trip_search_mcp::config::Config;
use trip_search_mcp::mcp::{
    GetFlightInfoHandler, GetTrainInfoHandler, McpServer, ToolHandler, ToolRegistry,
};
use trip_search_mcp::models::{
    FareClass, FlightListing, FlightQuery, SearchResult, TrainListing, TrainQuery,
};
use trip_search_mcp::sources::{MockSource, SourceCapabilities, SourceRegistry, TripSource};

fn as_sources(mocks: Vec<MockSource>) -> Arc<Vec<Arc<dyn TripSource>>> {
    Arc::new(
        mocks
            .into_iter()
            .map(|m| Arc::new(m) as Arc<dyn TripSource>)
            .collect(),
    )
}

fn response_text(value: &serde_json::Value) -> &str {
    value["content"][0]["text"].as_str().unwrap()
}

#[test]
fn registry_wires_up_the_expected_sources() {
    let registry = SourceRegistry::new(&Config::default());

    assert_eq!(registry.len(), 5);
    assert_eq!(registry.flight_sources().len(), 3);
    assert_eq!(registry.train_sources().len(), 2);
    assert_eq!(registry.preferred_train_source().unwrap().id(), "12306");
}

#[test]
fn tool_registry_exposes_flight_and_train_tools() {
    let registry = SourceRegistry::new(&Config::default());
    let tools = ToolRegistry::from_sources(&registry);

    assert_eq!(tools.all().len(), 2);

    let flight = tools.get("getFlightInfo").expect("flight tool registered");
    assert_eq!(
        flight.input_schema["required"],
        json!(["from", "to", "date"])
    );
    assert_eq!(flight.input_schema["properties"]["date"]["type"], "string");

    let train = tools.get("getTrainInfo").expect("train tool registered");
    assert_eq!(
        train.input_schema["required"],
        json!(["depStation", "arrStation", "depDate"])
    );
}

#[test]
fn mcp_server_builds_from_the_default_registry() {
    let registry = SourceRegistry::new(&Config::default());
    assert!(McpServer::new(Arc::new(registry)).is_ok());
}

#[tokio::test]
async fn flight_tool_aggregates_sections_from_every_source() {
    let ctrip = MockSource::new("mock_ctrip", SourceCapabilities::FLIGHT_SEARCH);
    ctrip.set_flight_result(SearchResult::new(
        vec![FlightListing {
            airline_name: "东方航空".to_string(),
            flight_no: "MU5101".to_string(),
            depart_time: "07:30".to_string(),
            arrive_time: "09:45".to_string(),
            price: "¥1250".to_string(),
            ..Default::default()
        }],
        "https://mock.test/ctrip",
    ));
    let qunar = MockSource::new("mock_qunar", SourceCapabilities::FLIGHT_SEARCH);
    qunar.set_flight_result(SearchResult::new(Vec::new(), "https://mock.test/qunar"));

    let handler = GetFlightInfoHandler {
        sources: as_sources(vec![ctrip, qunar]),
    };
    let response = handler
        .execute(json!({"from": "上海", "to": "北京", "date": "2024-05-01"}))
        .await
        .unwrap();

    let text = response_text(&response);
    // One section per source, each citing its own page.
    assert!(text.contains("| 东方航空 | MU5101 |"));
    assert!(text.contains("Source: https://mock.test/ctrip"));
    assert!(text.contains("No flights found."));
    assert!(text.contains("Source: https://mock.test/qunar"));
    // Empty extracted fields render as "-" so rows stay aligned.
    assert!(text.contains("| - | ¥1250 | No |"));
}

#[tokio::test]
async fn flight_tool_fails_when_any_source_fails() {
    let ok = MockSource::new("ok", SourceCapabilities::FLIGHT_SEARCH);
    ok.set_flight_result(SearchResult::new(Vec::new(), "https://mock.test/ok"));
    let broken = MockSource::new("broken", SourceCapabilities::FLIGHT_SEARCH);
    broken.fail_with("WebDriver session ended unexpectedly");

    let handler = GetFlightInfoHandler {
        sources: as_sources(vec![ok, broken]),
    };
    let result = handler
        .execute(json!({"from": "上海", "to": "北京", "date": "2024-05-01"}))
        .await;

    let err = result.unwrap_err();
    assert!(err.contains("WebDriver session ended unexpectedly"));
}

#[tokio::test]
async fn flight_tool_validates_arguments_before_searching() {
    let handler = GetFlightInfoHandler {
        sources: as_sources(vec![]),
    };

    let missing = handler
        .execute(json!({"from": "上海", "date": "2024-05-01"}))
        .await;
    assert_eq!(missing.unwrap_err(), "Missing 'to' parameter");

    let bad_date = handler
        .execute(json!({"from": "上海", "to": "北京", "date": "May 1st"}))
        .await;
    assert!(bad_date.unwrap_err().contains("May 1st"));
}

#[tokio::test]
async fn train_tool_renders_fares_with_placeholders() {
    let rail = MockSource::new("12306", SourceCapabilities::TRAIN_SEARCH);
    rail.set_train_result(SearchResult::new(
        vec![TrainListing {
            train_no: "G102".to_string(),
            start_station: "北京南".to_string(),
            end_station: "上海虹桥".to_string(),
            start_time: "06:43".to_string(),
            end_time: "12:38".to_string(),
            duration: "5:55".to_string(),
            fares: vec![
                FareClass {
                    price: "¥553".to_string(),
                    tickets_left: "有".to_string(),
                },
                FareClass {
                    price: String::new(),
                    tickets_left: "-".to_string(),
                },
            ],
        }],
        "https://kyfw.12306.cn/otn/leftTicket/init",
    ));

    let handler = GetTrainInfoHandler {
        sources: as_sources(vec![rail]),
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
    assert!(text.contains("| G102 | 北京南 | 上海虹桥 | 06:43 | 12:38 | 5:55 | ¥553 (有) | - |"));
    assert!(text.contains("Source: https://kyfw.12306.cn/otn/leftTicket/init"));
}

#[tokio::test]
async fn train_tool_requires_a_train_capable_source() {
    let flights_only = MockSource::new("flights", SourceCapabilities::FLIGHT_SEARCH);

    let handler = GetTrainInfoHandler {
        sources: as_sources(vec![flights_only]),
    };
    let result = handler
        .execute(json!({
            "depStation": "北京",
            "arrStation": "上海",
            "depDate": "2024-05-01"
        }))
        .await;

    assert_eq!(result.unwrap_err(), "No train search sources available");
}

#[tokio::test]
async fn tool_registry_executes_by_name() {
    let registry = SourceRegistry::new(&Config::default());
    let tools = ToolRegistry::from_sources(&registry);

    // Unknown tool
    let err = tools.execute("getBusInfo", json!({})).await.unwrap_err();
    assert!(err.contains("not found"));

    // Known tool with bad arguments fails in the handler, not the registry.
    let err = tools.execute("getFlightInfo", json!({})).await.unwrap_err();
    assert_eq!(err, "Missing 'from' parameter");
}

#[test]
fn query_validation_matches_the_tool_contract() {
    assert!(FlightQuery::new("上海", "北京", "2024-05-01").validate().is_ok());
    assert!(FlightQuery::new("上海", "北京", "2024-5-1").validate().is_err());
    assert!(FlightQuery::new("", "北京", "2024-05-01").validate().is_err());

    assert!(TrainQuery::new("北京", "上海", "2024-05-01").validate().is_ok());
    assert!(TrainQuery::new("北京", "", "2024-05-01").validate().is_err());
}
