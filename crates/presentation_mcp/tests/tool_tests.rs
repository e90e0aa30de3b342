//! End-to-end tests for the weather tool against a mocked wttr.in
//!
//! The real `WttrClient` talks to a wiremock server, so these cover the
//! whole path from tool arguments to the flattened report.

use std::sync::Arc;

use integration_wttr::{RetryConfig, UnitSystem, WttrClient, WttrConfig};
use presentation_mcp::{TOOL_NAME, ToolError, WeatherToolHandler};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn berlin_payload() -> Value {
    #[allow(clippy::expect_used)]
    serde_json::from_str(include_str!(
        "../../integration_wttr/tests/fixtures/berlin.json"
    ))
    .expect("fixture is valid JSON")
}

fn create_handler(mock_server: &MockServer, unit: UnitSystem) -> WeatherToolHandler {
    let config = WttrConfig {
        base_url: mock_server.uri(),
        unit,
        timeout_secs: 5,
        retry: RetryConfig::immediate(3),
        ..Default::default()
    };
    #[allow(clippy::expect_used)]
    let client = WttrClient::new(config).expect("Failed to create client");
    WeatherToolHandler::new(Arc::new(client))
}

async fn call_berlin(handler: &WeatherToolHandler) -> Result<Value, ToolError> {
    let text = handler
        .call_tool(TOOL_NAME, &json!({"location_name": "Berlin"}))
        .await?;
    Ok(serde_json::from_str(&text).unwrap())
}

#[tokio::test]
async fn test_forecasts_follow_payload_order() {
    let mock_server = MockServer::start().await;
    let payload = berlin_payload();
    let expected_dates: Vec<Value> = payload["weather"]
        .as_array()
        .unwrap()
        .iter()
        .map(|day| day["date"].clone())
        .collect();

    Mock::given(method("GET"))
        .and(path("/Berlin"))
        .and(query_param("format", "j1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .expect(1)
        .mount(&mock_server)
        .await;

    let handler = create_handler(&mock_server, UnitSystem::Imperial);
    let report = call_berlin(&handler).await.unwrap();

    let forecasts = report["currently"]["forecasts"].as_array().unwrap();
    assert_eq!(forecasts.len(), expected_dates.len());
    let dates: Vec<Value> = forecasts.iter().map(|f| f["date"].clone()).collect();
    assert_eq!(dates, expected_dates);
}

#[tokio::test]
async fn test_report_fields_imperial() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Berlin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(berlin_payload()))
        .mount(&mock_server)
        .await;

    let handler = create_handler(&mock_server, UnitSystem::Imperial);
    let report = call_berlin(&handler).await.unwrap();

    assert_eq!(
        report,
        json!({
            "currently": {
                "current_temperature": 36,
                "sky": "☁️",
                "feels_like": 28,
                "humidity": 87,
                "wind_speed": 11,
                "wind_direction": "WSW↗",
                "visibility": 6,
                "uv_index": "Moderate",
                "description": "Overcast",
                "forecasts": [
                    {"date": "2024-01-15", "high_temperature": 39, "low_temperature": 30},
                    {"date": "2024-01-16", "high_temperature": 36, "low_temperature": 27},
                    {"date": "2024-01-17", "high_temperature": 43, "low_temperature": 32}
                ]
            }
        })
    );
}

#[tokio::test]
async fn test_report_fields_metric() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Berlin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(berlin_payload()))
        .mount(&mock_server)
        .await;

    let handler = create_handler(&mock_server, UnitSystem::Metric);
    let report = call_berlin(&handler).await.unwrap();
    let currently = &report["currently"];

    assert_eq!(currently["current_temperature"], 2);
    assert_eq!(currently["feels_like"], -2);
    assert_eq!(currently["wind_speed"], 17);
    assert_eq!(currently["visibility"], 10);
    assert_eq!(currently["wind_direction"], "WSW↗");
    assert_eq!(currently["forecasts"][0]["high_temperature"], 4);
    assert_eq!(currently["forecasts"][0]["low_temperature"], -1);
}

#[tokio::test]
async fn test_two_server_errors_then_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Berlin"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Berlin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(berlin_payload()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let handler = create_handler(&mock_server, UnitSystem::Imperial);
    let report = call_berlin(&handler).await;

    assert!(report.is_ok(), "Expected success, got: {report:?}");
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_not_found_with_body_single_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Berlin"))
        .respond_with(ResponseTemplate::new(404).set_body_json(berlin_payload()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let handler = create_handler(&mock_server, UnitSystem::Imperial);
    let report = call_berlin(&handler).await.unwrap();

    assert_eq!(report["currently"]["description"], "Overcast");
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_exhausted_retries_surface_as_execution_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Berlin"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&mock_server)
        .await;

    let handler = create_handler(&mock_server, UnitSystem::Imperial);
    let err = call_berlin(&handler).await.unwrap_err();

    assert!(matches!(err, ToolError::Execution(_)));
    assert_eq!(
        err.to_string(),
        "Weather API error: Weather service returned HTTP 502"
    );
}

#[tokio::test]
async fn test_invalid_arguments_make_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(berlin_payload()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let handler = create_handler(&mock_server, UnitSystem::Imperial);
    let err = handler
        .call_tool(TOOL_NAME, &json!({"city": "Berlin"}))
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::InvalidArguments(_)));
}
