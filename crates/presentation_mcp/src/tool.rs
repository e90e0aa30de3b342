//! The `get_current_weather` tool
//!
//! Validates tool arguments, fetches a forecast and flattens it into the
//! compact report returned to the MCP client.

use std::sync::Arc;

use integration_wttr::{DailyForecast, Forecast, WeatherClient, WeatherError};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Tool};
use rmcp::{tool, tool_router};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Name of the only tool this server exposes
pub const TOOL_NAME: &str = "get_current_weather";

/// Errors surfaced to the tool caller
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool is not served here
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments are not an object with a string `location_name`
    #[error("Invalid weather arguments: {0}")]
    InvalidArguments(String),

    /// Fetching or parsing the forecast failed
    #[error("Weather API error: {0}")]
    Execution(#[from] WeatherError),

    /// The report could not be rendered as JSON
    #[error("Failed to serialize weather report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Arguments of `get_current_weather`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct WeatherRequest {
    /// City, airport code, landmark (~Eiffel Tower) or lat,lon
    pub location_name: String,
}

/// Flattened forecast returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherReport {
    pub currently: CurrentReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentReport {
    pub current_temperature: i32,
    /// Sky condition glyph
    pub sky: String,
    pub feels_like: i32,
    pub humidity: u8,
    pub wind_speed: u32,
    /// Compass label followed by the arrow glyph, e.g. `SW↗`
    pub wind_direction: String,
    pub visibility: u32,
    /// UV exposure band name
    pub uv_index: String,
    pub description: String,
    pub forecasts: Vec<DailyReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyReport {
    /// `YYYY-MM-DD`
    pub date: String,
    pub high_temperature: i32,
    pub low_temperature: i32,
}

impl From<&DailyForecast> for DailyReport {
    fn from(day: &DailyForecast) -> Self {
        Self {
            date: day.date.format("%Y-%m-%d").to_string(),
            high_temperature: day.highest_temperature,
            low_temperature: day.lowest_temperature,
        }
    }
}

impl From<&Forecast> for WeatherReport {
    fn from(forecast: &Forecast) -> Self {
        let current = &forecast.current;
        Self {
            currently: CurrentReport {
                current_temperature: current.temperature,
                sky: current.kind.emoji().to_string(),
                feels_like: current.feels_like,
                humidity: current.humidity,
                wind_speed: current.wind_speed,
                wind_direction: current.wind_direction.to_string(),
                visibility: current.visibility,
                uv_index: current.ultraviolet.band_name().to_string(),
                description: current.description.clone(),
                forecasts: forecast.iter().map(DailyReport::from).collect(),
            },
        }
    }
}

/// Dispatches tool calls to the weather client
#[derive(Clone)]
pub struct WeatherToolHandler {
    client: Arc<dyn WeatherClient>,
    pub(crate) tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for WeatherToolHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherToolHandler").finish_non_exhaustive()
    }
}

#[tool_router]
impl WeatherToolHandler {
    pub fn new(client: Arc<dyn WeatherClient>) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Get current weather and forecast for a location")]
    async fn get_current_weather(
        &self,
        Parameters(request): Parameters<WeatherRequest>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        match self.report(&request.location_name).await {
            Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Err(e) => {
                warn!(location = %request.location_name, error = %e, "Tool call failed");
                Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
            },
        }
    }
}

impl WeatherToolHandler {
    /// Tools served by this handler
    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    /// Run a tool by name with raw JSON arguments
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] for an unknown tool, bad arguments, or a failed
    /// weather fetch.
    #[instrument(skip(self, arguments))]
    pub async fn call_tool(&self, name: &str, arguments: &Value) -> Result<String, ToolError> {
        if name != TOOL_NAME {
            return Err(ToolError::UnknownTool(name.to_string()));
        }

        let location = Self::location_name(arguments)?;
        self.report(location).await
    }

    /// Fetch a forecast and render it as a pretty-printed JSON report
    async fn report(&self, location: &str) -> Result<String, ToolError> {
        info!(location = %location, "Tool called: {TOOL_NAME}");

        let forecast = self.client.get_forecast(location).await?;
        let report = WeatherReport::from(&forecast);
        debug!(days = report.currently.forecasts.len(), "Built weather report");

        Ok(serde_json::to_string_pretty(&report)?)
    }

    fn location_name(arguments: &Value) -> Result<&str, ToolError> {
        let object = arguments.as_object().ok_or_else(|| {
            ToolError::InvalidArguments(format!("expected an object, got {arguments}"))
        })?;

        object
            .get("location_name")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ToolError::InvalidArguments("location_name must be a string".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use integration_wttr::{Locale, PayloadError, UnitSystem, build_forecast};
    use mockall::mock;
    use mockall::predicate::eq;
    use serde_json::json;

    mock! {
        pub Weather {}

        #[async_trait]
        impl WeatherClient for Weather {
            async fn get_forecast(&self, location: &str) -> Result<Forecast, WeatherError>;
        }
    }

    fn sample_forecast() -> Forecast {
        let raw: Value = serde_json::from_str(include_str!(
            "../../integration_wttr/tests/fixtures/berlin.json"
        ))
        .unwrap();
        build_forecast(&raw, UnitSystem::Imperial, Locale::English).unwrap()
    }

    fn handler(mock: MockWeather) -> WeatherToolHandler {
        WeatherToolHandler::new(Arc::new(mock))
    }

    #[test]
    fn lists_single_tool() {
        let tools = handler(MockWeather::new()).list_tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "get_current_weather");
        assert_eq!(
            tools[0].description.as_deref(),
            Some("Get current weather and forecast for a location")
        );
    }

    #[test]
    fn schema_requires_location_name() {
        let tools = handler(MockWeather::new()).list_tools();
        let schema = &tools[0].input_schema;
        assert_eq!(schema.get("type"), Some(&json!("object")));
        assert_eq!(schema.get("required"), Some(&json!(["location_name"])));
        assert_eq!(
            schema["properties"]["location_name"]["type"],
            json!("string")
        );
    }

    #[tokio::test]
    async fn tool_method_reports_failures_as_error_results() {
        let mut mock = MockWeather::new();
        mock.expect_get_forecast()
            .with(eq("Atlantis"))
            .returning(|_| Err(WeatherError::HttpStatus { status: 404 }));

        let result = handler(mock)
            .get_current_weather(Parameters(WeatherRequest {
                location_name: "Atlantis".to_string(),
            }))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        let text = result.content[0].raw.as_text().unwrap();
        assert_eq!(
            text.text,
            "Weather API error: Weather service returned HTTP 404"
        );
    }

    #[tokio::test]
    async fn tool_method_returns_report_text() {
        let mut mock = MockWeather::new();
        mock.expect_get_forecast()
            .returning(|_| Ok(sample_forecast()));

        let result = handler(mock)
            .get_current_weather(Parameters(WeatherRequest {
                location_name: "Berlin".to_string(),
            }))
            .await
            .unwrap();

        assert_ne!(result.is_error, Some(true));
        let text = &result.content[0].raw.as_text().unwrap().text;
        let report: Value = serde_json::from_str(text).unwrap();
        assert_eq!(report["currently"]["description"], "Overcast");
    }

    #[tokio::test]
    async fn unknown_tool_is_rejected() {
        let mut mock = MockWeather::new();
        mock.expect_get_forecast().never();

        let err = handler(mock)
            .call_tool("get_forecast", &json!({"location_name": "Berlin"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(ref name) if name == "get_forecast"));
        assert_eq!(err.to_string(), "Unknown tool: get_forecast");
    }

    #[tokio::test]
    async fn missing_location_is_rejected() {
        let mut mock = MockWeather::new();
        mock.expect_get_forecast().never();
        let handler = handler(mock);

        for arguments in [json!({}), json!({"location_name": 42}), json!("Berlin"), Value::Null] {
            let err = handler.call_tool(TOOL_NAME, &arguments).await.unwrap_err();
            assert!(
                matches!(err, ToolError::InvalidArguments(_)),
                "Expected InvalidArguments for {arguments}, got: {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn flattens_forecast() {
        let mut mock = MockWeather::new();
        mock.expect_get_forecast()
            .with(eq("Berlin"))
            .times(1)
            .returning(|_| Ok(sample_forecast()));

        let text = handler(mock)
            .call_tool(TOOL_NAME, &json!({"location_name": "Berlin"}))
            .await
            .unwrap();
        let report: Value = serde_json::from_str(&text).unwrap();
        let currently = &report["currently"];

        assert_eq!(currently["current_temperature"], 36);
        assert_eq!(currently["feels_like"], 28);
        assert_eq!(currently["humidity"], 87);
        assert_eq!(currently["wind_speed"], 11);
        assert_eq!(currently["visibility"], 6);
        assert_eq!(currently["sky"], "☁️");
        assert_eq!(currently["wind_direction"], "WSW↗");
        assert_eq!(currently["uv_index"], "Moderate");
        assert_eq!(currently["description"], "Overcast");
        assert_eq!(
            currently["forecasts"],
            json!([
                {"date": "2024-01-15", "high_temperature": 39, "low_temperature": 30},
                {"date": "2024-01-16", "high_temperature": 36, "low_temperature": 27},
                {"date": "2024-01-17", "high_temperature": 43, "low_temperature": 32}
            ])
        );
    }

    #[tokio::test]
    async fn report_is_pretty_printed() {
        let mut mock = MockWeather::new();
        mock.expect_get_forecast()
            .returning(|_| Ok(sample_forecast()));

        let text = handler(mock)
            .call_tool(TOOL_NAME, &json!({"location_name": "Berlin"}))
            .await
            .unwrap();
        assert!(text.starts_with("{\n  \"currently\": {"));
    }

    #[tokio::test]
    async fn empty_location_is_passed_through() {
        let mut mock = MockWeather::new();
        mock.expect_get_forecast()
            .with(eq(""))
            .times(1)
            .returning(|_| Ok(sample_forecast()));

        let result = handler(mock)
            .call_tool(TOOL_NAME, &json!({"location_name": ""}))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn fetch_errors_keep_their_message() {
        let mut mock = MockWeather::new();
        mock.expect_get_forecast().returning(|_| {
            Err(WeatherError::MalformedPayload(PayloadError::UnknownCode {
                code: 999,
            }))
        });

        let err = handler(mock)
            .call_tool(TOOL_NAME, &json!({"location_name": "Atlantis"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Execution(_)));
        assert_eq!(
            err.to_string(),
            "Weather API error: Malformed payload: Unknown weather code: 999"
        );
    }

    #[tokio::test]
    async fn status_errors_are_execution_errors() {
        let mut mock = MockWeather::new();
        mock.expect_get_forecast()
            .returning(|_| Err(WeatherError::HttpStatus { status: 503 }));

        let err = handler(mock)
            .call_tool(TOOL_NAME, &json!({"location_name": "Berlin"}))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Weather API error: Weather service returned HTTP 503"
        );
    }
}
