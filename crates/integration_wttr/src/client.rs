//! wttr.in HTTP client
//!
//! Fetches `?format=j1` documents and turns them into [`Forecast`]s.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use crate::enums::Locale;
use crate::error::{PayloadError, WeatherError};
use crate::models::{Forecast, build_forecast};
use crate::retry::{RetryConfig, with_retry};
use crate::units::UnitSystem;

/// Placeholder in `base_url` replaced by the locale code
const LOCALE_PLACEHOLDER: &str = "{locale}";

/// wttr.in client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WttrConfig {
    /// Base URL; `{locale}` is replaced by the locale code (default: <https://{locale}.wttr.in>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Language for descriptions and the request subdomain (default: en)
    #[serde(default)]
    pub locale: Locale,

    /// Unit system used to read the payload (default: imperial)
    #[serde(default = "default_unit")]
    pub unit: UnitSystem,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Retry policy for HTTP status failures
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_base_url() -> String {
    format!("https://{LOCALE_PLACEHOLDER}.wttr.in")
}

const fn default_unit() -> UnitSystem {
    UnitSystem::Imperial
}

const fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:128.0) Gecko/20100101 Firefox/128.0".to_string()
}

impl Default for WttrConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            locale: Locale::default(),
            unit: default_unit(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            retry: RetryConfig::default(),
        }
    }
}

/// Weather client trait for fetching forecasts
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Get current conditions and the multi-day forecast for a location
    ///
    /// `location` is anything wttr.in accepts: a city name, an airport code,
    /// `~landmark`, `@domain` or `lat,lon`.
    async fn get_forecast(&self, location: &str) -> Result<Forecast, WeatherError>;
}

/// wttr.in HTTP client implementation
#[derive(Debug)]
pub struct WttrClient {
    client: Client,
    config: WttrConfig,
}

impl WttrClient {
    /// Create a new wttr.in client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: WttrConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| WeatherError::ClientInit(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, WeatherError> {
        Self::new(WttrConfig::default())
    }

    #[must_use]
    pub const fn config(&self) -> &WttrConfig {
        &self.config
    }

    /// Build the `?format=j1` URL for a location
    ///
    /// The location is form-encoded (`"New York"` becomes `New+York`). A
    /// leading `~` selects wttr.in's landmark lookup and stays literal.
    #[must_use]
    pub fn build_forecast_url(&self, location: &str) -> String {
        let base = self
            .config
            .base_url
            .replace(LOCALE_PLACEHOLDER, self.config.locale.code());
        let encoded = encode_location(location);

        format!("{}/{encoded}?format=j1", base.trim_end_matches('/'))
    }

    /// Perform a single GET and return the response body
    async fn fetch_once(&self, url: &str) -> Result<String, WeatherError> {
        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| WeatherError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .text()
                .await
                .map_err(|e| WeatherError::Transport(e.to_string()));
        }

        if status == StatusCode::NOT_FOUND {
            let body = response
                .text()
                .await
                .map_err(|e| WeatherError::Transport(e.to_string()))?;
            if !body.trim().is_empty() {
                warn!(url = %url, "wttr.in returned 404 with a body, parsing it anyway");
                return Ok(body);
            }
        }

        Err(WeatherError::HttpStatus {
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl WeatherClient for WttrClient {
    #[instrument(skip(self), fields(locale = %self.config.locale, unit = %self.config.unit))]
    async fn get_forecast(&self, location: &str) -> Result<Forecast, WeatherError> {
        let url = self.build_forecast_url(location);
        debug!(url = %url, "Fetching wttr.in forecast");

        let outcome = with_retry(&self.config.retry, || self.fetch_once(&url)).await;
        let attempts = outcome.attempts;

        let body = outcome.into_result().inspect_err(|e| {
            error!(attempts = attempts, error = %e, "Weather fetch failed");
        })?;

        let raw: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| PayloadError::InvalidJson(e.to_string()))?;

        let forecast = build_forecast(&raw, self.config.unit, self.config.locale)?;
        debug!(attempts = attempts, location = %forecast.location, "Fetched forecast");

        Ok(forecast)
    }
}

/// Form-encode a location path segment
///
/// Unreserved characters are `A-Z a-z 0-9 _ . - ~`, so `~` is kept and `*`
/// is escaped; space becomes `+`.
fn encode_location(location: &str) -> String {
    url::form_urlencoded::byte_serialize(location.as_bytes())
        .collect::<String>()
        .replace("%7E", "~")
        .replace('*', "%2A")
}
