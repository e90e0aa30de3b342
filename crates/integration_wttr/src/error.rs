//! Weather integration error types

use thiserror::Error;

/// The weather payload did not match the expected shape
///
/// Never retried: fetching the same document again will not fix it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// Response body is not a JSON document
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// A required key is absent or has the wrong JSON type
    #[error("Missing field: {path}")]
    MissingField {
        /// JSON path of the field, e.g. `weather[0].hourly[3].time`
        path: String,
    },

    /// A field is present but its value cannot be converted
    #[error("Invalid value at {path}: {reason}")]
    InvalidValue {
        /// JSON path of the field
        path: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Sky condition code outside the known table
    #[error("Unknown weather code: {code}")]
    UnknownCode {
        /// The raw code
        code: i64,
    },

    /// Moon phase name outside the eight known phases
    #[error("Unknown moon phase: {name:?}")]
    UnknownPhase {
        /// The raw phase name
        name: String,
    },

    /// Compass label outside the 16 known points
    #[error("Unknown wind direction: {label:?}")]
    UnknownDirection {
        /// The raw label
        label: String,
    },
}

impl PayloadError {
    pub(crate) fn missing(path: impl Into<String>) -> Self {
        Self::MissingField { path: path.into() }
    }

    pub(crate) fn invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The HTTP client could not be built
    #[error("Failed to initialize HTTP client: {0}")]
    ClientInit(String),

    /// Locale code not served by wttr.in
    #[error("Unknown locale: {0}")]
    UnknownLocale(String),

    /// Network failure reaching the weather service (connect, timeout, body read)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The weather service answered with an error status
    #[error("Weather service returned HTTP {status}")]
    HttpStatus {
        /// HTTP status code of the last attempt
        status: u16,
    },

    /// The weather service returned an unusable document
    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] PayloadError),
}

impl WeatherError {
    /// Returns true if the request should be attempted again
    ///
    /// Only status failures are transient; network errors and malformed
    /// payloads fail immediately.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::HttpStatus { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_status_errors_are_retryable() {
        assert!(WeatherError::HttpStatus { status: 500 }.is_retryable());
        assert!(WeatherError::HttpStatus { status: 429 }.is_retryable());
        assert!(!WeatherError::Transport("connection refused".to_string()).is_retryable());
        assert!(!WeatherError::MalformedPayload(PayloadError::missing("weather")).is_retryable());
        assert!(!WeatherError::UnknownLocale("xx".to_string()).is_retryable());
    }

    #[test]
    fn payload_error_messages_name_the_field() {
        let err = PayloadError::missing("weather[0].hourly[2].time");
        assert_eq!(err.to_string(), "Missing field: weather[0].hourly[2].time");

        let err = PayloadError::invalid("current_condition[0].humidity", "expected an integer");
        assert_eq!(
            err.to_string(),
            "Invalid value at current_condition[0].humidity: expected an integer"
        );
    }

    #[test]
    fn unknown_code_is_a_malformed_payload() {
        let err: WeatherError = PayloadError::UnknownCode { code: 999 }.into();
        assert!(matches!(
            err,
            WeatherError::MalformedPayload(PayloadError::UnknownCode { code: 999 })
        ));
        assert_eq!(err.to_string(), "Malformed payload: Unknown weather code: 999");
    }

    #[test]
    fn status_error_message() {
        let err = WeatherError::HttpStatus { status: 503 };
        assert_eq!(err.to_string(), "Weather service returned HTTP 503");
    }
}
