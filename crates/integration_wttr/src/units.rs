//! Measurement systems
//!
//! wttr.in reports every quantity twice, once per unit system, under keys
//! that differ only by suffix (`temp_C` / `temp_F`, `windspeedKmph` /
//! `windspeedMiles`, ...). [`UnitSystem`] knows which suffix to read.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unit system used to select fields from the wttr.in payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum UnitSystem {
    /// Celsius, millimeters, millibars, kilometers
    Metric,
    /// Fahrenheit, inches, miles
    Imperial,
}

impl UnitSystem {
    /// Resolve a unit system by name.
    ///
    /// Case-insensitive. Only `"imperial"` selects [`UnitSystem::Imperial`];
    /// every other value, including typos, padded names and the empty string,
    /// falls back to [`UnitSystem::Metric`].
    #[must_use]
    pub fn resolve(name: &str) -> Self {
        if name.eq_ignore_ascii_case("imperial") {
            Self::Imperial
        } else {
            Self::Metric
        }
    }

    /// Suffix of temperature keys (`temp_C`, `FeelsLikeF`, `maxtempC`, ...)
    #[must_use]
    pub const fn temperature_suffix(&self) -> &'static str {
        match self {
            Self::Metric => "C",
            Self::Imperial => "F",
        }
    }

    /// Suffix of the precipitation key (`precipMM` / `precipInches`)
    #[must_use]
    pub const fn precipitation_suffix(&self) -> &'static str {
        match self {
            Self::Metric => "MM",
            Self::Imperial => "Inches",
        }
    }

    /// Suffix of the pressure key (`pressure` / `pressureInches`)
    #[must_use]
    pub const fn pressure_suffix(&self) -> &'static str {
        match self {
            Self::Metric => "",
            Self::Imperial => "Inches",
        }
    }

    /// Suffix of the visibility key (`visibility` / `visibilityMiles`)
    #[must_use]
    pub const fn visibility_suffix(&self) -> &'static str {
        match self {
            Self::Metric => "",
            Self::Imperial => "Miles",
        }
    }

    /// Suffix of wind speed keys (`windspeedKmph`, `WindGustMiles`, ...)
    #[must_use]
    pub const fn velocity_suffix(&self) -> &'static str {
        match self {
            Self::Metric => "Kmph",
            Self::Imperial => "Miles",
        }
    }

    /// Divisor converting centimeters of snow into this system's length unit
    #[must_use]
    pub const fn cm_divisor(&self) -> f64 {
        match self {
            Self::Metric => 1.0,
            Self::Imperial => 2.54,
        }
    }
}

impl From<String> for UnitSystem {
    fn from(name: String) -> Self {
        Self::resolve(&name)
    }
}

impl From<&str> for UnitSystem {
    fn from(name: &str) -> Self {
        Self::resolve(name)
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "metric"),
            Self::Imperial => write!(f, "imperial"),
        }
    }
}
