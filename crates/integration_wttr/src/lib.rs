//! wttr.in weather integration
//!
//! Client for the wttr.in JSON API (<https://wttr.in/:help>).
//! Turns the loosely typed `?format=j1` payload into a typed forecast model
//! covering current conditions, daily astronomy and hourly forecasts.

pub mod client;
pub mod enums;
mod error;
mod models;
pub mod retry;
pub mod units;

pub use client::{WeatherClient, WttrClient, WttrConfig};
pub use enums::{
    CompassPoint, HeatBand, HeatIndex, Kind, Locale, Phase, UltraViolet, UvBand, WindDirection,
};
pub use error::{PayloadError, WeatherError};
pub use models::{
    BaseFields, Coordinates, DailyForecast, Forecast, HourlyForecast, build_forecast,
};
pub use retry::RetryConfig;
pub use units::UnitSystem;
