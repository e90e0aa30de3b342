//! Forecast data model
//!
//! Typed view of a wttr.in `?format=j1` document. Construction is pure: the
//! same document, unit system and locale always produce the same forecast.
//!
//! Payload values arrive as strings (`"temp_C": "2"`), are selected by unit
//! suffix and, for descriptions, by locale. Every required field that is
//! missing or unparsable fails the whole build with a [`PayloadError`] naming
//! its JSON path. The only tolerated gaps are astronomy times, which wttr.in
//! replaces with text such as `"No moonrise"` during polar day and night.

use std::fmt;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::enums::{HeatIndex, Kind, Locale, Phase, UltraViolet, WindDirection};
use crate::error::PayloadError;
use crate::units::UnitSystem;

/// Query echoed back in `request[]` when the caller asked by coordinates
#[allow(clippy::expect_used)]
static LATLON_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Lat (-?[\d.]+) and Lon (-?[\d.]+)$").expect("lat/lon pattern is valid")
});

/// Hourly entries spell these keys differently from current conditions
const HOURLY_ALIASES: &[(&str, &str)] = &[("temp_C", "tempC"), ("temp_F", "tempF")];

const DATE_FORMAT: &str = "%Y-%m-%d";
const OBSERVATION_FORMAT: &str = "%Y-%m-%d %I:%M %p";
const ASTRONOMY_FORMAT: &str = "%I:%M %p";

/// Read-only lookup over one JSON object, tracking its path for errors
///
/// Aliases map a canonical key to the spelling a particular block uses, so
/// shared parsing code can read `temp_C` from an hourly entry that only has
/// `tempC` without touching the source document.
struct Fields<'a> {
    map: &'a Map<String, Value>,
    path: String,
    aliases: &'static [(&'static str, &'static str)],
}

impl<'a> Fields<'a> {
    fn new(value: &'a Value, path: impl Into<String>) -> Result<Self, PayloadError> {
        let path = path.into();
        match value.as_object() {
            Some(map) => Ok(Self {
                map,
                path,
                aliases: &[],
            }),
            None => Err(PayloadError::invalid(path, "expected an object")),
        }
    }

    fn with_aliases(self, aliases: &'static [(&'static str, &'static str)]) -> Self {
        Self { aliases, ..self }
    }

    fn path_of(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    /// Attach this object's path to an error raised by a value constructor
    fn locate(&self, err: PayloadError) -> PayloadError {
        match err {
            PayloadError::InvalidValue { path, reason } => PayloadError::InvalidValue {
                path: self.path_of(&path),
                reason,
            },
            other => other,
        }
    }

    fn get(&self, key: &str) -> Result<&'a Value, PayloadError> {
        self.map
            .get(key)
            .or_else(|| {
                self.aliases
                    .iter()
                    .find(|(canonical, _)| *canonical == key)
                    .and_then(|(_, source)| self.map.get(*source))
            })
            .ok_or_else(|| PayloadError::missing(self.path_of(key)))
    }

    fn str(&self, key: &str) -> Result<&'a str, PayloadError> {
        self.get(key)?
            .as_str()
            .ok_or_else(|| PayloadError::invalid(self.path_of(key), "expected a string"))
    }

    fn int<T: TryFrom<i64>>(&self, key: &str) -> Result<T, PayloadError> {
        let value = self.get(key)?;
        let raw = match value {
            Value::String(s) => s.trim().parse::<i64>().ok(),
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
        .ok_or_else(|| {
            PayloadError::invalid(self.path_of(key), format!("expected an integer, got {value}"))
        })?;

        T::try_from(raw)
            .map_err(|_| PayloadError::invalid(self.path_of(key), format!("{raw} is out of range")))
    }

    fn float(&self, key: &str) -> Result<f64, PayloadError> {
        let value = self.get(key)?;
        match value {
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
        .ok_or_else(|| {
            PayloadError::invalid(self.path_of(key), format!("expected a number, got {value}"))
        })
    }

    fn array(&self, key: &str) -> Result<Vec<Fields<'a>>, PayloadError> {
        let path = self.path_of(key);
        let items = self
            .get(key)?
            .as_array()
            .ok_or_else(|| PayloadError::invalid(path.clone(), "expected an array"))?;

        items
            .iter()
            .enumerate()
            .map(|(i, item)| Fields::new(item, format!("{path}[{i}]")))
            .collect()
    }

    fn first(&self, key: &str) -> Result<Fields<'a>, PayloadError> {
        self.array(key)?
            .into_iter()
            .next()
            .ok_or_else(|| PayloadError::missing(format!("{}[0]", self.path_of(key))))
    }

    /// `key[0].value`, the shape wttr.in uses for every text field
    fn first_value(&self, key: &str) -> Result<&'a str, PayloadError> {
        self.first(key)?.str("value")
    }
}

/// Latitude / longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Conditions shared by the current snapshot and every hourly forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseFields {
    /// UV index and its exposure band
    pub ultraviolet: UltraViolet,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    pub wind_direction: WindDirection,
    pub kind: Kind,
    /// Raw wttr.in weather code behind `kind`
    pub weather_code: u16,
    /// Apparent temperature in °C or °F
    pub feels_like: i32,
    /// Temperature in °C or °F
    pub temperature: i32,
    /// Precipitation in millimeters or inches
    pub precipitation: f64,
    /// Pressure in millibars or inches of mercury
    pub pressure: f64,
    /// Visibility in kilometers or miles
    pub visibility: u32,
    /// Wind speed in km/h or mph
    pub wind_speed: u32,
    /// Localized, trimmed description
    pub description: String,
}

impl BaseFields {
    fn parse(fields: &Fields<'_>, unit: UnitSystem, locale: Locale) -> Result<Self, PayloadError> {
        let temp = unit.temperature_suffix();

        let weather_code: u16 = fields.int("weatherCode")?;
        let kind = Kind::from_code(i64::from(weather_code))?;

        let wind_direction =
            WindDirection::new(fields.str("winddir16Point")?, fields.int("winddirDegree")?)
                .map_err(|e| fields.locate(e))?;

        let ultraviolet = UltraViolet::new(fields.int("uvIndex")?).map_err(|e| fields.locate(e))?;

        Ok(Self {
            ultraviolet,
            humidity: fields.int("humidity")?,
            wind_direction,
            kind,
            weather_code,
            feels_like: fields.int(&format!("FeelsLike{temp}"))?,
            temperature: fields.int(&format!("temp_{temp}"))?,
            precipitation: fields.float(&format!("precip{}", unit.precipitation_suffix()))?,
            pressure: fields.float(&format!("pressure{}", unit.pressure_suffix()))?,
            visibility: fields.int(&format!("visibility{}", unit.visibility_suffix()))?,
            wind_speed: fields.int(&format!("windspeed{}", unit.velocity_suffix()))?,
            description: fields
                .first_value(&locale.description_key())?
                .trim()
                .to_string(),
        })
    }
}

/// Forecast for one hour bucket of a day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyForecast {
    pub conditions: BaseFields,
    pub chances_of_fog: u8,
    pub chances_of_frost: u8,
    pub chances_of_high_temperature: u8,
    pub chances_of_overcast: u8,
    pub chances_of_rain: u8,
    pub chances_of_remaining_dry: u8,
    pub chances_of_snow: u8,
    pub chances_of_sunshine: u8,
    pub chances_of_thunder: u8,
    pub chances_of_windy: u8,
    /// Cloud cover percentage (0-100)
    pub cloud_cover: u8,
    /// Local clock time of the bucket
    pub time: NaiveTime,
    pub dew_point: i32,
    pub heat_index: HeatIndex,
    pub wind_chill: i32,
    /// Wind gust speed in km/h or mph
    pub wind_gust: u32,
}

impl HourlyForecast {
    fn parse(fields: &Fields<'_>, unit: UnitSystem, locale: Locale) -> Result<Self, PayloadError> {
        let temp = unit.temperature_suffix();

        let raw_time = fields.str("time")?;
        let time = parse_clock_time(raw_time).ok_or_else(|| {
            PayloadError::invalid(fields.path_of("time"), format!("{raw_time:?} is not HHMM"))
        })?;

        Ok(Self {
            conditions: BaseFields::parse(fields, unit, locale)?,
            chances_of_fog: fields.int("chanceoffog")?,
            chances_of_frost: fields.int("chanceoffrost")?,
            chances_of_high_temperature: fields.int("chanceofhightemp")?,
            chances_of_overcast: fields.int("chanceofovercast")?,
            chances_of_rain: fields.int("chanceofrain")?,
            chances_of_remaining_dry: fields.int("chanceofremdry")?,
            chances_of_snow: fields.int("chanceofsnow")?,
            chances_of_sunshine: fields.int("chanceofsunshine")?,
            chances_of_thunder: fields.int("chanceofthunder")?,
            chances_of_windy: fields.int("chanceofwindy")?,
            cloud_cover: fields.int("cloudcover")?,
            time,
            dew_point: fields.int(&format!("DewPoint{temp}"))?,
            heat_index: HeatIndex::new(
                fields.int("HeatIndexC")?,
                fields.int(&format!("HeatIndex{temp}"))?,
            ),
            wind_chill: fields.int(&format!("WindChill{temp}"))?,
            wind_gust: fields.int(&format!("WindGust{}", unit.velocity_suffix()))?,
        })
    }
}

impl fmt::Display for HourlyForecast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}° {} ({})",
            self.time.format("%H:%M"),
            self.conditions.temperature,
            self.conditions.description,
            self.conditions.kind
        )
    }
}

/// Forecast and astronomy for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecast {
    /// Percentage of the moon illuminated
    pub moon_illumination: u8,
    pub moon_phase: Phase,
    /// `None` when the moon does not rise that day
    pub moonrise: Option<NaiveTime>,
    pub moonset: Option<NaiveTime>,
    /// `None` during polar night or day
    pub sunrise: Option<NaiveTime>,
    pub sunset: Option<NaiveTime>,
    pub date: NaiveDate,
    /// Hours of sunlight
    pub sunlight: f64,
    pub lowest_temperature: i32,
    pub highest_temperature: i32,
    /// Average temperature
    pub temperature: i32,
    /// Total snowfall in centimeters or inches
    pub snowfall: f64,
    /// Hour buckets in the order reported
    pub hourly_forecasts: Vec<HourlyForecast>,
}

impl DailyForecast {
    fn parse(fields: &Fields<'_>, unit: UnitSystem, locale: Locale) -> Result<Self, PayloadError> {
        let temp = unit.temperature_suffix();
        let astronomy = fields.first("astronomy")?;

        let raw_date = fields.str("date")?;
        let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT).map_err(|e| {
            PayloadError::invalid(fields.path_of("date"), format!("{raw_date:?}: {e}"))
        })?;

        let hourly_forecasts = fields
            .array("hourly")?
            .into_iter()
            .map(|hour| HourlyForecast::parse(&hour.with_aliases(HOURLY_ALIASES), unit, locale))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            moon_illumination: astronomy.int("moon_illumination")?,
            moon_phase: Phase::from_name(astronomy.str("moon_phase")?)?,
            moonrise: parse_astronomy_time(astronomy.str("moonrise")?),
            moonset: parse_astronomy_time(astronomy.str("moonset")?),
            sunrise: parse_astronomy_time(astronomy.str("sunrise")?),
            sunset: parse_astronomy_time(astronomy.str("sunset")?),
            date,
            sunlight: fields.float("sunHour")?,
            lowest_temperature: fields.int(&format!("mintemp{temp}"))?,
            highest_temperature: fields.int(&format!("maxtemp{temp}"))?,
            temperature: fields.int(&format!("avgtemp{temp}"))?,
            snowfall: fields.float("totalSnow_cm")? / unit.cm_divisor(),
            hourly_forecasts,
        })
    }

    /// Number of hour buckets
    #[must_use]
    pub fn len(&self) -> usize {
        self.hourly_forecasts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hourly_forecasts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HourlyForecast> {
        self.hourly_forecasts.iter()
    }
}

impl<'a> IntoIterator for &'a DailyForecast {
    type Item = &'a HourlyForecast;
    type IntoIter = std::slice::Iter<'a, HourlyForecast>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for DailyForecast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} avg {}° (low {}°, high {}°)",
            self.date, self.temperature, self.lowest_temperature, self.highest_temperature
        )
    }
}

/// Current conditions plus daily and hourly forecasts for one location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    /// Conditions at observation time
    pub current: BaseFields,
    pub local_population: u64,
    pub region: String,
    /// Name of the nearest area wttr.in resolved the query to
    pub location: String,
    pub country: String,
    /// Local observation date and time
    pub datetime: NaiveDateTime,
    pub coordinates: Coordinates,
    /// Days in the order reported
    pub daily_forecasts: Vec<DailyForecast>,
}

impl Forecast {
    /// Number of forecast days
    #[must_use]
    pub fn len(&self) -> usize {
        self.daily_forecasts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.daily_forecasts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DailyForecast> {
        self.daily_forecasts.iter()
    }
}

impl<'a> IntoIterator for &'a Forecast {
    type Item = &'a DailyForecast;
    type IntoIter = std::slice::Iter<'a, DailyForecast>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Forecast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} at {}: {}° {} ({})",
            self.location,
            self.country,
            self.datetime.format("%Y-%m-%d %H:%M"),
            self.current.temperature,
            self.current.description,
            self.current.kind
        )
    }
}

/// Build a [`Forecast`] from a wttr.in `?format=j1` document
///
/// # Errors
///
/// Returns a [`PayloadError`] naming the first field that is missing, has the
/// wrong type, or holds a value outside its known set.
pub fn build_forecast(
    raw: &Value,
    unit: UnitSystem,
    locale: Locale,
) -> Result<Forecast, PayloadError> {
    let root = Fields::new(raw, "")?;
    let current = root.first("current_condition")?;
    let nearest = root.first("nearest_area")?;

    let raw_datetime = current.str("localObsDateTime")?;
    let datetime = NaiveDateTime::parse_from_str(raw_datetime, OBSERVATION_FORMAT).map_err(|e| {
        PayloadError::invalid(
            current.path_of("localObsDateTime"),
            format!("{raw_datetime:?}: {e}"),
        )
    })?;

    let coordinates = match requested_coordinates(raw) {
        Some(coordinates) => coordinates,
        None => Coordinates {
            latitude: nearest.float("latitude")?,
            longitude: nearest.float("longitude")?,
        },
    };

    let current = BaseFields::parse(&current, unit, locale)?;
    let daily_forecasts = root
        .array("weather")?
        .iter()
        .map(|day| DailyForecast::parse(day, unit, locale))
        .collect::<Result<Vec<_>, _>>()?;

    let forecast = Forecast {
        current,
        local_population: nearest.int("population")?,
        region: nearest.first_value("region")?.to_string(),
        location: nearest.first_value("areaName")?.to_string(),
        country: nearest.first_value("country")?.to_string(),
        datetime,
        coordinates,
        daily_forecasts,
    };

    debug!(
        location = %forecast.location,
        days = forecast.daily_forecasts.len(),
        unit = %unit,
        locale = %locale,
        "Built forecast"
    );

    Ok(forecast)
}

/// Coordinates echoed back by a `LatLon` request, if any
fn requested_coordinates(raw: &Value) -> Option<Coordinates> {
    let query = raw
        .get("request")?
        .as_array()?
        .iter()
        .find(|entry| entry.get("type").and_then(Value::as_str) == Some("LatLon"))?
        .get("query")?
        .as_str()?;

    let captures = LATLON_PATTERN.captures(query)?;
    Some(Coordinates {
        latitude: captures[1].parse().ok()?,
        longitude: captures[2].parse().ok()?,
    })
}

/// Parse an hourly `HHMM` clock value (`"0"`, `"900"`, `"1430"`)
///
/// Values shorter than three characters are midnight.
fn parse_clock_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    if raw.len() < 3 {
        return NaiveTime::from_hms_opt(0, 0, 0);
    }
    if raw.len() > 4 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let padded = format!("{raw:0>4}");
    let hour = padded[..2].parse().ok()?;
    let minute = padded[2..].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Parse an astronomy time such as `"07:12 AM"`
///
/// Anything else (`"No moonrise"`, `"No sunset"`) is an absent event, not a
/// malformed payload.
fn parse_astronomy_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), ASTRONOMY_FORMAT).ok()
}
