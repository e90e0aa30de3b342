//! Closed value sets found in the wttr.in payload
//!
//! Every type here is built from a raw code or string. Unknown input is an
//! error, never a silent default: a sky code or moon phase outside the known
//! table means the payload is not what this crate understands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PayloadError, WeatherError};

// ==============================
// Sky condition
// ==============================

/// Sky condition derived from wttr.in (WWO) weather codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    /// Clear / sunny (113)
    Sunny,
    /// Partly cloudy (116)
    PartlyCloudy,
    /// Cloudy (119)
    Cloudy,
    /// Overcast (122)
    VeryCloudy,
    /// Mist, fog, freezing fog (143, 248, 260)
    Fog,
    /// Patchy or light rain showers (176, 263, 353)
    LightShowers,
    /// Light sleet showers (179, 362, 365, 374)
    LightSleetShowers,
    /// Light sleet and freezing drizzle (182, 185, 281, 284, 311, 314, 317, 350, 377)
    LightSleet,
    /// Thundery outbreaks (200, 386)
    ThunderyShowers,
    /// Light snow (227, 320)
    LightSnow,
    /// Blizzard and heavy snow (230, 329, 332, 338)
    HeavySnow,
    /// Light rain (266, 293, 296)
    LightRain,
    /// Heavy rain showers (299, 305, 356)
    HeavyShowers,
    /// Heavy rain (302, 308, 359)
    HeavyRain,
    /// Light snow showers (323, 326, 368)
    LightSnowShowers,
    /// Heavy snow showers (335, 371, 395)
    HeavySnowShowers,
    /// Thunder with heavy rain (389)
    ThunderyHeavyRain,
    /// Thunder with snow (392)
    ThunderySnowShowers,
}

impl Kind {
    /// Look up a wttr.in weather code
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::UnknownCode`] if the code is not in the table.
    pub fn from_code(code: i64) -> Result<Self, PayloadError> {
        let kind = match code {
            113 => Self::Sunny,
            116 => Self::PartlyCloudy,
            119 => Self::Cloudy,
            122 => Self::VeryCloudy,
            143 | 248 | 260 => Self::Fog,
            176 | 263 | 353 => Self::LightShowers,
            179 | 362 | 365 | 374 => Self::LightSleetShowers,
            182 | 185 | 281 | 284 | 311 | 314 | 317 | 350 | 377 => Self::LightSleet,
            200 | 386 => Self::ThunderyShowers,
            227 | 320 => Self::LightSnow,
            230 | 329 | 332 | 338 => Self::HeavySnow,
            266 | 293 | 296 => Self::LightRain,
            299 | 305 | 356 => Self::HeavyShowers,
            302 | 308 | 359 => Self::HeavyRain,
            323 | 326 | 368 => Self::LightSnowShowers,
            335 | 371 | 395 => Self::HeavySnowShowers,
            389 => Self::ThunderyHeavyRain,
            392 => Self::ThunderySnowShowers,
            _ => return Err(PayloadError::UnknownCode { code }),
        };
        Ok(kind)
    }

    /// Human-readable description
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Sunny => "Sunny",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Cloudy => "Cloudy",
            Self::VeryCloudy => "Very cloudy",
            Self::Fog => "Fog",
            Self::LightShowers => "Light showers",
            Self::LightSleetShowers => "Light sleet showers",
            Self::LightSleet => "Light sleet",
            Self::ThunderyShowers => "Thundery showers",
            Self::LightSnow => "Light snow",
            Self::HeavySnow => "Heavy snow",
            Self::LightRain => "Light rain",
            Self::HeavyShowers => "Heavy showers",
            Self::HeavyRain => "Heavy rain",
            Self::LightSnowShowers => "Light snow showers",
            Self::HeavySnowShowers => "Heavy snow showers",
            Self::ThunderyHeavyRain => "Thundery heavy rain",
            Self::ThunderySnowShowers => "Thundery snow showers",
        }
    }

    /// Emoji shown for this condition
    #[must_use]
    pub const fn emoji(&self) -> &'static str {
        match self {
            Self::Sunny => "☀️",
            Self::PartlyCloudy => "⛅️",
            Self::Cloudy | Self::VeryCloudy => "☁️",
            Self::Fog => "🌫",
            Self::LightShowers | Self::LightRain => "🌦",
            Self::LightSleet
            | Self::LightSleetShowers
            | Self::HeavyRain
            | Self::HeavyShowers => "🌧",
            Self::LightSnow | Self::LightSnowShowers => "🌨",
            Self::HeavySnow | Self::HeavySnowShowers => "❄️",
            Self::ThunderyHeavyRain => "🌩",
            Self::ThunderyShowers | Self::ThunderySnowShowers => "⛈",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

// ==============================
// Wind direction
// ==============================

/// One of the 16 compass points wttr.in reports in `winddir16Point`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassPoint {
    North,
    NorthNorthEast,
    NorthEast,
    EastNorthEast,
    East,
    EastSouthEast,
    SouthEast,
    SouthSouthEast,
    South,
    SouthSouthWest,
    SouthWest,
    WestSouthWest,
    West,
    WestNorthWest,
    NorthWest,
    NorthNorthWest,
}

impl CompassPoint {
    const ALL: [Self; 16] = [
        Self::North,
        Self::NorthNorthEast,
        Self::NorthEast,
        Self::EastNorthEast,
        Self::East,
        Self::EastSouthEast,
        Self::SouthEast,
        Self::SouthSouthEast,
        Self::South,
        Self::SouthSouthWest,
        Self::SouthWest,
        Self::WestSouthWest,
        Self::West,
        Self::WestNorthWest,
        Self::NorthWest,
        Self::NorthNorthWest,
    ];

    /// The compass label as wttr.in spells it
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::North => "N",
            Self::NorthNorthEast => "NNE",
            Self::NorthEast => "NE",
            Self::EastNorthEast => "ENE",
            Self::East => "E",
            Self::EastSouthEast => "ESE",
            Self::SouthEast => "SE",
            Self::SouthSouthEast => "SSE",
            Self::South => "S",
            Self::SouthSouthWest => "SSW",
            Self::SouthWest => "SW",
            Self::WestSouthWest => "WSW",
            Self::West => "W",
            Self::WestNorthWest => "WNW",
            Self::NorthWest => "NW",
            Self::NorthNorthWest => "NNW",
        }
    }

    /// Parse an exact compass label
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::UnknownDirection`] for anything else.
    pub fn from_label(label: &str) -> Result<Self, PayloadError> {
        Self::ALL
            .into_iter()
            .find(|point| point.label() == label)
            .ok_or_else(|| PayloadError::UnknownDirection {
                label: label.to_string(),
            })
    }
}

/// Arrows pointing where the wind blows to, indexed by octant from north
const WIND_ARROWS: [&str; 8] = ["↓", "↙", "←", "↖", "↑", "↗", "→", "↘"];

/// Wind direction: compass label plus the measured bearing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindDirection {
    /// Compass point reported by the source
    pub point: CompassPoint,
    /// Bearing in degrees, `0..360`
    pub degrees: u16,
}

impl WindDirection {
    /// Build a wind direction from the raw label and bearing
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::UnknownDirection`] for an unknown label and
    /// [`PayloadError::InvalidValue`] for a bearing outside `0..360`.
    pub fn new(label: &str, degrees: i64) -> Result<Self, PayloadError> {
        let point = CompassPoint::from_label(label)?;
        let degrees = u16::try_from(degrees)
            .ok()
            .filter(|d| *d < 360)
            .ok_or_else(|| {
                PayloadError::invalid("winddirDegree", format!("{degrees} is outside 0..360"))
            })?;
        Ok(Self { point, degrees })
    }

    /// The compass label, e.g. `"SSW"`
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.point.label()
    }

    /// Octant index (0 = N, 1 = NE, ... 7 = NW), each 45° wide and centred
    /// on its compass direction
    #[must_use]
    pub const fn octant(&self) -> usize {
        ((self.degrees as usize * 2 + 45) / 90) % 8
    }

    /// Arrow glyph for the bearing's octant
    #[must_use]
    pub const fn emoji(&self) -> &'static str {
        WIND_ARROWS[self.octant()]
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.label(), self.emoji())
    }
}

// ==============================
// Moon phase
// ==============================

/// Lunar phase reported in the astronomy block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl Phase {
    const ALL: [Self; 8] = [
        Self::NewMoon,
        Self::WaxingCrescent,
        Self::FirstQuarter,
        Self::WaxingGibbous,
        Self::FullMoon,
        Self::WaningGibbous,
        Self::LastQuarter,
        Self::WaningCrescent,
    ];

    /// Match the exact phase name used by wttr.in
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::UnknownPhase`] if no phase has this name.
    pub fn from_name(name: &str) -> Result<Self, PayloadError> {
        Self::ALL
            .into_iter()
            .find(|phase| phase.name() == name)
            .ok_or_else(|| PayloadError::UnknownPhase {
                name: name.to_string(),
            })
    }

    /// Canonical phase name, e.g. `"Waxing Gibbous"`
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NewMoon => "New Moon",
            Self::WaxingCrescent => "Waxing Crescent",
            Self::FirstQuarter => "First Quarter",
            Self::WaxingGibbous => "Waxing Gibbous",
            Self::FullMoon => "Full Moon",
            Self::WaningGibbous => "Waning Gibbous",
            Self::LastQuarter => "Last Quarter",
            Self::WaningCrescent => "Waning Crescent",
        }
    }

    #[must_use]
    pub const fn emoji(&self) -> &'static str {
        match self {
            Self::NewMoon => "🌑",
            Self::WaxingCrescent => "🌒",
            Self::FirstQuarter => "🌓",
            Self::WaxingGibbous => "🌔",
            Self::FullMoon => "🌕",
            Self::WaningGibbous => "🌖",
            Self::LastQuarter => "🌗",
            Self::WaningCrescent => "🌘",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ==============================
// Heat index
// ==============================

/// NWS heat index danger band, keyed on the Celsius index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatBand {
    /// 26 °C and below
    Safe,
    /// 27-32 °C
    Caution,
    /// 33-40 °C
    ExtremeCaution,
    /// 41-53 °C
    Danger,
    /// 54 °C and above
    ExtremeDanger,
}

impl HeatBand {
    #[must_use]
    pub const fn from_celsius(index: i32) -> Self {
        match index {
            i32::MIN..=26 => Self::Safe,
            27..=32 => Self::Caution,
            33..=40 => Self::ExtremeCaution,
            41..=53 => Self::Danger,
            _ => Self::ExtremeDanger,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::Caution => "Caution",
            Self::ExtremeCaution => "Extreme Caution",
            Self::Danger => "Danger",
            Self::ExtremeDanger => "Extreme Danger",
        }
    }
}

/// Heat index of an hourly forecast
///
/// The band always comes from the Celsius value; `value` is the index in the
/// requested unit system, carried through unconverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatIndex {
    pub band: HeatBand,
    pub celsius_index: i32,
    pub value: i32,
}

impl HeatIndex {
    #[must_use]
    pub const fn new(celsius_index: i32, value: i32) -> Self {
        Self {
            band: HeatBand::from_celsius(celsius_index),
            celsius_index,
            value,
        }
    }

    #[must_use]
    pub const fn band_name(&self) -> &'static str {
        self.band.name()
    }
}

// ==============================
// Ultra-violet index
// ==============================

/// WHO UV index exposure band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UvBand {
    /// 0-2
    Low,
    /// 3-5
    Moderate,
    /// 6-7
    High,
    /// 8-10
    VeryHigh,
    /// 11 and above
    Extreme,
}

impl UvBand {
    #[must_use]
    pub const fn from_index(index: u8) -> Self {
        match index {
            0..=2 => Self::Low,
            3..=5 => Self::Moderate,
            6..=7 => Self::High,
            8..=10 => Self::VeryHigh,
            _ => Self::Extreme,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
            Self::Extreme => "Extreme",
        }
    }
}

/// Ultra-violet index with its exposure band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UltraViolet {
    pub index: u8,
    pub band: UvBand,
}

impl UltraViolet {
    /// Band a raw UV index
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::InvalidValue`] for negative or absurdly large
    /// indices.
    pub fn new(index: i64) -> Result<Self, PayloadError> {
        let index = u8::try_from(index)
            .map_err(|_| PayloadError::invalid("uvIndex", format!("{index} is not a UV index")))?;
        Ok(Self {
            index,
            band: UvBand::from_index(index),
        })
    }

    #[must_use]
    pub const fn band_name(&self) -> &'static str {
        self.band.name()
    }
}

impl fmt::Display for UltraViolet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.band.name())
    }
}

// ==============================
// Locale
// ==============================

macro_rules! locales {
    ($($variant:ident => $code:literal),+ $(,)?) => {
        /// Languages wttr.in can localize descriptions into
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum Locale {
            #[default]
            English,
            $($variant,)+
        }

        impl Locale {
            /// Every supported locale, English first
            pub const ALL: &'static [Self] = &[Self::English, $(Self::$variant,)+];

            /// Language code used in the subdomain and the `lang_<code>` key
            #[must_use]
            pub const fn code(&self) -> &'static str {
                match self {
                    Self::English => "en",
                    $(Self::$variant => $code,)+
                }
            }
        }
    };
}

locales! {
    Afrikaans => "af",
    Arabic => "ar",
    Azerbaijani => "az",
    Belarusian => "be",
    Bulgarian => "bg",
    Bosnian => "bs",
    Catalan => "ca",
    Czech => "cs",
    Welsh => "cy",
    Danish => "da",
    German => "de",
    Greek => "el",
    Esperanto => "eo",
    Spanish => "es",
    Estonian => "et",
    Basque => "eu",
    Persian => "fa",
    Finnish => "fi",
    French => "fr",
    Frisian => "fy",
    Irish => "ga",
    Galician => "gl",
    Hebrew => "he",
    Hindi => "hi",
    Croatian => "hr",
    Hungarian => "hu",
    Armenian => "hy",
    Interlingua => "ia",
    Indonesian => "id",
    Icelandic => "is",
    Italian => "it",
    Japanese => "ja",
    Javanese => "jv",
    Georgian => "ka",
    Kazakh => "kk",
    Korean => "ko",
    Kyrgyz => "ky",
    Lithuanian => "lt",
    Latvian => "lv",
    Malagasy => "mg",
    Macedonian => "mk",
    Malayalam => "ml",
    Marathi => "mr",
    NorwegianBokmal => "nb",
    Dutch => "nl",
    NorwegianNynorsk => "nn",
    Occitan => "oc",
    Polish => "pl",
    Portuguese => "pt",
    BrazilianPortuguese => "pt-br",
    Romanian => "ro",
    Russian => "ru",
    Slovak => "sk",
    Slovenian => "sl",
    Serbian => "sr",
    SerbianLatin => "sr-lat",
    Swedish => "sv",
    Swahili => "sw",
    Tamil => "ta",
    Telugu => "te",
    Thai => "th",
    Turkish => "tr",
    Ukrainian => "uk",
    Uzbek => "uz",
    Vietnamese => "vi",
    Chinese => "zh",
    SimplifiedChinese => "zh-cn",
    TraditionalChinese => "zh-tw",
    Zulu => "zu",
}

impl Locale {
    /// Look up a locale by language code (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::UnknownLocale`] for codes wttr.in does not serve.
    pub fn from_code(code: &str) -> Result<Self, WeatherError> {
        let wanted = code.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|locale| locale.code() == wanted)
            .ok_or_else(|| WeatherError::UnknownLocale(code.to_string()))
    }

    #[must_use]
    pub const fn is_english(&self) -> bool {
        matches!(self, Self::English)
    }

    /// Payload key holding the weather description in this language
    #[must_use]
    pub fn description_key(&self) -> String {
        if self.is_english() {
            "weatherDesc".to_string()
        } else {
            format!("lang_{}", self.code())
        }
    }
}

impl FromStr for Locale {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = WeatherError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::from_code(&code)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.code().to_string()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
