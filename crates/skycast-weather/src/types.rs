use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of daily entries in every normalized forecast.
pub const FORECAST_DAYS: usize = 16;

/// Weather categories as reported in the upstream `weather[].main` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WeatherCategory {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Smoke,
    Haze,
    Dust,
    Fog,
    Sand,
    Ash,
    Squall,
    Tornado,
    #[default]
    Unknown,
}

impl WeatherCategory {
    /// Parse the upstream category name. Unrecognized names map to `Unknown`.
    pub fn from_main(main: &str) -> Self {
        match main {
            "Clear" => Self::Clear,
            "Clouds" => Self::Clouds,
            "Rain" => Self::Rain,
            "Drizzle" => Self::Drizzle,
            "Thunderstorm" => Self::Thunderstorm,
            "Snow" => Self::Snow,
            "Mist" => Self::Mist,
            "Smoke" => Self::Smoke,
            "Haze" => Self::Haze,
            "Dust" => Self::Dust,
            "Fog" => Self::Fog,
            "Sand" => Self::Sand,
            "Ash" => Self::Ash,
            "Squall" => Self::Squall,
            "Tornado" => Self::Tornado,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Clouds => "Clouds",
            Self::Rain => "Rain",
            Self::Drizzle => "Drizzle",
            Self::Thunderstorm => "Thunderstorm",
            Self::Snow => "Snow",
            Self::Mist => "Mist",
            Self::Smoke => "Smoke",
            Self::Haze => "Haze",
            Self::Dust => "Dust",
            Self::Fog => "Fog",
            Self::Sand => "Sand",
            Self::Ash => "Ash",
            Self::Squall => "Squall",
            Self::Tornado => "Tornado",
            Self::Unknown => "Unknown",
        }
    }
}

/// One upstream measurement from the 3-hour interval forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Epoch seconds
    pub timestamp: i64,
    /// Degrees Celsius
    pub temperature: f64,
    pub category: WeatherCategory,
    pub description: String,
    pub icon: String,
    /// Percent, 0-100
    pub humidity: f64,
    /// Metres per second
    pub wind_speed: f64,
    /// 0.0-1.0 when reported
    pub precipitation_probability: Option<f64>,
}

/// One day of forecast, either decoded from a daily endpoint, aggregated
/// from 3-hourly samples, or synthesized by extrapolation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    /// Epoch seconds of the first sample of the day
    pub timestamp: i64,
    pub temp_max: f64,
    pub temp_min: f64,
    pub category: WeatherCategory,
    pub description: String,
    pub icon: String,
    /// Rounded percent. Extrapolated days may leave 0-100.
    pub humidity: i32,
    /// Metres per second. Extrapolated days may go negative.
    pub wind_speed: f64,
    /// 0.0-1.0
    pub precipitation_probability: f64,
}

/// Exactly [`FORECAST_DAYS`] daily entries, index 0 being today.
///
/// Only the normalizer constructs a series, so the length invariant holds
/// for every value of this type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSeries(Vec<DailySummary>);

impl ForecastSeries {
    pub(crate) fn new_unchecked(days: Vec<DailySummary>) -> Self {
        Self(days)
    }

    pub fn days(&self) -> &[DailySummary] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DailySummary> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DailySummary> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<DailySummary> {
        self.0
    }
}

impl<'a> IntoIterator for &'a ForecastSeries {
    type Item = &'a DailySummary;
    type IntoIter = std::slice::Iter<'a, DailySummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Which upstream forecast endpoint produced the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMode {
    NativeDaily,
    ThreeHourly,
}

/// Decoded forecast data awaiting normalization.
///
/// The variant is chosen by whichever endpoint answered, never by inspecting
/// the data itself.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastPayload {
    NativeDaily(Vec<DailySummary>),
    ThreeHourly(Vec<RawSample>),
}

impl ForecastPayload {
    pub fn mode(&self) -> ForecastMode {
        match self {
            Self::NativeDaily(_) => ForecastMode::NativeDaily,
            Self::ThreeHourly(_) => ForecastMode::ThreeHourly,
        }
    }
}

/// Geographic location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub city_name: Option<String>,
}

/// Current weather conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub location_name: String,
    pub country: Option<String>,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_max: f64,
    pub temp_min: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    /// Metres
    pub visibility: Option<f64>,
    pub category: WeatherCategory,
    pub description: String,
    pub icon: String,
}

/// Complete weather data bundle
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    pub location: Location,
    pub current: CurrentWeather,
    pub forecast: ForecastSeries,
    pub mode: ForecastMode,
    pub fetched_at: DateTime<Utc>,
}
