//! OpenWeatherMap response shapes and their conversion into domain types.
//!
//! Numeric fields are optional on the wire so that one bad entry can be
//! skipped instead of failing the whole response. An entry missing any
//! required number is dropped with a warning. Decoding only fails when a
//! non-empty list loses every entry this way.

use serde::Deserialize;

use crate::error::ForecastError;
use crate::types::{CurrentWeather, DailySummary, Location, RawSample, WeatherCategory};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherDescriptor {
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

impl WeatherDescriptor {
    fn category(&self) -> WeatherCategory {
        WeatherCategory::from_main(&self.main)
    }
}

fn first_descriptor(weather: &[WeatherDescriptor]) -> WeatherDescriptor {
    weather.first().cloned().unwrap_or_default()
}

// 3-hourly forecast: GET /forecast

#[derive(Debug, Deserialize)]
pub struct ThreeHourlyResponse {
    #[serde(default)]
    pub list: Vec<ThreeHourlyEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ThreeHourlyEntry {
    pub dt: Option<i64>,
    pub main: Option<MainBlock>,
    #[serde(default)]
    pub weather: Vec<WeatherDescriptor>,
    pub wind: Option<WindBlock>,
    pub pop: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct MainBlock {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct WindBlock {
    pub speed: Option<f64>,
}

impl ThreeHourlyEntry {
    fn into_sample(self) -> Result<RawSample, String> {
        let timestamp = self.dt.ok_or("missing dt")?;
        let main = self.main.ok_or("missing main")?;
        let temperature = main.temp.ok_or("missing main.temp")?;
        let humidity = main.humidity.ok_or("missing main.humidity")?;
        let wind_speed = self
            .wind
            .and_then(|w| w.speed)
            .ok_or("missing wind.speed")?;
        let weather = first_descriptor(&self.weather);

        Ok(RawSample {
            timestamp,
            temperature,
            category: weather.category(),
            description: weather.description,
            icon: weather.icon,
            humidity,
            wind_speed,
            precipitation_probability: self.pop,
        })
    }
}

impl ThreeHourlyResponse {
    pub fn into_samples(self) -> Result<Vec<RawSample>, ForecastError> {
        decode_entries(self.list, ThreeHourlyEntry::into_sample)
    }
}

// Native daily forecast: GET /forecast/daily

#[derive(Debug, Deserialize)]
pub struct DailyResponse {
    #[serde(default)]
    pub list: Vec<DailyEntry>,
}

#[derive(Debug, Deserialize)]
pub struct DailyEntry {
    pub dt: Option<i64>,
    pub temp: Option<DailyTemp>,
    #[serde(default)]
    pub weather: Vec<WeatherDescriptor>,
    pub humidity: Option<f64>,
    // The daily endpoint calls this `speed`; One Call uses `wind_speed`.
    #[serde(alias = "speed")]
    pub wind_speed: Option<f64>,
    pub pop: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct DailyTemp {
    pub max: Option<f64>,
    pub min: Option<f64>,
}

impl DailyEntry {
    fn into_summary(self) -> Result<DailySummary, String> {
        let timestamp = self.dt.ok_or("missing dt")?;
        let temp = self.temp.ok_or("missing temp")?;
        let temp_max = temp.max.ok_or("missing temp.max")?;
        let temp_min = temp.min.ok_or("missing temp.min")?;
        let humidity = self.humidity.ok_or("missing humidity")?;
        let wind_speed = self.wind_speed.ok_or("missing wind_speed")?;
        let weather = first_descriptor(&self.weather);

        Ok(DailySummary {
            timestamp,
            temp_max,
            temp_min,
            category: weather.category(),
            description: weather.description,
            icon: weather.icon,
            humidity: humidity.round() as i32,
            wind_speed,
            precipitation_probability: self.pop.unwrap_or(0.0),
        })
    }
}

impl DailyResponse {
    pub fn into_summaries(self) -> Result<Vec<DailySummary>, ForecastError> {
        decode_entries(self.list, DailyEntry::into_summary)
    }
}

fn decode_entries<E, T>(
    entries: Vec<E>,
    decode: impl Fn(E) -> Result<T, String>,
) -> Result<Vec<T>, ForecastError> {
    let total = entries.len();
    let mut last_problem = None;
    let mut decoded = Vec::with_capacity(total);

    for (index, entry) in entries.into_iter().enumerate() {
        match decode(entry) {
            Ok(value) => decoded.push(value),
            Err(problem) => {
                tracing::warn!("Skipping forecast entry {}: {}", index, problem);
                last_problem = Some(problem);
            }
        }
    }

    match last_problem {
        Some(problem) if decoded.is_empty() => Err(ForecastError::MalformedSample(format!(
            "all {} entries malformed, last: {}",
            total, problem
        ))),
        _ => Ok(decoded),
    }
}

// Current conditions: GET /weather

#[derive(Debug, Deserialize)]
pub struct CurrentResponse {
    #[serde(default)]
    pub name: String,
    pub sys: Option<SysBlock>,
    pub main: MainBlock,
    #[serde(default)]
    pub weather: Vec<WeatherDescriptor>,
    pub wind: Option<WindBlock>,
    pub visibility: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct SysBlock {
    pub country: Option<String>,
}

impl CurrentResponse {
    pub fn into_current(self) -> Result<CurrentWeather, String> {
        let temperature = self.main.temp.ok_or("missing main.temp")?;
        let weather = first_descriptor(&self.weather);

        Ok(CurrentWeather {
            location_name: self.name,
            country: self.sys.and_then(|s| s.country),
            temperature,
            feels_like: self.main.feels_like.unwrap_or(temperature),
            temp_max: self.main.temp_max.unwrap_or(temperature),
            temp_min: self.main.temp_min.unwrap_or(temperature),
            humidity: self.main.humidity.unwrap_or(0.0).round().clamp(0.0, 100.0) as u8,
            wind_speed: self.wind.and_then(|w| w.speed).unwrap_or(0.0),
            visibility: self.visibility,
            category: weather.category(),
            description: weather.description,
            icon: weather.icon,
        })
    }
}

// Direct geocoding: GET /geo/1.0/direct

#[derive(Debug, Deserialize)]
pub struct GeocodeEntry {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: Option<String>,
    pub state: Option<String>,
}

impl From<GeocodeEntry> for Location {
    fn from(entry: GeocodeEntry) -> Self {
        Location {
            latitude: entry.lat,
            longitude: entry.lon,
            city_name: Some(entry.name),
        }
    }
}
