//! Display-ready views of weather data.
//!
//! Maps forecast days and current conditions to the strings and rounded
//! numbers a frontend shows. Holds no UI state of its own.

use chrono::{DateTime, Days, Local, NaiveDate, TimeZone};
use serde::Serialize;

use crate::types::{CurrentWeather, DailySummary, ForecastSeries, WeatherCategory};

/// Font Awesome icon class for a weather category
pub fn icon_class(category: WeatherCategory) -> &'static str {
    match category {
        WeatherCategory::Clear => "fas fa-sun",
        WeatherCategory::Clouds => "fas fa-cloud",
        WeatherCategory::Rain => "fas fa-cloud-rain",
        WeatherCategory::Drizzle => "fas fa-cloud-drizzle",
        WeatherCategory::Thunderstorm => "fas fa-bolt",
        WeatherCategory::Snow => "fas fa-snowflake",
        WeatherCategory::Mist
        | WeatherCategory::Smoke
        | WeatherCategory::Haze
        | WeatherCategory::Dust
        | WeatherCategory::Fog
        | WeatherCategory::Sand
        | WeatherCategory::Ash => "fas fa-smog",
        WeatherCategory::Squall => "fas fa-wind",
        WeatherCategory::Tornado => "fas fa-tornado",
        WeatherCategory::Unknown => "fas fa-sun",
    }
}

fn ms_to_kmh(speed: f64) -> f64 {
    speed * 3.6
}

/// Nearest integer, with halves rounded towards positive infinity.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// One forecast day as shown on a card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastCard {
    pub label: String,
    pub icon_class: &'static str,
    pub high: i64,
    pub low: i64,
    pub description: String,
    pub precipitation_percent: i64,
    pub wind_kmh: i64,
    pub humidity_percent: i32,
}

impl ForecastCard {
    /// Build the card for the `index`th day of a forecast.
    ///
    /// Index 0 is labelled "Today". Other days use the anchor timestamp,
    /// or `today + index` days when the anchor cannot be represented.
    pub fn from_summary(day: &DailySummary, index: usize, today: NaiveDate) -> Self {
        let label = if index == 0 {
            "Today".to_string()
        } else {
            let date = Local
                .timestamp_opt(day.timestamp, 0)
                .single()
                .map(|dt| dt.date_naive())
                .or_else(|| today.checked_add_days(Days::new(index as u64)))
                .unwrap_or(today);
            date.format("%a, %b %-d").to_string()
        };

        Self {
            label,
            icon_class: icon_class(day.category),
            high: round_half_up(day.temp_max),
            low: round_half_up(day.temp_min),
            description: day.description.clone(),
            precipitation_percent: round_half_up(day.precipitation_probability * 100.0),
            wind_kmh: round_half_up(ms_to_kmh(day.wind_speed)),
            humidity_percent: day.humidity,
        }
    }
}

/// Cards for every day of the series, in order.
pub fn forecast_cards(series: &ForecastSeries, today: NaiveDate) -> Vec<ForecastCard> {
    series
        .iter()
        .enumerate()
        .map(|(index, day)| ForecastCard::from_summary(day, index, today))
        .collect()
}

/// Current conditions as shown in the header panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentView {
    pub location: String,
    pub date: String,
    pub temperature: i64,
    pub description: String,
    pub icon_class: &'static str,
    pub high: i64,
    pub low: i64,
    pub visibility: String,
    pub humidity: String,
    pub wind: String,
    pub feels_like: String,
}

impl CurrentView {
    pub fn from_current(current: &CurrentWeather, now: DateTime<Local>) -> Self {
        let location = match current.country.as_deref() {
            Some(country) if !country.is_empty() => {
                format!("{}, {}", current.location_name, country)
            }
            _ => current.location_name.clone(),
        };

        Self {
            location,
            date: now.format("%A, %B %-d, %Y").to_string(),
            temperature: round_half_up(current.temperature),
            description: current.description.clone(),
            icon_class: icon_class(current.category),
            high: round_half_up(current.temp_max),
            low: round_half_up(current.temp_min),
            visibility: current
                .visibility
                .map(|m| format!("{:.1} km", m / 1000.0))
                .unwrap_or_else(|| "n/a".to_string()),
            humidity: format!("{}%", current.humidity),
            wind: format!("{:.1} km/h", ms_to_kmh(current.wind_speed)),
            feels_like: format!("{}°", round_half_up(current.feels_like)),
        }
    }
}
