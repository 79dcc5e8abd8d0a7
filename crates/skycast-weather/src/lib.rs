//! Weather data for Skycast
//!
//! Fetches current conditions and forecasts from OpenWeatherMap and
//! normalizes either forecast shape into a fixed 16-day series.

pub mod aggregate;
pub mod api;
pub mod error;
pub mod extrapolate;
pub mod geocode;
pub mod normalize;
pub mod present;
pub mod provider;
pub mod types;

pub use aggregate::DailyAggregator;
pub use error::{ForecastError, WeatherError};
pub use extrapolate::ForecastExtrapolator;
pub use normalize::ForecastNormalizer;
pub use present::{forecast_cards, icon_class, CurrentView, ForecastCard};
pub use provider::{ProviderSettings, WeatherProvider};
pub use types::*;
