use std::path::Path;
use std::sync::Arc;

use skycast_weather::{Location, WeatherProvider, WeatherReport};

use crate::error::{AppError, ConfigError};
use crate::Config;

/// Application services, constructed explicitly by the caller
pub struct App {
    config: Arc<Config>,
    provider: WeatherProvider,
}

impl App {
    /// Create a new application instance from the on-disk config
    pub fn new() -> Result<Self, AppError> {
        Self::with_config(Config::load()?)
    }

    /// Create an application instance from the config file at `path`
    pub fn from_config_file(path: &Path) -> Result<Self, AppError> {
        Self::with_config(Config::load_with_overrides(path)?)
    }

    /// Create an application instance from an already loaded config
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        let validation = config.validate();
        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        let provider = WeatherProvider::new(config.weather.provider_settings())?;
        tracing::debug!("Weather provider ready ({})", config.weather.base_url);

        Ok(Self {
            config: Arc::new(config),
            provider,
        })
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Look up `city` and fetch its weather
    pub async fn weather_for_city(&self, city: &str) -> Result<WeatherReport, AppError> {
        self.ensure_api_key()?;
        let location = self.provider.geocode(city).await?;
        self.fetch(&location).await
    }

    /// Fetch weather for the configured default city
    pub async fn weather_for_default_city(&self) -> Result<WeatherReport, AppError> {
        let city = self.config.weather.default_city.clone();
        tracing::info!("No location given, using default city {}", city);
        self.weather_for_city(&city).await
    }

    /// Fetch weather at the given coordinates
    pub async fn weather_for_coords(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherReport, AppError> {
        self.ensure_api_key()?;
        let location = Location {
            latitude,
            longitude,
            city_name: None,
        };
        self.fetch(&location).await
    }

    async fn fetch(&self, location: &Location) -> Result<WeatherReport, AppError> {
        match self.provider.fetch(location).await {
            Ok(report) => Ok(report),
            Err(e) => {
                tracing::error!("Error fetching weather: {}", e);
                Err(e.into())
            }
        }
    }

    fn ensure_api_key(&self) -> Result<(), AppError> {
        if self.config.weather.is_configured() {
            Ok(())
        } else {
            Err(ConfigError::ApiKeyMissing.into())
        }
    }
}
