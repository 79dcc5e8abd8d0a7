//! Forward geocoding: convert a city name to coordinates.
//! Uses the OpenWeatherMap direct geocoding endpoint.

use tracing::instrument;

use crate::api::GeocodeEntry;
use crate::error::WeatherError;
use crate::provider::WeatherProvider;
use crate::types::Location;

impl GeocodeEntry {
    /// Human-readable place name (e.g. "Portland, Oregon").
    pub fn display_name(&self) -> String {
        // Prefer state over country for disambiguation
        let suffix = self
            .state
            .as_deref()
            .filter(|s| !s.is_empty() && *s != self.name)
            .or_else(|| {
                self.country
                    .as_deref()
                    .filter(|c| !c.is_empty() && *c != self.name)
            });

        match suffix {
            Some(s) => format!("{}, {}", self.name, s),
            None => self.name.clone(),
        }
    }
}

impl WeatherProvider {
    /// Resolve a city name to the best matching location.
    #[instrument(skip(self), level = "info")]
    pub async fn geocode(&self, city: &str) -> Result<Location, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::LocationNotFound(String::new()));
        }

        let url = format!("{}/direct", self.settings().geo_url);
        let query = [("q", city.to_string()), ("limit", "1".to_string())];

        let entries: Vec<GeocodeEntry> = match self.get_json(&url, &query).await {
            Err(WeatherError::Api { status: 404, .. }) => {
                return Err(WeatherError::LocationNotFound(city.to_string()))
            }
            other => other?,
        };

        let entry = entries
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::LocationNotFound(city.to_string()))?;

        tracing::info!("Geocoded {:?} to {}", city, entry.display_name());
        Ok(entry.into())
    }
}
