//! OpenWeatherMap client.

use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::api::{CurrentResponse, DailyResponse, ThreeHourlyResponse};
use crate::error::WeatherError;
use crate::normalize::ForecastNormalizer;
use crate::types::{CurrentWeather, ForecastPayload, Location, WeatherReport, FORECAST_DAYS};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_GEO_URL: &str = "https://api.openweathermap.org/geo/1.0";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for [`WeatherProvider`]
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub api_key: String,
    pub base_url: String,
    pub geo_url: String,
    pub timeout: Duration,
}

impl ProviderSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            geo_url: DEFAULT_GEO_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    settings: ProviderSettings,
    normalizer: ForecastNormalizer,
}

impl WeatherProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            settings,
            normalizer: ForecastNormalizer::new(),
        })
    }

    pub(crate) fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// Current conditions at `location`.
    #[instrument(skip(self), level = "info")]
    pub async fn current(&self, location: &Location) -> Result<CurrentWeather, WeatherError> {
        let url = format!("{}/weather", self.settings.base_url);
        let resp: CurrentResponse = self.get_json(&url, &coords_query(location)).await?;
        resp.into_current().map_err(WeatherError::Parse)
    }

    /// Native daily forecast, up to [`FORECAST_DAYS`] entries.
    #[instrument(skip(self), level = "info")]
    pub async fn daily_forecast(&self, location: &Location) -> Result<ForecastPayload, WeatherError> {
        let url = format!("{}/forecast/daily", self.settings.base_url);
        let mut query = coords_query(location);
        query.push(("cnt", FORECAST_DAYS.to_string()));

        let resp: DailyResponse = self.get_json(&url, &query).await?;
        Ok(ForecastPayload::NativeDaily(resp.into_summaries()?))
    }

    /// 5-day forecast in 3-hour steps.
    #[instrument(skip(self), level = "info")]
    pub async fn three_hourly_forecast(
        &self,
        location: &Location,
    ) -> Result<ForecastPayload, WeatherError> {
        let url = format!("{}/forecast", self.settings.base_url);
        let resp: ThreeHourlyResponse = self.get_json(&url, &coords_query(location)).await?;
        Ok(ForecastPayload::ThreeHourly(resp.into_samples()?))
    }

    /// Current conditions plus a normalized 16-day forecast.
    ///
    /// Requests current conditions and the native daily forecast together.
    /// If either fails, both are requested again with the 3-hourly forecast
    /// in place of the daily one.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self, location: &Location) -> Result<WeatherReport, WeatherError> {
        let (current, payload) =
            match tokio::try_join!(self.current(location), self.daily_forecast(location)) {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::warn!("Daily forecast unavailable, using 3-hourly: {}", e);
                    tokio::try_join!(
                        self.current(location),
                        self.three_hourly_forecast(location)
                    )?
                }
            };

        let mode = payload.mode();
        let forecast = self.normalizer.normalize(payload)?;
        tracing::info!("Fetched weather for {:?} ({:?})", location.city_name, mode);

        Ok(WeatherReport {
            location: location.clone(),
            current,
            forecast,
            mode,
            fetched_at: Utc::now(),
        })
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("appid", self.settings.api_key.as_str())])
            .send()
            .await?;

        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, WeatherError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| WeatherError::Parse(format!("JSON parse error: {}", e)))
        } else if status.as_u16() == 401 {
            Err(WeatherError::InvalidApiKey)
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(WeatherError::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}

fn coords_query(location: &Location) -> Vec<(&'static str, String)> {
    vec![
        ("lat", location.latitude.to_string()),
        ("lon", location.longitude.to_string()),
        ("units", "metric".to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ForecastMode, WeatherCategory};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const JUNE_1: i64 = 1_717_200_000;

    fn provider(server: &MockServer) -> WeatherProvider {
        let mut settings = ProviderSettings::new("test_key");
        settings.base_url = server.uri();
        settings.geo_url = server.uri();
        WeatherProvider::new(settings).unwrap()
    }

    fn london() -> Location {
        Location {
            latitude: 51.5073,
            longitude: -0.1276,
            city_name: Some("London".to_string()),
        }
    }

    fn current_body() -> serde_json::Value {
        serde_json::json!({
            "name": "London",
            "sys": {"country": "GB"},
            "main": {"temp": 15.0, "feels_like": 14.0, "temp_min": 12.0, "temp_max": 17.0, "humidity": 70},
            "weather": [{"main": "Clouds", "description": "overcast clouds", "icon": "04d"}],
            "wind": {"speed": 3.0},
            "visibility": 10000
        })
    }

    fn daily_body(days: i64) -> serde_json::Value {
        let list: Vec<_> = (0..days)
            .map(|i| {
                serde_json::json!({
                    "dt": JUNE_1 + i * 86_400,
                    "temp": {"min": 10.0, "max": 20.0},
                    "weather": [{"main": "Rain", "description": "moderate rain", "icon": "10d"}],
                    "humidity": 80,
                    "speed": 4.0,
                    "pop": 0.6
                })
            })
            .collect();
        serde_json::json!({ "cnt": days, "list": list })
    }

    fn three_hourly_body() -> serde_json::Value {
        let list: Vec<_> = (0..16)
            .map(|i| {
                serde_json::json!({
                    "dt": JUNE_1 + i * 3 * 3600,
                    "main": {"temp": 10.0 + i as f64, "humidity": 60},
                    "weather": [{"main": "Clear", "description": "clear sky", "icon": "01d"}],
                    "wind": {"speed": 2.5},
                    "pop": 0.1
                })
            })
            .collect();
        serde_json::json!({ "cnt": 16, "list": list })
    }

    #[tokio::test]
    async fn test_current() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("appid", "test_key"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&mock_server)
            .await;

        let current = provider(&mock_server).current(&london()).await.unwrap();

        assert_eq!(current.location_name, "London");
        assert_eq!(current.category, WeatherCategory::Clouds);
        assert_eq!(current.temperature, 15.0);
    }

    #[tokio::test]
    async fn test_fetch_uses_native_daily() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast/daily"))
            .and(query_param("cnt", "16"))
            .respond_with(ResponseTemplate::new(200).set_body_json(daily_body(16)))
            .mount(&mock_server)
            .await;

        let report = provider(&mock_server).fetch(&london()).await.unwrap();

        assert_eq!(report.mode, ForecastMode::NativeDaily);
        assert_eq!(report.forecast.len(), FORECAST_DAYS);
        assert!(report
            .forecast
            .iter()
            .all(|d| d.category == WeatherCategory::Rain && d.humidity == 80));
    }

    #[tokio::test]
    async fn test_fetch_falls_back_to_three_hourly() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast/daily"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "cod": 401,
                "message": "Invalid API key"
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(three_hourly_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let report = provider(&mock_server).fetch(&london()).await.unwrap();

        assert_eq!(report.mode, ForecastMode::ThreeHourly);
        assert_eq!(report.forecast.len(), FORECAST_DAYS);
        assert_eq!(report.current.location_name, "London");
    }

    #[tokio::test]
    async fn test_fetch_fails_when_both_forecasts_fail() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast/daily"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server).fetch(&london()).await;

        assert!(matches!(result, Err(WeatherError::Api { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_empty_three_hourly_fallback_is_empty_input() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast/daily"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"list": []})),
            )
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server).fetch(&london()).await;

        assert!(matches!(
            result,
            Err(WeatherError::Forecast(crate::error::ForecastError::EmptyInput))
        ));
    }

    #[tokio::test]
    async fn test_invalid_api_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server).current(&london()).await;

        assert!(matches!(result, Err(WeatherError::InvalidApiKey)));
    }

    #[tokio::test]
    async fn test_unparseable_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server).current(&london()).await;

        assert!(matches!(result, Err(WeatherError::Parse(_))));
    }
}
