use async_trait::async_trait;
use reqwest::Client;

use crate::{
    error::{FetchError, truncate_body},
    model::WeatherSnapshot,
};

use super::{WeatherProvider, WeatherRequest};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/data/2.5/weather", self.base_url)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(
        &self,
        request: &WeatherRequest,
    ) -> Result<WeatherSnapshot, FetchError> {
        let lat = request.coordinates.latitude.to_string();
        let lon = request.coordinates.longitude.to_string();

        tracing::debug!(%lat, %lon, units = %request.units, "requesting current weather");

        let res = self
            .http
            .get(self.endpoint())
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", request.units.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let p = OpenWeatherProvider::new("k".into()).with_base_url("http://localhost:9000/");
        assert_eq!(p.endpoint(), "http://localhost:9000/data/2.5/weather");
    }

    #[test]
    fn default_endpoint_targets_openweather() {
        let p = OpenWeatherProvider::new("k".into());
        assert_eq!(p.endpoint(), "https://api.openweathermap.org/data/2.5/weather");
    }
}
