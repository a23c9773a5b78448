use crate::{
    Config,
    error::FetchError,
    model::{Coordinates, UnitPreference, WeatherSnapshot},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// One current-weather request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherRequest {
    pub coordinates: Coordinates,
    pub units: UnitPreference,
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, request: &WeatherRequest)
    -> Result<WeatherSnapshot, FetchError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> Result<OpenWeatherProvider, FetchError> {
    let api_key = config.api_key().ok_or(FetchError::MissingApiKey)?;
    Ok(OpenWeatherProvider::new(api_key.to_owned()).with_base_url(config.base_url()))
}
