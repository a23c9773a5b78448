//! Position sources standing in for device geolocation.
//!
//! Every request is single-shot: nothing is cached between calls, which is
//! what `maximum_age: 0` asks for.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};

use crate::{error::LocationError, model::Coordinates};

pub const IP_API_URL: &str = "http://ip-api.com/json";

/// Options for a single position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_millis(5000),
            maximum_age: Duration::ZERO,
        }
    }
}

#[async_trait]
pub trait PositionSource: Send + Sync + Debug {
    async fn current_position(&self, options: &PositionOptions)
    -> Result<Coordinates, LocationError>;
}

/// Request a position, bounded by `options.timeout`.
pub async fn locate(
    source: &dyn PositionSource,
    options: &PositionOptions,
) -> Result<Coordinates, LocationError> {
    tracing::debug!(?source, ?options, "requesting current position");

    match tokio::time::timeout(options.timeout, source.current_position(options)).await {
        Ok(result) => result,
        Err(_) => Err(LocationError::Timeout(options.timeout.as_millis() as u64)),
    }
}

/// A position taken from configuration. With no position configured it
/// behaves like a device without location services.
#[derive(Debug, Clone, Default)]
pub struct FixedPosition {
    position: Option<Coordinates>,
}

impl FixedPosition {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl PositionSource for FixedPosition {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, LocationError> {
        self.position.ok_or(LocationError::PositionUnavailable)
    }
}

/// Approximate position derived from the public IP address.
#[derive(Debug, Clone)]
pub struct IpPosition {
    url: String,
    http: Client,
}

impl IpPosition {
    pub fn new() -> Self {
        Self::with_url(IP_API_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: Client::new(),
        }
    }
}

impl Default for IpPosition {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[async_trait]
impl PositionSource for IpPosition {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinates, LocationError> {
        if options.high_accuracy {
            tracing::debug!("IP lookup cannot honor high accuracy; position is approximate");
        }

        let res = self
            .http
            .get(&self.url)
            .query(&[("fields", "status,message,lat,lon")])
            .send()
            .await
            .map_err(|e| LocationError::Provider(e.to_string()))?;

        match res.status() {
            reqwest::StatusCode::FORBIDDEN | reqwest::StatusCode::UNAUTHORIZED => {
                return Err(LocationError::PermissionDenied);
            }
            status if !status.is_success() => {
                return Err(LocationError::Provider(format!(
                    "IP lookup failed with status {status}"
                )));
            }
            _ => {}
        }

        let body: IpApiResponse = res
            .json()
            .await
            .map_err(|e| LocationError::Provider(e.to_string()))?;

        if body.status != "success" {
            tracing::debug!(message = ?body.message, "IP lookup returned failure");
            return Err(LocationError::PositionUnavailable);
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
            _ => Err(LocationError::PositionUnavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct NeverAnswers;

    #[async_trait]
    impl PositionSource for NeverAnswers {
        async fn current_position(
            &self,
            _options: &PositionOptions,
        ) -> Result<Coordinates, LocationError> {
            std::future::pending().await
        }
    }

    #[test]
    fn default_options_match_single_shot_request() {
        let opts = PositionOptions::default();
        assert!(opts.high_accuracy);
        assert_eq!(opts.timeout, Duration::from_millis(5000));
        assert_eq!(opts.maximum_age, Duration::ZERO);
    }

    #[tokio::test]
    async fn fixed_position_returns_configured_coordinates() {
        let source = FixedPosition::new(Some(Coordinates::new(1.0, 2.0)));
        let coords = locate(&source, &PositionOptions::default()).await.unwrap();
        assert_eq!(coords, Coordinates::new(1.0, 2.0));
    }

    #[tokio::test]
    async fn fixed_position_without_value_is_unavailable() {
        let err = locate(&FixedPosition::default(), &PositionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LocationError::PositionUnavailable));
    }

    #[tokio::test(start_paused = true)]
    async fn locate_times_out() {
        let err = locate(&NeverAnswers, &PositionOptions::default()).await.unwrap_err();
        assert!(matches!(err, LocationError::Timeout(5000)));
    }
}
