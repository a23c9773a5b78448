//! Core library for the `weather-card` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Location resolution (position sources and the static city table)
//! - The OpenWeather current-weather provider
//! - Derived display values and the `WeatherCard` view-model
//!
//! It is used by `weather-card-cli`, but can also be reused by other front-ends.

pub mod card;
pub mod city;
pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod provider;
pub mod view;

pub use card::{LOADING_WINDOW, WeatherCard};
pub use city::{CityQuery, CityTable};
pub use config::{Config, PositionSourceKind};
pub use error::{CardError, FetchError, LocationError};
pub use location::{FixedPosition, IpPosition, PositionOptions, PositionSource};
pub use model::{CityRecord, Coordinates, UnitPreference, WeatherSnapshot};
pub use provider::{WeatherProvider, WeatherRequest, openweather::OpenWeatherProvider};
pub use view::{RenderState, WeatherView};
