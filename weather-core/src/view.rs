//! Display values derived from a [`WeatherSnapshot`].
//!
//! Nothing here assumes a well-formed payload: each value is `None` when the
//! field it comes from is missing.

use crate::model::{UnitPreference, WeatherSnapshot};

pub const DEFAULT_ICON_BASE_URL: &str = "http://openweathermap.org";

const MS_TO_KMH: f64 = 3.6;

pub fn round_reading(value: f64) -> i64 {
    value.round() as i64
}

/// Metric speeds arrive in m/s and are shown in km/h; imperial speeds are
/// already mph.
pub fn wind_speed(speed: f64, units: UnitPreference) -> i64 {
    match units {
        UnitPreference::Metric => round_reading(speed * MS_TO_KMH),
        UnitPreference::Imperial => round_reading(speed),
    }
}

pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn icon_url(base_url: &str, icon: &str) -> String {
    format!("{}/img/w/{icon}.png", base_url.trim_end_matches('/'))
}

/// 16-point compass label for a meteorological bearing.
pub fn compass_point(degrees: f64) -> &'static str {
    const POINTS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];
    let normalized = degrees.rem_euclid(360.0);
    let idx = ((normalized / 22.5).round() as usize) % POINTS.len();
    POINTS[idx]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrecipitationKind {
    #[default]
    Rain,
    Snow,
}

impl PrecipitationKind {
    pub fn label(&self) -> &'static str {
        match self {
            PrecipitationKind::Rain => "Rain",
            PrecipitationKind::Snow => "Snow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PrecipitationView {
    pub kind: PrecipitationKind,
    /// Last-hour accumulation in mm.
    pub volume: Option<f64>,
}

/// Snow wins when present, then rain; with neither the label stays "Rain".
pub fn precipitation(snapshot: &WeatherSnapshot) -> PrecipitationView {
    if let Some(snow) = &snapshot.snow {
        PrecipitationView {
            kind: PrecipitationKind::Snow,
            volume: snow.last_hour,
        }
    } else if let Some(rain) = &snapshot.rain {
        PrecipitationView {
            kind: PrecipitationKind::Rain,
            volume: rain.last_hour,
        }
    } else {
        PrecipitationView::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherView {
    pub icon_url: Option<String>,
    pub description: Option<String>,
    pub temperature: Option<i64>,
    pub feels_like: Option<i64>,
    pub temp_min: Option<i64>,
    pub temp_max: Option<i64>,
    pub temperature_symbol: &'static str,
    pub location: Option<String>,
    pub country: Option<String>,
    pub precipitation: PrecipitationView,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub wind_speed: Option<i64>,
    pub wind_direction: Option<f64>,
    pub speed_label: &'static str,
}

impl WeatherView {
    pub fn from_snapshot(
        snapshot: &WeatherSnapshot,
        units: UnitPreference,
        icon_base_url: &str,
    ) -> Self {
        let condition = snapshot.condition();
        let main = snapshot.main.as_ref();
        let wind = snapshot.wind.as_ref();

        Self {
            icon_url: condition
                .and_then(|c| c.icon.as_deref())
                .map(|icon| icon_url(icon_base_url, icon)),
            description: condition
                .and_then(|c| c.description.as_deref())
                .map(capitalize_first),
            temperature: main.and_then(|m| m.temp).map(round_reading),
            feels_like: main.and_then(|m| m.feels_like).map(round_reading),
            temp_min: main.and_then(|m| m.temp_min).map(round_reading),
            temp_max: main.and_then(|m| m.temp_max).map(round_reading),
            temperature_symbol: units.temperature_symbol(),
            location: snapshot.name.clone(),
            country: snapshot.country().map(str::to_string),
            precipitation: precipitation(snapshot),
            humidity: main.and_then(|m| m.humidity),
            pressure: main.and_then(|m| m.pressure),
            wind_speed: wind.and_then(|w| w.speed).map(|s| wind_speed(s, units)),
            wind_direction: wind.and_then(|w| w.deg),
            speed_label: units.speed_label(),
        }
    }
}

/// What the card shows right now.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderState {
    /// The loading placeholder is up.
    Loading,
    /// No successful fetch yet.
    NoData,
    /// No successful fetch yet and the last attempt failed.
    Error(String),
    Ready(WeatherView),
}
