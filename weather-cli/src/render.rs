//! Text rendering of the weather card.

use std::fmt::Display;

use weather_card_core::{RenderState, WeatherCard, WeatherView, view::compass_point};

const PLACEHOLDER: &str = "--";

fn or_placeholder<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| v.to_string())
}

/// Render the card's current state, followed by its status line if any.
pub fn render_card(card: &WeatherCard) -> String {
    let state = card.render_state();
    let mut out = render_state(&state);

    if let (RenderState::Ready(_), Some(status)) = (&state, card.status()) {
        out.push_str(&format!("\n! {status}\n"));
    }

    out
}

pub fn render_state(state: &RenderState) -> String {
    match state {
        RenderState::Loading => "☁  Loading weather...\n".to_string(),
        RenderState::NoData => {
            "No weather data yet. Search a city, e.g. \"Mexico City, MX\".\n".to_string()
        }
        RenderState::Error(message) => format!("Could not load weather: {message}\n"),
        RenderState::Ready(view) => render_view(view),
    }
}

fn reading_line(label: &str, value: String, unit: &str) -> String {
    format!("  {label:<12} {value} {unit}\n")
}

fn render_view(view: &WeatherView) -> String {
    let symbol = view.temperature_symbol;

    let mut out = format!(
        "{}, {}\n{}\n",
        or_placeholder(view.location.as_deref()),
        or_placeholder(view.country.as_deref()),
        or_placeholder(view.description.as_deref())
    );
    if let Some(url) = &view.icon_url {
        out.push_str(&format!("  icon: {url}\n"));
    }
    out.push('\n');

    out.push_str(&format!(
        "  {}{symbol}   Feels like {}°\n",
        or_placeholder(view.temperature),
        or_placeholder(view.feels_like)
    ));
    out.push_str(&format!(
        "  MIN {}°   MAX {}°\n",
        or_placeholder(view.temp_min),
        or_placeholder(view.temp_max)
    ));
    out.push('\n');

    out.push_str(&reading_line(
        view.precipitation.kind.label(),
        or_placeholder(view.precipitation.volume),
        "mm",
    ));
    out.push_str(&reading_line("Humidity", or_placeholder(view.humidity), "%"));
    out.push_str(&reading_line("Pressure", or_placeholder(view.pressure), "hPa"));

    let direction = view
        .wind_direction
        .map(|deg| format!(" {} ({deg}°)", compass_point(deg)))
        .unwrap_or_default();
    out.push_str(&reading_line(
        "Wind",
        or_placeholder(view.wind_speed),
        &format!("{}{direction}", view.speed_label),
    ));

    out
}
