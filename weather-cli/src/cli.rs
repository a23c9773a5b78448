use std::{fmt, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, InquireError, Password, Select, Text};
use weather_card_core::{
    CityTable, Config, Coordinates, PositionSource, PositionSourceKind, RenderState,
    UnitPreference, WeatherCard, provider::provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-card",
    version,
    about = "Current weather for your location or any city"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the API key, position source and default units.
    Configure,

    /// Show current weather once and exit.
    Show {
        /// City to look up, as "City, CC", e.g. "Mexico City, MX".
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        city: Option<String>,

        /// Latitude; requires --lon.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude; requires --lat.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Units for this run, "metric" or "imperial"; defaults to the configured units.
        #[arg(long, value_parser = parse_units)]
        units: Option<UnitPreference>,
    },

    /// Keep the card open: search cities, toggle units, refresh or re-locate.
    Interactive,

    /// List cities in the lookup table whose name starts with a prefix.
    Cities {
        prefix: String,
    },
}

fn parse_units(value: &str) -> anyhow::Result<UnitPreference> {
    UnitPreference::try_from(value)
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                city,
                lat,
                lon,
                units,
            } => show(city, lat.zip(lon), units).await,
            Command::Interactive => interactive().await,
            Command::Cities { prefix } => list_cities(&prefix),
        }
    }
}

fn build_card(config: &Config) -> anyhow::Result<WeatherCard> {
    let provider = provider_from_config(config)?;
    let cities = CityTable::load_or_bundled(config.city_list.as_deref())?;
    let position: Arc<dyn PositionSource> = Arc::from(config.position_source());

    Ok(WeatherCard::new(Arc::new(provider), position, cities)
        .with_units(config.units)
        .with_icon_base_url(config.icon_base_url()))
}

/// Hold the loading placeholder on screen until it clears.
async fn wait_for_loader(card: &WeatherCard) {
    if card.is_loading() {
        print!("{}", render::render_state(&RenderState::Loading));
        card.loading_finished().await;
    }
}

async fn show(
    city: Option<String>,
    coordinates: Option<(f64, f64)>,
    units: Option<UnitPreference>,
) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(units) = units {
        config.units = units;
    }
    let mut card = build_card(&config)?;

    let result = match (city, coordinates) {
        (Some(city), _) => {
            card.set_search_input(city);
            card.search_city().await.map(|_| ())
        }
        (None, Some((lat, lon))) => card.set_coordinates(Coordinates::new(lat, lon)).await,
        (None, None) => card.refresh().await,
    };

    wait_for_loader(&card).await;
    result?;

    println!("{}", render::render_card(&card));
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Search,
    ToggleUnits(UnitPreference),
    Refresh,
    LocateMe,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Search => f.write_str("Search city"),
            Action::ToggleUnits(current) => {
                write!(f, "Switch to {}", current.toggled().temperature_symbol())
            }
            Action::Refresh => f.write_str("Refresh"),
            Action::LocateMe => f.write_str("Use my location"),
            Action::Quit => f.write_str("Quit"),
        }
    }
}

fn is_cancel(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

async fn interactive() -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut card = build_card(&config)?;

    if let Err(err) = card.refresh().await {
        tracing::debug!("initial refresh failed: {err}");
    }

    loop {
        wait_for_loader(&card).await;
        println!("{}", render::render_card(&card));

        let actions = vec![
            Action::Search,
            Action::ToggleUnits(card.units()),
            Action::Refresh,
            Action::LocateMe,
            Action::Quit,
        ];
        let action = match Select::new("What next?", actions).prompt() {
            Ok(action) => action,
            Err(err) if is_cancel(&err) => break,
            Err(err) => return Err(err.into()),
        };

        match action {
            Action::Search => {
                let input = match Text::new("City:")
                    .with_placeholder("Mexico City, MX")
                    .with_initial_value(card.search_input())
                    .prompt()
                {
                    Ok(input) => input,
                    Err(err) if is_cancel(&err) => continue,
                    Err(err) => return Err(err.into()),
                };

                card.set_search_input(input);
                if let Err(err) = card.search_city().await {
                    tracing::debug!("search failed: {err}");
                }
            }
            Action::ToggleUnits(_) => {
                if let Err(err) = card.toggle_units().await {
                    tracing::debug!("refresh after unit toggle failed: {err}");
                }
            }
            Action::Refresh => {
                if let Err(err) = card.refresh().await {
                    tracing::debug!("refresh failed: {err}");
                }
            }
            Action::LocateMe => {
                if let Err(err) = card.locate_me().await {
                    tracing::debug!("locating failed: {err}");
                }
            }
            Action::Quit => break,
        }
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key);

    let source = Select::new(
        "Where should your current position come from?",
        PositionSourceKind::all().to_vec(),
    )
    .prompt()?;
    config.position_source = source;

    if source == PositionSourceKind::Fixed {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please type a decimal number")
            .prompt()?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please type a decimal number")
            .prompt()?;
        config.position = Some(Coordinates::new(latitude, longitude));
    }

    config.units = Select::new(
        "Default units:",
        vec![UnitPreference::Metric, UnitPreference::Imperial],
    )
    .prompt()?;

    config.save()?;
    println!(
        "Saved configuration to {}",
        Config::config_file_path()?.display()
    );

    Ok(())
}

fn list_cities(prefix: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    let cities = CityTable::load_or_bundled(config.city_list.as_deref())?;

    let hits = cities.starting_with(prefix);
    if hits.is_empty() {
        println!("No cities start with '{prefix}'.");
        return Ok(());
    }

    for city in hits {
        println!("{}, {}  {}", city.name, city.country, city.coordinates());
    }

    Ok(())
}
