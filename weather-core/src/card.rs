//! The weather card view-model.
//!
//! Holds the session state (coordinates, unit preference, latest snapshot,
//! search text) and runs the fetch whenever coordinates or units change.
//! Everything goes through `&mut self`, so a single card never has two
//! fetches in flight; the ticket check in [`WeatherCard::apply`] covers
//! callers that drive [`WeatherCard::begin_fetch`] themselves.

use std::{sync::Arc, time::Duration};
use tokio::time::Instant;

use crate::{
    city::CityTable,
    error::{CardError, FetchError},
    location::{PositionOptions, PositionSource, locate},
    model::{Coordinates, UnitPreference, WeatherSnapshot},
    provider::{WeatherProvider, WeatherRequest},
    view::{DEFAULT_ICON_BASE_URL, RenderState, WeatherView},
};

/// How long the loading placeholder stays up once shown.
pub const LOADING_WINDOW: Duration = Duration::from_millis(3000);

/// Message shown under the card, tagged with what produced it.
#[derive(Debug, Clone, PartialEq)]
enum Status {
    Lookup(String),
    Fetch(String),
}

impl Status {
    fn message(&self) -> &str {
        match self {
            Status::Lookup(message) | Status::Fetch(message) => message,
        }
    }
}

/// A fetch that has been issued but not applied yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchTicket {
    generation: u64,
    pub request: WeatherRequest,
}

#[derive(Debug)]
pub struct WeatherCard {
    provider: Arc<dyn WeatherProvider>,
    position: Arc<dyn PositionSource>,
    cities: CityTable,
    position_options: PositionOptions,
    icon_base_url: String,

    coordinates: Option<Coordinates>,
    units: UnitPreference,
    snapshot: Option<WeatherSnapshot>,

    search_input: String,
    status: Option<Status>,
    loading_until: Option<Instant>,
    generation: u64,
}

impl WeatherCard {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        position: Arc<dyn PositionSource>,
        cities: CityTable,
    ) -> Self {
        Self {
            provider,
            position,
            cities,
            position_options: PositionOptions::default(),
            icon_base_url: DEFAULT_ICON_BASE_URL.to_string(),
            coordinates: None,
            units: UnitPreference::default(),
            snapshot: None,
            search_input: String::new(),
            status: None,
            loading_until: None,
            generation: 0,
        }
    }

    pub fn with_units(mut self, units: UnitPreference) -> Self {
        self.units = units;
        self
    }

    pub fn with_icon_base_url(mut self, url: impl Into<String>) -> Self {
        self.icon_base_url = url.into();
        self
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    pub fn units(&self) -> UnitPreference {
        self.units
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn set_search_input(&mut self, input: impl Into<String>) {
        self.search_input = input.into();
    }

    /// Last user-facing message (lookup miss, fetch failure), if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(Status::message)
    }

    pub fn is_loading(&self) -> bool {
        self.loading_remaining().is_some()
    }

    /// Time left on the loading placeholder.
    pub fn loading_remaining(&self) -> Option<Duration> {
        let until = self.loading_until?;
        let now = Instant::now();
        (now < until).then(|| until - now)
    }

    /// Resolves once the loading placeholder has cleared.
    pub async fn loading_finished(&self) {
        if let Some(until) = self.loading_until {
            tokio::time::sleep_until(until).await;
        }
    }

    pub fn render_state(&self) -> RenderState {
        if self.is_loading() {
            return RenderState::Loading;
        }

        match (&self.snapshot, &self.status) {
            (Some(snapshot), _) => RenderState::Ready(WeatherView::from_snapshot(
                snapshot,
                self.units,
                &self.icon_base_url,
            )),
            (None, Some(status)) => RenderState::Error(status.message().to_string()),
            (None, None) => RenderState::NoData,
        }
    }

    /// Locate if needed, then fetch for the current coordinates and units.
    ///
    /// With no coordinates held this shows the loading placeholder and asks
    /// the position source once. A failed position request is logged and
    /// leaves the card untouched.
    pub async fn refresh(&mut self) -> Result<(), CardError> {
        if self.coordinates.is_none() {
            self.loading_until = Some(Instant::now() + LOADING_WINDOW);

            match locate(self.position.as_ref(), &self.position_options).await {
                Ok(coords) => {
                    tracing::debug!(%coords, "position acquired");
                    self.coordinates = Some(coords);
                }
                Err(err) => {
                    tracing::warn!("Could not get current position: {err}");
                    return Err(err.into());
                }
            }
        }

        self.fetch().await?;
        Ok(())
    }

    /// Store new coordinates; fetches only when they actually changed.
    pub async fn set_coordinates(&mut self, coords: Coordinates) -> Result<(), CardError> {
        if self.coordinates == Some(coords) {
            return Ok(());
        }

        self.coordinates = Some(coords);
        self.refresh().await
    }

    /// Flip metric/imperial and fetch again; temperatures are never converted locally.
    pub async fn toggle_units(&mut self) -> Result<(), CardError> {
        self.units = self.units.toggled();
        tracing::debug!(units = %self.units, "units toggled");
        self.refresh().await
    }

    /// Resolve the current search text against the city table.
    ///
    /// A miss records a status message and keeps the previous coordinates.
    pub async fn search_city(&mut self) -> Result<Coordinates, CardError> {
        let coords = match self.cities.resolve(&self.search_input) {
            Ok(coords) => coords,
            Err(err) => {
                tracing::warn!("City search failed: {err}");
                self.status = Some(Status::Lookup(err.to_string()));
                return Err(err.into());
            }
        };

        // A fetch error stays up until a fetch actually succeeds.
        if matches!(self.status, Some(Status::Lookup(_))) {
            self.status = None;
        }
        self.set_coordinates(coords).await?;
        Ok(coords)
    }

    /// Drop the current coordinates and ask the position source again.
    ///
    /// If the position request fails the previous coordinates are kept.
    pub async fn locate_me(&mut self) -> Result<(), CardError> {
        let previous = self.coordinates.take();
        let result = self.refresh().await;

        if self.coordinates.is_none() {
            self.coordinates = previous;
        }
        result
    }

    /// Issue a ticket for the current coordinates and units. `None` until a
    /// location is known.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        let coordinates = self.coordinates?;
        self.generation += 1;

        Some(FetchTicket {
            generation: self.generation,
            request: WeatherRequest {
                coordinates,
                units: self.units,
            },
        })
    }

    /// Apply a fetch result. Results for anything but the newest ticket are
    /// dropped so an old response never replaces a newer one.
    pub fn apply(
        &mut self,
        ticket: FetchTicket,
        result: Result<WeatherSnapshot, FetchError>,
    ) -> Result<(), FetchError> {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                latest = self.generation,
                "dropping stale weather result"
            );
            return Ok(());
        }

        match result {
            Ok(snapshot) => {
                tracing::info!(
                    location = snapshot.name.as_deref().unwrap_or("?"),
                    units = %ticket.request.units,
                    "weather snapshot updated"
                );
                self.snapshot = Some(snapshot);
                self.status = None;
                Ok(())
            }
            Err(err) => {
                tracing::warn!("Weather request failed: {err}");
                self.status = Some(Status::Fetch(err.to_string()));
                Err(err)
            }
        }
    }

    async fn fetch(&mut self) -> Result<(), FetchError> {
        let Some(ticket) = self.begin_fetch() else {
            return Ok(());
        };

        let result = self.provider.current_weather(&ticket.request).await;
        self.apply(ticket, result)
    }
}
