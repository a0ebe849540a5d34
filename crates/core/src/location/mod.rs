//! Location
//!
//! Resolves a delivery address and coordinate pair for checkout. Address
//! searches are tagged with a generation ticket so a response that arrives
//! after a newer search was started is dropped instead of overwriting it.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::GeocodingSettings;

pub mod nominatim;

pub use nominatim::{NominatimBuildError, NominatimGeocoder};

/// Errors raised by a geocoder.
#[derive(Debug, Error)]
pub enum LocationError {
    /// HTTP request or response decoding failed.
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A coordinate in a response was not a number.
    #[error("invalid coordinate in geocoding response: {0}")]
    InvalidCoordinate(String),
}

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude
    pub latitude: f64,

    /// Longitude
    pub longitude: f64,
}

impl Coordinates {
    /// Create a coordinate pair.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Address used when no street address could be resolved (`24.7136, 46.6753`).
    pub fn fallback_address(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Map link for these coordinates.
    pub fn map_link(&self, maps_base_url: &str) -> String {
        format!("{maps_base_url}{},{}", self.latitude, self.longitude)
    }
}

/// An address together with the coordinates it was resolved from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    /// Human readable address
    pub address: String,

    /// Coordinates of the address
    pub coordinates: Coordinates,
}

/// Forward and reverse geocoding.
pub trait Geocoder {
    /// Coordinates of the best match for a free-text query, if any.
    async fn search(&self, query: &str) -> Result<Option<Coordinates>, LocationError>;

    /// Street address for a coordinate pair, if any.
    async fn reverse(&self, coordinates: Coordinates) -> Result<Option<String>, LocationError>;
}

/// Ticket identifying one address search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

/// Issues increasing search tickets and tells whether a ticket is the latest.
#[derive(Debug, Clone, Default)]
pub struct SearchGenerations {
    latest: Arc<AtomicU64>,
}

impl SearchGenerations {
    /// Start a new generation, superseding every earlier ticket.
    pub fn issue(&self) -> SearchTicket {
        SearchTicket(self.latest.fetch_add(1, Ordering::SeqCst).wrapping_add(1))
    }

    /// Whether no newer ticket has been issued since `ticket`.
    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// Result of an address search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The query was too short to send.
    TooShort,

    /// Nothing matched, or the geocoder failed.
    NoMatch,

    /// A newer search started while this one was in flight.
    Superseded,

    /// The query resolved to a location.
    Resolved(ResolvedLocation),
}

/// Location picker
#[derive(Debug)]
pub struct LocationPicker<G> {
    geocoder: G,
    generations: SearchGenerations,
    min_query_chars: usize,
}

impl<G: Geocoder> LocationPicker<G> {
    /// Create a picker using the given geocoder.
    pub fn new(geocoder: G, settings: &GeocodingSettings) -> Self {
        Self::with_generations(geocoder, settings.min_query_chars, SearchGenerations::default())
    }

    /// Create a picker sharing an existing generation counter.
    pub fn with_generations(
        geocoder: G,
        min_query_chars: usize,
        generations: SearchGenerations,
    ) -> Self {
        Self {
            geocoder,
            generations,
            min_query_chars,
        }
    }

    /// Generation counter used to discard stale searches.
    pub fn generations(&self) -> &SearchGenerations {
        &self.generations
    }

    /// Search for an address.
    ///
    /// Every call supersedes earlier calls, including calls whose query turns
    /// out to be too short. Geocoder failures are logged and reported as
    /// [`SearchOutcome::NoMatch`].
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let ticket = self.generations.issue();

        if query.chars().count() < self.min_query_chars {
            return SearchOutcome::TooShort;
        }

        let coordinates = match self.geocoder.search(query).await {
            Ok(Some(coordinates)) => coordinates,
            Ok(None) => return SearchOutcome::NoMatch,
            Err(error) => {
                warn!("address search failed: {error}");

                return SearchOutcome::NoMatch;
            }
        };

        if !self.generations.is_current(ticket) {
            debug!("discarding superseded search result for {query:?}");

            return SearchOutcome::Superseded;
        }

        let location = self.resolve(coordinates).await;

        if !self.generations.is_current(ticket) {
            debug!("discarding superseded address for {query:?}");

            return SearchOutcome::Superseded;
        }

        SearchOutcome::Resolved(location)
    }

    /// Resolve a pinned coordinate pair to an address.
    ///
    /// Falls back to the formatted coordinates when reverse geocoding fails or
    /// finds nothing.
    pub async fn resolve(&self, coordinates: Coordinates) -> ResolvedLocation {
        let address = match self.geocoder.reverse(coordinates).await {
            Ok(Some(address)) => address,
            Ok(None) => coordinates.fallback_address(),
            Err(error) => {
                warn!("reverse geocoding failed, using coordinates as address: {error}");

                coordinates.fallback_address()
            }
        };

        ResolvedLocation {
            address,
            coordinates,
        }
    }
}
