//! Nominatim (OpenStreetMap) geocoder.

use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, InvalidHeaderValue};
use serde::Deserialize;
use thiserror::Error;

use crate::config::GeocodingSettings;

use super::{Coordinates, Geocoder, LocationError};

/// Geocoder backed by a Nominatim HTTP endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    country_codes: String,
}

impl NominatimGeocoder {
    /// Build a geocoder from the store's geocoding settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the language is not a valid header value or the
    /// HTTP client cannot be built.
    pub fn new(settings: &GeocodingSettings) -> Result<Self, NominatimBuildError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(&settings.language)?);

        let builder = reqwest::Client::builder().default_headers(headers);

        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));

        Ok(Self {
            client: builder.build()?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            country_codes: settings.country_codes.clone(),
        })
    }
}

/// Errors raised while building a [`NominatimGeocoder`].
#[derive(Debug, Error)]
pub enum NominatimBuildError {
    /// The configured language is not a valid header value.
    #[error("invalid geocoding language: {0}")]
    Language(#[from] InvalidHeaderValue),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str) -> Result<Option<Coordinates>, LocationError> {
        let hits: Vec<SearchHit> = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("format", "json"),
                ("q", query),
                ("countrycodes", self.country_codes.as_str()),
                ("limit", "5"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        hits.first().map(SearchHit::coordinates).transpose()
    }

    async fn reverse(&self, coordinates: Coordinates) -> Result<Option<String>, LocationError> {
        let response: ReverseResponse = self
            .client
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("format", "json".to_string()),
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
                ("zoom", "18".to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.label())
    }
}

/// One `/search` result. Nominatim sends coordinates as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

impl SearchHit {
    fn coordinates(&self) -> Result<Coordinates, LocationError> {
        let parse = |value: &str| {
            value
                .parse::<f64>()
                .map_err(|_err| LocationError::InvalidCoordinate(value.to_string()))
        };

        Ok(Coordinates::new(parse(&self.lat)?, parse(&self.lon)?))
    }
}

#[derive(Debug, Default, Deserialize)]
struct AddressParts {
    road: Option<String>,
    city: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Option<AddressParts>,
    #[serde(default)]
    display_name: Option<String>,
}

impl ReverseResponse {
    /// Road, else city, else the full display name.
    fn label(self) -> Option<String> {
        let address = self.address.unwrap_or_default();

        [address.road, address.city, self.display_name]
            .into_iter()
            .flatten()
            .find(|part| !part.trim().is_empty())
    }
}
