use std::io;

use kunafa::{
    config::StoreConfig,
    location::{Geocoder, LocationPicker, SearchOutcome},
};

use super::CommandError;

/// Resolve `query` and print the address, coordinates and map link.
pub(crate) async fn run_locate<G: Geocoder>(
    out: &mut impl io::Write,
    picker: &LocationPicker<G>,
    config: &StoreConfig,
    query: &str,
) -> Result<(), CommandError> {
    match picker.search(query).await {
        SearchOutcome::Resolved(location) => {
            writeln!(out, "{}", location.address)?;
            writeln!(out, "{}", location.coordinates.fallback_address())?;
            writeln!(out, "{}", location.coordinates.map_link(&config.maps_base_url))?;
        }
        SearchOutcome::TooShort => {
            writeln!(
                out,
                "query must be at least {} characters",
                config.geocoding.min_query_chars
            )?;
        }
        SearchOutcome::NoMatch | SearchOutcome::Superseded => {
            writeln!(out, "no match for {query:?}")?;
        }
    }

    Ok(())
}
