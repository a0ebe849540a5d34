//! Subcommands

use std::{io, path::PathBuf};

use thiserror::Error;

use kunafa::{
    cart::CartError,
    catalog::{Catalog, CatalogError, ProductId},
    checkout::CheckoutError,
    config::{ConfigError, StoreConfig},
    location::{LocationPicker, NominatimBuildError, NominatimGeocoder},
};

use crate::config::Command;

mod locate;
mod menu;
mod order;

/// Errors raised by a subcommand.
#[derive(Debug, Error)]
pub(crate) enum CommandError {
    /// Store configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Catalog could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// An order item could not be added to the cart.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The order could not be checked out.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// The geocoder could not be built.
    #[error(transparent)]
    Geocoder(#[from] NominatimBuildError),

    /// Order file could not be parsed.
    #[error("failed to parse order file {path}: {source}")]
    OrderFile {
        /// Order file path
        path: PathBuf,
        /// Parse error
        source: serde_norway::Error,
    },

    /// An order item refers to a product that is not on the menu.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    /// Writing output or reading input failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Run `command` against the store, writing its output to `out`.
pub(crate) async fn run(
    command: Command,
    config: &StoreConfig,
    out: &mut impl io::Write,
) -> Result<(), CommandError> {
    match command {
        Command::Menu { category, featured } => {
            let catalog = Catalog::builtin()?;
            let filter = menu::MenuFilter { category, featured };

            menu::write_menu(out, &catalog, filter, &config.currency_label)
        }
        Command::Order { file, open } => {
            let catalog = Catalog::builtin()?;
            let order = order::OrderFile::load(&file)?;
            let handoff = if open {
                order::TerminalHandoff::Browser
            } else {
                order::TerminalHandoff::PrintOnly
            };

            order::run_order(out, config, &catalog, &order, handoff)
        }
        Command::Locate { query } => {
            let geocoder = NominatimGeocoder::new(&config.geocoding)?;
            let picker = LocationPicker::new(geocoder, &config.geocoding);

            locate::run_locate(out, &picker, config, &query).await
        }
    }
}
