use std::{
    io,
    path::{Path, PathBuf},
    process,
};

use serde::Deserialize;
use tracing::info;

use kunafa::{
    cart::{CartError, CartStore},
    catalog::{Catalog, ProductId, Size},
    checkout::{Checkout, HandoffError, OrderDraft, OrderHandoff},
    config::StoreConfig,
    pricing::{format_fixed, format_plain},
    selection::ProductSelection,
};

use super::CommandError;

/// One line of an order file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct OrderFileItem {
    pub product: ProductId,
    #[serde(default)]
    pub size: Size,
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}

/// Order file: the checkout form fields plus the items to put in the cart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct OrderFile {
    #[serde(flatten)]
    pub draft: OrderDraft,
    pub items: Vec<OrderFileItem>,
}

impl OrderFile {
    /// Read an order file.
    pub(crate) fn load(path: &Path) -> Result<Self, CommandError> {
        let contents = std::fs::read_to_string(path)?;

        Self::from_yaml(&contents, path)
    }

    fn from_yaml(yaml: &str, path: &Path) -> Result<Self, CommandError> {
        serde_norway::from_str(yaml).map_err(|source| CommandError::OrderFile {
            path: PathBuf::from(path),
            source,
        })
    }

    /// Fill a cart with the file's items, picking each one the way a
    /// product card does.
    pub(crate) fn build_cart(&self, catalog: &Catalog) -> Result<CartStore, CommandError> {
        let mut cart = CartStore::new(catalog.currency());

        for item in &self.items {
            let product = catalog
                .get(&item.product)
                .ok_or_else(|| CommandError::UnknownProduct(item.product.clone()))?;

            if item.quantity == 0 {
                return Err(CartError::ZeroQuantity.into());
            }

            let mut selection = ProductSelection::new();
            selection.select_size(item.size);
            selection.set_quantity(item.quantity);
            selection.add_to_cart(product, &mut cart)?;
        }

        Ok(cart)
    }
}

/// Where the order link goes once the order is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TerminalHandoff {
    /// Only print the link.
    PrintOnly,

    /// Print the link and open it with the platform's URL opener.
    Browser,
}

impl OrderHandoff for TerminalHandoff {
    fn dispatch(&self, link: &str) -> Result<(), HandoffError> {
        match self {
            TerminalHandoff::PrintOnly => Ok(()),
            TerminalHandoff::Browser => open_in_browser(link),
        }
    }
}

fn open_in_browser(link: &str) -> Result<(), HandoffError> {
    let mut command = if cfg!(target_os = "macos") {
        process::Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut command = process::Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    } else {
        process::Command::new("xdg-open")
    };

    let status = command
        .arg(link)
        .status()
        .map_err(|error| HandoffError::Open(error.to_string()))?;

    if status.success() {
        Ok(())
    } else {
        Err(HandoffError::Open(format!("URL opener exited with {status}")))
    }
}

/// Check out an order file and print its totals, message and link.
pub(crate) fn run_order(
    out: &mut impl io::Write,
    config: &StoreConfig,
    catalog: &Catalog,
    order: &OrderFile,
    handoff: impl OrderHandoff,
) -> Result<(), CommandError> {
    let mut cart = order.build_cart(catalog)?;
    let checkout = Checkout::new(config, handoff);

    let prepared = checkout.submit(&mut cart, &order.draft)?;
    let label = &config.currency_label;

    info!(
        "order file checked out: {} items, {} {}",
        order.items.len(),
        prepared.quote.grand_total.amount(),
        prepared.quote.grand_total.currency().iso_alpha_code,
    );

    writeln!(out, "المجموع الفرعي: {} {label}", format_plain(&prepared.quote.subtotal))?;
    writeln!(out, "رسوم التوصيل: {} {label}", format_plain(&prepared.quote.delivery_fee))?;
    writeln!(out, "الإجمالي: {} {label}", format_fixed(&prepared.quote.grand_total))?;
    writeln!(out)?;
    writeln!(out, "{}", prepared.summary)?;
    writeln!(out)?;
    writeln!(out, "{}", prepared.link)?;

    Ok(())
}
