//! Command line configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use kunafa::{
    catalog::Category,
    config::{ConfigError, StoreConfig},
};

/// Kunafa storefront operator tool
#[derive(Debug, Parser)]
#[command(name = "kunafa-cli", about = "Kunafa storefront operator tool", long_about = None)]
pub struct CliConfig {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Store settings.
    #[command(flatten)]
    pub store: StoreArgs,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Store settings.
#[derive(Debug, Args)]
pub struct StoreArgs {
    /// Store configuration YAML (defaults to the built-in configuration)
    #[arg(long, env = "KUNAFA_STORE_CONFIG")]
    pub store_config: Option<PathBuf>,

    /// WhatsApp number orders are sent to, overriding the configuration
    #[arg(long, env = "KUNAFA_WHATSAPP_NUMBER")]
    pub whatsapp_number: Option<String>,
}

impl StoreArgs {
    /// Read the store configuration and apply overrides.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or is invalid, or
    /// the WhatsApp override is not a phone number.
    pub fn load(&self) -> Result<StoreConfig, ConfigError> {
        let config = match &self.store_config {
            Some(path) => StoreConfig::from_path(path)?,
            None => StoreConfig::builtin()?,
        };

        match &self.whatsapp_number {
            Some(number) => config.with_whatsapp_number(number),
            None => Ok(config),
        }
    }
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the menu with prices for every size
    Menu {
        /// Only show one category (nablusi, cream, chocolate)
        #[arg(long, value_parser = parse_category)]
        category: Option<Category>,

        /// Only show featured products
        #[arg(long)]
        featured: bool,
    },

    /// Price an order file and print its WhatsApp message and link
    Order {
        /// Order YAML file
        file: PathBuf,

        /// Open the WhatsApp link in the browser
        #[arg(long)]
        open: bool,
    },

    /// Resolve an address through the geocoder
    Locate {
        /// Free-text address
        query: String,
    },
}

fn parse_category(value: &str) -> Result<Category, String> {
    value.parse().map_err(|error: kunafa::catalog::CatalogError| error.to_string())
}
