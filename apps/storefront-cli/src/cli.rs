//! Argument definitions for the `storefront` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use storefront_core::SortKey;

#[derive(Parser)]
#[command(
    name = "storefront",
    version,
    about = "Storefront catalog, checkout forms and session from the terminal"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (default: platform config dir, storefront.toml).
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Filter, sort and paginate the product catalog.
    Browse(BrowseArgs),

    /// Format and validate a payment card.
    Card(CardArgs),

    /// Run one input formatter.
    Format {
        #[arg(value_enum)]
        kind: FormatKind,
        value: String,
    },

    /// Sign in and persist the session token.
    Login {
        #[arg(long, short)]
        username: String,
        #[arg(long, short)]
        password: String,
    },

    /// Show the user behind the persisted session.
    Whoami,

    /// Clear the session and the persisted token.
    Logout,
}

#[derive(Args)]
pub struct BrowseArgs {
    /// Read products from a JSON file instead of the remote API.
    #[arg(long, value_name = "JSON")]
    pub file: Option<PathBuf>,

    /// Category slug (remote only).
    #[arg(long)]
    pub category: Option<String>,

    /// Brand to include; repeat for several.
    #[arg(long = "brand", value_name = "BRAND")]
    pub brands: Vec<String>,

    #[arg(long)]
    pub min_price: Option<f64>,

    #[arg(long)]
    pub max_price: Option<f64>,

    #[arg(long)]
    pub min_rating: Option<f64>,

    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,

    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Overrides `catalog.items_per_page`.
    #[arg(long)]
    pub per_page: Option<usize>,

    /// Print the page as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CardArgs {
    #[arg(long)]
    pub number: String,
    #[arg(long)]
    pub expiry: String,
    #[arg(long)]
    pub cvv: String,
    #[arg(long)]
    pub name: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatKind {
    Card,
    Expiry,
    Cvv,
    Zip,
    Phone,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortArg {
    PriceLow,
    PriceHigh,
    Rating,
    Name,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::PriceLow => SortKey::PriceLow,
            SortArg::PriceHigh => SortKey::PriceHigh,
            SortArg::Rating => SortKey::Rating,
            SortArg::Name => SortKey::Name,
        }
    }
}
