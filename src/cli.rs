use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)] // requires `derive` feature
#[command(name = "storefront")]
#[command(about = "Product filtering and shopping cart for a static storefront", long_about = None)]
pub struct Cli {
    /// Catalog file (TOML or CSV), overriding the configured path
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Filter and search the catalog and print what remains visible
    Browse(BrowseArgs),
    /// Drive the storefront with page events read from stdin or a script
    Shop(ShopArgs),
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// Category to keep (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Brand to keep (repeatable)
    #[arg(long = "brand")]
    pub brands: Vec<String>,

    /// Price bucket such as 10-25 or 50+ (repeatable)
    #[arg(long = "price")]
    pub prices: Vec<String>,

    /// Free-text search over name, brand and price
    #[arg(long)]
    pub search: Option<String>,

    /// Emit the projection and listing as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ShopArgs {
    /// Read events from this file instead of stdin
    #[arg(long)]
    pub script: Option<PathBuf>,
}
