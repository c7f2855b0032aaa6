mod cli;
mod logging;
mod report;
mod session;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use cli::{BrowseArgs, Cli, Commands, ShopArgs};
use colored::*;
use dotenv::dotenv;
use std::fs;
use std::io::{self, BufReader, IsTerminal};
use std::path::{Path, PathBuf};
use std::process;
use storefront::catalog::{self, Catalog};
use storefront::filter::{project, FilterControl, FilterCriteria, FilterDimension};
use storefront::{AppConfig, Storefront};
use tracing::{error, info};

fn main() -> Result<()> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match storefront::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();
    let catalog_path = args
        .catalog
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.catalog_path));

    match args.command {
        Some(Commands::Browse(browse)) => run_browse(&config, &catalog_path, &browse)?,
        Some(Commands::Shop(shop)) => run_shop(&config, &catalog_path, &shop)?,
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }

    Ok(())
}

fn load(config: &AppConfig, path: &Path) -> Result<Catalog> {
    catalog::load_catalog(path, &config.currency_symbol)
        .with_context(|| format!("loading catalog {}", path.display()))
}

fn run_browse(config: &AppConfig, path: &Path, args: &BrowseArgs) -> Result<()> {
    let mut catalog = load(config, path)?;

    // Go through checkbox controls so CLI filters follow the page's rules
    let checked = |dimension, values: &[String]| -> Vec<FilterControl> {
        values
            .iter()
            .map(|v| FilterControl {
                dimension,
                value: v.clone(),
                checked: true,
            })
            .collect()
    };
    let mut controls = checked(FilterDimension::Category, &args.categories);
    controls.extend(checked(FilterDimension::Brand, &args.brands));
    controls.extend(checked(FilterDimension::Price, &args.prices));

    let criteria =
        FilterCriteria::from_controls(&controls, args.search.as_deref().unwrap_or_default());
    let projection = project(&mut catalog, &criteria);

    if args.json {
        let output = serde_json::json!({
            "projection": projection,
            "catalog": catalog,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    report::print_listing(&catalog);
    info!(
        "{} of {} products visible",
        format!("{}", projection.visible_products).green(),
        projection.total_products,
    );
    Ok(())
}

fn run_shop(config: &AppConfig, path: &Path, args: &ShopArgs) -> Result<()> {
    let catalog = load(config, path)?;
    let mut storefront = Storefront::new(catalog, config)
        .with_listener(Box::new(report::TerminalListener::new(&config.currency_symbol)));

    match &args.script {
        Some(script) => {
            let file = fs::File::open(script)
                .with_context(|| format!("opening script {}", script.display()))?;
            session::run(&mut storefront, BufReader::new(file), false)
        }
        None => {
            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            session::run(&mut storefront, stdin.lock(), interactive)
        }
    }
}
