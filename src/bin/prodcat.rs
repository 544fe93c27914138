//! prodcat - product catalog CLI
//!
//! Look up products by identifier and inspect the remote catalog.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use prodcat::config::Config;
use prodcat::{ParamValue, ProductCatalog, QueryParams};

/// Product catalog CLI
#[derive(Parser)]
#[command(name = "prodcat")]
#[command(version = prodcat::PKG_VERSION)]
#[command(about = "Resilient product catalog lookups")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Catalog base URL (overrides config).
    #[arg(long, env = "PRODCAT_BASE_URL")]
    base_url: Option<String>,

    /// Skip warming the catalog before the command runs.
    #[arg(long)]
    no_preload: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find products by exact identifier
    Search {
        /// Product identifier
        id: String,
        /// Bypass the search result cache
        #[arg(long)]
        no_cache: bool,
    },

    /// Count products by status and type
    Stats,

    /// Fetch the raw catalog payload
    Catalog {
        /// Page number
        #[arg(long)]
        page: Option<i64>,
        /// Page size
        #[arg(long)]
        page_size: Option<i64>,
        /// Extra query parameter (repeatable)
        #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
        params: Vec<(String, ParamValue)>,
        /// Ignore the cached catalog
        #[arg(long)]
        force: bool,
    },

    /// Fetch the catalog once and report whether it succeeded
    Preload,

    /// Print the effective configuration
    Config,
}

fn parse_param(s: &str) -> Result<(String, ParamValue), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))?;
    if key.is_empty() {
        return Err(format!("empty parameter name in {s:?}"));
    }
    let value = value
        .parse::<ParamValue>()
        .map_err(|e| format!("invalid value in {s:?}: {e}"))?;
    Ok((key.to_string(), value))
}

/// Whether to warm the catalog before running `args.command`.
///
/// Only commands that read the default-parameter catalog are warmed; a
/// warmed cache would otherwise answer stats and parameterized catalog
/// requests in place of the server.
fn should_preload(args: &Args, config: &Config) -> bool {
    if !config.cache.preload_on_startup || args.no_preload {
        return false;
    }
    match &args.command {
        Command::Search { .. } => true,
        Command::Catalog {
            page,
            page_size,
            params,
            force,
        } => page.is_none() && page_size.is_none() && params.is_empty() && !force,
        Command::Stats | Command::Preload | Command::Config => false,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(url) = args.base_url.clone() {
        config.api.base_url = url;
    }

    let catalog = config.builder().build()?;

    if should_preload(&args, &config) {
        debug!("warming catalog cache");
        catalog.preload().await;
    }

    let outcome = match args.command {
        Command::Search { id, no_cache } => catalog
            .search_by_identifier(&id, !no_cache)
            .await
            .map(|products| {
                if products.is_empty() {
                    eprintln!("no product matches {:?}", id.trim());
                }
                serde_json::to_value(products)
            }),
        Command::Stats => catalog.get_stats().await.map(serde_json::to_value),
        Command::Catalog {
            page,
            page_size,
            params,
            force,
        } => {
            let mut query: QueryParams = params.into_iter().collect();
            if let Some(page) = page {
                query.insert("page".into(), ParamValue::Int(page));
            }
            if let Some(size) = page_size {
                query.insert("page_size".into(), ParamValue::Int(size));
            }
            catalog
                .get_catalog(&query, force)
                .await
                .map(|payload| serde_json::to_value(payload.as_ref()))
        }
        Command::Preload => {
            catalog.preload().await;
            let loaded = catalog.cache().is_catalog_valid().await;
            println!("{}", if loaded { "catalog loaded" } else { "catalog unavailable" });
            return Ok(());
        }
        Command::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
            return Ok(());
        }
    };

    match outcome {
        Ok(value) => print_json(&value?),
        Err(e) => {
            eprintln!("error: {}", e.user_message());
            debug!(error = %e, "command failed");
            std::process::exit(1);
        }
    }
}
