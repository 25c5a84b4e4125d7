//! # shopcart-quote
//!
//! ## Usage
//! ```bash
//! # Distance between two points
//! shopcart-quote distance --from 17.385,78.4867 --to 17.44,78.35
//!
//! # Quote a cart (delivery charged once)
//! shopcart-quote quote --shops shops.json --request request.json
//!
//! # Price a checkout and emit the order rows to persist
//! shopcart-quote checkout --shops shops.json --request request.json
//!
//! # Build a saved cart, dropping some items by name
//! shopcart-quote cart --request request.json --remove lemon
//! ```
//!
//! The response goes to stdout, logs go to stderr. A failed command, or a
//! bad `SHOPCART_*` variable, prints the error envelope and exits with
//! status 1.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use shopcart_core::{CheckoutRequest, GeoPoint};
use shopcart_quote_cli::commands;
use shopcart_quote_cli::config::{QuoteConfig, DEFAULT_LOG_LEVEL, DEFAULT_PRETTY_JSON};
use shopcart_quote_cli::error::ApiError;
use shopcart_quote_cli::shops::ShopRow;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Shop selection and delivery pricing for the ShopCart marketplace.
#[derive(Parser, Debug)]
#[command(name = "shopcart-quote", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Great-circle distance between two points, in kilometres.
    Distance {
        /// Start point as "lat,lon"
        #[arg(long, allow_hyphen_values = true)]
        from: GeoPoint,
        /// End point as "lat,lon"
        #[arg(long, allow_hyphen_values = true)]
        to: GeoPoint,
    },
    /// Quote a cart with a single delivery charge.
    Quote(RequestArgs),
    /// Price a checkout and build the order rows to persist.
    Checkout(RequestArgs),
    /// Build a saved cart from a request's items.
    Cart {
        /// JSON request body
        #[arg(long)]
        request: PathBuf,
        /// Remove every item with this name (repeatable)
        #[arg(long)]
        remove: Vec<String>,
    },
}

#[derive(clap::Args, Debug)]
struct RequestArgs {
    /// JSON array of shop rows
    #[arg(long)]
    shops: PathBuf,
    /// JSON request body
    #[arg(long)]
    request: PathBuf,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let loaded = QuoteConfig::load();

    // RUST_LOG wins over the configured level
    let log_level = loaded
        .as_ref()
        .map_or(DEFAULT_LOG_LEVEL, |config| config.log_level.as_str());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match loaded {
        Ok(config) => config,
        Err(err) => return emit(Err(ApiError::from(err)), DEFAULT_PRETTY_JSON),
    };
    info!(
        min_delivery_charge = %config.min_delivery_charge,
        delivery_rate_per_km = %config.delivery_rate_per_km,
        "Configuration loaded"
    );

    let policy = config.pricing_policy();
    let outcome = match cli.command {
        Command::Distance { from, to } => commands::distance(&from, &to).and_then(to_value),
        Command::Quote(args) => load_inputs(&args)
            .and_then(|(shops, request)| commands::quote(&policy, &shops, &request))
            .and_then(to_value),
        Command::Checkout(args) => load_inputs(&args)
            .and_then(|(shops, request)| {
                commands::checkout(&policy, &shops, &request, Utc::now())
            })
            .and_then(to_value),
        Command::Cart { request, remove } => commands::load_json::<CheckoutRequest>(&request)
            .and_then(|request| commands::cart(&request, &remove))
            .and_then(to_value),
    };

    emit(outcome, config.pretty_json)
}

/// Prints the response body, or the error envelope, to stdout.
fn emit(outcome: Result<serde_json::Value, ApiError>, pretty: bool) -> anyhow::Result<ExitCode> {
    let (body, code) = match outcome {
        Ok(body) => (body, ExitCode::SUCCESS),
        Err(err) => {
            warn!(code = ?err.code, message = %err.message, "Command failed");
            (serde_json::to_value(&err)?, ExitCode::FAILURE)
        }
    };

    let rendered = if pretty {
        serde_json::to_string_pretty(&body)?
    } else {
        serde_json::to_string(&body)?
    };
    println!("{rendered}");

    Ok(code)
}

fn load_inputs(args: &RequestArgs) -> Result<(Vec<ShopRow>, CheckoutRequest), ApiError> {
    let shops = commands::load_json(&args.shops)?;
    let request = commands::load_json(&args.request)?;
    Ok((shops, request))
}

fn to_value<T: Serialize>(body: T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::invalid_input(e.to_string()))
}
