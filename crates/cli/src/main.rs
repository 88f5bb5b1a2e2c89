//! RocketShoes CLI - drive the cart store from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the persisted cart
//! rs-cart show
//!
//! # Add one unit of product 42
//! rs-cart add 42
//!
//! # Set product 42 to 3 units
//! rs-cart update 42 3
//!
//! # Remove product 42
//! rs-cart remove 42
//! ```
//!
//! # Commands
//!
//! - `show` - Print the cart (table or `--json`)
//! - `add` - Add one unit of a product
//! - `remove` - Remove a product's line-item
//! - `update` - Set a product's quantity
//!
//! Configuration is read from the environment; see `rocketshoes_cart::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocketshoes_cart::CartConfig;
use rocketshoes_core::ProductId;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "rs-cart")]
#[command(author, version, about = "RocketShoes cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current cart
    Show {
        /// Print the raw persisted JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Set the quantity of a product already in the cart
    Update {
        /// Product ID
        product_id: ProductId,

        /// New quantity (zero or less is ignored)
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CartConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = match CartConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocketshoes_cart=info,rocketshoes_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &CartConfig) -> Result<(), commands::cart::CommandError> {
    let mut store = commands::cart::open_store(config)?;

    match cli.command {
        Commands::Show { json } => commands::cart::show(&store, json)?,
        Commands::Add { product_id } => {
            store.add_product(product_id).await?;
            commands::cart::show(&store, false)?;
        }
        Commands::Remove { product_id } => {
            store.remove_product(product_id)?;
            commands::cart::show(&store, false)?;
        }
        Commands::Update { product_id, amount } => {
            commands::cart::update(&mut store, product_id, amount).await?;
            commands::cart::show(&store, false)?;
        }
    }
    Ok(())
}
