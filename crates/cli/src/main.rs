//! VIBE CLI - catalog inspection and scripted checkout.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog, optionally filtered and sorted
//! vibe catalog list --category Hoodies --sort price-asc
//!
//! # Show one product
//! vibe catalog show 3
//!
//! # Validate a catalog file
//! vibe catalog validate data/products.json
//!
//! # Search by name or category
//! vibe search tee
//!
//! # Run a checkout against the simulated gateway
//! vibe checkout --item 3:M:2 --item 6
//! ```
//!
//! # Commands
//!
//! - `catalog` - List, show and validate products
//! - `search` - Search products
//! - `checkout` - Fill a cart and check out in a local session

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vibe_core::CurrencyCode;
use vibe_storefront::catalog::Catalog;

mod commands;

use commands::checkout::ItemSpec;

#[derive(Parser)]
#[command(name = "vibe")]
#[command(author, version, about = "VIBE storefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Catalog source and display options shared by most commands.
#[derive(Args)]
struct CatalogArgs {
    /// Catalog JSON file (defaults to `VIBE_CATALOG_PATH`, then the built-in catalog)
    #[arg(short, long, env = "VIBE_CATALOG_PATH")]
    file: Option<PathBuf>,

    /// Display currency
    #[arg(long, env = "VIBE_CURRENCY", default_value = "VND")]
    currency: CurrencyCode,
}

impl CatalogArgs {
    async fn load(&self) -> Result<Catalog, vibe_storefront::catalog::CatalogError> {
        Catalog::load_or_builtin(self.file.as_deref()).await
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Search products by name or category
    Search {
        /// Search text (case-insensitive)
        query: String,

        #[command(flatten)]
        catalog: CatalogArgs,
    },
    /// Fill a cart and run it through checkout
    Checkout {
        /// Cart line as `id[:size[:quantity]]`, repeatable
        #[arg(short, long = "item", required = true)]
        items: Vec<ItemSpec>,

        /// Simulated payment delay in milliseconds
        #[arg(long, env = "VIBE_CHECKOUT_DELAY_MS", default_value_t = 2000)]
        delay_ms: u64,

        #[command(flatten)]
        catalog: CatalogArgs,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Category label, e.g. "T-Shirts" (unknown values list everything)
        #[arg(short, long)]
        category: Option<String>,

        /// Sort key: newest, price-asc, price-desc
        #[arg(short, long)]
        sort: Option<String>,

        #[command(flatten)]
        catalog: CatalogArgs,
    },
    /// Show one product
    Show {
        /// Product ID
        id: u32,

        #[command(flatten)]
        catalog: CatalogArgs,
    },
    /// Validate a catalog file
    Validate {
        /// Catalog JSON file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vibe_cli=info,vibe_storefront=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List {
                category,
                sort,
                catalog,
            } => {
                let products = catalog.load().await?;
                commands::catalog::list(
                    &products,
                    category.as_deref(),
                    sort.as_deref(),
                    catalog.currency,
                );
            }
            CatalogAction::Show { id, catalog } => {
                let products = catalog.load().await?;
                commands::catalog::show(&products, id, catalog.currency)?;
            }
            CatalogAction::Validate { path } => commands::catalog::validate(&path).await?,
        },
        Commands::Search { query, catalog } => {
            let products = catalog.load().await?;
            commands::search::run(&products, &query, catalog.currency);
        }
        Commands::Checkout {
            items,
            delay_ms,
            catalog,
        } => {
            let products = catalog.load().await?;
            commands::checkout::run(
                products,
                &items,
                Duration::from_millis(delay_ms),
                catalog.currency,
            )
            .await?;
        }
    }
    Ok(())
}
