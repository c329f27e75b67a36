//! Supra CLI - Catalog inspection and cart management tools.
//!
//! # Usage
//!
//! ```bash
//! # Fetch the catalog (uses the cached snapshot when fresh)
//! supra fetch
//!
//! # Force a refresh
//! supra fetch --force
//!
//! # List categories with their subcategories
//! supra categories
//!
//! # Page through a subcategory, sorted by price
//! supra menu --subcategory 662a1f --sort price --page 2
//!
//! # Look an item up by slug
//! supra item khachapuri
//!
//! # Cart operations
//! supra cart add saperavi --qty 2 --confirm-age
//! supra cart show
//! supra cart checkout
//! ```
//!
//! # Commands
//!
//! - `fetch` - Fetch or refresh the catalog
//! - `categories` - List categories and subcategories
//! - `menu` - Query a subcategory (search/sort/paginate)
//! - `item` - Look an item up by slug
//! - `cart` - Manage the cart

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};
use supra_core::Locale;

mod commands;

use commands::{cart, catalog};

#[derive(Parser)]
#[command(name = "supra")]
#[command(author, version, about = "Supra catalog and cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch or refresh the catalog
    Fetch {
        /// Force a network refresh even when the cache is fresh
        #[arg(short, long)]
        force: bool,
    },
    /// List categories with their subcategories
    Categories,
    /// Query items in a subcategory
    Menu {
        /// Subcategory id to list
        #[arg(short, long)]
        subcategory: String,

        /// Substring to search for
        #[arg(long)]
        search: Option<String>,

        /// Sort key: name or price
        #[arg(long)]
        sort: Option<String>,

        /// Sort descending instead of ascending
        #[arg(long)]
        desc: bool,

        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Items per page
        #[arg(long, default_value_t = 12)]
        per_page: u32,

        /// Locale for search, sort, and display
        #[arg(long, default_value = "en")]
        locale: Locale,
    },
    /// Look an item up by slug
    Item {
        /// Item slug
        slug: String,

        /// Locale for display
        #[arg(long, default_value = "en")]
        locale: Locale,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart lines and totals
    Show,
    /// Add an item to the cart by slug
    Add {
        /// Item slug
        slug: String,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        qty: u32,

        /// Confirm being of legal drinking age (required for alcohol)
        #[arg(long)]
        confirm_age: bool,
    },
    /// Remove a line by item id
    Remove {
        /// Item id
        id: String,
    },
    /// Empty the cart
    Clear,
    /// Print the checkout submission payload
    Checkout {
        /// Locale used to resolve item names
        #[arg(long, default_value = "en")]
        locale: Locale,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = supra_catalog::CatalogConfig::from_env()?;

    match cli.command {
        Commands::Fetch { force } => catalog::fetch(&config, force).await?,
        Commands::Categories => catalog::categories(&config).await?,
        Commands::Menu {
            subcategory,
            search,
            sort,
            desc,
            page,
            per_page,
            locale,
        } => {
            catalog::menu(
                &config,
                &subcategory,
                search.as_deref(),
                sort.as_deref(),
                desc,
                page,
                per_page,
                locale,
            )
            .await?;
        }
        Commands::Item { slug, locale } => catalog::item(&config, &slug, locale).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => cart::show(&config)?,
            CartAction::Add {
                slug,
                qty,
                confirm_age,
            } => cart::add(&config, &slug, qty, confirm_age).await?,
            CartAction::Remove { id } => cart::remove(&config, &id)?,
            CartAction::Clear => cart::clear(&config)?,
            CartAction::Checkout { locale } => cart::checkout(&config, locale)?,
        },
    }

    Ok(())
}
