//! Go Marketplace CLI - Inspect and edit the persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! gm-cart show
//!
//! # Print the raw snapshot
//! gm-cart show --json
//!
//! # Add a product (or one more unit of it)
//! gm-cart add --id 1 --title "Cadeira Rivatti" --image-url https://… --price 400
//!
//! # Change quantities
//! gm-cart increment 1
//! gm-cart decrement 1
//! ```
//!
//! # Environment Variables
//!
//! - `CART_STORAGE_BACKEND` - `file` (default) or `memory`
//! - `CART_STORAGE_DIR` - Directory for the file backend (default: `.cart`)
//! - `CART_STORAGE_KEY` - Snapshot key (default: `@cart/GoMarketPlace`)
//! - `RUST_LOG` - Log filter (default: `go_marketplace_cli=info,go_marketplace_storefront=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use go_marketplace_core::{Price, ProductId};
use go_marketplace_storefront::{CartConfig, CartProvider, CartStore};

mod commands;

#[derive(Parser)]
#[command(name = "gm-cart")]
#[command(author, version, about = "Go Marketplace cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the items in the cart
    Show {
        /// Print the cart as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add a product, or one more unit of it if already in the cart
    Add {
        /// Product ID
        #[arg(short, long)]
        id: ProductId,

        /// Display title
        #[arg(short, long)]
        title: String,

        /// Image URL
        #[arg(long)]
        image_url: String,

        /// Unit price (e.g. 19.90)
        #[arg(short, long)]
        price: Price,
    },
    /// Add one unit of a product already in the cart
    Increment {
        /// Product ID
        id: ProductId,
    },
    /// Remove one unit of a product (never below zero)
    Decrement {
        /// Product ID
        id: ProductId,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "go_marketplace_cli=info,go_marketplace_storefront=info".into());

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
    let config = CartConfig::from_env()?;
    tracing::debug!(
        backend = %config.backend,
        dir = %config.storage_dir.display(),
        key = %config.storage_key,
        "Loaded cart configuration"
    );

    let store = CartStore::from_config(&config);
    store.initialize().await;
    let _provider = CartProvider::install(store);

    match cli.command {
        Commands::Show { json } => commands::cart::show(json)?,
        Commands::Add {
            id,
            title,
            image_url,
            price,
        } => commands::cart::add(id, title, image_url, price).await?,
        Commands::Increment { id } => commands::cart::increment(&id).await?,
        Commands::Decrement { id } => commands::cart::decrement(&id).await?,
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_show_json_help_describes_cart_output() {
        let mut cli = Cli::command();
        let show = cli.find_subcommand_mut("show").unwrap();
        let json = show
            .get_arguments()
            .find(|arg| arg.get_id() == "json")
            .unwrap();

        let help = json.get_help().unwrap().to_string();
        assert_eq!(help, "Print the cart as JSON instead of a table");
    }

    #[test]
    fn test_add_parses_typed_arguments() {
        let cli = Cli::try_parse_from([
            "gm-cart", "add", "--id", "p1", "--title", "Mug", "--image-url", "u", "--price", "9.5",
        ])
        .unwrap();

        let Commands::Add { id, price, .. } = cli.command else {
            panic!("expected add command");
        };
        assert_eq!(id.as_str(), "p1");
        assert_eq!(price, Price::from_cents(950));
    }
}
