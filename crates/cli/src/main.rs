//! CafeBot CLI - Database migrations and catalog management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! cafebot migrate
//!
//! # Store the built-in catalog, or one read from YAML
//! cafebot menu upload
//! cafebot menu upload --file menu.yaml
//!
//! # Print the stored catalog
//! cafebot menu show
//!
//! # Print stored orders
//! cafebot orders list
//! ```
//!
//! All commands read `CAFEBOT_DATABASE_URL` (or `DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cafebot")]
#[command(author, version, about = "CafeBot CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage the stored menu
    Menu {
        #[command(subcommand)]
        action: MenuAction,
    },
    /// Inspect stored orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum MenuAction {
    /// Replace the stored menu
    Upload {
        /// YAML catalog to upload instead of the built-in one
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Print the stored menu
    Show,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// Print all orders, oldest first
    List,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Menu { action } => match action {
            MenuAction::Upload { file } => commands::menu::upload(file.as_deref()).await?,
            MenuAction::Show => commands::menu::show().await?,
        },
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list().await?,
        },
    }
    Ok(())
}
