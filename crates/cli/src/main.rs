//! Shopsync CLI - session, catalog, and cart management from the shell.
//!
//! # Usage
//!
//! ```bash
//! # Authenticate and inspect the session
//! shopsync login -e user@example.com -p secret
//! shopsync whoami
//! shopsync logout
//!
//! # Browse the merged catalog
//! shopsync products
//! shopsync products --category clothes
//! shopsync categories
//!
//! # Manage the persisted cart
//! shopsync cart add 42
//! shopsync cart list
//! shopsync cart set-qty 42 3
//! shopsync cart clear
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPSYNC_API_ENDPOINT` - GraphQL endpoint (required)
//! - `SHOPSYNC_DATA_DIR` - local persistence directory (default `.shopsync`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::App;

#[derive(Parser)]
#[command(name = "shopsync")]
#[command(author, version, about = "Shopsync store tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and persist the session
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Clear the persisted session
    Logout,
    /// Show the cached user snapshot
    Whoami,
    /// Create an account (does not log in)
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Exchange the stored refresh token for a new pair
    Refresh,
    /// List the merged product catalog
    Products {
        /// Filter by category name (case-insensitive), `all` for everything
        #[arg(short, long, default_value = "all")]
        category: String,
    },
    /// Create a local-only product in the fallback store
    ProductAdd {
        /// Product title
        title: String,

        /// Unit price, e.g. `19.99`
        price: String,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Image URL
        #[arg(short, long, default_value = "")]
        image: String,
    },
    /// Remove a product from the catalog
    ProductRm {
        /// Product id (local or remote)
        id: String,
    },
    /// List categories (pinned default, user-created, matched remote)
    Categories,
    /// Manage user-created categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// Create a user-created category
    Add {
        /// Category name
        name: String,

        /// Image URL or asset path
        #[arg(short, long, default_value = "")]
        image: String,
    },
    /// Rename a user-created category or change its image
    Edit {
        /// Category id
        id: String,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New image URL or asset path
        #[arg(short, long)]
        image: Option<String>,
    },
    /// Delete a user-created category
    Rm {
        /// Category id
        id: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product to the cart (by catalog product id)
    Add {
        /// Product id
        id: String,
    },
    /// List cart lines and the grand total
    List,
    /// Set a line's quantity (minimum 1)
    SetQty {
        /// Product id
        id: String,

        /// New quantity
        quantity: u32,
    },
    /// Remove a line entirely
    Rm {
        /// Product id
        id: String,
    },
    /// Empty the cart
    Clear,
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
    let app = App::from_env()?;

    match cli.command {
        Commands::Login { email, password } => commands::session::login(&app, &email, &password).await?,
        Commands::Logout => commands::session::logout(&app),
        Commands::Whoami => commands::session::whoami(&app),
        Commands::Register {
            name,
            email,
            password,
        } => commands::session::register(&app, &name, &email, &password).await?,
        Commands::Refresh => commands::session::refresh(&app).await?,
        Commands::Products { category } => commands::catalog::products(&app, &category).await?,
        Commands::ProductAdd {
            title,
            price,
            description,
            image,
        } => commands::catalog::add_product(&app, &title, &price, &description, &image)?,
        Commands::ProductRm { id } => commands::catalog::remove_product(&app, &id).await?,
        Commands::Categories => commands::catalog::categories(&app).await?,
        Commands::Category { action } => match action {
            CategoryAction::Add { name, image } => {
                commands::catalog::add_category(&app, &name, &image)?;
            }
            CategoryAction::Edit { id, name, image } => {
                commands::catalog::edit_category(&app, &id, name, image)?;
            }
            CategoryAction::Rm { id } => commands::catalog::remove_category(&app, &id)?,
        },
        Commands::Cart { action } => match action {
            CartAction::Add { id } => commands::cart::add(&app, &id).await?,
            CartAction::List => commands::cart::list(&app),
            CartAction::SetQty { id, quantity } => commands::cart::set_quantity(&app, &id, quantity)?,
            CartAction::Rm { id } => commands::cart::remove(&app, &id)?,
            CartAction::Clear => commands::cart::clear(&app)?,
        },
    }
    Ok(())
}
