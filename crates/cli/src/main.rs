//! Dine CLI - browse menus and manage them as staff.
//!
//! # Usage
//!
//! ```bash
//! # Browse a restaurant's menu
//! dine menu r-1 --category mains --food veg
//!
//! # Price a basket (ITEM[@TYPE[:VALUE]][*COUNT], negative counts remove)
//! dine basket r-1 --add i-1 --add "i-2@HALF:1*2"
//!
//! # Staff session (password from DINE_PASSWORD or stdin, never argv)
//! DINE_PASSWORD=... dine login owner
//! pass show dine | dine login owner --password-stdin
//! dine whoami
//! dine logout
//!
//! # Menu management
//! dine items list r-1 --status disabled --page 2
//! dine items toggle r-1 i-1
//! dine categories add r-1 "Desserts"
//! dine restaurants list
//! ```
//!
//! # Environment Variables
//!
//! - `DINE_CATALOG_URL`, `DINE_ORGANIZATION_URL`, `DINE_AUTH_URL` - service base URLs
//! - `DINE_SESSION_FILE` - staff session file (default: `.dine/session.json`)
//! - `DINE_PASSWORD` - password for `login` unless `--password-stdin` is given
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT` - error tracking (optional)
//! - `RUST_LOG` - log filter (default: `dine=info,dine_admin=info,dine_storefront=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};
use dine_core::{FoodTypeFilter, StatusFilter};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::menu::LineSpec;

#[derive(Parser)]
#[command(name = "dine")]
#[command(author, version, about = "Dine restaurant menu tools")]
struct Cli {
    /// Sentry DSN for error reporting
    #[arg(long, env = "SENTRY_DSN", global = true, hide_env_values = true)]
    sentry_dsn: Option<String>,

    /// Sentry environment name
    #[arg(long, env = "SENTRY_ENVIRONMENT", global = true)]
    sentry_environment: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a restaurant's menu
    Menu {
        /// Restaurant id
        restaurant: String,

        /// Category id or name (`all` for every category)
        #[arg(short, long)]
        category: Option<String>,

        /// Dietary filter (`all`, `veg`, `non-veg`)
        #[arg(short, long, default_value = "all")]
        food: FoodTypeFilter,

        /// Search item names and descriptions instead of listing sections
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Build a basket from a restaurant's menu and show its totals
    Basket {
        /// Restaurant id
        restaurant: String,

        /// Line to add, applied in order: `ITEM[@TYPE[:VALUE]][*COUNT]`
        #[arg(short, long = "add", required = true)]
        lines: Vec<LineSpec>,

        /// Remove the line at this position after adding (0-based)
        #[arg(long)]
        remove_at: Option<usize>,
    },
    /// Sign in as staff
    Login {
        /// Staff username
        username: String,

        /// Read the password from the first line of stdin instead of `DINE_PASSWORD`
        #[arg(long)]
        password_stdin: bool,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in staff member
    Whoami,
    /// Manage menu items
    Items {
        #[command(subcommand)]
        action: ItemsAction,
    },
    /// Manage menu categories
    Categories {
        #[command(subcommand)]
        action: CategoriesAction,
    },
    /// Manage restaurants (super admin)
    Restaurants {
        #[command(subcommand)]
        action: RestaurantsAction,
    },
}

#[derive(Subcommand)]
enum ItemsAction {
    /// List a restaurant's items
    List {
        /// Restaurant id
        restaurant: String,

        /// Availability filter (`all`, `enabled`, `disabled`)
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,

        /// Category id or name
        #[arg(short, long)]
        category: Option<String>,

        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Rows per page
        #[arg(long, default_value_t = dine_admin::table::DEFAULT_PER_PAGE)]
        per_page: usize,
    },
    /// Enable a disabled item or disable an enabled one
    Toggle {
        /// Restaurant id
        restaurant: String,
        /// Item id
        item: String,
    },
    /// Delete an item
    Delete {
        /// Restaurant id
        restaurant: String,
        /// Item id
        item: String,
    },
}

#[derive(Subcommand)]
enum CategoriesAction {
    /// List a restaurant's categories
    List {
        /// Restaurant id
        restaurant: String,
    },
    /// Create a category
    Add {
        /// Restaurant id
        restaurant: String,
        /// Category name
        name: String,
    },
    /// Rename a category
    Rename {
        /// Restaurant id
        restaurant: String,
        /// Category id
        category: String,
        /// New name
        name: String,
    },
}

#[derive(Subcommand)]
enum RestaurantsAction {
    /// List every restaurant
    List,
    /// Show one restaurant
    Show {
        /// Restaurant id
        id: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(dsn: Option<&str>, environment: Option<String>) -> Option<sentry::ClientInitGuard> {
    let dsn = dsn.filter(|d| !d.is_empty())?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: environment.map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

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
    // Load .env before clap reads env-backed arguments
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let _sentry_guard = init_sentry(cli.sentry_dsn.as_deref(), cli.sentry_environment.clone());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dine=info,dine_admin=info,dine_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli).await {
        sentry::capture_error(&*e);
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match cli.command {
        Commands::Menu {
            restaurant,
            category,
            food,
            search,
        } => {
            commands::menu::show(&restaurant, category.as_deref(), food, search.as_deref()).await?;
        }
        Commands::Basket {
            restaurant,
            lines,
            remove_at,
        } => commands::menu::basket(&restaurant, &lines, remove_at).await?,
        Commands::Login {
            username,
            password_stdin,
        } => {
            let password = commands::session::read_password(password_stdin)?;
            commands::session::login(&username, &password).await?;
        }
        Commands::Logout => commands::session::logout().await?,
        Commands::Whoami => commands::session::whoami().await?,
        Commands::Items { action } => match action {
            ItemsAction::List {
                restaurant,
                status,
                category,
                page,
                per_page,
            } => {
                commands::items::list(&restaurant, status, category.as_deref(), page, per_page)
                    .await?;
            }
            ItemsAction::Toggle { restaurant, item } => {
                commands::items::toggle(&restaurant, &item).await?;
            }
            ItemsAction::Delete { restaurant, item } => {
                commands::items::delete(&restaurant, &item).await?;
            }
        },
        Commands::Categories { action } => match action {
            CategoriesAction::List { restaurant } => commands::categories::list(&restaurant).await?,
            CategoriesAction::Add { restaurant, name } => {
                commands::categories::add(&restaurant, &name).await?;
            }
            CategoriesAction::Rename {
                restaurant,
                category,
                name,
            } => commands::categories::rename(&restaurant, &category, &name).await?,
        },
        Commands::Restaurants { action } => match action {
            RestaurantsAction::List => commands::restaurants::list().await?,
            RestaurantsAction::Show { id } => commands::restaurants::show(&id).await?,
        },
    }
    Ok(())
}
