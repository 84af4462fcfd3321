//! Sabriaz CLI - shop, track orders and run the back-office from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse and fill the cart
//! sabriaz products --search oud --sort price-low
//! sabriaz cart add 65f0c1d2e3
//! sabriaz cart show
//!
//! # Check out as a guest with cash on delivery
//! sabriaz checkout --name "Zara" --phone 03001234567 --address "House 12" --city Lahore
//!
//! # Prepaid checkout with a payment screenshot
//! sabriaz checkout ... --payment jazzcash --proof ./receipt.png
//!
//! # Back-office
//! sabriaz login -e owner@sabriaz.com -p '...'
//! sabriaz admin analytics
//! sabriaz admin orders --status pending --search 0300
//! sabriaz admin order-status 65f0c1 shipped
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and change the persisted cart
//! - `login` / `register` / `logout` / `whoami` - Session management
//! - `products` - List the catalog with filters
//! - `orders` - Order history and cancellation
//! - `checkout` - Place an order for the cart
//! - `subscribe` - Join the newsletter
//! - `contact` - Print a WhatsApp link for a message
//! - `sitemap` - Write the static sitemap
//! - `admin` - Back-office reports and order management

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sabriaz_core::{OrderStatus, PaymentMethod, PaymentStatus};
use sabriaz_storefront::catalog::SortBy;
use sabriaz_storefront::config::StorefrontConfig;
use sabriaz_storefront::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "sabriaz")]
#[command(author, version, about = "Sabriaz storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show who is signed in
    Whoami,
    /// List products
    Products {
        /// Match against name or description
        #[arg(short, long)]
        search: Option<String>,
        /// Category slug or id
        #[arg(short, long)]
        category: Option<String>,
        /// default, price-low, price-high, discount, name-az
        #[arg(long, default_value = "default")]
        sort: SortBy,
    },
    /// List your orders, or cancel one
    Orders {
        #[command(subcommand)]
        action: Option<OrdersAction>,
    },
    /// Place an order for the cart
    Checkout(CheckoutArgs),
    /// Subscribe to the newsletter
    Subscribe {
        email: String,
    },
    /// Print a WhatsApp link carrying a message
    Contact {
        message: String,
    },
    /// Write the static sitemap
    Sitemap {
        #[arg(short, long, default_value = "public/sitemap.xml")]
        out: PathBuf,
    },
    /// Back-office (admin accounts only)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print items and totals
    Show,
    /// Add one unit of a product
    Add { product_id: String },
    /// Remove a product entirely
    Remove { product_id: String },
    /// Add one more unit of a product already in the cart
    Inc { product_id: String },
    /// Take away one unit, never below one
    Dec { product_id: String },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// Cancel an order (signed in only)
    Cancel { order_id: String },
}

#[derive(clap::Args)]
struct CheckoutArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    #[arg(long, default_value = "")]
    notes: String,
    /// Free sample by name; repeat up to five times
    #[arg(long = "tester")]
    testers: Vec<String>,
    /// cod, jazzcash or bank_transfer
    #[arg(long, default_value = "cod")]
    payment: PaymentMethod,
    /// Payment screenshot, required for prepaid methods
    #[arg(long)]
    proof: Option<PathBuf>,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Sales dashboard over non-cancelled orders
    Analytics {
        /// Hours east of UTC used to group orders by day
        #[arg(long, default_value_t = 5, allow_hyphen_values = true)]
        utc_offset_hours: i32,
        /// Number of best sellers to list
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
    /// List orders with filters
    Orders {
        #[arg(long)]
        status: Option<OrderStatus>,
        #[arg(long)]
        payment: Option<PaymentStatus>,
        /// Order id, customer name or phone
        #[arg(short, long)]
        search: Option<String>,
        /// Only orders with a payment screenshot
        #[arg(long)]
        with_proof: bool,
    },
    /// Change an order's fulfilment status
    OrderStatus { order_id: String, status: OrderStatus },
    /// Change an order's payment status
    PaymentStatus { order_id: String, status: PaymentStatus },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
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

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sabriaz_storefront=info,sabriaz_admin=info,sabriaz_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = AppState::new(config)?;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::shop::show_cart(&state),
            CartAction::Add { product_id } => commands::shop::add(&mut state, &product_id).await?,
            CartAction::Remove { product_id } => commands::shop::remove(&mut state, &product_id),
            CartAction::Inc { product_id } => commands::shop::increase(&mut state, &product_id),
            CartAction::Dec { product_id } => commands::shop::decrease(&mut state, &product_id),
            CartAction::Clear => commands::shop::clear(&mut state),
        },
        Commands::Login { email, password } => {
            commands::account::login(&mut state, &email, &password).await?;
        }
        Commands::Register {
            name,
            email,
            password,
        } => commands::account::register(&mut state, &name, &email, &password).await?,
        Commands::Logout => commands::account::logout(&mut state),
        Commands::Whoami => commands::account::whoami(&state),
        Commands::Products {
            search,
            category,
            sort,
        } => commands::shop::products(&mut state, search, category, sort).await?,
        Commands::Orders { action } => match action {
            None => commands::orders::list(&state).await?,
            Some(OrdersAction::Cancel { order_id }) => {
                commands::orders::cancel(&state, &order_id).await?;
            }
        },
        Commands::Checkout(args) => {
            let request = commands::orders::CheckoutInput {
                name: args.name,
                phone: args.phone,
                address: args.address,
                city: args.city,
                notes: args.notes,
                testers: args.testers,
                payment: args.payment,
                proof: args.proof,
            };
            commands::orders::checkout(&mut state, request).await?;
        }
        Commands::Subscribe { email } => commands::shop::subscribe(&state, &email).await?,
        Commands::Contact { message } => commands::shop::contact(&state, &message)?,
        Commands::Sitemap { out } => commands::shop::sitemap(&state, &out)?,
        Commands::Admin { action } => match action {
            AdminAction::Analytics {
                utc_offset_hours,
                top,
            } => commands::admin::analytics(&state, utc_offset_hours, top).await?,
            AdminAction::Orders {
                status,
                payment,
                search,
                with_proof,
            } => {
                let filter = sabriaz_admin::OrderFilter {
                    status,
                    payment_status: payment,
                    search,
                };
                commands::admin::orders(&state, &filter, with_proof).await?;
            }
            AdminAction::OrderStatus { order_id, status } => {
                commands::admin::order_status(&state, &order_id, status).await?;
            }
            AdminAction::PaymentStatus { order_id, status } => {
                commands::admin::payment_status(&state, &order_id, status).await?;
            }
        },
    }
    Ok(())
}
