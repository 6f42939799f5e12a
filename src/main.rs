//! Bank Client CLI
//!
//! Command-line front end for the banking client:
//! - Interactive shell (default)
//! - One-shot login, registration, logout and transactions
//! - Config file generation
//!
//! # Configuration
//!
//! See `bank config` for the file format. Environment variables:
//! - `BANK_API_URL`: Account API base URL (default: http://localhost:5000/api)
//! - `BANK_DATA_DIR`: Directory holding the saved session
//! - `BANK_LOG_LEVEL` / `RUST_LOG`: Log level (default: warn)

use anyhow::Context;
use bank_client::config::{generate_default_config, Config, LoggingConfig};
use bank_client::shell;
use bank_client::{
    App, ErrorRegion, FileStore, GatewayConfig, HttpGateway, KeyValueStore, MemoryStore,
    NewAccount, NewTransaction, RouteId, Router, SessionPolicy, StateStore,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type CliApp = App<HttpGateway, Box<dyn KeyValueStore>>;

#[derive(Parser)]
#[command(name = "bank")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Personal banking client")]
#[command(long_about = "Sign in to your account, review balance and history, and record transactions.\nThe session is saved locally between runs.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: search standard locations)
    #[arg(long = "config", global = true)]
    config_file: Option<PathBuf>,

    /// Account API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory holding the saved session
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Keep the session in memory only
    #[arg(long, global = true)]
    ephemeral: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive shell
    Shell {
        /// Page to open first
        #[arg(long, default_value = "/dashboard")]
        start: String,
    },

    /// Sign in and show the dashboard
    Login {
        /// Username
        user: String,
    },

    /// Create an account and sign in
    Register {
        /// Username
        user: String,
        /// Currency symbol or code
        currency: String,
        /// Account description
        #[arg(long)]
        description: Option<String>,
        /// Opening balance
        #[arg(long, allow_negative_numbers = true)]
        balance: Option<f64>,
    },

    /// Show the dashboard of the saved session
    Show,

    /// End the saved session
    Logout,

    /// Record a transaction on the saved session's account
    Transaction {
        /// What the transaction was for
        object: String,
        /// Signed amount; negative values are debits
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Date (default: today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config_file {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(data_dir) = &cli.data_dir {
        config.storage.data_dir = data_dir.clone();
    }

    init_logging(&config.logging);

    let command = cli.command.unwrap_or(Commands::Shell {
        start: "/dashboard".to_string(),
    });

    match command {
        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {:?}", path))?;
                    println!("Wrote default config to {:?}", path);
                }
                None => print!("{}", content),
            }
        }

        Commands::Shell { start } => {
            let mut app = build_app(&config, cli.ephemeral, &start)?;
            app.start().await?;

            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            shell::run(&mut app, stdin, tokio::io::stdout()).await?;
        }

        Commands::Login { user } => {
            let mut app = build_app(&config, cli.ephemeral, "/login")?;
            app.start().await?;
            app.login(&user).await?;
            finish(&app, ErrorRegion::Login);
        }

        Commands::Register {
            user,
            currency,
            description,
            balance,
        } => {
            let mut app = build_app(&config, cli.ephemeral, "/login")?;
            app.start().await?;
            let account = NewAccount {
                user,
                currency,
                description,
                balance,
            };
            app.register(&account).await?;
            finish(&app, ErrorRegion::Register);
        }

        Commands::Show => {
            let mut app = build_app(&config, cli.ephemeral, "/dashboard")?;
            app.start().await?;
            finish(&app, ErrorRegion::Dashboard);
        }

        Commands::Logout => {
            let mut app = build_app(&config, cli.ephemeral, "/login")?;
            app.start().await?;
            app.logout()?;
            println!("Logged out.");
        }

        Commands::Transaction {
            object,
            amount,
            date,
        } => {
            let mut app = build_app(&config, cli.ephemeral, "/dashboard")?;
            app.start().await?;
            if app.router().current() != RouteId::Dashboard {
                eprintln!("Not signed in. Run `bank login <user>` first.");
                std::process::exit(1);
            }

            let date = date.unwrap_or_else(bank_client::model::today);
            app.confirm_transaction(&NewTransaction::new(date, object, amount))
                .await?;
            finish(&app, ErrorRegion::Transaction);
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "bank_client={level},bank={level}",
            level = logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn build_app(config: &Config, ephemeral: bool, start: &str) -> anyhow::Result<CliApp> {
    let storage: Box<dyn KeyValueStore> = if ephemeral {
        Box::new(MemoryStore::new())
    } else {
        let path = config.storage.session_path();
        tracing::debug!("Session file: {:?}", path);
        Box::new(FileStore::open(&path).with_context(|| format!("opening session {:?}", path))?)
    };

    let state = StateStore::load(storage, config.storage.key.clone())?;
    let gateway = HttpGateway::new(GatewayConfig::new(config.api.base_url.clone()));

    Ok(App::new(gateway, state, Router::standard(start))
        .with_policy(SessionPolicy::from(&config.session)))
}

/// Print the current screen; exit non-zero if `region` holds an error
fn finish(app: &CliApp, region: ErrorRegion) {
    print!("{}", app.view());
    if app.ui().error(region).is_some() {
        std::process::exit(1);
    }
}
