//! # Bank Client
//!
//! Personal banking client: sign in against a remote account API, review
//! balance and transaction history, and record new transactions. The
//! session is saved locally so the next start resumes where the last one
//! stopped.
//!
//! ## Modules
//!
//! - [`gateway`]: Remote account API calls
//! - [`kv`]: Persistent key-value storage for the saved session
//! - [`state`]: Immutable session snapshot container
//! - [`router`]: Route table, history and navigation
//! - [`view`]: One-way rendering of the session into a view tree
//! - [`app`]: User flows (login, refresh, transactions, logout)
//! - [`shell`]: Interactive command loop
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bank_client::{App, GatewayConfig, HttpGateway, MemoryStore, Router, StateStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = HttpGateway::new(GatewayConfig::default());
//!     let state = StateStore::load(MemoryStore::new(), "savedAccount")?;
//!     let mut app = App::new(gateway, state, Router::standard("/login"));
//!
//!     app.start().await?;
//!     app.login("test").await?;
//!     println!("{}", app.view());
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod config;
pub mod gateway;
pub mod kv;
pub mod model;
pub mod router;
pub mod shell;
pub mod state;
pub mod view;

// Re-export top-level types for convenience
pub use app::{App, AppError, AppResult, SessionPolicy};

pub use config::{Config, ConfigError, LoggingConfig};

pub use gateway::{AccountGateway, GatewayConfig, GatewayError, GatewayResult, HttpGateway};

pub use kv::{FileStore, KeyValueStore, MemoryStore, StorageError, StorageResult};

pub use model::{Account, NewAccount, NewTransaction, Transaction};

pub use router::{Resolution, RouteChange, RouteId, RouteTable, Router};

pub use state::{Snapshot, StateStore, Update};

pub use view::{render, ErrorRegion, UiState, ViewTree};
