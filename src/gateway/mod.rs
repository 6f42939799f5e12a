//! Account API Gateway
//!
//! Boundary component for the remote account API. Wraps the three calls
//! the client makes:
//!
//! - `POST /accounts` - register a new account
//! - `GET /accounts/{user}` - fetch an account by username
//! - `POST /accounts/{user}/transactions` - append a transaction
//!
//! Callers never see a panic or a raw transport error: every call yields
//! either the decoded payload or a [`GatewayError`] carrying a message.
//! There are no retries, no timeouts and no caching.

mod client;
mod error;

pub use client::{GatewayConfig, HttpGateway, DEFAULT_API_BASE};
pub use error::{GatewayError, GatewayResult};

use async_trait::async_trait;

use crate::model::{Account, NewAccount, NewTransaction, Transaction};

/// Remote account operations used by the app flows
#[async_trait]
pub trait AccountGateway: Send + Sync {
    /// Register a new account
    async fn create_account(&self, account: &NewAccount) -> GatewayResult<Account>;

    /// Fetch an account by username
    async fn get_account(&self, user: &str) -> GatewayResult<Account>;

    /// Append a transaction to `user`'s account, returning the stored entry
    async fn create_transaction(
        &self,
        user: &str,
        transaction: &NewTransaction,
    ) -> GatewayResult<Transaction>;
}
