//! Client Application
//!
//! [`App`] is the explicit context object the user flows run against. It
//! owns the gateway, the state container, the router and the transient UI
//! state; nothing is global.
//!
//! ## Flows
//!
//! - `login` / `register`: fetch or create the account, store it, open the
//!   dashboard
//! - `refresh`: re-fetch the signed-in account (run on dashboard entry)
//! - `add_transaction` / `confirm_transaction` / `cancel_transaction`:
//!   the transaction dialog
//! - `logout`: clear the session and return to the login screen
//!
//! Every flow takes `&mut self`, so at most one gateway call is in flight.

mod error;

pub use error::{AppError, AppResult};

use crate::config::SessionConfig;
use crate::gateway::{AccountGateway, GatewayError};
use crate::kv::KeyValueStore;
use crate::model::{NewAccount, NewTransaction};
use crate::router::{Initializer, RouteChange, RouteId, Router};
use crate::state::{StateStore, Update};
use crate::view::{render, ErrorRegion, UiState, ViewTree};

/// How a failed dashboard refresh is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    /// Log out when the API cannot be reached, not only when it rejects
    /// the account
    pub logout_on_network_failure: bool,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            logout_on_network_failure: true,
        }
    }
}

impl From<&SessionConfig> for SessionPolicy {
    fn from(config: &SessionConfig) -> Self {
        Self {
            logout_on_network_failure: config.logout_on_network_failure,
        }
    }
}

/// The banking client
pub struct App<G, S> {
    gateway: G,
    state: StateStore<S>,
    router: Router,
    ui: UiState,
    policy: SessionPolicy,
}

impl<G: AccountGateway, S: KeyValueStore> App<G, S> {
    pub fn new(gateway: G, state: StateStore<S>, router: Router) -> Self {
        Self {
            gateway,
            state,
            router,
            ui: UiState::new(),
            policy: SessionPolicy::default(),
        }
    }

    /// Set the refresh failure policy
    pub fn with_policy(mut self, policy: SessionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn state(&self) -> &StateStore<S> {
        &self.state
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// Current screen
    pub fn view(&self) -> ViewTree {
        render(&self.state.current(), self.router.current(), &self.ui)
    }

    /// Display the router's initial route and run its initializer
    pub async fn start(&mut self) -> AppResult<()> {
        tracing::debug!(path = %self.router.path(), "Starting");
        let change = self.router.render_route();
        self.enter(change).await
    }

    /// Navigate to `path`; unknown paths land on the default route
    pub async fn navigate(&mut self, path: &str) -> AppResult<()> {
        let change = self.router.navigate(path);
        self.enter(change).await
    }

    /// Navigate to the path a link points at
    pub async fn follow_link(&mut self, href: &str) -> AppResult<()> {
        let change = self.router.follow_link(href);
        self.enter(change).await
    }

    /// Go back one history entry. Returns `false` at the start of history.
    pub async fn back(&mut self) -> AppResult<bool> {
        match self.router.back() {
            Some(change) => {
                self.enter(change).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Sign in as `user`.
    ///
    /// On failure the message goes to the login error region and neither
    /// the session nor the route changes.
    pub async fn login(&mut self, user: &str) -> AppResult<()> {
        match self.gateway.get_account(user).await {
            Ok(account) => {
                tracing::info!(user = %account.user, "Logged in");
                self.state.update(Update::Account(Some(account)))?;
                let dashboard = self.path_of(RouteId::Dashboard);
                self.navigate(dashboard).await
            }
            Err(e) => {
                tracing::warn!(user = %user, error = %e, "Login failed");
                self.ui.set_error(ErrorRegion::Login, e.message());
                Ok(())
            }
        }
    }

    /// Create an account and sign in to it
    pub async fn register(&mut self, account: &NewAccount) -> AppResult<()> {
        match self.gateway.create_account(account).await {
            Ok(account) => {
                tracing::info!(user = %account.user, "Account created");
                self.state.update(Update::Account(Some(account)))?;
                let dashboard = self.path_of(RouteId::Dashboard);
                self.navigate(dashboard).await
            }
            Err(e) => {
                tracing::warn!(user = %account.user, error = %e, "Registration failed");
                self.ui.set_error(ErrorRegion::Register, e.message());
                Ok(())
            }
        }
    }

    /// Clear the session and show the login screen
    pub fn logout(&mut self) -> AppResult<()> {
        if let Some(account) = self.state.account() {
            tracing::info!(user = %account.user, "Logged out");
        }
        self.state.update(Update::Account(None))?;

        // The login route has no initializer, so there is nothing to await
        let login = self.path_of(RouteId::Login);
        let change = self.router.navigate(login);
        self.show(change);
        Ok(())
    }

    /// Re-fetch the signed-in account and redraw the dashboard
    pub async fn refresh(&mut self) -> AppResult<()> {
        self.update_account_data().await?;
        if self.state.account().is_some() {
            self.update_dashboard()?;
        }
        Ok(())
    }

    /// Re-fetch the signed-in account.
    ///
    /// Without a session, or when the server rejects the account, the
    /// session is logged out. A network failure logs out too unless the
    /// policy keeps the cached account.
    pub async fn update_account_data(&mut self) -> AppResult<()> {
        let Some(user) = self.state.account().map(|account| account.user.clone()) else {
            return self.logout();
        };

        match self.gateway.get_account(&user).await {
            Ok(account) => {
                self.ui.clear_error(ErrorRegion::Dashboard);
                self.state.update(Update::Account(Some(account)))?;
                Ok(())
            }
            Err(e) if self.logs_out_on(&e) => {
                tracing::warn!(user = %user, error = %e, "Refresh failed, ending session");
                self.logout()
            }
            Err(e) => {
                tracing::warn!(user = %user, error = %e, "Refresh failed, keeping cached account");
                self.ui.set_error(ErrorRegion::Dashboard, e.message());
                Ok(())
            }
        }
    }

    /// Make sure the dashboard has an account to show, logging out if not
    pub fn update_dashboard(&mut self) -> AppResult<()> {
        if self.state.account().is_none() {
            return self.logout();
        }
        Ok(())
    }

    /// Open the transaction dialog with a blank form dated today
    pub fn add_transaction(&mut self) {
        self.ui.clear_error(ErrorRegion::Transaction);
        self.ui.open_dialog(NewTransaction::today());
    }

    /// Close the transaction dialog without submitting
    pub fn cancel_transaction(&mut self) {
        self.ui.close_dialog();
    }

    /// Submit a transaction for the signed-in account.
    ///
    /// On success the returned transaction is appended to the cached
    /// account and its amount added to the balance; the account is not
    /// re-fetched.
    pub async fn confirm_transaction(&mut self, form: &NewTransaction) -> AppResult<()> {
        self.ui.close_dialog();

        let Some(user) = self.state.account().map(|account| account.user.clone()) else {
            return self.logout();
        };

        match self.gateway.create_transaction(&user, form).await {
            Ok(transaction) => {
                let Some(account) = self.state.account() else {
                    return self.logout();
                };
                tracing::info!(
                    user = %user,
                    object = %transaction.object,
                    amount = transaction.amount,
                    "Transaction recorded"
                );
                let account = account.with_transaction(transaction);
                self.state.update(Update::Account(Some(account)))?;
                self.ui.clear_error(ErrorRegion::Transaction);
                self.update_dashboard()
            }
            Err(e) => {
                tracing::warn!(user = %user, error = %e, "Transaction failed");
                self.ui.set_error(ErrorRegion::Transaction, e.message());
                Ok(())
            }
        }
    }

    fn logs_out_on(&self, error: &GatewayError) -> bool {
        error.is_application() || self.policy.logout_on_network_failure
    }

    fn path_of(&self, id: RouteId) -> &'static str {
        self.router.table().path_of(id)
    }

    /// Swap in a freshly rendered template: transient UI state is dropped
    fn show(&mut self, change: RouteChange) {
        tracing::debug!(route = %change.route, "Showing route");
        self.ui.reset();
    }

    async fn enter(&mut self, change: RouteChange) -> AppResult<()> {
        self.show(change);
        match change.initializer {
            Some(Initializer::Refresh) => self.refresh().await,
            None => Ok(()),
        }
    }
}
