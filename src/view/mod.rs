//! Views
//!
//! One-way rendering: [`render`] turns the session snapshot, the current
//! route and the transient UI state into a [`ViewTree`]. Nothing here
//! mutates state; the app calls `render` after every transition.

mod text;
mod tree;

pub use tree::{format_amount, DashboardView, LoginView, TransactionRow, ViewTree};

use crate::model::NewTransaction;
use crate::router::RouteId;
use crate::state::Snapshot;

/// Screen regions that display error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorRegion {
    Login,
    Register,
    Transaction,
    Dashboard,
}

/// Transient UI state not worth persisting: error regions and dialogs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    login_error: Option<String>,
    register_error: Option<String>,
    transaction_error: Option<String>,
    dashboard_error: Option<String>,
    dialog: Option<NewTransaction>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents of an error region
    pub fn set_error(&mut self, region: ErrorRegion, message: impl Into<String>) {
        *self.region_mut(region) = Some(message.into());
    }

    pub fn clear_error(&mut self, region: ErrorRegion) {
        *self.region_mut(region) = None;
    }

    pub fn error(&self, region: ErrorRegion) -> Option<&str> {
        match region {
            ErrorRegion::Login => self.login_error.as_deref(),
            ErrorRegion::Register => self.register_error.as_deref(),
            ErrorRegion::Transaction => self.transaction_error.as_deref(),
            ErrorRegion::Dashboard => self.dashboard_error.as_deref(),
        }
    }

    /// Show the transaction dialog with `form` as its contents
    pub fn open_dialog(&mut self, form: NewTransaction) {
        self.dialog = Some(form);
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
    }

    pub fn dialog(&self) -> Option<&NewTransaction> {
        self.dialog.as_ref()
    }

    /// Drop everything tied to the previous session
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn region_mut(&mut self, region: ErrorRegion) -> &mut Option<String> {
        match region {
            ErrorRegion::Login => &mut self.login_error,
            ErrorRegion::Register => &mut self.register_error,
            ErrorRegion::Transaction => &mut self.transaction_error,
            ErrorRegion::Dashboard => &mut self.dashboard_error,
        }
    }
}

/// Build the view for `route` from the current snapshot
pub fn render(snapshot: &Snapshot, route: RouteId, ui: &UiState) -> ViewTree {
    match route {
        RouteId::Login => ViewTree::Login(LoginView {
            login_error: ui.login_error.clone(),
            register_error: ui.register_error.clone(),
        }),
        RouteId::Dashboard => ViewTree::Dashboard(snapshot.account.as_ref().map(|account| {
            DashboardView {
                error: ui.dashboard_error.clone(),
                transaction_error: ui.transaction_error.clone(),
                dialog: ui.dialog.clone(),
                ..DashboardView::from_account(account)
            }
        })),
        RouteId::Credits => ViewTree::Credits,
    }
}
