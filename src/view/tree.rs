//! View tree types
//!
//! Plain data describing what a screen shows. Built by
//! [`render`](super::render) and drawn by the terminal renderer.

use crate::model::{Account, NewTransaction, Transaction};

/// A rendered screen
#[derive(Debug, Clone, PartialEq)]
pub enum ViewTree {
    Login(LoginView),
    /// `None` when the dashboard is shown without a signed-in account
    Dashboard(Option<DashboardView>),
    Credits,
}

/// Login and registration forms
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginView {
    pub login_error: Option<String>,
    pub register_error: Option<String>,
}

/// Account summary and history
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub user: String,
    pub description: String,
    /// Balance with two decimals
    pub balance: String,
    pub currency: String,
    pub transactions: Vec<TransactionRow>,
    /// Refresh problem kept on screen instead of logging out
    pub error: Option<String>,
    pub transaction_error: Option<String>,
    /// Open transaction dialog and its form contents
    pub dialog: Option<NewTransaction>,
}

impl DashboardView {
    pub fn from_account(account: &Account) -> Self {
        Self {
            user: account.user.clone(),
            description: account.description.clone(),
            balance: format_amount(account.balance),
            currency: account.currency.clone(),
            transactions: account.transactions.iter().map(TransactionRow::from).collect(),
            error: None,
            transaction_error: None,
            dialog: None,
        }
    }
}

/// One line of the transaction table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    pub date: String,
    pub object: String,
    /// Amount with two decimals
    pub amount: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(transaction: &Transaction) -> Self {
        Self {
            date: transaction.date.clone(),
            object: transaction.object.clone(),
            amount: format_amount(transaction.amount),
        }
    }
}

/// Format a money amount with two decimals
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(150.0), "150.00");
        assert_eq!(format_amount(-4.5), "-4.50");
    }

    #[test]
    fn test_rows_keep_history_order() {
        let account = Account::new("test", "$")
            .transaction(Transaction::new("2024-01-01", "Salary", 100.0))
            .transaction(Transaction::new("2024-01-02", "Coffee", -3.2));

        let view = DashboardView::from_account(&account);
        let objects: Vec<&str> = view.transactions.iter().map(|r| r.object.as_str()).collect();
        assert_eq!(objects, vec!["Salary", "Coffee"]);
        assert_eq!(view.transactions[1].amount, "-3.20");
    }
}
