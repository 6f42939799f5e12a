//! Terminal rendering of view trees

use std::fmt;

use super::tree::{DashboardView, LoginView, ViewTree};

impl fmt::Display for ViewTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewTree::Login(view) => write!(f, "{}", view),
            ViewTree::Dashboard(Some(view)) => write!(f, "{}", view),
            ViewTree::Dashboard(None) => writeln!(f, "Not signed in."),
            ViewTree::Credits => {
                writeln!(f, "Bank App")?;
                writeln!(f, "{}", "=".repeat(8))?;
                writeln!(f)?;
                writeln!(f, "Built on the account API demo backend.")
            }
        }
    }
}

impl fmt::Display for LoginView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bank App")?;
        writeln!(f, "{}", "=".repeat(8))?;
        writeln!(f)?;
        writeln!(f, "Login")?;
        writeln!(f, "  login <username>")?;
        if let Some(error) = &self.login_error {
            writeln!(f, "  ! {}", error)?;
        }
        writeln!(f)?;
        writeln!(f, "Register")?;
        writeln!(
            f,
            "  register <username> <currency> [--description <text>] [--balance <amount>]"
        )?;
        if let Some(error) = &self.register_error {
            writeln!(f, "  ! {}", error)?;
        }
        Ok(())
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.description)?;
        writeln!(f, "Balance: {} {}", self.balance, self.currency)?;
        if let Some(error) = &self.error {
            writeln!(f, "! {}", error)?;
        }
        writeln!(f)?;

        writeln!(f, "{:<12} {:<30} {:>12}", "Date", "Object", "Amount")?;
        writeln!(f, "{}", "-".repeat(56))?;
        if self.transactions.is_empty() {
            writeln!(f, "No transactions yet.")?;
        }
        for row in &self.transactions {
            writeln!(f, "{:<12} {:<30} {:>12}", row.date, row.object, row.amount)?;
        }

        if let Some(error) = &self.transaction_error {
            writeln!(f)?;
            writeln!(f, "! {}", error)?;
        }

        if let Some(form) = &self.dialog {
            writeln!(f)?;
            writeln!(f, "Add transaction")?;
            writeln!(f, "  date: {}", form.date)?;
            writeln!(f, "  confirm <object> <amount> [--date <YYYY-MM-DD>]  |  cancel")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{Account, NewTransaction, Transaction};
    use crate::view::{DashboardView, LoginView, ViewTree};

    #[test]
    fn test_dashboard_text() {
        let account = Account::new("test", "$")
            .description("Test account")
            .balance(150.0)
            .transaction(Transaction::new("2024-01-01", "Salary", 150.0));
        let view = ViewTree::Dashboard(Some(DashboardView::from_account(&account)));

        let text = view.to_string();
        assert!(text.contains("Test account"));
        assert!(text.contains("Balance: 150.00 $"));
        assert!(text.contains("Salary"));
        assert!(!text.contains("Add transaction"));
    }

    #[test]
    fn test_dashboard_dialog_text() {
        let account = Account::new("test", "$");
        let view = DashboardView {
            dialog: Some(NewTransaction::new("2024-03-01", "", 0.0)),
            ..DashboardView::from_account(&account)
        };

        let text = view.to_string();
        assert!(text.contains("No transactions yet."));
        assert!(text.contains("date: 2024-03-01"));
    }

    #[test]
    fn test_login_text_shows_errors() {
        let view = LoginView {
            login_error: Some("User does not exist".to_string()),
            register_error: None,
        };
        assert!(view.to_string().contains("! User does not exist"));
    }
}
