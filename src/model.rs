//! Account Data Model
//!
//! Wire types shared by the gateway, the state container and the views.
//! Field names match the account API's JSON.

use serde::{Deserialize, Serialize};

/// A user's banking record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Username the account is registered under
    pub user: String,
    #[serde(default)]
    pub description: String,
    pub balance: f64,
    pub currency: String,
    /// Transaction history, oldest first
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Account {
    /// Create an empty account
    pub fn new(user: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            description: String::new(),
            balance: 0.0,
            currency: currency.into(),
            transactions: Vec::new(),
        }
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the balance
    pub fn balance(mut self, balance: f64) -> Self {
        self.balance = balance;
        self
    }

    /// Add a transaction to the history
    pub fn transaction(mut self, transaction: Transaction) -> Self {
        self.transactions.push(transaction);
        self
    }

    /// Return a new account with `transaction` appended and the balance
    /// moved by its amount.
    ///
    /// The receiver is left untouched; callers swap the result into the
    /// state container.
    pub fn with_transaction(&self, transaction: Transaction) -> Self {
        let mut transactions = Vec::with_capacity(self.transactions.len() + 1);
        transactions.extend(self.transactions.iter().cloned());
        let balance = self.balance + transaction.amount;
        transactions.push(transaction);

        Self {
            balance,
            transactions,
            ..self.clone()
        }
    }
}

/// A single dated monetary entry against an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Date as entered, `YYYY-MM-DD`
    pub date: String,
    /// What the transaction was for
    pub object: String,
    /// Signed amount; negative values are debits
    pub amount: f64,
}

impl Transaction {
    pub fn new(date: impl Into<String>, object: impl Into<String>, amount: f64) -> Self {
        Self {
            date: date.into(),
            object: object.into(),
            amount,
        }
    }
}

/// Registration form fields sent to `POST /accounts`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAccount {
    pub user: String,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
}

impl NewAccount {
    pub fn new(user: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            currency: currency.into(),
            description: None,
            balance: None,
        }
    }
}

/// Transaction form fields sent to `POST /accounts/{user}/transactions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: String,
    pub object: String,
    pub amount: f64,
}

impl NewTransaction {
    pub fn new(date: impl Into<String>, object: impl Into<String>, amount: f64) -> Self {
        Self {
            date: date.into(),
            object: object.into(),
            amount,
        }
    }

    /// A blank form dated today (local time)
    pub fn today() -> Self {
        Self {
            date: today(),
            object: String::new(),
            amount: 0.0,
        }
    }
}

/// Today's date in the form's `YYYY-MM-DD` format
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
