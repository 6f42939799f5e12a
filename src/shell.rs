//! Interactive Shell
//!
//! Line-oriented front end for [`App`]: each input line is one command
//! (the terminal stand-in for a button press or form submission), and the
//! current view is printed after every command.
//!
//! ```text
//! > login test
//! > add
//! > confirm "Groceries" -42.10
//! > go /credits
//! > back
//! > logout
//! ```

use clap::{Parser, Subcommand};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::app::{App, AppResult};
use crate::gateway::AccountGateway;
use crate::kv::KeyValueStore;
use crate::model::{NewAccount, NewTransaction};

const PROMPT: &str = "> ";

/// A parsed shell line
#[derive(Parser, Debug)]
#[command(no_binary_name = true, name = "bank", disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

/// Commands accepted by the shell
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ShellCommand {
    /// Sign in with a username
    Login { user: String },

    /// Create an account and sign in
    Register {
        user: String,
        currency: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        balance: Option<f64>,
    },

    /// End the session
    Logout,

    /// Re-fetch the account
    Refresh,

    /// Navigate to a path (e.g. /credits)
    Go { path: String },

    /// Follow a link (absolute URL or path)
    Open { href: String },

    /// Go back one page
    Back,

    /// Open the transaction dialog
    Add,

    /// Submit a transaction
    Confirm {
        object: String,
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Transaction date, defaults to the dialog's date
        #[arg(long)]
        date: Option<String>,
    },

    /// Close the transaction dialog
    Cancel,

    /// Print the current screen
    Show,

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// Shell input errors
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Unterminated quote in input")]
    UnterminatedQuote,

    #[error("{0}")]
    Parse(#[from] clap::Error),
}

/// Whether the loop keeps reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Split a line into words, honouring single and double quotes
pub fn split_line(line: &str) -> Result<Vec<String>, ShellError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(ShellError::UnterminatedQuote);
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, ShellError> {
    let words = split_line(line)?;
    if words.is_empty() {
        return Ok(None);
    }
    let parsed = ShellLine::try_parse_from(words)?;
    Ok(Some(parsed.command))
}

/// Run a command against the app
pub async fn execute<G, S>(app: &mut App<G, S>, command: ShellCommand) -> AppResult<Flow>
where
    G: AccountGateway,
    S: KeyValueStore,
{
    match command {
        ShellCommand::Login { user } => app.login(&user).await?,
        ShellCommand::Register {
            user,
            currency,
            description,
            balance,
        } => {
            let account = NewAccount {
                user,
                currency,
                description,
                balance,
            };
            app.register(&account).await?
        }
        ShellCommand::Logout => app.logout()?,
        ShellCommand::Refresh => app.refresh().await?,
        ShellCommand::Go { path } => app.navigate(&path).await?,
        ShellCommand::Open { href } => app.follow_link(&href).await?,
        ShellCommand::Back => {
            app.back().await?;
        }
        ShellCommand::Add => app.add_transaction(),
        ShellCommand::Confirm {
            object,
            amount,
            date,
        } => {
            let date = date
                .or_else(|| app.ui().dialog().map(|form| form.date.clone()))
                .unwrap_or_else(crate::model::today);
            app.confirm_transaction(&NewTransaction::new(date, object, amount))
                .await?
        }
        ShellCommand::Cancel => app.cancel_transaction(),
        ShellCommand::Show => {}
        ShellCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Read commands from `input` until it ends or `quit`, printing the view
/// to `output` after each one
pub async fn run<G, S, R, W>(app: &mut App<G, S>, input: R, mut output: W) -> std::io::Result<()>
where
    G: AccountGateway,
    S: KeyValueStore,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(app.view().to_string().as_bytes()).await?;

    let mut lines = input.lines();
    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                output.write_all(format!("{}\n", e).as_bytes()).await?;
                continue;
            }
        };

        match execute(app, command).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {
                output.write_all(b"\n").await?;
                output.write_all(app.view().to_string().as_bytes()).await?;
            }
            Err(e) => {
                tracing::error!(error = %e, "Command failed");
                output.write_all(format!("error: {}\n", e).as_bytes()).await?;
            }
        }
    }

    output.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayError, GatewayResult};
    use crate::kv::MemoryStore;
    use crate::model::{Account, Transaction};
    use crate::router::Router;
    use crate::state::{StateStore, DEFAULT_STORAGE_KEY};
    use async_trait::async_trait;

    /// Single-account bank that accepts every transaction
    struct FixedGateway;

    #[async_trait]
    impl AccountGateway for FixedGateway {
        async fn create_account(&self, account: &NewAccount) -> GatewayResult<Account> {
            Ok(Account::new(account.user.clone(), account.currency.clone()))
        }

        async fn get_account(&self, user: &str) -> GatewayResult<Account> {
            if user == "test" {
                Ok(Account::new("test", "$").description("Test account").balance(100.0))
            } else {
                Err(GatewayError::Application("User does not exist".to_string()))
            }
        }

        async fn create_transaction(
            &self,
            _user: &str,
            transaction: &NewTransaction,
        ) -> GatewayResult<Transaction> {
            Ok(Transaction::new(
                transaction.date.clone(),
                transaction.object.clone(),
                transaction.amount,
            ))
        }
    }

    fn test_app() -> App<FixedGateway, MemoryStore> {
        let state = StateStore::new(MemoryStore::new(), DEFAULT_STORAGE_KEY);
        App::new(FixedGateway, state, Router::standard("/login"))
    }

    #[test]
    fn test_split_line() {
        assert_eq!(
            split_line(r#"confirm "Rent and bills" -40 --date '2024-01-31'"#).unwrap(),
            vec!["confirm", "Rent and bills", "-40", "--date", "2024-01-31"]
        );
        assert_eq!(split_line("  ").unwrap(), Vec::<String>::new());
        assert_eq!(split_line(r#"login """#).unwrap(), vec!["login", ""]);
        assert!(matches!(
            split_line(r#"login "test"#),
            Err(ShellError::UnterminatedQuote)
        ));
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(
            parse_line("login test").unwrap(),
            Some(ShellCommand::Login {
                user: "test".to_string()
            })
        );
        assert_eq!(
            parse_line("confirm Coffee -3.5").unwrap(),
            Some(ShellCommand::Confirm {
                object: "Coffee".to_string(),
                amount: -3.5,
                date: None,
            })
        );
        assert_eq!(
            parse_line("register alice EUR --balance 10").unwrap(),
            Some(ShellCommand::Register {
                user: "alice".to_string(),
                currency: "EUR".to_string(),
                description: None,
                balance: Some(10.0),
            })
        );
        assert_eq!(parse_line("exit").unwrap(), Some(ShellCommand::Quit));
        assert_eq!(parse_line("").unwrap(), None);
    }

    #[test]
    fn test_parse_line_rejects_bad_input() {
        assert!(matches!(parse_line("fly"), Err(ShellError::Parse(_))));
        assert!(matches!(
            parse_line("confirm Coffee lots"),
            Err(ShellError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_confirm_uses_dialog_date() {
        let mut app = test_app();
        app.start().await.unwrap();
        app.login("test").await.unwrap();

        execute(&mut app, ShellCommand::Add).await.unwrap();
        let dialog_date = app.ui().dialog().unwrap().date.clone();

        execute(
            &mut app,
            ShellCommand::Confirm {
                object: "Coffee".to_string(),
                amount: -3.5,
                date: None,
            },
        )
        .await
        .unwrap();

        let account = app.state().account().unwrap();
        assert_eq!(account.balance, 96.5);
        assert_eq!(account.transactions.last().unwrap().date, dialog_date);
    }

    #[tokio::test]
    async fn test_run_session() {
        let mut app = test_app();
        app.start().await.unwrap();

        let input: &[u8] = b"login nobody\nlogin test\nconfirm Salary 50 --date 2024-05-01\nnonsense\nquit\nshow\n";
        let mut output = Vec::new();
        run(&mut app, input, &mut output).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("! User does not exist"));
        assert!(text.contains("Balance: 150.00 $"));
        assert!(text.contains("2024-05-01"));
        assert!(text.contains("unrecognized subcommand"));

        // Stopped at quit
        assert_eq!(app.state().account().unwrap().transactions.len(), 1);
    }
}
