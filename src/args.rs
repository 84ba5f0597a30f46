//! These structs provide the CLI interface for the smartfinance CLI.

use crate::model::{Amount, CategoryGroup, NewTransaction, TransactionKind};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// smartfinance: A command-line tool for tracking personal income and expenses.
///
/// Record transactions, review them in a table, see totals, spending by category and the daily
/// flow of money, and ask a Gemini model for a short critique of your budget.
///
/// Run `smartfinance init` once to create the data directory. The advisor needs a Gemini API key,
/// passed as --api-key or GEMINI_API_KEY.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration file.
    ///
    /// By default the data directory is $HOME/smartfinance. Pass --home or set SMARTFINANCE_HOME
    /// if you want it somewhere else.
    Init,
    /// Record a new income or expense. It is placed at the top of the list.
    Add(AddArgs),
    /// Delete a transaction by its ID. Deleting an ID that does not exist does nothing.
    Remove(RemoveArgs),
    /// Show all transactions, most recently added first.
    List,
    /// Write the current transactions to disk. Changes are also saved automatically.
    Save,
    /// Show the totals, the expenses by category and the daily flow of money.
    Dashboard,
    /// Ask the AI advisor for a critique of your budget.
    Advise(AdviseArgs),
    /// Show the suggested subcategories and accounts.
    Catalog,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where smartfinance data and configuration is held. Defaults to
    /// ~/smartfinance
    #[arg(long, env = "SMARTFINANCE_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// (Not shown): Args for the `smartfinance add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// Either "income" or "expense".
    #[arg(long = "type", value_name = "TYPE")]
    pub kind: TransactionKind,

    /// The amount, a non-negative number such as 2500 or 99.90.
    #[arg(long)]
    pub amount: Amount,

    /// The date of the transaction in YYYY-MM-DD format. Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// The category group. Income must use "income-sources", expenses one of "Fixed",
    /// "Variable", "Funds/Savings" or "Other". Defaults to "income-sources" for income and
    /// "Variable" for expenses.
    #[arg(long)]
    pub group: Option<CategoryGroup>,

    /// The subcategory. See `smartfinance catalog` for suggestions. Defaults to the first
    /// suggestion of the group.
    #[arg(long)]
    pub subcategory: Option<String>,

    /// The account the money moved through. Defaults to the first suggested account.
    #[arg(long)]
    pub account: Option<String>,

    /// An optional free-text note.
    #[arg(long)]
    pub comment: Option<String>,
}

impl From<AddArgs> for NewTransaction {
    fn from(args: AddArgs) -> Self {
        NewTransaction {
            kind: args.kind,
            amount: args.amount,
            date: args.date,
            group: args.group,
            subcategory: args.subcategory,
            account: args.account,
            comment: args.comment,
        }
    }
}

/// (Not shown): Args for the `smartfinance remove` command.
#[derive(Debug, Parser, Clone)]
pub struct RemoveArgs {
    /// The ID of the transaction to delete, as shown by `smartfinance list`.
    id: String,
}

impl RemoveArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// (Not shown): Args for the `smartfinance advise` command.
#[derive(Debug, Parser, Clone)]
pub struct AdviseArgs {
    /// The Gemini API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

impl AdviseArgs {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("smartfinance"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or SMARTFINANCE_HOME instead of relying on the default \
                directory. If you continue using the program right now, you may have problems!",
            );
            PathBuf::from("smartfinance")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let args = Args::try_parse_from([
            "smartfinance",
            "--home",
            "/tmp/sf",
            "add",
            "--type",
            "expense",
            "--amount",
            "450",
            "--date",
            "2023-10-01",
            "--group",
            "Variable",
            "--subcategory",
            "Транспорт (бензин, такси, метро)",
            "--comment",
            "late",
        ])
        .unwrap();
        assert_eq!(Path::new("/tmp/sf"), args.common().home().path());
        let Command::Add(add) = args.command().clone() else {
            panic!("expected the add command");
        };
        let draft = NewTransaction::from(add);
        assert_eq!(TransactionKind::Expense, draft.kind);
        assert_eq!(Amount::from_units(450), draft.amount);
        assert_eq!(NaiveDate::from_ymd_opt(2023, 10, 1), draft.date);
        assert_eq!(Some(CategoryGroup::Variable), draft.group);
        assert_eq!(Some("late".to_string()), draft.comment);
        assert_eq!(None, draft.account);
    }

    #[test]
    fn test_parse_add_rejects_negative_amount() {
        let result = Args::try_parse_from([
            "smartfinance",
            "add",
            "--type",
            "income",
            "--amount=-5",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_add_rejects_blank_amount() {
        for amount in ["", "  ", "₽"] {
            let result = Args::try_parse_from([
                "smartfinance",
                "add",
                "--type",
                "expense",
                "--amount",
                amount,
            ]);
            let err = result.unwrap_err();
            assert!(err.to_string().contains("An amount is required"), "{err}");
        }
    }

    #[test]
    fn test_parse_add_rejects_fraction_of_kopeck() {
        let result = Args::try_parse_from([
            "smartfinance",
            "add",
            "--type",
            "expense",
            "--amount",
            "0.1234567890123456789",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_remove_and_log_level() {
        let args =
            Args::try_parse_from(["smartfinance", "--log-level", "debug", "remove", "abc123"])
                .unwrap();
        assert_eq!(LevelFilter::DEBUG, args.common().log_level());
        match args.command() {
            Command::Remove(remove) => assert_eq!("abc123", remove.id()),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_advise_with_key() {
        let args =
            Args::try_parse_from(["smartfinance", "advise", "--api-key", "secret"]).unwrap();
        match args.command() {
            Command::Advise(advise) => assert_eq!(Some("secret"), advise.api_key()),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
