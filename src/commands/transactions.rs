//! Commands that change or show the transaction collection: `add`, `remove`, `list` and `save`.

use crate::args::{AddArgs, RemoveArgs};
use crate::commands::{open_store, table, Out};
use crate::model::{CategoryGroup, NewTransaction, Transaction};
use crate::{Config, Result};
use anyhow::Context;
use tracing::debug;

/// Validates the form input and records the new transaction at the top of the collection.
///
/// # Errors
/// - Returns an error if the input does not pass validation, e.g. an income filed under `Fixed`.
pub fn add(config: &Config, args: AddArgs) -> Result<Out<Transaction>> {
    let transaction = NewTransaction::from(args)
        .validate()
        .context("The transaction was not recorded")?;
    let mut store = open_store(config);
    let count = store.add(transaction.clone()).len();
    debug!("The collection now holds {count} transactions");
    Ok(Out::new(
        format!(
            "Added {} of {} {} to '{}' with ID {}",
            transaction.kind().to_string().to_lowercase(),
            transaction.amount(),
            config.currency(),
            category_label(&transaction),
            transaction.id()
        ),
        transaction,
    ))
}

/// Deletes the transaction with the given ID. An unknown ID leaves the collection unchanged and is
/// not an error. The structured output is the number of transactions left.
pub fn remove(config: &Config, args: RemoveArgs) -> Result<Out<usize>> {
    let mut store = open_store(config);
    let before = store.len();
    let remaining = store.remove(args.id()).len();
    let message = if remaining < before {
        format!("Removed transaction {}", args.id())
    } else {
        format!("There is no transaction with ID {}, nothing was removed", args.id())
    };
    Ok(Out::new(message, remaining))
}

/// Shows the collection as a table, most recently added first.
pub fn list(config: &Config) -> Result<Out<Vec<Transaction>>> {
    let store = open_store(config);
    let snapshot = store.snapshot().to_vec();
    if snapshot.is_empty() {
        return Ok(Out::new(
            "No transactions yet. Use 'smartfinance add' to record one.",
            snapshot,
        ));
    }

    let rows: Vec<Vec<String>> = snapshot
        .iter()
        .map(|t| {
            vec![
                t.date()
                    .format_localized("%-d %b %Y", config.locale())
                    .to_string(),
                t.kind().to_string(),
                category_label(t),
                signed_amount(t, config.currency()),
                t.account().to_string(),
                t.comment().to_string(),
                t.id().to_string(),
            ]
        })
        .collect();
    let table = table::markdown(
        &[
            "Date", "Type", "Category", "Amount", "Account", "Comment", "ID",
        ],
        &rows,
    );
    Ok(Out::new(format!("Transactions:\n\n{table}"), snapshot))
}

/// Writes the collection to disk. Unlike the automatic write after each change, a failure here is
/// reported.
pub fn save(config: &Config) -> Result<Out<usize>> {
    let mut store = open_store(config);
    store.persist().context("Unable to save the transactions")?;
    Ok(Out::new(
        format!(
            "Saved {} transactions to {}",
            store.len(),
            config.data_dir().display()
        ),
        store.len(),
    ))
}

/// `Group / Subcategory` for expenses, just the subcategory for income.
fn category_label(t: &Transaction) -> String {
    match t.category_group() {
        CategoryGroup::IncomeSources => t.subcategory().to_string(),
        group => format!("{} / {}", group, t.subcategory()),
    }
}

fn signed_amount(t: &Transaction, currency: &str) -> String {
    let sign = if t.is_income() { '+' } else { '-' };
    format!("{sign}{} {currency}", t.amount())
}
