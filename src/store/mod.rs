//! The transaction store: the authoritative, ordered collection of transactions for a session,
//! mirrored to a durable `Storage` slot after every change.

mod seed;
mod storage;

pub use seed::seed_transactions;
pub use storage::{DirStorage, MemoryStorage, Storage};

use crate::model::Transaction;
use crate::Result;
use anyhow::Context;
use tracing::{debug, info, warn};

/// The key under which the whole transaction collection is stored.
pub const STORAGE_KEY: &str = "smartfinance_transactions";

/// Owns the transaction collection. Mutations write through to storage and hand back the new
/// snapshot; readers only ever see the collection between mutations.
#[derive(Debug)]
pub struct Store {
    storage: Box<dyn Storage + Send>,
    transactions: Vec<Transaction>,
}

impl Store {
    /// Loads the stored collection. If nothing is stored, or what is stored cannot be read or
    /// parsed, the store starts from the example transactions instead. This never fails.
    pub fn load(storage: Box<dyn Storage + Send>) -> Self {
        let transactions = match read_transactions(storage.as_ref()) {
            Ok(Some(transactions)) => {
                debug!("Loaded {} transactions", transactions.len());
                transactions
            }
            Ok(None) => {
                info!("No saved transactions found, starting from the example transactions");
                seed_transactions()
            }
            Err(e) => {
                warn!("Unable to load saved transactions, starting from the example transactions: {e:#}");
                seed_transactions()
            }
        };
        Self {
            storage,
            transactions,
        }
    }

    /// The current collection, most recently added first.
    pub fn snapshot(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id() == id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Puts `transaction` at the front of the collection. No validation happens here, that is the
    /// job of `NewTransaction::validate`.
    pub fn add(&mut self, transaction: Transaction) -> &[Transaction] {
        debug!("Adding transaction {}", transaction.id());
        self.transactions.insert(0, transaction);
        self.write_through();
        self.snapshot()
    }

    /// Removes the transaction whose ID is `id`. Removing an ID that is not present does nothing.
    pub fn remove(&mut self, id: &str) -> &[Transaction] {
        match self.transactions.iter().position(|t| t.id() == id) {
            Some(ix) => {
                let removed = self.transactions.remove(ix);
                debug!("Removed transaction {}", removed.id());
                self.write_through();
            }
            None => debug!("No transaction with ID '{id}', nothing to remove"),
        }
        self.snapshot()
    }

    /// Serializes the entire collection and overwrites the stored copy.
    pub fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.transactions)
            .context("Unable to serialize transactions")?;
        self.storage
            .set(STORAGE_KEY, &json)
            .context("Unable to save transactions")
    }

    /// Hands back the storage, e.g. to load a fresh `Store` from it.
    pub fn into_storage(self) -> Box<dyn Storage + Send> {
        self.storage
    }

    /// Best-effort persistence after a mutation: failures are logged and not retried.
    fn write_through(&mut self) {
        if let Err(e) = self.persist() {
            warn!("Changes are kept in memory but could not be saved: {e:#}");
        }
    }
}

fn read_transactions(storage: &dyn Storage) -> Result<Option<Vec<Transaction>>> {
    let Some(json) = storage.get(STORAGE_KEY)? else {
        return Ok(None);
    };
    let transactions =
        serde_json::from_str(&json).context("The saved transactions are not valid")?;
    Ok(Some(transactions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, NewTransaction, TransactionKind};
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tempfile::TempDir;

    fn expense(units: u32) -> Transaction {
        NewTransaction::new(TransactionKind::Expense, Amount::from_units(units))
            .validate()
            .unwrap()
    }

    fn empty_store() -> Store {
        Store::load(Box::new(MemoryStorage::with_value(STORAGE_KEY, "[]")))
    }

    #[derive(Debug)]
    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            anyhow::bail!("disk on fire")
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            anyhow::bail!("disk on fire")
        }
    }

    #[test]
    fn test_load_missing_uses_seed() {
        let store = Store::load(Box::new(MemoryStorage::new()));
        assert_eq!(seed_transactions(), store.snapshot());
    }

    #[test]
    fn test_load_malformed_uses_seed() {
        let storage = MemoryStorage::with_value(STORAGE_KEY, "{not json");
        let store = Store::load(Box::new(storage));
        assert_eq!(seed_transactions(), store.snapshot());
    }

    #[test]
    fn test_load_unreadable_uses_seed() {
        let store = Store::load(Box::new(BrokenStorage));
        assert_eq!(seed_transactions(), store.snapshot());
    }

    #[test]
    fn test_load_empty_list_stays_empty() {
        let store = empty_store();
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_prepends() {
        let mut store = Store::load(Box::new(MemoryStorage::new()));
        let t = expense(10);
        let snapshot = store.add(t.clone());
        assert_eq!(&t, &snapshot[0]);
        assert_eq!(seed_transactions().len() + 1, snapshot.len());
    }

    #[test]
    fn test_add_writes_through() {
        let mut store = empty_store();
        let t = expense(10);
        store.add(t.clone());
        let reloaded = Store::load(store.into_storage());
        assert_eq!(vec![t], reloaded.snapshot());
    }

    #[test]
    fn test_remove_existing() {
        let mut store = Store::load(Box::new(MemoryStorage::new()));
        let before = store.len();
        let snapshot = store.remove("3");
        assert_eq!(before - 1, snapshot.len());
        assert!(snapshot.iter().all(|t| t.id() != "3"));
        assert!(store.get("3").is_none());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut store = Store::load(Box::new(MemoryStorage::new()));
        let before = store.snapshot().to_vec();
        let after = store.remove("no-such-id").to_vec();
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_writes_through() {
        let mut store = Store::load(Box::new(MemoryStorage::new()));
        store.remove("1");
        let reloaded = Store::load(store.into_storage());
        assert!(reloaded.get("1").is_none());
        assert_eq!(seed_transactions().len() - 1, reloaded.len());
    }

    #[test]
    fn test_persist_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::load(Box::new(DirStorage::new(dir.path())));
        store.add(expense(123));
        store.persist().unwrap();
        store.persist().unwrap();
        let original = store.snapshot().to_vec();

        let reloaded = Store::load(Box::new(DirStorage::new(dir.path())));
        assert_eq!(original, reloaded.snapshot());
    }

    #[test]
    fn test_round_trip_keeps_exact_amounts() {
        let mut store = empty_store();
        let values = [
            "0.1",
            "0.07",
            "12.34",
            "1234567.89",
            "123456789012.34",
            "9999999999999.99",
            "9999999999999",
        ];
        for value in values {
            let amount = Amount::from_str(value).unwrap();
            let t = NewTransaction::new(TransactionKind::Income, amount)
                .validate()
                .unwrap();
            store.add(t);
        }
        let original = store.snapshot().to_vec();

        let reloaded = Store::load(store.into_storage());
        assert_eq!(original, reloaded.snapshot());
        let amounts: Vec<Decimal> = reloaded
            .snapshot()
            .iter()
            .rev()
            .map(|t| t.amount().value())
            .collect();
        let expected: Vec<Decimal> = values
            .iter()
            .map(|v| Decimal::from_str(v).unwrap())
            .collect();
        assert_eq!(expected, amounts);
    }

    #[test]
    fn test_persist_failure_is_reported_but_mutation_is_kept() {
        let mut store = Store::load(Box::new(BrokenStorage));
        let t = expense(5);
        store.add(t.clone());
        assert_eq!(Some(&t), store.get(t.id()));
        assert!(store.persist().is_err());
    }
}
