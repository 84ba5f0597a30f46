//! Types that represent the core data model, such as `Transaction` and `Amount`.
mod amount;
pub mod catalog;
mod transaction;

pub use amount::{format_decimal, Amount, AmountError};
pub use transaction::{CategoryGroup, NewTransaction, Transaction, TransactionKind};
