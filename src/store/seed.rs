//! The example transactions a brand new (or unreadable) store starts from.

use crate::model::{Amount, CategoryGroup, Transaction, TransactionKind};
use chrono::NaiveDate;

struct SeedRow {
    id: &'static str,
    date: (i32, u32, u32),
    kind: TransactionKind,
    group: CategoryGroup,
    subcategory: &'static str,
    amount: u32,
    account: &'static str,
    comment: &'static str,
    created_at: i64,
}

const SEED: &[SeedRow] = &[
    SeedRow {
        id: "1",
        date: (2023, 10, 1),
        kind: TransactionKind::Expense,
        group: CategoryGroup::Variable,
        subcategory: "Еда (продукты домой)",
        amount: 2500,
        account: "Карта Тинькофф",
        comment: "Ашан",
        created_at: 1696118400000,
    },
    SeedRow {
        id: "2",
        date: (2023, 10, 1),
        kind: TransactionKind::Expense,
        group: CategoryGroup::Variable,
        subcategory: "Транспорт (бензин, такси, метро)",
        amount: 450,
        account: "Наличные",
        comment: "Опаздывал",
        created_at: 1696122000000,
    },
    SeedRow {
        id: "3",
        date: (2023, 10, 5),
        kind: TransactionKind::Income,
        group: CategoryGroup::IncomeSources,
        subcategory: "Зарплата",
        amount: 60000,
        account: "Карта Сбер",
        comment: "Аванс",
        created_at: 1696464000000,
    },
    SeedRow {
        id: "4",
        date: (2023, 10, 7),
        kind: TransactionKind::Expense,
        group: CategoryGroup::Fixed,
        subcategory: "Коммуналка / Интернет",
        amount: 5000,
        account: "Карта Сбер",
        comment: "За сентябрь",
        created_at: 1696636800000,
    },
];

/// Returns the example transactions in display order.
pub fn seed_transactions() -> Vec<Transaction> {
    SEED.iter()
        .filter_map(|row| {
            let (y, m, d) = row.date;
            Some(Transaction {
                id: row.id.to_string(),
                date: NaiveDate::from_ymd_opt(y, m, d)?,
                kind: row.kind,
                category_group: row.group,
                subcategory: row.subcategory.to_string(),
                amount: Amount::from_units(row.amount),
                account: row.account.to_string(),
                comment: row.comment.to_string(),
                created_at: row.created_at,
            })
        })
        .collect()
}

#[test]
fn seed_is_complete_and_consistent() {
    let seed = seed_transactions();
    assert_eq!(SEED.len(), seed.len());
    for t in &seed {
        assert!(t.category_group().accepts(t.kind()));
    }
}
