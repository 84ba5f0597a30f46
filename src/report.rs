//! The aggregation engine: pure functions that derive dashboard views from a snapshot of the
//! transaction collection.
//!
//! Nothing in here mutates its input or keeps state between calls, so every view can simply be
//! recomputed whenever the collection changes. None of the results depend on the order of the
//! snapshot, except where noted.

use crate::model::{CategoryGroup, Transaction, TransactionKind};
use chrono::{Datelike, Locale, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sums of all income and all expenses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    /// `income - expense`, negative when spending exceeds income.
    pub balance: Decimal,
}

/// Computes the income, expense and balance totals of `snapshot`. An empty snapshot has all-zero
/// totals.
///
/// Each amount is at most `Amount::MAX`, so no realistic number of transactions can overflow a
/// `Decimal` sum here or in the other views.
pub fn totals(snapshot: &[Transaction]) -> Totals {
    let (income, expense) =
        snapshot
            .iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(income, expense), t| match t.kind() {
                TransactionKind::Income => (income + t.amount().value(), expense),
                TransactionKind::Expense => (income, expense + t.amount().value()),
            });
    Totals {
        income,
        expense,
        balance: income - expense,
    }
}

/// The summed expenses of a single category group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub group: CategoryGroup,
    pub total: Decimal,
}

/// Sums expenses per category group.
///
/// Groups appear in the order in which they are first seen in `snapshot`, they are not sorted by
/// value. Income is ignored, so a snapshot without expenses yields an empty list.
pub fn expense_by_category(snapshot: &[Transaction]) -> Vec<CategoryTotal> {
    let mut groups: Vec<CategoryTotal> = Vec::new();
    for t in snapshot.iter().filter(|t| t.is_expense()) {
        let amount = t.amount().value();
        match groups.iter_mut().find(|c| c.group == t.category_group()) {
            Some(existing) => existing.total += amount,
            None => groups.push(CategoryTotal {
                group: t.category_group(),
                total: amount,
            }),
        }
    }
    groups
}

/// Chooses how transactions are grouped into days for the daily flow series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKey {
    /// One bucket per calendar date.
    #[default]
    Date,
    /// One bucket per day-of-month and month, ignoring the year. The same day in different years
    /// lands in the same bucket.
    DayMonth,
}

serde_plain::derive_display_from_serialize!(DayKey);
serde_plain::derive_fromstr_from_deserialize!(DayKey);

/// The identity of a daily flow bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Date(NaiveDate),
    DayMonth { day: u32, month: u32 },
}

impl Bucket {
    fn new(date: NaiveDate, key: DayKey) -> Self {
        match key {
            DayKey::Date => Bucket::Date(date),
            DayKey::DayMonth => Bucket::DayMonth {
                day: date.day(),
                month: date.month(),
            },
        }
    }

    /// A short day and month label such as `1 окт` for `ru_RU`.
    pub fn label(&self, locale: Locale) -> String {
        let date = match *self {
            Bucket::Date(date) => Some(date),
            // 2000 is a leap year, so the 29th of February can be shown too.
            Bucket::DayMonth { day, month } => NaiveDate::from_ymd_opt(2000, month, day),
        };
        match date {
            Some(date) => date.format_localized("%-d %b", locale).to_string(),
            None => String::new(),
        }
    }
}

/// Income and expense summed over one bucket of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyFlow {
    pub bucket: Bucket,
    pub income: Decimal,
    pub expense: Decimal,
}

/// Builds the income/expense time series.
///
/// A copy of `snapshot` is sorted by date (stable, so same-day transactions keep their relative
/// order) and bucketed according to `key`. Buckets are returned in the order they are first
/// encountered after sorting, which is ascending date order.
pub fn daily_flow(snapshot: &[Transaction], key: DayKey) -> Vec<DailyFlow> {
    let mut sorted: Vec<&Transaction> = snapshot.iter().collect();
    sorted.sort_by_key(|t| t.date());

    let mut series: Vec<DailyFlow> = Vec::new();
    let mut index: HashMap<Bucket, usize> = HashMap::new();
    for t in sorted {
        let bucket = Bucket::new(t.date(), key);
        let ix = *index.entry(bucket).or_insert_with(|| {
            series.push(DailyFlow {
                bucket,
                income: Decimal::ZERO,
                expense: Decimal::ZERO,
            });
            series.len() - 1
        });
        let flow = &mut series[ix];
        match t.kind() {
            TransactionKind::Income => flow.income += t.amount().value(),
            TransactionKind::Expense => flow.expense += t.amount().value(),
        }
    }
    series
}

/// Everything the dashboard shows, computed from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub totals: Totals,
    pub categories: Vec<CategoryTotal>,
    pub daily: Vec<DailyFlow>,
}

impl Dashboard {
    pub fn new(snapshot: &[Transaction], key: DayKey) -> Self {
        Self {
            totals: totals(snapshot),
            categories: expense_by_category(snapshot),
            daily: daily_flow(snapshot, key),
        }
    }
}
