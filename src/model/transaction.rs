use crate::model::catalog::{self, ACCOUNTS};
use crate::model::Amount;
use crate::{utils, Result};
use anyhow::{bail, ensure};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Whether money came in or went out. The amount of a transaction is always a magnitude, so this
/// is the only thing that decides the sign of a transaction in any sum.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    #[serde(alias = "income", alias = "Доход")]
    Income,
    #[serde(alias = "expense", alias = "Расход")]
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionKind);
serde_plain::derive_fromstr_from_deserialize!(TransactionKind);

/// The high-level bucket a transaction belongs to.
///
/// Income always lives in `IncomeSources`; expenses live in one of the other four groups. The
/// aliases accept the labels written by earlier versions of the application.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum CategoryGroup {
    #[serde(rename = "income-sources", alias = "Источники дохода")]
    IncomeSources,
    #[serde(alias = "fixed", alias = "Обязательные (Fixed)")]
    Fixed,
    #[serde(alias = "variable", alias = "Переменные (Variable)")]
    Variable,
    #[serde(
        rename = "Funds/Savings",
        alias = "funds",
        alias = "savings",
        alias = "Фонды и Сбережения"
    )]
    Funds,
    #[serde(alias = "other", alias = "Прочее")]
    Other,
}

serde_plain::derive_display_from_serialize!(CategoryGroup);
serde_plain::derive_fromstr_from_deserialize!(CategoryGroup);

impl CategoryGroup {
    /// The groups an expense may belong to, in the order a form would offer them.
    pub const EXPENSE_GROUPS: [CategoryGroup; 4] = [
        CategoryGroup::Fixed,
        CategoryGroup::Variable,
        CategoryGroup::Funds,
        CategoryGroup::Other,
    ];

    /// The only group that is valid for `kind` when the user did not choose one.
    pub fn default_for(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Income => CategoryGroup::IncomeSources,
            TransactionKind::Expense => CategoryGroup::Variable,
        }
    }

    /// Whether a transaction of `kind` may be filed under this group.
    pub fn accepts(&self, kind: TransactionKind) -> bool {
        match kind {
            TransactionKind::Income => *self == CategoryGroup::IncomeSources,
            TransactionKind::Expense => *self != CategoryGroup::IncomeSources,
        }
    }

    /// The lookup list of subcategories offered for this group.
    pub fn subcategories(&self) -> &'static [&'static str] {
        catalog::subcategories(*self)
    }
}

/// A single recorded income or expense event. Transactions are never edited after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub(crate) id: String,
    pub(crate) date: NaiveDate,
    #[serde(rename = "type")]
    pub(crate) kind: TransactionKind,
    pub(crate) category_group: CategoryGroup,
    pub(crate) subcategory: String,
    pub(crate) amount: Amount,
    pub(crate) account: String,
    #[serde(default)]
    pub(crate) comment: String,
    /// Epoch milliseconds. Informational only, never used in a financial calculation.
    pub(crate) created_at: i64,
}

impl Transaction {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn category_group(&self) -> CategoryGroup {
        self.category_group
    }

    pub fn subcategory(&self) -> &str {
        &self.subcategory
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

/// The fields a user fills in when recording a transaction. Anything left as `None` falls back to
/// the same default the entry form pre-selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: Amount,
    pub date: Option<NaiveDate>,
    pub group: Option<CategoryGroup>,
    pub subcategory: Option<String>,
    pub account: Option<String>,
    pub comment: Option<String>,
}

impl NewTransaction {
    pub fn new(kind: TransactionKind, amount: Amount) -> Self {
        Self {
            kind,
            amount,
            date: None,
            group: None,
            subcategory: None,
            account: None,
            comment: None,
        }
    }

    /// Checks the draft and, if it is complete and consistent, turns it into a `Transaction` with
    /// a freshly generated ID and creation timestamp.
    ///
    /// # Errors
    /// - The group does not match the transaction kind, e.g. an income filed under `Fixed`.
    /// - The subcategory or account was given but is blank.
    pub fn validate(self) -> Result<Transaction> {
        let group = self
            .group
            .unwrap_or_else(|| CategoryGroup::default_for(self.kind));
        if !group.accepts(self.kind) {
            bail!(
                "A transaction of type {} cannot be filed under the '{}' group",
                self.kind,
                group
            );
        }

        let subcategory = match self.subcategory {
            Some(s) => s.trim().to_string(),
            None => group
                .subcategories()
                .first()
                .map(|s| s.to_string())
                .unwrap_or_default(),
        };
        ensure!(!subcategory.is_empty(), "A subcategory is required");

        let account = match self.account {
            Some(s) => s.trim().to_string(),
            None => ACCOUNTS[0].to_string(),
        };
        ensure!(!account.is_empty(), "An account is required");

        Ok(Transaction {
            id: utils::generate_transaction_id(),
            date: self.date.unwrap_or_else(|| Local::now().date_naive()),
            kind: self.kind,
            category_group: group,
            subcategory,
            amount: self.amount,
            account,
            comment: self.comment.unwrap_or_default().trim().to_string(),
            created_at: utils::now_millis(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_russian_labels() {
        let json = r#"{
            "id": "2",
            "date": "2023-10-01",
            "type": "Расход",
            "categoryGroup": "Переменные (Variable)",
            "subcategory": "Транспорт (бензин, такси, метро)",
            "amount": 450,
            "account": "Наличные",
            "comment": "Опаздывал",
            "createdAt": 1696122000000
        }"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.kind(), TransactionKind::Expense);
        assert_eq!(t.category_group(), CategoryGroup::Variable);
        assert_eq!(t.amount(), Amount::from_units(450));
        assert_eq!(t.date(), NaiveDate::from_ymd_opt(2023, 10, 1).unwrap());
    }

    #[test]
    fn test_serialize_field_names() {
        let t = Transaction {
            id: "abc".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 10, 5).unwrap(),
            kind: TransactionKind::Income,
            category_group: CategoryGroup::IncomeSources,
            subcategory: "Зарплата".to_string(),
            amount: Amount::from_units(60000),
            account: "Карта Сбер".to_string(),
            comment: String::new(),
            created_at: 1696464000000,
        };
        let value = serde_json::to_value(&t).unwrap();
        assert_eq!(value["type"], "Income");
        assert_eq!(value["categoryGroup"], "income-sources");
        assert_eq!(value["date"], "2023-10-05");
        assert_eq!(value["amount"], 60000);
        assert_eq!(value["createdAt"], 1696464000000_i64);
    }

    #[test]
    fn test_missing_comment_defaults_to_empty() {
        let json = r#"{"id":"x","date":"2024-01-02","type":"Expense","categoryGroup":"Other",
            "subcategory":"Мелочи","amount":"10","account":"Наличные","createdAt":1}"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.comment(), "");
    }

    #[test]
    fn test_negative_amount_is_rejected_when_reading() {
        let json = r#"{"id":"x","date":"2024-01-02","type":"Expense","categoryGroup":"Other",
            "subcategory":"Мелочи","amount":-10,"account":"Наличные","createdAt":1}"#;
        assert!(serde_json::from_str::<Transaction>(json).is_err());
    }

    #[test]
    fn test_kind_and_group_from_str() {
        assert_eq!(
            "expense".parse::<TransactionKind>().unwrap(),
            TransactionKind::Expense
        );
        assert_eq!(
            "Funds/Savings".parse::<CategoryGroup>().unwrap(),
            CategoryGroup::Funds
        );
        assert_eq!("funds".parse::<CategoryGroup>().unwrap(), CategoryGroup::Funds);
        assert_eq!(CategoryGroup::Funds.to_string(), "Funds/Savings");
        assert!("Groceries".parse::<CategoryGroup>().is_err());
    }

    #[test]
    fn test_validate_income_defaults() {
        let draft = NewTransaction::new(TransactionKind::Income, Amount::from_units(100));
        let t = draft.validate().unwrap();
        assert_eq!(t.category_group(), CategoryGroup::IncomeSources);
        assert_eq!(t.subcategory(), "Зарплата");
        assert_eq!(t.account(), ACCOUNTS[0]);
        assert!(!t.id().is_empty());
        assert!(t.created_at() > 0);
    }

    #[test]
    fn test_validate_expense_defaults_to_variable() {
        let draft = NewTransaction::new(TransactionKind::Expense, Amount::from_units(100));
        let t = draft.validate().unwrap();
        assert_eq!(t.category_group(), CategoryGroup::Variable);
        assert_eq!(t.subcategory(), CategoryGroup::Variable.subcategories()[0]);
    }

    #[test]
    fn test_validate_rejects_mismatched_group() {
        let mut draft = NewTransaction::new(TransactionKind::Income, Amount::from_units(1));
        draft.group = Some(CategoryGroup::Fixed);
        assert!(draft.validate().is_err());

        let mut draft = NewTransaction::new(TransactionKind::Expense, Amount::from_units(1));
        draft.group = Some(CategoryGroup::IncomeSources);
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_subcategory() {
        let mut draft = NewTransaction::new(TransactionKind::Expense, Amount::from_units(1));
        draft.subcategory = Some("   ".to_string());
        let err = draft.validate().unwrap_err();
        assert!(err.to_string().contains("subcategory"));
    }

    #[test]
    fn test_validate_keeps_free_text_subcategory() {
        let mut draft = NewTransaction::new(TransactionKind::Expense, Amount::from_units(7));
        draft.group = Some(CategoryGroup::Other);
        draft.subcategory = Some("Parking".to_string());
        draft.date = NaiveDate::from_ymd_opt(2024, 3, 9);
        draft.comment = Some(" meter ".to_string());
        let t = draft.validate().unwrap();
        assert_eq!(t.subcategory(), "Parking");
        assert_eq!(t.comment(), "meter");
        assert_eq!(t.date(), NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    }

    #[test]
    fn test_validate_generates_unique_ids() {
        let a = NewTransaction::new(TransactionKind::Expense, Amount::from_units(1))
            .validate()
            .unwrap();
        let b = NewTransaction::new(TransactionKind::Expense, Amount::from_units(1))
            .validate()
            .unwrap();
        assert_ne!(a.id(), b.id());
    }
}
