//! Builds the instruction sent to the language model.

use crate::model::{CategoryGroup, Transaction, TransactionKind};
use crate::Result;
use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;

/// The reduced view of a transaction that is sent to the model. Only what the analysis needs is
/// included, which keeps the request small.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Row<'a> {
    date: NaiveDate,
    #[serde(rename = "type")]
    kind: TransactionKind,
    category: String,
    amount: crate::model::Amount,
    comment: &'a str,
}

impl<'a> From<&'a Transaction> for Row<'a> {
    fn from(t: &'a Transaction) -> Self {
        let category = match t.category_group() {
            CategoryGroup::IncomeSources => t.subcategory().to_string(),
            group => format!("{} - {}", group, t.subcategory()),
        };
        Self {
            date: t.date(),
            kind: t.kind(),
            category,
            amount: t.amount(),
            comment: t.comment(),
        }
    }
}

/// Builds the budget-critique prompt for `snapshot`.
pub(crate) fn build(snapshot: &[Transaction]) -> Result<String> {
    let rows: Vec<Row<'_>> = snapshot.iter().map(Row::from).collect();
    let data = serde_json::to_string(&rows).context("Unable to serialize transactions for analysis")?;
    Ok(format!(
        r#"You are an experienced financial consultant. Analyze the user's income and expense data below.

Data (JSON):
{data}

Please do the following:
1. Calculate the total balance (income minus expenses).
2. Identify the main expense items.
3. Check whether the rule "Fixed expenses should not be too high" is respected.
4. Find the holes in the budget (categories such as "Other", small catch-all items, or strangely large spending).
5. Give 3 concrete tips for optimizing the budget based on this data.

Format the answer using Markdown. Be brief, polite and professional."#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed_transactions;

    #[test]
    fn test_prompt_contains_data_summary() {
        let prompt = build(&seed_transactions()).unwrap();
        assert!(prompt.contains(r#""category":"Variable - Еда (продукты домой)""#));
        // Income uses the bare source name.
        assert!(prompt.contains(r#""category":"Зарплата""#));
        assert!(prompt.contains(r#""type":"Income""#));
        assert!(prompt.contains(r#""amount":60000"#));
        assert!(prompt.contains("3 concrete tips"));
    }

    #[test]
    fn test_prompt_omits_ids_and_accounts() {
        let prompt = build(&seed_transactions()).unwrap();
        assert!(!prompt.contains("createdAt"));
        assert!(!prompt.contains("Карта Тинькофф"));
    }
}
