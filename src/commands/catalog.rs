use crate::commands::Out;
use crate::model::catalog::{ACCOUNTS, INCOME_SOURCES};
use crate::model::CategoryGroup;
use serde::Serialize;

/// The lookup lists offered when recording a transaction.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub expense_groups: Vec<CatalogGroup>,
    pub income_sources: Vec<&'static str>,
    pub accounts: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogGroup {
    pub group: CategoryGroup,
    pub subcategories: Vec<&'static str>,
}

/// Lists the suggested expense subcategories per group, the income sources and the accounts.
pub fn catalog() -> Out<Catalog> {
    let catalog = Catalog {
        expense_groups: CategoryGroup::EXPENSE_GROUPS
            .iter()
            .map(|group| CatalogGroup {
                group: *group,
                subcategories: group.subcategories().to_vec(),
            })
            .collect(),
        income_sources: INCOME_SOURCES.to_vec(),
        accounts: ACCOUNTS.to_vec(),
    };

    let mut message = String::from("Expense categories:\n");
    for entry in &catalog.expense_groups {
        message.push_str(&format!("\n{}\n", entry.group));
        for s in &entry.subcategories {
            message.push_str(&format!("  - {s}\n"));
        }
    }
    message.push_str(&format!("\n{}\n", CategoryGroup::IncomeSources));
    for s in &catalog.income_sources {
        message.push_str(&format!("  - {s}\n"));
    }
    message.push_str("\nAccounts\n");
    for s in &catalog.accounts {
        message.push_str(&format!("  - {s}\n"));
    }
    Out::new(message, catalog)
}

#[test]
fn catalog_test() {
    let out = catalog();
    let c = out.structure().unwrap();
    assert_eq!(4, c.expense_groups.len());
    assert_eq!(CategoryGroup::Fixed, c.expense_groups[0].group);
    assert!(out.message().contains("Funds/Savings"));
    assert!(out.message().contains("  - Наличные"));
}
