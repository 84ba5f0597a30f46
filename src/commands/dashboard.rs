use crate::commands::{open_store, table, Out};
use crate::model::format_decimal;
use crate::report::{Dashboard, Totals};
use crate::{Config, Result};
use rust_decimal::Decimal;

/// Computes the dashboard views from the current collection and renders them as text.
pub fn dashboard(config: &Config) -> Result<Out<Dashboard>> {
    let store = open_store(config);
    let dashboard = Dashboard::new(store.snapshot(), config.daily_flow_key());
    let message = render(&dashboard, config);
    Ok(Out::new(message, dashboard))
}

fn render(dashboard: &Dashboard, config: &Config) -> String {
    let currency = config.currency();
    let money = |value: Decimal| format!("{} {currency}", format_decimal(value));
    let Totals {
        income,
        expense,
        balance,
    } = dashboard.totals;

    let mut out = format!(
        "Balance: {}\nIncome: {}\nExpenses: {}\n",
        money(balance),
        money(income),
        money(expense)
    );

    out.push_str("\nExpenses by category:\n\n");
    if dashboard.categories.is_empty() {
        out.push_str("No data\n");
    } else {
        let rows: Vec<Vec<String>> = dashboard
            .categories
            .iter()
            .map(|c| vec![c.group.to_string(), money(c.total)])
            .collect();
        out.push_str(&table::markdown(&["Category", "Total"], &rows));
    }

    out.push_str("\nDaily flow:\n\n");
    if dashboard.daily.is_empty() {
        out.push_str("No data\n");
    } else {
        let rows: Vec<Vec<String>> = dashboard
            .daily
            .iter()
            .map(|d| {
                vec![
                    d.bucket.label(config.locale()),
                    money(d.income),
                    money(d.expense),
                ]
            })
            .collect();
        out.push_str(&table::markdown(&["Day", "Income", "Expenses"], &rows));
    }
    out
}
