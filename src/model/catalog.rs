//! Lookup lists offered when recording a transaction. They are suggestions for the entry form,
//! the data layer does not enforce them.

use crate::model::CategoryGroup;

pub const FIXED: &[&str] = &[
    "Аренда / Ипотека",
    "Коммуналка / Интернет",
    "Кредиты",
    "Обучение / Подписки",
];

pub const VARIABLE: &[&str] = &[
    "Еда (продукты домой)",
    "Еда вне дома (кафе, кофе)",
    "Транспорт (бензин, такси, метро)",
    "Красота / Здоровье",
    "Досуг / Хобби",
];

pub const FUNDS: &[&str] = &["Резервный фонд", "Отпуск", "Крупные покупки"];

pub const OTHER: &[&str] = &["Мелочи", "Забытое"];

pub const INCOME_SOURCES: &[&str] = &["Зарплата", "Подработка", "Дивиденды", "Подарок", "Прочее"];

pub const ACCOUNTS: &[&str] = &[
    "Карта Тинькофф",
    "Карта Сбер",
    "Наличные",
    "Кредитка",
    "Сберегательный счет",
];

/// Returns the subcategory lookup list for `group`.
pub fn subcategories(group: CategoryGroup) -> &'static [&'static str] {
    match group {
        CategoryGroup::IncomeSources => INCOME_SOURCES,
        CategoryGroup::Fixed => FIXED,
        CategoryGroup::Variable => VARIABLE,
        CategoryGroup::Funds => FUNDS,
        CategoryGroup::Other => OTHER,
    }
}

#[test]
fn every_group_has_subcategories() {
    for group in CategoryGroup::EXPENSE_GROUPS {
        assert!(!subcategories(group).is_empty());
    }
    assert!(!subcategories(CategoryGroup::IncomeSources).is_empty());
    assert!(!ACCOUNTS.is_empty());
}
