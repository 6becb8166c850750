use maud::{Markup, html};

use crate::{currency::CurrencyFormatter, history::HistoryRecord, html::CARD_STYLE};

/// The summed income, expense and balance of every bucket in a period.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(super) struct PeriodTotals {
    pub income: f64,
    pub expense: f64,
}

impl PeriodTotals {
    pub fn from_records(records: &[HistoryRecord]) -> Self {
        records.iter().fold(Self::default(), |totals, record| Self {
            income: totals.income + record.income,
            expense: totals.expense + record.expense,
        })
    }

    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }
}

fn total_card(label: &str, value: &str, value_style: &str) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            p class="text-sm text-gray-500 dark:text-gray-400" { (label) }
            p class={ "text-2xl font-bold " (value_style) } { (value) }
        }
    }
}

pub(super) fn totals_view(totals: PeriodTotals, formatter: &CurrencyFormatter) -> Markup {
    html! {
        section id="totals" class="w-full grid grid-cols-1 md:grid-cols-3 gap-4 mb-4"
        {
            (total_card("Income", &formatter.format(totals.income), "text-emerald-500"))
            (total_card("Expense", &formatter.format(totals.expense), "text-red-500"))
            (total_card("Balance", &formatter.format(totals.balance()), ""))
        }
    }
}
