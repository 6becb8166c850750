//! The card shown when hovering a bucket of the history chart.

use std::time::Duration;

use maud::{Markup, html};

use crate::{
    currency::CurrencyFormatter,
    history::{COUNT_UP_DURATION, CountUp, HistoryRecord},
};

/// What the chart reports about the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TooltipState {
    /// The pointer is not over a bucket.
    Inactive,
    /// The pointer is over a bucket with these totals.
    Active {
        /// Money earned in the bucket.
        income: f64,
        /// Money spent in the bucket.
        expense: f64,
    },
}

impl TooltipState {
    /// The tooltip for the hovered `payload`, only the first record is shown.
    ///
    /// An empty payload counts as inactive even if `active` is set.
    pub fn new(active: bool, payload: &[HistoryRecord]) -> Self {
        match payload.first() {
            Some(record) if active => Self::Active {
                income: record.income,
                expense: record.expense,
            },
            _ => Self::Inactive,
        }
    }

    /// Income minus expense of the active bucket.
    pub fn balance(&self) -> Option<f64> {
        match *self {
            Self::Inactive => None,
            Self::Active { income, expense } => Some(income - expense),
        }
    }
}

/// One row of the tooltip: a colour swatch, a label and the animated amount.
struct TooltipRow<'a> {
    label: &'static str,
    swatch_style: &'static str,
    value_style: &'static str,
    value: &'a CountUp,
}

impl TooltipRow<'_> {
    fn into_html(self, formatter: &CurrencyFormatter) -> Markup {
        html!(
            div class="flex items-center gap-2"
            {
                div class={ "h-4 w-4 rounded-full " (self.swatch_style) } {}

                div class="flex w-full justify-between"
                {
                    p class="text-sm text-gray-500 dark:text-gray-400" { (self.label) }

                    div class={ "text-sm font-bold " (self.value_style) }
                    {
                        span data-target=(self.value.target()) { (self.value.display(formatter)) }
                    }
                }
            }
        )
    }
}

/// The tooltip of the history chart with its animated values.
///
/// The values are kept between hovers, so moving from one bucket to the next
/// counts from the old totals to the new ones.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HistoryTooltip {
    expense: CountUp,
    income: CountUp,
    balance: CountUp,
    visible: bool,
}

impl HistoryTooltip {
    /// A hidden tooltip with every value at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A tooltip that has finished animating towards `state`.
    pub fn settled(state: TooltipState) -> Self {
        let mut tooltip = Self::new();
        tooltip.show(state);
        tooltip.tick(COUNT_UP_DURATION);
        tooltip
    }

    /// Point the tooltip at a new bucket, or hide it.
    pub fn show(&mut self, state: TooltipState) {
        match state {
            TooltipState::Inactive => self.visible = false,
            TooltipState::Active { income, expense } => {
                self.visible = true;
                self.expense.retarget(expense);
                self.income.retarget(income);
                self.balance.retarget(income - expense);
            }
        }
    }

    /// Advance every value by `delta`.
    pub fn tick(&mut self, delta: Duration) {
        self.expense.tick(delta);
        self.income.tick(delta);
        self.balance.tick(delta);
    }

    /// Whether the pointer is over a bucket.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether every value has reached its target.
    pub fn is_settled(&self) -> bool {
        self.expense.is_idle() && self.income.is_idle() && self.balance.is_idle()
    }

    /// Render the rows Expense, Income and Balance, or nothing while hidden.
    pub fn view(&self, formatter: &CurrencyFormatter) -> Markup {
        if !self.visible {
            return html!();
        }

        let rows = [
            TooltipRow {
                label: "Expense",
                swatch_style: "bg-red-500",
                value_style: "text-red-500",
                value: &self.expense,
            },
            TooltipRow {
                label: "Income",
                swatch_style: "bg-emerald-500",
                value_style: "text-emerald-500",
                value: &self.income,
            },
            TooltipRow {
                label: "Balance",
                swatch_style: "bg-gray-100",
                value_style: "text-gray-900 dark:text-white",
                value: &self.balance,
            },
        ];

        html!(
            div
                class="history-tooltip min-w-[300px] space-y-1 rounded border p-4
                bg-white dark:bg-gray-800 dark:border-gray-700"
            {
                @for row in rows {
                    (row.into_html(formatter))
                }
            }
        )
    }
}

/// The markup of the tooltip once it has finished animating to `state`.
pub fn tooltip_view(state: TooltipState, formatter: &CurrencyFormatter) -> Markup {
    HistoryTooltip::settled(state).view(formatter)
}
