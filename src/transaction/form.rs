use maud::{Markup, html};
use time::Date;

use crate::{
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner},
    transaction::TransactionKind,
};

const FORM_RADIO_LABEL_STYLE: &str = "text-sm font-medium text-gray-900 dark:text-white";

fn kind_radio(kind: TransactionKind, label: &str, checked: bool) -> Markup {
    let id = format!("transaction-kind-{}", kind.as_str());

    html! {
        div class="flex items-center gap-3"
        {
            input
                name="kind"
                id=(id)
                type="radio"
                value=(kind.as_str())
                checked[checked]
                required;

            label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (label) }
        }
    }
}

/// A card with the form for recording income or an expense, dated `today` by default.
pub fn new_transaction_form(today: Date) -> Markup {
    html! {
        section class=(CARD_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "New transaction" }

            form
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-target="#alert-container"
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
                hx-disabled-elt="#submit-button"
                class="space-y-4"
            {
                fieldset class="space-y-2"
                {
                    legend class=(FORM_LABEL_STYLE) { "Transaction kind" }

                    div class="flex gap-6"
                    {
                        (kind_radio(TransactionKind::Expense, "Expense", true))
                        (kind_radio(TransactionKind::Income, "Income", false))
                    }
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        min="0"
                        placeholder="0.00"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                    input
                        name="date"
                        id="date"
                        type="date"
                        value=(today)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                    input
                        name="description"
                        id="description"
                        type="text"
                        placeholder="Description"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="inline htmx-indicator" id="indicator" { (loading_spinner()) }
                    "Add transaction"
                }
            }
        }
    }
}
