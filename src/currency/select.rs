use maud::{Markup, html};

use crate::{currency::Currency, endpoints, html::FORM_TEXT_INPUT_STYLE};

/// A drop-down of every supported currency that saves the choice as soon as it changes.
///
/// The confirmation or error alert is swapped into `#alert-container`.
pub fn currency_select(selected: Currency) -> Markup {
    html! {
        label for="currency" class="sr-only" { "Currency" }

        select
            id="currency"
            name="currency"
            class=(FORM_TEXT_INPUT_STYLE)
            hx-post=(endpoints::USER_CURRENCY)
            hx-trigger="change"
            hx-target="#alert-container"
            hx-target-error="#alert-container"
            hx-swap="innerHTML"
        {
            @for currency in Currency::ALL {
                option value=(currency.code()) selected[currency == selected] {
                    (currency.label())
                }
            }
        }
    }
}
