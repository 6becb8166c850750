//! Currencies, how amounts are formatted in them, and the user's chosen currency.

mod core;
mod formatter;
mod select;
mod settings;

pub use core::Currency;
pub use formatter::CurrencyFormatter;
pub use select::currency_select;
pub use settings::{
    UserSettings, create_user_settings_table, get_or_create_user_settings, get_user_settings,
    set_user_currency, update_currency_endpoint,
};
