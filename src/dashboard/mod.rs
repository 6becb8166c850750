//! Dashboard module
//!
//! Provides an overview page with the income and expense history of a
//! chosen period and a form for recording new transactions.

mod handlers;
mod period_selector;
mod totals;

pub use handlers::{get_dashboard_page, get_index_page};
