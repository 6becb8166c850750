//! Recording income and expenses.

mod core;
mod create_endpoint;
mod form;

pub use core::{
    NewTransaction, Transaction, TransactionKind, count_transactions, create_transaction,
    create_transaction_table,
};
pub use create_endpoint::create_transaction_endpoint;
pub use form::new_transaction_form;

#[cfg(test)]
pub use core::get_transaction;
