//! Creates the application's database schema.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, auth::create_user_table, currency::create_user_settings_table,
    transaction::create_transaction_table,
};

/// Create the tables for every model, skipping those that already exist.
///
/// The tables are created in a single exclusive transaction, so either all of
/// them exist afterwards or none of the changes are kept.
///
/// # Errors
/// Returns [Error::SqlError] if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_user_settings_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
