//! Income and expense records, the raw data behind the history chart.

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::Error;

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionKind {
    /// The name stored in the database, e.g. "income".
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(FromSqlError::Other(
                format!("unknown transaction kind {other:?}").into(),
            )),
        }
    }
}

/// A stored income or expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The row ID.
    pub id: i64,
    /// Always non-negative, `kind` gives the direction.
    pub amount: f64,
    /// Whether the money came in or went out.
    pub kind: TransactionKind,
    /// The day the transaction happened.
    pub date: Date,
    /// A short note, e.g. "Groceries".
    pub description: String,
}

/// A validated transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    amount: f64,
    kind: TransactionKind,
    date: Date,
    description: String,
}

impl NewTransaction {
    /// Validate a transaction before it is stored.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidAmount] if `amount` is negative, infinite or NaN.
    pub fn new(
        amount: f64,
        kind: TransactionKind,
        date: Date,
        description: &str,
    ) -> Result<Self, Error> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::InvalidAmount(amount));
        }

        Ok(Self {
            amount,
            kind,
            date,
            description: description.trim().to_owned(),
        })
    }
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL CHECK (amount >= 0),
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                date TEXT NOT NULL,
                description TEXT NOT NULL
                )",
        (),
    )?;

    // The history queries filter on date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Store a new transaction.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "INSERT INTO \"transaction\" (amount, kind, date, description)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, amount, kind, date, description",
        )?
        .query_row(
            (
                transaction.amount,
                transaction.kind,
                transaction.date,
                transaction.description,
            ),
            map_transaction_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve a transaction by its `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a stored transaction.
pub fn get_transaction(id: i64, connection: &Connection) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT id, amount, kind, date, description FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)
        .map_err(|error| error.into())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        amount: row.get(1)?,
        kind: row.get(2)?,
        date: row.get(3)?,
        description: row.get(4)?,
    })
}

#[cfg(test)]
mod new_transaction_tests {
    use time::macros::date;

    use crate::{
        Error,
        transaction::{NewTransaction, TransactionKind},
    };

    #[test]
    fn accepts_zero_and_positive_amounts() {
        assert!(NewTransaction::new(0.0, TransactionKind::Income, date!(2025 - 01 - 01), "").is_ok());
        assert!(
            NewTransaction::new(12.3, TransactionKind::Expense, date!(2025 - 01 - 01), "").is_ok()
        );
    }

    #[test]
    fn rejects_negative_amounts() {
        assert_eq!(
            NewTransaction::new(-1.0, TransactionKind::Expense, date!(2025 - 01 - 01), ""),
            Err(Error::InvalidAmount(-1.0))
        );
    }

    #[test]
    fn rejects_infinite_amounts() {
        assert_eq!(
            NewTransaction::new(
                f64::INFINITY,
                TransactionKind::Income,
                date!(2025 - 01 - 01),
                ""
            ),
            Err(Error::InvalidAmount(f64::INFINITY))
        );
    }

    #[test]
    fn rejects_nan_amounts() {
        let result = NewTransaction::new(f64::NAN, TransactionKind::Income, date!(2025 - 01 - 01), "");

        assert!(matches!(result, Err(Error::InvalidAmount(amount)) if amount.is_nan()));
    }
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        transaction::{
            NewTransaction, TransactionKind, count_transactions, create_transaction,
            get_transaction,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let new_transaction = NewTransaction::new(
            12.3,
            TransactionKind::Expense,
            date!(2025 - 10 - 05),
            " Coffee ",
        )
        .unwrap();

        let transaction = create_transaction(new_transaction, &conn).unwrap();

        assert_eq!(transaction.amount, 12.3);
        assert_eq!(transaction.kind, TransactionKind::Expense);
        assert_eq!(transaction.date, date!(2025 - 10 - 05));
        assert_eq!(transaction.description, "Coffee");
        assert_eq!(get_transaction(transaction.id, &conn), Ok(transaction));
    }

    #[test]
    fn get_fails_with_unknown_id() {
        let conn = get_test_connection();

        assert_eq!(get_transaction(1337, &conn), Err(Error::NotFound));
    }

    #[test]
    fn count_transactions_counts_both_kinds() {
        let conn = get_test_connection();
        assert_eq!(count_transactions(&conn), Ok(0));

        for kind in [TransactionKind::Income, TransactionKind::Expense] {
            let new_transaction =
                NewTransaction::new(1.0, kind, date!(2025 - 10 - 05), "").unwrap();
            create_transaction(new_transaction, &conn).unwrap();
        }

        assert_eq!(count_transactions(&conn), Ok(2));
    }
}
