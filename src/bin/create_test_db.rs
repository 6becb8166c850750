use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use tally::{
    Currency, FirstName, NewTransaction, PasswordHash, TransactionKind, ValidatedPassword,
    create_transaction, create_user, initialize_db, set_user_currency,
};

/// A utility for creating a test database for the Tally server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many days of transactions to generate, ending today.
    #[arg(long, default_value_t = 365)]
    days: i64,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(FirstName::new("Ana")?, password_hash, &conn)?;
    set_user_currency(user.id, Currency::USD, &conn)?;

    println!("Creating transactions...");

    let today = OffsetDateTime::now_utc().date();
    let mut count = 0;
    for offset in 0..args.days {
        let date = today - Duration::days(offset);

        for transaction in transactions_for(date)? {
            create_transaction(transaction, &conn)?;
            count += 1;
        }
    }

    println!("Created {count} transactions.");
    println!("Success! Sign in with the password \"test\".");

    Ok(())
}

/// A repeatable mix of salary, rent and everyday spending for `date`.
fn transactions_for(date: Date) -> Result<Vec<NewTransaction>, tally::Error> {
    let mut transactions = Vec::new();
    let ordinal = i64::from(date.ordinal());

    if matches!(date.day(), 1 | 15) {
        transactions.push(NewTransaction::new(
            2500.0,
            TransactionKind::Income,
            date,
            "Salary",
        )?);
    }

    if date.day() == 1 {
        transactions.push(NewTransaction::new(
            1200.0,
            TransactionKind::Expense,
            date,
            "Rent",
        )?);
    }

    if ordinal % 3 != 0 {
        let amount = 5.0 + ((ordinal * 37) % 80) as f64 + ((ordinal * 13) % 100) as f64 / 100.0;
        transactions.push(NewTransaction::new(
            amount,
            TransactionKind::Expense,
            date,
            "Groceries",
        )?);
    }

    if ordinal % 45 == 0 {
        transactions.push(NewTransaction::new(
            150.0,
            TransactionKind::Income,
            date,
            "Side job",
        )?);
    }

    Ok(transactions)
}
