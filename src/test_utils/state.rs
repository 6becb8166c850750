use rusqlite::Connection;

use crate::{
    AppState,
    auth::{FirstName, PasswordHash, User, ValidatedPassword, create_user},
};

pub(crate) const TEST_PASSWORD: &str = "averylongandsecurepassword";

/// App state backed by a fresh in-memory database with every table created.
pub(crate) fn get_test_app_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");

    AppState::new(connection, "foobar", "Etc/UTC").expect("Could not create app state")
}

/// Create the account "Ana" with the password [TEST_PASSWORD].
pub(crate) fn insert_test_user(state: &AppState) -> User {
    // The minimum bcrypt cost keeps the tests quick.
    let password_hash = PasswordHash::new(ValidatedPassword::new_unchecked(TEST_PASSWORD), 4)
        .expect("Could not hash password");

    create_user(
        FirstName::new("Ana").unwrap(),
        password_hash,
        &state.db_connection.lock().unwrap(),
    )
    .expect("Could not create test user")
}
