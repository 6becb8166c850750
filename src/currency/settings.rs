//! The user's display preferences, currently just the currency.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use rusqlite::{Connection, OptionalExtension, Row};
use serde::Deserialize;

use crate::{AppState, Error, UserID, alert::Alert, currency::Currency};

/// The settings a user picks in the onboarding wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSettings {
    pub user_id: UserID,
    pub currency: Currency,
}

/// Create the user settings table.
///
/// # Errors
/// Returns an error if the table cannot be created.
pub fn create_user_settings_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user_settings (
            user_id INTEGER PRIMARY KEY,
            currency TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

fn map_settings_row(row: &Row) -> Result<(i64, String), rusqlite::Error> {
    Ok((row.get(0)?, row.get(1)?))
}

/// Get the settings of `user_id`, or `None` if they have not picked a currency yet.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails, or [Error::InvalidCurrency]
/// if the stored currency is not supported anymore.
pub fn get_user_settings(
    user_id: UserID,
    connection: &Connection,
) -> Result<Option<UserSettings>, Error> {
    let row = connection
        .query_row(
            "SELECT user_id, currency FROM user_settings WHERE user_id = ?1",
            [user_id.as_i64()],
            map_settings_row,
        )
        .optional()?;

    row.map(|(user_id, currency)| {
        Ok(UserSettings {
            user_id: UserID::new(user_id),
            currency: currency.parse()?,
        })
    })
    .transpose()
}

/// Get the settings of `user_id`, storing the default currency first if they have none.
///
/// # Errors
/// See [get_user_settings].
pub fn get_or_create_user_settings(
    user_id: UserID,
    connection: &Connection,
) -> Result<UserSettings, Error> {
    match get_user_settings(user_id, connection)? {
        Some(settings) => Ok(settings),
        None => set_user_currency(user_id, Currency::default(), connection),
    }
}

/// Store `currency` as the currency of `user_id`, replacing any previous choice.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn set_user_currency(
    user_id: UserID,
    currency: Currency,
    connection: &Connection,
) -> Result<UserSettings, Error> {
    connection.execute(
        "INSERT INTO user_settings (user_id, currency) VALUES (?1, ?2)
        ON CONFLICT(user_id) DO UPDATE SET currency = excluded.currency",
        (user_id.as_i64(), currency.code()),
    )?;

    Ok(UserSettings { user_id, currency })
}

/// The state needed to update the currency.
#[derive(Debug, Clone)]
pub struct CurrencyState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CurrencyState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CurrencyForm {
    pub currency: String,
}

/// Save the currency picked in the currency select and confirm with an alert.
pub async fn update_currency_endpoint(
    State(state): State<CurrencyState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<CurrencyForm>,
) -> Response {
    let currency: Currency = match form.currency.parse() {
        Ok(currency) => currency,
        Err(error) => {
            tracing::warn!("Rejected currency update: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match set_user_currency(user_id, currency, &connection) {
        Ok(settings) => {
            let details = format!("Amounts are now shown in {}.", settings.currency.label());
            Alert::success("Currency updated", &details).into_response_with_status(StatusCode::OK)
        }
        Err(error) => {
            tracing::error!("could not update currency for user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}
