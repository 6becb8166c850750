//! Tally is a web app for keeping track of income and expenses.
//!
//! This library provides a REST API that directly serves HTML pages: a
//! dashboard with an income/expense history chart, an onboarding wizard for
//! choosing the default currency, and the sign-in flow that guards both.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod currency;
mod dashboard;
mod db;
mod endpoints;
mod history;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod timezone;
mod transaction;
mod wizard;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{FirstName, PasswordHash, User, UserID, ValidatedPassword, create_user};
pub use currency::{Currency, CurrencyFormatter, set_user_currency};
pub use db::initialize as initialize_db;
pub use history::{
    COUNT_UP_DURATION, CountUp, HistoryRecord, HistoryTooltip, Timeframe, TooltipState, axis_label,
    axis_labels, calendar_date, tooltip_view,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use transaction::{NewTransaction, Transaction, TransactionKind, create_transaction};

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an incorrect password.
    #[error("invalid password")]
    InvalidCredentials,

    /// The auth cookie is missing from the cookie jar, or it has expired.
    #[error("no valid auth cookie in the cookie jar")]
    CookieMissing,

    /// The auth token could not be written to or read from the cookie.
    #[error("could not encode the auth token: {0}")]
    InvalidToken(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An empty string was used as a first name.
    #[error("first name cannot be empty")]
    EmptyFirstName,

    /// The currency code is not one of the supported currencies.
    #[error("\"{0}\" is not a supported currency")]
    InvalidCurrency(String),

    /// A transaction amount was negative, infinite or not a number.
    ///
    /// Whether a transaction adds or removes money is given by its kind, so
    /// amounts are always stored as non-negative numbers.
    #[error("{0} is not a valid transaction amount")]
    InvalidAmount(f64),

    /// A date string could not be parsed as a calendar date.
    #[error("\"{0}\" is not a valid date")]
    InvalidDate(String),

    /// The requested history period does not exist, e.g. month 12.
    #[error("invalid history period: {0}")]
    InvalidHistoryPeriod(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidHistoryPeriod(reason) => {
                (StatusCode::BAD_REQUEST, format!("Invalid history period: {reason}"))
                    .into_response()
            }
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert to be swapped into the page's alert container.
    ///
    /// Intended for endpoints that are called by htmx.
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidCurrency(code) => Alert::error(
                "Invalid currency",
                &format!("\"{code}\" is not a supported currency. Pick one from the list."),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidAmount(amount) => Alert::error(
                "Invalid amount",
                &format!("{amount} is not a valid amount. Enter a positive number."),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidDate(date) => Alert::error(
                "Invalid date",
                &format!("\"{date}\" is not a valid date. Use the format YYYY-MM-DD."),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidTimezoneError(timezone) => Alert::error(
                "Invalid Timezone Settings",
                &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            )
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                Alert::error(
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                )
                .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
