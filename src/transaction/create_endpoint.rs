//! Defines the endpoint for recording income or an expense.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// axum_extra's Form reads an empty field as None instead of rejecting the request.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, macros::format_description};

use crate::{
    AppState, Error, endpoints,
    transaction::{NewTransaction, TransactionKind, create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// How much money came in or went out.
    pub amount: f64,
    pub kind: TransactionKind,
    /// The date as entered in a date input, e.g. "2025-10-05".
    pub date: String,
    #[serde(default)]
    pub description: Option<String>,
}

fn parse_date(raw_date: &str) -> Result<Date, Error> {
    Date::parse(raw_date.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidDate(raw_date.to_owned()))
}

/// A route handler for creating a new transaction, redirects to the dashboard on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let new_transaction = match parse_date(&form.date).and_then(|date| {
        NewTransaction::new(
            form.amount,
            form.kind,
            date,
            form.description.as_deref().unwrap_or_default(),
        )
    }) {
        Ok(new_transaction) => new_transaction,
        Err(error) => {
            tracing::warn!("Rejected new transaction: {error}");
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

    if let Err(error) = create_transaction(new_transaction, &connection) {
        tracing::error!("could not create transaction: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
