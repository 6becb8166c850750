//! JSON endpoints for the history chart data.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    history::{HistoryPeriod, HistoryQuery, HistoryRecord, get_history_data, get_history_periods},
    timezone::get_local_date,
};

/// The state needed by the history endpoints.
#[derive(Debug, Clone)]
pub struct HistoryState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for HistoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Get the income and expense of each bucket of the requested period.
pub async fn get_history_data_endpoint(
    State(state): State<HistoryState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryRecord>>, Error> {
    let today = get_local_date(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;
    let period = HistoryPeriod::resolve(query, today)?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    get_history_data(period.timeframe, period.year, period.month, &connection).map(Json)
}

/// Get the years that can be picked in the period selector.
pub async fn get_history_periods_endpoint(
    State(state): State<HistoryState>,
) -> Result<Json<Vec<i32>>, Error> {
    let today = get_local_date(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    get_history_periods(&connection, today.year()).map(Json)
}
