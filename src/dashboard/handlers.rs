//! Dashboard HTTP handlers and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    auth::UserID,
    currency::{CurrencyFormatter, get_user_settings},
    dashboard::{
        period_selector::period_selector,
        totals::{PeriodTotals, totals_view},
    },
    endpoints,
    history::{
        HistoryPeriod, HistoryQuery, HistoryRecord, get_history_data, get_history_periods,
        history_chart_script, history_chart_view,
    },
    html::{HeadElement, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    timezone::get_local_date,
    transaction::{count_transactions, new_transaction_form},
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions and settings.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The root page only forwards to the dashboard.
pub async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

/// Display the history chart and totals of the requested period.
///
/// Users that have not picked a currency yet are sent to the wizard first.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<HistoryQuery>,
) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let Some(settings) = get_user_settings(user_id, &connection)? else {
        tracing::debug!("User {user_id} has no settings, redirecting to the wizard");
        return Ok(Redirect::to(endpoints::WIZARD_VIEW).into_response());
    };

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    if count_transactions(&connection)? == 0 {
        return Ok(dashboard_no_data_view(nav_bar, today).into_response());
    }

    let period = HistoryPeriod::resolve(query, today)?;
    let records = get_history_data(period.timeframe, period.year, period.month, &connection)?;
    let years = get_history_periods(&connection, today.year())?;
    let formatter = CurrencyFormatter::new(settings.currency)?;

    let data = DashboardData {
        period,
        years,
        records,
        today,
    };

    Ok(dashboard_view(nav_bar, &data, &formatter)?.into_response())
}

/// Everything shown on the dashboard for one period.
struct DashboardData {
    period: HistoryPeriod,
    years: Vec<i32>,
    records: Vec<HistoryRecord>,
    today: Date,
}

fn dashboard_no_data_view(nav_bar: NavBar, today: Date) -> Markup {
    let content = html!(
        (nav_bar.into_html())

        div class={ (PAGE_CONTAINER_STYLE) " max-w-screen-md" }
        {
            h2 class="text-xl font-bold" { "Nothing here yet..." }

            p class="mb-4"
            {
                "The chart will show up here once you add some income or expenses."
            }

            (new_transaction_form(today))
        }
    );

    base("Dashboard", &[], &content)
}

fn dashboard_view(
    nav_bar: NavBar,
    data: &DashboardData,
    formatter: &CurrencyFormatter,
) -> Result<Markup, Error> {
    let totals = PeriodTotals::from_records(&data.records);

    let content = html!(
        (nav_bar.into_html())

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            h2 class="w-full text-xl font-bold mb-4" { (data.period.title()) }

            (period_selector(&data.period, &data.years))
            (totals_view(totals, formatter))
            (history_chart_view())

            div class="w-full max-w-screen-md"
            {
                (new_transaction_form(data.today))
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        history_chart_script(&data.records, data.period.timeframe, formatter)?,
    ];

    Ok(base("Dashboard", &scripts, &content))
}
