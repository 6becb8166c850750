//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_sign_in_page, get_sign_out, get_sign_up_page,
        post_sign_in, sign_up,
    },
    currency::update_currency_endpoint,
    dashboard::{get_dashboard_page, get_index_page},
    endpoints,
    history::{get_history_data_endpoint, get_history_periods_endpoint},
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    transaction::create_transaction_endpoint,
    wizard::get_wizard_page,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    // The wizard decides for itself what visitors see, so it is not behind the auth guard.
    let unprotected_routes = Router::new()
        .route(endpoints::SIGN_IN_VIEW, get(get_sign_in_page))
        .route(endpoints::SIGN_IN_API, post(post_sign_in))
        .route(endpoints::SIGN_UP_VIEW, get(get_sign_up_page))
        .route(endpoints::USERS, post(sign_up))
        .route(endpoints::SIGN_OUT, get(get_sign_out))
        .route(endpoints::WIZARD_VIEW, get(get_wizard_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These routes are called by htmx and need the HX-Redirect header for auth redirects to work.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(
                endpoints::TRANSACTIONS_API,
                post(create_transaction_endpoint),
            )
            .route(endpoints::USER_CURRENCY, post(update_currency_endpoint))
            .route(endpoints::HISTORY_DATA, get(get_history_data_endpoint))
            .route(
                endpoints::HISTORY_PERIODS,
                get(get_history_periods_endpoint),
            )
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}
