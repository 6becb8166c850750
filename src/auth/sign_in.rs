//! The sign-in page and the endpoint that checks the password.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{
        invalidate_auth_cookie, redirect::parse_redirect_url, set_auth_cookie,
        user::get_account_owner,
    },
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, auth_card, base, link, loading_spinner, password_input},
    timezone::get_local_offset,
};

/// How long the auth cookie lasts if the user ticks "remember me".
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect password.";
const NO_ACCOUNT_ERROR_MSG: &str = "No account yet, sign up to create one.";
const INTERNAL_ERROR_MSG: &str = "An internal error occurred. Please try again later.";

fn sign_in_form(error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::SIGN_IN_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (password_input("", 0, error_message))

            div class="flex items-center gap-x-3"
            {
                input
                    type="checkbox"
                    name="remember_me"
                    id="remember_me"
                    class="rounded-xs";

                label
                    for="remember_me"
                    class="block text-sm font-medium text-gray-900 dark:text-white"
                {
                    "Keep me signed in for one week"
                }
            }

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (loading_spinner()) }
                "Sign in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Don't have an account? "
                (link(endpoints::SIGN_UP_VIEW, "Sign up here"))
            }
        }
    }
}

/// Query parameters naming the page to return to after signing in.
#[derive(Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

/// Display the sign-in page.
pub async fn get_sign_in_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "sign-in query");
    let form = sign_in_form(None, redirect_url.as_deref());
    let content = auth_card("Sign in to your account", &form);

    base("Sign In", &[], &content).into_response()
}

/// The state needed to sign in.
#[derive(Debug, Clone)]
pub struct SignInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SignInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<SignInState> for Key {
    fn from_ref(state: &SignInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the sign-in form.
#[derive(Clone, Serialize, Deserialize)]
pub struct SignInData {
    /// Compared against the stored hash, so it is not validated here.
    pub password: String,

    /// Comes from a checkbox: any value means "remember me", a missing value means don't.
    pub remember_me: Option<String>,

    /// The page to go to after signing in.
    pub redirect_url: Option<String>,
}

/// Handler for sign-in requests via the POST method.
///
/// On success the auth cookie is set and the client is redirected to the
/// requested page, or the home page. Otherwise the form is sent back with an
/// error message explaining the problem.
pub async fn post_sign_in(
    State(state): State<SignInState>,
    jar: PrivateCookieJar,
    Form(form): Form<SignInData>,
) -> Response {
    let redirect_url = parse_redirect_url(form.redirect_url.as_deref(), "sign-in form");
    let redirect_url = redirect_url.as_deref();

    let owner = match state.db_connection.lock() {
        Ok(connection) => get_account_owner(&connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };
    let user = match owner {
        Ok(user) => user,
        Err(Error::NotFound) => {
            return sign_in_form(Some(NO_ACCOUNT_ERROR_MSG), redirect_url).into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return sign_in_form(Some(INTERNAL_ERROR_MSG), redirect_url).into_response();
        }
    };

    match user.password_hash.verify(&form.password) {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!("Rejected sign in with an incorrect password");
            return sign_in_form(Some(INVALID_CREDENTIALS_ERROR_MSG), redirect_url)
                .into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return sign_in_form(Some(INTERNAL_ERROR_MSG), redirect_url).into_response();
        }
    }

    let cookie_duration = if form.remember_me.is_some() {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    let redirect_url = redirect_url.unwrap_or(endpoints::ROOT);

    match set_auth_cookie(jar.clone(), user.id, cookie_duration, local_offset) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(redirect_url.to_owned()),
            jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
                .into_response()
        }
    }
}


#[cfg(test)]
mod post_sign_in_tests {
    use axum::{
        Form,
        extract::{FromRef, State},
        http::StatusCode,
    };
    use axum_extra::extract::PrivateCookieJar;
    use time::{Duration, OffsetDateTime};

    use crate::{
        AppState,
        auth::{COOKIE_TOKEN, DEFAULT_COOKIE_DURATION},
        endpoints,
        test_utils::{
            TEST_PASSWORD, assert_form_error_message, assert_hx_redirect, get_test_app_state,
            insert_test_user, must_get_form, parse_html_fragment,
        },
    };

    use super::{
        INVALID_CREDENTIALS_ERROR_MSG, NO_ACCOUNT_ERROR_MSG, SignInData, SignInState,
        post_sign_in,
    };

    fn sign_in_data(password: &str) -> SignInData {
        SignInData {
            password: password.to_owned(),
            remember_me: None,
            redirect_url: None,
        }
    }

    async fn sign_in(state: &AppState, data: SignInData) -> axum::response::Response {
        let state = SignInState::from_ref(state);
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        post_sign_in(State(state), jar, Form(data)).await
    }

    #[track_caller]
    fn token_expiry(response: &axum::response::Response) -> OffsetDateTime {
        let set_cookie = response
            .headers()
            .get_all("set-cookie")
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| value.starts_with(COOKIE_TOKEN))
            .expect("No token cookie set");
        let cookie = axum_extra::extract::cookie::Cookie::parse(set_cookie.to_owned())
            .expect("Could not parse cookie");

        cookie.expires_datetime().expect("Cookie has no expiry")
    }

    #[tokio::test]
    async fn sign_in_succeeds_with_valid_credentials() {
        let state = get_test_app_state();
        insert_test_user(&state);

        let response = sign_in(&state, sign_in_data(TEST_PASSWORD)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::ROOT);
        let expiry = token_expiry(&response);
        assert!(
            (expiry - (OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION)).abs()
                < Duration::seconds(1)
        );
    }

    #[tokio::test]
    async fn sign_in_redirects_to_requested_url() {
        let state = get_test_app_state();
        insert_test_user(&state);
        let mut data = sign_in_data(TEST_PASSWORD);
        data.redirect_url = Some(endpoints::WIZARD_VIEW.to_owned());

        let response = sign_in(&state, data).await;

        assert_hx_redirect(&response, endpoints::WIZARD_VIEW);
    }

    #[tokio::test]
    async fn remember_me_extends_auth_cookie() {
        let state = get_test_app_state();
        insert_test_user(&state);
        let mut data = sign_in_data(TEST_PASSWORD);
        data.remember_me = Some("on".to_owned());

        let response = sign_in(&state, data).await;

        let expiry = token_expiry(&response);
        assert!(
            (expiry - (OffsetDateTime::now_utc() + Duration::days(7))).abs()
                < Duration::seconds(1)
        );
    }

    #[tokio::test]
    async fn sign_in_fails_with_incorrect_password() {
        let state = get_test_app_state();
        insert_test_user(&state);

        let response = sign_in(&state, sign_in_data("thewrongpassword")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let fragment = parse_html_fragment(response).await;
        let form = must_get_form(&fragment);
        assert_form_error_message(&form, INVALID_CREDENTIALS_ERROR_MSG);
    }

    #[tokio::test]
    async fn sign_in_fails_without_account() {
        let state = get_test_app_state();

        let response = sign_in(&state, sign_in_data(TEST_PASSWORD)).await;

        let fragment = parse_html_fragment(response).await;
        let form = must_get_form(&fragment);
        assert_form_error_message(&form, NO_ACCOUNT_ERROR_MSG);
    }

    #[test]
    fn form_deserialises_without_remember_me() {
        let data: SignInData = serde_html_form::from_str("password=hunter2").unwrap();

        assert_eq!(data.password, "hunter2");
        assert!(data.remember_me.is_none());
        assert!(data.redirect_url.is_none());
    }
}
