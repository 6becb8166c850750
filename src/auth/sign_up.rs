//! The sign-up page for creating the account that owns this instance.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
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
        FirstName, PasswordHash, ValidatedPassword, create_user, set_auth_cookie,
        user::count_users,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, auth_card, base, link,
        loading_spinner, password_input,
    },
    internal_server_error::get_internal_server_error_redirect,
    timezone::get_local_offset,
};

/// Client side hint only, zxcvbn has the final say.
const PASSWORD_INPUT_MIN_LENGTH: u8 = 14;

const ACCOUNT_EXISTS_ERROR_MSG: &str =
    "An account has already been created, please sign in with your existing password.";
const PASSWORD_MISMATCH_ERROR_MSG: &str = "Passwords do not match";

/// Error messages shown next to the matching sign-up form field.
#[derive(Default)]
struct SignUpErrors<'a> {
    first_name: Option<&'a str>,
    password: Option<&'a str>,
    confirm_password: Option<&'a str>,
}

fn first_name_input(first_name: &str, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label for="first-name" class=(FORM_LABEL_STYLE) { "First name" }

            input
                type="text"
                name="first_name"
                id="first-name"
                placeholder="Ana"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                value=(first_name);

            @if let Some(error_message) = error_message {
                p class="text-red-500 text-base" { (error_message) }
            }
        }
    }
}

fn confirm_password_input(error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label for="confirm-password" class=(FORM_LABEL_STYLE) { "Confirm Password" }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                minlength=(PASSWORD_INPUT_MIN_LENGTH)
                autofocus[error_message.is_some()];

            @if let Some(error_message) = error_message {
                p class="text-red-500 text-base" { (error_message) }
            }
        }
    }
}

fn sign_up_form(first_name: &str, password: &str, errors: SignUpErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            (first_name_input(first_name, errors.first_name))
            (password_input(password, PASSWORD_INPUT_MIN_LENGTH, errors.password))
            (confirm_password_input(errors.confirm_password))

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (loading_spinner()) }
                "Create account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                (link(endpoints::SIGN_IN_VIEW, "Sign in here"))
            }
        }
    }
}

/// Display the sign-up page.
pub async fn get_sign_up_page() -> Response {
    let form = sign_up_form("", "", SignUpErrors::default());
    let content = auth_card("Create your account", &form);

    base("Sign Up", &[], &content).into_response()
}

/// The state needed for creating the account.
#[derive(Debug, Clone)]
pub struct SignUpState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SignUpState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<SignUpState> for Key {
    fn from_ref(state: &SignUpState) -> Self {
        state.cookie_key.clone()
    }
}

#[derive(Serialize, Deserialize)]
pub struct SignUpForm {
    pub first_name: String,
    pub password: String,
    pub confirm_password: String,
}

/// Create the account, sign it in and send the new user to the onboarding wizard.
pub async fn sign_up(
    State(state): State<SignUpState>,
    jar: PrivateCookieJar,
    Form(form): Form<SignUpForm>,
) -> Response {
    let Ok(connection) = state.db_connection.lock() else {
        tracing::error!("could not acquire database lock");
        return get_internal_server_error_redirect();
    };

    match count_users(&connection) {
        Ok(0) => {}
        Ok(_) => {
            tracing::warn!("Rejected sign up because an account already exists");
            return sign_up_form(
                &form.first_name,
                "",
                SignUpErrors {
                    confirm_password: Some(ACCOUNT_EXISTS_ERROR_MSG),
                    ..Default::default()
                },
            )
            .into_response();
        }
        Err(error) => {
            tracing::error!("Could not count users: {error}");
            return get_internal_server_error_redirect();
        }
    }

    let first_name = match FirstName::new(&form.first_name) {
        Ok(first_name) => first_name,
        Err(error) => {
            let message = error.to_string();
            return sign_up_form(
                &form.first_name,
                &form.password,
                SignUpErrors {
                    first_name: Some(&message),
                    ..Default::default()
                },
            )
            .into_response();
        }
    };

    let validated_password = match ValidatedPassword::new(&form.password) {
        Ok(password) => password,
        Err(error) => {
            let message = error.to_string();
            return sign_up_form(
                &form.first_name,
                &form.password,
                SignUpErrors {
                    password: Some(&message),
                    ..Default::default()
                },
            )
            .into_response();
        }
    };

    if form.password != form.confirm_password {
        return sign_up_form(
            &form.first_name,
            &form.password,
            SignUpErrors {
                confirm_password: Some(PASSWORD_MISMATCH_ERROR_MSG),
                ..Default::default()
            },
        )
        .into_response();
    }

    let password_hash = match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("an error occurred while hashing a password: {error}");
            return get_internal_server_error_redirect();
        }
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    let user = match create_user(first_name, password_hash, &connection) {
        Ok(user) => user,
        Err(error) => {
            tracing::error!("An unhandled error occurred while inserting a new user: {error}");
            return get_internal_server_error_redirect();
        }
    };
    tracing::info!("Created account for user {}", user.id);

    match set_auth_cookie(jar, user.id, state.cookie_duration, local_offset) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::WIZARD_VIEW.to_owned()),
            jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An error occurred while setting the auth cookie: {error}");
            get_internal_server_error_redirect()
        }
    }
}
