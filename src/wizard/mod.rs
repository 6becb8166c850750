//! The onboarding page where a new user picks their default currency.
//!
//! The page is not behind the auth middleware. Instead [gate] decides whether
//! the visitor is sent to the sign-in page or shown the wizard.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{CurrentUser, User},
    currency::{Currency, currency_select, get_or_create_user_settings},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, CARD_STYLE, base, logo},
};

/// What to do with a request for the wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    /// Navigate to this location instead, without rendering anything.
    Redirect(&'static str),
    /// Show the wizard to this user.
    Render(User),
}

/// Only signed in users may see the wizard, everyone else must sign in first.
pub fn gate(principal: Option<User>) -> GateOutcome {
    match principal {
        Some(user) => GateOutcome::Render(user),
        None => GateOutcome::Redirect(endpoints::SIGN_IN_VIEW),
    }
}

/// The state needed to show the wizard.
#[derive(Debug, Clone)]
pub struct WizardState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for WizardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the wizard, or redirect visitors to the sign-in page.
pub async fn get_wizard_page(
    State(state): State<WizardState>,
    CurrentUser(principal): CurrentUser,
) -> Result<Response, Error> {
    let user = match gate(principal) {
        GateOutcome::Redirect(location) => {
            return Ok(Redirect::to(location).into_response());
        }
        GateOutcome::Render(user) => user,
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let settings = get_or_create_user_settings(user.id, &connection)?;

    Ok(wizard_view(&user, settings.currency).into_response())
}

fn wizard_view(user: &User, currency: Currency) -> Markup {
    let content = html! {
        div class="flex flex-col max-w-2xl mx-auto items-center justify-between gap-4 px-6 py-8
            text-gray-900 dark:text-white"
        {
            div
            {
                h1 class="text-center text-3xl"
                {
                    "Welcome, "
                    span class="ml-2 font-bold" { (user.first_name) "! 👋🏻" }
                }

                h2 class="text-center mt-4 text-base text-gray-500 dark:text-gray-400"
                {
                    "Let's get started by setting up your currency"
                }

                h3 class="mt-2 text-center text-sm text-gray-500 dark:text-gray-400"
                {
                    "You can change these settings at any time"
                }
            }

            hr class="w-full border-gray-200 dark:border-gray-700";

            section id="currency-card" class=(CARD_STYLE)
            {
                h4 class="text-xl font-bold" { "Currency" }
                p class="mb-4 text-sm text-gray-500 dark:text-gray-400"
                {
                    "Set your default currency for transactions"
                }

                (currency_select(currency))
            }

            hr class="w-full border-gray-200 dark:border-gray-700";

            a href=(endpoints::ROOT) class={ "block text-center " (BUTTON_PRIMARY_STYLE) }
            {
                "I'm done! Take me to the dashboard"
            }

            div class="mt-8" { (logo()) }
        }
    };

    base("Welcome", &[], &content)
}

#[cfg(test)]
mod gate_tests {
    use crate::{
        auth::{FirstName, PasswordHash, User, UserID},
        endpoints,
    };

    use super::{GateOutcome, gate};

    #[test]
    fn no_principal_redirects_to_sign_in() {
        assert_eq!(gate(None), GateOutcome::Redirect(endpoints::SIGN_IN_VIEW));
    }

    #[test]
    fn principal_is_rendered() {
        let user = User {
            id: UserID::new(1),
            first_name: FirstName::new("Ana").unwrap(),
            password_hash: PasswordHash::new_unchecked("hunter2"),
        };

        assert_eq!(gate(Some(user.clone())), GateOutcome::Render(user));
    }
}

#[cfg(test)]
mod page_tests {
    use axum::{extract::State, http::StatusCode};
    use scraper::Selector;

    use crate::{
        AppState,
        auth::CurrentUser,
        currency::{Currency, get_user_settings, set_user_currency},
        endpoints,
        test_utils::{
            assert_redirect, assert_valid_html, get_test_app_state, insert_test_user,
            parse_html_document, select_text,
        },
    };

    use super::{WizardState, get_wizard_page};

    fn wizard_state(state: &AppState) -> WizardState {
        WizardState {
            db_connection: state.db_connection.clone(),
        }
    }

    #[tokio::test]
    async fn visitor_is_redirected_without_content() {
        let state = get_test_app_state();

        let response = get_wizard_page(State(wizard_state(&state)), CurrentUser(None))
            .await
            .unwrap();

        assert_redirect(&response, endpoints::SIGN_IN_VIEW);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn greets_user_by_first_name() {
        let state = get_test_app_state();
        let user = insert_test_user(&state);

        let response = get_wizard_page(State(wizard_state(&state)), CurrentUser(Some(user)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(select_text(&html, "h1"), ["Welcome, Ana! 👋🏻"]);
        assert_eq!(
            select_text(&html, "h2"),
            ["Let's get started by setting up your currency"]
        );
        assert_eq!(
            select_text(&html, "h3"),
            ["You can change these settings at any time"]
        );
    }

    #[tokio::test]
    async fn embeds_currency_select_and_dashboard_link() {
        let state = get_test_app_state();
        let user = insert_test_user(&state);

        let response = get_wizard_page(State(wizard_state(&state)), CurrentUser(Some(user)))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(
            select_text(&html, "#currency-card p"),
            ["Set your default currency for transactions"]
        );
        assert_eq!(
            html.select(&Selector::parse("#currency-card select[name=currency]").unwrap())
                .count(),
            1
        );
        let link = html
            .select(&Selector::parse("a.block").unwrap())
            .next()
            .expect("Could not find dashboard link");
        assert_eq!(link.value().attr("href"), Some(endpoints::ROOT));
        assert_eq!(
            link.text().collect::<String>().trim(),
            "I'm done! Take me to the dashboard"
        );
    }

    #[tokio::test]
    async fn stores_default_currency_on_first_visit() {
        let state = get_test_app_state();
        let user = insert_test_user(&state);
        let user_id = user.id;

        get_wizard_page(State(wizard_state(&state)), CurrentUser(Some(user)))
            .await
            .unwrap();

        let settings = get_user_settings(user_id, &state.db_connection.lock().unwrap())
            .unwrap()
            .expect("Settings should have been created");
        assert_eq!(settings.currency, Currency::USD);
    }

    #[tokio::test]
    async fn selects_stored_currency() {
        let state = get_test_app_state();
        let user = insert_test_user(&state);
        set_user_currency(user.id, Currency::JPY, &state.db_connection.lock().unwrap()).unwrap();

        let response = get_wizard_page(State(wizard_state(&state)), CurrentUser(Some(user)))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(
            select_text(&html, "select[name=currency] option[selected]"),
            ["¥ Yen"]
        );
    }
}
