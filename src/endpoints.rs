//! The API endpoints URIs.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page for signed in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The onboarding page for picking the default currency.
pub const WIZARD_VIEW: &str = "/wizard";
/// The route for getting the sign-in page.
pub const SIGN_IN_VIEW: &str = "/sign-in";
/// The route for getting the sign-up page.
pub const SIGN_UP_VIEW: &str = "/sign-up";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for signing in a user.
pub const SIGN_IN_API: &str = "/api/sign-in";
/// The route for the client to sign out the current user.
pub const SIGN_OUT: &str = "/api/sign-out";
/// The route to create the user account.
pub const USERS: &str = "/api/users";
/// The route to update the signed in user's currency.
pub const USER_CURRENCY: &str = "/api/settings/currency";
/// The route to create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to get the income and expenses of a period as JSON.
pub const HISTORY_DATA: &str = "/api/history-data";
/// The route to get the years that have transactions as JSON.
pub const HISTORY_PERIODS: &str = "/api/history-periods";
