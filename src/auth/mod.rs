//! Signing in, signing out, and guarding the pages that need a signed in user.

mod cookie;
mod middleware;
mod password;
mod principal;
mod redirect;
mod sign_in;
mod sign_out;
mod sign_up;
mod token;
mod user;

pub use cookie::{
    COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie,
};
pub use middleware::{AuthState, auth_guard, auth_guard_hx};
pub use password::{PasswordHash, ValidatedPassword};
pub use principal::{CurrentUser, PrincipalState};
pub use sign_in::{get_sign_in_page, post_sign_in};
pub use sign_out::get_sign_out;
pub use sign_up::{get_sign_up_page, sign_up};
pub use user::{FirstName, User, UserID, create_user, create_user_table};
