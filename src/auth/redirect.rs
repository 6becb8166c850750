//! Where to send a user after they sign in.

use axum::{extract::Request, http::Uri};
use tracing::{error, warn};

use crate::endpoints;

/// Only local paths are followed, and never back to the sign-in page.
fn is_safe_redirect_url(redirect_url: &str) -> bool {
    if !redirect_url.starts_with('/') || redirect_url.starts_with("//") {
        return false;
    }

    let path = redirect_url
        .split_once('?')
        .map_or(redirect_url, |(path, _)| path);

    path != endpoints::SIGN_IN_VIEW
}

/// Reduce `raw_url` to a safe local path and query, or `None` if it points elsewhere.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }
    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// htmx sends the full URL of the page, so the origin is dropped rather than rejected.
fn normalize_hx_current_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// Parse a redirect URL supplied by the client, logging anything that gets rejected.
pub fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    let redirect_url = raw_url.and_then(normalize_redirect_url);

    if let (None, Some(raw_url)) = (&redirect_url, raw_url) {
        warn!("Invalid redirect URL from {source}: {raw_url}");
    }

    redirect_url
}

/// Build the sign-in URL that brings the user back to the page they asked for.
///
/// Page requests come back to their own URI. Requests to `/api` come from
/// htmx, so they come back to the page given by the `HX-Current-URL` header.
pub fn build_sign_in_redirect_url(request: &Request) -> Option<String> {
    let redirect_target = if request.uri().path().starts_with("/api") {
        redirect_target_from_hx_request(request)?
    } else {
        normalize_redirect_url(request.uri().path_and_query()?.as_str())?
    };

    build_sign_in_redirect_url_from_target(&redirect_target)
}

pub fn build_sign_in_redirect_url_from_target(redirect_target: &str) -> Option<String> {
    match serde_urlencoded::to_string([("redirect_url", redirect_target)]) {
        Ok(param) => Some(format!("{}?{}", endpoints::SIGN_IN_VIEW, param)),
        Err(error) => {
            error!("Could not encode redirect URL {redirect_target}: {error}");
            None
        }
    }
}

fn redirect_target_from_hx_request(request: &Request) -> Option<String> {
    let headers = request.headers();
    let is_hx_request = headers
        .get("hx-request")
        .and_then(|header| header.to_str().ok())
        .is_some_and(|header| header.eq_ignore_ascii_case("true"));

    if !is_hx_request {
        warn!("Missing HX-Request header for /api request.");
        return None;
    }

    let Some(current_url) = headers
        .get("hx-current-url")
        .and_then(|header| header.to_str().ok())
    else {
        warn!("Missing HX-Current-URL header for /api request.");
        return None;
    };

    let redirect_url = normalize_hx_current_url(current_url);
    if redirect_url.is_none() {
        warn!("Invalid HX-Current-URL header value: {current_url}");
    }

    redirect_url
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, extract::Request};

    use crate::endpoints;

    use super::{build_sign_in_redirect_url, normalize_redirect_url, parse_redirect_url};

    #[test]
    fn accepts_local_paths() {
        assert_eq!(
            normalize_redirect_url("/dashboard?timeframe=year"),
            Some("/dashboard?timeframe=year".to_owned())
        );
    }

    #[test]
    fn rejects_other_origins() {
        assert_eq!(normalize_redirect_url("https://example.com/dashboard"), None);
        assert_eq!(normalize_redirect_url("//example.com/dashboard"), None);
        assert_eq!(normalize_redirect_url("dashboard"), None);
    }

    #[test]
    fn rejects_sign_in_page() {
        assert_eq!(normalize_redirect_url(endpoints::SIGN_IN_VIEW), None);
        assert_eq!(
            normalize_redirect_url(&format!("{}?redirect_url=%2F", endpoints::SIGN_IN_VIEW)),
            None
        );
    }

    #[test]
    fn parse_redirect_url_passes_through_missing_value() {
        assert_eq!(parse_redirect_url(None, "test"), None);
    }

    #[test]
    fn page_request_redirects_back_to_itself() {
        let request = Request::builder()
            .uri("/wizard")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            build_sign_in_redirect_url(&request),
            Some("/sign-in?redirect_url=%2Fwizard".to_owned())
        );
    }

    #[test]
    fn api_request_redirects_back_to_current_page() {
        let request = Request::builder()
            .uri("/api/history-data")
            .header("HX-Request", "true")
            .header("HX-Current-URL", "http://localhost:3000/dashboard")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            build_sign_in_redirect_url(&request),
            Some("/sign-in?redirect_url=%2Fdashboard".to_owned())
        );
    }

    #[test]
    fn api_request_without_htmx_has_no_target() {
        let request = Request::builder()
            .uri("/api/history-data")
            .body(Body::empty())
            .unwrap();

        assert_eq!(build_sign_in_redirect_url(&request), None);
    }
}
