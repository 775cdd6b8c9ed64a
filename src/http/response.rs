//! Response handling.
//!
//! # Responsibilities
//! - Turn a `HandlerAction` into an HTTP response
//! - Expand the `~/` application-root marker in redirect locations
//!
//! # Design Decisions
//! - 301 for permanent redirects, 302 for temporary ones (not 307/308)
//! - A location that is not a valid header value becomes a 500

use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::routing::HandlerAction;

/// Expand a leading `~/` in `location` against `base_path`.
pub fn resolve_app_path(location: &str, base_path: &str) -> String {
    match location.strip_prefix("~/") {
        Some(rest) => {
            let base = base_path.trim_end_matches('/');
            let base = if base.starts_with('/') || base.is_empty() {
                base.to_string()
            } else {
                format!("/{base}")
            };
            format!("{base}/{rest}")
        }
        None => location.to_string(),
    }
}

/// Build the HTTP response for `action`.
pub fn into_response(action: HandlerAction, base_path: &str) -> Response {
    let status = action.status();
    match action {
        HandlerAction::Redirect { location, .. } => {
            let location = resolve_app_path(&location, base_path);
            (status, [(header::LOCATION, location)]).into_response()
        }
        HandlerAction::Status(status) => status.into_response(),
        HandlerAction::Respond { status, body } => (status, body).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_resolve_app_path() {
        assert_eq!(resolve_app_path("~/items/5?debug=1", "/"), "/items/5?debug=1");
        assert_eq!(resolve_app_path("~/items/5", "/shop"), "/shop/items/5");
        assert_eq!(resolve_app_path("~/items/5", "/shop/"), "/shop/items/5");
        assert_eq!(resolve_app_path("~/items/5", "shop"), "/shop/items/5");
        assert_eq!(resolve_app_path("https://example.com/x", "/shop"), "https://example.com/x");
    }

    #[test]
    fn test_permanent_redirect_response() {
        let response = into_response(HandlerAction::redirect("~/items/5?debug=1", true), "/");
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[header::LOCATION], "/items/5?debug=1");
    }

    #[test]
    fn test_temporary_redirect_response() {
        let response = into_response(HandlerAction::redirect("~/items/5", false), "/app");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/app/items/5");
    }

    #[test]
    fn test_status_response() {
        let response = into_response(HandlerAction::not_found(), "/");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
