use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

pub const USER_COOKIE: &str = "amp_user";

/// The user slug resolved from the `amp_user` cookie, injected into request
/// extensions by `auth_middleware`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

/// Request paths that never require the user cookie.
fn is_public(method: &axum::http::Method, path: &str) -> bool {
    if path == "/healthz" {
        return true;
    }
    // Sign-up must work before any cookie exists.
    path == "/api/users" && method == axum::http::Method::POST
}

/// Axum middleware resolving the current user from a plaintext cookie.
///
/// The cookie is a per-user scoping mechanism, not authentication: the value
/// is the bare user slug. The middleware still rejects malformed slugs and
/// slugs with no user directory behind them, so handlers can trust the value.
///
/// Flow:
/// 1. public path → passthrough
/// 2. no `amp_user` cookie → 403
/// 3. cookie fails slug validation or user dir missing → 403
/// 4. otherwise inject `CurrentUser` and continue
pub async fn auth_middleware(
    State(app): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    if is_public(req.method(), req.uri().path()) {
        return next.run(req).await;
    }

    let slug = req
        .headers()
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(extract_user_cookie);

    let Some(slug) = slug else {
        return forbidden("missing amp_user cookie");
    };

    if !amp_core::user::exists(&app.root, &slug) {
        return forbidden(&format!("unknown user '{slug}'"));
    }

    req.extensions_mut().insert(CurrentUser(slug));
    next.run(req).await
}

fn extract_user_cookie(cookies: &str) -> Option<String> {
    for part in cookies.split(';') {
        if let Some(val) = part.trim().strip_prefix("amp_user=") {
            if !val.is_empty() {
                return Some(val.to_string());
            }
        }
    }
    None
}

fn forbidden(msg: &str) -> Response {
    let body = serde_json::json!({ "error": msg }).to_string();
    Response::builder()
        .status(403)
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .expect("infallible: all header values are valid ASCII")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::{body::Body, http::Request, middleware, routing::get, routing::post, Router};
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn ok_handler() -> &'static str {
        "ok"
    }

    fn test_app(root: &std::path::Path) -> Router {
        let state = AppState::new(root.to_path_buf());
        Router::new()
            .route("/healthz", get(ok_handler))
            .route("/api/users", post(ok_handler))
            .route("/api/inbox", get(ok_handler))
            .layer(middleware::from_fn_with_state(state, auth_middleware))
    }

    #[tokio::test]
    async fn healthz_is_public() {
        let dir = TempDir::new().unwrap();
        let resp = test_app(dir.path())
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn signup_is_public() {
        let dir = TempDir::new().unwrap();
        let resp = test_app(dir.path())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/users")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_cookie_is_403() {
        let dir = TempDir::new().unwrap();
        let resp = test_app(dir.path())
            .oneshot(
                Request::builder()
                    .uri("/api/inbox")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let ct = resp.headers().get("content-type").unwrap().to_str().unwrap();
        assert!(ct.contains("application/json"));
    }

    #[tokio::test]
    async fn unknown_user_is_403() {
        let dir = TempDir::new().unwrap();
        let resp = test_app(dir.path())
            .oneshot(
                Request::builder()
                    .uri("/api/inbox")
                    .header("cookie", "amp_user=ghost")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn invalid_slug_is_403() {
        let dir = TempDir::new().unwrap();
        let resp = test_app(dir.path())
            .oneshot(
                Request::builder()
                    .uri("/api/inbox")
                    .header("cookie", "amp_user=../escape")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn known_user_passes_through() {
        let dir = TempDir::new().unwrap();
        amp_core::user::init(dir.path(), "alice").unwrap();
        let resp = test_app(dir.path())
            .oneshot(
                Request::builder()
                    .uri("/api/inbox")
                    .header("cookie", "session=xyz; amp_user=alice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn extract_user_cookie_variants() {
        assert_eq!(extract_user_cookie("amp_user=alice"), Some("alice".into()));
        assert_eq!(
            extract_user_cookie("a=1; amp_user=bob; c=3"),
            Some("bob".into())
        );
        assert_eq!(extract_user_cookie("amp_user="), None);
        assert_eq!(extract_user_cookie("other=1"), None);
    }
}
