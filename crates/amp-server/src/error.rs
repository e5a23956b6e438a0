use amp_core::error::AmpError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

// ---------------------------------------------------------------------------
// Internal sentinels for statuses the core enum doesn't carry
// ---------------------------------------------------------------------------

/// Private sentinel error type used to carry an explicit HTTP 403 through
/// the `anyhow::Error` chain without touching the `AmpError` enum.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct ForbiddenError(String);

/// Private sentinel error type used to carry an explicit HTTP 400 through
/// the `anyhow::Error` chain.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct BadRequestError(String);

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }

    /// Construct a 403 Forbidden error.
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self(ForbiddenError(msg.into()).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Check for explicit sentinel types before falling through to AmpError.
        if let Some(f) = self.0.downcast_ref::<ForbiddenError>() {
            let body = serde_json::json!({ "error": f.0.clone() });
            return (StatusCode::FORBIDDEN, axum::Json(body)).into_response();
        }
        if let Some(b) = self.0.downcast_ref::<BadRequestError>() {
            let body = serde_json::json!({ "error": b.0.clone() });
            return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
        }

        let status = if let Some(e) = self.0.downcast_ref::<AmpError>() {
            match e {
                AmpError::UserNotFound(_)
                | AmpError::InboxItemNotFound(_)
                | AmpError::AreaNotFound(_)
                | AmpError::ProjectNotFound(_)
                | AmpError::ActionNotFound(_)
                | AmpError::ReviewNotFound(_) => StatusCode::NOT_FOUND,
                AmpError::UserExists(_)
                | AmpError::AreaExists(_)
                | AmpError::ProjectExists(_)
                | AmpError::AlreadyTriaged(_) => StatusCode::CONFLICT,
                AmpError::InvalidSlug(_)
                | AmpError::InvalidStatus(_)
                | AmpError::InvalidPriority(_)
                | AmpError::InvalidCadence(_)
                | AmpError::InvalidReviewKey { .. } => StatusCode::BAD_REQUEST,
                AmpError::MalformedRecord { .. }
                | AmpError::HomeNotFound
                | AmpError::Io(_)
                | AmpError::Yaml(_)
                | AmpError::Json(_)
                | AmpError::TomlDe(_)
                | AmpError::TomlSer(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn inbox_item_not_found_maps_to_404() {
        let err = AppError(AmpError::InboxItemNotFound("abc".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn area_not_found_maps_to_404() {
        let err = AppError(AmpError::AreaNotFound("work".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn project_not_found_maps_to_404() {
        let err = AppError(AmpError::ProjectNotFound("work/launch".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn user_exists_maps_to_409() {
        let err = AppError(AmpError::UserExists("alice".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn already_triaged_maps_to_409() {
        let err = AppError(AmpError::AlreadyTriaged("abc".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn invalid_slug_maps_to_400() {
        let err = AppError(AmpError::InvalidSlug("BAD SLUG".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_priority_maps_to_400() {
        let err = AppError(AmpError::InvalidPriority("urgent".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_review_key_maps_to_400() {
        let err = AppError(
            AmpError::InvalidReviewKey {
                cadence: "daily".into(),
                key: "2026-W35".into(),
            }
            .into(),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn malformed_record_maps_to_500() {
        let err = AppError(
            AmpError::MalformedRecord {
                path: "users/a/inbox/x.md".into(),
                reason: "missing front-matter fence".into(),
            }
            .into(),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn io_error_maps_to_500() {
        let io_err = std::io::Error::other("disk full");
        let err = AppError(AmpError::Io(io_err).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn non_amp_error_maps_to_500() {
        let err = AppError(anyhow::anyhow!("something unexpected"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn forbidden_constructor_maps_to_403() {
        let err = AppError::forbidden("missing amp_user cookie");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn bad_request_constructor_maps_to_400() {
        let err = AppError::bad_request("ids must be a non-empty list");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn response_body_is_json_with_error_field() {
        let err = AppError(AmpError::AreaNotFound("work".into()).into());
        let response = err.into_response();
        let ct = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .expect("should have content-type");
        assert!(ct.to_str().unwrap().contains("application/json"));
    }
}
