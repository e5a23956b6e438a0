use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use std::str::FromStr;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;
use amp_core::review::Review;
use amp_core::types::ReviewCadence;

fn review_json(review: &Review) -> serde_json::Value {
    serde_json::json!({
        "cadence": review.cadence,
        "key": review.key,
        "created_at": review.created_at,
        "updated_at": review.updated_at,
        "body": review.body,
    })
}

/// GET /api/reviews/:cadence — entries for one cadence, newest first.
pub async fn list_reviews(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(cadence): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let cadence = ReviewCadence::from_str(&cadence)?;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let reviews = Review::list(&root, &user.0, cadence)?;
        let list: Vec<serde_json::Value> = reviews.iter().map(review_json).collect();
        Ok::<_, amp_core::AmpError>(serde_json::json!(list))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/reviews/:cadence — open (or create) today's entry.
///
/// "Today" is evaluated in UTC. 201 when the entry was created, 200 when it
/// already existed.
pub async fn open_today(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(cadence): Path<String>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let cadence = ReviewCadence::from_str(&cadence)?;
    let root = app.root.clone();
    let (result, created) = tokio::task::spawn_blocking(move || {
        let today = chrono::Utc::now().date_naive();
        let (review, created) = Review::open_or_create(&root, &user.0, cadence, today)?;
        Ok::<_, amp_core::AmpError>((review_json(&review), created))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(result)))
}

/// GET /api/reviews/:cadence/:key
pub async fn get_review(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((cadence, key)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let cadence = ReviewCadence::from_str(&cadence)?;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let review = Review::load(&root, &user.0, cadence, &key)?;
        Ok::<_, amp_core::AmpError>(review_json(&review))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct UpdateReviewBody {
    pub body: String,
}

/// PUT /api/reviews/:cadence/:key — replace the journal body.
pub async fn update_review(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((cadence, key)): Path<(String, String)>,
    Json(body): Json<UpdateReviewBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let cadence = ReviewCadence::from_str(&cadence)?;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut review = Review::load(&root, &user.0, cadence, &key)?;
        review.set_body(body.body);
        review.save(&root, &user.0)?;
        Ok::<_, amp_core::AmpError>(review_json(&review))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
