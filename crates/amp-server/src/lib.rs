pub mod auth;
pub mod cache;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};

async fn healthz() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "ok": true }))
}

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf) -> Router {
    let app_state = state::AppState::new(root);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(healthz))
        // Users
        .route("/api/users", post(routes::users::create_user))
        // Overview
        .route("/api/overview", get(routes::overview::get_overview))
        // Inbox
        .route("/api/inbox", get(routes::inbox::list_items))
        .route("/api/inbox", post(routes::inbox::capture_item))
        .route("/api/inbox/bulk-delete", post(routes::inbox::bulk_delete))
        .route("/api/inbox/{id}", get(routes::inbox::get_item))
        .route("/api/inbox/{id}", patch(routes::inbox::update_item))
        .route("/api/inbox/{id}", delete(routes::inbox::delete_item))
        .route("/api/inbox/{id}/triage", post(routes::inbox::triage_item))
        // Areas
        .route("/api/areas", get(routes::areas::list_areas))
        .route("/api/areas", post(routes::areas::create_area))
        .route("/api/areas/{area}", get(routes::areas::get_area))
        .route("/api/areas/{area}", patch(routes::areas::update_area))
        .route("/api/areas/{area}", delete(routes::areas::delete_area))
        // Projects
        .route(
            "/api/areas/{area}/projects",
            get(routes::projects::list_projects),
        )
        .route(
            "/api/areas/{area}/projects",
            post(routes::projects::create_project),
        )
        .route(
            "/api/areas/{area}/projects/{project}",
            get(routes::projects::get_project),
        )
        .route(
            "/api/areas/{area}/projects/{project}",
            patch(routes::projects::update_project),
        )
        .route(
            "/api/areas/{area}/projects/{project}",
            delete(routes::projects::delete_project),
        )
        // Actions
        .route(
            "/api/areas/{area}/projects/{project}/actions",
            get(routes::actions::list_actions),
        )
        .route(
            "/api/areas/{area}/projects/{project}/actions",
            post(routes::actions::create_action),
        )
        .route(
            "/api/areas/{area}/projects/{project}/actions/{id}",
            get(routes::actions::get_action),
        )
        .route(
            "/api/areas/{area}/projects/{project}/actions/{id}",
            patch(routes::actions::update_action),
        )
        .route(
            "/api/areas/{area}/projects/{project}/actions/{id}",
            delete(routes::actions::delete_action),
        )
        .route(
            "/api/areas/{area}/projects/{project}/actions/{id}/complete",
            post(routes::actions::complete_action),
        )
        .route(
            "/api/areas/{area}/projects/{project}/actions/{id}/reopen",
            post(routes::actions::reopen_action),
        )
        // Reviews
        .route(
            "/api/reviews/{cadence}",
            get(routes::reviews::list_reviews),
        )
        .route("/api/reviews/{cadence}", post(routes::reviews::open_today))
        .route(
            "/api/reviews/{cadence}/{key}",
            get(routes::reviews::get_review),
        )
        .route(
            "/api/reviews/{cadence}/{key}",
            put(routes::reviews::update_review),
        )
        // Settings
        .route("/api/settings", get(routes::settings::get_settings))
        .route("/api/settings", put(routes::settings::update_settings))
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            auth::auth_middleware,
        ))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Start the HTTP server.
pub async fn serve(root: PathBuf, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(root, listener, open_browser).await
}

/// Start the HTTP server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root);

    tracing::info!("amp server listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
