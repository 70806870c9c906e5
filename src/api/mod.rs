// HTTP surface - axum routers for content, inbox and health
pub mod content;
pub mod extract;
pub mod inbox;

use axum::{extract::State, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    app_state::AppState,
    content::{Announcement, Event, Lawyer, Publication},
    error::AppResult,
};

pub use content::content_routes;
pub use extract::{PathParam, Payload, QueryParams, RequestLanguage};
pub use inbox::inbox_routes;

pub async fn health_handler(State(state): State<AppState>) -> AppResult<Json<Value>> {
    state.db.health_check().await?;
    let (idle, total) = state.db.pool_stats();
    Ok(Json(json!({
        "status": "healthy",
        "database": {
            "idle_connections": idle,
            "total_connections": total,
        },
    })))
}

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/lawyers", content_routes::<Lawyer>())
        .nest("/announcements", content_routes::<Announcement>())
        .nest("/events", content_routes::<Event>())
        .nest("/publications", content_routes::<Publication>())
        .merge(inbox_routes())
}

// Create unified router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
