// Inbox handlers - contact form and newsletter

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    api::extract::{PathParam, Payload, QueryParams, RequestLanguage},
    app_state::AppState,
    core::Language,
    error::AppResult,
    services::{ContactMessage, ContactSubmission, Subscriber},
};

#[derive(Debug, Default, Deserialize)]
pub struct ContactListQuery {
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
    pub language: Option<Language>,
}

// HTTP Handlers

pub async fn submit_contact_handler(
    State(state): State<AppState>,
    Payload(submission): Payload<ContactSubmission>,
) -> AppResult<impl IntoResponse> {
    let message = state.inbox().submit(submission).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn list_contact_handler(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ContactListQuery>,
) -> AppResult<Json<Vec<ContactMessage>>> {
    Ok(Json(state.inbox().list_messages(params.unread_only).await?))
}

pub async fn mark_read_handler(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<StatusCode> {
    state.inbox().mark_read(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_contact_handler(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<StatusCode> {
    state.inbox().delete_message(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Explicit `language` in the body wins over the request language
pub async fn subscribe_handler(
    State(state): State<AppState>,
    RequestLanguage(request_language): RequestLanguage,
    Payload(req): Payload<SubscribeRequest>,
) -> AppResult<impl IntoResponse> {
    let language = req.language.unwrap_or(request_language);
    let (subscriber, outcome) = state.inbox().subscribe(&req.email, language).await?;

    let status = if outcome.is_new() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(json!({
            "subscriber": subscriber,
            "outcome": outcome,
        })),
    ))
}

pub async fn list_subscribers_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Subscriber>>> {
    Ok(Json(state.inbox().list_active().await?))
}

pub async fn unsubscribe_handler(
    State(state): State<AppState>,
    PathParam(email): PathParam<String>,
) -> AppResult<Json<Value>> {
    let unsubscribed = state.inbox().unsubscribe(&email).await?;
    Ok(Json(json!({ "unsubscribed": unsubscribed })))
}

pub fn inbox_routes() -> Router<AppState> {
    Router::new()
        .route("/contact", post(submit_contact_handler).get(list_contact_handler))
        .route("/contact/{id}", delete(delete_contact_handler))
        .route("/contact/{id}/read", post(mark_read_handler))
        .route("/newsletter", post(subscribe_handler).get(list_subscribers_handler))
        .route("/newsletter/{email}", delete(unsubscribe_handler))
}
