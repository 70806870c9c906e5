// Content handlers - one generic set of CRUD routes per content kind

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::{
    api::extract::{PathParam, Payload, QueryParams, RequestLanguage},
    app_state::AppState,
    content::{ContentKind, CreateRequest, OutwardRecord, UpdateRequest},
    core::EntityId,
    error::AppResult,
    infrastructure::ListFilter,
};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub published: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<ListQuery> for ListFilter {
    fn from(q: ListQuery) -> Self {
        ListFilter {
            published: q.published,
            limit: q.limit,
            offset: q.offset,
        }
    }
}

// HTTP Handlers

pub async fn list_handler<K: ContentKind>(
    State(state): State<AppState>,
    RequestLanguage(language): RequestLanguage,
    QueryParams(params): QueryParams<ListQuery>,
) -> AppResult<Json<Vec<OutwardRecord<K>>>> {
    let records = state
        .content::<K>()
        .list_localized(&params.into(), language)
        .await?;
    Ok(Json(records))
}

pub async fn get_handler<K: ContentKind>(
    State(state): State<AppState>,
    RequestLanguage(language): RequestLanguage,
    PathParam(id): PathParam<String>,
) -> AppResult<Json<OutwardRecord<K>>> {
    let record = state
        .content::<K>()
        .get_localized(id.parse::<EntityId>()?, language)
        .await?;
    Ok(Json(record))
}

pub async fn get_by_slug_handler<K: ContentKind>(
    State(state): State<AppState>,
    RequestLanguage(language): RequestLanguage,
    PathParam(slug): PathParam<String>,
) -> AppResult<Json<OutwardRecord<K>>> {
    let record = state
        .content::<K>()
        .get_localized_by_slug(&slug, language)
        .await?;
    Ok(Json(record))
}

pub async fn create_handler<K: ContentKind>(
    State(state): State<AppState>,
    RequestLanguage(language): RequestLanguage,
    Payload(req): Payload<CreateRequest<K>>,
) -> AppResult<impl IntoResponse> {
    let service = state.content::<K>();
    let item = service.create(req.fields, req.translations).await?;
    let record = item.localize(language, service.default_language());
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_handler<K: ContentKind>(
    State(state): State<AppState>,
    RequestLanguage(language): RequestLanguage,
    PathParam(id): PathParam<String>,
    Payload(req): Payload<UpdateRequest<K>>,
) -> AppResult<Json<OutwardRecord<K>>> {
    let service = state.content::<K>();
    let item = service
        .update(id.parse::<EntityId>()?, req.fields, req.translation, req.translations)
        .await?;
    Ok(Json(item.localize(language, service.default_language())))
}

pub async fn delete_handler<K: ContentKind>(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
) -> AppResult<StatusCode> {
    state.content::<K>().delete(id.parse::<EntityId>()?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Routes for one kind, to be nested under its collection path
pub fn content_routes<K: ContentKind>() -> Router<AppState> {
    Router::new()
        .route("/", get(list_handler::<K>).post(create_handler::<K>))
        .route(
            "/{id}",
            get(get_handler::<K>)
                .put(update_handler::<K>)
                .delete(delete_handler::<K>),
        )
        .route("/slug/{slug}", get(get_by_slug_handler::<K>))
}
