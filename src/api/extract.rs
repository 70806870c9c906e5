// Request extractors - request language, path, query and JSON bodies with AppError rejections

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{header::ACCEPT_LANGUAGE, request::Parts},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};

use crate::app_state::AppState;
use crate::core::Language;
use crate::error::AppError;

#[derive(Deserialize)]
struct LanguageQuery {
    language: Option<String>,
}

/// Language a request asks for.
///
/// `?language=` wins, then the first supported `Accept-Language` tag, then the
/// configured default. An unsupported explicit `?language=` is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLanguage(pub Language);

impl RequestLanguage {
    pub fn from_parts(parts: &Parts, default: Language) -> Result<Self, AppError> {
        let query = Query::<LanguageQuery>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::Validation(e.body_text()))?;

        if let Some(raw) = query.0.language.filter(|l| !l.trim().is_empty()) {
            return Ok(Self(raw.parse()?));
        }

        let from_header = parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .and_then(Language::from_accept_language);

        Ok(Self(from_header.unwrap_or(default)))
    }
}

impl FromRequestParts<AppState> for RequestLanguage {
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let language = Self::from_parts(parts, state.config.content.default_language);
        async move { language }
    }
}

/// `Json<T>` whose rejection is a 400 in the API's error shape
#[derive(Debug)]
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Payload(value)),
            Err(rejection) => Err(AppError::Validation(rejection.body_text())),
        }
    }
}

/// `Path<T>` whose rejection is a 400 in the API's error shape
#[derive(Debug)]
pub struct PathParam<T>(pub T);

impl<T, S> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(PathParam(value)),
            Err(rejection) => Err(AppError::Validation(rejection.body_text())),
        }
    }
}

/// `Query<T>` whose rejection is a 400 in the API's error shape
#[derive(Debug)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::try_from_uri(&parts.uri)
            .map(|Query(value)| QueryParams(value))
            .map_err(|rejection| AppError::Validation(rejection.body_text()))
    }
}
