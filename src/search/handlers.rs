use super::engine::SearchService;
use super::types::{
    ComicItem, DEFAULT_LIMIT, ErrorResponse, SearchParams, SearchResponse, WordResponse,
};
use crate::error::Error;
use crate::storage::Comic;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::{Extension, Json};
use std::sync::Arc;

type Rejection = (StatusCode, Json<ErrorResponse>);

fn reject(status: StatusCode, message: impl Into<String>) -> Rejection {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Validates the query string: a non-empty phrase and a positive limit.
pub fn parse_search_params(params: SearchParams) -> Result<(usize, String), Rejection> {
    let limit = match params.limit.as_deref() {
        None | Some("") => DEFAULT_LIMIT,
        Some(raw) => match raw.parse::<usize>() {
            Ok(limit) if limit > 0 => limit,
            _ => {
                return Err(reject(
                    StatusCode::BAD_REQUEST,
                    "Unexpected 'limit' parameter",
                ));
            }
        },
    };

    match params.phrase {
        Some(phrase) if !phrase.trim().is_empty() => Ok((limit, phrase)),
        _ => Err(reject(
            StatusCode::BAD_REQUEST,
            "Missing 'phrase' parameter",
        )),
    }
}

fn to_response(comics: Vec<Comic>) -> Json<SearchResponse> {
    let comics: Vec<ComicItem> = comics.into_iter().map(ComicItem::from).collect();
    Json(SearchResponse {
        total: comics.len(),
        comics,
    })
}

pub async fn handle_db_search(
    Extension(service): Extension<Arc<SearchService>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, Rejection> {
    let (limit, phrase) = parse_search_params(params)?;

    match service.db_search(limit, &phrase).await {
        Ok(comics) => Ok(to_response(comics)),
        Err(e) => {
            tracing::error!("DB search for {:?} failed: {}", phrase, e);
            Err(reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

pub async fn handle_index_search(
    Extension(service): Extension<Arc<SearchService>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, Rejection> {
    let (limit, phrase) = parse_search_params(params)?;

    match service.index_search(limit, &phrase).await {
        Ok(comics) => Ok(to_response(comics)),
        Err(e) => {
            tracing::error!("Index search for {:?} failed: {}", phrase, e);
            Err(reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

pub async fn handle_search_by_word(
    Extension(service): Extension<Arc<SearchService>>,
    Path(word): Path<String>,
) -> Result<Json<WordResponse>, Rejection> {
    match service.search_by_word(&word).await {
        Ok(ids) => Ok(Json(WordResponse { word, ids })),
        Err(e) => Err(reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}

pub async fn handle_get_comics(
    Extension(service): Extension<Arc<SearchService>>,
    Path(id): Path<u32>,
) -> Result<Json<Comic>, Rejection> {
    match service.get_comics(id).await {
        Ok(comic) => Ok(Json(comic)),
        Err(Error::NotFound) => Err(reject(StatusCode::NOT_FOUND, "comic not found")),
        Err(e) => Err(reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}
