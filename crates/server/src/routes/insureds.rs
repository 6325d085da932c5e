//! Insured registry route handlers.
//!
//! JSON API endpoints for the list/get/search/create/update/delete
//! lifecycle. Handlers stay thin: parameter extraction here, every rule
//! in the service.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use coverbook_core::{CreateInsured, Insured, InsuredDraft, InsuredId, Page, PageRequest};

use crate::error::Result;
use crate::state::AppState;

/// Pagination query parameters. Out-of-range values are clamped, not
/// rejected.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub page_number: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
}

/// Confirmation body for deletes.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

/// List insureds, newest first.
///
/// GET /api/insureds?pageNumber=&pageSize=
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Insured>>> {
    let request = PageRequest::new(
        query.page_number.unwrap_or(1),
        query.page_size.unwrap_or(PageRequest::DEFAULT_PAGE_SIZE),
    );
    let page = state.service().list(request).await?;
    Ok(Json(page))
}

/// Fetch one insured by identification number.
///
/// GET /api/insureds/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Insured>> {
    let insured = state.service().get(InsuredId::new(id)).await?;
    Ok(Json(insured))
}

/// Search insureds by a fragment of the identification number.
///
/// GET /api/insureds/search/{fragment}
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Path(fragment): Path<String>,
) -> Result<Json<Vec<Insured>>> {
    let hits = state.service().search(&fragment).await?;
    Ok(Json(hits))
}

/// Create a new insured.
///
/// POST /api/insureds
///
/// # Errors
///
/// 400 with field errors for shape violations, 400 with a message for
/// date/age violations, 409 for a duplicate id or email.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateInsured>,
) -> Result<(StatusCode, Json<Insured>)> {
    let insured = state.service().create(payload).await?;
    Ok((StatusCode::CREATED, Json(insured)))
}

/// Replace every mutable field of an existing insured.
///
/// PUT /api/insureds/{id}
///
/// The id travels only in the URL; it is never part of the payload.
#[instrument(skip(state, draft))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(draft): Json<InsuredDraft>,
) -> Result<Json<Insured>> {
    let insured = state.service().update(InsuredId::new(id), draft).await?;
    Ok(Json(insured))
}

/// Delete an insured.
///
/// DELETE /api/insureds/{id}
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Message>> {
    let id = InsuredId::new(id);
    state.service().delete(id).await?;
    Ok(Json(Message {
        message: format!("insured with identification {id} deleted successfully"),
    }))
}
