//! Request handlers.
//!
//! Bodies are taken as raw JSON and decoded through the shared validation
//! rules, so a malformed block is rejected here with the same reason the
//! editor would have given.

use crate::error::ApiError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};
use blockpad_document::{Block, BlockBody, BlockId, Page, PageId};
use blockpad_storage::PageStore;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

type AppState = Arc<PageStore>;

pub fn router(store: Arc<PageStore>) -> Router {
    Router::new()
        .route(
            "/api/pages",
            get(list_pages).post(create_page).put(replace_page_order),
        )
        .route("/api/pages/:id", put(replace_page).delete(delete_page))
        .route("/api/blocks", get(list_blocks).post(create_block))
        .route("/api/blocks/reorder", put(reorder_blocks))
        .route("/api/blocks/:id", put(update_block).delete(delete_block))
        .with_state(store)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

fn payload(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    let Json(value) = body?;
    Ok(value)
}

// ============================================================================
// Pages
// ============================================================================

async fn list_pages(State(store): State<AppState>) -> Result<Json<Vec<Page>>, ApiError> {
    Ok(Json(store.list_pages()?))
}

async fn create_page(
    State(store): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let page = Page::from_value(payload(body)?)?;
    let created = store.create_page(page)?;
    tracing::info!(page_id = %created.id, "Page created");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn replace_page(
    State(store): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Page>, ApiError> {
    let page = Page::from_value(payload(body)?)?;
    Ok(Json(store.replace_page(&PageId::from(id), page)?))
}

async fn delete_page(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    store.delete_page(&PageId::from(id))?;
    Ok(Json(json!({ "success": true })))
}

async fn replace_page_order(
    State(store): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vec<Page>>, ApiError> {
    let Value::Array(items) = payload(body)? else {
        return Err(ApiError::bad_request("Expected an array of pages"));
    };

    let pages = items
        .into_iter()
        .map(Page::from_value)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(store.replace_page_order(pages)?))
}

// ============================================================================
// Legacy blocks
// ============================================================================

#[derive(Debug, Deserialize)]
struct ReorderRequest {
    ids: Vec<BlockId>,
}

async fn list_blocks(State(store): State<AppState>) -> Result<Json<Vec<Block>>, ApiError> {
    Ok(Json(store.list_blocks()?))
}

async fn create_block(
    State(store): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let body = BlockBody::from_value(payload(body)?)?;
    let created = store.create_block(body)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_block(
    State(store): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Block>, ApiError> {
    let body = BlockBody::from_value(payload(body)?)?;
    Ok(Json(store.update_block(&BlockId::from(id), body)?))
}

async fn delete_block(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    store.delete_block(&BlockId::from(id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reorder_blocks(
    State(store): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vec<Block>>, ApiError> {
    let request: ReorderRequest = serde_json::from_value(payload(body)?)
        .map_err(|e| ApiError::bad_request(format!("Invalid reorder request: {}", e)))?;

    Ok(Json(store.reorder_blocks(&request.ids)?))
}
