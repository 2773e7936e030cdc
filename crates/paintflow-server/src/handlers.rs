//! `/api` route handlers.

use crate::error::ApiError;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use paintflow_core::UNTITLED;
use paintflow_core::storage::{
    Drawing, DrawingData, DrawingDraft, DrawingId, DrawingStore, DrawingSummary, PreviewImage,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DrawingStore>,
    pub list_limit: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn DrawingStore>, list_limit: usize) -> Self {
        Self { store, list_limit }
    }
}

/// Body of create and update requests.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBody {
    pub title: Option<String>,
    pub data: Option<DrawingData>,
    pub image_data_url: Option<String>,
}

impl SaveBody {
    fn into_draft(self) -> Result<DrawingDraft, ApiError> {
        let data = self.data.ok_or(ApiError::MissingData)?;
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());
        let preview = self
            .image_data_url
            .as_deref()
            .map(PreviewImage::from_data_url)
            .transpose()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        Ok(DrawingDraft {
            title,
            shapes: data.shapes,
            preview,
        })
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

pub async fn list_drawings(State(state): State<AppState>) -> Result<Json<Vec<DrawingSummary>>, ApiError> {
    let list = state
        .store
        .list(state.list_limit)
        .await
        .map_err(|e| ApiError::store(e, "Failed to fetch drawings"))?;
    Ok(Json(list))
}

pub async fn get_drawing(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Drawing>, ApiError> {
    let drawing = state
        .store
        .load(&DrawingId::from(id))
        .await
        .map_err(|e| ApiError::store(e, "Failed to fetch drawing"))?;
    Ok(Json(drawing))
}

pub async fn create_drawing(
    State(state): State<AppState>,
    Json(body): Json<SaveBody>,
) -> Result<(StatusCode, Json<Drawing>), ApiError> {
    let draft = body.into_draft()?;
    let drawing = state
        .store
        .save(None, draft)
        .await
        .map_err(|e| ApiError::store(e, "Failed to save drawing"))?;
    info!("Created drawing {} ({} shapes)", drawing.id, drawing.data.shapes.len());
    Ok((StatusCode::CREATED, Json(drawing)))
}

pub async fn update_drawing(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SaveBody>,
) -> Result<Json<Drawing>, ApiError> {
    let draft = body.into_draft()?;
    let id = DrawingId::from(id);
    let drawing = state
        .store
        .save(Some(&id), draft)
        .await
        .map_err(|e| ApiError::store(e, "Failed to update drawing"))?;
    info!("Updated drawing {}", drawing.id);
    Ok(Json(drawing))
}

pub async fn delete_drawing(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, ApiError> {
    let id = DrawingId::from(id);
    state
        .store
        .delete(&id)
        .await
        .map_err(|e| ApiError::store(e, "Failed to delete drawing"))?;
    info!("Deleted drawing {id}");
    Ok(Json(json!({ "ok": true })))
}
