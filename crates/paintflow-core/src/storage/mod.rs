//! Persistence contract for saved drawings.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::canvas::UNTITLED;
use crate::shapes::Shape;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Most drawings returned by a listing.
pub const DEFAULT_LIST_LIMIT: usize = 50;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Storage errors.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Drawing not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Opaque store-assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawingId(String);

impl DrawingId {
    /// A fresh random identifier.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DrawingId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for DrawingId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DrawingId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for DrawingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The persisted payload: the shape sequence in wire form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawingData {
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

/// A rendered PNG preview stored next to a drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    png: Vec<u8>,
}

impl PreviewImage {
    pub fn from_png(png: Vec<u8>) -> Self {
        Self { png }
    }

    pub fn png(&self) -> &[u8] {
        &self.png
    }

    pub fn to_data_url(&self) -> String {
        format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(&self.png))
    }

    pub fn from_data_url(url: &str) -> StoreResult<Self> {
        let encoded = url
            .strip_prefix(PNG_DATA_URL_PREFIX)
            .ok_or_else(|| StoreError::Serialization("preview is not a PNG data URL".to_string()))?;
        let png = STANDARD
            .decode(encoded)
            .map_err(|e| StoreError::Serialization(format!("invalid preview encoding: {e}")))?;
        Ok(Self { png })
    }
}

/// What a client submits on save.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingDraft {
    pub title: String,
    pub shapes: Vec<Shape>,
    /// Replaces the stored preview; `None` keeps the existing one on update.
    pub preview: Option<PreviewImage>,
}

/// A stored drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drawing {
    #[serde(rename = "_id", alias = "id")]
    pub id: DrawingId,
    #[serde(default = "untitled")]
    pub title: String,
    pub data: DrawingData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn untitled() -> String {
    UNTITLED.to_string()
}

impl Drawing {
    pub fn new(id: DrawingId, draft: DrawingDraft) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: draft.title,
            data: DrawingData { shapes: draft.shapes },
            image_data_url: draft.preview.map(|p| p.to_data_url()),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite with a newer draft (last write wins).
    pub fn update(&mut self, draft: DrawingDraft) {
        self.title = draft.title;
        self.data.shapes = draft.shapes;
        if let Some(preview) = draft.preview {
            self.image_data_url = Some(preview.to_data_url());
        }
        self.updated_at = Utc::now().max(self.updated_at);
    }

    pub fn summary(&self) -> DrawingSummary {
        DrawingSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Listing entry; never carries the shapes or the preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingSummary {
    #[serde(rename = "_id", alias = "id")]
    pub id: DrawingId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Most recently updated first, at most `limit` entries.
pub(crate) fn newest_first(mut summaries: Vec<DrawingSummary>, limit: usize) -> Vec<DrawingSummary> {
    summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    summaries.truncate(limit);
    summaries
}

/// Backend holding saved drawings.
///
/// Implementations can store drawings in memory, on the filesystem, or
/// behind a remote API.
pub trait DrawingStore: Send + Sync {
    /// Summaries, most recently updated first.
    fn list(&self, limit: usize) -> BoxFuture<'_, StoreResult<Vec<DrawingSummary>>>;

    fn load(&self, id: &DrawingId) -> BoxFuture<'_, StoreResult<Drawing>>;

    /// Create when `id` is `None`, otherwise update. Updating an unknown id
    /// fails with [`StoreError::NotFound`].
    fn save(&self, id: Option<&DrawingId>, draft: DrawingDraft) -> BoxFuture<'_, StoreResult<Drawing>>;

    fn delete(&self, id: &DrawingId) -> BoxFuture<'_, StoreResult<()>>;
}

/// An owned save, detached from the canvas that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub id: Option<DrawingId>,
    pub draft: DrawingDraft,
    /// Document generation at the time the request was built.
    pub generation: u64,
}

impl SaveRequest {
    pub async fn submit(&self, store: &dyn DrawingStore) -> StoreResult<Drawing> {
        store.save(self.id.as_ref(), self.draft.clone()).await
    }
}
