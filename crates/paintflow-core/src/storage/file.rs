//! File-based drawing store for native platforms.

use super::{BoxFuture, Drawing, DrawingDraft, DrawingId, DrawingStore, DrawingSummary, StoreError, StoreResult, newest_first};
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each drawing as `<id>.json` in one directory.
#[derive(Debug)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: impl Into<PathBuf>) -> StoreResult<Self> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(|e| StoreError::Io(format!("Failed to create storage directory: {e}")))?;
        }
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn drawing_path(&self, id: &DrawingId) -> PathBuf {
        let safe_id: String = id
            .as_str()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{safe_id}.json"))
    }

    fn read(path: &Path, id: &DrawingId) -> StoreResult<Drawing> {
        if !path.exists() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let json = fs::read_to_string(path)
            .map_err(|e| StoreError::Io(format!("Failed to read {}: {e}", path.display())))?;
        serde_json::from_str(&json)
            .map_err(|e| StoreError::Serialization(format!("Failed to parse {}: {e}", path.display())))
    }

    fn write(path: &Path, drawing: &Drawing) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(drawing).map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(path, json).map_err(|e| StoreError::Io(format!("Failed to write {}: {e}", path.display())))
    }
}

impl DrawingStore for FileStore {
    fn list(&self, limit: usize) -> BoxFuture<'_, StoreResult<Vec<DrawingSummary>>> {
        let base = self.base_path.clone();
        Box::pin(async move {
            let entries = fs::read_dir(&base).map_err(|e| StoreError::Io(format!("Failed to read directory: {e}")))?;
            let mut summaries = Vec::new();
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_none_or(|ext| ext != "json") {
                    continue;
                }
                let parsed = fs::read_to_string(&path)
                    .map_err(|e| e.to_string())
                    .and_then(|json| serde_json::from_str::<Drawing>(&json).map_err(|e| e.to_string()));
                match parsed {
                    Ok(drawing) => summaries.push(drawing.summary()),
                    Err(err) => log::warn!("Skipping unreadable drawing {}: {err}", path.display()),
                }
            }
            Ok(newest_first(summaries, limit))
        })
    }

    fn load(&self, id: &DrawingId) -> BoxFuture<'_, StoreResult<Drawing>> {
        let path = self.drawing_path(id);
        let id = id.clone();
        Box::pin(async move { Self::read(&path, &id) })
    }

    fn save(&self, id: Option<&DrawingId>, draft: DrawingDraft) -> BoxFuture<'_, StoreResult<Drawing>> {
        let id = id.cloned();
        Box::pin(async move {
            let drawing = match id {
                Some(id) => {
                    let mut drawing = Self::read(&self.drawing_path(&id), &id)?;
                    drawing.update(draft);
                    drawing
                }
                None => Drawing::new(DrawingId::new(), draft),
            };
            Self::write(&self.drawing_path(&drawing.id), &drawing)?;
            log::debug!("Wrote drawing {} to {}", drawing.id, self.base_path.display());
            Ok(drawing)
        })
    }

    fn delete(&self, id: &DrawingId) -> BoxFuture<'_, StoreResult<()>> {
        let path = self.drawing_path(id);
        let id = id.clone();
        Box::pin(async move {
            if !path.exists() {
                return Err(StoreError::NotFound(id.to_string()));
            }
            fs::remove_file(&path).map_err(|e| StoreError::Io(format!("Failed to delete {}: {e}", path.display())))
        })
    }
}
