//! In-memory drawing store.

use super::{BoxFuture, Drawing, DrawingDraft, DrawingId, DrawingStore, DrawingSummary, StoreError, StoreResult, newest_first};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// In-memory store for tests and ephemeral servers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    drawings: RwLock<HashMap<DrawingId, Drawing>>,
}

fn lock_error<T>(e: PoisonError<T>) -> StoreError {
    StoreError::Other(format!("Lock error: {e}"))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.drawings.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DrawingStore for MemoryStore {
    fn list(&self, limit: usize) -> BoxFuture<'_, StoreResult<Vec<DrawingSummary>>> {
        Box::pin(async move {
            let drawings = self.drawings.read().map_err(lock_error)?;
            Ok(newest_first(drawings.values().map(Drawing::summary).collect(), limit))
        })
    }

    fn load(&self, id: &DrawingId) -> BoxFuture<'_, StoreResult<Drawing>> {
        let id = id.clone();
        Box::pin(async move {
            let drawings = self.drawings.read().map_err(lock_error)?;
            drawings
                .get(&id)
                .cloned()
                .ok_or_else(|| StoreError::NotFound(id.to_string()))
        })
    }

    fn save(&self, id: Option<&DrawingId>, draft: DrawingDraft) -> BoxFuture<'_, StoreResult<Drawing>> {
        let id = id.cloned();
        Box::pin(async move {
            let mut drawings = self.drawings.write().map_err(lock_error)?;
            match id {
                Some(id) => {
                    let drawing = drawings
                        .get_mut(&id)
                        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
                    drawing.update(draft);
                    Ok(drawing.clone())
                }
                None => {
                    let drawing = Drawing::new(DrawingId::new(), draft);
                    drawings.insert(drawing.id.clone(), drawing.clone());
                    Ok(drawing)
                }
            }
        })
    }

    fn delete(&self, id: &DrawingId) -> BoxFuture<'_, StoreResult<()>> {
        let id = id.clone();
        Box::pin(async move {
            let mut drawings = self.drawings.write().map_err(lock_error)?;
            drawings
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| StoreError::NotFound(id.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::shapes::{Frame, PrimitiveKind, Shape, ShapeStyle};
    use crate::storage::test_util::block_on;

    fn draft(title: &str) -> DrawingDraft {
        DrawingDraft {
            title: title.to_string(),
            shapes: vec![Shape::primitive(
                PrimitiveKind::Rect,
                Frame::new(10.0, 10.0, 100.0, 50.0),
                ShapeStyle::default(),
            )],
            preview: None,
        }
    }

    #[test]
    fn test_create_and_load() {
        let store = MemoryStore::new();
        let saved = block_on(store.save(None, draft("One"))).unwrap();
        let loaded = block_on(store.load(&saved.id)).unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded.data.shapes.len(), 1);
    }

    #[test]
    fn test_not_found() {
        let store = MemoryStore::new();
        let missing = DrawingId::from("nonexistent");
        assert!(matches!(block_on(store.load(&missing)), Err(StoreError::NotFound(_))));
        assert!(matches!(block_on(store.save(Some(&missing), draft("x"))), Err(StoreError::NotFound(_))));
        assert!(matches!(block_on(store.delete(&missing)), Err(StoreError::NotFound(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::new();
        let saved = block_on(store.save(None, draft("One"))).unwrap();
        block_on(store.delete(&saved.id)).unwrap();
        assert!(block_on(store.load(&saved.id)).is_err());
    }

    #[test]
    fn test_list_is_bounded_and_newest_first() {
        let store = MemoryStore::new();
        let first = block_on(store.save(None, draft("first"))).unwrap();
        for i in 0..4 {
            block_on(store.save(None, draft(&format!("d{i}")))).unwrap();
        }
        block_on(store.save(Some(&first.id), draft("first again"))).unwrap();

        let list = block_on(store.list(3)).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].id, first.id);
        assert_eq!(list[0].title, "first again");
        assert!(list.windows(2).all(|w| w[0].updated_at >= w[1].updated_at));
    }

    #[test]
    fn test_second_save_updates_instead_of_creating() {
        let store = MemoryStore::new();
        let mut canvas = Canvas::new();
        canvas
            .document
            .append(Shape::primitive(PrimitiveKind::Rect, Frame::new(0.0, 0.0, 5.0, 5.0), ShapeStyle::default()));

        let request = canvas.begin_save("Flow", None);
        let result = block_on(request.submit(&store));
        canvas.finish_save(&request, result);
        let id = canvas.document.id.clone().unwrap();

        let request = canvas.begin_save("Flow", None);
        assert_eq!(request.id.as_ref(), Some(&id));
        let result = block_on(request.submit(&store));
        canvas.finish_save(&request, result);

        assert_eq!(store.len(), 1);
        assert_eq!(canvas.document.id, Some(id));
    }
}
