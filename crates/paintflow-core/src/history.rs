//! Undo / redo over serialized whole-document snapshots.

use crate::canvas::CanvasDocument;
use crate::shapes::Shape;
use std::collections::VecDeque;
use thiserror::Error;

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 100;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("snapshot could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("malformed snapshot discarded: {0}")]
    Serialization(#[source] serde_json::Error),
}

/// The serialized shape sequence at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(String);

impl Snapshot {
    pub fn capture(shapes: &[Shape]) -> Result<Self, HistoryError> {
        serde_json::to_string(shapes).map(Self).map_err(HistoryError::Encode)
    }

    /// Wrap already serialized JSON.
    pub fn from_json(json: impl Into<String>) -> Self {
        Self(json.into())
    }

    pub fn restore(&self) -> Result<Vec<Shape>, HistoryError> {
        serde_json::from_str(&self.0).map_err(HistoryError::Serialization)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Linear undo history: the undo stack is bounded, redo is cleared by every
/// fresh mutation.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_UNDO_HISTORY)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record the pre-mutation state. Call before changing the document.
    pub fn record(&mut self, document: &CanvasDocument) -> Result<(), HistoryError> {
        let snapshot = Snapshot::capture(document.shapes())?;
        self.push_undo(snapshot);
        self.redo.clear();
        Ok(())
    }

    /// Push an already captured snapshot, as [`History::record`] does.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.push_undo(snapshot);
        self.redo.clear();
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo.push_back(snapshot);
        while self.undo.len() > self.capacity {
            self.undo.pop_front();
        }
    }

    /// Undo the last change.
    /// Returns `Ok(true)` if a state was restored, `Ok(false)` if there was nothing to undo.
    pub fn undo(&mut self, document: &mut CanvasDocument) -> Result<bool, HistoryError> {
        if self.undo.is_empty() {
            return Ok(false);
        }
        let current = Snapshot::capture(document.shapes())?;
        let Some(previous) = self.undo.pop_back() else {
            return Ok(false);
        };
        let shapes = previous.restore()?;
        self.redo.push(current);
        document.replace_all(shapes);
        Ok(true)
    }

    /// Redo the last undone change.
    pub fn redo(&mut self, document: &mut CanvasDocument) -> Result<bool, HistoryError> {
        if self.redo.is_empty() {
            return Ok(false);
        }
        let current = Snapshot::capture(document.shapes())?;
        let Some(next) = self.redo.pop() else {
            return Ok(false);
        };
        let shapes = next.restore()?;
        self.push_undo(current);
        document.replace_all(shapes);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear_redo(&mut self) {
        self.redo.clear();
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
