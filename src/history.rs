use crate::error::{HistoryError, HistoryResult};
use crate::surface::RasterSurface;
use std::collections::VecDeque;
use std::sync::Arc;

/// Default number of snapshots kept on the undo stack
pub const DEFAULT_HISTORY_DEPTH: usize = 20;

/// An immutable PNG-encoded copy of the committed layer.
#[derive(Clone)]
pub struct Snapshot {
    png: Arc<[u8]>,
    width: u32,
    height: u32,
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.png.len())
            .finish()
    }
}

impl Snapshot {
    pub fn capture(surface: &RasterSurface) -> HistoryResult<Self> {
        let png = surface.encode_png().map_err(HistoryError::Capture)?;
        Ok(Self {
            png: png.into(),
            width: surface.width(),
            height: surface.height(),
        })
    }

    /// Builds a snapshot from already encoded bytes.
    pub fn from_png(png: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            png: png.into(),
            width,
            height,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Decodes into the surface. The surface is untouched on failure.
    pub fn restore_into(&self, surface: &mut RasterSurface) -> HistoryResult<()> {
        surface.restore_png(&self.png).map_err(HistoryError::Restore)
    }
}

/// Bounded undo stack plus redo stack of committed-layer snapshots.
///
/// The newest undo entry always mirrors the committed layer. Undo is a no-op
/// while only the floor entry remains.
pub struct History {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops everything and records the current surface as the floor entry.
    pub fn reset(&mut self, surface: &RasterSurface) -> HistoryResult<()> {
        let floor = Snapshot::capture(surface)?;
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.undo_stack.push_back(floor);
        Ok(())
    }

    /// Records the committed layer after a finalized edit.
    pub fn snapshot(&mut self, surface: &RasterSurface) -> HistoryResult<()> {
        let entry = Snapshot::capture(surface)?;
        self.push(entry);
        self.redo_stack.clear();
        log::debug!("History: {} undo / 0 redo", self.undo_stack.len());
        Ok(())
    }

    fn push(&mut self, entry: Snapshot) {
        self.undo_stack.push_back(entry);
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
    }

    /// Steps back one entry. Returns `Ok(false)` when there is nothing to
    /// undo. A failed restore leaves both stacks as they were.
    pub fn undo(&mut self, surface: &mut RasterSurface) -> HistoryResult<bool> {
        let len = self.undo_stack.len();
        if len <= 1 {
            return Ok(false);
        }
        if let Some(target) = self.undo_stack.get(len - 2) {
            if let Err(err) = target.restore_into(surface) {
                log::error!("Undo failed: {}", err);
                return Err(err);
            }
        }
        if let Some(newest) = self.undo_stack.pop_back() {
            self.redo_stack.push(newest);
        }
        Ok(true)
    }

    /// Re-applies the most recently undone entry. Returns `Ok(false)` when
    /// the redo stack is empty.
    pub fn redo(&mut self, surface: &mut RasterSurface) -> HistoryResult<bool> {
        let Some(next) = self.redo_stack.last() else {
            return Ok(false);
        };
        if let Err(err) = next.restore_into(surface) {
            log::error!("Redo failed: {}", err);
            return Err(err);
        }
        if let Some(entry) = self.redo_stack.pop() {
            self.push(entry);
        }
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// The entry mirroring the committed layer
    pub fn current(&self) -> Option<&Snapshot> {
        self.undo_stack.back()
    }

    /// Pushes a pre-built entry, as [`Self::snapshot`] does.
    pub fn push_snapshot(&mut self, entry: Snapshot) {
        self.push(entry);
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn surface() -> RasterSurface {
        RasterSurface::new(4.0, 4.0, 1.0).expect("valid")
    }

    #[test]
    fn undo_on_floor_is_a_no_op() {
        let mut surface = surface();
        let mut history = History::default();
        history.reset(&surface).expect("encode");
        assert!(!history.undo(&mut surface).expect("no-op"));
        assert!(!history.can_undo());
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn undo_then_redo_restores_pixels() {
        let mut surface = surface();
        let mut history = History::default();
        history.reset(&surface).expect("encode");
        surface.clear(Some(Color::WHITE));
        history.snapshot(&surface).expect("encode");

        assert!(history.undo(&mut surface).expect("undo"));
        assert!(surface.committed().is_clear());
        assert!(history.can_redo());

        assert!(history.redo(&mut surface).expect("redo"));
        assert_eq!(surface.committed().pixel(1, 1), Some([255, 255, 255, 255]));
        assert!(!history.can_redo());
    }

    #[test]
    fn capacity_evicts_oldest() {
        let surface = surface();
        let mut history = History::new(3);
        history.reset(&surface).expect("encode");
        for _ in 0..5 {
            history.snapshot(&surface).expect("encode");
        }
        assert_eq!(history.undo_len(), 3);
    }

    #[test]
    fn failed_restore_keeps_stacks() {
        let mut surface = surface();
        let mut history = History::default();
        history.reset(&surface).expect("encode");
        history.push_snapshot(Snapshot::from_png(vec![1, 2, 3], 4, 4));
        history.push_snapshot(Snapshot::from_png(vec![4, 5, 6], 4, 4));
        assert!(history.undo(&mut surface).is_err());
        assert_eq!(history.undo_len(), 3);
        assert_eq!(history.redo_len(), 0);
    }
}
