// Linear undo/redo timeline of whole-buffer snapshots.
// Visual: undo walks back through saved canvases, redo walks forward again.
// Drawing after an undo throws away everything that was "ahead" of you.
use crate::types::Raster;

/// One saved canvas state.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub raster: Raster,
    /// Whether the canvas counted as empty (nothing drawn or imported) here.
    pub empty: bool,
}

/// Snapshots plus a cursor. Invariant: when `entries` is non-empty the
/// cursor indexes a valid entry, and that entry is the last saved visible state.
#[derive(Default)]
pub struct History {
    entries: Vec<Snapshot>,
    cursor: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prune the redo branch, append `snap` and move the cursor onto it.
    pub fn save(&mut self, snap: Snapshot) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(snap);
        self.cursor = self.entries.len() - 1;
    }

    /// Step back one entry. None at the oldest state.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.entries.is_empty() || self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step forward one entry. None at the newest state.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.cursor)
    }

    /// Cursor position, or None before the first baseline.
    pub fn cursor(&self) -> Option<usize> {
        if self.entries.is_empty() { None } else { Some(self.cursor) }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }
}
