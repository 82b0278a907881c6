//! Linear undo/redo history of score sheets, mirrored to a snapshot store.

use crate::models::ScoreSheet;
use crate::storage::SheetStore;

/// Holder of the current score sheet and every earlier (and undone) version.
///
/// The store always holds the latest *committed* sheet; undo/redo only move the cursor
/// and do not write, so a reload after undoing resumes from the last commit.
#[derive(Debug)]
pub struct HistoryStore<S: SheetStore> {
    snapshots: Vec<ScoreSheet>,
    cursor: usize,
    store: S,
}

impl<S: SheetStore> HistoryStore<S> {
    /// Seed history from the store's snapshot, or the default game when there is none
    /// (or it cannot be read).
    pub fn open(store: S) -> Self {
        let initial = match store.load() {
            Ok(Some(sheet)) => match sheet.validate() {
                Ok(()) => {
                    log::info!(
                        "Restored score sheet: {} players, {} rounds",
                        sheet.players.len(),
                        sheet.rounds.len()
                    );
                    sheet
                }
                Err(e) => {
                    log::warn!("Stored score sheet is invalid ({}); starting a new game", e);
                    ScoreSheet::default_game()
                }
            },
            Ok(None) => ScoreSheet::default_game(),
            Err(e) => {
                log::warn!("Could not load score sheet ({}); starting a new game", e);
                ScoreSheet::default_game()
            }
        };
        Self::with_initial(store, initial)
    }

    /// History holding exactly `initial`, without touching the store.
    pub fn with_initial(store: S, initial: ScoreSheet) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
            store,
        }
    }

    /// The active snapshot.
    pub fn current(&self) -> &ScoreSheet {
        &self.snapshots[self.cursor]
    }

    /// Make `new_sheet` the current snapshot, discarding any redo entries, and persist it.
    ///
    /// Panics if `new_sheet` breaks the sheet invariants; the edit helpers never produce such a sheet.
    pub fn commit(&mut self, new_sheet: ScoreSheet) {
        if let Err(e) = new_sheet.validate() {
            panic!("committed an invalid score sheet: {}", e);
        }
        let discarded = self.snapshots.len() - self.cursor - 1;
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(new_sheet);
        self.cursor += 1;
        log::debug!(
            "Committed snapshot {} (discarded {} redo entries)",
            self.cursor,
            discarded
        );
        self.persist();
    }

    /// Step back one snapshot. Returns false when already at the oldest.
    pub fn undo(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        log::debug!("Undo to snapshot {}", self.cursor);
        true
    }

    /// Step forward one snapshot. Returns false when already at the newest.
    pub fn redo(&mut self) -> bool {
        if self.cursor + 1 >= self.snapshots.len() {
            return false;
        }
        self.cursor += 1;
        log::debug!("Redo to snapshot {}", self.cursor);
        true
    }

    /// Throw away all history and start over from `default_sheet`. Clears the stored snapshot.
    pub fn reset(&mut self, default_sheet: ScoreSheet) {
        if let Err(e) = default_sheet.validate() {
            panic!("reset to an invalid score sheet: {}", e);
        }
        self.snapshots.clear();
        self.snapshots.push(default_sheet);
        self.cursor = 0;
        log::info!("History reset");
        if let Err(e) = self.store.clear() {
            log::warn!("Failed to clear stored score sheet: {}", e);
        }
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Number of snapshots held (including undone ones). Always at least 1.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(self.current()) {
            log::warn!("Failed to save score sheet: {}", e);
        }
    }
}
