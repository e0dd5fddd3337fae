//! Session state: the entry list, the resumable cursor and the run state.
//!
//! A [`Session`] is owned by the top-level controller and lent to the editing
//! operations and to the [`SequentialDriver`](crate::driver::SequentialDriver).
//! Everything lives in memory and is gone when the session is dropped.

use crate::archive::Entry;
use crate::error::{Result, SessionError};
use crate::types::{Control, RunState};
use tracing::debug;

/// In-memory list of entries plus delivery progress
#[derive(Debug)]
pub struct Session {
    entries: Vec<Entry>,
    cursor: usize,
    state: RunState,
    duplicate_suffix: String,
}

impl Session {
    /// Create an empty session
    pub fn new(duplicate_suffix: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            state: RunState::Idle,
            duplicate_suffix: duplicate_suffix.into(),
        }
    }

    /// Install a freshly loaded list, discarding the previous one
    pub fn replace_entries(&mut self, entries: Vec<Entry>) {
        debug!(
            previous = self.entries.len(),
            loaded = entries.len(),
            "replacing session entries"
        );
        self.entries = entries;
        self.rewind();
    }

    /// Drop every entry and reset progress
    pub fn clear(&mut self) {
        self.entries.clear();
        self.rewind();
    }

    /// Move the cursor back to the first entry
    pub fn rewind(&mut self) {
        self.cursor = 0;
        self.state = RunState::Idle;
    }

    /// Change the display name of entry `index`
    pub fn rename(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(SessionError::IndexOutOfRange { index, len })?;
        entry.display_name = name.into();
        debug!(index, display_name = %entry.display_name, "entry renamed");
        Ok(())
    }

    /// Append a copy of entry `index` sharing its content, returning the new index
    pub fn duplicate(&mut self, index: usize) -> Result<usize> {
        let len = self.entries.len();
        let source = self
            .entries
            .get(index)
            .ok_or(SessionError::IndexOutOfRange { index, len })?;

        let copy = Entry {
            original_name: source.original_name.clone(),
            display_name: format!("{}{}", source.display_name, self.duplicate_suffix),
            content: source.content.clone(),
        };
        debug!(source = index, new_index = len, display_name = %copy.display_name, "entry duplicated");

        self.entries.push(copy);
        Ok(len)
    }

    /// All entries in delivery order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Entry at `index`
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no archive is loaded or it had no files
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the next entry to deliver
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current run state
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The control to offer, or `None` when there is nothing to deliver
    pub fn controls(&self) -> Option<Control> {
        if self.entries.is_empty() {
            return None;
        }
        Some(match self.state {
            RunState::Idle => Control::Start,
            RunState::Running => Control::Pause,
            RunState::Paused => Control::Continue,
            RunState::Done => Control::Restart,
        })
    }

    pub(crate) fn set_state(&mut self, state: RunState) {
        self.state = state;
    }

    pub(crate) fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }
}
