//! Core types for zip-rename-dl

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Run state of a session's delivery sequence
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// Nothing delivered yet since the list was loaded
    #[default]
    Idle,
    /// The driver is iterating the list
    Running,
    /// Stopped at the cursor; continuing resumes there
    Paused,
    /// Every entry from the cursor to the end has been delivered
    Done,
}

/// The single control offered for the current state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    /// Begin delivering from the first entry
    Start,
    /// Request a pause at the next step boundary
    Pause,
    /// Resume from the stored cursor
    Continue,
    /// Rewind the cursor and deliver everything again
    Restart,
}

impl std::fmt::Display for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Control::Start => "Start",
            Control::Pause => "Pause",
            Control::Continue => "Continue",
            Control::Restart => "Restart",
        };
        f.write_str(label)
    }
}

/// Event emitted by the sequential driver
///
/// Subscribers receive these over a broadcast channel, see
/// [`SequentialDriver::subscribe`](crate::driver::SequentialDriver::subscribe).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A run began (or resumed)
    Started {
        /// Cursor the run starts from
        from: usize,
        /// Number of entries in the session
        total: usize,
    },

    /// One entry was handed to the sink
    Delivered {
        /// Index of the entry in the session
        index: usize,
        /// Name the entry was delivered under
        name: String,
        /// Decompressed size in bytes
        bytes: u64,
        /// When the delivery finished
        at: DateTime<Utc>,
    },

    /// The run stopped at a pause request
    Paused {
        /// Index of the next entry to deliver
        at: usize,
    },

    /// The run reached the end of the list
    Completed {
        /// Entries delivered during this run
        delivered: usize,
    },

    /// The run aborted on an error
    Failed {
        /// Index of the entry that failed
        index: usize,
        /// Error message
        error: String,
    },
}

/// Outcome of a single call to [`SequentialDriver::run`](crate::driver::SequentialDriver::run)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Cursor the run started from
    pub started_at: usize,
    /// Entries delivered during this run
    pub delivered: usize,
    /// Cursor after the run
    pub cursor: usize,
    /// Whether the run stopped on a pause request
    pub paused: bool,
}
