//! Top-level controller
//!
//! Owns the [`Session`], the [`SequentialDriver`] and the sink, and is the one
//! place errors are turned into user-facing messages. Loading and delivery
//! failures each produce exactly one alert through the [`Notifier`].

use crate::archive::{load_archive_bytes, load_archive_file};
use crate::config::Config;
use crate::driver::{PauseHandle, SequentialDriver};
use crate::error::Result;
use crate::session::Session;
use crate::sink::DeliverySink;
use crate::types::{Control, Event, RunState, RunSummary};
use std::path::Path;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Message shown once every entry has been delivered
pub const ALL_PROCESSED: &str = "All files processed";

/// Where user-facing messages go
pub trait Notifier: Send + Sync {
    /// A blocking error message
    fn alert(&self, message: &str);

    /// An informational message
    fn notice(&self, message: &str);
}

/// Writes alerts to stderr and notices to stdout
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        eprintln!("✗ {}", message);
    }

    fn notice(&self, message: &str) {
        println!("✓ {}", message);
    }
}

/// Drives a session on behalf of a user interface
pub struct Controller<N: Notifier> {
    session: Session,
    driver: SequentialDriver,
    sink: Box<dyn DeliverySink>,
    notifier: N,
}

impl<N: Notifier> Controller<N> {
    /// Create a controller with an empty session
    pub fn new(config: &Config, sink: Box<dyn DeliverySink>, notifier: N) -> Self {
        Self {
            session: Session::new(config.session.duplicate_suffix.clone()),
            driver: SequentialDriver::new(&config.delivery, config.event_capacity),
            sink,
            notifier,
        }
    }

    /// Load an archive from disk, replacing the current list
    ///
    /// Returns the number of entries loaded, or `None` after alerting on failure.
    pub async fn choose_archive(&mut self, path: &Path) -> Option<usize> {
        info!(?path, "archive chosen");
        let loaded = load_archive_file(path).await;
        self.install(loaded)
    }

    /// Load an archive from bytes already in memory
    pub fn choose_archive_bytes(&mut self, bytes: Vec<u8>) -> Option<usize> {
        let loaded = load_archive_bytes(bytes);
        self.install(loaded)
    }

    fn install(&mut self, loaded: Result<Vec<crate::archive::Entry>>) -> Option<usize> {
        match loaded {
            Ok(entries) => {
                let count = entries.len();
                self.session.replace_entries(entries);
                Some(count)
            }
            Err(e) => {
                warn!(error = %e, "archive could not be loaded");
                self.session.clear();
                self.notifier.alert(&format!("Error processing zip: {}", e));
                None
            }
        }
    }

    /// Rename entry `index`
    pub fn rename(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        self.session.rename(index, name)
    }

    /// Duplicate entry `index`, returning the new entry's index
    pub fn duplicate(&mut self, index: usize) -> Result<usize> {
        self.session.duplicate(index)
    }

    /// The control to offer, if any
    pub fn controls(&self) -> Option<Control> {
        self.session.controls()
    }

    /// Perform whatever the current control does
    ///
    /// Returns the run summary when a run took place, `None` when there was
    /// nothing to run or only a pause was requested. A delivery failure is
    /// alerted once and then returned.
    pub async fn activate(&mut self) -> Result<Option<RunSummary>> {
        let Some(control) = self.session.controls() else {
            return Ok(None);
        };
        debug!(%control, "control activated");
        match control {
            Control::Pause => {
                self.driver.pause();
                Ok(None)
            }
            Control::Start | Control::Continue => self.run().await.map(Some),
            Control::Restart => {
                self.session.rewind();
                self.run().await.map(Some)
            }
        }
    }

    /// Run the driver from the stored cursor
    pub async fn run(&mut self) -> Result<RunSummary> {
        match self.driver.run(&mut self.session, self.sink.as_ref()).await {
            Ok(summary) => {
                if self.session.state() == RunState::Done && summary.delivered > 0 {
                    self.notifier.notice(ALL_PROCESSED);
                }
                Ok(summary)
            }
            Err(e) => {
                self.notifier
                    .alert(&format!("Failed to process some files: {}", e));
                Err(e)
            }
        }
    }

    /// Handle that pauses the running sequence from another task
    pub fn pause_handle(&self) -> PauseHandle {
        self.driver.pause_handle()
    }

    /// Subscribe to driver events
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.driver.subscribe()
    }

    /// The session being edited and delivered
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The notifier messages are sent to
    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}
