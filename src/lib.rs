//! # zip-rename-dl
//!
//! Pick a ZIP archive, rename its entries, then deliver the renamed files one
//! at a time with pause/continue control over the sequence.
//!
//! ## Design Philosophy
//!
//! - **Explicit session** - the entry list, cursor and run state live in one
//!   [`Session`] owned by the caller, never in globals
//! - **Cooperative pausing** - a pause takes effect between entries; the entry
//!   in flight always completes
//! - **Pluggable delivery** - entries go to any [`DeliverySink`]; the default
//!   writes files into a directory
//! - **Event-driven** - consumers subscribe to driver events, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use zip_rename_dl::{Config, ConsoleNotifier, Controller, DirectorySink};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let sink = DirectorySink::new(config.output_dir().clone());
//!     let mut controller = Controller::new(&config, Box::new(sink), ConsoleNotifier);
//!
//!     if controller.choose_archive(Path::new("bundle.zip")).await.is_some() {
//!         controller.rename(0, "first.txt")?;
//!         controller.duplicate(0)?;
//!         controller.activate().await?;
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Archive loading and entry handles
pub mod archive;
/// Configuration types
pub mod config;
/// Top-level controller and user-facing notifications
pub mod controller;
/// Sequential delivery driver
pub mod driver;
/// Error types
pub mod error;
/// Entry list, cursor and run state
pub mod session;
/// Delivery sinks
pub mod sink;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use archive::{ContentHandle, Entry, load_archive_bytes, load_archive_file};
pub use config::{Config, DeliveryConfig, SessionConfig};
pub use controller::{ConsoleNotifier, Controller, Notifier};
pub use driver::{PauseHandle, SequentialDriver};
pub use error::{ArchiveError, Error, Result, SessionError};
pub use session::Session;
pub use sink::{Delivery, DeliverySink, DirectorySink, MemorySink};
pub use types::{Control, Event, RunState, RunSummary};

use tokio_util::sync::CancellationToken;

/// Pause the driver every time an interrupt signal (Ctrl+C) arrives.
///
/// Runs until `shutdown` is cancelled. Each interrupt requests a pause; the
/// entry being delivered at that moment still completes.
///
/// # Example
///
/// ```no_run
/// use zip_rename_dl::{Config, SequentialDriver, pause_on_interrupt};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() {
/// let driver = SequentialDriver::new(&Config::default().delivery, 64);
/// let shutdown = CancellationToken::new();
/// let listener = tokio::spawn(pause_on_interrupt(driver.pause_handle(), shutdown.clone()));
///
/// // ... run the driver ...
///
/// shutdown.cancel();
/// listener.await.ok();
/// # }
/// ```
pub async fn pause_on_interrupt(pause: PauseHandle, shutdown: CancellationToken) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::debug!("interrupt listener shutting down");
                return;
            }
            result = tokio::signal::ctrl_c() => {
                match result {
                    Ok(()) => {
                        tracing::info!("Received interrupt signal, pausing after current entry");
                        pause.pause();
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to listen for interrupt signal");
                        return;
                    }
                }
            }
        }
    }
}
