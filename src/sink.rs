//! Delivery sinks
//!
//! A sink receives one entry's bytes at a time under its download name.
//! [`DirectorySink`] saves each one as a file in an output directory;
//! [`MemorySink`] keeps them in memory.

use crate::error::{Error, Result};
use crate::utils::{delivery_file_name, staging_file_name};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Record of one completed delivery
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    /// Name the entry was delivered under
    pub name: String,
    /// Number of bytes delivered
    pub bytes: u64,
    /// Where the bytes ended up, for sinks that write to disk
    pub location: Option<PathBuf>,
}

/// Destination for delivered entries
///
/// The driver calls `deliver` once per entry and waits for it to finish
/// before moving on, so implementations never see overlapping calls from one
/// run.
#[async_trait]
pub trait DeliverySink: Send + Sync {
    /// Hand over the bytes of one entry under `name`
    async fn deliver(&self, name: &str, bytes: &[u8]) -> Result<Delivery>;
}

#[async_trait]
impl<T: DeliverySink + ?Sized> DeliverySink for Arc<T> {
    async fn deliver(&self, name: &str, bytes: &[u8]) -> Result<Delivery> {
        (**self).deliver(name, bytes).await
    }
}

/// Saves each delivered entry as a file in a directory
///
/// Bytes are first written to a hidden staging file, which is renamed into
/// place once complete. An existing file with the same name is overwritten.
/// Clones share the staging counter.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    output_dir: PathBuf,
    staging_seq: Arc<AtomicU64>,
}

impl DirectorySink {
    /// Create a sink writing into `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            staging_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Directory files are written to
    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }
}

#[async_trait]
impl DeliverySink for DirectorySink {
    async fn deliver(&self, name: &str, bytes: &[u8]) -> Result<Delivery> {
        let file_name = delivery_file_name(name);
        let final_path = self.output_dir.join(&file_name);
        let sequence = self.staging_seq.fetch_add(1, Ordering::Relaxed);
        let staging_path = self
            .output_dir
            .join(staging_file_name(std::process::id(), sequence));

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create output directory '{}': {}",
                        self.output_dir.display(),
                        e
                    ),
                ))
            })?;

        if let Err(e) = tokio::fs::write(&staging_path, bytes).await {
            tokio::fs::remove_file(&staging_path).await.ok();
            return Err(Error::Delivery {
                name: name.to_string(),
                reason: format!("failed to write {}: {}", staging_path.display(), e),
            });
        }

        if let Err(e) = tokio::fs::rename(&staging_path, &final_path).await {
            tokio::fs::remove_file(&staging_path).await.ok();
            return Err(Error::Delivery {
                name: name.to_string(),
                reason: format!("failed to move into {}: {}", final_path.display(), e),
            });
        }

        debug!(path = ?final_path, bytes = bytes.len(), "file written");

        Ok(Delivery {
            name: name.to_string(),
            bytes: bytes.len() as u64,
            location: Some(final_path),
        })
    }
}

/// Keeps every delivered entry in memory, in delivery order
#[derive(Debug, Default)]
pub struct MemorySink {
    delivered: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything delivered so far
    pub fn delivered(&self) -> Vec<(String, Vec<u8>)> {
        match self.delivered.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Names delivered so far
    pub fn names(&self) -> Vec<String> {
        self.delivered().into_iter().map(|(name, _)| name).collect()
    }
}

#[async_trait]
impl DeliverySink for MemorySink {
    async fn deliver(&self, name: &str, bytes: &[u8]) -> Result<Delivery> {
        let mut guard = match self.delivered.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push((name.to_string(), bytes.to_vec()));
        Ok(Delivery {
            name: name.to_string(),
            bytes: bytes.len() as u64,
            location: None,
        })
    }
}
