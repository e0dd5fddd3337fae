//! Archive loading
//!
//! Parses a ZIP archive held in memory into an ordered list of [`Entry`]
//! values. Directory entries are skipped; everything else becomes one entry
//! whose display name starts out equal to its path inside the archive.

mod entry;


pub use entry::{ContentHandle, Entry};

use crate::error::{ArchiveError, Result};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Parse ZIP bytes into the list of non-directory entries, in archive order
pub fn load_archive_bytes(bytes: Vec<u8>) -> Result<Vec<Entry>> {
    let data: Arc<[u8]> = Arc::from(bytes);
    let mut archive = zip::ZipArchive::new(Cursor::new(&data[..])).map_err(ArchiveError::from)?;

    let mut entries = Vec::with_capacity(archive.len());
    let mut skipped_dirs = 0usize;

    for i in 0..archive.len() {
        let file = archive.by_index(i).map_err(ArchiveError::from)?;

        if file.is_dir() {
            skipped_dirs += 1;
            continue;
        }

        let name = file.name().to_string();
        debug!(index = i, name = %name, size = file.size(), "found archive entry");

        entries.push(Entry {
            original_name: name.clone(),
            display_name: name.clone(),
            content: ContentHandle::new(Arc::clone(&data), i, name, file.size()),
        });
    }

    info!(
        entry_count = entries.len(),
        skipped_dirs,
        archive_bytes = data.len(),
        "archive loaded"
    );

    Ok(entries)
}

/// Read a ZIP archive from disk and parse it
///
/// Parsing happens on the blocking thread pool.
pub async fn load_archive_file(path: &Path) -> Result<Vec<Entry>> {
    debug!(?path, "reading archive");

    let bytes = tokio::fs::read(path).await.map_err(|e| ArchiveError::Open {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    tokio::task::spawn_blocking(move || load_archive_bytes(bytes))
        .await
        .map_err(|e| ArchiveError::Parse(format!("archive parsing task failed: {}", e)))?
}
