use crate::error::{ArchiveError, Result};
use std::io::{Cursor, Read};
use std::sync::Arc;

/// Opaque handle to one entry's compressed bytes inside a loaded archive
///
/// Cloning a handle is cheap: every handle produced by one load shares the
/// same archive buffer. Copies made by duplicating an entry therefore point at
/// the very same content.
#[derive(Clone)]
pub struct ContentHandle {
    archive: Arc<[u8]>,
    index: usize,
    name: String,
    size: u64,
}

impl ContentHandle {
    pub(crate) fn new(archive: Arc<[u8]>, index: usize, name: String, size: u64) -> Self {
        Self {
            archive,
            index,
            name,
            size,
        }
    }

    /// Position of the entry in the archive's central directory
    pub fn index(&self) -> usize {
        self.index
    }

    /// Uncompressed size recorded in the archive
    pub fn size(&self) -> u64 {
        self.size
    }

    /// True when both handles refer to the same entry of the same loaded archive
    pub fn same_content(&self, other: &ContentHandle) -> bool {
        Arc::ptr_eq(&self.archive, &other.archive) && self.index == other.index
    }

    /// Decompress the entry into memory
    pub fn materialize(&self) -> Result<Vec<u8>> {
        let mut archive = zip::ZipArchive::new(Cursor::new(&self.archive[..]))
            .map_err(ArchiveError::from)?;
        let mut file = archive
            .by_index(self.index)
            .map_err(|e| self.entry_error(e.to_string()))?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| self.entry_error(e.to_string()))?;
        Ok(contents)
    }

    /// Decompress the entry on the blocking thread pool
    pub async fn materialize_async(&self) -> Result<Vec<u8>> {
        let handle = self.clone();
        tokio::task::spawn_blocking(move || handle.materialize())
            .await
            .map_err(|e| self.entry_error(format!("decompression task failed: {}", e)))?
    }

    fn entry_error(&self, reason: String) -> crate::error::Error {
        ArchiveError::Entry {
            name: self.name.clone(),
            reason,
        }
        .into()
    }
}

impl std::fmt::Debug for ContentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentHandle")
            .field("index", &self.index)
            .field("name", &self.name)
            .field("size", &self.size)
            .field("archive_len", &self.archive.len())
            .finish()
    }
}

/// One file of the source archive
#[derive(Clone, Debug)]
pub struct Entry {
    /// Path of the file inside the archive, never changed after loading
    pub original_name: String,
    /// User-editable name used as the delivery file name
    pub display_name: String,
    /// Handle to the compressed bytes
    pub content: ContentHandle,
}

impl Entry {
    /// Name the entry is delivered under
    ///
    /// Falls back to the original name when the display name has been cleared.
    pub fn download_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.original_name
        } else {
            &self.display_name
        }
    }
}
