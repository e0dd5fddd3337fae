//! Shared test helpers for building archives and sessions in tests.

use crate::archive::{Entry, load_archive_bytes};
use crate::session::Session;
use std::io::{Cursor, Write};

/// Build an in-memory ZIP archive from `(path, content)` pairs.
///
/// Paths ending in `/` are added as directory entries.
pub(crate) fn zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, content) in files {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// Load entries from `(path, content)` pairs.
pub(crate) fn entries(files: &[(&str, &[u8])]) -> Vec<Entry> {
    load_archive_bytes(zip_bytes(files)).unwrap()
}

/// A session pre-populated with three small files.
pub(crate) fn sample_session() -> Session {
    let mut session = Session::new(" (copy)");
    session.replace_entries(entries(&[
        ("a.txt", b"alpha"),
        ("docs/b.txt", b"bravo"),
        ("c.bin", b"charlie"),
    ]));
    session
}
