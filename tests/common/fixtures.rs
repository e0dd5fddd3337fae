//! Archive fixtures and test configuration

use std::io::{Cursor, Write};
use std::path::Path;
use std::time::Duration;
use zip_rename_dl::Config;

/// Files of the standard test archive, directories included
pub const BUNDLE: &[(&str, &[u8])] = &[
    ("bundle/", b""),
    ("bundle/readme.txt", b"read me first"),
    ("bundle/data/", b""),
    ("bundle/data/numbers.csv", b"1,2,3\n4,5,6\n"),
    ("bundle/data/blob.bin", &[0, 159, 146, 150, 255]),
    ("notes.md", b"# Notes\n"),
];

/// Number of non-directory entries in [`BUNDLE`]
pub const BUNDLE_FILE_COUNT: usize = 4;

/// Build an in-memory ZIP archive; paths ending in `/` become directories
pub fn zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
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

/// Write [`BUNDLE`] to `dir/bundle.zip` and return its path
pub fn write_bundle(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("bundle.zip");
    std::fs::write(&path, zip_bytes(BUNDLE)).unwrap();
    path
}

/// Config writing into `output_dir` with the given step delay
pub fn test_config(output_dir: &Path, step_delay: Duration) -> Config {
    let mut config = Config::default();
    config.delivery.output_dir = output_dir.to_path_buf();
    config.delivery.step_delay = step_delay;
    config
}
