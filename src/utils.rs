//! Utility functions for turning display names into file names

/// File name used when a display name maps to nothing usable
const FALLBACK_FILE_NAME: &str = "download";

/// Map a display name to a single path component
///
/// Delivered files always land directly inside the output directory, the same
/// way a browser saves a download: path separators (and NUL) become `_`, and
/// names that would refer to a directory (`""`, `"."`, `".."`) are replaced
/// with a fallback. Leading and trailing whitespace is trimmed.
///
/// # Examples
///
/// ```
/// use zip_rename_dl::utils::delivery_file_name;
///
/// assert_eq!(delivery_file_name("docs/guide.md"), "docs_guide.md");
/// assert_eq!(delivery_file_name("report (copy).pdf"), "report (copy).pdf");
/// assert_eq!(delivery_file_name(".."), "download");
/// ```
#[must_use]
pub fn delivery_file_name(display_name: &str) -> String {
    let mapped: String = display_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            other => other,
        })
        .collect();

    match mapped.as_str() {
        "" | "." | ".." => FALLBACK_FILE_NAME.to_string(),
        _ => mapped,
    }
}

/// Name of the transient staging file used while an entry is being written
///
/// The name does not depend on the entry's own name, so it stays short even
/// when the final file name is at the file system's length limit. `process`
/// and `sequence` keep concurrent writers into one directory apart.
///
/// # Examples
///
/// ```
/// use zip_rename_dl::utils::staging_file_name;
///
/// assert_eq!(staging_file_name(42, 7), ".zrd-42-7.partial");
/// ```
#[must_use]
pub fn staging_file_name(process: u32, sequence: u64) -> String {
    format!(".zrd-{}-{}.partial", process, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(delivery_file_name("movie.mkv"), "movie.mkv");
        assert_eq!(delivery_file_name("a b c.txt"), "a b c.txt");
    }

    #[test]
    fn separators_are_flattened() {
        assert_eq!(delivery_file_name("a/b/c.txt"), "a_b_c.txt");
        assert_eq!(delivery_file_name(r"a\b.txt"), "a_b.txt");
        assert_eq!(delivery_file_name("../../etc/passwd"), ".._.._etc_passwd");
    }

    #[test]
    fn directory_like_names_fall_back() {
        assert_eq!(delivery_file_name(""), "download");
        assert_eq!(delivery_file_name("   "), "download");
        assert_eq!(delivery_file_name("."), "download");
        assert_eq!(delivery_file_name(".."), "download");
    }

    #[test]
    fn whitespace_is_trimmed() {
        assert_eq!(delivery_file_name("  notes.txt \n"), "notes.txt");
    }

    #[test]
    fn staging_name_is_hidden_and_suffixed() {
        let name = staging_file_name(1234, 0);
        assert!(name.starts_with('.'));
        assert!(name.ends_with(".partial"));
        assert_ne!(name, staging_file_name(1234, 1));
    }
}
