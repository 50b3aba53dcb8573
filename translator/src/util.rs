use std::path::{Path, PathBuf};

const JAVA_FILE_EXTENSION: &str = "java";

/// Char range of a line's text with surrounding whitespace left out.
pub(crate) fn content_span(line: &str) -> (usize, usize) {
    let start = line.len() - line.trim_start().len();
    let end = line.trim_end().len().max(start);
    (line[..start].chars().count(), line[..end].chars().count())
}

/// Where the rendered form of `source` goes when writing into `out_dir`.
///
/// The path of `source` below `root` is kept so that equally named files in
/// different packages don't overwrite each other.
pub(crate) fn output_path(root: &Path, out_dir: &Path, source: &Path) -> PathBuf {
    let relative = match source.strip_prefix(root) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => source
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| source.to_path_buf()),
    };
    out_dir.join(relative).with_extension(JAVA_FILE_EXTENSION)
}
