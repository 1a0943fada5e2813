use crate::error::SourceError;
use std::path::Path;
use tracing::trace;

const BOM: char = '\u{FEFF}';

/// Read a script as UTF-8, dropping a leading byte-order mark.
///
/// Invalid sequences are replaced with U+FFFD rather than rejected.
pub fn read(path: &Path) -> Result<String, SourceError> {
    let bytes = std::fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            trace!("Replacing invalid UTF-8 in {}", path.display());
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    if text.starts_with(BOM) {
        trace!("Stripping byte-order mark from {}", path.display());
        text.drain(..BOM.len_utf8());
    }

    Ok(text)
}

/// Remove a single leading U+FEFF, if present.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BOM).unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_read_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.lua");
        std::fs::write(&path, "value = 1\n").unwrap();
        assert_eq!(read(&path).unwrap(), "value = 1\n");
    }

    #[test]
    fn test_read_strips_utf8_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.lua");
        std::fs::write(&path, b"\xEF\xBB\xBFvalue = 1").unwrap();
        let text = read(&path).unwrap();
        assert!(!text.starts_with(BOM));
        assert_eq!(text, "value = 1");
    }

    #[test]
    fn test_only_one_bom_removed() {
        assert_eq!(strip_bom("\u{FEFF}\u{FEFF}x"), "\u{FEFF}x");
        assert_eq!(strip_bom("x\u{FEFF}"), "x\u{FEFF}");
        assert_eq!(strip_bom(""), "");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read(&dir.path().join("nope.lua")).unwrap_err();
        assert_eq!(err.io_kind(), Some(ErrorKind::NotFound));
    }

    #[test]
    fn test_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read(dir.path()).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.lua");
        std::fs::write(&path, b"\xEF\xBB\xBFname = '\xE9'").unwrap();
        assert_eq!(read(&path).unwrap(), "name = '\u{FFFD}'");
    }
}
