use crate::error::SourceError;
use std::path::{Component, Path, PathBuf};

/// Extension appended to locations that don't carry one.
pub const DEFAULT_EXTENSION: &str = "lua";

/// Turn a caller-supplied location into an absolute script path.
///
/// A location without an extension gets `.{default_extension}` appended.
/// The result is joined onto `base_dir` (absolute locations ignore it) and
/// lexically normalized. Nothing is checked against the filesystem; a missing
/// file shows up when the source is read.
pub fn resolve(
    location: &str,
    base_dir: &Path,
    default_extension: &str,
) -> Result<PathBuf, SourceError> {
    if location.trim().is_empty() {
        return Err(SourceError::PathResolution {
            location: location.to_string(),
            reason: "location is empty".into(),
        });
    }

    let mut path = PathBuf::from(location);
    let extension = default_extension.trim_start_matches('.');
    if path.extension().is_none() && !extension.is_empty() {
        let mut with_ext = path.into_os_string();
        with_ext.push(".");
        with_ext.push(extension);
        path = PathBuf::from(with_ext);
    }

    let joined = base_dir.join(path);
    let absolute = if joined.is_absolute() {
        joined
    } else {
        let cwd = std::env::current_dir().map_err(|e| SourceError::PathResolution {
            location: location.to_string(),
            reason: format!("working directory unavailable: {}", e),
        })?;
        cwd.join(joined)
    };

    Ok(normalize(&absolute))
}

/// Final path component, used to name chunks in diagnostics.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Collapse `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            // popping past the root leaves the root in place
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_default_extension() {
        let path = resolve("foo", Path::new("/scripts"), "lua").unwrap();
        assert_eq!(path, PathBuf::from("/scripts/foo.lua"));
    }

    #[test]
    fn test_with_and_without_extension_match() {
        let base = Path::new("/scripts/legacy");
        assert_eq!(
            resolve("foo", base, DEFAULT_EXTENSION).unwrap(),
            resolve("foo.lua", base, DEFAULT_EXTENSION).unwrap()
        );
    }

    #[test]
    fn test_existing_extension_kept() {
        let path = resolve("vendor/lib.min.js", Path::new("/app"), "lua").unwrap();
        assert_eq!(path, PathBuf::from("/app/vendor/lib.min.js"));
    }

    #[test]
    fn test_leading_dot_in_extension_tolerated() {
        let path = resolve("foo", Path::new("/app"), ".txt").unwrap();
        assert_eq!(path, PathBuf::from("/app/foo.txt"));
    }

    #[test]
    fn test_parent_segments_collapse() {
        let path = resolve("../shared/./util", Path::new("/app/src"), "lua").unwrap();
        assert_eq!(path, PathBuf::from("/app/shared/util.lua"));
    }

    #[test]
    fn test_parent_past_root_stays_at_root() {
        let path = resolve("../../../etc/init", Path::new("/a"), "lua").unwrap();
        assert_eq!(path, PathBuf::from("/etc/init.lua"));
    }

    #[test]
    fn test_absolute_location_ignores_base() {
        let path = resolve("/opt/scripts/boot", Path::new("/elsewhere"), "lua").unwrap();
        assert_eq!(path, PathBuf::from("/opt/scripts/boot.lua"));
    }

    #[test]
    fn test_relative_base_becomes_absolute() {
        let path = resolve("foo", Path::new(""), "lua").unwrap();
        assert!(path.is_absolute());
        assert_eq!(path.file_name().unwrap(), "foo.lua");
    }

    #[test]
    fn test_empty_location_rejected() {
        let err = resolve("  ", Path::new("/app"), "lua").unwrap_err();
        assert!(matches!(err, SourceError::PathResolution { .. }));
        assert_eq!(err.io_kind(), None);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/app/scripts/boot.lua")), "boot.lua");
    }
}
