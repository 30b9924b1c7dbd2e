use std::ffi::OsString;
use std::fs::FileType;
use std::io;
use std::path::{Path, PathBuf};

////////////////////////////////////////////////////////////////////////////////
// #region ErrorClassification

/// `true` when `err` means "the path is not there".
///
/// Such errors are a normal no-match outcome and never reach the I/O gate.
pub(crate) fn is_missing_path(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

/// One listed directory entry.
#[derive(Debug, Clone)]
pub(crate) struct SpecGlobEntry {
    pub(crate) name_entry: OsString,
    pub(crate) path_entry: PathBuf,
    pub(crate) cfg_file_type: FileType,
}

/// Join a root-relative path onto `path_dir_root` for filesystem access.
///
/// An empty relative path resolves to the root itself.
pub(crate) fn resolve_path(path_dir_root: &Path, path_rel: &Path) -> PathBuf {
    if path_rel.as_os_str().is_empty() {
        return path_dir_root.to_path_buf();
    }
    path_dir_root.join(path_rel)
}

/// Whether a segment contains glob meta characters.
pub(crate) fn has_meta(segment: &str) -> bool {
    segment.contains(['*', '?', '[', '{', '\\'])
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::{Path, PathBuf};

    use super::{has_meta, is_missing_path, resolve_path};

    #[test]
    fn missing_path_kinds() {
        assert!(is_missing_path(&io::Error::from(io::ErrorKind::NotFound)));
        assert!(is_missing_path(&io::Error::from(
            io::ErrorKind::NotADirectory
        )));
        assert!(!is_missing_path(&io::Error::from(
            io::ErrorKind::PermissionDenied
        )));
    }

    #[test]
    fn resolve_path_keeps_root_for_empty_relative() {
        let path_root = Path::new("/data");
        assert_eq!(resolve_path(path_root, Path::new("")), PathBuf::from("/data"));
        assert_eq!(
            resolve_path(path_root, Path::new("a/b")),
            PathBuf::from("/data/a/b")
        );
    }

    #[test]
    fn meta_detection() {
        assert!(has_meta("*.txt"));
        assert!(has_meta("file[0-9]"));
        assert!(has_meta("{a,b}"));
        assert!(has_meta("a\\*"));
        assert!(!has_meta("plain.txt"));
    }
}
