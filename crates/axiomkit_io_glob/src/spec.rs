//! Glob option models and top-level error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region OptionModifiers

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnumGlobOptionKind {
    FailOnIoErrors,
}

/// One behavior modifier accepted by [`crate::glob`], [`crate::glob_walk`]
/// and [`crate::filepath_glob`].
///
/// Values are opaque: obtain them from the `with_*` factories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobOption(EnumGlobOptionKind);

impl GlobOption {
    fn apply(self, spec_glob_options: &mut SpecGlobOptions) {
        match self.0 {
            EnumGlobOptionKind::FailOnIoErrors => spec_glob_options.fail_on_io_errors = true,
        }
    }
}

/// Abort and return I/O errors when they are encountered during traversal.
///
/// A pattern that references a path that does not exist (such as
/// `nonexistent/path/*`) is not an I/O error: it is a pattern with no
/// matches.
pub fn with_fail_on_io_errors() -> GlobOption {
    GlobOption(EnumGlobOptionKind::FailOnIoErrors)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Resolved options for one glob call.
///
/// Built once from a sequence of [`GlobOption`] and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecGlobOptions {
    fail_on_io_errors: bool,
}

impl SpecGlobOptions {
    /// Apply `glob_options` in order on top of the zero value.
    pub fn build<I>(glob_options: I) -> Self
    where
        I: IntoIterator<Item = GlobOption>,
    {
        let mut spec_glob_options = Self::default();
        for glob_option in glob_options {
            glob_option.apply(&mut spec_glob_options);
        }
        spec_glob_options
    }

    /// Whether I/O errors abort the call.
    pub fn is_fail_on_io_errors(&self) -> bool {
        self.fail_on_io_errors
    }

    /// Gate for filesystem errors other than "not found".
    ///
    /// Returns `res` unchanged in strict mode, `Ok(())` otherwise.
    pub fn reconcile_io_error<E>(&self, res: Result<(), E>) -> Result<(), E> {
        if self.fail_on_io_errors {
            return res;
        }
        Ok(())
    }

    /// Stable one-line summary of the active options.
    pub fn describe(&self) -> String {
        if self.fail_on_io_errors {
            return "opts: with_fail_on_io_errors".to_string();
        }
        "opts: none".to_string()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Failures returned by glob entry points.
#[derive(Debug, Error)]
pub enum GlobError {
    /// Malformed pattern; reported before any filesystem access.
    #[error("Invalid glob pattern: {0}")]
    InvalidPattern(String),
    /// Filesystem failure at `path` (never "not found").
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read when the error occurred.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Walk stopped by the visitor callback.
    #[error("Glob walk aborted: {0}")]
    Aborted(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
