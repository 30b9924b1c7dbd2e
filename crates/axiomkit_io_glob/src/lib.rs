//! `axiomkit_io_glob` v1:
//! Rust-side glob option resolution and pattern traversal.
//!
//! Layout:
//! - `spec`    : option modifiers, resolved options, errors
//! - `pattern` : pattern splitting and segment compilation
//! - `walk`    : traversal entry points
//! - `util`    : shared helper functions

pub mod pattern;
pub mod spec;
pub mod walk;
mod util;

pub use pattern::{SpecGlobPattern, validate_pattern};
pub use spec::{GlobError, GlobOption, SpecGlobOptions, with_fail_on_io_errors};
pub use walk::{filepath_glob, glob, glob_walk};
