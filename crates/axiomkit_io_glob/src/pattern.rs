//! Pattern splitting and per-segment compilation.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};

use crate::spec::GlobError;
use crate::util::has_meta;

const C_SEGMENT_RECURSIVE: &str = "**";

/// One compiled non-literal segment.
#[derive(Debug, Clone)]
pub(crate) enum EnumGlobSegment {
    /// `**`: zero or more directories.
    Recursive,
    /// Single path component matched against entry names.
    Wildcard(GlobMatcher),
}

/// A parsed glob pattern: literal base directory plus compiled segments.
///
/// Segments are separated by `/`. Leading segments without meta
/// characters form the base, which is looked up directly instead of being
/// matched against directory listings.
#[derive(Debug, Clone)]
pub struct SpecGlobPattern {
    path_base: PathBuf,
    l_segments: Vec<EnumGlobSegment>,
    if_match_nothing: bool,
}

impl SpecGlobPattern {
    /// Parse `pattern`. Syntax errors are returned as
    /// [`GlobError::InvalidPattern`].
    pub fn parse(pattern: &str) -> Result<Self, GlobError> {
        if pattern.is_empty() {
            return Ok(Self {
                path_base: PathBuf::new(),
                l_segments: Vec::new(),
                if_match_nothing: true,
            });
        }

        let mut path_base = PathBuf::new();
        let mut l_segments: Vec<EnumGlobSegment> = Vec::new();
        for segment in pattern.split('/') {
            if segment.is_empty() {
                return Err(GlobError::InvalidPattern(format!(
                    "Empty path segment in `{pattern}`"
                )));
            }
            if l_segments.is_empty() && !has_meta(segment) {
                path_base.push(segment);
                continue;
            }
            if segment == C_SEGMENT_RECURSIVE {
                if matches!(l_segments.last(), Some(EnumGlobSegment::Recursive)) {
                    continue;
                }
                l_segments.push(EnumGlobSegment::Recursive);
                continue;
            }
            l_segments.push(EnumGlobSegment::Wildcard(_compile_segment(segment)?));
        }

        Ok(Self {
            path_base,
            l_segments,
            if_match_nothing: false,
        })
    }

    /// Literal directory prefix, relative to the walk root.
    pub fn path_base(&self) -> &Path {
        &self.path_base
    }

    /// `true` when no path can ever match (empty pattern).
    pub fn is_match_nothing(&self) -> bool {
        self.if_match_nothing
    }

    /// `true` when the pattern has no wildcard segments.
    pub fn is_literal(&self) -> bool {
        self.l_segments.is_empty()
    }

    pub(crate) fn segments(&self) -> &[EnumGlobSegment] {
        &self.l_segments
    }
}

fn _compile_segment(segment: &str) -> Result<GlobMatcher, GlobError> {
    let matcher = GlobBuilder::new(segment)
        .literal_separator(true)
        .backslash_escape(true)
        .build()
        .map_err(|e| GlobError::InvalidPattern(format!("`{segment}`: {e}")))?
        .compile_matcher();
    Ok(matcher)
}

/// `true` when `pattern` parses.
pub fn validate_pattern(pattern: &str) -> bool {
    SpecGlobPattern::parse(pattern).is_ok()
}
