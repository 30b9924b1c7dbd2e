//! Directory traversal driven by a parsed pattern and resolved options.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use globset::GlobMatcher;
use tracing::{debug, trace};

use crate::pattern::{EnumGlobSegment, SpecGlobPattern};
use crate::spec::{GlobError, GlobOption, SpecGlobOptions};
use crate::util::{SpecGlobEntry, is_missing_path, resolve_path};

struct SpecGlobContext<F> {
    path_dir_root: PathBuf,
    spec_glob_options: SpecGlobOptions,
    set_visited_matches: HashSet<PathBuf>,
    cnt_dirs_read: u64,
    fn_visit: F,
}

impl<F> SpecGlobContext<F> {
    fn new(path_dir_root: PathBuf, spec_glob_options: SpecGlobOptions, fn_visit: F) -> Self {
        Self {
            path_dir_root,
            spec_glob_options,
            set_visited_matches: HashSet::new(),
            cnt_dirs_read: 0,
            fn_visit,
        }
    }
}

/// Collect every path under `dir_root` matching `pattern`.
///
/// Returned paths are relative to `dir_root`, in walk order (depth-first,
/// entries sorted by name). A root segment that does not exist yields an
/// empty list.
///
/// With [`crate::with_fail_on_io_errors`] the first I/O error aborts the
/// call and matches collected so far are discarded. Without it, unreadable
/// subtrees contribute no matches.
pub fn glob<P, I>(
    dir_root: P,
    pattern: &str,
    glob_options: I,
) -> Result<Vec<PathBuf>, GlobError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = GlobOption>,
{
    let mut l_matches = Vec::new();
    glob_walk(
        dir_root,
        pattern,
        |path_match| {
            l_matches.push(path_match.to_path_buf());
            Ok(())
        },
        glob_options,
    )?;
    Ok(l_matches)
}

/// Call `fn_visit` for every path under `dir_root` matching `pattern`.
///
/// Paths passed to `fn_visit` are relative to `dir_root`. An error returned
/// by `fn_visit` stops the walk and is returned unchanged; it does not go
/// through the I/O-error policy.
pub fn glob_walk<P, F, I>(
    dir_root: P,
    pattern: &str,
    fn_visit: F,
    glob_options: I,
) -> Result<(), GlobError>
where
    P: AsRef<Path>,
    F: FnMut(&Path) -> Result<(), GlobError>,
    I: IntoIterator<Item = GlobOption>,
{
    let spec_glob_options = SpecGlobOptions::build(glob_options);
    let spec_glob_pat = SpecGlobPattern::parse(pattern)?;
    trace!(
        pattern,
        opts = %spec_glob_options.describe(),
        "Glob walk started"
    );

    let mut spec_glob_ctx =
        SpecGlobContext::new(dir_root.as_ref().to_path_buf(), spec_glob_options, fn_visit);
    let res_walk = walk_pattern(&spec_glob_pat, &mut spec_glob_ctx);
    if let Err(GlobError::Io { path, source }) = &res_walk {
        debug!(path = %path.display(), error = %source, "Glob walk aborted on I/O error");
    }
    res_walk
}

/// Glob against the OS filesystem with an OS-style `pattern`.
///
/// Relative patterns resolve against the current directory and yield
/// relative paths; absolute patterns yield absolute paths. A pattern with
/// no components past its root (`/`, `.`) matches that root itself.
pub fn filepath_glob<I>(pattern: &str, glob_options: I) -> Result<Vec<PathBuf>, GlobError>
where
    I: IntoIterator<Item = GlobOption>,
{
    let mut path_dir_root = PathBuf::new();
    let mut l_parts: Vec<String> = Vec::new();
    for component in Path::new(pattern).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                path_dir_root.push(component.as_os_str());
            }
            Component::CurDir => {}
            Component::ParentDir => l_parts.push("..".to_string()),
            Component::Normal(part) => l_parts.push(part.to_string_lossy().to_string()),
        }
    }
    if l_parts.is_empty() {
        if pattern.is_empty() {
            return Ok(Vec::new());
        }
        if path_dir_root.as_os_str().is_empty() {
            path_dir_root.push(".");
        }
        return match_root_itself(path_dir_root, SpecGlobOptions::build(glob_options));
    }
    let pattern_rel = l_parts.join("/");

    if path_dir_root.as_os_str().is_empty() {
        return glob(".", &pattern_rel, glob_options);
    }
    let l_matches = glob(&path_dir_root, &pattern_rel, glob_options)?;
    Ok(l_matches
        .into_iter()
        .map(|path_rel| path_dir_root.join(path_rel))
        .collect())
}

fn match_root_itself(
    path_dir_root: PathBuf,
    spec_glob_options: SpecGlobOptions,
) -> Result<Vec<PathBuf>, GlobError> {
    match fs::metadata(&path_dir_root) {
        Ok(_) => Ok(vec![path_dir_root]),
        Err(e) if is_missing_path(&e) => Ok(Vec::new()),
        Err(e) => {
            spec_glob_options.reconcile_io_error(Err(GlobError::Io {
                path: path_dir_root,
                source: e,
            }))?;
            Ok(Vec::new())
        }
    }
}

fn walk_pattern<F>(
    spec_glob_pat: &SpecGlobPattern,
    spec_glob_ctx: &mut SpecGlobContext<F>,
) -> Result<(), GlobError>
where
    F: FnMut(&Path) -> Result<(), GlobError>,
{
    if spec_glob_pat.is_match_nothing() {
        return Ok(());
    }

    let path_rel_base = spec_glob_pat.path_base();
    let path_abs_base = resolve_path(&spec_glob_ctx.path_dir_root, path_rel_base);
    let meta_base = match fs::metadata(&path_abs_base) {
        Ok(v) => v,
        Err(e) if is_missing_path(&e) => return Ok(()),
        Err(e) => return reconcile_io_error(spec_glob_ctx, path_abs_base, e),
    };

    if spec_glob_pat.is_literal() {
        return visit_match(path_rel_base, spec_glob_ctx);
    }
    if !meta_base.is_dir() {
        return Ok(());
    }
    walk_segments(path_rel_base, spec_glob_pat.segments(), spec_glob_ctx)
}

fn walk_segments<F>(
    path_rel_dir: &Path,
    l_segments: &[EnumGlobSegment],
    spec_glob_ctx: &mut SpecGlobContext<F>,
) -> Result<(), GlobError>
where
    F: FnMut(&Path) -> Result<(), GlobError>,
{
    let Some((segment_head, l_segments_rest)) = l_segments.split_first() else {
        return visit_match(path_rel_dir, spec_glob_ctx);
    };

    let matcher = match segment_head {
        EnumGlobSegment::Recursive => {
            return walk_recursive(path_rel_dir, l_segments_rest, spec_glob_ctx);
        }
        EnumGlobSegment::Wildcard(matcher) => matcher,
    };

    let l_entries = list_directory(path_rel_dir, spec_glob_ctx)?;
    walk_matching_entries(path_rel_dir, &l_entries, matcher, l_segments_rest, spec_glob_ctx)
}

fn walk_matching_entries<F>(
    path_rel_dir: &Path,
    l_entries: &[SpecGlobEntry],
    matcher: &GlobMatcher,
    l_segments_rest: &[EnumGlobSegment],
    spec_glob_ctx: &mut SpecGlobContext<F>,
) -> Result<(), GlobError>
where
    F: FnMut(&Path) -> Result<(), GlobError>,
{
    for spec_entry in l_entries {
        if !matcher.is_match(Path::new(&spec_entry.name_entry)) {
            continue;
        }
        let path_rel_entry = path_rel_dir.join(&spec_entry.name_entry);
        if l_segments_rest.is_empty() {
            visit_match(&path_rel_entry, spec_glob_ctx)?;
            continue;
        }
        if is_entry_dir(spec_entry, true, spec_glob_ctx)? {
            walk_segments(&path_rel_entry, l_segments_rest, spec_glob_ctx)?;
        }
    }
    Ok(())
}

fn walk_recursive<F>(
    path_rel_dir: &Path,
    l_segments_rest: &[EnumGlobSegment],
    spec_glob_ctx: &mut SpecGlobContext<F>,
) -> Result<(), GlobError>
where
    F: FnMut(&Path) -> Result<(), GlobError>,
{
    let l_entries = list_directory(path_rel_dir, spec_glob_ctx)?;
    match l_segments_rest.split_first() {
        // Trailing `**` matches the directory itself and everything below it.
        None => {
            if !path_rel_dir.as_os_str().is_empty() {
                visit_match(path_rel_dir, spec_glob_ctx)?;
            }
        }
        Some((EnumGlobSegment::Wildcard(matcher), l_segments_after)) => {
            walk_matching_entries(
                path_rel_dir,
                &l_entries,
                matcher,
                l_segments_after,
                spec_glob_ctx,
            )?;
        }
        Some((EnumGlobSegment::Recursive, _)) => {
            walk_segments(path_rel_dir, l_segments_rest, spec_glob_ctx)?;
        }
    }

    for spec_entry in &l_entries {
        let path_rel_entry = path_rel_dir.join(&spec_entry.name_entry);
        if is_entry_dir(spec_entry, false, spec_glob_ctx)? {
            walk_recursive(&path_rel_entry, l_segments_rest, spec_glob_ctx)?;
        } else if l_segments_rest.is_empty() {
            visit_match(&path_rel_entry, spec_glob_ctx)?;
        }
    }
    Ok(())
}

fn list_directory<F>(
    path_rel_dir: &Path,
    spec_glob_ctx: &mut SpecGlobContext<F>,
) -> Result<Vec<SpecGlobEntry>, GlobError> {
    spec_glob_ctx.cnt_dirs_read += 1;
    let path_abs_dir = resolve_path(&spec_glob_ctx.path_dir_root, path_rel_dir);
    let iter_entries = match fs::read_dir(&path_abs_dir) {
        Ok(iter) => iter,
        Err(e) if is_missing_path(&e) => return Ok(Vec::new()),
        Err(e) => {
            reconcile_io_error(spec_glob_ctx, path_abs_dir, e)?;
            return Ok(Vec::new());
        }
    };

    let mut l_entries: Vec<SpecGlobEntry> = Vec::new();
    for _entry_res in iter_entries {
        let entry = match _entry_res {
            Ok(v) => v,
            Err(e) if is_missing_path(&e) => continue,
            Err(e) => {
                reconcile_io_error(spec_glob_ctx, path_abs_dir.clone(), e)?;
                continue;
            }
        };
        let cfg_file_type = match entry.file_type() {
            Ok(v) => v,
            Err(e) if is_missing_path(&e) => continue,
            Err(e) => {
                reconcile_io_error(spec_glob_ctx, entry.path(), e)?;
                continue;
            }
        };
        l_entries.push(SpecGlobEntry {
            name_entry: entry.file_name(),
            path_entry: entry.path(),
            cfg_file_type,
        });
    }

    l_entries.sort_by(|a, b| a.name_entry.cmp(&b.name_entry));
    Ok(l_entries)
}

fn is_entry_dir<F>(
    spec_entry: &SpecGlobEntry,
    if_follow_symlinks: bool,
    spec_glob_ctx: &SpecGlobContext<F>,
) -> Result<bool, GlobError> {
    if spec_entry.cfg_file_type.is_dir() {
        return Ok(true);
    }
    if !spec_entry.cfg_file_type.is_symlink() || !if_follow_symlinks {
        return Ok(false);
    }
    match fs::metadata(&spec_entry.path_entry) {
        Ok(meta_target) => Ok(meta_target.is_dir()),
        Err(e) if is_missing_path(&e) => Ok(false),
        Err(e) => {
            reconcile_io_error(spec_glob_ctx, spec_entry.path_entry.clone(), e)?;
            Ok(false)
        }
    }
}

fn visit_match<F>(
    path_rel: &Path,
    spec_glob_ctx: &mut SpecGlobContext<F>,
) -> Result<(), GlobError>
where
    F: FnMut(&Path) -> Result<(), GlobError>,
{
    if !spec_glob_ctx.set_visited_matches.insert(path_rel.to_path_buf()) {
        return Ok(());
    }
    (spec_glob_ctx.fn_visit)(path_rel)
}

/// Missing paths are a no-match and never reach the options gate.
fn reconcile_io_error<F>(
    spec_glob_ctx: &SpecGlobContext<F>,
    path: PathBuf,
    source: io::Error,
) -> Result<(), GlobError> {
    if is_missing_path(&source) {
        return Ok(());
    }
    let spec_glob_options = &spec_glob_ctx.spec_glob_options;
    if !spec_glob_options.is_fail_on_io_errors() {
        debug!(path = %path.display(), error = %source, "I/O error suppressed, subtree skipped");
    }
    spec_glob_options.reconcile_io_error(Err(GlobError::Io { path, source }))
}
