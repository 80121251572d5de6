//! Input resolution: a path or glob from the command line → template files
//!
//! - existing file: that file alone ([`InputKind::SingleFile`])
//! - existing directory: files carrying the template marker, one level deep or
//!   recursively
//! - anything else: a glob, anchored at the base directory when relative

use crate::config::consts::TEMPLATE_MARKER;
use crate::error::{AngeError, Result};
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// What the user asked to compile
#[derive(Debug, Clone, Default)]
pub struct InputSpec {
    pub raw_input: String,
    pub recursive: bool,
    pub watch: bool,
    pub explicit_output: Option<PathBuf>,
}

impl InputSpec {
    pub fn new(raw_input: impl Into<String>) -> Self {
        Self {
            raw_input: raw_input.into(),
            ..Self::default()
        }
    }

    /// Resolve against the process working directory
    pub fn resolve(&self) -> Result<ResolvedInput> {
        resolve(&self.raw_input, self.recursive)
    }
}

/// Whether the input named one file or a set of matches
///
/// Only a single file may have its output overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    SingleFile,
    MultiMatch,
}

#[derive(Debug, Clone)]
pub struct ResolvedInput {
    pub kind: InputKind,
    /// Absolute, sorted, deduplicated
    pub files: Vec<PathBuf>,
    pub pattern: MatchPattern,
}

/// Matcher shared by one-shot expansion and watch-event filtering
#[derive(Debug, Clone)]
pub struct MatchPattern {
    root: PathBuf,
    glob: Pattern,
    recursive_root: bool,
    marker_filter: bool,
}

impl MatchPattern {
    /// Narrowest existing directory that contains every match
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether matches can live below `root`'s immediate children
    pub fn is_recursive(&self) -> bool {
        self.recursive_root
    }

    pub fn as_str(&self) -> &str {
        self.glob.as_str()
    }

    /// Test a path reported by a listing or a filesystem event
    pub fn matches(&self, path: &Path) -> bool {
        if !self.glob.matches_path_with(path, MATCH_OPTIONS) {
            return false;
        }
        !self.marker_filter || path_has_marker(path)
    }

    /// List the regular files currently matching
    ///
    /// Broken symlinks and unreadable entries are skipped.
    pub fn expand(&self) -> Result<Vec<PathBuf>> {
        let entries =
            glob::glob_with(self.glob.as_str(), MATCH_OPTIONS).map_err(|e| AngeError::InvalidPattern {
                pattern: self.glob.as_str().to_string(),
                reason: e.to_string(),
            })?;

        let mut files = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) => {
                    if path.is_file() && (!self.marker_filter || path_has_marker(&path)) {
                        files.push(path);
                    }
                }
                Err(e) => tracing::debug!("Skipping unreadable entry: {}", e),
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    fn new(root: PathBuf, glob: String, recursive_root: bool, marker_filter: bool) -> Result<Self> {
        let glob = Pattern::new(&glob).map_err(|e| AngeError::InvalidPattern {
            pattern: glob.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            root,
            glob,
            recursive_root,
            marker_filter,
        })
    }
}

/// Resolve `raw_input` against the process working directory
pub fn resolve(raw_input: &str, recursive: bool) -> Result<ResolvedInput> {
    let cwd = std::env::current_dir().map_err(|e| AngeError::io(".", e))?;
    resolve_in(&cwd, raw_input, recursive)
}

/// Resolve `raw_input` with relative inputs anchored at `base`
pub fn resolve_in(base: &Path, raw_input: &str, recursive: bool) -> Result<ResolvedInput> {
    let path = base.join(raw_input);

    match std::fs::metadata(&path) {
        Ok(meta) if meta.is_file() => resolve_file(&path),
        Ok(meta) if meta.is_dir() => resolve_dir(&path, recursive),
        Ok(_) => Err(AngeError::InvalidInput(raw_input.to_string())),
        Err(_) if !has_glob_meta(raw_input) => Err(AngeError::InputNotFound(raw_input.to_string())),
        Err(_) => resolve_glob(&path, raw_input),
    }
}

fn resolve_file(path: &Path) -> Result<ResolvedInput> {
    let name = path
        .file_name()
        .ok_or_else(|| AngeError::InvalidInput(path.display().to_string()))?;
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let root = canonical_dir(parent)?;
    let file = root.join(name);

    let glob = join_glob(&root, &Pattern::escape(&utf8(name)?))?;
    let pattern = MatchPattern::new(root, glob, false, false)?;

    tracing::debug!("Resolved single file {}", file.display());
    Ok(ResolvedInput {
        kind: InputKind::SingleFile,
        files: vec![file],
        pattern,
    })
}

fn resolve_dir(path: &Path, recursive: bool) -> Result<ResolvedInput> {
    let root = canonical_dir(path)?;
    let tail = if recursive {
        format!("**{}*{}*", MAIN_SEPARATOR, TEMPLATE_MARKER)
    } else {
        format!("*{}*", TEMPLATE_MARKER)
    };
    let glob = join_glob(&root, &tail)?;
    let pattern = MatchPattern::new(root, glob, recursive, true)?;
    let files = pattern.expand()?;

    tracing::debug!(
        "Directory pattern '{}' matched {} file(s)",
        pattern.as_str(),
        files.len()
    );
    Ok(ResolvedInput {
        kind: InputKind::MultiMatch,
        files,
        pattern,
    })
}

fn resolve_glob(path: &Path, raw_input: &str) -> Result<ResolvedInput> {
    // Validate the glob as the user wrote it before touching the filesystem
    Pattern::new(raw_input).map_err(|e| AngeError::InvalidPattern {
        pattern: raw_input.to_string(),
        reason: e.to_string(),
    })?;

    let mut literal = PathBuf::new();
    let mut rest: Vec<String> = Vec::new();
    for component in path.components() {
        let text = utf8(component.as_os_str())?;
        if rest.is_empty() && !has_glob_meta(&text) {
            literal.push(component);
        } else {
            rest.push(text);
        }
    }

    // Climb to the nearest existing directory
    while !literal.is_dir() {
        let Some(name) = literal.file_name() else {
            break;
        };
        rest.insert(0, utf8(name)?);
        literal.pop();
    }

    let root = canonical_dir(if literal.as_os_str().is_empty() {
        Path::new(".")
    } else {
        &literal
    })?;
    let recursive_root = rest.len() > 1 || rest.iter().any(|part| part.contains("**"));
    let glob = join_glob(&root, &rest.join(&MAIN_SEPARATOR.to_string()))?;
    let pattern = MatchPattern::new(root, glob, recursive_root, false)?;
    let files = pattern.expand()?;

    tracing::debug!(
        "Glob '{}' matched {} file(s)",
        pattern.as_str(),
        files.len()
    );
    Ok(ResolvedInput {
        kind: InputKind::MultiMatch,
        files,
        pattern,
    })
}

/// `name.ange` or `name.ange.ext`, but not `name.angel`
pub fn has_template_marker(name: &str) -> bool {
    name.match_indices(TEMPLATE_MARKER).any(|(i, marker)| {
        let after = &name[i + marker.len()..];
        after.is_empty() || after.starts_with('.')
    })
}

fn path_has_marker(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(has_template_marker)
}

fn has_glob_meta(text: &str) -> bool {
    text.contains(|c: char| matches!(c, '*' | '?' | '['))
}

fn canonical_dir(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(|e| AngeError::io(path, e))
}

fn utf8(text: &std::ffi::OsStr) -> Result<String> {
    text.to_str()
        .map(str::to_string)
        .ok_or_else(|| AngeError::InvalidInput(text.to_string_lossy().into_owned()))
}

/// Escaped `root` followed by an unescaped glob tail
fn join_glob(root: &Path, tail: &str) -> Result<String> {
    let mut glob = Pattern::escape(&utf8(root.as_os_str())?);
    if !glob.ends_with(MAIN_SEPARATOR) {
        glob.push(MAIN_SEPARATOR);
    }
    glob.push_str(tail);
    Ok(glob)
}
