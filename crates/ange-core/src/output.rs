//! Output path resolution
//!
//! A template names its destination either with a directive comment
//!
//! ```text
//! <%# output: ../dist/config.json -%>
//! ```
//!
//! or, by convention, through its own file name: `name.ange.ext` → `name.ext`.

use crate::config::consts::TEMPLATE_MARKER;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// `<%# output: <path> %>` or `<%# output: <path> -%>` at the start of a line
static OUTPUT_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t]*<%#[ \t]*output:[ \t]*(\S+?)[ \t]*-?%>").expect("valid directive pattern")
});

/// Where a template's rendered output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputResolution {
    /// Named by an `output:` directive
    Directive(PathBuf),
    /// Derived from the file name by removing the template marker
    Convention(PathBuf),
    /// Neither a directive nor the template marker
    Ambiguous,
}

impl OutputResolution {
    pub fn path(&self) -> Option<&Path> {
        match self {
            OutputResolution::Directive(path) | OutputResolution::Convention(path) => Some(path),
            OutputResolution::Ambiguous => None,
        }
    }
}

/// Extract the path token of the first output directive in `content`
pub fn find_directive(content: &str) -> Option<&str> {
    OUTPUT_DIRECTIVE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Resolve the output path of the template at `template_path`
///
/// Directive paths resolve relative to the template's directory.
pub fn resolve(template_path: &Path, content: &str) -> OutputResolution {
    let template_dir = template_path.parent().unwrap_or_else(|| Path::new(""));

    if let Some(token) = find_directive(content) {
        return OutputResolution::Directive(template_dir.join(token));
    }

    match template_path.file_name().and_then(|name| name.to_str()) {
        Some(name) if name.contains(TEMPLATE_MARKER) => {
            let output_name = name.replacen(TEMPLATE_MARKER, "", 1);
            OutputResolution::Convention(template_dir.join(output_name))
        }
        _ => OutputResolution::Ambiguous,
    }
}
