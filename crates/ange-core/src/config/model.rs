use crate::error::{AngeError, Result};
use crate::template::TemplateContext;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// ange.toml schema
///
/// Every section is optional; an absent file is the same as an empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub compile: CompileConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub watch: WatchConfig,
    /// Initial template context
    #[serde(default)]
    pub data: toml::Table,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompileConfig {
    /// Discover templates in subdirectories by default
    #[serde(default)]
    pub recursive: bool,
    /// Exit non-zero when any template fails to compile
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Search roots for bare `require` specifiers, relative to the config file
    #[serde(default)]
    pub module_paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// File-name globs that never trigger a compile in watch mode
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            ignore: default_ignore(),
        }
    }
}

fn default_ignore() -> Vec<String> {
    vec![
        "*.swp".to_string(),
        "*.tmp".to_string(),
        "*~".to_string(),
        ".DS_Store".to_string(),
    ]
}

impl Config {
    /// Read ange.toml
    ///
    /// Relative `module_paths` are made absolute against the file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| AngeError::ConfigRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| AngeError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for module_path in &mut config.templates.module_paths {
            if module_path.is_relative() {
                *module_path = base.join(&*module_path);
            }
        }

        Ok(config)
    }

    /// Load an explicit config file, or `ange.toml` in `dir` if it exists
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let default_path = dir.join(super::consts::CONFIG_FILE_NAME);
        if default_path.is_file() {
            tracing::debug!("Using config file {}", default_path.display());
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Template context built from the `[data]` table
    pub fn template_context(&self) -> TemplateContext {
        TemplateContext::new(self.data.clone())
    }
}
