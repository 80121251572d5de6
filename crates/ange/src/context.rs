//! Global context for CLI commands

use ange_core::template::TemplateRenderer;
use ange_core::{Compiler, Config};
use anyhow::Result;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loaded configuration and the compiler built from it
pub struct Context {
    pub config: Config,
    pub compiler: Arc<Compiler>,
    pub cwd: PathBuf,
}

impl Context {
    /// Load `config_path`, or `ange.toml` in the working directory if present
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory is unavailable or the config
    /// file cannot be read or parsed.
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let cwd = env::current_dir()?;
        let config = Config::discover(config_path, &cwd)?;

        let renderer = TemplateRenderer::new(
            config.template_context(),
            config.templates.module_paths.clone(),
        );

        Ok(Self {
            config,
            compiler: Arc::new(Compiler::new(renderer)),
            cwd,
        })
    }

    /// Path relative to the working directory when it is below it
    pub fn display_path<'a>(&self, path: &'a Path) -> std::path::Display<'a> {
        path.strip_prefix(&self.cwd).unwrap_or(path).display()
    }
}
