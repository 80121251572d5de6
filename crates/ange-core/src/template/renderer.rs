//! File-aware rendering: wires the template's directory into module resolution

use crate::template::engine::{TemplateContext, TemplateEngine};
use crate::template::error::TemplateError;
use crate::template::module::FileModuleLoader;
use std::path::{Path, PathBuf};

/// Renders template files with a shared data context
#[derive(Debug, Clone, Default)]
pub struct TemplateRenderer {
    context: TemplateContext,
    module_paths: Vec<PathBuf>,
}

impl TemplateRenderer {
    /// `module_paths` are searched, in order, for bare `require` specifiers
    pub fn new(context: TemplateContext, module_paths: Vec<PathBuf>) -> Self {
        Self {
            context,
            module_paths,
        }
    }

    /// Render `content`, read from `template_path`
    ///
    /// Relative `require` specifiers resolve against the template's directory.
    pub fn render(&self, template_path: &Path, content: &str) -> Result<String, TemplateError> {
        let base_dir = template_path.parent().unwrap_or_else(|| Path::new("."));
        let loader = FileModuleLoader::new(base_dir, self.module_paths.clone());
        TemplateEngine::with_loader(loader).render(content, &self.context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_require_relative_to_template_not_cwd() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("site").join("pages");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("meta.toml"), "title = \"Home\"\n").unwrap();

        let template_path = nested.join("index.ange.html");
        let renderer = TemplateRenderer::default();
        let out = renderer
            .render(
                &template_path,
                "<% require \"./meta.toml\" as meta -%>\n<h1><%= meta.title %></h1>\n",
            )
            .unwrap();

        assert_eq!(out, "<h1>Home</h1>\n");
    }

    #[test]
    fn test_context_data_is_available() {
        let mut data = toml::Table::new();
        data.insert("project".to_string(), toml::Value::String("ange".to_string()));
        let renderer = TemplateRenderer::new(TemplateContext::new(data), vec![]);

        let out = renderer
            .render(Path::new("/tmp/readme.ange.md"), "# <%= project %>")
            .unwrap();
        assert_eq!(out, "# ange");
    }

    #[test]
    fn test_missing_module_reports_position() {
        let temp = TempDir::new().unwrap();
        let renderer = TemplateRenderer::default();
        let err = renderer
            .render(
                &temp.path().join("a.ange"),
                "line one\n  <%- require(\"./nope.txt\") %>",
            )
            .unwrap_err();

        assert_eq!(err.position(), Some((2, 3)));
        assert!(matches!(err, TemplateError::Module { .. }));
    }
}
