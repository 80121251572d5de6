//! Module resolution for `require`
//!
//! Templates load auxiliary data or text through a [`ModuleLoader`]. The file
//! loader resolves `./` and `../` specifiers against the directory of the
//! template being rendered, so a template can pull in its siblings no matter
//! which directory `ange` was started from.

use std::path::{Path, PathBuf};
use toml::Value;

/// Capability handed to the engine for `require`
pub trait ModuleLoader {
    /// Load the module named by `specifier` as a template value
    ///
    /// The error string is reported to the user together with the tag position.
    fn load(&self, specifier: &str) -> Result<Value, String>;
}

/// Loader for engines rendering strings without a backing file
#[derive(Debug, Clone, Copy, Default)]
pub struct NoModules;

impl ModuleLoader for NoModules {
    fn load(&self, _specifier: &str) -> Result<Value, String> {
        Err("modules are not available in this context".to_string())
    }
}

/// Loads modules from the filesystem
///
/// - `./x`, `../x`: relative to `base_dir` (the template's directory)
/// - `/abs/x`: as is
/// - `x`: first hit in `search_paths`, then the working directory
///
/// `.toml` files become tables, `.json` files are converted to TOML values,
/// everything else is loaded as a string.
#[derive(Debug, Clone)]
pub struct FileModuleLoader {
    base_dir: PathBuf,
    search_paths: Vec<PathBuf>,
}

impl FileModuleLoader {
    pub fn new(base_dir: impl Into<PathBuf>, search_paths: Vec<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            search_paths,
        }
    }

    /// Resolve a specifier to a file path without reading it
    pub fn resolve(&self, specifier: &str) -> Result<PathBuf, String> {
        if specifier.is_empty() {
            return Err("empty module specifier".to_string());
        }

        if specifier.starts_with('.') {
            return Ok(self.base_dir.join(specifier));
        }

        let path = Path::new(specifier);
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }

        let cwd = std::env::current_dir().map_err(|e| e.to_string())?;
        self.search_paths
            .iter()
            .chain(std::iter::once(&cwd))
            .map(|root| root.join(path))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| "module not found in module paths or working directory".to_string())
    }
}

impl ModuleLoader for FileModuleLoader {
    fn load(&self, specifier: &str) -> Result<Value, String> {
        let path = self.resolve(specifier)?;
        tracing::debug!("Loading module '{}' from {}", specifier, path.display());

        let content = std::fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => content
                .parse::<toml::Table>()
                .map(Value::Table)
                .map_err(|e| format!("invalid TOML in {}: {}", path.display(), e)),
            Some("json") => serde_json::from_str::<serde_json::Value>(&content)
                .map(|json| {
                    json_to_toml(json).unwrap_or_else(|| Value::Table(toml::Table::new()))
                })
                .map_err(|e| format!("invalid JSON in {}: {}", path.display(), e)),
            _ => Ok(Value::String(content)),
        }
    }
}

/// Convert JSON to a template value
///
/// TOML has no null: null object members and array elements are dropped.
fn json_to_toml(json: serde_json::Value) -> Option<Value> {
    use serde_json::Value as Json;

    match json {
        Json::Null => None,
        Json::Bool(b) => Some(Value::Boolean(b)),
        Json::Number(n) => n
            .as_i64()
            .map(Value::Integer)
            .or_else(|| n.as_f64().map(Value::Float)),
        Json::String(s) => Some(Value::String(s)),
        Json::Array(items) => Some(Value::Array(
            items.into_iter().filter_map(json_to_toml).collect(),
        )),
        Json::Object(members) => Some(Value::Table(
            members
                .into_iter()
                .filter_map(|(key, value)| json_to_toml(value).map(|value| (key, value)))
                .collect(),
        )),
    }
}

impl<L: ModuleLoader + ?Sized> ModuleLoader for &L {
    fn load(&self, specifier: &str) -> Result<Value, String> {
        (**self).load(specifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_relative_specifier_uses_template_dir() {
        let temp = TempDir::new().unwrap();
        let loader = FileModuleLoader::new(temp.path(), vec![]);

        let resolved = loader.resolve("./helpers/data.toml").unwrap();
        assert_eq!(resolved, temp.path().join("./helpers/data.toml"));

        let resolved = loader.resolve("../shared.txt").unwrap();
        assert_eq!(resolved, temp.path().join("../shared.txt"));
    }

    #[test]
    fn test_bare_specifier_searches_module_paths() {
        let temp = TempDir::new().unwrap();
        let lib = temp.path().join("lib");
        fs::create_dir(&lib).unwrap();
        fs::write(lib.join("site.toml"), "name = \"docs\"\n").unwrap();

        let loader = FileModuleLoader::new(temp.path().join("templates"), vec![lib.clone()]);
        assert_eq!(loader.resolve("site.toml").unwrap(), lib.join("site.toml"));

        let value = loader.load("site.toml").unwrap();
        assert_eq!(value.get("name").and_then(Value::as_str), Some("docs"));
    }

    #[test]
    fn test_bare_specifier_not_found() {
        let temp = TempDir::new().unwrap();
        let loader = FileModuleLoader::new(temp.path(), vec![temp.path().to_path_buf()]);
        let err = loader.resolve("definitely-missing-module.toml").unwrap_err();
        assert!(err.contains("not found"));
    }

    #[test]
    fn test_load_by_extension() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("pkg.json"), r#"{"version": "1.2.3", "tags": ["a"]}"#).unwrap();
        fs::write(temp.path().join("banner.txt"), "hello\n").unwrap();

        let loader = FileModuleLoader::new(temp.path(), vec![]);

        let json = loader.load("./pkg.json").unwrap();
        assert_eq!(json.get("version").and_then(Value::as_str), Some("1.2.3"));

        let text = loader.load("./banner.txt").unwrap();
        assert_eq!(text.as_str(), Some("hello\n"));
    }

    #[test]
    fn test_json_nulls_are_dropped() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("pkg.json"),
            r#"{"name": "ange", "license": null, "keywords": ["a", null, "b"], "size": 1.5}"#,
        )
        .unwrap();

        let loader = FileModuleLoader::new(temp.path(), vec![]);
        let value = loader.load("./pkg.json").unwrap();
        assert_eq!(value.get("name").and_then(Value::as_str), Some("ange"));
        assert!(value.get("license").is_none());
        assert_eq!(
            value.get("keywords").and_then(Value::as_array).map(Vec::len),
            Some(2)
        );
        assert_eq!(value.get("size").and_then(Value::as_float), Some(1.5));

        fs::write(temp.path().join("nothing.json"), "null").unwrap();
        let empty = loader.load("./nothing.json").unwrap();
        assert_eq!(empty.as_table().map(toml::Table::len), Some(0));
    }

    #[test]
    fn test_invalid_toml_module() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("bad.toml"), "name = ").unwrap();

        let loader = FileModuleLoader::new(temp.path(), vec![]);
        let err = loader.load("./bad.toml").unwrap_err();
        assert!(err.contains("invalid TOML"));
    }

    #[test]
    fn test_no_modules_rejects() {
        assert!(NoModules.load("./anything").is_err());
    }
}
