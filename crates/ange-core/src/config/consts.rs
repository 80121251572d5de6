//! Constants shared across the compiler

/// Substring marking a file as a template, removed to derive its output name
pub const TEMPLATE_MARKER: &str = ".ange";

/// Config file looked up in the working directory when none is given
pub const CONFIG_FILE_NAME: &str = "ange.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "ANGE_CONFIG";
