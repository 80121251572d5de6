pub mod consts;
pub mod model;

pub use model::{CompileConfig, Config, TemplatesConfig, WatchConfig};
