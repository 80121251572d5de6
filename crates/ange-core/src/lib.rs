// Core modules
pub mod compile;
pub mod config;
pub mod error;
pub mod input;
pub mod line_ending;
pub mod output;
pub mod template;

// Re-export commonly used types
pub use compile::{run_once, BatchReport, CompileOutcome, Compiler};
pub use config::Config;
pub use error::{AngeError, Result};
pub use input::{InputKind, InputSpec, MatchPattern, ResolvedInput};
pub use line_ending::LineEnding;
