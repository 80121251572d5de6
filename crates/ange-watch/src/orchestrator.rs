//! Event stream → per-file compile tasks

use crate::event::WatchEvent;
use ange_core::{AngeError, CompileOutcome, Compiler, MatchPattern, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// Routes matching watch events to the compiler
///
/// Every accepted event gets its own task. Edits to the same file are not
/// serialized: the last write to finish wins.
pub struct Orchestrator {
    compiler: Arc<Compiler>,
    pattern: MatchPattern,
    ignore: Vec<Pattern>,
    override_output: Option<PathBuf>,
}

impl Orchestrator {
    pub fn new(compiler: Arc<Compiler>, pattern: MatchPattern) -> Self {
        Self {
            compiler,
            pattern,
            ignore: Vec::new(),
            override_output: None,
        }
    }

    /// File-name globs that never trigger a compile
    pub fn with_ignore(mut self, globs: &[String]) -> Result<Self> {
        self.ignore = globs
            .iter()
            .map(|glob| {
                Pattern::new(glob).map_err(|e| AngeError::InvalidPattern {
                    pattern: glob.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<_>>()?;
        Ok(self)
    }

    /// Output used for every compile (single-file inputs only)
    pub fn with_override(mut self, output: Option<PathBuf>) -> Self {
        self.override_output = output;
        self
    }

    pub fn accepts(&self, path: &Path) -> bool {
        if !self.pattern.matches(path) {
            return false;
        }
        let ignored = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.ignore.iter().any(|p| p.matches(name)));
        !ignored
    }

    /// Consume events until the stream ends, then wait for in-flight compiles
    pub async fn dispatch(&self, mut events: mpsc::UnboundedReceiver<WatchEvent>) {
        let mut tasks = JoinSet::new();

        while let Some(event) = events.recv().await {
            if !self.accepts(&event.path) {
                tracing::trace!("Ignoring {}", event.path.display());
                continue;
            }

            tracing::debug!("{} {}", event.kind, event.path.display());
            let compiler = Arc::clone(&self.compiler);
            let override_output = self.override_output.clone();
            tasks.spawn(async move {
                let outcome = compiler
                    .compile_file(&event.path, override_output.as_deref())
                    .await;
                log_outcome(&outcome);
            });

            while let Some(joined) = tasks.try_join_next() {
                log_join(joined);
            }
        }

        while let Some(joined) = tasks.join_next().await {
            log_join(joined);
        }
    }
}

/// Watch-mode reporting: every outcome goes to the log
pub fn log_outcome(outcome: &CompileOutcome) {
    match outcome {
        CompileOutcome::Written { template, output } => {
            tracing::info!("Compiled {} -> {}", template.display(), output.display());
        }
        // Already warned by the compiler
        CompileOutcome::SkippedAmbiguous(_) => {}
        CompileOutcome::Failed { template, error } => {
            tracing::error!("Failed to compile {}: {}", template.display(), error);
        }
    }
}

fn log_join(joined: std::result::Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        tracing::error!("Compile task aborted: {}", e);
    }
}
