//! Watch mode: recompile templates as they are written

mod event;
mod orchestrator;
mod source;

pub use event::{WatchEvent, WatchEventKind, classify};
pub use orchestrator::{Orchestrator, log_outcome};
pub use source::EventSource;

use ange_core::compile::run_resolved;
use ange_core::{Compiler, InputKind, InputSpec, Result};
use std::sync::Arc;

/// Compile what currently matches, then recompile on every write
///
/// Returns only on setup failure; the loop itself runs until the process ends.
pub async fn watch(spec: &InputSpec, compiler: Arc<Compiler>, ignore: &[String]) -> Result<()> {
    let resolved = spec.resolve()?;
    let override_output = match resolved.kind {
        InputKind::SingleFile => spec.explicit_output.clone(),
        InputKind::MultiMatch => None,
    };

    let orchestrator = Orchestrator::new(Arc::clone(&compiler), resolved.pattern.clone())
        .with_ignore(ignore)?
        .with_override(override_output);

    // Subscribe first so edits made during the initial pass are not lost
    let (_source, events) = EventSource::subscribe(&resolved.pattern)?;

    let report = run_resolved(spec, &resolved, &compiler).await?;
    for outcome in &report.outcomes {
        log_outcome(outcome);
    }

    tracing::info!("Watching {} for changes", resolved.pattern.as_str());
    orchestrator.dispatch(events).await;
    Ok(())
}
