//! Watch mode

use crate::context::Context;
use ange_core::InputSpec;
use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

/// Watch until the process is stopped
pub async fn run(ctx: &Context, spec: &InputSpec) -> Result<()> {
    println!(
        "{} Watching '{}' (press Ctrl+C to stop)",
        "→".cyan(),
        spec.raw_input
    );
    ange_watch::watch(spec, Arc::clone(&ctx.compiler), &ctx.config.watch.ignore).await?;
    Ok(())
}
