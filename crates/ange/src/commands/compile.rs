//! One-shot compile

use crate::context::Context;
use ange_core::{CompileOutcome, InputSpec, run_once};
use anyhow::{Result, bail};
use colored::Colorize;

/// Compile everything `spec` names once and print a summary
///
/// # Errors
///
/// Returns an error when the input cannot be resolved, or in strict mode when
/// any template failed.
pub async fn run(ctx: &Context, spec: &InputSpec, strict: bool) -> Result<()> {
    let report = run_once(spec, &ctx.compiler).await?;

    if report.is_empty() {
        println!("{} No files matched '{}'", "→".cyan(), spec.raw_input);
        return Ok(());
    }

    for outcome in &report.outcomes {
        match outcome {
            CompileOutcome::Written { template, output } => println!(
                "{} {} -> {}",
                "✓".green().bold(),
                ctx.display_path(template),
                ctx.display_path(output)
            ),
            CompileOutcome::SkippedAmbiguous(template) => println!(
                "{} {} (no output path)",
                "-".yellow().bold(),
                ctx.display_path(template)
            ),
            CompileOutcome::Failed { template, error } => eprintln!(
                "{} {}: {}",
                "✗".red().bold(),
                ctx.display_path(template),
                error
            ),
        }
    }

    println!(
        "{} written, {} skipped, {} failed",
        report.written(),
        report.skipped(),
        report.failed()
    );

    if strict && report.failed() > 0 {
        bail!("{} template(s) failed to compile", report.failed());
    }

    Ok(())
}
