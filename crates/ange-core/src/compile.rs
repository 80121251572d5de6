//! Compilation pipeline: read → render → resolve output → re-encode → write

use crate::error::{AngeError, Result};
use crate::input::{InputKind, InputSpec, ResolvedInput};
use crate::line_ending::LineEnding;
use crate::output::{self, OutputResolution};
use crate::template::TemplateRenderer;
use futures_util::future::join_all;
use std::path::{Path, PathBuf};

/// Result of compiling one template
#[derive(Debug)]
pub enum CompileOutcome {
    Written { template: PathBuf, output: PathBuf },
    /// No directive and no template marker: nothing was written
    SkippedAmbiguous(PathBuf),
    Failed { template: PathBuf, error: AngeError },
}

impl CompileOutcome {
    pub fn template(&self) -> &Path {
        match self {
            CompileOutcome::Written { template, .. }
            | CompileOutcome::SkippedAmbiguous(template)
            | CompileOutcome::Failed { template, .. } => template,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CompileOutcome::Failed { .. })
    }
}

/// Compiles template files with a shared renderer
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    renderer: TemplateRenderer,
}

impl Compiler {
    pub fn new(renderer: TemplateRenderer) -> Self {
        Self { renderer }
    }

    /// Compile one template, writing to `override_output` when given
    ///
    /// Never fails as a whole; every error is folded into the outcome.
    pub async fn compile_file(
        &self,
        template: &Path,
        override_output: Option<&Path>,
    ) -> CompileOutcome {
        match self.try_compile(template, override_output).await {
            Ok(Some(output)) => {
                tracing::debug!("Wrote {} -> {}", template.display(), output.display());
                CompileOutcome::Written {
                    template: template.to_path_buf(),
                    output,
                }
            }
            Ok(None) => {
                tracing::warn!(
                    "Skipping {}: add an '<%# output: <path> %>' directive or '.ange' to the file name",
                    template.display()
                );
                CompileOutcome::SkippedAmbiguous(template.to_path_buf())
            }
            Err(error) => CompileOutcome::Failed {
                template: template.to_path_buf(),
                error,
            },
        }
    }

    /// Compile every path concurrently; one outcome per path
    pub async fn compile_files(&self, templates: &[PathBuf]) -> Vec<CompileOutcome> {
        join_all(
            templates
                .iter()
                .map(|template| self.compile_file(template, None)),
        )
        .await
    }

    async fn try_compile(
        &self,
        template: &Path,
        override_output: Option<&Path>,
    ) -> Result<Option<PathBuf>> {
        let content = tokio::fs::read_to_string(template)
            .await
            .map_err(|e| AngeError::io(template, e))?;

        let rendered = self
            .renderer
            .render(template, &content)
            .map_err(|source| AngeError::Render {
                path: template.to_path_buf(),
                source,
            })?;

        let output = match override_output {
            Some(path) => path.to_path_buf(),
            None => match output::resolve(template, &content) {
                OutputResolution::Directive(path) | OutputResolution::Convention(path) => path,
                OutputResolution::Ambiguous => return Ok(None),
            },
        };

        let encoded = LineEnding::detect(&content).apply(&rendered);
        tokio::fs::write(&output, encoded)
            .await
            .map_err(|e| AngeError::io(&output, e))?;

        Ok(Some(output))
    }
}

/// Outcomes of a one-shot compile
#[derive(Debug)]
pub struct BatchReport {
    pub kind: InputKind,
    pub outcomes: Vec<CompileOutcome>,
}

impl BatchReport {
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, CompileOutcome::Written { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, CompileOutcome::SkippedAmbiguous(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(CompileOutcome::is_failed)
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    fn count(&self, predicate: impl Fn(&CompileOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(o)).count()
    }
}

/// Explicit output for a resolved input, warning when it cannot apply
pub fn effective_override<'a>(spec: &'a InputSpec, resolved: &ResolvedInput) -> Option<&'a Path> {
    let output = spec.explicit_output.as_deref()?;
    match resolved.kind {
        InputKind::SingleFile => Some(output),
        InputKind::MultiMatch => {
            tracing::warn!(
                "Ignoring output {}: input '{}' may match multiple files",
                output.display(),
                spec.raw_input
            );
            None
        }
    }
}

/// Resolve the input and compile everything it names once
///
/// Only input resolution errors are returned; per-file failures end up in
/// the report.
pub async fn run_once(spec: &InputSpec, compiler: &Compiler) -> Result<BatchReport> {
    let resolved = spec.resolve()?;
    run_resolved(spec, &resolved, compiler).await
}

/// [`run_once`] for an input that was already resolved
pub async fn run_resolved(
    spec: &InputSpec,
    resolved: &ResolvedInput,
    compiler: &Compiler,
) -> Result<BatchReport> {
    let override_output = effective_override(spec, resolved);

    if resolved.files.is_empty() {
        tracing::info!("No files matched '{}'", spec.raw_input);
    }

    let outcomes = match override_output {
        Some(output) => {
            let mut outcomes = Vec::with_capacity(resolved.files.len());
            for template in &resolved.files {
                outcomes.push(compiler.compile_file(template, Some(output)).await);
            }
            outcomes
        }
        None => compiler.compile_files(&resolved.files).await,
    };

    Ok(BatchReport {
        kind: resolved.kind,
        outcomes,
    })
}
