//! Template engine implementation

mod blocks;
mod helpers;
mod tokenize;

use crate::template::error::TemplateError;
use crate::template::module::{ModuleLoader, NoModules};
use std::time::{Duration, Instant};
use toml::Value;

use blocks::{parse, Node, Pos};
use helpers::{bind, escape_html, is_truthy, resolve_key, stringify_value, Expr};

/// Maximum duration for template rendering (malformed input protection)
const RENDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Check if rendering has exceeded the timeout
fn check_timeout(start: Instant) -> Result<(), TemplateError> {
    let elapsed = start.elapsed();
    if elapsed >= RENDER_TIMEOUT {
        return Err(TemplateError::Timeout {
            max_duration: RENDER_TIMEOUT,
            elapsed,
        });
    }
    Ok(())
}

/// Template context holding TOML data for rendering
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    data: toml::Table,
}

impl TemplateContext {
    /// Create a new template context from a TOML table
    pub fn new(data: toml::Table) -> Self {
        Self { data }
    }

    /// Get the underlying TOML table
    pub fn data(&self) -> &toml::Table {
        &self.data
    }
}

/// Template engine rendering `<% %>` templates against TOML data
///
/// `L` provides the modules a template may `require`.
pub struct TemplateEngine<L = NoModules> {
    loader: L,
}

impl TemplateEngine<NoModules> {
    /// Create a new template engine without module support
    pub fn new() -> Self {
        Self { loader: NoModules }
    }
}

impl Default for TemplateEngine<NoModules> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ModuleLoader> TemplateEngine<L> {
    /// Create a template engine that resolves `require` through `loader`
    pub fn with_loader(loader: L) -> Self {
        Self { loader }
    }

    /// Render a template with the given context
    pub fn render(
        &self,
        template: &str,
        context: &TemplateContext,
    ) -> Result<String, TemplateError> {
        let nodes = parse(template)?;
        let mut render = Render {
            loader: &self.loader,
            start: Instant::now(),
            output: String::with_capacity(template.len()),
        };
        let mut scope = context.data().clone();
        render.nodes(&nodes, &mut scope)?;
        Ok(render.output)
    }
}

/// Rendering state for one `render` call
struct Render<'l, L> {
    loader: &'l L,
    start: Instant,
    output: String,
}

impl<L: ModuleLoader> Render<'_, L> {
    fn nodes(&mut self, nodes: &[Node<'_>], scope: &mut toml::Table) -> Result<(), TemplateError> {
        for node in nodes {
            check_timeout(self.start)?;
            self.node(node, scope)?;
        }
        Ok(())
    }

    fn node(&mut self, node: &Node<'_>, scope: &mut toml::Table) -> Result<(), TemplateError> {
        match node {
            Node::Text(text) => self.output.push_str(text),
            Node::Output {
                expr,
                source,
                escape,
                pos,
            } => {
                let value = self.eval(expr, scope, *pos)?;
                let text = stringify_value(&value).map_err(|kind| TemplateError::NotPrintable {
                    expr: source.clone(),
                    kind,
                    line: pos.line,
                    column: pos.column,
                })?;
                if *escape {
                    self.output.push_str(&escape_html(&text));
                } else {
                    self.output.push_str(&text);
                }
            }
            Node::Each {
                expr,
                source,
                var,
                body,
                pos,
            } => {
                let value = self.eval(expr, scope, *pos)?;
                let Value::Array(items) = value else {
                    return Err(TemplateError::NotIterable {
                        expr: source.clone(),
                        line: pos.line,
                        column: pos.column,
                    });
                };
                for item in items {
                    let mut loop_scope = bind(scope, var, item);
                    self.nodes(body, &mut loop_scope)?;
                }
            }
            Node::If {
                cond,
                then,
                otherwise,
                pos,
            } => {
                let branch = match self.eval_optional(cond, scope, *pos)? {
                    Some(value) if is_truthy(&value) => then,
                    _ => otherwise,
                };
                let mut branch_scope = scope.clone();
                self.nodes(branch, &mut branch_scope)?;
            }
            Node::Require {
                specifier,
                name,
                pos,
            } => {
                let module = self.require(specifier, *pos)?;
                scope.insert(name.clone(), module);
            }
        }
        Ok(())
    }

    /// Evaluate an expression; undefined keys are errors
    fn eval(&self, expr: &Expr, scope: &toml::Table, pos: Pos) -> Result<Value, TemplateError> {
        self.eval_optional(expr, scope, pos)?.ok_or_else(|| {
            let key = match expr {
                Expr::Path(key) => key.clone(),
                Expr::Require { path, .. } => path.clone().unwrap_or_default(),
                _ => String::new(),
            };
            TemplateError::UndefinedKey {
                key,
                line: pos.line,
                column: pos.column,
            }
        })
    }

    /// Evaluate an expression; undefined keys yield `None` (used by `if`)
    fn eval_optional(
        &self,
        expr: &Expr,
        scope: &toml::Table,
        pos: Pos,
    ) -> Result<Option<Value>, TemplateError> {
        match expr {
            Expr::Str(s) => Ok(Some(Value::String(s.clone()))),
            Expr::Int(i) => Ok(Some(Value::Integer(*i))),
            Expr::Bool(b) => Ok(Some(Value::Boolean(*b))),
            Expr::Path(key) => {
                let (head, rest) = match key.split_once('.') {
                    Some((head, rest)) => (head, Some(rest)),
                    None => (key.as_str(), None),
                };
                let Some(root) = scope.get(head) else {
                    return Ok(None);
                };
                Ok(match rest {
                    Some(rest) => resolve_key(root, rest).cloned(),
                    None => Some(root.clone()),
                })
            }
            Expr::Require { specifier, path } => {
                let module = self.require(specifier, pos)?;
                Ok(match path {
                    Some(path) => resolve_key(&module, path).cloned(),
                    None => Some(module),
                })
            }
        }
    }

    fn require(&self, specifier: &str, pos: Pos) -> Result<Value, TemplateError> {
        self.loader
            .load(specifier)
            .map_err(|reason| TemplateError::Module {
                specifier: specifier.to_string(),
                reason,
                line: pos.line,
                column: pos.column,
            })
    }
}

/// Convenience function to render a template without module support
pub fn render(template: &str, context: &TemplateContext) -> Result<String, TemplateError> {
    TemplateEngine::new().render(template, context)
}

#[cfg(test)]
mod tests;
