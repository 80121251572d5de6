//! Helper functions for template rendering

use toml::Value;

use super::blocks::is_identifier;

/// A parsed tag expression
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    /// `key` or `nested.key`
    Path(String),
    /// `"text"`
    Str(String),
    Int(i64),
    Bool(bool),
    /// `require("./module")` with an optional `.nested.key` suffix
    Require {
        specifier: String,
        path: Option<String>,
    },
}

/// Parse the expression of an output tag or statement
pub(crate) fn parse_expr(source: &str) -> Result<Expr, String> {
    let source = source.trim();
    if source.is_empty() {
        return Err("Empty expression".to_string());
    }

    if source.starts_with('"') {
        return match split_string_literal(source) {
            Some((value, "")) => Ok(Expr::Str(value)),
            Some((_, rest)) => Err(format!("Unexpected '{}' after string literal", rest.trim())),
            None => Err(format!("Unterminated string literal in '{}'", source)),
        };
    }

    if let Some(call) = source.strip_prefix("require") {
        if call.trim_start().starts_with('(') {
            return parse_require_call(call.trim_start(), source);
        }
    }

    match source {
        "true" => return Ok(Expr::Bool(true)),
        "false" => return Ok(Expr::Bool(false)),
        _ => {}
    }

    if let Ok(value) = source.parse::<i64>() {
        return Ok(Expr::Int(value));
    }

    if is_key_path(source) {
        Ok(Expr::Path(source.to_string()))
    } else {
        Err(format!("Invalid expression '{}'", source))
    }
}

/// Parse `("spec")` or `("spec").key.path` following the `require` keyword
fn parse_require_call(call: &str, source: &str) -> Result<Expr, String> {
    let invalid = || format!("Invalid require call '{}'", source);

    let inner = call.strip_prefix('(').ok_or_else(invalid)?.trim_start();
    let (specifier, rest) = split_string_literal(inner).ok_or_else(invalid)?;
    let rest = rest.trim_start().strip_prefix(')').ok_or_else(invalid)?.trim();

    let path = if rest.is_empty() {
        None
    } else {
        let key = rest.strip_prefix('.').ok_or_else(invalid)?;
        if !is_key_path(key) {
            return Err(invalid());
        }
        Some(key.to_string())
    };

    Ok(Expr::Require { specifier, path })
}

/// Split a leading double-quoted string literal off `text`
///
/// Supports `\"`, `\\`, `\n` and `\t` escapes. Returns the unescaped value
/// and the text following the closing quote.
pub(crate) fn split_string_literal(text: &str) -> Option<(String, &str)> {
    let body = text.trim_start().strip_prefix('"')?;
    let mut value = String::new();
    let mut chars = body.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((value, &body[i + 1..])),
            '\\' => match chars.next()? {
                (_, 'n') => value.push('\n'),
                (_, 't') => value.push('\t'),
                (_, other) => value.push(other),
            },
            other => value.push(other),
        }
    }

    None
}

fn is_key_path(source: &str) -> bool {
    source.split('.').all(is_identifier)
}

/// Resolve a nested key from TOML data
pub(crate) fn resolve_key<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    let mut current = data;

    for part in key.split('.') {
        current = match current {
            Value::Table(table) => table.get(part)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Stringify a TOML scalar for template output
///
/// Returns the kind name ("array"/"table") for compound values.
pub(crate) fn stringify_value(value: &Value) -> Result<String, &'static str> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(dt) => Ok(dt.to_string()),
        Value::Array(_) => Err("array"),
        Value::Table(_) => Err("table"),
    }
}

/// Truthiness used by `if` blocks
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.is_empty(),
        Value::Integer(i) => *i != 0,
        Value::Float(f) => *f != 0.0,
        Value::Boolean(b) => *b,
        Value::Datetime(_) => true,
        Value::Array(a) => !a.is_empty(),
        Value::Table(t) => !t.is_empty(),
    }
}

/// Escape text for `<%= %>` output
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Clone a scope table with an extra variable binding
pub(crate) fn bind(scope: &toml::Table, name: &str, value: Value) -> toml::Table {
    let mut table = scope.clone();
    table.insert(name.to_string(), value);
    table
}
