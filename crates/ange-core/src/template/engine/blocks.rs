//! Block structure: turns the flat token stream into nested nodes
//!
//! `each` and `if` blocks are matched with their closing `/each` and `/if`
//! tags here, so the renderer only ever walks well-formed trees.

use super::helpers::{parse_expr, split_string_literal, Expr};
use super::tokenize::{Token, TokenKind, TokenStream};
use crate::template::error::TemplateError;

/// Deepest allowed `each`/`if` nesting; parsing and rendering recurse per level
pub(crate) const MAX_NESTING: usize = 64;

/// Tag position, used for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pos {
    pub line: usize,
    pub column: usize,
}

impl Pos {
    fn of(token: &Token) -> Self {
        Self {
            line: token.line,
            column: token.column,
        }
    }

    pub fn malformed(self, message: impl Into<String>) -> TemplateError {
        TemplateError::MalformedSyntax {
            message: message.into(),
            line: self.line,
            column: self.column,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node<'a> {
    Text(&'a str),
    Output {
        expr: Expr,
        source: String,
        escape: bool,
        pos: Pos,
    },
    Each {
        expr: Expr,
        source: String,
        var: String,
        body: Vec<Node<'a>>,
        pos: Pos,
    },
    If {
        cond: Expr,
        then: Vec<Node<'a>>,
        otherwise: Vec<Node<'a>>,
        pos: Pos,
    },
    Require {
        specifier: String,
        name: String,
        pos: Pos,
    },
}

/// What ended a run of nodes
#[derive(Debug, PartialEq)]
enum Terminator {
    Eof,
    EndEach(Pos),
    EndIf(Pos),
    Else(Pos),
}

/// Parse a whole template into a node tree
pub(crate) fn parse(template: &str) -> Result<Vec<Node<'_>>, TemplateError> {
    let mut parser = Parser {
        template,
        tokens: TokenStream::new(template),
        cursor: 0,
        trim_next: false,
        depth: 0,
    };
    let (nodes, terminator) = parser.parse_nodes()?;
    match terminator {
        Terminator::Eof => Ok(nodes),
        Terminator::EndEach(pos) => Err(pos.malformed("Unexpected <% /each %> without matching each")),
        Terminator::EndIf(pos) => Err(pos.malformed("Unexpected <% /if %> without matching if")),
        Terminator::Else(pos) => Err(pos.malformed("Unexpected <% else %> outside of an if block")),
    }
}

struct Parser<'a> {
    template: &'a str,
    tokens: TokenStream<'a>,
    /// Byte position right after the last consumed token
    cursor: usize,
    /// The previous tag was closed with `-%>`
    trim_next: bool,
    /// Number of currently open blocks
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Parse the body of a block opened at `pos`
    fn parse_block(&mut self, pos: Pos) -> Result<(Vec<Node<'a>>, Terminator), TemplateError> {
        if self.depth >= MAX_NESTING {
            return Err(pos.malformed(format!(
                "Blocks nested deeper than {} levels",
                MAX_NESTING
            )));
        }
        self.depth += 1;
        let parsed = self.parse_nodes();
        self.depth -= 1;
        parsed
    }

    /// Push the text between the cursor and `end`, honoring a pending trim
    fn push_text(&mut self, nodes: &mut Vec<Node<'a>>, end: usize) {
        let mut text = &self.template[self.cursor..end];
        if self.trim_next {
            text = text
                .strip_prefix("\r\n")
                .or_else(|| text.strip_prefix('\n'))
                .unwrap_or(text);
            self.trim_next = false;
        }
        if !text.is_empty() {
            nodes.push(Node::Text(text));
        }
    }

    fn parse_nodes(&mut self) -> Result<(Vec<Node<'a>>, Terminator), TemplateError> {
        let mut nodes = Vec::new();

        while let Some(token) = self.tokens.next() {
            self.push_text(&mut nodes, token.start);
            self.cursor = token.end();
            self.trim_next = token.trim_newline;
            let pos = Pos::of(&token);

            match token.kind {
                TokenKind::Literal => nodes.push(Node::Text("<%")),
                TokenKind::Comment => {}
                TokenKind::Unclosed => {
                    return Err(pos.malformed("Could not find matching close tag for \"<%\""));
                }
                TokenKind::Output { expr, escape } => {
                    let parsed = parse_expr(&expr).map_err(|message| pos.malformed(message))?;
                    nodes.push(Node::Output {
                        expr: parsed,
                        source: expr,
                        escape,
                        pos,
                    });
                }
                TokenKind::Statement { body } => {
                    if let Some(terminator) = self.parse_statement(&body, pos, &mut nodes)? {
                        return Ok((nodes, terminator));
                    }
                }
            }
        }

        let end = self.template.len();
        self.push_text(&mut nodes, end);
        Ok((nodes, Terminator::Eof))
    }

    /// Parse one `<% ... %>` statement, appending to `nodes`
    ///
    /// Returns a terminator when the statement closes the enclosing block.
    fn parse_statement(
        &mut self,
        body: &str,
        pos: Pos,
        nodes: &mut Vec<Node<'a>>,
    ) -> Result<Option<Terminator>, TemplateError> {
        let keyword = body.split_whitespace().next().unwrap_or("");
        let rest = body[keyword.len()..].trim();

        match keyword {
            "/each" => Ok(Some(Terminator::EndEach(pos))),
            "/if" => Ok(Some(Terminator::EndIf(pos))),
            "else" => Ok(Some(Terminator::Else(pos))),
            "each" => {
                let (source, var) = parse_each_syntax(rest, pos)?;
                let expr = parse_expr(source).map_err(|message| pos.malformed(message))?;
                let (body, terminator) = self.parse_block(pos)?;
                if !matches!(terminator, Terminator::EndEach(_)) {
                    return Err(pos.malformed(format!("Unclosed each loop for '{}'", source)));
                }
                nodes.push(Node::Each {
                    expr,
                    source: source.to_string(),
                    var: var.to_string(),
                    body,
                    pos,
                });
                Ok(None)
            }
            "if" => {
                let cond = parse_expr(rest).map_err(|message| pos.malformed(message))?;
                let (then, terminator) = self.parse_block(pos)?;
                let otherwise = match terminator {
                    Terminator::EndIf(_) => Vec::new(),
                    Terminator::Else(_) => {
                        let (otherwise, terminator) = self.parse_block(pos)?;
                        if !matches!(terminator, Terminator::EndIf(_)) {
                            return Err(pos.malformed("Unclosed if block"));
                        }
                        otherwise
                    }
                    _ => return Err(pos.malformed("Unclosed if block")),
                };
                nodes.push(Node::If {
                    cond,
                    then,
                    otherwise,
                    pos,
                });
                Ok(None)
            }
            "require" => {
                let (specifier, name) = parse_require_syntax(rest, pos)?;
                nodes.push(Node::Require {
                    specifier,
                    name,
                    pos,
                });
                Ok(None)
            }
            "" => Err(pos.malformed("Empty statement")),
            other => Err(pos.malformed(format!("Unknown statement '{}'", other))),
        }
    }
}

/// Parse each loop syntax: "items |item|" → (expr, var_name)
fn parse_each_syntax(rest: &str, pos: Pos) -> Result<(&str, &str), TemplateError> {
    let pipe_pos = rest.find('|').ok_or_else(|| {
        pos.malformed(format!("Invalid each syntax: expected |var| in 'each {}'", rest))
    })?;

    let source = rest[..pipe_pos].trim();
    let var_end = rest[pipe_pos + 1..].find('|').ok_or_else(|| {
        pos.malformed(format!("Invalid each syntax: unclosed |var| in 'each {}'", rest))
    })?;

    let var_name = rest[pipe_pos + 1..pipe_pos + 1 + var_end].trim();
    if !is_identifier(var_name) {
        return Err(pos.malformed(format!("Invalid loop variable '{}'", var_name)));
    }
    Ok((source, var_name))
}

/// Parse require syntax: "\"./data.toml\" as data" → (specifier, name)
fn parse_require_syntax(rest: &str, pos: Pos) -> Result<(String, String), TemplateError> {
    let invalid = || {
        pos.malformed(format!(
            "Invalid require syntax: expected 'require \"<module>\" as <name>' in 'require {}'",
            rest
        ))
    };

    let (specifier, tail) = split_string_literal(rest).ok_or_else(invalid)?;
    let name = tail.trim().strip_prefix("as").ok_or_else(invalid)?;
    if !name.starts_with(char::is_whitespace) {
        return Err(invalid());
    }
    let name = name.trim();
    if !is_identifier(name) {
        return Err(invalid());
    }
    Ok((specifier, name.to_string()))
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
