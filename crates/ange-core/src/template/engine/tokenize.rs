//! Tokenization for template engine
//!
//! Provides O(n) tokenization of `<% ... %>` tags using a state machine.

/// Token classification
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    /// `<%= expr %>` (escaped) or `<%- expr %>` (raw)
    Output { expr: String, escape: bool },

    /// `<%# ... %>`
    Comment,

    /// `<% each ... %>`, `<% /if %>`, `<% require ... %>`, ...
    Statement { body: String },

    /// `<%%`, rendered as a literal `<%`
    Literal,

    /// `<%` with no closing `%>` before the end of input
    Unclosed,
}

/// A single tag with position and classification
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    /// Token classification
    pub kind: TokenKind,
    /// Absolute byte position of `<` in the template
    pub start: usize,
    /// Total length in bytes including `<%` and `%>`
    pub length: usize,
    /// Closed with `-%>`: the newline right after the tag is dropped
    pub trim_newline: bool,
    /// Line number where token starts (1-based)
    pub line: usize,
    /// Column where token starts (1-based, in characters)
    pub column: usize,
}

impl Token {
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Tokenization state machine
///
/// ```text
/// Normal ──<───> SeenLt ──%───> InTag ──%───> SeenPercent ──>───> [Yield Token] → Normal
///   │              │   └──%%──> [Yield Literal]    │                 │
///   │ (not <)      │ (not %)                      │ (not %)          │ (not >)
///   └─────────────>└─────────────────────────────>└────────────────>└──────────> InTag
///
/// EOF inside a tag → Unclosed token
/// ```
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ScanState {
    /// Normal text scanning
    Normal,

    /// Seen `<`, checking for `%`
    SeenLt {
        /// Position of the `<` character
        pos: usize,
    },

    /// Inside `<%...`, scanning until `%>`
    InTag {
        /// Byte position of the opening `<`
        start: usize,
        /// Byte position where tag content starts (after `<%`)
        content_start: usize,
        line: usize,
        column: usize,
    },

    /// Seen `%` inside a tag, checking for `>`
    SeenPercent {
        start: usize,
        content_start: usize,
        /// Position of the `%` character
        percent_pos: usize,
        line: usize,
        column: usize,
    },
}

/// Iterator over tags in a template string
///
/// Each byte is processed exactly once; the position never moves backward.
pub(crate) struct TokenStream<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    state: ScanState,
    line: usize,
    /// Byte offset of the first character of the current line
    line_start: usize,
    finished: bool,
}

impl<'a> TokenStream<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            state: ScanState::Normal,
            line: 1,
            line_start: 0,
            finished: false,
        }
    }

    /// Classify tag content (between `<%` and `%>`)
    ///
    /// Returns the kind and whether the tag ends with the `-` trim modifier.
    fn classify_content(content: &str) -> (TokenKind, bool) {
        let (marker, rest) = match content.as_bytes().first() {
            Some(b'=') | Some(b'-') | Some(b'#') => (content.as_bytes()[0], &content[1..]),
            _ => (b' ', content),
        };

        let (body, trim) = match rest.strip_suffix('-') {
            Some(body) => (body, true),
            None => (rest, false),
        };

        let kind = match marker {
            b'=' => TokenKind::Output {
                expr: body.trim().to_string(),
                escape: true,
            },
            b'-' => TokenKind::Output {
                expr: body.trim().to_string(),
                escape: false,
            },
            b'#' => TokenKind::Comment,
            _ => TokenKind::Statement {
                body: body.trim().to_string(),
            },
        };
        (kind, trim)
    }

    fn column_at(&self, pos: usize) -> usize {
        self.text[self.line_start..pos].chars().count() + 1
    }

    fn newline(&mut self) {
        self.line += 1;
        self.line_start = self.pos + 1;
    }

    /// Process Normal state: scan for `<`
    fn process_normal(&mut self, byte: u8) {
        if byte == b'<' {
            self.state = ScanState::SeenLt { pos: self.pos };
        } else if byte == b'\n' {
            self.newline();
        }
        self.pos += 1;
    }

    /// Process SeenLt state: `%` opens a tag, `%%` is a literal
    ///
    /// Returns a Literal token for `<%%`, otherwise None.
    fn process_seen_lt(&mut self, byte: u8, lt_pos: usize) -> Option<Token> {
        if byte != b'%' {
            // Reprocess this byte in Normal state (it may be another `<`)
            self.state = ScanState::Normal;
            return None;
        }

        if self.bytes.get(self.pos + 1) == Some(&b'%') {
            let token = Token {
                kind: TokenKind::Literal,
                start: lt_pos,
                length: 3,
                trim_newline: false,
                line: self.line,
                column: self.column_at(lt_pos),
            };
            self.state = ScanState::Normal;
            self.pos += 2;
            return Some(token);
        }

        self.state = ScanState::InTag {
            start: lt_pos,
            content_start: self.pos + 1,
            line: self.line,
            column: self.column_at(lt_pos),
        };
        self.pos += 1;
        None
    }

    /// Process InTag state: scan for `%`
    fn process_in_tag(
        &mut self,
        byte: u8,
        start: usize,
        content_start: usize,
        line: usize,
        column: usize,
    ) {
        if byte == b'%' {
            self.state = ScanState::SeenPercent {
                start,
                content_start,
                percent_pos: self.pos,
                line,
                column,
            };
        } else if byte == b'\n' {
            self.newline();
        }
        self.pos += 1;
    }

    /// Process SeenPercent state: `>` completes the tag
    fn process_seen_percent(&mut self, byte: u8, state: ScanState) -> Option<Token> {
        let ScanState::SeenPercent {
            start,
            content_start,
            percent_pos,
            line,
            column,
        } = state
        else {
            return None;
        };

        if byte != b'>' {
            // Not a closer; reprocess this byte inside the tag (it may be `%`)
            self.state = ScanState::InTag {
                start,
                content_start,
                line,
                column,
            };
            return None;
        }

        let content = &self.text[content_start..percent_pos];
        let (kind, trim_newline) = Self::classify_content(content);
        let token = Token {
            kind,
            start,
            length: self.pos + 1 - start,
            trim_newline,
            line,
            column,
        };

        self.state = ScanState::Normal;
        self.pos += 1;
        Some(token)
    }

    /// Called at end of input: an open tag becomes an Unclosed token
    fn finish(&mut self) -> Option<Token> {
        self.finished = true;
        match self.state.clone() {
            ScanState::InTag {
                start, line, column, ..
            }
            | ScanState::SeenPercent {
                start, line, column, ..
            } => Some(Token {
                kind: TokenKind::Unclosed,
                start,
                length: self.bytes.len() - start,
                trim_newline: false,
                line,
                column,
            }),
            _ => None,
        }
    }
}

impl Iterator for TokenStream<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }

        while self.pos < self.bytes.len() {
            let byte = self.bytes[self.pos];
            #[cfg(test)]
            test_counter::inc();

            match self.state.clone() {
                ScanState::Normal => self.process_normal(byte),
                ScanState::SeenLt { pos } => {
                    if let Some(token) = self.process_seen_lt(byte, pos) {
                        return Some(token);
                    }
                }
                ScanState::InTag {
                    start,
                    content_start,
                    line,
                    column,
                } => self.process_in_tag(byte, start, content_start, line, column),
                state @ ScanState::SeenPercent { .. } => {
                    if let Some(token) = self.process_seen_percent(byte, state) {
                        return Some(token);
                    }
                }
            }
        }

        self.finish()
    }
}
