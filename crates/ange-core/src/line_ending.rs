//! Line-ending detection and normalization
//!
//! The engine passes text through as written, so a rendered template can mix
//! the template's own breaks with `\n`s coming from data or modules. Output is
//! normalized to the style of the source template before it is written.

/// Line-ending style of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// `\n`
    Lf,
    /// `\r\n`
    Crlf,
    /// No line break in the document
    Unknown,
}

impl LineEnding {
    /// Detect the style from the first line break in `text`
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(0) => LineEnding::Lf,
            Some(i) if text.as_bytes()[i - 1] == b'\r' => LineEnding::Crlf,
            Some(_) => LineEnding::Lf,
            None => LineEnding::Unknown,
        }
    }

    /// The line-ending convention of the host platform
    pub fn native() -> Self {
        if cfg!(windows) {
            LineEnding::Crlf
        } else {
            LineEnding::Lf
        }
    }

    /// Rewrite every line break in `text` to this style
    ///
    /// `Unknown` falls back to [`LineEnding::native`].
    pub fn apply(self, text: &str) -> String {
        let normalized = text.replace("\r\n", "\n");
        match self {
            LineEnding::Lf => normalized,
            LineEnding::Crlf => normalized.replace('\n', "\r\n"),
            LineEnding::Unknown => Self::native().apply(&normalized),
        }
    }
}
