use std::error::Error;
use std::fmt;

/// Line number (starting at one).
pub type Position = u32;

/// A fatal lexical or syntactic diagnostic, tagged with the line it was detected on.
///
/// The `Display` form is the exact single-line message the language mandates.
#[derive(Debug, PartialEq)]
pub struct SyntaxError {
    pub pos: Position,
    pub kind: SyntaxErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum SyntaxErrorKind {
    TokenTooLong,
    InvalidStringLiteral,
    InvalidEscape(u8),
    InvalidSingleQuote,
    Syntax,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SyntaxErrorKind::TokenTooLong => write!(f, "line {}: token too long", self.pos),
            SyntaxErrorKind::InvalidStringLiteral => {
                write!(f, "line {}: invalid string literal.", self.pos)
            }
            SyntaxErrorKind::InvalidEscape(ch) => write!(
                f,
                "line {}: Invalid escape sequence \"\\{}\"",
                self.pos,
                char::from(ch)
            ),
            SyntaxErrorKind::InvalidSingleQuote => {
                write!(f, "line {}: Invalid single-quoted string", self.pos)
            }
            SyntaxErrorKind::Syntax => write!(f, "line {}: syntax error", self.pos),
        }
    }
}

impl Error for SyntaxError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}
