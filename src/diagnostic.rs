use crate::token::Token;
use std::fmt;

/// A positioned problem found while parsing or linting. Diagnostics never
/// stop a run on their own; the caller decides what to do with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl Diagnostic {
    pub fn at(token: &Token, message: &str) -> Diagnostic {
        Diagnostic {
            line: token.line,
            column: token.column,
            message: message.to_string(),
        }
    }
    /// For findings that only know their line.
    pub fn on_line(line: u32, message: &str) -> Diagnostic {
        Diagnostic {
            line,
            column: 0,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.column == 0 {
            write!(f, "[line {}] {}", self.line, self.message)
        } else {
            write!(
                f,
                "[line {}, column {}] {}",
                self.line, self.column, self.message
            )
        }
    }
}
