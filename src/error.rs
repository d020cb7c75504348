use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while evaluating a program. Everything else that goes wrong
/// at run time degrades to a `null` value instead.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("List index out of range: {index}")]
    IndexOutOfRange { index: i64 },
    #[error("program exited with code {code}")]
    Exit { code: i32 },
}

impl RuntimeError {
    /// The text a `catch` block sees in `error`.
    pub fn message(&self) -> String {
        self.to_string()
    }
    /// `sys.exit` unwinds through every `try`.
    pub fn is_catchable(&self) -> bool {
        !matches!(self, RuntimeError::Exit { .. })
    }
}

/// Errors reported by the driver before or around a run.
#[derive(Debug, Error)]
pub enum TessError {
    #[error("Could not read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{count} syntax error(s) in strict mode")]
    Strict { count: usize },
    #[error("Invalid configuration at line {line}: {message}")]
    Config { line: usize, message: String },
    #[error("Could not write output: {0}")]
    Output(#[from] io::Error),
}

#[cfg(test)]
mod error_tests {
    use crate::error::RuntimeError;

    #[test]
    fn catch_messages() {
        let err = RuntimeError::IndexOutOfRange { index: 5 };
        assert_eq!(err.message(), "List index out of range: 5");
        assert!(err.is_catchable());
        assert!(!RuntimeError::Exit { code: 3 }.is_catchable());
    }
}
