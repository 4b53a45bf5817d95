use std::error::Error;
use std::fmt;
use std::io;

use rustyline::error::ReadlineError;

use semispace::HeapError;

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    IOError(String),
    UsageError(String),
    CommandError(String),
    HeapError(HeapError),
}

/// A gcrus runtime error type
#[derive(Debug, PartialEq)]
pub struct RuntimeError {
    kind: ErrorKind,
    line: Option<usize>,
}

impl RuntimeError {
    pub fn new(kind: ErrorKind) -> RuntimeError {
        RuntimeError { kind, line: None }
    }

    /// Attach the script line number the error occurred on
    pub fn at_line(self, line: usize) -> RuntimeError {
        RuntimeError {
            kind: self.kind,
            line: Some(line),
        }
    }

    pub fn error_kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(line) = self.line {
            write!(f, "line {}: ", line)?;
        }

        match self.kind {
            ErrorKind::IOError(ref reason) => write!(f, "IO Error: {}", reason),
            ErrorKind::UsageError(ref reason) => write!(f, "{}", reason),
            ErrorKind::CommandError(ref reason) => write!(f, "Bad command: {}", reason),
            ErrorKind::HeapError(ref error) => write!(f, "{}", error),
        }
    }
}

/// Convert from io::Error
impl From<io::Error> for RuntimeError {
    fn from(other: io::Error) -> RuntimeError {
        RuntimeError::new(ErrorKind::IOError(format!("{}", other)))
    }
}

/// Convert from ReadlineError
impl From<ReadlineError> for RuntimeError {
    fn from(other: ReadlineError) -> RuntimeError {
        RuntimeError::new(ErrorKind::IOError(format!("{}", other)))
    }
}

/// Convert from HeapError
impl From<HeapError> for RuntimeError {
    fn from(other: HeapError) -> RuntimeError {
        RuntimeError::new(ErrorKind::HeapError(other))
    }
}

impl Error for RuntimeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self.kind {
            ErrorKind::HeapError(ref error) => Some(error),
            _ => None,
        }
    }
}

/// Convenience shorthand function for building a command error
pub fn err_command(line: &str) -> RuntimeError {
    RuntimeError::new(ErrorKind::CommandError(String::from(line)))
}

/// Convenience shorthand function for building a usage error
pub fn err_usage(reason: &str) -> RuntimeError {
    RuntimeError::new(ErrorKind::UsageError(String::from(reason)))
}
