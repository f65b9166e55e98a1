use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Corruption,
    Parse,
    Lifecycle,
    InvalidArgument,
    InvalidState,
    Cancelled,
    Internal,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: String) -> Self {
        Error { kind, context }
    }

    pub fn lifecycle(context: &str) -> Self {
        Error::new(ErrorKind::Lifecycle, context.to_string())
    }

    pub fn corruption(context: String) -> Self {
        Error::new(ErrorKind::Corruption, context)
    }

    /// I/O failures, corrupted files and undecodable data all surface as
    /// storage errors to callers.
    pub fn is_storage(&self) -> bool {
        matches!(self.kind, ErrorKind::Io | ErrorKind::Corruption | ErrorKind::Parse)
    }

    pub fn is_lifecycle(&self) -> bool {
        self.kind == ErrorKind::Lifecycle
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.context)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error {
            kind: ErrorKind::Io,
            context: err.to_string(),
        }
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error {
            kind: ErrorKind::Parse,
            context: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            kind: ErrorKind::InvalidArgument,
            context: format!("Invalid configuration: {}", err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
