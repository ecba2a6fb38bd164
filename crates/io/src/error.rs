use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum IoError {
    /// Input file could not be read.
    Read { path: PathBuf, message: String },
    /// Payload is not valid for the declared format.
    Parse { format: &'static str, message: String },
    /// Output file could not be written.
    Write { path: PathBuf, message: String },
    /// Encoder failure (workbook assembly, CSV serialization).
    Export(String),
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => {
                write!(f, "cannot read '{}': {message}", path.display())
            }
            Self::Parse { format, message } => write!(f, "invalid {format} input: {message}"),
            Self::Write { path, message } => {
                write!(f, "cannot write '{}': {message}", path.display())
            }
            Self::Export(msg) => write!(f, "export failed: {msg}"),
        }
    }
}

impl std::error::Error for IoError {}
