use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ConfigError {
    /// TOML parse / deserialization error.
    Parse(String),
    /// A value parsed but is out of range (zero capacity, bad sheet name, etc.).
    Validation(String),
    /// The config file could not be read.
    Io { path: PathBuf, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Validation(msg) => write!(f, "config validation error: {msg}"),
            Self::Io { path, message } => {
                write!(f, "cannot read config '{}': {message}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}
