use thiserror::Error;

/// Positional decode failures. Every variant names the field being read so a
/// layout mismatch against the deployed program can be pinned down.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{field}: needs {needed} bytes at offset {offset}, only {available} remain")]
    Truncated {
        field: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("{field}: length prefix {declared} at offset {offset} overruns buffer ({available} bytes remain)")]
    LengthOverrun {
        field: &'static str,
        offset: usize,
        declared: usize,
        available: usize,
    },

    #[error("{field}: expected 0 or 1 at offset {offset}, found {found}")]
    InvalidTag {
        field: &'static str,
        offset: usize,
        found: u8,
    },

    #[error("{field}: invalid UTF-8 at offset {offset}")]
    InvalidUtf8 { field: &'static str, offset: usize },

    #[error("instruction data: {0}")]
    Instruction(String),
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialization(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Io(err.to_string())
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for CoreError {
    fn from(err: toml::ser::Error) -> Self {
        CoreError::TomlSerialization(err.to_string())
    }
}
