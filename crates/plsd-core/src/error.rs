use thiserror::Error;

pub type PlsdResult<T> = Result<T, PlsdError>;

#[derive(Debug, Error)]
pub enum PlsdError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file needs {chunks} chunks but only {max_shards} masking shards exist")]
    FileTooLarge { chunks: usize, max_shards: usize },

    #[error("store holds {have} records, {wanted} requested")]
    FileTooShort { wanted: usize, have: usize },

    #[error("malformed group element: {0}")]
    Decode(String),

    #[error("decrypted payload is inconsistent with the ledger")]
    Inconsistent,

    #[error("invalid settings: {0}")]
    Settings(String),
}
