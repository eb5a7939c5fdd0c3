use thiserror::Error;

/// Errors surfaced by the lookup table and classmap persistence.
///
/// `DuplicateKey` and `NotFound` signal caller-recoverable mapping state;
/// `InvalidArgument` signals a bad restore source; `Runtime` covers
/// environment faults (malformed classmap content, failed or empty writes).
#[derive(Error, Debug)]
pub enum Error {
    #[error("a mapping for '{0}' already exists")]
    DuplicateKey(String),

    #[error("no location for '{0}' registered yet")]
    NotFound(String),

    #[error("invalid classmap source: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, Error>;
