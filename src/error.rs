use thiserror::Error;

pub type Result<T> = std::result::Result<T, BeboError>;

#[derive(Debug, Error)]
pub enum BeboError {
    /// The site could not be reached or answered with an error status.
    #[error("unable to connect: {0}")]
    Connect(String),
    #[error("incorrect username or password")]
    InvalidCredentials,
    /// Expected markup or embedded metadata was not found.
    #[error("unable to parse {0}")]
    Parse(String),
    #[error("download failed: {0}")]
    Download(String),
    #[error("malformed url '{0}'")]
    MalformedUrl(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BeboError {
    /// Transport failures may go away on a second try, everything else won't.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BeboError::Connect(_) | BeboError::Download(_))
    }
}
