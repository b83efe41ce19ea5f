use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Table store is not configured: {0}")]
    Config(String),

    #[error("Request to table store failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Table store returned HTTP {status}: {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Unexpected response from table store: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Table store returned no row for the insert")]
    MissingRow,

    #[error("Table store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
