use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("access denied (HTTP 403) for {url} - set a descriptive User-Agent with contact info")]
    Forbidden { url: String },

    #[error("unexpected HTTP status {status} for {url}")]
    BadStatus { status: u16, url: String },

    #[error("{what} still failing after {attempts} attempts")]
    RetriesExhausted { what: String, attempts: u32 },

    #[error("SVG extraction failed: {0}")]
    Extract(String),

    #[error("Other error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, HarvestError>;
