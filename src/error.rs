use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Browser launch failed: {0}")]
    LaunchError(String),

    #[error("Navigation failed: {0}")]
    NavigationError(String),

    #[error("JavaScript error: {0}")]
    JsError(String),

    #[error("Cannot run on this page ({0}). Open a normal website with form fields.")]
    RestrictedPage(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CDP error: {0}")]
    CdpError(#[from] chromiumoxide::error::CdpError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
