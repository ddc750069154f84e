use thiserror::Error;

/// Failures of the directory listing service.
///
/// The `Display` text is what ends up in the `error` field of a failed
/// listing response, so it is written for the person using the picker.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("This directory does not exist")]
    NotFound(String),
    #[error("Invalid directory: {0}")]
    InvalidPath(String),
    #[error("Could not read directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while fetching a listing on behalf of the widget.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed listing response: {0}")]
    Decode(String),
    /// The listing itself reported `success: false`; carries the server's text.
    #[error("{0}")]
    Listing(String),
}

impl From<ListingError> for SourceError {
    fn from(err: ListingError) -> Self {
        SourceError::Listing(err.to_string())
    }
}
