use thiserror::Error;

/// Failures a generate attempt can run into. None of these are fatal: the
/// controller turns each one into an error-toned status message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Please enter a valid website URL (e.g., https://example.com).")]
    InvalidUrl,

    #[error("QR renderer not available. Check the server configuration and try again.")]
    DependencyUnavailable,

    #[error("Failed to render QR code. Try a different size.")]
    RenderFailure,

    #[error("Rendered, but could not prepare download.")]
    DownloadPreparationFailure,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Render error: {0}")]
    Render(#[from] FormError),
}

pub type AppResult<T> = Result<T, AppError>;
