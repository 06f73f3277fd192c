use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid document location: {0}")]
    InvalidLocation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    #[error("Dialog error: {0}")]
    Dialog(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure reported by a clipboard collaborator. Drives the plain-text
/// fallback rather than ending the run directly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("rich content rejected: {0}")]
    RichUnsupported(String),

    #[error("write failed: {0}")]
    WriteFailed(String),
}

impl AppError {
    /// Short user-facing text; details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::InvalidLocation(_) => "Page location is not a valid URL",
            AppError::Io(_) => "Could not read the page",
            AppError::Clipboard(_) => "Clipboard is unavailable",
            AppError::Dialog(_) => "Could not ask for a choice",
            AppError::Internal(_) => "Failed to copy link",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipboard_error_converts_to_app_error() {
        let err: AppError = ClipboardError::Unavailable("no display".into()).into();
        assert!(matches!(err, AppError::Clipboard(_)));
        assert_eq!(
            err.to_string(),
            "Clipboard error: clipboard unavailable: no display"
        );
    }

    #[test]
    fn io_error_converts_to_app_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(err.user_message(), "Could not read the page");
    }

    #[test]
    fn internal_error_has_generic_user_message() {
        let err = AppError::Internal("selector exploded".into());
        assert_eq!(err.user_message(), "Failed to copy link");
        assert!(err.to_string().contains("selector exploded"));
    }
}
