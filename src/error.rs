use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Please enter both a quote and a category.")]
    EmptyInput,

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid import file: {0}")]
    ImportFormat(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::EmptyInput | Error::UnknownCategory(_) | Error::ImportFormat(_) => 1,
            Error::Network(_) | Error::Remote { .. } | Error::Parse(_) => 2,
            Error::Storage(_) | Error::Io(_) | Error::Json(_) | Error::Config(_) => 3,
        }
    }

    /// True for failures that came from talking to the remote endpoint.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::Remote { .. } | Error::Parse(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_category() {
        assert_eq!(Error::EmptyInput.exit_code(), 1);
        assert_eq!(Error::ImportFormat("not a list".into()).exit_code(), 1);
        assert_eq!(Error::Network("refused".into()).exit_code(), 2);
        assert_eq!(
            Error::Remote {
                status: 500,
                message: "boom".into()
            }
            .exit_code(),
            2
        );
        assert_eq!(Error::Config("bad".into()).exit_code(), 3);
    }

    #[test]
    fn test_validation_message_matches_form_prompt() {
        assert_eq!(
            Error::EmptyInput.to_string(),
            "Please enter both a quote and a category."
        );
        assert!(!Error::EmptyInput.is_remote());
        assert!(Error::Parse("x".into()).is_remote());
    }
}
