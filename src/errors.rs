//! Shared error types for the analysis pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for codereport operations.
///
/// Input errors are terminal and user-facing; parse errors are terminal for
/// single-file analysis but recoverable per-file in batch mode; render errors
/// only surface when the text fallback also fails.
#[derive(Debug, Error)]
pub enum Error {
    /// Upload is neither a Python file nor a zip archive
    #[error("Unsupported file format. Please upload a .py or .zip file.")]
    UnsupportedInput,

    /// Upload exceeds the configured size limit
    #[error("File exceeds the maximum upload size of {limit} bytes (got {actual}).")]
    PayloadTooLarge { limit: u64, actual: u64 },

    /// Archive could not be opened or expanded
    #[error("Invalid or corrupted ZIP file.")]
    CorruptArchive(#[source] zip::result::ZipError),

    /// Archive expanded but contained no Python source files
    #[error("No Python files found in the uploaded ZIP.")]
    NoSourceFiles,

    /// Malformed source
    #[error("Parse error in {file}: {message}")]
    Parse { file: PathBuf, message: String },

    /// Both the primary and fallback rendering paths failed
    #[error("Report rendering failed: {0}")]
    Render(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn parse(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_are_distinct_messages() {
        let unsupported = Error::UnsupportedInput.to_string();
        let empty = Error::NoSourceFiles.to_string();
        assert_ne!(unsupported, empty);
        assert!(empty.contains("No Python files"));
    }

    #[test]
    fn parse_error_names_the_file() {
        let err = Error::parse("broken.py", "invalid syntax");
        assert!(err.to_string().contains("broken.py"));
    }
}
