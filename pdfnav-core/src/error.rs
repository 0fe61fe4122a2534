use crate::objects::ObjectId;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    InputFormat(#[from] InputFormatError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Open(#[from] OpenError),

    #[error("Could not save to {path}: {reason}")]
    Save { path: PathBuf, reason: String },

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Resolution(#[from] ResolutionFailure),

    #[error("Invalid PDF structure: {0}")]
    InvalidStructure(String),
}

pub type Result<T> = std::result::Result<T, NavError>;

/// A line of a text input (TOC, link or alias file) that could not be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Line {line}: {reason} ({content:?})")]
pub struct InputFormatError {
    /// 1-based line number
    pub line: usize,
    pub content: String,
    pub reason: String,
}

impl InputFormatError {
    pub fn new(line: usize, content: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            line,
            content: content.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
#[error("Could not open {path}: {reason}")]
pub struct OpenError {
    pub path: PathBuf,
    pub reason: String,
}

/// Page number outside `[1, page_count]`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Page {number} out of range (document has {page_count} pages)")]
pub struct IndexError {
    pub number: usize,
    pub page_count: usize,
}

impl IndexError {
    /// Checks a 1-based page number against the page count.
    pub fn check(number: usize, page_count: usize) -> std::result::Result<usize, IndexError> {
        if number == 0 || number > page_count {
            Err(IndexError { number, page_count })
        } else {
            Ok(number)
        }
    }
}

/// A destination whose page reference does not lead to a page.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolutionFailure {
    #[error("destination is empty or not an array")]
    Malformed,

    #[error("destination target is not a page reference: {0}")]
    NotAReference(String),

    #[error("reference {0} does not point at a page of this document")]
    Dangling(ObjectId),
}

/// Keeps the display of a skipped line short in log output.
pub(crate) struct Excerpt<'a>(pub &'a str);

impl fmt::Display for Excerpt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MAX: usize = 60;
        if self.0.chars().count() > MAX {
            let short: String = self.0.chars().take(MAX).collect();
            write!(f, "{short}...")
        } else {
            f.write_str(self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_nav_error_display() {
        let error = NavError::Configuration("title \"Intro\" not found".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: title \"Intro\" not found"
        );
    }

    #[test]
    fn test_index_error_check() {
        assert_eq!(IndexError::check(1, 3), Ok(1));
        assert_eq!(IndexError::check(3, 3), Ok(3));
        assert_eq!(
            IndexError::check(0, 3),
            Err(IndexError {
                number: 0,
                page_count: 3
            })
        );
        let err = IndexError::check(4, 3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Page 4 out of range (document has 3 pages)"
        );
    }

    #[test]
    fn test_input_format_error_display() {
        let err = InputFormatError::new(3, "Intro x", "page number is not an integer");
        assert_eq!(
            err.to_string(),
            "Line 3: page number is not an integer (\"Intro x\")"
        );
    }

    #[test]
    fn test_resolution_failure_wraps_into_nav_error() {
        let failure = ResolutionFailure::Dangling(ObjectId::new(12, 0));
        let error = NavError::from(failure.clone());
        match error {
            NavError::Resolution(inner) => assert_eq!(inner, failure),
            _ => panic!("Expected Resolution variant"),
        }
    }

    #[test]
    fn test_io_error_preservation() {
        let original = IoError::new(ErrorKind::NotFound, "missing.pdf");
        let error = NavError::from(original);

        if let NavError::Io(io_err) = error {
            assert_eq!(io_err.kind(), ErrorKind::NotFound);
        } else {
            panic!("IO error should be preserved as NavError::Io");
        }
    }

    #[test]
    fn test_excerpt_truncates_long_lines() {
        let long = "x".repeat(100);
        let shown = Excerpt(&long).to_string();
        assert!(shown.ends_with("..."));
        assert_eq!(shown.len(), 63);
        assert_eq!(Excerpt("short").to_string(), "short");
    }

    #[test]
    fn test_error_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NavError>();
    }
}
