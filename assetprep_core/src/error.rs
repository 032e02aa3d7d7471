//! Error type shared by every preparation step.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure kinds of the preparation steps.
///
/// None of these are retried; every step aborts on the first error and
/// leaves its destination file untouched.
#[derive(Error, Debug)]
pub enum PrepError {
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON, XML, image or brace-tuple content that does not parse.
    #[error("malformed document {document}: {message}")]
    MalformedDocument { document: String, message: String },

    /// A glyph character or an expected key is absent.
    #[error("field not found: {field}")]
    FieldNotFound { field: String },

    /// Markup parsed, but its structure is not the expected one.
    #[error("unexpected structure in {context}: {message}")]
    FormatDrift { context: String, message: String },

    #[error("failed to encode image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type PrepResult<T> = Result<T, PrepError>;

impl PrepError {
    pub(crate) fn malformed(document: impl Into<String>, message: impl ToString) -> Self {
        Self::MalformedDocument {
            document: document.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::FieldNotFound {
            field: field.into(),
        }
    }

    pub(crate) fn drift(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FormatDrift {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Maps an I/O error on `path`, splitting out the not-found case.
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Names the file a parse error came from, for errors produced by the
    /// in-memory parsers.
    #[must_use]
    pub fn in_document(self, path: &Path) -> Self {
        match self {
            Self::MalformedDocument { message, .. } => Self::MalformedDocument {
                document: path.display().to_string(),
                message,
            },
            Self::FormatDrift { context, message } => Self::FormatDrift {
                context: format!("{} ({context})", path.display()),
                message,
            },
            other => other,
        }
    }
}
