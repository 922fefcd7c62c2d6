// error.rs - Error taxonomy for the fixture harness
//
// Every failure the loader and the handle can produce ends up here.
// Nothing is retried: errors propagate to the test that triggered them.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Boxed source error used for I/O and driver failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Coarse classification of [`Error`], handy for log fields and assertions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    IoFailure,
    QuerySyntax,
    Cardinality,
    InvalidLabel,
    Config,
    Timeout,
    Decode,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::IoFailure => "io_failure",
            ErrorKind::QuerySyntax => "query_syntax",
            ErrorKind::Cardinality => "cardinality",
            ErrorKind::InvalidLabel => "invalid_label",
            ErrorKind::Config => "config",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Decode => "decode",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// The snapshot (or database file) does not exist
    #[error("snapshot `{label}` not found at {}", path.display())]
    NotFound { label: String, path: PathBuf },

    /// Copying, renaming, removing or connecting failed
    #[error("I/O failure on {}: {source}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// SQLite rejected the query; `message` is the engine's diagnostic
    #[error("query failed: {message}")]
    QuerySyntax { message: String, query: String },

    /// A single-row fetch returned zero or several rows
    #[error("expected exactly one row, query returned {actual}")]
    Cardinality { actual: usize },

    #[error("invalid snapshot label `{label}`: {reason}")]
    InvalidLabel { label: String, reason: &'static str },

    #[error("invalid value for {key}: {reason}")]
    Config { key: &'static str, reason: String },

    #[error("{operation} timed out after {limit:?}")]
    Timeout {
        operation: &'static str,
        limit: Duration,
    },

    #[error("cannot decode column `{column}` with storage class {type_name}")]
    Decode { column: String, type_name: String },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::IoFailure { .. } => ErrorKind::IoFailure,
            Error::QuerySyntax { .. } => ErrorKind::QuerySyntax,
            Error::Cardinality { .. } => ErrorKind::Cardinality,
            Error::InvalidLabel { .. } => ErrorKind::InvalidLabel,
            Error::Config { .. } => ErrorKind::Config,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::Decode { .. } => ErrorKind::Decode,
        }
    }

    pub fn io_failure(
        path: impl AsRef<Path>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Error::IoFailure {
            path: path.as_ref().to_path_buf(),
            source: Box::new(source),
        }
    }

    /// Map a driver error raised while running `query` against `path`.
    ///
    /// Anything SQLite itself reports (syntax errors, unknown tables or
    /// columns, constraint violations) becomes [`Error::QuerySyntax`];
    /// the rest is treated as an I/O failure on the database file.
    pub fn from_query(query: &str, path: impl AsRef<Path>, err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => Error::QuerySyntax {
                message: db_err.message().to_string(),
                query: query.to_string(),
            },
            other => Error::io_failure(path, other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
