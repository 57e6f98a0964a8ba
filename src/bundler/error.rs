//! Error types for bundling and relocation.
//!
//! The relocation core reports four failure kinds (inspection, classification,
//! copy, rewrite) plus the recursion guard. None of them are recovered locally:
//! each aborts the whole bundling run with the failing path attached.

use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

/// Result type alias for bundler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while assembling and relocating a bundle.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The dependency list of a binary could not be read.
    #[error("failed to inspect {}: {reason}", path.display())]
    Inspection {
        /// Binary that was being inspected
        path: PathBuf,
        /// Parser or tool diagnostic
        reason: String,
    },

    /// A recorded dependency path does not map to a known library shape.
    #[error("cannot classify dependency `{path}`: {reason}")]
    Classification {
        /// Recorded dependency path
        path: String,
        /// Why classification failed
        reason: String,
    },

    /// A dependency could not be located or copied into the bundle.
    #[error("failed to copy {}: {reason}", path.display())]
    Copy {
        /// Source path (or recorded path when it could not be resolved)
        path: PathBuf,
        /// Underlying diagnostic
        reason: String,
    },

    /// A load-path edit failed or the editing tool exited non-zero.
    #[error("failed to rewrite load paths of {}: {reason}", path.display())]
    Rewrite {
        /// Binary being edited
        path: PathBuf,
        /// Tool diagnostic (stderr)
        reason: String,
    },

    /// The dependency walk went deeper than the configured limit.
    #[error("dependency chain through {} exceeds maximum depth {depth}", path.display())]
    RecursionLimit {
        /// Binary at which the limit was hit
        path: PathBuf,
        /// Configured maximum depth
        depth: usize,
    },

    /// Filesystem operation failed with context.
    #[error("{context} {}: {error}", path.display())]
    Fs {
        /// What was being done
        context: String,
        /// Path involved
        path: PathBuf,
        /// Underlying IO error
        #[source]
        error: std::io::Error,
    },

    /// IO error.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// Directory traversal error.
    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),

    /// Path prefix stripping error.
    #[error(transparent)]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Info.plist parse or write error.
    #[error("plist error: {0}")]
    Plist(#[from] plist::Error),

    /// Configuration file parse error.
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Report serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Glob pattern error.
    #[error(transparent)]
    GlobPattern(#[from] glob::PatternError),

    /// Generic error message.
    #[error("{0}")]
    GenericError(String),
}

/// Attaches a message to an error or a missing value.
pub trait Context<T> {
    /// Replaces the error with `context`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Replaces the error with a lazily built message.
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::GenericError(format!("{context}: {e}")))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::GenericError(format!("{}: {e}", f())))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Adds path context to IO results.
pub trait ErrorExt<T> {
    /// Wraps an IO error into [`Error::Fs`] with the given context and path.
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context: context.to_string(),
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Returns early with a [`Error::GenericError`].
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::bundler::Error::GenericError(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($fmt, $($arg)*)))
    };
}
