//! Top-level error types for the command line tool.
//!
//! Wraps [`crate::bundler::Error`] and adds CLI-specific failures, each with
//! suggestions printed after the error message.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for a bundling run
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bundler errors
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// An external command the CLI runs itself failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::bundler::Error as E;

        match self {
            BundlerError::Cli(CliError::InvalidArguments { .. }) => {
                vec!["Run with --help to see the accepted arguments".to_string()]
            }
            BundlerError::Cli(CliError::ExecutionFailed { command, .. }) => vec![format!(
                "Check that `{}` works when run by hand in this directory",
                command
            )],
            BundlerError::Bundler(E::Copy { .. }) => vec![
                "Add the directory containing the library with --search-path".to_string(),
                "Or exclude it from relocation with --exclude".to_string(),
            ],
            BundlerError::Bundler(E::Classification { .. }) => vec![
                "Exclude the reference with --exclude if it is provided at runtime".to_string(),
            ],
            BundlerError::Bundler(E::RecursionLimit { .. }) => {
                vec!["Raise relocation.max_depth in the configuration file".to_string()]
            }
            BundlerError::Bundler(E::Rewrite { .. }) => vec![
                "Make sure the binary is writable and was linked with -headerpad_max_install_names"
                    .to_string(),
            ],
            BundlerError::Bundler(E::Inspection { .. }) => {
                vec!["Try the other backend with --inspector".to_string()]
            }
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
