//! Relocatable macOS application bundler library
//!
//! This library makes a macOS `.app` self-contained:
//! - walks the dylib and framework dependency closure of its executables
//! - copies every non-system dependency into `Contents/Frameworks`
//! - rewrites load paths to `@executable_path/../Frameworks/...`
//! - signs the bundle and creates a `.dmg`
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
