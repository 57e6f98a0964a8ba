//! Platform-specific bundling.

pub mod macos;

use std::fmt;

/// Kind of artifact produced by the bundler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum PackageType {
    /// The relocated `.app` directory.
    MacOsBundle,
    /// The `.dmg` disk image.
    Dmg,
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageType::MacOsBundle => write!(f, "app"),
            PackageType::Dmg => write!(f, "dmg"),
        }
    }
}
