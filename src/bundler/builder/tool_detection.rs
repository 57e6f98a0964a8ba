//! External tool detection and availability checking.
//!
//! Lookups are cached so each tool is searched for on `PATH` once per process.

use crate::bundler::{Error, Result};
use std::{path::PathBuf, sync::LazyLock};

/// Rewrites load commands.
pub static INSTALL_NAME_TOOL: LazyLock<Option<PathBuf>> =
    LazyLock::new(|| locate("install_name_tool"));

/// Lists load commands when the otool inspector is selected.
pub static OTOOL: LazyLock<Option<PathBuf>> = LazyLock::new(|| locate("otool"));

/// Signs the bundle and the disk image.
pub static CODESIGN: LazyLock<Option<PathBuf>> = LazyLock::new(|| locate("codesign"));

/// Creates the disk image.
pub static HDIUTIL: LazyLock<Option<PathBuf>> = LazyLock::new(|| locate("hdiutil"));

/// Searches `PATH` for `name`.
pub fn locate(name: &str) -> Option<PathBuf> {
    match which::which(name) {
        Ok(path) => {
            log::debug!("Found {} at: {}", name, path.display());
            Some(path)
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", name, e);
            None
        }
    }
}

/// Fails with a clear error if `found` is empty.
pub fn require(name: &str, found: &Option<PathBuf>, purpose: &str) -> Result<()> {
    match found {
        Some(_) => Ok(()),
        None => Err(Error::GenericError(format!(
            "`{}` is required to {} but was not found in PATH",
            name, purpose
        ))),
    }
}
