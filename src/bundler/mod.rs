//! Relocatable macOS application bundler.
//!
//! This module turns a raw `.app` from a build tree into a self-contained
//! bundle: every non-system dylib and framework the executables need is
//! copied into `Contents/Frameworks` and all load paths are rewritten to be
//! relative to `@executable_path`, after which the bundle is optionally
//! signed and packed into a disk image.
//!
//! # Configuration
//!
//! Bundling is configured via a TOML file (see [`BundleSettings`]):
//!
//! ```toml
//! resources = ["qt.conf"]
//!
//! [relocation]
//! excluded_substrings = ["Qt"]
//!
//! [toolkit]
//! command = "macdeployqt"
//! args = ["-qmldir=src"]
//! ```
//!
//! # Integration
//!
//! ```no_run
//! use kodegen_bundler_relocate::bundler::{Bundler, PackageSettings, SettingsBuilder};
//!
//! # async fn example() -> kodegen_bundler_relocate::bundler::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .source_bundle("build/ChronoShare.app")
//!     .project_out_directory("build/dist")
//!     .package_settings(PackageSettings {
//!         product_name: "ChronoShare".into(),
//!         version: "0.3.1".into(),
//!     })
//!     .build()?;
//!
//! let artifacts = Bundler::new(settings).bundle().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod builder;
pub mod error;
pub(crate) mod platform;
mod settings;
pub(crate) mod utils;

// Public re-exports
pub use builder::Bundler;
pub use error::{Error, Result};
pub use platform::PackageType;
pub use platform::macos::{app::AppBundle, relocate, relocate_binaries};
pub use settings::{
    AuxiliarySettings, BundleSettings, DmgSettings, InspectorKind, MacOsSettings,
    PackageSettings, RelocationSettings, Settings, SettingsBuilder, ToolkitSettings,
};

/// A bundled artifact result.
///
/// # Fields
///
/// - `package_type`: What was produced (`.app` or `.dmg`)
/// - `path`: Where it was written
/// - `size`: Total size in bytes (summed over files for the `.app`)
/// - `checksum`: SHA-256 checksum for integrity verification
#[derive(Debug, Clone)]
pub struct BundledArtifact {
    /// The package type that was created.
    pub package_type: PackageType,

    /// Path of the artifact.
    pub path: std::path::PathBuf,

    /// Total size of the artifact in bytes.
    pub size: u64,

    /// SHA-256 checksum of the artifact.
    pub checksum: String,
}
