//! Core Settings struct and implementations.

use super::{BundleSettings, PackageSettings};
use std::path::{Path, PathBuf};

/// Main settings for bundler operations.
///
/// Central configuration for the bundler, constructed via [`SettingsBuilder`](super::SettingsBuilder).
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_relocate::bundler::{PackageSettings, SettingsBuilder};
///
/// # fn example() -> kodegen_bundler_relocate::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .source_bundle("build/ChronoShare.app")
///     .project_out_directory("build/dist")
///     .package_settings(PackageSettings {
///         product_name: "ChronoShare".into(),
///         version: "0.3.1".into(),
///     })
///     .build()?;
/// assert!(settings.app_bundle_path().ends_with("ChronoShare.app"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Package metadata.
    package: PackageSettings,

    /// Bundle configuration.
    bundle_settings: BundleSettings,

    /// The raw `.app` produced by the build.
    source_bundle: PathBuf,

    /// Output directory for the relocated bundle and disk image.
    project_out_directory: PathBuf,
}

impl Settings {
    /// Returns the product name.
    pub fn product_name(&self) -> &str {
        &self.package.product_name
    }

    /// Returns the version string.
    pub fn version_string(&self) -> &str {
        &self.package.version
    }

    /// Returns the raw build bundle the output is created from.
    pub fn source_bundle(&self) -> &Path {
        &self.source_bundle
    }

    /// Returns the project output directory.
    pub fn project_out_directory(&self) -> &Path {
        &self.project_out_directory
    }

    /// Path of the relocated `.app`.
    pub fn app_bundle_path(&self) -> PathBuf {
        self.project_out_directory
            .join(format!("{}.app", self.product_name()))
    }

    /// Disk image title: `{ProductName}-{Version}`.
    pub fn dmg_title(&self) -> String {
        format!("{}-{}", self.product_name(), self.version_string())
    }

    /// Returns the bundle settings.
    pub fn bundle_settings(&self) -> &BundleSettings {
        &self.bundle_settings
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    pub(super) fn new(
        package: PackageSettings,
        bundle_settings: BundleSettings,
        source_bundle: PathBuf,
        project_out_directory: PathBuf,
    ) -> Self {
        Self {
            package,
            bundle_settings,
            source_bundle,
            project_out_directory,
        }
    }
}
