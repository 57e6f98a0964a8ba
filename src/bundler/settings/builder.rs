//! Builder for constructing Settings.

use super::{BundleSettings, PackageSettings, Settings};
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// Provides a fluent API for building bundler settings with validation.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_relocate::bundler::{BundleSettings, PackageSettings, SettingsBuilder};
///
/// # fn example() -> kodegen_bundler_relocate::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .source_bundle("build/ChronoShare.app")
///     .project_out_directory("build/dist")
///     .package_settings(PackageSettings {
///         product_name: "ChronoShare".into(),
///         version: "0.3.1".into(),
///     })
///     .bundle_settings(BundleSettings::default())
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    source_bundle: Option<PathBuf>,
    project_out_directory: Option<PathBuf>,
    package_settings: Option<PackageSettings>,
    bundle_settings: BundleSettings,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the raw `.app` produced by the build.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn source_bundle<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source_bundle = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the project output directory.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn project_out_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_out_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets package metadata.
    ///
    /// When not set, the product name is taken from the source bundle's
    /// file stem and the version must be provided some other way.
    pub fn package_settings(mut self, settings: PackageSettings) -> Self {
        self.package_settings = Some(settings);
        self
    }

    /// Sets bundle configuration.
    ///
    /// Default: [`BundleSettings::default`]
    pub fn bundle_settings(mut self, settings: BundleSettings) -> Self {
        self.bundle_settings = settings;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing:
    /// - `source_bundle`
    /// - `project_out_directory`
    /// - `package_settings` (or a product name derivable from the source bundle)
    pub fn build(self) -> crate::bundler::Result<Settings> {
        use crate::bundler::error::Context;

        let source_bundle = self.source_bundle.context("source_bundle is required")?;
        let project_out_directory = self
            .project_out_directory
            .context("project_out_directory is required")?;

        let mut package = self
            .package_settings
            .context("package_settings is required")?;
        if package.product_name.is_empty() {
            package.product_name = source_bundle
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .context("cannot derive product name from source bundle")?;
        }
        if package.version.is_empty() {
            crate::bail!("a release or snapshot version is required");
        }

        Ok(Settings::new(
            package,
            self.bundle_settings,
            source_bundle,
            project_out_directory,
        ))
    }
}
