//! Package metadata and configuration.

/// Package metadata and configuration.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_relocate::bundler::PackageSettings;
///
/// let settings = PackageSettings {
///     product_name: "ChronoShare".into(),
///     version: "0.3.1".into(),
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub struct PackageSettings {
    /// Product name, used for the `.app` and the disk image.
    ///
    /// Usually the file stem of the source bundle (`ChronoShare.app` -> `ChronoShare`).
    pub product_name: String,

    /// Release or snapshot version string.
    ///
    /// Example: "1.0.0", "0.2.3-14-g0a1b2c3"
    pub version: String,
}
