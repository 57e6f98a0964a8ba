//! macOS platform-specific settings.

use std::path::PathBuf;

/// macOS application bundle (.app) configuration.
///
/// # Configuration
///
/// ```toml
/// [macos]
/// minimum_system_version = "10.12.0"
/// signing_identity = "Developer ID Application: Your Name (TEAMID)"
/// frameworks = ["osx/Frameworks/Sparkle.framework"]
/// ```
#[derive(Clone, Debug, serde::Deserialize)]
pub struct MacOsSettings {
    /// Minimum macOS version required (LSMinimumSystemVersion).
    ///
    /// Default: "10.12.0"
    #[serde(default = "default_minimum_system_version")]
    pub minimum_system_version: Option<String>,

    /// Code signing identity name.
    ///
    /// Example: "Developer ID Application: Your Name (TEAMID)"
    ///
    /// Use "-" for ad-hoc signing (development only).
    ///
    /// Default: None (unsigned)
    #[serde(default)]
    pub signing_identity: Option<String>,

    /// Prebuilt frameworks copied verbatim into `Contents/Frameworks`
    /// after dependency relocation.
    ///
    /// Default: Empty
    #[serde(default)]
    pub frameworks: Vec<PathBuf>,
}

impl Default for MacOsSettings {
    fn default() -> Self {
        Self {
            minimum_system_version: default_minimum_system_version(),
            signing_identity: None,
            frameworks: Vec::new(),
        }
    }
}

fn default_minimum_system_version() -> Option<String> {
    Some("10.12.0".into())
}

/// macOS DMG disk image configuration.
///
/// # Configuration
///
/// ```toml
/// [dmg]
/// format = "UDBZ"
/// applications_link = true
/// ```
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct DmgSettings {
    /// Whether to produce a disk image at all.
    ///
    /// Default: true
    pub enabled: bool,

    /// `hdiutil` image format.
    ///
    /// Default: "UDBZ" (bzip2-compressed)
    pub format: String,

    /// Add an `/Applications` symlink next to the app for drag-to-install.
    ///
    /// Default: true
    pub applications_link: bool,
}

impl Default for DmgSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            format: "UDBZ".into(),
            applications_link: true,
        }
    }
}
