//! Bundle configuration loaded from a TOML file.

use super::{DmgSettings, MacOsSettings, RelocationSettings};
use crate::bundler::error::{ErrorExt, Result};
use std::path::{Path, PathBuf};

/// A directory of extra executables copied into the bundle and relocated
/// like the main executable.
///
/// ```toml
/// [[auxiliary]]
/// source = "/usr/local/opt/nfd/bin"
/// destination = "Platform"
/// ```
#[derive(Debug, Clone, serde::Deserialize)]
pub struct AuxiliarySettings {
    /// Directory to copy.
    pub source: PathBuf,

    /// Destination relative to `Contents`.
    pub destination: PathBuf,
}

/// External tool that deploys a UI toolkit's own libraries into the bundle
/// (e.g. `macdeployqt`). It is invoked as
/// `<command> <bundle> -executable=<main executable> <args...>`.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ToolkitSettings {
    /// Executable to run.
    ///
    /// Default: "macdeployqt"
    #[serde(default = "default_toolkit_command")]
    pub command: String,

    /// Extra arguments, e.g. `["-qmldir=src"]`.
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_toolkit_command() -> String {
    "macdeployqt".into()
}

/// Bundle configuration.
///
/// # Configuration
///
/// ```toml
/// resources = ["qt.conf"]
/// config_files = ["client.conf.sample"]
/// config_dir = "etc/ndn"
///
/// [toolkit]
/// command = "macdeployqt"
/// args = ["-qmldir=src"]
///
/// [relocation]
/// excluded_substrings = ["Qt"]
///
/// [macos]
/// frameworks = ["osx/Frameworks/Sparkle.framework"]
/// ```
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct BundleSettings {
    /// Files and directories copied into `Contents/Resources`.
    pub resources: Vec<PathBuf>,

    /// Files and directories copied into `Contents/<config_dir>`.
    pub config_files: Vec<PathBuf>,

    /// Config directory relative to `Contents`.
    ///
    /// Default: "etc"
    pub config_dir: PathBuf,

    /// Extra executable directories.
    pub auxiliary: Vec<AuxiliarySettings>,

    /// UI toolkit deploy step. Skipped when absent.
    pub toolkit: Option<ToolkitSettings>,

    /// Where to write a JSON relocation report.
    pub report: Option<PathBuf>,

    /// Dependency relocation settings.
    pub relocation: RelocationSettings,

    /// macOS-specific settings.
    pub macos: MacOsSettings,

    /// DMG-specific settings.
    pub dmg: DmgSettings,
}

impl Default for BundleSettings {
    fn default() -> Self {
        Self {
            resources: Vec::new(),
            config_files: Vec::new(),
            config_dir: PathBuf::from("etc"),
            auxiliary: Vec::new(),
            toolkit: None,
            report: None,
            relocation: RelocationSettings::default(),
            macos: MacOsSettings::default(),
            dmg: DmgSettings::default(),
        }
    }
}

impl BundleSettings {
    /// Parses settings from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads settings from a TOML file.
    ///
    /// Relative paths in the file are resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text =
            std::fs::read_to_string(path).fs_context("failed to read bundle configuration", path)?;
        let mut settings = Self::from_toml_str(&text)?;

        if let Some(base) = path.parent() {
            settings.rebase(base);
        }
        log::debug!("Loaded bundle configuration from {}", path.display());
        Ok(settings)
    }

    fn rebase(&mut self, base: &Path) {
        let rebase = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };

        self.resources.iter_mut().for_each(rebase);
        self.config_files.iter_mut().for_each(rebase);
        self.macos.frameworks.iter_mut().for_each(rebase);
        self.relocation.search_paths.iter_mut().for_each(rebase);
        self.auxiliary.iter_mut().for_each(|aux| rebase(&mut aux.source));
        if let Some(report) = self.report.as_mut() {
            rebase(report);
        }
    }
}
