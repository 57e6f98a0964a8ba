//! Command line argument parsing and validation.

use crate::bundler::InspectorKind;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// Relocatable macOS application bundler
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_relocate",
    version,
    about = "Makes a macOS .app self-contained and packs it into a .dmg",
    long_about = "Copies a raw .app out of the build tree, bundles every non-system dylib and \
framework it links against into Contents/Frameworks, rewrites all load paths to be relative \
to @executable_path, then optionally signs the bundle and creates a disk image.

Usage:
  kodegen_bundler_relocate --source build/ChronoShare.app --release 0.3.1
  kodegen_bundler_relocate --source build/ChronoShare.app --git --no-dmg
  kodegen_bundler_relocate --source build/ChronoShare.app -r 0.3.1 --codesign 'Developer ID Application: Example'"
)]
#[command(group(
    ArgGroup::new("version_source")
        .required(true)
        .args(["release", "snapshot", "git"]),
))]
pub struct Args {
    /// Raw .app produced by the build
    #[arg(long, value_name = "APP")]
    pub source: PathBuf,

    /// Directory receiving the relocated .app and the .dmg
    #[arg(short = 'o', long, value_name = "DIR", default_value = "build/dist")]
    pub output_dir: PathBuf,

    /// Product name (defaults to the source bundle's name)
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Build a release with this version number
    #[arg(short, long, value_name = "VERSION")]
    pub release: Option<String>,

    /// Build a snapshot with this snapshot version
    #[arg(short, long, value_name = "VERSION")]
    pub snapshot: Option<String>,

    /// Build a snapshot versioned by `git describe`
    #[arg(short, long)]
    pub git: bool,

    /// Disable creation of the DMG
    #[arg(long)]
    pub no_dmg: bool,

    /// Identity to use for code signing (no signing when unset)
    #[arg(long, value_name = "IDENTITY")]
    pub codesign: Option<String>,

    /// LSMinimumSystemVersion written to Info.plist
    #[arg(long, value_name = "VERSION")]
    pub min_macos: Option<String>,

    /// Leave dependencies whose path contains this text alone (repeatable)
    #[arg(long, value_name = "TEXT")]
    pub exclude: Vec<String>,

    /// Extra directory searched for @rpath and bare-name dependencies (repeatable)
    #[arg(long, value_name = "DIR")]
    pub search_path: Vec<PathBuf>,

    /// Backend used to read dependency lists
    #[arg(long, value_enum)]
    pub inspector: Option<InspectorKind>,

    /// Write the relocation report as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Verbose output (per-reference detail)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.source.extension().and_then(|ext| ext.to_str()) != Some("app") {
            return Err(format!(
                "Source must be a .app bundle: {}",
                self.source.display()
            ));
        }

        for (flag, value) in [("--release", &self.release), ("--snapshot", &self.snapshot)] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(format!("{} needs a non-empty version", flag));
            }
        }

        if self.codesign.as_deref().is_some_and(str::is_empty) {
            return Err("--codesign needs a signing identity".to_string());
        }

        Ok(())
    }
}
