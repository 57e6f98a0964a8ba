//! macOS `.app` and `.dmg` bundling.

pub mod app;
pub mod dmg;
pub mod relocate;
pub mod sign;
pub mod toolkit;

use crate::bundler::{Result, settings::RelocationSettings};
use relocate::{LoadPathTool, RelocationReport, Relocator};
use std::path::{Path, PathBuf};

/// Relocates the dependency closure of the main executable and of every file
/// under the auxiliary executable directories, sharing one ledger so common
/// dependencies are copied once.
///
/// Runs synchronously; the caller is expected to be on a blocking thread.
pub fn relocate_binaries(
    settings: &RelocationSettings,
    tool: &dyn LoadPathTool,
    frameworks_dir: &Path,
    main_executable: &Path,
    auxiliary_dirs: &[PathBuf],
) -> Result<RelocationReport> {
    log::info!(" * Taking care of libraries");

    let executable_dir = main_executable
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let mut relocator = Relocator::new(settings, tool, frameworks_dir, executable_dir);

    relocator.resolve(main_executable, None)?;

    for dir in auxiliary_dirs {
        log::info!(" * Relocating executables in {}", dir.display());
        for entry in walkdir::WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() {
                relocator.resolve(entry.path(), None)?;
            }
        }
    }

    if !relocator.ledger().is_empty() {
        log::info!(
            "Bundled {} unique dependencies into Frameworks/",
            relocator.ledger().len()
        );
    }

    Ok(relocator.into_report())
}
