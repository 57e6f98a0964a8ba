//! Core DMG creation logic using hdiutil.
//!
//! Handles the fundamental DMG creation workflow including:
//! - Staging the .app in a temporary directory
//! - Creating the Applications symlink
//! - Running hdiutil to generate the image

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    settings::{DmgSettings, Settings},
    utils::fs,
};
use std::path::{Path, PathBuf};
use tokio::fs::remove_file;

/// Arguments for `hdiutil create`.
pub fn hdiutil_args(staging: &Path, volume_name: &str, format: &str, dmg: &Path) -> Vec<String> {
    vec![
        "create".into(),
        "-srcfolder".into(),
        staging.display().to_string(),
        "-format".into(),
        format.into(),
        "-volname".into(),
        volume_name.into(),
        dmg.display().to_string(),
    ]
}

/// Create DMG from .app bundle using hdiutil
///
/// # DMG Creation Steps
/// 1. Create temporary staging directory using tempfile crate
/// 2. Copy .app bundle to staging directory
/// 3. Create Applications symlink: `staging/Applications -> /Applications`
/// 4. Run hdiutil create with the configured format
/// 5. Verify hdiutil succeeded
/// 6. Automatic cleanup (tempfile handles it)
///
/// # DMG Naming Convention
/// Format: `{ProductName}-{Version}.dmg`, which is also the volume name.
///
/// # Returns
/// PathBuf to created DMG file
pub async fn create_dmg(settings: &Settings, app_bundle: &Path, output_dir: &Path) -> Result<PathBuf> {
    let title = settings.dmg_title();
    let dmg_path = output_dir.join(format!("{}.dmg", title));
    let dmg_settings: &DmgSettings = &settings.bundle_settings().dmg;

    log::info!(" * Preparing to create diskimage");

    // Remove old DMG if exists
    if dmg_path.exists() {
        remove_file(&dmg_path)
            .await
            .fs_context("removing old disk image", &dmg_path)?;
    }

    // Create temporary staging directory
    let temp_dir = tempfile::tempdir().map_err(|e| {
        Error::GenericError(format!(
            "Failed to create temporary directory for DMG contents: {}",
            e
        ))
    })?;
    let staging_path = temp_dir.path();

    let app_name = app_bundle
        .file_name()
        .ok_or_else(|| Error::GenericError("Invalid app bundle path".into()))?;
    let staged_app = staging_path.join(app_name);

    log::info!(" * Copying directory: {}", app_name.to_string_lossy());
    fs::copy_dir(app_bundle, &staged_app).await?;

    // Create Applications symlink for drag-to-install UX
    #[cfg(unix)]
    if dmg_settings.applications_link {
        log::info!(" * Creating symlink Applications");
        let applications_link = staging_path.join("Applications");
        std::os::unix::fs::symlink("/Applications", &applications_link)
            .fs_context("creating Applications symlink", &applications_link)?;
    }

    log::info!(" * Creating disk image. Please wait...");

    let output = tokio::process::Command::new("hdiutil")
        .args(hdiutil_args(staging_path, &title, &dmg_settings.format, &dmg_path))
        .output()
        .await
        .map_err(|e| Error::GenericError(format!("Failed to execute hdiutil command: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::GenericError(format!("hdiutil failed: {}", stderr)));
    }

    log::info!(" * Removing temporary directory.");
    // tempfile automatically cleans up staging directory
    drop(temp_dir);

    log::info!("✓ Created {} DMG: {}", dmg_settings.format, dmg_path.display());
    Ok(dmg_path)
}
