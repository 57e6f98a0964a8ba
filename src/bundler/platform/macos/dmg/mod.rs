//! macOS DMG disk image creator.
//!
//! Creates drag-to-install DMG files using the native hdiutil tool.
//! The DMG includes the .app bundle and an Applications symlink.

mod creation;

use crate::bundler::{error::Result, settings::Settings, utils::fs};
use std::path::{Path, PathBuf};

pub use creation::create_dmg;

/// Bundle the relocated .app as a DMG disk image
///
/// # Process
/// 1. Prepare the output directory
/// 2. Stage the .app with an Applications symlink and run hdiutil
/// 3. Sign the DMG if a signing identity is configured
///
/// # Returns
/// Path to created DMG file.
pub async fn bundle_project(settings: &Settings, app_bundle: &Path) -> Result<PathBuf> {
    log::info!("Creating DMG for {}", settings.product_name());

    let output_dir = settings.project_out_directory();
    fs::create_dir_all(output_dir, false).await?;

    let dmg_path = create_dmg(settings, app_bundle, output_dir).await?;

    if let Some(identity) = super::sign::signing_identity(settings) {
        super::sign::sign_dmg(&dmg_path, identity).await?;
    }

    Ok(dmg_path)
}
