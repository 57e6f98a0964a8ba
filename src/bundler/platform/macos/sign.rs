//! Code signing with `codesign`.

use crate::bundler::{Error, Result, settings::Settings};
use std::path::Path;

/// Signs an `.app` bundle, including everything nested inside it.
pub async fn sign_app(app_bundle: &Path, identity: &str) -> Result<()> {
    log::info!(" * Signing binaries with identity `{}'", identity);
    codesign(app_bundle, identity).await
}

/// Signs a disk image.
pub async fn sign_dmg(dmg_path: &Path, identity: &str) -> Result<()> {
    log::info!(" * Signing .dmg with identity `{}'", identity);
    codesign(dmg_path, identity).await
}

/// Returns the configured signing identity, if any.
pub fn signing_identity(settings: &Settings) -> Option<&str> {
    settings
        .bundle_settings()
        .macos
        .signing_identity
        .as_deref()
        .filter(|identity| !identity.is_empty())
}

async fn codesign(path: &Path, identity: &str) -> Result<()> {
    let output = tokio::process::Command::new("codesign")
        .args(["-vvvv", "--deep", "--force", "--sign", identity])
        .arg(path)
        .output()
        .await
        .map_err(|e| Error::GenericError(format!("Failed to execute codesign: {}", e)))?;

    if !output.status.success() {
        return Err(Error::GenericError(format!(
            "codesign failed for {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    log::info!("✓ Signed {}", path.display());
    Ok(())
}
