//! Hand-off to a UI toolkit's own deployment tool (e.g. `macdeployqt`).
//!
//! The toolkit's libraries are excluded from relocation through
//! `excluded_substrings`, so this tool is the one that bundles them.

use crate::bundler::{Error, Result, settings::ToolkitSettings};
use std::path::Path;

/// Arguments passed to the deploy tool.
pub fn deploy_args(app_bundle: &Path, executable: &Path, toolkit: &ToolkitSettings) -> Vec<String> {
    let mut args = vec![
        app_bundle.display().to_string(),
        format!("-executable={}", executable.display()),
    ];
    args.extend(toolkit.args.iter().cloned());
    args
}

/// Runs the deploy tool on the bundle.
pub async fn deploy(app_bundle: &Path, executable: &Path, toolkit: &ToolkitSettings) -> Result<()> {
    log::info!(" * Running {}", toolkit.command);

    let output = tokio::process::Command::new(&toolkit.command)
        .args(deploy_args(app_bundle, executable, toolkit))
        .output()
        .await
        .map_err(|e| {
            Error::GenericError(format!("Failed to execute {}: {}", toolkit.command, e))
        })?;

    if !output.status.success() {
        return Err(Error::GenericError(format!(
            "{} failed: {}",
            toolkit.command,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(())
}
