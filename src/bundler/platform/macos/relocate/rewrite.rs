//! Atomic, idempotent load-path rewriting.

use super::tool::{LoadPathEdit, LoadPathTool};
use crate::bundler::{
    error::{Error, Result},
    utils::fs,
};
use std::{
    path::{Path, PathBuf},
    process::Command,
};

/// Applies install-name and reference edits to binaries in the bundle.
///
/// Every edit is made on a staged copy next to the target and renamed over it
/// only once the tool succeeds, so a failed edit leaves the binary untouched.
pub struct PathRewriter<'a> {
    tool: &'a dyn LoadPathTool,
    mode: Option<u32>,
}

impl<'a> PathRewriter<'a> {
    /// Creates a rewriter. When `mode` is set, the target's permission bits
    /// are set to it before each edit; otherwise they are left as found, even
    /// for read-only binaries.
    pub fn new(tool: &'a dyn LoadPathTool, mode: Option<u32>) -> Self {
        Self { tool, mode }
    }

    /// Sets the install name of `artifact` to `install_name`.
    pub fn set_self_identity(&self, artifact: &Path, install_name: &str) -> Result<()> {
        log::info!("Setting id of {} to {}", artifact.display(), install_name);
        self.apply_staged(artifact, &LoadPathEdit::SetId(install_name.to_string()))
    }

    /// Points `binary`'s reference `old` at `new`.
    ///
    /// Returns `false` without touching the file when `old == new` or when
    /// `binary` no longer records `old`, which makes repeated calls no-ops.
    pub fn redirect_reference(&self, binary: &Path, old: &str, new: &str) -> Result<bool> {
        if old == new {
            return Ok(false);
        }
        if !self.tool.list_dependencies(binary)?.iter().any(|dep| dep == old) {
            log::debug!("  {} no longer references {}", binary.display(), old);
            return Ok(false);
        }

        log::info!("Rewriting {}: {} -> {}", binary.display(), old, new);
        self.apply_staged(
            binary,
            &LoadPathEdit::Change {
                old: old.to_string(),
                new: new.to_string(),
            },
        )?;
        Ok(true)
    }

    fn apply_staged(&self, target: &Path, edit: &LoadPathEdit) -> Result<()> {
        // Symlinked paths (Versions/Current/...) are edited through their real
        // file so the link itself survives.
        let target = std::fs::canonicalize(target).map_err(|e| rewrite_error(target, e))?;

        if let Some(mode) = self.mode {
            fs::set_mode(&target, mode).map_err(|e| rewrite_error(&target, e))?;
        }

        let dir = target
            .parent()
            .ok_or_else(|| rewrite_error(&target, "binary has no parent directory"))?;
        let staged = tempfile::Builder::new()
            .prefix(".relocate-")
            .tempfile_in(dir)
            .map_err(|e| rewrite_error(&target, e))?;

        std::fs::copy(&target, staged.path()).map_err(|e| rewrite_error(&target, e))?;
        let permissions = std::fs::metadata(&target)
            .map_err(|e| rewrite_error(&target, e))?
            .permissions();
        if permissions.readonly() {
            fs::make_writable(staged.path()).map_err(|e| rewrite_error(&target, e))?;
        }

        self.tool.apply(staged.path(), edit).map_err(|e| match e {
            Error::Rewrite { reason, .. } => rewrite_error(&target, reason),
            other => other,
        })?;

        // The edited file takes over the target's permissions unchanged.
        std::fs::set_permissions(staged.path(), permissions)
            .map_err(|e| rewrite_error(&target, e))?;

        staged
            .persist(&target)
            .map_err(|e| rewrite_error(&target, e.error))?;
        Ok(())
    }
}

/// Runs `install_name_tool` to apply `edit` to `binary` in place.
pub fn install_name_tool(binary: &Path, edit: &LoadPathEdit) -> Result<()> {
    let mut command = Command::new("install_name_tool");
    match edit {
        LoadPathEdit::SetId(id) => {
            command.arg("-id").arg(id);
        }
        LoadPathEdit::Change { old, new } => {
            command.arg("-change").arg(old).arg(new);
        }
    }
    command.arg(binary);

    let output = command
        .output()
        .map_err(|e| rewrite_error(binary, format!("failed to run install_name_tool: {e}")))?;

    if !output.status.success() {
        return Err(rewrite_error(
            binary,
            format!(
                "install_name_tool exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        ));
    }

    Ok(())
}

fn rewrite_error(path: &Path, reason: impl std::fmt::Display) -> Error {
    Error::Rewrite {
        path: PathBuf::from(path),
        reason: reason.to_string(),
    }
}
