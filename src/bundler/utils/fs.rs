//! File system utilities for bundling.
//!
//! Provides safe file operations with automatic directory creation,
//! symlink preservation, and comprehensive error handling. The `_sync`
//! variants are used by the relocation walk, which runs on a blocking thread.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    io::{self},
    path::Path,
};
use tokio::fs;

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }

    // create_dir_all is already idempotent - succeeds even if dir exists
    fs::create_dir_all(path)
        .await
        .fs_context("failed to create directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err(e).fs_context("failed to remove directory", path),
    }
}

/// Makes a symbolic link to a directory.
#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a directory.
#[cfg(windows)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(unix)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(windows)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub fn copy_file_sync(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{from:?} does not exist")));
    }
    if !from.is_file() {
        return Err(Error::GenericError(format!("{from:?} is not a file")));
    }
    if let Some(dest_dir) = to.parent() {
        std::fs::create_dir_all(dest_dir).fs_context("failed to create directory", dest_dir)?;
    }
    std::fs::copy(from, to).fs_context("failed to copy file to", to)?;
    Ok(())
}

/// Async wrapper around [`copy_file_sync`].
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    let from = from.to_path_buf();
    let to = to.to_path_buf();
    tokio::task::spawn_blocking(move || copy_file_sync(&from, &to))
        .await
        .map_err(|e| Error::GenericError(format!("File copy task panicked: {}", e)))?
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// Symlinks are recreated verbatim rather than followed.
/// Fails if the source path is not a directory or doesn't exist,
/// or if the destination path already exists.
pub fn copy_dir_sync(from: &Path, to: &Path) -> Result<()> {
    copy_tree(from, to, false)
}

/// Like [`copy_dir_sync`], but symlinks are followed and their targets are
/// copied in their place, so the copy never points back outside `to`.
///
/// Dangling links and link cycles are errors.
pub fn copy_dir_resolved_sync(from: &Path, to: &Path) -> Result<()> {
    copy_tree(from, to, true)
}

fn copy_tree(from: &Path, to: &Path, follow_links: bool) -> Result<()> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{from:?} does not exist")));
    }
    if !from.is_dir() {
        return Err(Error::GenericError(format!("{from:?} is not a Directory")));
    }
    if std::fs::symlink_metadata(to).is_ok() {
        return Err(Error::GenericError(format!("{to:?} already exists")));
    }

    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent).fs_context("failed to create directory", parent)?;
    }

    for entry in walkdir::WalkDir::new(from).follow_links(follow_links) {
        let entry = entry?;
        debug_assert!(entry.path().starts_with(from));
        let rel_path = entry.path().strip_prefix(from)?;
        let dest_path = to.join(rel_path);

        if entry.file_type().is_symlink() {
            let target = std::fs::read_link(entry.path())
                .fs_context("failed to read symlink", entry.path())?;
            let linked = if entry.path().is_dir() {
                symlink_dir(&target, &dest_path)
            } else {
                symlink_file(&target, &dest_path)
            };
            linked.fs_context("failed to create symlink", &dest_path)?;
        } else if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest_path)
                .fs_context("failed to create directory", &dest_path)?;
        } else {
            std::fs::copy(entry.path(), &dest_path)
                .fs_context("failed to copy file to", &dest_path)?;
        }
    }

    Ok(())
}

/// Like [`copy_dir_sync`], but removes an existing destination first.
pub fn replace_dir_sync(from: &Path, to: &Path) -> Result<()> {
    match std::fs::symlink_metadata(to) {
        Ok(meta) if meta.is_dir() => {
            std::fs::remove_dir_all(to).fs_context("failed to remove directory", to)?
        }
        Ok(_) => std::fs::remove_file(to).fs_context("failed to remove file", to)?,
        Err(_) => {}
    }
    copy_dir_sync(from, to)
}

/// Recursively copies a directory on a blocking thread.
///
/// See [`copy_dir_sync`].
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    // Clone paths for move into blocking closure
    let from = from.to_path_buf();
    let to = to.to_path_buf();

    // Offload blocking work to dedicated thread pool
    tokio::task::spawn_blocking(move || copy_dir_sync(&from, &to))
        .await
        .map_err(|e| Error::GenericError(format!("Directory copy task panicked: {}", e)))?
}

/// Copies a directory on a blocking thread, materializing symlinks.
///
/// See [`copy_dir_resolved_sync`].
pub async fn copy_dir_resolved(from: &Path, to: &Path) -> Result<()> {
    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || copy_dir_resolved_sync(&from, &to))
        .await
        .map_err(|e| Error::GenericError(format!("Directory copy task panicked: {}", e)))?
}

/// Copies a file or a directory tree into `dest_dir`, keeping its file name.
pub async fn copy_into(src: &Path, dest_dir: &Path) -> Result<()> {
    let name = src
        .file_name()
        .ok_or_else(|| Error::GenericError(format!("{src:?} has no file name")))?;
    let dest = dest_dir.join(name);

    if src.is_dir() {
        log::info!(" * Copying directory: {}", name.to_string_lossy());
        copy_dir(src, &dest).await
    } else {
        log::info!(" * Copying file: {}", name.to_string_lossy());
        copy_file(src, &dest).await
    }
}

/// Sets the permission bits of `path` (following symlinks).
#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .fs_context("failed to set permissions on", path)
}

/// Permission bits are not applicable on this platform.
#[cfg(not(unix))]
pub fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

/// Adds owner write permission to `path`, keeping the other bits.
#[cfg(unix)]
pub fn make_writable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = std::fs::metadata(path)
        .fs_context("failed to read metadata of", path)?
        .permissions()
        .mode();
    set_mode(path, mode | 0o200)
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
pub fn make_writable(path: &Path) -> Result<()> {
    let mut permissions = std::fs::metadata(path)
        .fs_context("failed to read metadata of", path)?
        .permissions();
    permissions.set_readonly(false);
    std::fs::set_permissions(path, permissions).fs_context("failed to set permissions on", path)
}

/// Returns `true` if both paths exist and resolve to the same file.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Removes development-only content from a copied framework:
/// the top-level `Headers` link, `<name>.prl`, and `Versions/Current/Headers`.
pub fn strip_framework_headers(framework_dir: &Path, name: &str) -> Result<()> {
    let prl = framework_dir.join(format!("{name}.prl"));
    let headers_link = framework_dir.join("Headers");
    let current_headers = framework_dir.join("Versions/Current/Headers");

    // Resolve the versioned directory before the top-level link goes away.
    if let (Ok(real_headers), Ok(root)) = (
        std::fs::canonicalize(&current_headers),
        std::fs::canonicalize(framework_dir),
    ) {
        if real_headers.starts_with(&root) {
            std::fs::remove_dir_all(&real_headers)
                .fs_context("failed to remove headers", &real_headers)?;
        }
    }

    for path in [prl, headers_link, current_headers] {
        match std::fs::symlink_metadata(&path) {
            Ok(meta) if meta.is_dir() => {
                std::fs::remove_dir_all(&path).fs_context("failed to remove", &path)?
            }
            Ok(_) => std::fs::remove_file(&path).fs_context("failed to remove", &path)?,
            Err(_) => {}
        }
    }

    Ok(())
}
