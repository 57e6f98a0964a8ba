//! Artifact checksum calculation.
//!
//! SHA256 checksums for bundled artifacts, supporting both single files
//! (the `.dmg`) and directory trees (the `.app`).

use crate::{
    bail,
    bundler::{Error, Result, error::ErrorExt},
};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Calculates the SHA256 checksum of a file or directory.
///
/// Directories are hashed over every regular file in sorted path order,
/// feeding each file's relative path before its content, so the result
/// depends on both layout and bytes.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash (64 characters)
/// * `Err` - If path cannot be read or is neither file nor directory
pub async fn calculate_sha256(path: &Path) -> Result<String> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || sha256_of(&path))
        .await
        .map_err(|e| Error::GenericError(format!("checksum task failed: {}", e)))?
}

/// Total size in bytes of a file, or of every regular file below a directory.
pub async fn artifact_size(path: &Path) -> Result<u64> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let mut size = 0u64;
        for entry in walkdir::WalkDir::new(&path) {
            let entry = entry?;
            if entry.file_type().is_file() {
                size += entry.metadata()?.len();
            }
        }
        Ok(size)
    })
    .await
    .map_err(|e| Error::GenericError(format!("size task failed: {}", e)))?
}

fn sha256_of(path: &Path) -> Result<String> {
    let metadata = std::fs::metadata(path).fs_context("reading artifact metadata", path)?;
    let mut hasher = Sha256::new();

    if metadata.is_file() {
        hash_file(&mut hasher, path)?;
    } else if metadata.is_dir() {
        let mut files: Vec<PathBuf> = Vec::new();
        for entry in walkdir::WalkDir::new(path).follow_links(false) {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        files.sort();

        for file in files {
            let relative = file.strip_prefix(path)?;
            hasher.update(relative.to_string_lossy().as_bytes());
            hash_file(&mut hasher, &file)?;
        }
    } else {
        bail!("Path is neither file nor directory: {}", path.display())
    }

    Ok(format!("{:x}", hasher.finalize()))
}

fn hash_file(hasher: &mut Sha256, path: &Path) -> Result<()> {
    let mut file = std::fs::File::open(path).fs_context("opening file for hashing", path)?;
    std::io::copy(&mut file, hasher).fs_context("reading file for hash calculation", path)?;
    Ok(())
}
