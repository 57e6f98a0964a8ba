//! The `.app` bundle being prepared.
//!
//! An [`AppBundle`] is created by copying the raw build bundle, knows where
//! its standard directories live, and owns the Info.plist, which is read once
//! on creation and written once by [`AppBundle::save`].

use crate::bundler::{
    error::{Context, Error, ErrorExt, Result},
    utils::fs,
};
use std::path::{Path, PathBuf};

/// A relocatable application bundle under construction.
#[derive(Debug)]
pub struct AppBundle {
    path: PathBuf,
    info_path: PathBuf,
    info: plist::Dictionary,
    executable: String,
}

impl AppBundle {
    /// Copies `source` (the raw build output) to `destination` and loads its
    /// Info.plist. Any existing bundle at `destination` is removed first.
    pub async fn create(source: &Path, destination: &Path) -> Result<Self> {
        log::info!(" * Preparing AppBundle");

        fs::remove_dir_all(destination).await?;
        fs::copy_dir(source, destination)
            .await
            .with_context(|| format!("copying {} to {}", source.display(), destination.display()))?;

        Self::open(destination)
    }

    /// Opens an existing bundle.
    pub fn open(path: &Path) -> Result<Self> {
        let info_path = path.join("Contents/Info.plist");
        let info = plist::Value::from_file(&info_path)?
            .into_dictionary()
            .context("Info.plist is not a dictionary")?;

        let executable = info
            .get("CFBundleExecutable")
            .and_then(plist::Value::as_string)
            .map(str::to_string)
            .ok_or_else(|| {
                Error::GenericError(format!(
                    "{} has no CFBundleExecutable",
                    info_path.display()
                ))
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            info_path,
            info,
            executable,
        })
    }

    /// Bundle root (`Foo.app`).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Contents` directory.
    pub fn contents_dir(&self) -> PathBuf {
        self.path.join("Contents")
    }

    /// `Contents/MacOS`.
    pub fn macos_dir(&self) -> PathBuf {
        self.contents_dir().join("MacOS")
    }

    /// `Contents/Frameworks`.
    pub fn frameworks_dir(&self) -> PathBuf {
        self.contents_dir().join("Frameworks")
    }

    /// `Contents/Resources`.
    pub fn resources_dir(&self) -> PathBuf {
        self.contents_dir().join("Resources")
    }

    /// Name of the main executable (CFBundleExecutable).
    pub fn executable_name(&self) -> &str {
        &self.executable
    }

    /// Path of the main executable.
    pub fn main_executable(&self) -> PathBuf {
        self.macos_dir().join(&self.executable)
    }

    /// Empties (or creates) `Contents/Frameworks` so relocation starts clean.
    pub async fn reset_frameworks_dir(&self) -> Result<PathBuf> {
        let dir = self.frameworks_dir();
        fs::create_dir_all(&dir, true).await?;
        Ok(dir)
    }

    /// Records LSMinimumSystemVersion. Written by [`save`](Self::save).
    pub fn set_min_macos_version(&mut self, version: &str) {
        log::info!(" * Setting minimum Mac OS X version to: {}", version);
        self.info.insert(
            "LSMinimumSystemVersion".to_string(),
            plist::Value::String(version.to_string()),
        );
    }

    /// Reads a string value from the Info.plist.
    pub fn info_string(&self, key: &str) -> Option<&str> {
        self.info.get(key).and_then(plist::Value::as_string)
    }

    /// Copies resources into `Contents/Resources`.
    pub async fn copy_resources(&self, resources: &[PathBuf]) -> Result<()> {
        log::info!(" * Copying needed resources");
        copy_all(resources, &self.resources_dir()).await
    }

    /// Copies config files into `Contents/<config_dir>`.
    pub async fn copy_config_files(&self, files: &[PathBuf], config_dir: &Path) -> Result<()> {
        log::info!(" * Copying needed config files");
        copy_all(files, &self.contents_dir().join(config_dir)).await
    }

    /// Copies prebuilt frameworks into `Contents/Frameworks`.
    ///
    /// A framework already present (e.g. pulled in by relocation) is kept.
    pub async fn copy_frameworks(&self, frameworks: &[PathBuf]) -> Result<()> {
        let dir = self.frameworks_dir();
        fs::create_dir_all(&dir, false).await?;

        for framework in frameworks {
            log::info!(" * Copying framework {}", framework.display());
            let name = framework.file_name().with_context(|| {
                format!("framework path {} has no name", framework.display())
            })?;
            if dir.join(name).exists() {
                log::info!("   {} already bundled, keeping it", name.to_string_lossy());
                continue;
            }
            fs::copy_into(framework, &dir).await?;
        }
        Ok(())
    }

    /// Writes the Info.plist back to disk.
    pub fn save(&self) -> Result<()> {
        plist::Value::Dictionary(self.info.clone()).to_file_xml(&self.info_path)?;
        log::info!(" * Done!");
        Ok(())
    }
}

async fn copy_all(sources: &[PathBuf], dest_dir: &Path) -> Result<()> {
    if sources.is_empty() {
        return Ok(());
    }
    tokio::fs::create_dir_all(dest_dir)
        .await
        .fs_context("failed to create directory", dest_dir)?;

    for source in sources {
        fs::copy_into(source, dest_dir).await?;
    }
    Ok(())
}
