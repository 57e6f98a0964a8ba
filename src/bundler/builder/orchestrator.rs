//! Main bundler orchestration and coordination.
//!
//! This module provides the [`Bundler`] orchestrator that drives the
//! relocation core and the downstream macOS packaging steps in a fixed order.

use std::{path::PathBuf, sync::Arc};

use crate::bundler::{
    BundledArtifact, Error, PackageType, Result, Settings,
    platform::macos::{
        app::AppBundle,
        dmg, relocate_binaries,
        relocate::{LoadPathTool, SystemTools},
        sign, toolkit,
    },
    settings::InspectorKind,
    utils::fs,
};

use super::{
    checksum::{artifact_size, calculate_sha256},
    tool_detection::{self, CODESIGN, HDIUTIL, INSTALL_NAME_TOOL, OTOOL},
};

/// Main bundler orchestrator.
///
/// Owns the immutable [`Settings`] and the load-path tool used by the
/// relocation core. The real Apple tools are used by default; tests and
/// embedders can substitute their own [`LoadPathTool`] with
/// [`with_tool`](Self::with_tool).
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_relocate::bundler::{Bundler, Settings};
///
/// # async fn example(settings: Settings) -> kodegen_bundler_relocate::bundler::Result<()> {
/// let artifacts = Bundler::new(settings).bundle().await?;
/// for artifact in artifacts {
///     println!("{}: {} ({})", artifact.package_type, artifact.path.display(), artifact.checksum);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Bundler {
    settings: Settings,
    tool: Arc<dyn LoadPathTool + Send + Sync>,
    system_tools: bool,
}

impl std::fmt::Debug for Bundler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bundler")
            .field("settings", &self.settings)
            .field("system_tools", &self.system_tools)
            .finish_non_exhaustive()
    }
}

impl Bundler {
    /// Creates a bundler that inspects and rewrites with the system tools.
    pub fn new(settings: Settings) -> Self {
        let inspector = settings.bundle_settings().relocation.inspector;
        Self {
            settings,
            tool: Arc::new(SystemTools::new(inspector)),
            system_tools: true,
        }
    }

    /// Creates a bundler that uses `tool` for every load-path query and edit.
    pub fn with_tool(settings: Settings, tool: Arc<dyn LoadPathTool + Send + Sync>) -> Self {
        Self {
            settings,
            tool,
            system_tools: false,
        }
    }

    /// Returns a reference to the bundler settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs the whole pipeline.
    ///
    /// # Bundling Order
    ///
    /// 1. Copy the raw bundle to the output directory
    /// 2. Copy auxiliary executable directories into `Contents`, resolving symlinks
    /// 3. Relocate dependencies of the main and auxiliary executables
    /// 4. Copy resources and config files
    /// 5. Run the toolkit deploy tool, if configured
    /// 6. Copy extra frameworks
    /// 7. Write Info.plist
    /// 8. Sign the bundle, if an identity is configured
    /// 9. Create (and sign) the disk image, if enabled
    ///
    /// # Returns
    ///
    /// One [`BundledArtifact`] for the `.app` and, when created, one for the
    /// `.dmg`.
    pub async fn bundle(&self) -> Result<Vec<BundledArtifact>> {
        self.check_tools()?;

        let bundle_settings = self.settings.bundle_settings();
        let app_path = self.settings.app_bundle_path();
        fs::create_dir_all(self.settings.project_out_directory(), false).await?;

        let mut app = AppBundle::create(self.settings.source_bundle(), &app_path).await?;
        if let Some(version) = &bundle_settings.macos.minimum_system_version {
            app.set_min_macos_version(version);
        }

        let frameworks_dir = app.reset_frameworks_dir().await?;

        let mut auxiliary_dirs = Vec::with_capacity(bundle_settings.auxiliary.len());
        for auxiliary in &bundle_settings.auxiliary {
            let destination = app.contents_dir().join(&auxiliary.destination);
            log::info!(
                " * Copying {} to {}",
                auxiliary.source.display(),
                destination.display()
            );
            fs::copy_dir_resolved(&auxiliary.source, &destination).await?;
            auxiliary_dirs.push(destination);
        }

        let report = self
            .relocate(frameworks_dir, app.main_executable(), auxiliary_dirs)
            .await?;
        if let Some(report_path) = &bundle_settings.report {
            report.write_json(report_path)?;
            log::info!("Wrote relocation report to {}", report_path.display());
        }

        app.copy_resources(&bundle_settings.resources).await?;
        app.copy_config_files(&bundle_settings.config_files, &bundle_settings.config_dir)
            .await?;

        if let Some(toolkit_settings) = &bundle_settings.toolkit {
            toolkit::deploy(app.path(), &app.main_executable(), toolkit_settings).await?;
        }

        app.copy_frameworks(&bundle_settings.macos.frameworks).await?;
        app.save()?;

        if let Some(identity) = sign::signing_identity(&self.settings) {
            sign::sign_app(app.path(), identity).await?;
        }

        let mut artifacts = vec![artifact(PackageType::MacOsBundle, app_path.clone()).await?];

        if bundle_settings.dmg.enabled {
            let dmg_path = dmg::bundle_project(&self.settings, &app_path).await?;
            artifacts.push(artifact(PackageType::Dmg, dmg_path).await?);
        }

        Ok(artifacts)
    }

    /// Runs the synchronous relocation core on a blocking thread.
    async fn relocate(
        &self,
        frameworks_dir: PathBuf,
        main_executable: PathBuf,
        auxiliary_dirs: Vec<PathBuf>,
    ) -> Result<crate::bundler::relocate::RelocationReport> {
        let relocation = self.settings.bundle_settings().relocation.clone();
        let tool = Arc::clone(&self.tool);

        tokio::task::spawn_blocking(move || {
            relocate_binaries(
                &relocation,
                &*tool,
                &frameworks_dir,
                &main_executable,
                &auxiliary_dirs,
            )
        })
        .await
        .map_err(|e| Error::GenericError(format!("relocation task failed: {}", e)))?
    }

    /// Fails early when an external tool needed by this run is missing.
    fn check_tools(&self) -> Result<()> {
        let bundle_settings = self.settings.bundle_settings();

        if self.system_tools {
            tool_detection::require(
                "install_name_tool",
                &INSTALL_NAME_TOOL,
                "rewrite library load paths",
            )?;
            if bundle_settings.relocation.inspector == InspectorKind::Otool {
                tool_detection::require("otool", &OTOOL, "list library dependencies")?;
            }
        }

        if sign::signing_identity(&self.settings).is_some() {
            tool_detection::require("codesign", &CODESIGN, "sign the bundle")?;
        }

        if bundle_settings.dmg.enabled {
            tool_detection::require("hdiutil", &HDIUTIL, "create the disk image")?;
        }

        if let Some(toolkit_settings) = &bundle_settings.toolkit {
            tool_detection::require(
                &toolkit_settings.command,
                &tool_detection::locate(&toolkit_settings.command),
                "deploy the UI toolkit",
            )?;
        }

        Ok(())
    }
}

async fn artifact(package_type: PackageType, path: PathBuf) -> Result<BundledArtifact> {
    let size = artifact_size(&path).await?;
    let checksum = calculate_sha256(&path).await?;
    log::info!("✓ {} ({} bytes, sha256 {})", path.display(), size, checksum);

    Ok(BundledArtifact {
        package_type,
        path,
        size,
        checksum,
    })
}
