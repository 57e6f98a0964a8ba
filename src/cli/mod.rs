//! Command line interface for the relocating bundler.
//!
//! Parses arguments, layers them over the optional TOML configuration, and
//! runs the [`Bundler`](crate::bundler::Bundler).

mod args;

pub use args::Args;

use crate::{
    bundler::{BundleSettings, Bundler, PackageSettings, SettingsBuilder},
    error::{CliError, Result},
};

/// Main CLI entry point
///
/// Returns the process exit code on success.
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    init_logging(args.verbose);

    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let version = resolve_version(&args).await?;
    log::info!("Bundling {} version {}", args.source.display(), version);

    let settings = SettingsBuilder::new()
        .source_bundle(&args.source)
        .project_out_directory(&args.output_dir)
        .package_settings(PackageSettings {
            product_name: args.name.clone().unwrap_or_default(),
            version,
        })
        .bundle_settings(bundle_settings(&args)?)
        .build()?;

    let artifacts = Bundler::new(settings).bundle().await?;
    for artifact in &artifacts {
        println!(
            "{}\t{}\t{}",
            artifact.package_type,
            artifact.path.display(),
            artifact.checksum
        );
    }

    Ok(0)
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    // A second init (e.g. from an embedding test harness) is harmless.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

/// Loads the configuration file, if any, then applies command line overrides.
pub fn bundle_settings(args: &Args) -> Result<BundleSettings> {
    let mut settings = match &args.config {
        Some(path) => BundleSettings::load(path)?,
        None => BundleSettings::default(),
    };

    if args.no_dmg {
        settings.dmg.enabled = false;
    }
    if let Some(identity) = &args.codesign {
        settings.macos.signing_identity = Some(identity.clone());
    }
    if let Some(version) = &args.min_macos {
        settings.macos.minimum_system_version = Some(version.clone());
    }
    if let Some(inspector) = args.inspector {
        settings.relocation.inspector = inspector;
    }
    if let Some(report) = &args.report {
        settings.report = Some(report.clone());
    }
    settings
        .relocation
        .excluded_substrings
        .extend(args.exclude.iter().cloned());
    settings
        .relocation
        .search_paths
        .extend(args.search_path.iter().cloned());

    Ok(settings)
}

async fn resolve_version(args: &Args) -> Result<String> {
    if let Some(release) = &args.release {
        return Ok(release.clone());
    }
    if let Some(snapshot) = &args.snapshot {
        return Ok(snapshot.clone());
    }
    git_describe().await
}

/// Snapshot version from `git describe` in the current directory.
async fn git_describe() -> Result<String> {
    let failed = |reason: String| CliError::ExecutionFailed {
        command: "git describe".to_string(),
        reason,
    };

    let output = tokio::process::Command::new("git")
        .arg("describe")
        .output()
        .await
        .map_err(|e| failed(e.to_string()))?;

    if !output.status.success() {
        return Err(failed(String::from_utf8_lossy(&output.stderr).trim().to_string()).into());
    }

    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if version.is_empty() {
        return Err(failed("no output".to_string()).into());
    }
    Ok(version)
}
