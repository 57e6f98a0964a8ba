//! Recursive copy-and-rewrite over a binary's dependency closure.

use super::{
    classify::{Classification, Classifier},
    ledger::Ledger,
    report::{CopiedItem, RelocationReport, RewriteRecord},
    rewrite::PathRewriter,
    tool::LoadPathTool,
};
use crate::bundler::{
    error::{Error, Result},
    settings::RelocationSettings,
    utils::fs,
};
use path_absolutize::Absolutize;
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

/// Copies the non-system dependency closure of binaries into a bundle's
/// frameworks directory and rewrites their load paths.
///
/// The walk is depth-first and synchronous. A single [`Ledger`] is threaded
/// through every recursive call so each dependency is copied and recursed
/// into once, however many binaries reference it and whether or not the
/// graph has cycles. A depth limit stops malformed graphs that would
/// otherwise recurse without bound.
///
/// # Example
///
/// ```no_run
/// use kodegen_bundler_relocate::bundler::{RelocationSettings, relocate::{Relocator, SystemTools}};
/// use std::path::Path;
///
/// # fn example() -> kodegen_bundler_relocate::bundler::Result<()> {
/// let settings = RelocationSettings::default();
/// let tools = SystemTools::new(settings.inspector);
/// let contents = Path::new("build/dist/ChronoShare.app/Contents");
///
/// let mut relocator = Relocator::new(
///     &settings,
///     &tools,
///     contents.join("Frameworks"),
///     contents.join("MacOS"),
/// );
/// relocator.resolve(&contents.join("MacOS/ChronoShare"), None)?;
/// println!("bundled {} items", relocator.ledger().len());
/// # Ok(())
/// # }
/// ```
pub struct Relocator<'a> {
    settings: RelocationSettings,
    tool: &'a dyn LoadPathTool,
    classifier: Classifier,
    rewriter: PathRewriter<'a>,
    ledger: Ledger,
    frameworks_dir: PathBuf,
    executable_dir: PathBuf,
    report: RelocationReport,
    depth: usize,
}

impl<'a> Relocator<'a> {
    /// Creates a relocator that copies into `frameworks_dir` and resolves
    /// `@executable_path` against `executable_dir`.
    pub fn new(
        settings: &RelocationSettings,
        tool: &'a dyn LoadPathTool,
        frameworks_dir: impl Into<PathBuf>,
        executable_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            settings: settings.clone(),
            tool,
            classifier: Classifier::from_settings(settings),
            rewriter: PathRewriter::new(tool, settings.copy_mode),
            ledger: Ledger::new(),
            frameworks_dir: frameworks_dir.into(),
            executable_dir: executable_dir.into(),
            report: RelocationReport::default(),
            depth: 0,
        }
    }

    /// Starts from an existing ledger, e.g. one left by an earlier run over
    /// the same bundle.
    pub fn with_ledger(mut self, ledger: Ledger) -> Self {
        self.ledger = ledger;
        self
    }

    /// Items handled so far.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// What has been copied and rewritten so far.
    pub fn report(&self) -> &RelocationReport {
        &self.report
    }

    /// Consumes the relocator, returning its report.
    pub fn into_report(self) -> RelocationReport {
        self.report
    }

    /// Relocates the dependency closure of `binary`.
    ///
    /// `origin` is the directory `@loader_path` references of `binary` are
    /// resolved against. It defaults to the binary's own directory and is set
    /// to the original location of each copied dependency when recursing.
    pub fn resolve(&mut self, binary: &Path, origin: Option<&Path>) -> Result<()> {
        if self.depth >= self.settings.max_depth {
            return Err(Error::RecursionLimit {
                path: binary.to_path_buf(),
                depth: self.settings.max_depth,
            });
        }

        self.depth += 1;
        let result = self.resolve_binary(binary, origin);
        self.depth -= 1;
        result
    }

    fn resolve_binary(&mut self, binary: &Path, origin: Option<&Path>) -> Result<()> {
        let binary = absolute(binary).map_err(|e| Error::Inspection {
            path: binary.to_path_buf(),
            reason: e.to_string(),
        })?;
        let loader_dir = match origin {
            Some(dir) => dir.to_path_buf(),
            None => binary.parent().map(Path::to_path_buf).unwrap_or_default(),
        };

        log::info!("Processing [{}]", binary.display());

        for recorded in self.tool.list_dependencies(&binary)? {
            let classification = self.classifier.classify(&recorded)?;
            let (Some(key), Some(relative)) = (
                classification.key().map(str::to_string),
                classification.bundle_relative(),
            ) else {
                log::debug!("  skipping system library {}", recorded);
                self.report.record_skipped(&recorded);
                continue;
            };
            let install_name = format!(
                "{}/{}",
                self.settings.install_anchor.trim_end_matches('/'),
                relative
            );

            if !self.ledger.already_handled(&key) {
                let source = self.locate(&recorded, &loader_dir)?;
                let copied = self.copy_into_bundle(&classification, &key, &source)?;
                self.ledger.mark_handled(key);
                self.rewriter.set_self_identity(&copied, &install_name)?;

                let source_dir = source.parent().map(Path::to_path_buf).unwrap_or_default();
                self.resolve(&copied, Some(&source_dir))?;
            }

            if self
                .rewriter
                .redirect_reference(&binary, &recorded, &install_name)?
            {
                self.report.rewrites.push(RewriteRecord {
                    binary: binary.clone(),
                    old: recorded,
                    new: install_name,
                });
            }
        }

        Ok(())
    }

    /// Finds the file a recorded dependency path refers to.
    fn locate(&self, recorded: &str, loader_dir: &Path) -> Result<PathBuf> {
        let candidates: Vec<PathBuf> = if let Some(rest) = recorded.strip_prefix("@loader_path/") {
            vec![loader_dir.join(rest)]
        } else if let Some(rest) = recorded.strip_prefix("@executable_path/") {
            vec![self.executable_dir.join(rest)]
        } else if let Some(rest) = recorded.strip_prefix("@rpath/") {
            self.search_dirs(loader_dir).map(|d| d.join(rest)).collect()
        } else if recorded.contains('*') {
            expand_wildcard(recorded)?
        } else if Path::new(recorded).is_absolute() {
            vec![PathBuf::from(recorded)]
        } else {
            self.search_dirs(loader_dir).map(|d| d.join(recorded)).collect()
        };

        candidates
            .into_iter()
            .filter_map(|candidate| absolute(&candidate).ok())
            .find(|candidate| candidate.exists())
            .ok_or_else(|| Error::Copy {
                path: PathBuf::from(recorded),
                reason: format!(
                    "dependency not found (loaded from {})",
                    loader_dir.display()
                ),
            })
    }

    fn search_dirs<'s>(&'s self, loader_dir: &'s Path) -> impl Iterator<Item = &'s Path> + 's {
        std::iter::once(loader_dir)
            .chain(self.settings.search_paths.iter().map(PathBuf::as_path))
            .chain(std::iter::once(self.frameworks_dir.as_path()))
    }

    /// Copies a located dependency into the frameworks directory and returns
    /// the path of the copied binary.
    fn copy_into_bundle(
        &mut self,
        classification: &Classification,
        key: &str,
        source: &Path,
    ) -> Result<PathBuf> {
        let destination = self.frameworks_dir.join(key);

        let (from, copied) = match classification {
            Classification::Framework(fw) => {
                let base = source
                    .ancestors()
                    .nth(fw.inner_depth())
                    .filter(|base| base.file_name() == Some(OsStr::new(fw.dir_name())))
                    .ok_or_else(|| Error::Classification {
                        path: source.display().to_string(),
                        reason: format!("no enclosing {} directory", fw.dir_name()),
                    })?;
                (base.to_path_buf(), destination.join(fw.inner()))
            }
            _ => (source.to_path_buf(), destination.clone()),
        };

        if fs::same_file(&from, &destination) {
            log::debug!("  {} is already in place", destination.display());
        } else {
            log::info!("COPY {} -> {}", from.display(), destination.display());
            match classification {
                Classification::Framework(fw) => {
                    fs::replace_dir_sync(&from, &destination).map_err(|e| copy_error(&from, e))?;
                    if self.settings.strip_framework_headers {
                        fs::strip_framework_headers(&destination, fw.name())
                            .map_err(|e| copy_error(&destination, e))?;
                    }
                }
                _ => fs::copy_file_sync(&from, &destination).map_err(|e| copy_error(&from, e))?,
            }
            self.report.copied.push(CopiedItem {
                key: key.to_string(),
                source: from,
                destination,
            });
        }

        if let Some(mode) = self.settings.copy_mode {
            fs::set_mode(&copied, mode).map_err(|e| copy_error(&copied, e))?;
        }

        Ok(copied)
    }
}

fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    Ok(path.absolutize()?.into_owned())
}

/// Expands glob patterns recorded by some Homebrew builds
/// (e.g. `/opt/homebrew/*/lib/libpcre2.dylib`), also trying the Cellar.
fn expand_wildcard(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut patterns = vec![pattern.to_string()];
    if let Some(after_homebrew) = pattern.strip_prefix("/opt/homebrew/*/") {
        patterns.push(format!("/opt/homebrew/Cellar/*/{}", after_homebrew));
    }

    let mut matches = Vec::new();
    for pattern in &patterns {
        for entry in glob::glob(pattern)? {
            matches.push(entry.map_err(|e| copy_error(e.path(), e.error()))?);
        }
    }
    Ok(matches)
}

fn copy_error(path: &Path, reason: impl std::fmt::Display) -> Error {
    Error::Copy {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_expansion_finds_matches() {
        let dir = tempfile::tempdir().unwrap();
        let lib = dir.path().join("pcre2/lib/libpcre2.dylib");
        std::fs::create_dir_all(lib.parent().unwrap()).unwrap();
        std::fs::write(&lib, b"").unwrap();

        let pattern = format!("{}/*/lib/libpcre2.dylib", dir.path().display());
        assert_eq!(expand_wildcard(&pattern).unwrap(), vec![lib]);
    }

    #[test]
    fn wildcard_without_matches_is_empty() {
        assert!(
            expand_wildcard("/nonexistent-root/*/lib/libnothing.dylib")
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn malformed_wildcard_is_reported() {
        let err = expand_wildcard("/opt/[unclosed*/lib/libpcre2.dylib").unwrap_err();
        assert!(matches!(err, Error::GlobPattern(_)));
    }
}
