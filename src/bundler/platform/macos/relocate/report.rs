//! Summary of a relocation run.

use serde::Serialize;
use std::path::PathBuf;

/// A dependency copied into the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopiedItem {
    /// Ledger key (`libfoo.dylib` or `Foo.framework`)
    pub key: String,
    /// Where it was copied from (file or framework directory)
    pub source: PathBuf,
    /// Where it now lives in the bundle
    pub destination: PathBuf,
}

/// A reference redirected in a binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteRecord {
    /// Binary whose load command was edited
    pub binary: PathBuf,
    /// Previously recorded path
    pub old: String,
    /// Bundle-relative replacement
    pub new: String,
}

/// What a [`Relocator`](super::Relocator) did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RelocationReport {
    /// Dependencies copied, in copy order
    pub copied: Vec<CopiedItem>,
    /// References rewritten, in rewrite order
    pub rewrites: Vec<RewriteRecord>,
    /// Distinct system (or excluded) references left untouched
    pub skipped: Vec<String>,
}

impl RelocationReport {
    pub(crate) fn record_skipped(&mut self, path: &str) {
        if !self.skipped.iter().any(|p| p == path) {
            self.skipped.push(path.to_string());
        }
    }

    /// Number of rewrites that targeted `old`.
    pub fn rewrites_of(&self, old: &str) -> usize {
        self.rewrites.iter().filter(|r| r.old == old).count()
    }

    /// Writes the report as pretty-printed JSON.
    pub fn write_json(&self, path: &std::path::Path) -> crate::bundler::Result<()> {
        use crate::bundler::error::ErrorExt;

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).fs_context("writing relocation report", path)
    }
}
