//! The narrow interface between the resolver and binary tooling.

use super::{inspect, rewrite};
use crate::bundler::{error::Result, settings::InspectorKind};
use std::path::Path;

/// A single load-path metadata edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPathEdit {
    /// Replace the binary's own install name (`LC_ID_DYLIB`).
    SetId(String),
    /// Replace one recorded dependency path with another.
    Change {
        /// Path currently recorded in the binary
        old: String,
        /// Path to record instead
        new: String,
    },
}

/// Lists and edits the load-path records of a binary.
///
/// The resolver only ever talks to this trait, so it can run against an
/// in-memory implementation in tests.
pub trait LoadPathTool {
    /// Returns the dependencies recorded by `binary`, without its self-entry.
    fn list_dependencies(&self, binary: &Path) -> Result<Vec<String>>;

    /// Applies `edit` to `binary` in place.
    fn apply(&self, binary: &Path, edit: &LoadPathEdit) -> Result<()>;
}

/// Real tooling: goblin or `otool` for inspection, `install_name_tool` for edits.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTools {
    inspector: InspectorKind,
}

impl SystemTools {
    /// Creates tooling that inspects binaries with the given backend.
    pub fn new(inspector: InspectorKind) -> Self {
        Self { inspector }
    }
}

impl LoadPathTool for SystemTools {
    fn list_dependencies(&self, binary: &Path) -> Result<Vec<String>> {
        match self.inspector {
            InspectorKind::Goblin => inspect::goblin_dependencies(binary),
            InspectorKind::Otool => inspect::otool_dependencies(binary),
        }
    }

    fn apply(&self, binary: &Path, edit: &LoadPathEdit) -> Result<()> {
        rewrite::install_name_tool(binary, edit)
    }
}
