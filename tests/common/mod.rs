//! Shared fixtures for integration tests.
//!
//! Test "binaries" are text files holding their load commands, one per line:
//!
//! ```text
//! id /opt/deps/lib/libhelper.dylib
//! dep /opt/deps/Frameworks/Foo.framework/Versions/A/Foo
//! ```
//!
//! [`FakeTool`] reads and edits that format, so relocation runs through the
//! real copy, permission, and staged-rename paths without Apple tooling.

#![allow(dead_code)]

use kodegen_bundler_relocate::bundler::{
    Error, Result,
    relocate::{LoadPathEdit, LoadPathTool},
};
use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

#[derive(Default)]
pub struct FakeTool {
    edits: Mutex<Vec<LoadPathEdit>>,
}

impl FakeTool {
    pub fn edits(&self) -> Vec<LoadPathEdit> {
        self.edits.lock().unwrap().clone()
    }

    /// Number of `Change` edits whose old path was `old`.
    pub fn changes_of(&self, old: &str) -> usize {
        self.edits()
            .iter()
            .filter(|edit| matches!(edit, LoadPathEdit::Change { old: o, .. } if o == old))
            .count()
    }
}

impl LoadPathTool for FakeTool {
    fn list_dependencies(&self, binary: &Path) -> Result<Vec<String>> {
        let text = std::fs::read_to_string(binary).map_err(|e| Error::Inspection {
            path: binary.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(text
            .lines()
            .filter_map(|line| line.strip_prefix("dep "))
            .map(str::to_string)
            .collect())
    }

    fn apply(&self, binary: &Path, edit: &LoadPathEdit) -> Result<()> {
        let text = std::fs::read_to_string(binary)?;
        let lines: Vec<String> = match edit {
            LoadPathEdit::SetId(id) => std::iter::once(format!("id {id}"))
                .chain(
                    text.lines()
                        .filter(|line| !line.starts_with("id "))
                        .map(str::to_string),
                )
                .collect(),
            LoadPathEdit::Change { old, new } => text
                .lines()
                .map(|line| {
                    if line.strip_prefix("dep ") == Some(old.as_str()) {
                        format!("dep {new}")
                    } else {
                        line.to_string()
                    }
                })
                .collect(),
        };
        std::fs::write(binary, lines.join("\n") + "\n")?;
        self.edits.lock().unwrap().push(edit.clone());
        Ok(())
    }
}

/// Writes a test binary at `path`, creating parent directories.
pub fn write_binary(path: &Path, id: Option<&str>, deps: &[&str]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut text = String::new();
    if let Some(id) = id {
        text.push_str(&format!("id {id}\n"));
    }
    for dep in deps {
        text.push_str(&format!("dep {dep}\n"));
    }
    std::fs::write(path, text).unwrap();
}

/// Writes a dylib whose install name is its own absolute path.
pub fn write_dylib(path: &Path, deps: &[&str]) {
    write_binary(path, Some(&path.display().to_string()), deps);
}

pub fn deps_of(path: &Path) -> Vec<String> {
    read_lines(path, "dep ")
}

pub fn id_of(path: &Path) -> Option<String> {
    read_lines(path, "id ").into_iter().next()
}

fn read_lines(path: &Path, prefix: &str) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter_map(|line| line.strip_prefix(prefix))
        .map(str::to_string)
        .collect()
}

/// Creates `Foo.framework` with `Versions/A/Foo`, a `Versions/Current -> A`
/// link, and a top-level `Foo -> Versions/Current/Foo` link. Returns the path
/// of the versioned binary.
pub fn write_framework(parent: &Path, name: &str, deps: &[&str]) -> PathBuf {
    let framework = parent.join(format!("{name}.framework"));
    let binary = framework.join("Versions/A").join(name);
    write_dylib(&binary, deps);
    std::fs::create_dir_all(framework.join("Versions/A/Headers")).unwrap();
    std::fs::write(framework.join("Versions/A/Headers").join(format!("{name}.h")), "").unwrap();

    #[cfg(unix)]
    {
        std::os::unix::fs::symlink("A", framework.join("Versions/Current")).unwrap();
        std::os::unix::fs::symlink(
            format!("Versions/Current/{name}"),
            framework.join(name),
        )
        .unwrap();
    }

    binary
}

/// `@executable_path/../Frameworks/<relative>`
pub fn bundled(relative: &str) -> String {
    format!("@executable_path/../Frameworks/{relative}")
}

pub fn s(path: &Path) -> String {
    path.display().to_string()
}
