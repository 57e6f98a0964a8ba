//! Reading the dependency list recorded in a Mach-O binary.

use crate::bundler::error::{Error, Result};
use regex::Regex;
use std::{path::Path, process::Command, sync::LazyLock};

/// Matches one dependency line of `otool -L`:
/// `\t/usr/lib/libSystem.B.dylib (compatibility version 1.0.0, current version 1.0.0)`
static OTOOL_DEPENDENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\t(.*) \(.*$").expect("otool dependency pattern is valid"));

/// Extracts dynamic library dependencies from a Mach-O binary using goblin.
///
/// The `self` marker and the binary's own install name are dropped. For fat
/// binaries the first architecture is inspected; all slices of a universal
/// build link the same libraries. Files that are not Mach-O yield no
/// dependencies.
pub fn goblin_dependencies(binary_path: &Path) -> Result<Vec<String>> {
    let buffer = std::fs::read(binary_path).map_err(|e| inspection_error(binary_path, e))?;

    if !has_macho_magic(&buffer) {
        log::warn!(
            "{} is not a Mach-O file, skipping dependency discovery",
            binary_path.display()
        );
        return Ok(vec![]);
    }

    let object = goblin::Object::parse(&buffer).map_err(|e| inspection_error(binary_path, e))?;

    match object {
        goblin::Object::Mach(goblin::mach::Mach::Binary(macho)) => Ok(collect_libs(&macho)),
        goblin::Object::Mach(goblin::mach::Mach::Fat(fat)) => {
            match fat.get(0).map_err(|e| inspection_error(binary_path, e))? {
                goblin::mach::SingleArch::MachO(macho) => Ok(collect_libs(&macho)),
                goblin::mach::SingleArch::Archive(_) => Ok(vec![]),
            }
        }
        _ => {
            log::warn!(
                "{} is not a Mach-O file, skipping dependency discovery",
                binary_path.display()
            );
            Ok(vec![])
        }
    }
}

/// Thin (32/64-bit, either byte order) and fat Mach-O magic numbers.
fn has_macho_magic(buffer: &[u8]) -> bool {
    const MAGICS: [u32; 5] = [0xfeed_face, 0xfeed_facf, 0xcefa_edfe, 0xcffa_edfe, 0xcafe_babe];
    buffer
        .get(..4)
        .map(|head| u32::from_be_bytes([head[0], head[1], head[2], head[3]]))
        .is_some_and(|magic| MAGICS.contains(&magic))
}

fn collect_libs(macho: &goblin::mach::MachO<'_>) -> Vec<String> {
    macho
        .libs
        .iter()
        .filter(|lib| **lib != "self" && Some(**lib) != macho.name)
        .map(|lib| lib.to_string())
        .collect()
}

/// Extracts dependencies by running `otool -L` (and `otool -D` for the
/// binary's own install name).
pub fn otool_dependencies(binary_path: &Path) -> Result<Vec<String>> {
    let listing = run_otool("-L", binary_path)?;
    let install_name = run_otool("-D", binary_path)?
        .lines()
        .nth(1)
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty());

    let file_name = binary_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(parse_otool_listing(
        &listing,
        install_name.as_deref(),
        &file_name,
    ))
}

/// Parses `otool -L` output into recorded dependency paths.
///
/// Lines equal to `install_name` or to the bare `file_name` are the binary's
/// self-entry and are dropped. Universal binaries list one section per
/// architecture; duplicates are removed keeping first-seen order.
pub fn parse_otool_listing(output: &str, install_name: Option<&str>, file_name: &str) -> Vec<String> {
    let mut libs: Vec<String> = Vec::new();

    for line in output.lines() {
        let Some(captures) = OTOOL_DEPENDENCY.captures(line) else {
            continue;
        };
        let lib = captures[1].to_string();
        if Some(lib.as_str()) == install_name || lib == file_name {
            continue;
        }
        if !libs.contains(&lib) {
            libs.push(lib);
        }
    }

    libs
}

fn run_otool(flag: &str, binary_path: &Path) -> Result<String> {
    let output = Command::new("otool")
        .arg(flag)
        .arg(binary_path)
        .output()
        .map_err(|e| inspection_error(binary_path, format!("failed to run otool: {e}")))?;

    if !output.status.success() {
        return Err(inspection_error(
            binary_path,
            format!(
                "otool {flag} exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn inspection_error(path: &Path, reason: impl std::fmt::Display) -> Error {
    Error::Inspection {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
