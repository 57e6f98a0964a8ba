//! Classification of recorded dependency paths.

use crate::bundler::{
    error::{Error, Result},
    settings::RelocationSettings,
};

const FRAMEWORK_SUFFIX: &str = ".framework";

/// How a recorded dependency path is treated by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Provided by the OS (or deployed by another step); never copied or rewritten.
    System,
    /// A binary inside a versioned `.framework` directory.
    Framework(FrameworkRef),
    /// A standalone shared library.
    PlainLibrary {
        /// Final path segment, e.g. `libhelper.dylib`
        file_name: String,
    },
}

impl Classification {
    /// Ledger key: the name the dependency has inside `Contents/Frameworks`.
    pub fn key(&self) -> Option<&str> {
        match self {
            Classification::System => None,
            Classification::Framework(fw) => Some(fw.dir_name()),
            Classification::PlainLibrary { file_name } => Some(file_name),
        }
    }

    /// Path of the dependency relative to the bundle's frameworks directory.
    pub fn bundle_relative(&self) -> Option<String> {
        match self {
            Classification::System => None,
            Classification::Framework(fw) => Some(format!("{}/{}", fw.dir_name(), fw.inner())),
            Classification::PlainLibrary { file_name } => Some(file_name.clone()),
        }
    }
}

/// A reference into a framework bundle, split at the `.framework` segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkRef {
    base: String,
    dir_name: String,
    inner: String,
}

impl FrameworkRef {
    /// Recorded path up to and including the `.framework` segment.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The `.framework` directory name, e.g. `Foo.framework`.
    pub fn dir_name(&self) -> &str {
        &self.dir_name
    }

    /// Framework name without the suffix, e.g. `Foo`.
    pub fn name(&self) -> &str {
        &self.dir_name[..self.dir_name.len() - FRAMEWORK_SUFFIX.len()]
    }

    /// Path of the referenced binary below the framework directory,
    /// e.g. `Versions/A/Foo`.
    pub fn inner(&self) -> &str {
        &self.inner
    }

    /// Number of path components in [`inner`](Self::inner).
    pub fn inner_depth(&self) -> usize {
        self.inner.split('/').count()
    }
}

/// Classifies dependency paths using the configured system prefixes and
/// exclusion substrings.
#[derive(Debug, Clone)]
pub struct Classifier {
    system_prefixes: Vec<String>,
    excluded_substrings: Vec<String>,
}

impl Classifier {
    /// Creates a classifier from explicit rule sets.
    pub fn new(system_prefixes: Vec<String>, excluded_substrings: Vec<String>) -> Self {
        Self {
            system_prefixes,
            excluded_substrings,
        }
    }

    /// Creates a classifier from relocation settings.
    pub fn from_settings(settings: &RelocationSettings) -> Self {
        Self::new(
            settings.system_prefixes.clone(),
            settings.excluded_substrings.clone(),
        )
    }

    /// Classifies a recorded dependency path.
    ///
    /// Exclusions win over structure: an excluded framework is reported as
    /// [`Classification::System`] so it is left for the step that deploys it.
    pub fn classify(&self, path: &str) -> Result<Classification> {
        if self.is_system(path) {
            return Ok(Classification::System);
        }

        let segments: Vec<&str> = path.split('/').collect();

        if let Some(idx) = segments.iter().rposition(|s| s.ends_with(FRAMEWORK_SUFFIX)) {
            let dir_name = segments[idx];
            if dir_name.len() == FRAMEWORK_SUFFIX.len() {
                return Err(classification_error(path, "framework segment has no name"));
            }
            let inner = &segments[idx + 1..];
            if inner.is_empty() || inner.iter().any(|s| s.is_empty()) {
                return Err(classification_error(
                    path,
                    "framework reference does not name a binary inside the bundle",
                ));
            }
            return Ok(Classification::Framework(FrameworkRef {
                base: segments[..=idx].join("/"),
                dir_name: dir_name.to_string(),
                inner: inner.join("/"),
            }));
        }

        match segments.last() {
            Some(file_name) if !file_name.is_empty() => Ok(Classification::PlainLibrary {
                file_name: file_name.to_string(),
            }),
            _ => Err(classification_error(path, "path has no file name")),
        }
    }

    fn is_system(&self, path: &str) -> bool {
        self.system_prefixes.iter().any(|p| path.starts_with(p.as_str()))
            || self
                .excluded_substrings
                .iter()
                .any(|s| path.contains(s.as_str()))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::from_settings(&RelocationSettings::default())
    }
}

fn classification_error(path: &str, reason: &str) -> Error {
    Error::Classification {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn framework(path: &str) -> FrameworkRef {
        match Classifier::default().classify(path).expect("classify") {
            Classification::Framework(fw) => fw,
            other => panic!("expected framework for {path}, got {other:?}"),
        }
    }

    #[test]
    fn system_prefixes_are_system() {
        let classifier = Classifier::default();
        for path in [
            "/usr/lib/libSystem.B.dylib",
            "/usr/lib/libc++.1.dylib",
            "/System/Library/Frameworks/Cocoa.framework/Versions/A/Cocoa",
        ] {
            assert_eq!(classifier.classify(path).unwrap(), Classification::System, "{path}");
        }
    }

    #[test]
    fn framework_base_and_name() {
        let fw = framework("/build/Foo.framework/Versions/A/Foo");
        assert_eq!(fw.base(), "/build/Foo.framework");
        assert_eq!(fw.dir_name(), "Foo.framework");
        assert_eq!(fw.name(), "Foo");
        assert_eq!(fw.inner(), "Versions/A/Foo");
        assert_eq!(fw.inner_depth(), 3);
    }

    #[test]
    fn versions_current_resolves_to_framework_root() {
        let fw = framework("/opt/sdk/Sparkle.framework/Versions/Current/Sparkle");
        assert_eq!(fw.base(), "/opt/sdk/Sparkle.framework");
        assert_eq!(fw.name(), "Sparkle");
        assert_eq!(fw.inner(), "Versions/Current/Sparkle");
    }

    #[test]
    fn nested_framework_uses_last_segment() {
        let fw = framework("/opt/Outer.framework/Versions/A/Frameworks/Inner.framework/Versions/A/Inner");
        assert_eq!(fw.base(), "/opt/Outer.framework/Versions/A/Frameworks/Inner.framework");
        assert_eq!(fw.name(), "Inner");
    }

    #[test]
    fn token_prefixed_framework() {
        let fw = framework("@rpath/Foo.framework/Foo");
        assert_eq!(fw.base(), "@rpath/Foo.framework");
        assert_eq!(fw.inner(), "Foo");
    }

    #[test]
    fn plain_library() {
        let classification = Classifier::default()
            .classify("/usr/local/lib/libndn-cxx.dylib")
            .unwrap();
        assert_eq!(
            classification,
            Classification::PlainLibrary {
                file_name: "libndn-cxx.dylib".into()
            }
        );
        assert_eq!(classification.key(), Some("libndn-cxx.dylib"));
    }

    #[test]
    fn framework_like_file_name_is_plain() {
        let classification = Classifier::default()
            .classify("/opt/lib/libfoo.framework.dylib")
            .unwrap();
        assert!(matches!(classification, Classification::PlainLibrary { .. }));
    }

    #[test]
    fn exclusions_are_treated_as_system() {
        let classifier = Classifier::new(vec!["/usr/lib/".into()], vec!["Qt".into()]);
        assert_eq!(
            classifier
                .classify("/usr/local/opt/qt5/lib/QtCore.framework/Versions/5/QtCore")
                .unwrap(),
            Classification::System
        );
        assert!(matches!(
            classifier.classify("/usr/local/lib/libboost_system.dylib").unwrap(),
            Classification::PlainLibrary { .. }
        ));
    }

    #[test]
    fn unnamed_framework_is_an_error() {
        let err = Classifier::default()
            .classify("/build/.framework/Versions/A/X")
            .unwrap_err();
        assert!(matches!(err, Error::Classification { .. }));
    }

    #[test]
    fn framework_without_binary_is_an_error() {
        let classifier = Classifier::default();
        for path in ["/build/Foo.framework", "/build/Foo.framework/"] {
            let err = classifier.classify(path).unwrap_err();
            assert!(matches!(err, Error::Classification { .. }), "{path}");
        }
    }

    #[test]
    fn bundle_relative_paths() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier
                .classify("/build/Foo.framework/Versions/A/Foo")
                .unwrap()
                .bundle_relative()
                .as_deref(),
            Some("Foo.framework/Versions/A/Foo")
        );
        assert_eq!(
            classifier
                .classify("/build/libhelper.dylib")
                .unwrap()
                .bundle_relative()
                .as_deref(),
            Some("libhelper.dylib")
        );
        assert_eq!(
            classifier.classify("/usr/lib/libz.1.dylib").unwrap().bundle_relative(),
            None
        );
    }
}
