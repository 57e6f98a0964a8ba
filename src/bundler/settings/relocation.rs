//! Dependency relocation settings.

use std::path::PathBuf;

/// Backend used to read a binary's recorded dependencies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InspectorKind {
    /// Parse Mach-O load commands in-process with goblin.
    #[default]
    Goblin,
    /// Run `otool -L` / `otool -D`.
    Otool,
}

/// How non-system dependencies are discovered, copied, and rewritten.
///
/// # Configuration
///
/// ```toml
/// [relocation]
/// system_prefixes = ["/System/Library/", "/usr/lib/"]
/// excluded_substrings = ["Qt"]
/// search_paths = ["/usr/local/lib"]
/// max_depth = 64
/// copy_mode = 0o755
/// strip_framework_headers = true
/// inspector = "otool"
/// ```
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct RelocationSettings {
    /// Dependencies under these prefixes are provided by the OS and never bundled.
    pub system_prefixes: Vec<String>,

    /// Dependencies whose path contains any of these substrings are left
    /// alone, e.g. a UI toolkit deployed by its own tool.
    ///
    /// Default: Empty
    pub excluded_substrings: Vec<String>,

    /// Prefix of every rewritten load path.
    ///
    /// Default: `@executable_path/../Frameworks`
    pub install_anchor: String,

    /// Extra directories searched for `@rpath/` and bare-name dependencies,
    /// after the loading binary's own directory.
    pub search_paths: Vec<PathBuf>,

    /// Maximum nesting of the dependency walk.
    pub max_depth: usize,

    /// Permission bits set on every copied binary and every binary before
    /// it is rewritten. `None` leaves permissions as copied.
    ///
    /// Default: `0o755`
    pub copy_mode: Option<u32>,

    /// Remove `Headers` and `.prl` files from copied frameworks.
    pub strip_framework_headers: bool,

    /// Dependency inspection backend.
    pub inspector: InspectorKind,
}

impl Default for RelocationSettings {
    fn default() -> Self {
        Self {
            system_prefixes: vec!["/System/Library/".into(), "/usr/lib/".into()],
            excluded_substrings: Vec::new(),
            install_anchor: "@executable_path/../Frameworks".into(),
            search_paths: Vec::new(),
            max_depth: 64,
            copy_mode: Some(0o755),
            strip_framework_headers: false,
            inspector: InspectorKind::default(),
        }
    }
}
