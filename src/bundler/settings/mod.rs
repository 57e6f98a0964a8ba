//! Configuration structures for bundling operations.
//!
//! Settings are layered: struct defaults, then an optional TOML file
//! ([`BundleSettings::load`]), then command-line overrides, assembled by
//! [`SettingsBuilder`] into an immutable [`Settings`].

mod builder;
mod bundle;
mod core;
mod macos;
mod package;
mod relocation;

// Re-export all public types
pub use builder::SettingsBuilder;
pub use bundle::{AuxiliarySettings, BundleSettings, ToolkitSettings};
pub use core::Settings;
pub use macos::{DmgSettings, MacOsSettings};
pub use package::PackageSettings;
pub use relocation::{InspectorKind, RelocationSettings};
