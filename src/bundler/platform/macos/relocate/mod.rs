//! Dependency-closure resolution and load-path relocation for macOS bundles.
//!
//! Starting from an executable inside an `.app`, this module discovers every
//! non-system dylib and framework it (transitively) links against, copies each
//! one exactly once into `Contents/Frameworks`, and rewrites install names and
//! references so they are anchored at `@executable_path`. The bundle can then
//! be moved anywhere without breaking the loader.
//!
//! # Architecture
//!
//! - `inspect` - reads recorded dependencies (goblin or `otool -L`)
//! - `classify` - system / framework / plain library classification
//! - `ledger` - run-scoped set of already relocated items
//! - `rewrite` - atomic `install_name_tool` edits
//! - `resolver` - the recursive copier driving all of the above
//! - `tool` - the seam between the resolver and the external tools

mod classify;
mod inspect;
mod ledger;
mod report;
mod resolver;
mod rewrite;
mod tool;

pub use classify::{Classification, Classifier, FrameworkRef};
pub use inspect::{goblin_dependencies, otool_dependencies, parse_otool_listing};
pub use ledger::Ledger;
pub use report::{CopiedItem, RelocationReport, RewriteRecord};
pub use resolver::Relocator;
pub use rewrite::{PathRewriter, install_name_tool};
pub use tool::{LoadPathEdit, LoadPathTool, SystemTools};
