//! Kodegen Bundler Relocate - self-contained macOS application bundles.
//!
//! This binary copies a raw `.app` out of the build tree, relocates its
//! non-system libraries into `Contents/Frameworks`, and packs it into a
//! disk image.

use kodegen_bundler_relocate::cli;
use std::process;

#[tokio::main]
async fn main() {
    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            for suggestion in e.recovery_suggestions() {
                eprintln!("  hint: {}", suggestion);
            }
            1
        }
    };

    process::exit(exit_code);
}
