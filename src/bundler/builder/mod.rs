//! Bundle orchestration and coordination.
//!
//! This module provides the main [`Bundler`] orchestrator that turns a raw
//! build `.app` into a relocated, optionally signed bundle and disk image.
//!
//! # Overview
//!
//! The bundler:
//! 1. Checks that the external tools it will call are installed
//! 2. Copies the raw bundle and its auxiliary executables into place
//! 3. Relocates the dependency closure into `Contents/Frameworks`
//! 4. Runs the downstream steps (resources, toolkit deploy, signing, DMG)
//! 5. Returns [`BundledArtifact`](crate::bundler::BundledArtifact) results
//!    with checksums
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum calculation for artifacts
//! - [`orchestrator`] - Main [`Bundler`] struct and bundling operations
//! - [`tool_detection`] - External tool availability checking

mod checksum;
mod orchestrator;
mod tool_detection;

pub use orchestrator::Bundler;
