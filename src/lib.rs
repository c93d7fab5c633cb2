//! # class-uniqueness
//!
//! Detects Java classes that more than one jar on a classpath provides, and
//! separates harmless byte-identical copies (shading, relocation) from copies
//! whose contents differ (version skew).
//!
//! ## Architecture
//!
//! - **artifact**: Artifact coordinates and their Maven repository layout
//! - **hash**: SHA-256 content hashes of class files
//! - **archive**: Lazy, hashing scan of a jar's class entries
//! - **analyzer**: Two-phase duplicate detection and the derived indices
//! - **report**: JSON and text rendering of analyzer results
//! - **scan**: Jar discovery under a directory tree
//! - **config**: CLI and environment resolution
//! - **error**: Error types

pub mod analyzer;
pub mod archive;
pub mod artifact;
pub mod cli;
pub mod config;
pub mod error;
pub mod hash;
pub mod report;
pub mod scan;

pub use analyzer::{AnalysisSummary, AnalyzerConfig, ClassUniquenessAnalyzer};
pub use artifact::{ArtifactIdentity, ArtifactSet, ResolvedArtifact};
pub use error::AnalyzerError;
pub use hash::ContentHash;
