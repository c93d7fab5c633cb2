//! Error types for class uniqueness analysis.

use std::path::PathBuf;
use thiserror::Error;

use crate::artifact::ArtifactIdentity;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AnalyzerError {
    /// The archive backing an artifact could not be opened or read to the end.
    /// Aborts the whole `analyze` call.
    #[error("Failed to read jar {artifact} ({})", .path.display())]
    ArchiveRead {
        artifact: ArtifactIdentity,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid artifact coordinate '{0}', expected group:name:version")]
    InvalidCoordinate(String),

    #[error("Failed to build scan thread pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

impl AnalyzerError {
    pub(crate) fn archive_read(
        artifact: &ArtifactIdentity,
        path: impl Into<PathBuf>,
        source: impl Into<std::io::Error>,
    ) -> Self {
        Self::ArchiveRead {
            artifact: artifact.clone(),
            path: path.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
