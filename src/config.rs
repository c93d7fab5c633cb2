use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

use crate::analyzer::AnalyzerConfig;
use crate::artifact::{ArtifactIdentity, ResolvedArtifact, looks_like_coordinate};
use crate::cli::Cli;
use crate::scan::{default_m2_repository, discover_artifacts};

pub const M2_REPOSITORY_ENV: &str = "M2_REPOSITORY";

pub fn resolve_m2_repo(cli: &Cli) -> Result<PathBuf> {
    if let Some(p) = cli.m2.clone() {
        return Ok(p);
    }

    if let Ok(p) = env::var(M2_REPOSITORY_ENV)
        && !p.is_empty()
    {
        return Ok(PathBuf::from(p));
    }

    default_m2_repository()
}

pub fn analyzer_config(cli: &Cli) -> AnalyzerConfig {
    AnalyzerConfig { jobs: cli.jobs }
}

/// Default log directive when `RUST_LOG` is unset.
pub fn log_level(cli: &Cli) -> &'static str {
    if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    }
}

pub fn resolve_artifact(raw: &str, m2_repo: &Path) -> Result<ResolvedArtifact> {
    if looks_like_coordinate(raw) {
        return ResolvedArtifact::from_coordinate(raw, m2_repo)
            .with_context(|| format!("Failed to resolve artifact: {raw}"));
    }

    let path = PathBuf::from(raw);
    let identity = ArtifactIdentity::from_jar_path(m2_repo, &path);
    Ok(ResolvedArtifact::new(identity, path))
}

/// Artifacts named on the command line, followed by every jar under `dir`.
pub fn resolve_artifacts(
    inputs: &[String],
    dir: Option<&Path>,
    m2_repo: &Path,
) -> Result<Vec<ResolvedArtifact>> {
    let mut artifacts = inputs
        .iter()
        .map(|raw| resolve_artifact(raw, m2_repo))
        .collect::<Result<Vec<_>>>()?;

    if let Some(dir) = dir {
        let found = discover_artifacts(dir)
            .with_context(|| format!("Failed to scan directory: {}", dir.display()))?;
        artifacts.extend(found);
    }

    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_artifact_maps_coordinates_into_repository() -> Result<()> {
        let m2 = Path::new("/repo");
        let artifact = resolve_artifact("org.example:demo:1.0", m2)?;
        assert_eq!(artifact.identity.to_string(), "org.example:demo:1.0");
        assert_eq!(
            artifact.path,
            PathBuf::from("/repo/org/example/demo/1.0/demo-1.0.jar")
        );
        Ok(())
    }

    #[test]
    fn resolve_artifact_infers_identity_from_paths() -> Result<()> {
        let m2 = Path::new("/repo");
        let in_repo = resolve_artifact("/repo/org/example/demo/1.0/demo-1.0.jar", m2)?;
        assert_eq!(in_repo.identity.to_string(), "org.example:demo:1.0");

        let loose = resolve_artifact("/tmp/vendor.jar", m2)?;
        assert_eq!(loose.identity.to_string(), "local:tmp/vendor:unspecified");
        Ok(())
    }

    #[test]
    fn resolve_artifacts_rejects_bad_coordinates() {
        assert!(resolve_artifacts(&["a::b".to_string()], None, Path::new("/repo")).is_err());
    }
}
