use anyhow::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use crate::artifact::{ArtifactIdentity, ResolvedArtifact};

pub fn default_m2_repository() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Failed to resolve home directory"))?;
    Ok(home.join(".m2").join("repository"))
}

pub fn scan_jars(base_path: &Path) -> Result<Vec<PathBuf>> {
    if !base_path.is_dir() {
        anyhow::bail!("Not a directory: {}", base_path.display());
    }

    let (tx, rx) = mpsc::channel();

    let walker = WalkBuilder::new(base_path)
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .build_parallel();

    walker.run(|| {
        let tx = tx.clone();
        Box::new(move |entry| {
            if let Ok(entry) = entry {
                let path = entry.path();
                if path.is_file() && path.extension().is_some_and(|e| e == "jar") {
                    let _ = tx.send(path.to_path_buf());
                }
            }
            ignore::WalkState::Continue
        })
    });

    drop(tx);
    let mut jars: Vec<PathBuf> = rx.iter().collect();
    jars.sort();
    Ok(jars)
}

/// Every jar under `root`, with coordinates inferred from the Maven layout.
pub fn discover_artifacts(root: &Path) -> Result<Vec<ResolvedArtifact>> {
    Ok(scan_jars(root)?
        .into_iter()
        .map(|jar| ResolvedArtifact::new(ArtifactIdentity::from_jar_path(root, &jar), jar))
        .collect())
}
