//! Duplicate class detection across a set of resolved artifacts.
//!
//! Each `analyze` call runs in two phases:
//!
//! 1. Every artifact is scanned (in parallel unless configured otherwise) and
//!    the results are folded into call-local class -> owners and
//!    class -> hashes maps.
//! 2. Only once every owner of every class is known, the call-local maps are
//!    filtered to classes with more than one owner (resp. hash) and merged
//!    into the permanent indices.
//!
//! A scan failure aborts the call before phase 2, so the permanent indices
//! never hold a partial view of one call. Indices accumulate across calls and
//! are never cleared.

use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Instant;
use tracing::{info, warn};

use crate::archive::{ArchiveEntry, scan_artifact};
use crate::artifact::{ArtifactIdentity, ArtifactSet, ResolvedArtifact};
use crate::error::Result;
use crate::hash::ContentHash;

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzerConfig {
    /// Scan threads. `None` uses rayon's global pool, `Some(1)` scans sequentially.
    pub jobs: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub classes_checked: usize,
    pub artifacts: usize,
    pub duplicate_classes: usize,
    pub skipped: Vec<ArtifactIdentity>,
    pub duration_ms: u64,
}

type ScannedArtifact<'a> = (&'a ResolvedArtifact, Option<Vec<ArchiveEntry>>);

#[derive(Debug, Default)]
pub struct ClassUniquenessAnalyzer {
    config: AnalyzerConfig,
    class_to_artifacts: HashMap<String, ArtifactSet>,
    artifacts_to_classes: BTreeMap<ArtifactSet, BTreeSet<String>>,
    class_to_hashes: HashMap<String, BTreeSet<ContentHash>>,
}

impl ClassUniquenessAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn analyze(&mut self, artifacts: &[ResolvedArtifact]) -> Result<AnalysisSummary> {
        let start = Instant::now();
        let scanned = self.scan_all(artifacts)?;

        let mut owners_by_class: HashMap<String, ArtifactSet> = HashMap::new();
        let mut hashes_by_class: HashMap<String, BTreeSet<ContentHash>> = HashMap::new();
        let mut skipped = Vec::new();

        for (artifact, entries) in scanned {
            let Some(entries) = entries else {
                warn!(
                    "Skipping non-existent jar {}: {}",
                    artifact.identity,
                    artifact.path.display()
                );
                skipped.push(artifact.identity.clone());
                continue;
            };

            for entry in entries {
                owners_by_class
                    .entry(entry.class_name.clone())
                    .or_default()
                    .insert(artifact.identity.clone());
                hashes_by_class
                    .entry(entry.class_name)
                    .or_default()
                    .insert(entry.content_hash);
            }
        }

        let classes_checked = owners_by_class.len();
        let mut duplicate_classes = 0usize;

        for (class_name, owners) in owners_by_class {
            if owners.len() < 2 {
                continue;
            }
            duplicate_classes += 1;
            self.class_to_artifacts
                .entry(class_name.clone())
                .or_default()
                .extend(owners.iter().cloned());
            self.artifacts_to_classes
                .entry(owners)
                .or_default()
                .insert(class_name);
        }

        for (class_name, hashes) in hashes_by_class {
            if hashes.len() < 2 {
                continue;
            }
            self.class_to_hashes
                .entry(class_name)
                .or_default()
                .extend(hashes);
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Checked {} classes from {} dependencies for uniqueness ({}ms)",
            classes_checked,
            artifacts.len(),
            duration_ms
        );

        Ok(AnalysisSummary {
            classes_checked,
            artifacts: artifacts.len(),
            duplicate_classes,
            skipped,
            duration_ms,
        })
    }

    fn scan_all<'a>(&self, artifacts: &'a [ResolvedArtifact]) -> Result<Vec<ScannedArtifact<'a>>> {
        let scan = |artifact: &'a ResolvedArtifact| {
            scan_artifact(artifact).map(|entries| (artifact, entries))
        };

        match self.config.jobs {
            Some(0 | 1) => artifacts.iter().map(scan).collect(),
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new().num_threads(n).build()?;
                pool.install(|| artifacts.par_iter().map(scan).collect())
            }
            None => artifacts.par_iter().map(scan).collect(),
        }
    }

    /// One artifact set per duplicated class; a set repeats for every class it shares.
    pub fn problem_jars(&self) -> impl Iterator<Item = &ArtifactSet> + '_ {
        self.class_to_artifacts.values()
    }

    /// Deduplicated [`Self::problem_jars`]. Owner sets here merge across
    /// `analyze` calls; [`Self::jars_to_classes`] keeps the per-call sets.
    pub fn distinct_problem_jars(&self) -> BTreeSet<&ArtifactSet> {
        self.problem_jars().collect()
    }

    pub fn jars_to_classes(&self) -> &BTreeMap<ArtifactSet, BTreeSet<String>> {
        &self.artifacts_to_classes
    }

    /// Classes shared by exactly `problem_jars`.
    ///
    /// Only sets previously produced by analysis (keys of [`Self::jars_to_classes`])
    /// are meaningful; any other set yields `None`.
    pub fn shared_classes_in_problem_jars(
        &self,
        problem_jars: &ArtifactSet,
    ) -> Option<&BTreeSet<String>> {
        self.artifacts_to_classes.get(problem_jars)
    }

    /// Shared classes whose bytes differ between at least two owners.
    /// Same precondition as [`Self::shared_classes_in_problem_jars`].
    pub fn differing_shared_classes_in_problem_jars(
        &self,
        problem_jars: &ArtifactSet,
    ) -> Option<BTreeSet<&str>> {
        let shared = self.artifacts_to_classes.get(problem_jars)?;
        Some(
            shared
                .iter()
                .filter(|class_name| self.class_to_hashes.contains_key(class_name.as_str()))
                .map(String::as_str)
                .collect(),
        )
    }

    pub fn class_owners(&self, class_name: &str) -> Option<&ArtifactSet> {
        self.class_to_artifacts.get(class_name)
    }

    pub fn class_hashes(&self, class_name: &str) -> Option<&BTreeSet<ContentHash>> {
        self.class_to_hashes.get(class_name)
    }
}
