//! Renders analyzer results for people and machines.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::analyzer::{AnalysisSummary, ClassUniquenessAnalyzer};
use crate::artifact::ArtifactIdentity;
use crate::hash::ContentHash;

#[derive(Debug, Clone, Serialize)]
pub struct ProblemGroup {
    pub artifacts: Vec<ArtifactIdentity>,
    pub shared_classes: Vec<String>,
    /// Classes whose bytes differ between owners, with every hash observed.
    pub differing_classes: BTreeMap<String, Vec<ContentHash>>,
}

impl ProblemGroup {
    pub fn is_version_skew(&self) -> bool {
        !self.differing_classes.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UniquenessReport {
    pub summary: AnalysisSummary,
    pub problem_groups: Vec<ProblemGroup>,
}

impl UniquenessReport {
    /// One group per key of the artifact-set -> classes index.
    pub fn build(analyzer: &ClassUniquenessAnalyzer, summary: AnalysisSummary) -> Self {
        let problem_groups = analyzer
            .jars_to_classes()
            .iter()
            .map(|(jars, classes)| {
                let differing_classes: BTreeMap<String, Vec<ContentHash>> = analyzer
                    .differing_shared_classes_in_problem_jars(jars)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|class_name| {
                        let hashes: Vec<ContentHash> = analyzer
                            .class_hashes(class_name)
                            .map(|h| h.iter().copied().collect())
                            .unwrap_or_default();
                        (class_name.to_string(), hashes)
                    })
                    .collect();

                ProblemGroup {
                    artifacts: jars.iter().cloned().collect(),
                    shared_classes: classes.iter().cloned().collect(),
                    differing_classes,
                }
            })
            .collect();

        Self {
            summary,
            problem_groups,
        }
    }

    pub fn has_version_skew(&self) -> bool {
        self.problem_groups.iter().any(ProblemGroup::is_version_skew)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let s = &self.summary;
        let _ = writeln!(
            out,
            "checked {} classes from {} dependencies ({}ms)",
            s.classes_checked, s.artifacts, s.duration_ms
        );
        for skipped in &s.skipped {
            let _ = writeln!(out, "skipped (jar not found): {skipped}");
        }

        if self.problem_groups.is_empty() {
            out.push_str("all classes are unique\n");
            return out;
        }

        for group in &self.problem_groups {
            let jars: Vec<String> = group.artifacts.iter().map(ToString::to_string).collect();
            let identical = group
                .shared_classes
                .len()
                .saturating_sub(group.differing_classes.len());
            let _ = writeln!(
                out,
                "\n[{}] {}",
                if group.is_version_skew() { "error" } else { "warning" },
                jars.join(", ")
            );
            let _ = writeln!(
                out,
                "  {} shared classes, {} identical, {} differing",
                group.shared_classes.len(),
                identical,
                group.differing_classes.len()
            );
            for class_name in group.differing_classes.keys() {
                let _ = writeln!(out, "  - {class_name} (differs)");
            }
            for class_name in group
                .shared_classes
                .iter()
                .filter(|c| !group.differing_classes.contains_key(*c))
            {
                let _ = writeln!(out, "  - {class_name}");
            }
        }

        out
    }
}
