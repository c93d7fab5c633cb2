use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use crate::error::AnalyzerError;

pub const LOCAL_GROUP: &str = "local";
pub const UNSPECIFIED_VERSION: &str = "unspecified";

/// Maven-style `group:name:version` coordinate identifying one dependency.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactIdentity {
    pub group: String,
    pub name: String,
    pub version: String,
}

/// The exact group of artifacts that jointly provide some class.
pub type ArtifactSet = BTreeSet<ArtifactIdentity>;

impl ArtifactIdentity {
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Path of this artifact's jar inside a Maven repository.
    pub fn repository_path(&self, m2_repo: &Path) -> PathBuf {
        let mut path = m2_repo.to_path_buf();
        for part in self.group.split('.') {
            path.push(part);
        }
        path.join(&self.name)
            .join(&self.version)
            .join(format!("{}-{}.jar", self.name, self.version))
    }

    /// Infers coordinates from a jar's position in a Maven repository layout
    /// (`org/example/demo/1.0/demo-1.0.jar`). Jars outside that layout get a
    /// `local:<path without .jar>:unspecified` identity, relative to `root`
    /// when the jar lives under it, so same-named jars stay distinct.
    pub fn from_jar_path(root: &Path, jar_path: &Path) -> Self {
        let stem = jar_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let parts: Vec<String> = jar_path
            .strip_prefix(root)
            .unwrap_or(jar_path)
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().to_string()),
                _ => None,
            })
            .collect();

        // group dirs.., name, version, file
        if parts.len() >= 4 {
            let version = &parts[parts.len() - 2];
            let name = &parts[parts.len() - 3];
            if stem.starts_with(&format!("{name}-{version}")) {
                let group = parts[..parts.len() - 3].join(".");
                return Self::new(group, name.as_str(), version.as_str());
            }
        }

        let mut name = parts.join("/");
        if let Some(trimmed) = name.strip_suffix(".jar") {
            name.truncate(trimmed.len());
        }
        Self::new(LOCAL_GROUP, name, UNSPECIFIED_VERSION)
    }
}

impl fmt::Display for ArtifactIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

impl FromStr for ArtifactIdentity {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        match parts.as_slice() {
            [group, name, version]
                if !group.is_empty() && !name.is_empty() && !version.is_empty() =>
            {
                Ok(Self::new(*group, *name, *version))
            }
            _ => Err(AnalyzerError::InvalidCoordinate(s.to_string())),
        }
    }
}

impl Serialize for ArtifactIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A dependency handed to the analyzer: its identity and the archive backing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    pub identity: ArtifactIdentity,
    pub path: PathBuf,
}

impl ResolvedArtifact {
    pub fn new(identity: ArtifactIdentity, path: impl Into<PathBuf>) -> Self {
        Self {
            identity,
            path: path.into(),
        }
    }

    pub fn from_coordinate(coordinate: &str, m2_repo: &Path) -> Result<Self, AnalyzerError> {
        let identity: ArtifactIdentity = coordinate.parse()?;
        let path = identity.repository_path(m2_repo);
        Ok(Self { identity, path })
    }

    /// Only absence counts as missing; a directory or unreadable path is left
    /// for the scanner to fail on.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

pub fn looks_like_coordinate(raw: &str) -> bool {
    raw.matches(':').count() == 2
        && !raw.contains(['/', '\\'])
        && !raw.ends_with(".jar")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_coordinates() {
        let id: ArtifactIdentity = "com.google.guava:guava:33.0.0-jre".parse().unwrap();
        assert_eq!(id.group, "com.google.guava");
        assert_eq!(id.name, "guava");
        assert_eq!(id.version, "33.0.0-jre");
        assert_eq!(id.to_string(), "com.google.guava:guava:33.0.0-jre");
    }

    #[test]
    fn rejects_malformed_coordinates() {
        assert!("guava".parse::<ArtifactIdentity>().is_err());
        assert!("a::1.0".parse::<ArtifactIdentity>().is_err());
        assert!("a:b:c:d".parse::<ArtifactIdentity>().is_err());
    }

    #[test]
    fn repository_path_follows_maven_layout() {
        let id = ArtifactIdentity::new("org.apache.commons", "commons-lang3", "3.14.0");
        let path = id.repository_path(Path::new("/m2"));
        assert_eq!(
            path,
            PathBuf::from("/m2/org/apache/commons/commons-lang3/3.14.0/commons-lang3-3.14.0.jar")
        );
    }

    #[test]
    fn from_jar_path_infers_maven_coordinates() {
        let root = Path::new("/m2");
        let jar = Path::new("/m2/org/example/demo/1.0/demo-1.0.jar");
        assert_eq!(
            ArtifactIdentity::from_jar_path(root, jar),
            ArtifactIdentity::new("org.example", "demo", "1.0")
        );

        let classified = Path::new("/m2/org/example/demo/1.0/demo-1.0-tests.jar");
        assert_eq!(
            ArtifactIdentity::from_jar_path(root, classified).name,
            "demo"
        );
    }

    #[test]
    fn from_jar_path_falls_back_to_local_identity() {
        let root = Path::new("/libs");
        let jar = Path::new("/libs/vendor.jar");
        assert_eq!(
            ArtifactIdentity::from_jar_path(root, jar),
            ArtifactIdentity::new(LOCAL_GROUP, "vendor", UNSPECIFIED_VERSION)
        );
    }

    #[test]
    fn same_named_jars_in_sibling_directories_stay_distinct() {
        let root = Path::new("/libs");
        let v1 = ArtifactIdentity::from_jar_path(root, Path::new("/libs/v1/guava.jar"));
        let v2 = ArtifactIdentity::from_jar_path(root, Path::new("/libs/v2/guava.jar"));
        assert_ne!(v1, v2);
        assert_eq!(v1.to_string(), "local:v1/guava:unspecified");
        assert_eq!(v2.to_string(), "local:v2/guava:unspecified");

        let outside = ArtifactIdentity::from_jar_path(root, Path::new("/opt/guava.jar"));
        assert_eq!(outside.name, "opt/guava");
    }

    #[test]
    fn directory_path_counts_as_existing() {
        let artifact = ResolvedArtifact::new(
            ArtifactIdentity::new("g", "dir", "1"),
            std::env::temp_dir(),
        );
        assert!(artifact.exists());
    }

    #[test]
    fn coordinate_detection_ignores_paths() {
        assert!(looks_like_coordinate("org.example:demo:1.0"));
        assert!(!looks_like_coordinate("libs/demo-1.0.jar"));
        assert!(!looks_like_coordinate("C:\\libs\\demo.jar"));
    }
}
