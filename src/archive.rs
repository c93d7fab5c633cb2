//! Streaming scan of a jar's class entries.
//!
//! The jar is memory-mapped read-only and its central directory parsed once.
//! Entries are then hashed lazily, one per `next()` call, so a caller that
//! stops early never pays for the rest of the archive.

use memmap2::Mmap;
use serde::Serialize;
use std::fs::File;
use std::io::Cursor;
use tracing::debug;
use zip::ZipArchive;

use crate::artifact::{ArtifactIdentity, ResolvedArtifact};
use crate::error::{AnalyzerError, Result};
use crate::hash::{ContentHash, hash_reader};

const CLASS_SUFFIX: &str = ".class";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveEntry {
    pub class_name: String,
    pub content_hash: ContentHash,
    pub size: u64,
}

pub struct ArchiveScanner<'a> {
    artifact: &'a ResolvedArtifact,
    mmap: Mmap,
}

impl<'a> ArchiveScanner<'a> {
    /// Maps the artifact's jar. Returns `Ok(None)` when the file is absent.
    pub fn open(artifact: &'a ResolvedArtifact) -> Result<Option<Self>> {
        if !artifact.exists() {
            return Ok(None);
        }

        let file = File::open(&artifact.path)
            .map_err(|e| AnalyzerError::archive_read(&artifact.identity, &artifact.path, e))?;
        // SAFETY: The file is opened read-only and the mapping is owned by the
        // scanner, so it is unmapped exactly when the scanner is dropped.
        let mmap = unsafe { Mmap::map(&file) }
            .map_err(|e| AnalyzerError::archive_read(&artifact.identity, &artifact.path, e))?;

        Ok(Some(Self { artifact, mmap }))
    }

    pub fn identity(&self) -> &ArtifactIdentity {
        &self.artifact.identity
    }

    pub fn entries(&self) -> Result<ClassEntries<'_>> {
        let archive = ZipArchive::new(Cursor::new(&self.mmap[..])).map_err(|e| {
            AnalyzerError::archive_read(&self.artifact.identity, &self.artifact.path, e)
        })?;
        Ok(ClassEntries {
            archive,
            index: 0,
            artifact: self.artifact,
        })
    }
}

/// Lazy iterator over the class entries of one archive.
pub struct ClassEntries<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
    index: usize,
    artifact: &'a ResolvedArtifact,
}

impl ClassEntries<'_> {
    fn read_entry(&mut self, index: usize) -> Result<Option<ArchiveEntry>> {
        let artifact = self.artifact;
        let fail =
            |e: std::io::Error| AnalyzerError::archive_read(&artifact.identity, &artifact.path, e);

        let mut file = self.archive.by_index(index).map_err(|e| fail(e.into()))?;
        if file.is_dir() {
            return Ok(None);
        }
        let Some(class_name) = class_name_from_entry(file.name()) else {
            return Ok(None);
        };

        let (content_hash, size) = hash_reader(&mut file).map_err(fail)?;
        Ok(Some(ArchiveEntry {
            class_name,
            content_hash,
            size,
        }))
    }
}

impl Iterator for ClassEntries<'_> {
    type Item = Result<ArchiveEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.archive.len() {
            let index = self.index;
            self.index += 1;
            match self.read_entry(index) {
                Ok(Some(entry)) => return Some(Ok(entry)),
                Ok(None) => continue,
                Err(e) => {
                    // Nothing after a failed entry is trustworthy.
                    self.index = self.archive.len();
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

/// `org/example/Foo$Bar.class` -> `org.example.Foo$Bar`. Non-class entries yield `None`.
pub fn class_name_from_entry(entry_name: &str) -> Option<String> {
    let stem = entry_name.strip_suffix(CLASS_SUFFIX)?;
    if stem.is_empty() || stem.ends_with(['/', '\\']) {
        return None;
    }
    Some(stem.replace(['/', '\\'], "."))
}

/// Scans one artifact to completion. `Ok(None)` means its jar does not exist.
pub fn scan_artifact(artifact: &ResolvedArtifact) -> Result<Option<Vec<ArchiveEntry>>> {
    let Some(scanner) = ArchiveScanner::open(artifact)? else {
        return Ok(None);
    };
    let entries = scanner.entries()?.collect::<Result<Vec<_>>>()?;
    debug!(
        artifact = %artifact.identity,
        classes = entries.len(),
        "scanned {}",
        artifact.path.display()
    );
    Ok(Some(entries))
}
