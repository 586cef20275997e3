//! Bucket discovery: walk root paths, filter, dedupe and order candidates.

use crate::bucket_name::BucketName;
use crate::error::{CoreError, CoreResult};
use crate::filter::PathFilter;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A file that passed the path filters and may resolve to a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Basename, the ordering and deduplication key
    pub name: BucketName,
    /// Full path as discovered
    pub path: PathBuf,
    /// Root the file was found under
    pub root: PathBuf,
}

/// Walks configured roots and returns candidate files in apply order.
#[derive(Debug, Clone)]
pub struct BucketLocator {
    roots: Vec<PathBuf>,
    filter: PathFilter,
}

impl BucketLocator {
    pub fn new(roots: Vec<PathBuf>, filter: PathFilter) -> Self {
        Self { roots, filter }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Discover candidates under every root.
    ///
    /// Directory roots are walked recursively; file roots are taken as-is.
    /// When two roots provide the same basename the first one seen wins and
    /// the other is dropped with a warning. The result is sorted by basename,
    /// which is what makes timestamp-prefixed file names apply in order.
    ///
    /// A missing or unreadable root aborts discovery.
    pub fn locate(&self) -> CoreResult<Vec<Candidate>> {
        let mut seen: HashMap<BucketName, PathBuf> = HashMap::new();
        let mut candidates = Vec::new();

        for root in &self.roots {
            log::debug!("Look for buckets in {}", root.display());

            let metadata = std::fs::metadata(root).map_err(|e| CoreError::Discovery {
                path: root.display().to_string(),
                source: e,
            })?;

            let mut files = Vec::new();
            if metadata.is_dir() {
                collect_files(root, &mut files)?;
            } else {
                files.push(root.clone());
            }

            for path in files {
                if !self.filter.accepts(&path, root) {
                    log::debug!("Filtered out: {}", path.display());
                    continue;
                }
                let Some(name) = BucketName::from_path(&path) else {
                    log::warn!("Ignoring {}: file name is not valid UTF-8", path.display());
                    continue;
                };
                if let Some(first) = seen.get(&name) {
                    log::warn!(
                        "Duplicate bucket name {}: keeping {}, ignoring {}",
                        name,
                        first.display(),
                        path.display()
                    );
                    continue;
                }
                seen.insert(name.clone(), path.clone());
                candidates.push(Candidate {
                    name,
                    path,
                    root: root.clone(),
                });
            }
        }

        candidates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(candidates)
    }
}

/// Recursively collect regular files under `dir`, in path order.
fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> CoreResult<()> {
    let read_err = |e: std::io::Error| CoreError::Discovery {
        path: dir.display().to_string(),
        source: e,
    };

    let mut entries = std::fs::read_dir(dir)
        .map_err(read_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_err)?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect_files(&path, files)?;
        } else if path.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "locator_test.rs"]
mod tests;
