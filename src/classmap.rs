use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;
use crate::extract::extract_from_file;
use crate::scan::scan_sources;

/// Where a named type is defined: one file, or several when the same name is
/// declared in more than one place. Multi-location entries keep their paths
/// in encounter order.
///
/// Serialized untagged, so a classmap file stores a bare path string or an
/// ordered list of path strings per name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Single(PathBuf),
    Multiple(Vec<PathBuf>),
}

impl Location {
    /// Candidate paths in encounter order.
    pub fn paths(&self) -> &[PathBuf] {
        match self {
            Location::Single(path) => std::slice::from_ref(path),
            Location::Multiple(paths) => paths,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Location::Multiple(_))
    }
}

impl From<PathBuf> for Location {
    fn from(path: PathBuf) -> Self {
        Location::Single(path)
    }
}

impl From<&Path> for Location {
    fn from(path: &Path) -> Self {
        Location::Single(path.to_path_buf())
    }
}

impl From<&str> for Location {
    fn from(path: &str) -> Self {
        Location::Single(PathBuf::from(path))
    }
}

impl From<String> for Location {
    fn from(path: String) -> Self {
        Location::Single(PathBuf::from(path))
    }
}

impl From<Vec<PathBuf>> for Location {
    fn from(paths: Vec<PathBuf>) -> Self {
        Location::Multiple(paths)
    }
}

/// The complete name→location(s) mapping, in-memory form.
pub type ClassMap = BTreeMap<String, Location>;

/// Folds per-file extraction results into one classmap.
///
/// Unlike the lookup table's `set`, recording never overwrites: a second
/// file declaring an already-seen name promotes the entry to
/// [`Location::Multiple`], and later files append to it.
#[derive(Debug, Default)]
pub struct ClassMapBuilder {
    map: ClassMap,
}

impl ClassMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        let name = name.into();
        let path = path.into();
        let location = match self.map.remove(&name) {
            None => Location::Single(path),
            Some(Location::Single(first)) => Location::Multiple(vec![first, path]),
            Some(Location::Multiple(mut paths)) => {
                paths.push(path);
                Location::Multiple(paths)
            }
        };
        self.map.insert(name, location);
    }

    pub fn build(self) -> ClassMap {
        self.map
    }
}

/// Scans `root` for files with `extension` and folds every declared type
/// name into a classmap.
///
/// Extraction is per-file and runs in parallel; the fold itself is
/// sequential over the sorted file list, since the single→multiple
/// promotion depends on encounter order.
pub fn build_classmap(root: &Path, extension: &str) -> Result<ClassMap> {
    let mut files = scan_sources(root, extension)?;
    files.sort();

    let extracted: Vec<(PathBuf, Vec<String>)> = files
        .into_par_iter()
        .map(|path| {
            let names = extract_from_file(&path);
            (path, names)
        })
        .collect();

    let mut builder = ClassMapBuilder::new();
    for (path, names) in extracted {
        for name in names {
            builder.record(name, path.clone());
        }
    }

    let map = builder.build();
    debug!(root = %root.display(), entries = map.len(), "classmap built");
    Ok(map)
}
