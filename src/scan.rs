use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tracing::debug;

use crate::error::Result;

/// Recursively collects every file beneath `root` whose extension matches
/// `extension`, case-insensitively. Filtering is purely on the filename;
/// contents are never sniffed. Traversal order is unspecified.
pub fn scan_sources(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let (tx, rx) = mpsc::channel();

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .build_parallel();

    let ext = extension.to_owned();
    walker.run(|| {
        let tx = tx.clone();
        let ext = ext.clone();
        Box::new(move |entry| {
            if let Ok(entry) = entry {
                let is_file = entry.file_type().is_some_and(|t| t.is_file());
                if is_file && has_source_extension(entry.path(), &ext) {
                    let _ = tx.send(entry.path().to_path_buf());
                }
            }
            ignore::WalkState::Continue
        })
    });

    drop(tx);
    let files: Vec<PathBuf> = rx.iter().collect();
    debug!(root = %root.display(), count = files.len(), "scanned source tree");
    Ok(files)
}

pub fn has_source_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}
