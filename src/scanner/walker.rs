//! Candidate discovery.
//!
//! Only the contents of a directory root are ever counted. A root that is
//! a regular file, or that does not exist, yields no candidates and is
//! reported with a warning, so the run still prints an empty report.

use ignore::{DirEntry, WalkBuilder};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Extensions (lowercase, without the dot) of files worth counting.
pub const TEXT_EXTENSIONS: &[&str] = &[
    "py", "js", "ts", "jsx", "tsx", "md", "txt", "json", "yaml", "yml", "html", "css", "scss",
    "java", "c", "cpp", "h", "hpp", "rs",
];

/// Whether a file or directory name marks a hidden entry.
pub fn is_hidden_name(name: &OsStr) -> bool {
    name.as_encoded_bytes().first() == Some(&b'.')
}

/// Whether the path has one of the recognized text extensions.
///
/// The comparison ignores ASCII case, so `README.MD` qualifies.
pub fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            TEXT_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// A regular file below the root, or a symlink that resolves to one.
fn is_file_entry(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    match entry.file_type() {
        Some(ft) if ft.is_file() => true,
        Some(ft) if ft.is_symlink() => entry.path().is_file(),
        _ => false,
    }
}

/// Recursive walker yielding candidate text files under a root.
///
/// Hidden directories are pruned before descent unless `include_hidden`
/// is set. The root itself is always walked, whatever its name.
#[derive(Debug, Clone)]
pub struct FileWalker {
    root: PathBuf,
    include_hidden: bool,
}

impl FileWalker {
    pub fn new<P: AsRef<Path>>(root: P, include_hidden: bool) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            include_hidden,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily walk the tree, yielding paths of recognized text files.
    ///
    /// Entries are visited in file-name order. Walk errors are logged and
    /// skipped.
    pub fn candidates(&self) -> impl Iterator<Item = PathBuf> {
        let include_hidden = self.include_hidden;
        let root_exists = self.root.exists();
        if !root_exists {
            tracing::warn!("Path does not exist: {}", self.root.display());
        } else if !self.root.is_dir() {
            tracing::warn!("Path is not a directory: {}", self.root.display());
        }

        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                include_hidden || entry.depth() == 0 || !is_hidden_name(entry.file_name())
            })
            .build();

        walker
            .filter_map(move |result| match result {
                Ok(entry) => Some(entry),
                Err(e) => {
                    // A missing root was already reported above
                    if root_exists {
                        tracing::warn!("Error walking directory: {}", e);
                    } else {
                        tracing::debug!("Error walking directory: {}", e);
                    }
                    None
                }
            })
            .filter(is_file_entry)
            .filter(|entry| {
                let keep = is_text_file(entry.path());
                if !keep {
                    tracing::trace!("Skipping unrecognized extension: {}", entry.path().display());
                }
                keep
            })
            .map(DirEntry::into_path)
    }
}
