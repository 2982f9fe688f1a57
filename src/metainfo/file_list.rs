use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::MetainfoError;
use super::ignore::IgnoreSet;

/// Order in which collected files appear in a multi-file torrent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingPolicy {
    /// Byte-wise comparison of the full relative path.
    #[default]
    Lexicographic,
    /// Directory prefix first, then extension, then the full path.
    ///
    /// Groups files of the same type within each directory.
    ExtensionFirst,
}

impl OrderingPolicy {
    /// Compares two collected files under this policy.
    ///
    /// Both policies are total orders: ties always fall through to the full
    /// relative path, which is unique within one collection.
    pub fn compare(&self, a: &FileEntry, b: &FileEntry) -> Ordering {
        match self {
            OrderingPolicy::Lexicographic => a.relative_path.cmp(&b.relative_path),
            OrderingPolicy::ExtensionFirst => a
                .parent_prefix()
                .cmp(b.parent_prefix())
                .then_with(|| a.extension().cmp(b.extension()))
                .then_with(|| a.relative_path.cmp(&b.relative_path)),
        }
    }
}

/// A regular file found under the torrent root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Slash-separated path relative to the root, without a leading slash.
    pub relative_path: String,
    /// Path used to open the file.
    pub absolute_path: PathBuf,
    /// Size reported when the file was enumerated.
    pub size_bytes: u64,
}

impl FileEntry {
    /// Path components as written into the torrent's `path` list.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.relative_path.split('/')
    }

    fn file_name(&self) -> &str {
        match self.relative_path.rfind('/') {
            Some(idx) => &self.relative_path[idx + 1..],
            None => &self.relative_path,
        }
    }

    /// Everything before the final `/`, or empty for files at the root.
    fn parent_prefix(&self) -> &str {
        match self.relative_path.rfind('/') {
            Some(idx) => &self.relative_path[..idx],
            None => "",
        }
    }

    /// The file name after its last `.`, or the whole name if it has none.
    fn extension(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(idx) => &name[idx + 1..],
            None => name,
        }
    }
}

/// Recursively lists the regular files under `root`.
///
/// Entries whose name matches `ignore` are dropped, and a matching directory
/// is not descended into. Symlinks to regular files are included with the
/// target's size; symlinks to directories are skipped so link cycles cannot
/// recurse. Anything else that is not a regular file or directory is skipped
/// with a warning.
///
/// The result is sorted by `ordering`, so repeated calls over an unchanged tree
/// return the same sequence.
pub fn collect(
    root: &Path,
    ordering: OrderingPolicy,
    ignore: &IgnoreSet,
) -> Result<Vec<FileEntry>, MetainfoError> {
    let mut files = Vec::new();
    walk(root, &mut Vec::new(), ignore, &mut files)?;
    files.sort_by(|a, b| ordering.compare(a, b));
    debug!(root = %root.display(), count = files.len(), "collected files");
    Ok(files)
}

enum Kind {
    File(u64),
    Dir,
    Skip(&'static str),
}

fn walk(
    dir: &Path,
    prefix: &mut Vec<String>,
    ignore: &IgnoreSet,
    files: &mut Vec<FileEntry>,
) -> Result<(), MetainfoError> {
    let entries =
        fs::read_dir(dir).map_err(|e| MetainfoError::io("cannot open directory", dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| MetainfoError::io("cannot read directory", dir, e))?;
        let path = entry.path();

        let Some(name) = entry.file_name().to_str().map(String::from) else {
            warn!(path = %path.display(), "skipping entry with non-UTF-8 name");
            continue;
        };

        if ignore.is_match(&name) {
            debug!(path = %path.display(), "ignored");
            continue;
        }

        let kind = classify(&entry, &path);
        match kind {
            Kind::File(size_bytes) => {
                let relative_path = if prefix.is_empty() {
                    name
                } else {
                    format!("{}/{}", prefix.join("/"), name)
                };
                files.push(FileEntry {
                    relative_path,
                    absolute_path: path,
                    size_bytes,
                });
            }
            Kind::Dir => {
                prefix.push(name);
                walk(&path, prefix, ignore, files)?;
                prefix.pop();
            }
            Kind::Skip(reason) => {
                warn!(path = %path.display(), "skipping {}", reason);
            }
        }
    }

    Ok(())
}

fn classify(entry: &fs::DirEntry, path: &Path) -> Kind {
    // The entry's own type does not follow symlinks; fall back to lstat when
    // the directory listing cannot tell.
    let file_type = match entry.file_type() {
        Ok(ft) => ft,
        Err(_) => match fs::symlink_metadata(path) {
            Ok(meta) => meta.file_type(),
            Err(_) => return Kind::Skip("entry of unknown type"),
        },
    };

    if file_type.is_symlink() {
        return match fs::metadata(path) {
            Ok(meta) if meta.is_file() => Kind::File(meta.len()),
            Ok(meta) if meta.is_dir() => Kind::Skip("symbolic link to directory"),
            Ok(_) => Kind::Skip("symbolic link to non-regular file"),
            Err(_) => Kind::Skip("unresolvable symbolic link"),
        };
    }

    if file_type.is_dir() {
        return Kind::Dir;
    }

    if file_type.is_file() {
        return match entry.metadata() {
            Ok(meta) => Kind::File(meta.len()),
            Err(_) => Kind::Skip("file that cannot be inspected"),
        };
    }

    Kind::Skip("non-regular file")
}
