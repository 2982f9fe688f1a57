//! Streaming torrent file builder.
//!
//! [`MetainfoBuilder`] turns a file or a directory tree into a v1 metainfo
//! document. The document is written key by key through a
//! [`BencodeWriter`], and file contents are hashed as they are read, so memory
//! use does not grow with the size of the input.
//!
//! # Key order
//!
//! Dictionaries are written in one fixed order:
//!
//! - top level: `announce`, `announce-list` (only with several trackers), `info`
//! - single-file `info`: `length`, `name`, `piece length`, `pieces`, `private`
//! - multi-file `info`: `files`, `name`, `piece length`, `pieces`, `private`
//! - each `files` entry: `length`, `path`
//!
//! This is also bencode's sorted-key order, so the output is canonical and the
//! same input always produces the same bytes.
//!
//! # Examples
//!
//! ```no_run
//! use torrentize::metainfo::{MetainfoBuilder, OrderingPolicy};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let summary = MetainfoBuilder::new("path/to/dir")
//!     .add_tracker("http://tracker.example.com/announce")
//!     .piece_length(262144)
//!     .ordering(OrderingPolicy::ExtensionFirst)
//!     .ignore("*.tmp")
//!     .private(true)
//!     .write_to_path("dir.torrent")?;
//!
//! println!("{} files, {} pieces", summary.files, summary.pieces);
//! # Ok(())
//! # }
//! ```

use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::error::MetainfoError;
use super::file_list::{collect, FileEntry, OrderingPolicy};
use super::ignore::IgnoreSet;
use super::piece_hasher::PieceHasher;
use crate::bencode::{BencodeWriter, Encoder};
use crate::constants::{DEFAULT_PIECE_LENGTH, READ_BUFFER_SIZE};

/// Totals reported after a successful build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildSummary {
    /// Number of files in the torrent.
    pub files: usize,
    /// Bytes read and hashed.
    pub total_length: u64,
    /// Number of piece hashes written.
    pub pieces: usize,
}

/// Builder for torrent files rooted at a file or directory.
///
/// A directory produces a multi-file torrent; anything else is hashed as a
/// single file. Every call to [`write_to`](Self::write_to) starts from fresh
/// hashing state, so one builder can be used for several outputs.
#[derive(Debug, Clone)]
pub struct MetainfoBuilder {
    root: PathBuf,
    /// Overrides the root's own name.
    name: Option<String>,
    piece_length: u64,
    private: bool,
    ordering: OrderingPolicy,
    trackers: Vec<String>,
    ignore_patterns: Vec<String>,
    quiet: bool,
}

impl MetainfoBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            name: None,
            piece_length: DEFAULT_PIECE_LENGTH,
            private: false,
            ordering: OrderingPolicy::default(),
            trackers: Vec::new(),
            ignore_patterns: Vec::new(),
            quiet: false,
        }
    }

    /// Sets the torrent's `name`: the file name in single-file mode, the top
    /// directory in multi-file mode. Defaults to the root's final component.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the piece length in bytes.
    pub fn piece_length(mut self, length: u64) -> Self {
        self.piece_length = length;
        self
    }

    pub fn private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    pub fn ordering(mut self, ordering: OrderingPolicy) -> Self {
        self.ordering = ordering;
        self
    }

    /// Adds a tracker. The first one becomes `announce`; with more than one,
    /// every tracker also gets its own tier in `announce-list`.
    pub fn add_tracker(mut self, url: impl Into<String>) -> Self {
        self.trackers.push(url.into());
        self
    }

    /// Adds a wildcard pattern for file and directory names to leave out.
    pub fn ignore(mut self, pattern: impl Into<String>) -> Self {
        self.ignore_patterns.push(pattern.into());
        self
    }

    /// Suppresses the per-file progress lines.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Builds the torrent and returns the bencoded bytes.
    pub fn build(&self) -> Result<Vec<u8>, MetainfoError> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Creates `path` and writes the torrent into it.
    ///
    /// When `path` lies inside the root directory, the torrent file itself is
    /// left out of the file list. On error the file may be left partially
    /// written.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<BuildSummary, MetainfoError> {
        let path = path.as_ref();
        // validate before creating anything on disk
        self.validate()?;
        let file = File::create(path).map_err(|e| MetainfoError::io("cannot create", path, e))?;
        let output = fs::canonicalize(path).ok();
        self.write_with(std::io::BufWriter::new(file), output.as_deref())
    }

    /// Writes the torrent into `sink`.
    pub fn write_to<W: Write>(&self, sink: W) -> Result<BuildSummary, MetainfoError> {
        self.write_with(sink, None)
    }

    /// Writes the torrent, leaving `output` (a canonical path) out of the file
    /// list.
    fn write_with<W: Write>(
        &self,
        sink: W,
        output: Option<&Path>,
    ) -> Result<BuildSummary, MetainfoError> {
        let ignore = self.validate()?;

        let meta =
            fs::metadata(&self.root).map_err(|e| MetainfoError::io("cannot stat", &self.root, e))?;
        let name = self.display_name()?;

        let mut out = BencodeWriter::new(sink);
        out.open_dict()?;

        out.write_str("announce")?;
        out.write_str(&self.trackers[0])?;

        if self.trackers.len() > 1 {
            out.write_str("announce-list")?;
            out.open_list()?;
            for tracker in &self.trackers {
                // one tier per tracker
                out.open_list()?;
                out.write_str(tracker)?;
                out.close_list()?;
            }
            out.close_list()?;
        }

        out.write_str("info")?;
        let mut run = InfoWriter {
            builder: self,
            output,
            hasher: PieceHasher::new(self.piece_length),
            buf: vec![0u8; READ_BUFFER_SIZE],
        };
        let summary = if meta.is_dir() {
            run.multi_file(&mut out, &name, &ignore)?
        } else {
            run.single_file(&mut out, &name, meta.len())?
        };

        out.close_dict()?;
        out.finish()?;

        debug!(
            root = %self.root.display(),
            files = summary.files,
            bytes = summary.total_length,
            pieces = summary.pieces,
            "torrent written"
        );
        Ok(summary)
    }

    /// Checks the configuration and compiles the ignore patterns.
    fn validate(&self) -> Result<IgnoreSet, MetainfoError> {
        // written as a bencode integer, so it must stay a positive i64
        if self.piece_length == 0 || self.piece_length > i64::MAX as u64 {
            return Err(MetainfoError::InvalidPieceLength(self.piece_length));
        }
        if self.trackers.is_empty() {
            return Err(MetainfoError::NoTrackers);
        }
        IgnoreSet::new(self.ignore_patterns.iter().map(String::as_str))
    }

    fn display_name(&self) -> Result<String, MetainfoError> {
        if let Some(name) = &self.name {
            return Ok(name.clone());
        }

        if let Some(name) = self.root.file_name() {
            return Ok(name.to_string_lossy().into_owned());
        }

        // "." and friends have no file name of their own
        let resolved = fs::canonicalize(&self.root)
            .map_err(|e| MetainfoError::io("cannot resolve", &self.root, e))?;
        Ok(resolved
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default())
    }
}

/// Per-build state: the piece stream and the read buffer feeding it.
struct InfoWriter<'a> {
    builder: &'a MetainfoBuilder,
    /// The torrent file being written, when it is a file on disk.
    output: Option<&'a Path>,
    hasher: PieceHasher,
    buf: Vec<u8>,
}

impl InfoWriter<'_> {
    fn single_file<W: Write>(
        &mut self,
        out: &mut BencodeWriter<W>,
        name: &str,
        length: u64,
    ) -> Result<BuildSummary, MetainfoError> {
        let builder = self.builder;
        let root = &builder.root;

        out.open_dict()?;

        out.write_str("length")?;
        out.write_int(length as i64)?;

        out.write_str("name")?;
        out.write_str(name)?;

        out.write_str("piece length")?;
        out.write_int(builder.piece_length as i64)?;

        self.progress(1, 1, &root.display().to_string(), length);
        self.stream_file(root, length)?;
        let total_length = self.hasher.bytes_hashed();
        let pieces = self.write_pieces(out)?;

        self.write_private(out)?;
        out.close_dict()?;

        Ok(BuildSummary {
            files: 1,
            total_length,
            pieces,
        })
    }

    fn multi_file<W: Write>(
        &mut self,
        out: &mut BencodeWriter<W>,
        name: &str,
        ignore: &IgnoreSet,
    ) -> Result<BuildSummary, MetainfoError> {
        let mut files = collect(&self.builder.root, self.builder.ordering, ignore)?;
        if let Some(output) = self.output {
            files.retain(|entry| !is_output_file(entry, output));
        }

        out.open_dict()?;

        out.write_str("files")?;
        out.open_list()?;
        for (idx, entry) in files.iter().enumerate() {
            write_file_entry(out, entry)?;
            self.progress(idx + 1, files.len(), &entry.relative_path, entry.size_bytes);
            self.stream_file(&entry.absolute_path, entry.size_bytes)?;
        }
        out.close_list()?;

        out.write_str("name")?;
        out.write_str(name)?;

        out.write_str("piece length")?;
        out.write_int(self.builder.piece_length as i64)?;

        let total_length = self.hasher.bytes_hashed();
        let pieces = self.write_pieces(out)?;

        self.write_private(out)?;
        out.close_dict()?;

        Ok(BuildSummary {
            files: files.len(),
            total_length,
            pieces,
        })
    }

    /// Reads `path` to the end, feeding every byte into the piece stream.
    fn stream_file(&mut self, path: &Path, expected: u64) -> Result<(), MetainfoError> {
        let mut file = File::open(path).map_err(|e| MetainfoError::io("cannot open", path, e))?;
        let mut read = 0u64;

        loop {
            let n = match file.read(&mut self.buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(MetainfoError::io("cannot read", path, e)),
            };
            self.hasher.feed(&self.buf[..n]);
            read += n as u64;
        }

        if read != expected {
            warn!(
                path = %path.display(),
                expected,
                read,
                "file size changed while hashing"
            );
        }
        Ok(())
    }

    /// Writes `pieces` as one byte string of concatenated digests.
    fn write_pieces<W: Write>(&mut self, out: &mut BencodeWriter<W>) -> Result<usize, MetainfoError> {
        let digests = self.hasher.finalize();
        out.write_str("pieces")?;
        out.write_bytes(digests.as_flattened())?;
        Ok(digests.len())
    }

    fn write_private<W: Write>(&self, out: &mut BencodeWriter<W>) -> Result<(), MetainfoError> {
        if self.builder.private {
            out.write_str("private")?;
            out.write_int(1)?;
        }
        Ok(())
    }

    fn progress(&self, index: usize, count: usize, path: &str, size: u64) {
        if !self.builder.quiet {
            info!("[{}/{}] hashing {} ({} bytes)", index, count, path, size);
        }
    }
}

/// True if `entry` is the torrent file currently being written.
fn is_output_file(entry: &FileEntry, output: &Path) -> bool {
    if entry.absolute_path.file_name() != output.file_name() {
        return false;
    }
    let same = fs::canonicalize(&entry.absolute_path).is_ok_and(|p| p == output);
    if same {
        debug!(path = %entry.absolute_path.display(), "skipping output file");
    }
    same
}

fn write_file_entry<W: Write>(
    out: &mut BencodeWriter<W>,
    entry: &FileEntry,
) -> Result<(), MetainfoError> {
    out.open_dict()?;

    out.write_str("length")?;
    out.write_int(entry.size_bytes as i64)?;

    out.write_str("path")?;
    out.open_list()?;
    for component in entry.components() {
        out.write_str(component)?;
    }
    out.close_list()?;

    out.close_dict()?;
    Ok(())
}
