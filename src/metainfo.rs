//! Torrent metainfo generation ([BEP-3]).
//!
//! This module turns files on disk into a `.torrent` document.
//!
//! # Overview
//!
//! - [`collect`] walks a directory tree and returns its regular files as
//!   [`FileEntry`] values, filtered by an [`IgnoreSet`] and sorted by an
//!   [`OrderingPolicy`].
//! - [`PieceHasher`] splits the concatenation of all file contents into
//!   fixed-size pieces and computes a SHA1 digest for each.
//! - [`MetainfoBuilder`] drives both and streams the result out as bencode.
//!
//! # Torrent Structure
//!
//! - **announce** - Primary tracker URL
//! - **announce-list** - One tier per tracker when several are given (BEP-12)
//! - **info**
//!   - `length` - File size (single-file) OR `files` - list of
//!     `{length, path}` (multi-file)
//!   - `name` - Suggested file/directory name
//!   - `piece length` - Size of each piece in bytes
//!   - `pieces` - Concatenated SHA1 hashes of each piece
//!   - `private` - Present and `1` for private torrents
//!
//! # Examples
//!
//! ```no_run
//! use torrentize::metainfo::MetainfoBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let torrent = MetainfoBuilder::new("release.iso")
//!     .add_tracker("udp://tracker.example.com:6969")
//!     .build()?;
//!
//! std::fs::write("release.iso.torrent", torrent)?;
//! # Ok(())
//! # }
//! ```
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod builder;
mod error;
mod file_list;
mod ignore;
mod piece_hasher;

pub use builder::{BuildSummary, MetainfoBuilder};
pub use error::MetainfoError;
pub use file_list::{collect, FileEntry, OrderingPolicy};
pub use ignore::IgnoreSet;
pub use piece_hasher::{PieceHasher, PIECE_HASH_LEN};
