//! torrentize - create BitTorrent metainfo files
//!
//! Turns a file or a directory tree into a `.torrent` document following
//! [BEP-3]. Files are enumerated in a deterministic order, their contents are
//! hashed as one continuous stream of fixed-size pieces, and the document is
//! written out incrementally as bencode.
//!
//! # Modules
//!
//! - [`bencode`] - Streaming bencode writer and a bencode reader
//! - [`metainfo`] - File collection, piece hashing and torrent building
//! - [`config`] - Validated options for front ends
//! - [`constants`] - Defaults and limits
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

pub mod bencode;
pub mod config;
pub mod constants;
pub mod metainfo;

pub use bencode::{decode, encode, BencodeError, BencodeWriter, Encoder, Value};
pub use config::TorrentConfig;
pub use metainfo::{
    collect, BuildSummary, FileEntry, IgnoreSet, MetainfoBuilder, MetainfoError, OrderingPolicy,
    PieceHasher,
};
