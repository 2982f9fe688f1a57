//! Bencode encoding and decoding ([BEP-3]).
//!
//! Bencode is the serialization format of `.torrent` files.
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! # Streaming output
//!
//! Metainfo documents are written through the [`Encoder`] trait, whose only
//! implementation [`BencodeWriter`] streams into any [`std::io::Write`]. Nothing
//! is buffered beyond a byte string's length prefix, so a document with
//! millions of piece hashes never has to exist as a tree in memory.
//!
//! ```
//! use torrentize::bencode::{BencodeWriter, Encoder};
//!
//! let mut out = BencodeWriter::new(Vec::new());
//! out.open_dict().unwrap();
//! out.write_str("announce").unwrap();
//! out.write_str("http://tracker.example.com/announce").unwrap();
//! out.close_dict().unwrap();
//!
//! let bytes = out.finish().unwrap();
//! assert_eq!(bytes, b"d8:announce35:http://tracker.example.com/announcee");
//! ```
//!
//! # Reading
//!
//! [`decode`] parses a document back into a [`Value`] tree. It checks bencode
//! syntax only and knows nothing about torrent semantics.
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod decode;
mod encode;
mod error;
mod value;

pub use decode::decode;
pub use encode::{encode, encode_value, BencodeWriter, Encoder};
pub use error::BencodeError;
pub use value::Value;

#[cfg(test)]
mod tests;
