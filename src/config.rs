//! Options for creating a torrent, as supplied by a front end.

use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_PIECE_LENGTH_KB, MAX_IGNORE_PATTERNS};
use crate::metainfo::{IgnoreSet, MetainfoBuilder, MetainfoError, OrderingPolicy};

/// Torrent creation options.
///
/// Front ends fill this in from their own input (the bundled binary uses
/// command line flags) and call [`validate`](Self::validate) before doing any
/// I/O.
#[derive(Debug, Clone)]
pub struct TorrentConfig {
    /// Piece length in KiB.
    pub piece_length_kb: u64,
    /// Mark torrents private.
    pub private: bool,
    pub ordering: OrderingPolicy,
    /// Wildcard patterns for file and directory names to leave out.
    pub ignore_patterns: Vec<String>,
    /// Tracker URLs, primary first.
    pub trackers: Vec<String>,
    /// Overrides the torrent name derived from the input.
    pub name: Option<String>,
    /// Output file, or output directory when several inputs are given.
    pub output: Option<PathBuf>,
    /// Suppress per-file progress lines.
    pub quiet: bool,
}

impl Default for TorrentConfig {
    fn default() -> Self {
        Self {
            piece_length_kb: DEFAULT_PIECE_LENGTH_KB,
            private: false,
            ordering: OrderingPolicy::default(),
            ignore_patterns: Vec::new(),
            trackers: Vec::new(),
            name: None,
            output: None,
            quiet: false,
        }
    }
}

impl TorrentConfig {
    /// Piece length in bytes.
    pub fn piece_length(&self) -> Result<u64, MetainfoError> {
        self.piece_length_kb
            .checked_mul(1024)
            .filter(|&len| len > 0 && len <= i64::MAX as u64)
            .ok_or(MetainfoError::InvalidPieceLength(self.piece_length_kb))
    }

    /// Checks every option that can be checked without touching the disk.
    pub fn validate(&self) -> Result<(), MetainfoError> {
        self.piece_length()?;

        if self.trackers.is_empty() {
            return Err(MetainfoError::NoTrackers);
        }

        if self.ignore_patterns.len() > MAX_IGNORE_PATTERNS {
            return Err(MetainfoError::TooManyIgnorePatterns {
                count: self.ignore_patterns.len(),
                max: MAX_IGNORE_PATTERNS,
            });
        }

        IgnoreSet::new(self.ignore_patterns.iter().map(String::as_str))?;
        Ok(())
    }

    /// Returns a builder for one input, with `name` as the torrent name.
    ///
    /// An explicit [`name`](Self::name) in the configuration takes precedence.
    pub fn builder(
        &self,
        input: impl AsRef<Path>,
        name: Option<&str>,
    ) -> Result<MetainfoBuilder, MetainfoError> {
        self.validate()?;

        let mut builder = MetainfoBuilder::new(input.as_ref())
            .piece_length(self.piece_length()?)
            .private(self.private)
            .ordering(self.ordering)
            .quiet(self.quiet);

        if let Some(name) = self.name.as_deref().or(name) {
            builder = builder.name(name);
        }
        for tracker in &self.trackers {
            builder = builder.add_tracker(tracker.as_str());
        }
        for pattern in &self.ignore_patterns {
            builder = builder.ignore(pattern.as_str());
        }

        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TorrentConfig {
        TorrentConfig {
            trackers: vec!["http://tracker.example.com/announce".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = config();
        assert_eq!(config.piece_length().unwrap(), 262144);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_piece_length_from_kb() {
        let config = TorrentConfig {
            piece_length_kb: 1,
            ..config()
        };
        assert_eq!(config.piece_length().unwrap(), 1024);
    }

    #[test]
    fn test_zero_piece_length_rejected() {
        let config = TorrentConfig {
            piece_length_kb: 0,
            ..config()
        };
        assert!(matches!(
            config.validate(),
            Err(MetainfoError::InvalidPieceLength(0))
        ));
    }

    #[test]
    fn test_overflowing_piece_length_rejected() {
        let config = TorrentConfig {
            piece_length_kb: u64::MAX / 2,
            ..config()
        };
        assert!(config.validate().unwrap_err().is_config());
    }

    #[test]
    fn test_trackers_required() {
        let config = TorrentConfig::default();
        assert!(matches!(config.validate(), Err(MetainfoError::NoTrackers)));
    }

    #[test]
    fn test_ignore_pattern_limit() {
        let config = TorrentConfig {
            ignore_patterns: vec!["*.tmp".into(); MAX_IGNORE_PATTERNS + 1],
            ..config()
        };
        assert!(matches!(
            config.validate(),
            Err(MetainfoError::TooManyIgnorePatterns { count: 257, max: 256 })
        ));

        let config = TorrentConfig {
            ignore_patterns: vec!["*.tmp".into(); MAX_IGNORE_PATTERNS],
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let config = TorrentConfig {
            ignore_patterns: vec!["[".into()],
            ..config()
        };
        assert!(matches!(
            config.validate(),
            Err(MetainfoError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_builder_uses_config_name_over_derived() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = temp.path().join("data.bin");
        std::fs::write(&file, b"0123456789").unwrap();

        let config = TorrentConfig {
            name: Some("renamed".into()),
            ..config()
        };
        let bytes = config.builder(&file, Some("data.bin")).unwrap().build().unwrap();
        let torrent = crate::bencode::decode(&bytes).unwrap();
        let name = torrent
            .get(b"info")
            .and_then(|info| info.get(b"name"))
            .and_then(|v| v.as_str());
        assert_eq!(name, Some("renamed"));
    }
}
