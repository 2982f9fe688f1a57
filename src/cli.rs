//! Command line arguments and the per-input path rules.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::Parser;
use torrentize::constants::DEFAULT_PIECE_LENGTH_KB;
use torrentize::{OrderingPolicy, TorrentConfig};

/// URL schemes that mark a positional argument as a tracker.
const TRACKER_SCHEMES: &[&str] = &["http://", "https://", "udp://"];

/// Create .torrent files from files and directories
#[derive(Parser, Debug)]
#[command(name = "torrentize")]
#[command(version, about, long_about = None)]
#[command(override_usage = "torrentize [OPTIONS] TRACKER_URL... FILE...")]
pub struct Cli {
    /// Piece size in kilobytes
    #[arg(short = 'b', long = "piece-size", value_name = "KB", default_value_t = DEFAULT_PIECE_LENGTH_KB)]
    pub piece_size: u64,

    /// Leave out files and directories whose name matches this wildcard pattern
    #[arg(short = 'i', long = "ignore", value_name = "PATTERN")]
    pub ignore: Vec<String>,

    /// Output file, or output directory when several inputs are given
    #[arg(short = 'o', long = "output-name", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Mark the torrent private
    #[arg(short, long)]
    pub private: bool,

    /// Don't print progress
    #[arg(short, long)]
    pub quiet: bool,

    /// Name of the file or top directory inside the torrent
    #[arg(short = 'R', long = "rename", value_name = "NAME")]
    pub rename: Option<String>,

    /// Order files by directory, then extension, then path
    #[arg(long)]
    pub sort_by_extension: bool,

    /// Tracker URLs followed by the files or directories to torrent
    #[arg(value_name = "ARGS", required = true)]
    pub args: Vec<String>,
}

impl Cli {
    /// Splits the positionals and builds the configuration they describe.
    ///
    /// Returns the configuration and the input arguments.
    pub fn into_config(self) -> (TorrentConfig, Vec<String>) {
        let (trackers, inputs) = split_positionals(self.args);
        let ordering = if self.sort_by_extension {
            OrderingPolicy::ExtensionFirst
        } else {
            OrderingPolicy::Lexicographic
        };

        let config = TorrentConfig {
            piece_length_kb: self.piece_size,
            private: self.private,
            ordering,
            ignore_patterns: self.ignore,
            trackers,
            name: self.rename,
            output: self.output,
            quiet: self.quiet,
        };
        (config, inputs)
    }
}

/// Leading arguments with a tracker URL scheme are trackers, the rest inputs.
pub fn split_positionals(mut args: Vec<String>) -> (Vec<String>, Vec<String>) {
    let count = args
        .iter()
        .take_while(|arg| TRACKER_SCHEMES.iter().any(|scheme| arg.starts_with(scheme)))
        .count();
    let inputs = args.split_off(count);
    (args, inputs)
}

/// An input argument after trailing slashes are removed.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Empty,
    /// The argument named `/` itself.
    FilesystemRoot,
    Path(PathBuf),
}

impl Input {
    pub fn parse(arg: &str) -> Self {
        let trimmed = arg.trim_end_matches('/');
        if arg.is_empty() {
            Input::Empty
        } else if trimmed.is_empty() {
            Input::FilesystemRoot
        } else {
            Input::Path(PathBuf::from(trimmed))
        }
    }
}

/// Where the torrent for `input` is written.
///
/// Without an explicit output the torrent goes next to the input. With one
/// input the explicit output is the file itself; with several it is a
/// directory holding `<name>.torrent` for each input.
pub fn output_path(input: &Path, output: Option<&Path>, input_count: usize) -> PathBuf {
    match output {
        None => with_torrent_suffix(input.as_os_str().to_owned()),
        Some(path) if input_count == 1 => path.to_path_buf(),
        Some(dir) => {
            let name = input
                .file_name()
                .map(|n| n.to_owned())
                .unwrap_or_else(|| input.as_os_str().to_owned());
            dir.join(with_torrent_suffix(name))
        }
    }
}

fn with_torrent_suffix(mut name: OsString) -> PathBuf {
    name.push(".torrent");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_positionals() {
        let (trackers, inputs) = split_positionals(strings(&[
            "http://a.example.com/announce",
            "udp://b.example.com:6969",
            "https://c.example.com/announce",
            "dir",
            "http://not-a-tracker-any-more",
        ]));
        assert_eq!(trackers.len(), 3);
        assert_eq!(inputs, ["dir", "http://not-a-tracker-any-more"]);
    }

    #[test]
    fn test_split_without_trackers() {
        let (trackers, inputs) = split_positionals(strings(&["file.iso"]));
        assert!(trackers.is_empty());
        assert_eq!(inputs, ["file.iso"]);
    }

    #[test]
    fn test_input_parse() {
        assert_eq!(Input::parse(""), Input::Empty);
        assert_eq!(Input::parse("/"), Input::FilesystemRoot);
        assert_eq!(Input::parse("///"), Input::FilesystemRoot);
        assert_eq!(Input::parse("dir///"), Input::Path("dir".into()));
        assert_eq!(Input::parse("/srv/data/"), Input::Path("/srv/data".into()));
    }

    #[test]
    fn test_output_path_default_suffix() {
        assert_eq!(
            output_path(Path::new("music/album"), None, 2),
            PathBuf::from("music/album.torrent")
        );
    }

    #[test]
    fn test_output_path_single_input() {
        assert_eq!(
            output_path(Path::new("album"), Some(Path::new("out.torrent")), 1),
            PathBuf::from("out.torrent")
        );
    }

    #[test]
    fn test_output_path_directory_for_many_inputs() {
        assert_eq!(
            output_path(Path::new("/srv/album"), Some(Path::new("torrents")), 3),
            PathBuf::from("torrents/album.torrent")
        );
    }

    #[test]
    fn test_cli_into_config() {
        let cli = Cli::parse_from([
            "torrentize",
            "-b",
            "512",
            "-i",
            "*.tmp",
            "--ignore",
            ".git",
            "-p",
            "-R",
            "renamed",
            "--sort-by-extension",
            "udp://tracker.example.com:6969",
            "data",
        ]);
        let (config, inputs) = cli.into_config();

        assert_eq!(config.piece_length().unwrap(), 512 * 1024);
        assert_eq!(config.ignore_patterns, ["*.tmp", ".git"]);
        assert!(config.private);
        assert!(!config.quiet);
        assert_eq!(config.name.as_deref(), Some("renamed"));
        assert_eq!(config.ordering, OrderingPolicy::ExtensionFirst);
        assert_eq!(config.trackers, ["udp://tracker.example.com:6969"]);
        assert_eq!(inputs, ["data"]);
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["torrentize", "http://t.example.com/announce", "f"]);
        let (config, _) = cli.into_config();
        assert_eq!(config.piece_length_kb, DEFAULT_PIECE_LENGTH_KB);
        assert_eq!(config.ordering, OrderingPolicy::Lexicographic);
        assert!(config.output.is_none());
    }
}
