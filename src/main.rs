//! torrentize command line tool
//!
//! `torrentize [OPTIONS] TRACKER_URL... FILE...`

mod cli;

use std::collections::HashSet;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{CommandFactory, Parser};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cli::{output_path, Cli, Input};
use torrentize::TorrentConfig;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let (config, inputs) = cli.into_config();
    if config.trackers.is_empty() {
        Cli::command()
            .error(clap::error::ErrorKind::MissingRequiredArgument, "no tracker URL given")
            .exit();
    }
    if inputs.is_empty() {
        Cli::command()
            .error(clap::error::ErrorKind::MissingRequiredArgument, "no input file given")
            .exit();
    }

    config.validate()?;

    let mut failed = 0;
    let mut written = HashSet::new();
    for arg in &inputs {
        if let Err(e) = create_torrent(&config, arg, inputs.len(), &mut written) {
            error!("{:#}", e);
            failed += 1;
        }
    }

    if failed > 0 {
        warn!("{} of {} torrents failed", failed, inputs.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Creates the torrent for one input argument.
///
/// `written` holds the outputs claimed by earlier inputs; an input whose
/// output is already taken fails instead of overwriting it.
fn create_torrent(
    config: &TorrentConfig,
    arg: &str,
    input_count: usize,
    written: &mut HashSet<PathBuf>,
) -> anyhow::Result<()> {
    let input = match Input::parse(arg) {
        Input::Empty => {
            warn!("ignoring empty argument");
            return Ok(());
        }
        Input::FilesystemRoot => bail!("won't torrent the root directory"),
        Input::Path(path) => path,
    };

    let output = output_path(&input, config.output.as_deref(), input_count);
    if !written.insert(output.clone()) {
        bail!(
            "{} would overwrite the torrent already written for another input",
            output.display()
        );
    }
    let name = input.file_name().and_then(|n| n.to_str());

    let summary = config
        .builder(&input, name)?
        .write_to_path(&output)
        .with_context(|| format!("failed to create {}", output.display()))?;

    info!(
        "wrote {} ({} files, {} bytes, {} pieces)",
        output.display(),
        summary.files,
        summary.total_length,
        summary.pieces
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_shared_basename_does_not_overwrite() {
        let temp = tempfile::TempDir::new().unwrap();
        let out_dir = temp.path().join("out");
        fs::create_dir(&out_dir).unwrap();
        for (dir, data) in [("a", "first"), ("b", "second")] {
            fs::create_dir(temp.path().join(dir)).unwrap();
            fs::write(temp.path().join(dir).join("x"), data).unwrap();
        }

        let config = TorrentConfig {
            trackers: vec!["http://tracker.example.com/announce".into()],
            output: Some(out_dir.clone()),
            quiet: true,
            ..TorrentConfig::default()
        };
        let first = temp.path().join("a/x");
        let second = temp.path().join("b/x");
        let mut written = HashSet::new();

        create_torrent(&config, first.to_str().unwrap(), 2, &mut written).unwrap();
        let before = fs::read(out_dir.join("x.torrent")).unwrap();

        let err = create_torrent(&config, second.to_str().unwrap(), 2, &mut written).unwrap_err();
        assert!(err.to_string().contains("would overwrite"));
        assert_eq!(fs::read(out_dir.join("x.torrent")).unwrap(), before);
    }
}
