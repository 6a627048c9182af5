//! Corpus file repair binary.
//!
//! `reencode` rewrites files in a target encoding, guessing the source
//! encoding when the declared one cannot decode a file. `normalize` strips
//! diacritics from UTF-8 files in place.

use std::path::PathBuf;
use std::process::ExitCode;

use charcorpus::codec::{encoding_for_label, normalize_files, reencode_files};
use charcorpus::data::expand_inputs;
use charcorpus::CorpusResult;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "charcorpus-repair",
    about = "Re-encode or normalize corpus text files in place"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rewrite files in a target encoding
    Reencode {
        /// Text files or directories of .txt files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Target encoding label
        #[arg(long, default_value = "utf-8")]
        target: String,

        /// Declared source encoding label (defaults to the target)
        #[arg(long)]
        source: Option<String>,
    },
    /// Strip diacritics from UTF-8 files
    Normalize {
        /// Text files or directories of .txt files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("charcorpus=info".parse().expect("static directive")),
        )
        .init();

    let args = Args::parse();
    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> CorpusResult<()> {
    match command {
        Command::Reencode {
            inputs,
            target,
            source,
        } => {
            let target = encoding_for_label(&target)?;
            let source = source.as_deref().map(encoding_for_label).transpose()?;
            let files = expand_inputs(&inputs)?;

            let reports = reencode_files(&files, target, source)?;
            let guessed = reports.iter().filter(|r| r.guessed).count();
            tracing::info!(
                "re-encoded {} files to {} ({} with a guessed source encoding)",
                reports.len(),
                target.name(),
                guessed
            );
        }
        Command::Normalize { inputs } => {
            let files = expand_inputs(&inputs)?;
            normalize_files(&files)?;
            tracing::info!("normalized {} files", files.len());
        }
    }
    Ok(())
}
