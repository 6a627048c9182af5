//! Corpus preparation binary.
//!
//! Loads text files into an encoded corpus, reports its size and walks the
//! epoch-rotated training batches. Optionally previews decoded batches,
//! saves the alphabet snapshot for generation runs, and draws a sample from
//! the corpus character frequencies with top-k sampling.

use std::path::PathBuf;
use std::process::ExitCode;

use charcorpus::checkpoint::{load_alphabet, save_alphabet};
use charcorpus::data::expand_inputs;
use charcorpus::{load_from_files, Alphabet, Config, CorpusResult, LoadConfig, TopKSampler};
use clap::Parser;
use ndarray::Array1;

#[derive(Parser, Debug)]
#[command(
    name = "charcorpus-prepare",
    about = "Encode text files into a character corpus and iterate training batches"
)]
struct Args {
    /// Text files or directories of .txt files, loaded in the given order
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Sentinel character appended after every file
    #[arg(long)]
    eof_char: Option<char>,

    /// Keep diacritics instead of stripping them
    #[arg(long)]
    no_normalize: bool,

    /// Number of epochs
    #[arg(long, default_value_t = 10)]
    epochs: usize,

    /// Rows per batch
    #[arg(long, default_value_t = 32)]
    batch_size: usize,

    /// Codes per batch row
    #[arg(long, default_value_t = 50)]
    seq_length: usize,

    /// Candidates kept by top-k sampling
    #[arg(long, default_value_t = 2)]
    top_n: usize,

    /// Start from a saved alphabet snapshot
    #[arg(long)]
    alphabet_in: Option<PathBuf>,

    /// Save the alphabet snapshot after loading
    #[arg(long)]
    alphabet_out: Option<PathBuf>,

    /// Print the decoded first row of this many batches
    #[arg(long, default_value_t = 0)]
    preview: usize,

    /// Draw this many characters from the corpus character frequencies
    #[arg(long, default_value_t = 0)]
    sample: usize,

    /// Seed for sampling
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("charcorpus=info".parse().expect("static directive")),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> CorpusResult<()> {
    let config = Config {
        n_epochs: args.epochs,
        batch_size: args.batch_size,
        seq_length: args.seq_length,
        top_n: args.top_n,
    };
    config.validate()?;

    let mut alphabet = match &args.alphabet_in {
        Some(path) => {
            let alphabet = load_alphabet(path)?;
            tracing::info!(
                "alphabet loaded from {} ({} codes)",
                path.display(),
                alphabet.alphabet_size()
            );
            alphabet
        }
        None => Alphabet::new(),
    };

    let files = expand_inputs(&args.inputs)?;

    let load_config = LoadConfig {
        eof_char: args.eof_char,
        normalize: !args.no_normalize,
    };
    let corpus = load_from_files(&mut alphabet, &files, &load_config)?;

    let unknown = corpus
        .codes()
        .iter()
        .filter(|&&c| c == charcorpus::UNK_CODE)
        .count();
    tracing::info!(
        "corpus: {} codes from {} files, alphabet size {}, {} unknown",
        corpus.len(),
        files.len(),
        alphabet.alphabet_size(),
        unknown
    );

    let batches = config.batches(&corpus)?;
    tracing::info!(
        "batches: {} per epoch x {} epochs, shape {}x{}",
        batches.n_batches(),
        batches.n_epochs(),
        batches.batch_size(),
        batches.seq_length()
    );

    let mut last_epoch = None;
    let mut total = 0;
    for batch in batches {
        if last_epoch != Some(batch.epoch) {
            tracing::debug!("epoch {}", batch.epoch);
            last_epoch = Some(batch.epoch);
        }
        if total < args.preview {
            let row: Vec<_> = batch.inputs.row(0).to_vec();
            println!("[epoch {} batch {}] {:?}", batch.epoch, total, alphabet.decode(&row));
        }
        total += 1;
    }
    tracing::info!("iterated {} batches", total);

    if args.sample > 0 {
        let text = sample_from_frequencies(&alphabet, corpus.codes(), &config, args)?;
        println!("{text}");
    }

    if let Some(path) = &args.alphabet_out {
        save_alphabet(&alphabet, path)?;
        tracing::info!("alphabet saved to {}", path.display());
    }

    Ok(())
}

/// Draw characters independently from the corpus code frequencies.
fn sample_from_frequencies(
    alphabet: &Alphabet,
    codes: &[charcorpus::Code],
    config: &Config,
    args: &Args,
) -> CorpusResult<String> {
    let mut counts = Array1::<f32>::zeros(alphabet.alphabet_size() + 1);
    for &code in codes {
        counts[code] += 1.0;
    }
    counts[charcorpus::UNK_CODE] = 0.0;

    let mut sampler = TopKSampler::new(config.top_n, args.seed);
    let mut text = String::with_capacity(args.sample);
    for _ in 0..args.sample {
        let code = sampler.sample(counts.view())?;
        text.extend(alphabet.decode_char(code));
    }
    Ok(text)
}
