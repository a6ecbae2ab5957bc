// Lyricist CLI entry point.
//
// Builds bigram graphs from lyric corpora and composes songs from them.
// Generated text goes to stdout; diagnostics go to stderr through `tracing`
// (set `RUST_LOG=debug` for build and load summaries).
//
// Usage:
//   lyricist build --corpus songs.json --output graph.csv [--per-song]
//   lyricist compose --graph graph.csv [--config request.json] [--lines N]
//     [--max-words N] [--seed N] [--no-rhyme] [--alliteration]
//   lyricist top-words --corpus songs.json [-n 20]
//   lyricist segment WORD...

use clap::{Parser, Subcommand};
use lyricist_compose::{
    BuildOptions, ComposeRequest, Corpus, LyricError, LyricModel, ResetPolicy, dump_graph,
    load_graph,
};
use lyricist_lang::{Phonotactics, Segmenter, Tokenizer};
use lyricist_prng::LyricRng;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "lyricist")]
#[command(about = "Rhyme-aware lyric generation from bigram graphs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tokenize a corpus and write its bigram graph
    Build {
        /// JSON corpus: an array of songs (arrays of lines) or nulls
        #[arg(long)]
        corpus: PathBuf,
        /// Graph file to write
        #[arg(long)]
        output: PathBuf,
        /// Run lines of a song together instead of resetting every line
        #[arg(long)]
        per_song: bool,
    },

    /// Compose a song from a graph file
    Compose {
        #[arg(long)]
        graph: PathBuf,
        /// JSON generation request; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        lines: Option<usize>,
        #[arg(long)]
        max_words: Option<usize>,
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        no_rhyme: bool,
        #[arg(long)]
        alliteration: bool,
    },

    /// Print the most frequent tokens of a corpus
    TopWords {
        #[arg(long)]
        corpus: PathBuf,
        #[arg(short = 'n', default_value = "20")]
        count: usize,
    },

    /// Print the morphemes of each word
    Segment {
        #[arg(required = true)]
        words: Vec<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), LyricError> {
    match command {
        Command::Build {
            corpus,
            output,
            per_song,
        } => {
            let corpus = Corpus::load(&Tokenizer::new(), &corpus)?;
            let reset = if per_song {
                ResetPolicy::PerSong
            } else {
                ResetPolicy::PerLine
            };
            let graph = corpus.graph(BuildOptions { reset });
            dump_graph(&graph, &output)?;
            eprintln!(
                "{} songs, {} lines -> {} nodes, {} edges",
                corpus.song_count(),
                corpus.line_count(),
                graph.node_count(),
                graph.edge_count()
            );
        }
        Command::Compose {
            graph,
            config,
            lines,
            max_words,
            seed,
            no_rhyme,
            alliteration,
        } => {
            let mut request = match config {
                Some(path) => ComposeRequest::load(&path)?,
                None => ComposeRequest::default(),
            };
            if let Some(lines) = lines {
                request.line_count = lines;
            }
            if let Some(max_words) = max_words {
                request.max_words_per_line = max_words;
            }
            if no_rhyme {
                request.use_rhyme = false;
            }
            if alliteration {
                request.use_alliteration = true;
            }
            let segmenter = Segmenter::new(Phonotactics::english());
            let model = LyricModel::hip_hop(load_graph(&graph)?, &segmenter);
            let mut rng = LyricRng::new(seed.unwrap_or_else(clock_seed));
            println!("{}", model.compose(&request, &mut rng)?);
        }
        Command::TopWords { corpus, count } => {
            let corpus = Corpus::load(&Tokenizer::new(), &corpus)?;
            for (word, n) in corpus.top_words(count) {
                println!("{n:>8}  {word}");
            }
        }
        Command::Segment { words } => {
            let segmenter = Segmenter::new(Phonotactics::english());
            for word in words {
                println!("{word}: {}", segmenter.segment_word(&word));
            }
        }
    }
    Ok(())
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as u64)
}
