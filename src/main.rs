use clap::{Args, Parser, Subcommand};
use excuse_gen::{
    parse_expression, time_slot_seed, Catalog, CorpusConfig, Generator, DEFAULT_TIME_SLOT,
};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Weighted random excuse generator
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-d, -dd, -ddd)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    debug: u8,

    /// JSON file with corpus loading options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Where the expressions come from
#[derive(Args)]
struct Source {
    /// Corpus file, one expression per line
    #[arg(long, conflicts_with = "catalog")]
    corpus: Option<PathBuf>,

    /// Bundled corpus: meeting, ooo or any (default)
    #[arg(long)]
    catalog: Option<Catalog>,
}

impl Source {
    fn load(&self, config: &CorpusConfig) -> excuse_gen::Result<Generator> {
        match &self.corpus {
            Some(path) => Generator::from_file(path, config),
            None => self.catalog.unwrap_or(Catalog::Any).build(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print random expansions
    Generate {
        #[command(flatten)]
        source: Source,

        /// Seed of the first expansion, defaults to the current 5 minute slot
        #[arg(long)]
        seed: Option<u64>,

        /// Number of texts to generate
        #[arg(long, default_value = "1")]
        count: usize,

        /// Seed from the raw current time instead of the time slot
        #[arg(long, conflicts_with = "seed")]
        raw: bool,
    },
    /// Print the number of possible outputs, the longest output and the tree
    Inspect {
        #[command(flatten)]
        source: Source,
    },
    /// Print the canonical form of an expression
    Encode {
        expression: String,
    },
    /// Validate a corpus file
    Check {
        file: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    let config = match &cli.config {
        Some(path) => CorpusConfig::from_json_file(path)?,
        None => CorpusConfig::default(),
    };

    match cli.command {
        Commands::Generate {
            source,
            seed,
            count,
            raw,
        } => {
            let generator = source.load(&config)?;
            let seed = seed.unwrap_or_else(|| {
                let slot = if raw { Duration::ZERO } else { DEFAULT_TIME_SLOT };
                time_slot_seed(SystemTime::now(), slot)
            });
            info!(seed, count, "generating");

            for i in 0..count {
                println!("{}", generator.expand(seed.wrapping_add(i as u64)));
            }
        }
        Commands::Inspect { source } => {
            let generator = source.load(&config)?;
            println!("count: {}", generator.count());
            println!("max length: {}", generator.max_length());
            println!("{}", generator.debug_json());
        }
        Commands::Encode { expression } => {
            println!("{}", parse_expression(&expression)?);
        }
        Commands::Check { file } => {
            let generator = Generator::from_file(&file, &config)?;
            println!(
                "{}: OK ({} possible outputs, longest {} bytes)",
                file.display(),
                generator.count(),
                generator.max_length()
            );
        }
    }

    Ok(())
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // RUST_LOG directives take precedence over the -d flags
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();
}
