//! GRIT shuffle: randomized genomic interval sets
//!
//! Usage: grit-shuffle <COMMAND> [OPTIONS]

use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process;

use grit_shuffle::bed::read_intervals;
use grit_shuffle::commands::{ShuffleCommand, UniverseBuilder};
use grit_shuffle::error::ShuffleError;
use grit_shuffle::genome::Genome;
use grit_shuffle::output::{BedLayout, BedWriter};

#[derive(Parser)]
#[command(name = "grit-shuffle")]
#[command(author = "Manish Kumar Bobbili")]
#[command(version)]
#[command(about = "GRIT shuffle: randomized genomic interval sets for enrichment null distributions", long_about = None)]
struct Cli {
    /// Number of threads to use for replicates (default: number of CPUs)
    #[arg(long, short = 't', global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Randomly reposition query intervals within a universe
    Shuffle {
        /// Query BED file
        #[arg(short, long)]
        input: PathBuf,

        /// Genome file with chromosome sizes
        #[arg(short = 'g', long)]
        genome: PathBuf,

        /// Universe BED file (default: whole genome)
        #[arg(short = 'u', long)]
        universe: Option<PathBuf>,

        /// Fraction of each interval that must fall inside the universe
        #[arg(long, default_value = "1.0")]
        included: f64,

        /// Keep every interval on its own chromosome
        #[arg(long)]
        chrom: bool,

        /// Random seed (default: from entropy)
        #[arg(long)]
        seed: Option<u64>,

        /// Number of shuffled sets to produce
        #[arg(short = 'n', long, default_value = "1")]
        replicates: usize,

        /// Print shuffle statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Print the merged universe used for placement
    Universe {
        /// Genome file with chromosome sizes
        #[arg(short = 'g', long)]
        genome: PathBuf,

        /// Universe BED file (default: whole genome)
        #[arg(short = 'u', long)]
        universe: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    // Configure thread pool if --threads specified
    if let Some(n) = cli.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
        {
            eprintln!("Error: failed to initialize thread pool: {}", e);
            process::exit(1);
        }
    }

    let result = match cli.command {
        Commands::Shuffle {
            input,
            genome,
            universe,
            included,
            chrom,
            seed,
            replicates,
            stats,
        } => run_shuffle(
            input, genome, universe, included, chrom, seed, replicates, stats,
        ),

        Commands::Universe { genome, universe } => run_universe(genome, universe),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

#[allow(clippy::too_many_arguments)]
fn run_shuffle(
    input: PathBuf,
    genome_file: PathBuf,
    universe: Option<PathBuf>,
    included: f64,
    chrom: bool,
    seed: Option<u64>,
    replicates: usize,
    stats: bool,
) -> Result<(), ShuffleError> {
    let genome = Genome::from_file(&genome_file)?;

    let mut cmd = ShuffleCommand::new()
        .with_included(included)
        .with_by_chrom(chrom)
        .with_replicates(replicates);
    cmd.seed = seed;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let result = cmd.run(input, &genome, universe, &mut handle)?;
    if stats {
        eprintln!("Shuffle stats: {}", result);
    }

    Ok(())
}

fn run_universe(genome_file: PathBuf, universe: Option<PathBuf>) -> Result<(), ShuffleError> {
    let genome = Genome::from_file(&genome_file)?;
    let intervals = universe.map(read_intervals).transpose()?;

    let universe = UniverseBuilder::new().build(intervals.as_deref(), &genome);

    let stdout = io::stdout();
    let mut writer = BedWriter::new(stdout.lock());
    let layout = BedLayout::for_intervals(universe.intervals());
    writer.write_all(universe.intervals(), layout, None)?;
    writer.flush()?;

    Ok(())
}
