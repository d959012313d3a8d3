//! linkrank CLI
//!
//! Estimates page ranks from a text file of links (`<source> <target>` per line).

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use linkrank::{
    distribution_rank, DistributionConfig, LinkGraph, Ranking, Representation, StochasticConfig,
};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Method {
    Stochastic,
    Distribution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReprArg {
    Auto,
    Sparse,
    Dense,
}

impl From<ReprArg> for Representation {
    fn from(r: ReprArg) -> Self {
        match r {
            ReprArg::Auto => Representation::Auto,
            ReprArg::Sparse => Representation::Sparse,
            ReprArg::Dense => Representation::Dense,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "linkrank", version, about = "Estimates page ranks from link information")]
struct Cli {
    /// Text file of links among web pages as URL tuples (stdin when omitted)
    datafile: Option<PathBuf>,

    /// Selected page rank algorithm
    #[arg(short, long, value_enum, default_value_t = Method::Stochastic)]
    method: Method,

    /// Number of random walks (stochastic)
    #[arg(short, long, default_value_t = 1_000_000)]
    repeats: usize,

    /// Steps per walk (stochastic) or iterations (distribution)
    #[arg(short, long, default_value_t = 100)]
    steps: usize,

    /// Number of results shown
    #[arg(short, long, default_value_t = 20)]
    number: usize,

    /// Damping factor (distribution)
    #[arg(short, long, default_value_t = 0.85)]
    damping: f64,

    /// Transition representation (distribution)
    #[arg(long, value_enum, default_value_t = ReprArg::Auto)]
    representation: ReprArg,

    /// Seed for the random walker; OS entropy when omitted.
    ///
    /// Parallel builds draw each chunk of walks from its own stream of this seed, so
    /// the same seed gives different counts than a serial build.
    #[arg(long, env = "LINKRANK_SEED")]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let graph = load_graph(cli.datafile.as_deref())?;
    let stats = graph.stats();
    println!(
        "Graph contains {} nodes and {} edges",
        stats.nodes, stats.edges
    );

    let start = Instant::now();
    let ranking = rank(&graph, &cli)?;
    let elapsed = start.elapsed();

    print_top(&ranking, cli.number)?;
    eprintln!("Calculation took {:.2} seconds.", elapsed.as_secs_f64());
    Ok(())
}

/// `RUST_LOG` drives the filter; `warn` applies only when it is unset or invalid.
fn init_tracing() {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();
}

fn load_graph(path: Option<&std::path::Path>) -> Result<LinkGraph<String>> {
    match path {
        Some(p) => {
            let file = File::open(p).with_context(|| format!("opening {}", p.display()))?;
            LinkGraph::from_reader(BufReader::new(file))
                .with_context(|| format!("loading {}", p.display()))
        }
        None => LinkGraph::from_reader(io::stdin().lock()).context("loading links from stdin"),
    }
}

fn rank(graph: &LinkGraph<String>, cli: &Cli) -> Result<Ranking<String>> {
    let ranking = match cli.method {
        Method::Stochastic => {
            let config = StochasticConfig {
                repeats: cli.repeats,
                steps: cli.steps,
            };
            stochastic(graph, config, cli.seed)?.into_frequencies()
        }
        Method::Distribution => {
            let config = DistributionConfig {
                steps: cli.steps,
                damping: cli.damping,
                representation: cli.representation.into(),
            };
            distribution_rank(graph, config)?
        }
    };
    Ok(ranking)
}

#[cfg(not(feature = "parallel"))]
fn stochastic(
    graph: &LinkGraph<String>,
    config: StochasticConfig,
    seed: Option<u64>,
) -> Result<Ranking<String>> {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    let mut rng = match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    };
    Ok(linkrank::stochastic_rank(graph, config, &mut rng)?)
}

#[cfg(feature = "parallel")]
fn stochastic(
    graph: &LinkGraph<String>,
    config: StochasticConfig,
    seed: Option<u64>,
) -> Result<Ranking<String>> {
    let seed = seed.unwrap_or_else(rand::random);
    Ok(linkrank::stochastic_rank_parallel(graph, config, seed)?)
}

fn print_top(ranking: &Ranking<String>, number: usize) -> Result<()> {
    eprintln!("Top {number} pages:");
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (label, score) in ranking.top_k(number) {
        writeln!(out, "{:.2}\t{}", 100.0 * score, label)?;
    }
    Ok(())
}
