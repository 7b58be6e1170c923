use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::RawCatalog;
use pipeline::{BuildPipeline, DEFAULT_CAST_LIMIT, DEFAULT_MAX_FEATURES};
use server::{
    FsArtifactStore, Recommender, Resolution, build_and_save, load_recommender, resolve_title,
    suggestions, DEFAULT_TOP_N,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Default number of movies kept by popularity before a build
const DEFAULT_CORPUS_LIMIT: usize = 3000;

/// movie-recs - Content-based Movie Recommendations
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Movie recommendations from genres, keywords, cast and director", long_about = None)]
struct Cli {
    /// Path to the TMDB dataset directory
    #[arg(short, long, env = "MOVIE_RECS_DATA_DIR", default_value = "data/tmdb")]
    data_dir: PathBuf,

    /// Directory the build artifacts are written to and read from
    #[arg(short, long, env = "MOVIE_RECS_ARTIFACT_DIR", default_value = "artifacts")]
    artifact_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the similarity model from the raw CSV files
    Build {
        /// Keep only the N most popular movies
        #[arg(long, env = "MOVIE_RECS_CORPUS_LIMIT", default_value_t = DEFAULT_CORPUS_LIMIT)]
        corpus_limit: usize,

        /// Keep every joined movie, ignoring --corpus-limit
        #[arg(long)]
        no_limit: bool,

        /// Vocabulary size
        #[arg(long, default_value_t = DEFAULT_MAX_FEATURES)]
        max_features: usize,

        /// Cast members kept per movie
        #[arg(long, default_value_t = DEFAULT_CAST_LIMIT)]
        cast_limit: usize,
    },

    #[command(flatten)]
    Query(QueryCommand),
}

/// Commands that read an already built model
#[derive(Subcommand)]
enum QueryCommand {
    /// Search for movies by title
    Search {
        /// Exact (case-insensitive) or substring title query
        #[arg(long)]
        query: String,
    },

    /// Get movies similar to a title
    Recommend {
        /// Movie title to get recommendations for
        #[arg(long)]
        title: String,

        /// Number of recommendations to return
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,
    },

    /// Interactive prompt: type a title, get recommendations
    Repl {
        /// Number of recommendations to return
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "1000")]
        requests: usize,

        /// Number of concurrent workers
        #[arg(long, default_value = "4")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let store = FsArtifactStore::new(&cli.artifact_dir);

    match cli.command {
        Commands::Build {
            corpus_limit,
            no_limit,
            max_features,
            cast_limit,
        } => {
            let limit = (!no_limit).then_some(corpus_limit);
            handle_build(&cli.data_dir, &store, limit, max_features, cast_limit)
        }
        Commands::Query(command) => {
            let recommender = Arc::new(load_model(&store)?);
            run_query(recommender, command).await
        }
    }
}

/// Load the frozen artifacts every query command reads
fn load_model(store: &FsArtifactStore) -> Result<Recommender> {
    let start = Instant::now();
    let recommender = load_recommender(store).with_context(|| {
        format!(
            "No usable model in {}; run `movie-recs build` first",
            store.dir().display()
        )
    })?;
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        recommender.catalog().len(),
        start.elapsed()
    );
    Ok(recommender)
}

async fn run_query(recommender: Arc<Recommender>, command: QueryCommand) -> Result<()> {
    match command {
        QueryCommand::Search { query } => handle_search(&recommender, &query),
        QueryCommand::Recommend { title, top_n } => handle_recommend(&recommender, &title, top_n)?,
        QueryCommand::Repl { top_n } => handle_repl(&recommender, top_n)?,
        QueryCommand::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(recommender, requests, concurrent).await?,
    }
    Ok(())
}

/// Handle the 'build' command
fn handle_build(
    data_dir: &Path,
    store: &FsArtifactStore,
    limit: Option<usize>,
    max_features: usize,
    cast_limit: usize,
) -> Result<()> {
    println!("Loading TMDB dataset from {}...", data_dir.display());
    let start = Instant::now();
    let catalog = RawCatalog::load_from_files(data_dir)
        .context("Failed to load TMDB dataset")?
        .truncate_by_popularity(limit);
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        catalog.len(),
        start.elapsed()
    );

    let pipeline = BuildPipeline::new()
        .with_max_features(max_features)
        .with_cast_limit(cast_limit);
    let start = Instant::now();
    let recommender = build_and_save(&pipeline, catalog.records(), store)?;
    info!("Artifacts written to {}", store.dir().display());

    println!(
        "{} Built model for {} movies in {:?}",
        "✓".green(),
        recommender.catalog().len(),
        start.elapsed()
    );
    Ok(())
}

/// Handle the 'search' command
fn handle_search(recommender: &Recommender, query: &str) {
    let matches = recommender.search_movies(query);
    if matches.is_empty() {
        println!("{}", format!("No movies match '{}'", query).yellow());
        return;
    }

    println!("{}", format!("Search results for '{}':", query).bold().blue());
    for title in &matches {
        println!("  - {}", title);
    }
}

/// Handle the 'recommend' command
fn handle_recommend(recommender: &Recommender, query: &str, top_n: usize) -> Result<()> {
    let title = match resolve_title(recommender, query) {
        Resolution::Resolved(title) => title,
        Resolution::NotFound => return Err(anyhow!("Movie '{}' not found", query)),
        Resolution::Ambiguous(candidates) => {
            print_suggestions(&candidates);
            return Err(anyhow!("'{}' matches several movies, be more specific", query));
        }
    };

    let recommendations = recommender.recommend(&title, top_n)?;
    print_recommendations(&title, &recommendations);
    Ok(())
}

/// Handle the 'repl' command
fn handle_repl(recommender: &Recommender, top_n: usize) -> Result<()> {
    println!("Type a movie title, or 'exit' to quit.");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{} ", ">".bold().cyan());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let query = line?;
        let query = query.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("exit") {
            break;
        }

        // Errors are reported and the loop goes on
        if let Err(e) = handle_recommend(recommender, query, top_n) {
            println!("{} {}", "✗".red(), e);
        }
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    recommender: Arc<Recommender>,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    let titles: Vec<String> = recommender.catalog().titles().map(str::to_string).collect();
    if titles.is_empty() {
        return Err(anyhow!("Catalog is empty, nothing to benchmark"));
    }

    // Random catalog titles, split across the workers
    let queries: Vec<String> = (0..requests)
        .map(|_| titles[rand::random::<u32>() as usize % titles.len()].clone())
        .collect();
    let workers = concurrent.max(1);
    let chunk_size = queries.len().div_ceil(workers).max(1);

    let start = Instant::now();
    let mut handles = vec![];
    for chunk in queries.chunks(chunk_size) {
        let recommender = recommender.clone();
        let chunk = chunk.to_vec();
        let handle = tokio::task::spawn_blocking(move || {
            let mut timings = Vec::with_capacity(chunk.len());
            for title in chunk {
                let started = Instant::now();
                recommender.recommend(&title, DEFAULT_TOP_N)?;
                timings.push(started.elapsed());
            }
            Ok::<_, anyhow::Error>(timings)
        });
        handles.push(handle);
    }

    // Wait for all tasks to complete and collect timings
    let mut timings: Vec<Duration> = vec![];
    for handle in handles {
        timings.extend(handle.await??);
    }
    let total_time = start.elapsed();

    if timings.is_empty() {
        println!("No requests made");
        return Ok(());
    }
    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let avg_latency = timings.iter().sum::<Duration>() / timings.len() as u32;
    let throughput = timings.len() as f32 / total_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} workers)", timings.len(), workers);
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

fn print_suggestions(candidates: &[String]) {
    println!("{}", "Multiple matches found. Did you mean:".yellow());
    for title in suggestions(candidates) {
        println!("  - {}", title);
    }
}

/// Helper function to format and print recommendations
fn print_recommendations(title: &str, recommendations: &[String]) {
    println!("{}", format!("Movies similar to '{}':", title).bold().blue());
    if recommendations.is_empty() {
        println!("  (catalog has no other movies)");
    }
    for (rank, movie) in recommendations.iter().enumerate() {
        println!("{}. {}", (rank + 1).to_string().green(), movie);
    }
}
