mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use config::AppConfig;
use data_loader::{Catalog, MovieRecord};
use encoder::CategoricalField;
use service::{FilterPipeline, MinimumRatingFilter, RecencyFilter, Recommendation, RecommendationService};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, info};

/// reel-similar - Content-Based Movie Recommendations
#[derive(Parser)]
#[command(name = "reel-similar")]
#[command(about = "Find movies similar to a title from genres, keywords, cast and studios", long_about = None)]
struct Cli {
    /// Movie catalog: `::`-separated `.dat` or a `.json` array
    #[arg(short, long, env = "REEL_DATA_FILE", default_value = "data/movies.dat")]
    data_file: PathBuf,

    /// JSON configuration file (encoder weights, tokenization, default k)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies similar to a title
    Recommend {
        /// Exact, case-sensitive movie title
        #[arg(long)]
        title: String,

        /// Number of recommendations (defaults to `default_k` from the config)
        #[arg(short, long)]
        k: Option<usize>,

        /// Show the metadata each recommendation shares with the title
        #[arg(long)]
        explain: bool,

        /// Only recommend movies with at least this vote average
        #[arg(long)]
        min_rating: Option<f32>,

        /// Only recommend movies with at least this many votes
        #[arg(long)]
        min_votes: Option<u32>,

        /// Only recommend movies released within this many years of the title
        #[arg(long)]
        year_window: Option<u16>,
    },

    /// Search for movies by title
    Search {
        /// Case-insensitive substring of the title
        #[arg(long)]
        title: String,

        /// Maximum number of results
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show catalog and feature space statistics
    Info,

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
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
    let config = AppConfig::load(cli.config.as_deref())?;
    info!(
        "Configuration: default_k={}, numeric weight={}",
        config.default_k, config.encoder.numeric.weight
    );

    println!("Loading catalog from {}...", cli.data_file.display());
    let start = Instant::now();
    let catalog = Catalog::load_from_file(&cli.data_file).context("Failed to load movie catalog")?;
    let movies = catalog.len();
    let service = Arc::new(
        RecommendationService::new(catalog, config.encoder.clone()).context("Failed to encode movie catalog")?,
    );
    println!("{} Loaded and encoded {} movies in {:?}", "✓".green(), movies, start.elapsed());

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            title,
            k,
            explain,
            min_rating,
            min_votes,
            year_window,
        } => {
            let pipeline = build_pipeline(min_rating, min_votes, year_window);
            handle_recommend(&service, &title, k.unwrap_or(config.default_k), explain, &pipeline)?
        }
        Commands::Search { title, limit } => handle_search(&service, &title, limit),
        Commands::Info => handle_info(&service),
        Commands::Benchmark { requests, concurrent } => {
            handle_benchmark(service, requests, concurrent, config.default_k).await?
        }
    }

    Ok(())
}

fn build_pipeline(min_rating: Option<f32>, min_votes: Option<u32>, year_window: Option<u16>) -> FilterPipeline {
    let mut pipeline = FilterPipeline::new();
    if min_rating.is_some() || min_votes.is_some() {
        pipeline = pipeline.add_filter(MinimumRatingFilter::new(
            min_rating.unwrap_or(0.0),
            min_votes.unwrap_or(0),
        ));
    }
    if let Some(years) = year_window {
        pipeline = pipeline.add_filter(RecencyFilter::new(years));
    }
    pipeline
}

/// Handle the 'recommend' command
fn handle_recommend(
    service: &RecommendationService,
    title: &str,
    k: usize,
    explain: bool,
    pipeline: &FilterPipeline,
) -> Result<()> {
    let recommendations = if pipeline.is_empty() {
        service.recommend_scored(title, k)
    } else {
        service.recommend_filtered(title, k, pipeline)
    }
    .with_context(|| format!("No recommendations for '{}'", title))?;

    let snapshot = service.snapshot();
    let query_index = service.resolve(title)?;
    println!("{}", format!("Movies similar to '{}':", title).bold().blue());
    if recommendations.is_empty() {
        println!("  (no candidates left after filtering)");
    }
    for (rank, rec) in recommendations.iter().enumerate() {
        print_recommendation(rank + 1, rec, snapshot.catalog().get(rec.index));

        if explain {
            let explanation = service.explain_indices(query_index, rec.index)?;
            if explanation.shared.is_empty() {
                println!("   {}", "nothing shared; ranked by numeric attributes or catalog order".dimmed());
            }
            for (field, tokens) in &explanation.shared {
                println!("   {} {}: {}", "•".cyan(), field, tokens.join(", "));
            }
        }
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(service: &RecommendationService, title: &str, limit: usize) {
    let snapshot = service.snapshot();
    let matches = service.search_indices(title);

    println!(
        "{}",
        format!("Search results for '{}' ({} matches):", title, matches.len()).bold().blue()
    );
    for idx in matches.into_iter().take(limit) {
        if let Some(movie) = snapshot.catalog().get(idx) {
            println!(
                "{}: {}{} [{}] {}",
                idx,
                movie.title,
                year_suffix(movie),
                movie.genres.replace('|', ", "),
                rating_summary(movie)
            );
        }
    }
}

/// Handle the 'info' command
fn handle_info(service: &RecommendationService) {
    let snapshot = service.snapshot();
    let catalog = snapshot.catalog();
    let matrix = snapshot.matrix();

    println!("{}", "Catalog:".bold().blue());
    println!("{}Movies: {}", "• ".green(), catalog.len());
    println!("{}Distinct titles: {}", "• ".green(), catalog.distinct_titles());

    println!("{}", "Feature space:".bold().blue());
    println!("{}Dimensions: {}", "• ".cyan(), matrix.dim());
    for field in CategoricalField::ALL {
        println!(
            "{}{} vocabulary: {} terms",
            "• ".cyan(),
            field,
            matrix.vocabulary(field).len()
        );
    }
    let numeric = &service.encoder().config().numeric;
    if numeric.is_enabled() {
        println!(
            "{}Numeric block: {} dims, {:?} scaling, weight {}",
            "• ".cyan(),
            matrix.layout().numeric_span().len,
            numeric.scaling,
            numeric.weight
        );
    } else {
        println!("{}Numeric block: disabled", "• ".cyan());
    }

    let empty_rows = matrix.iter().filter(|row| row.is_zero()).count();
    let avg_nnz = matrix.iter().map(|row| row.nnz()).sum::<usize>() as f64 / matrix.len().max(1) as f64;
    println!("{}Average non-zeros per movie: {:.1}", "• ".cyan(), avg_nnz);
    println!("{}Movies without usable metadata: {}", "• ".cyan(), empty_rows);
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    service: Arc<RecommendationService>,
    requests: usize,
    concurrent: usize,
    k: usize,
) -> Result<()> {
    if requests == 0 || concurrent == 0 {
        bail!("--requests and --concurrent must both be at least 1");
    }

    // Random query titles from the catalog
    let snapshot = service.snapshot();
    let titles: Vec<String> = (0..requests)
        .map(|_| {
            let idx = rand::random_range(0..snapshot.len());
            snapshot.catalog().records()[idx].title.clone()
        })
        .collect();
    drop(snapshot);

    debug!("Benchmarking {} requests, {} concurrent", requests, concurrent);

    // Ranking is CPU-bound: run it on the blocking pool, at most
    // `concurrent` at a time
    let semaphore = Arc::new(Semaphore::new(concurrent));
    let wall_clock = Instant::now();
    let mut handles = Vec::with_capacity(requests);
    for title in titles {
        let service = Arc::clone(&service);
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let start = Instant::now();
            service.recommend(&title, k)?;
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    let mut timings = Vec::with_capacity(handles.len());
    for handle in handles {
        timings.push(handle.await??);
    }
    let wall_time = wall_clock.elapsed();

    timings.sort();
    let total: Duration = timings.iter().sum();
    let avg_latency = total / timings.len() as u32;
    let throughput = timings.len() as f64 / wall_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent, k = {})", timings.len(), concurrent, k);
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(&timings, 0.50));
    println!("P95 latency: {:?}", percentile(&timings, 0.95));
    println!("P99 latency: {:?}", percentile(&timings, 0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Nearest-rank percentile of sorted, non-empty timings
fn percentile(sorted: &[Duration], p: f64) -> Duration {
    let rank = (sorted.len() as f64 * p).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

fn print_recommendation(rank: usize, rec: &Recommendation, movie: Option<&MovieRecord>) {
    let (year, genres) = movie
        .map(|m| (year_suffix(m), m.genres.replace('|', ", ")))
        .unwrap_or_default();
    println!(
        "{}. {}{} [{}] - Score: {:.3}",
        rank.to_string().green(),
        rec.title,
        year,
        genres,
        rec.score
    );
}

fn year_suffix(movie: &MovieRecord) -> String {
    movie
        .release_year()
        .map(|year| format!(" ({})", year))
        .unwrap_or_default()
}

fn rating_summary(movie: &MovieRecord) -> String {
    match (movie.vote_average, movie.vote_count) {
        (Some(average), Some(count)) => format!("avg {:.1} ({} votes)", average, count),
        _ => "unrated".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile() {
        let timings: Vec<Duration> = (1..=100).map(Duration::from_millis).collect();

        assert_eq!(percentile(&timings, 0.50), Duration::from_millis(50));
        assert_eq!(percentile(&timings, 0.99), Duration::from_millis(99));
        assert_eq!(percentile(&timings[..1], 0.95), Duration::from_millis(1));
    }

    #[test]
    fn test_build_pipeline() {
        assert!(build_pipeline(None, None, None).is_empty());
        assert_eq!(
            build_pipeline(Some(6.0), Some(100), Some(10)).names(),
            vec!["MinimumRatingFilter", "RecencyFilter"]
        );
        assert_eq!(build_pipeline(None, Some(500), None).names(), vec!["MinimumRatingFilter"]);
    }

    #[test]
    fn test_cli_parses_recommend() {
        let cli = Cli::try_parse_from([
            "reel-similar",
            "--data-file",
            "movies.json",
            "recommend",
            "--title",
            "Heat",
            "-k",
            "3",
            "--year-window",
            "15",
            "--min-votes",
            "200",
        ])
        .unwrap();

        assert_eq!(cli.data_file, PathBuf::from("movies.json"));
        match cli.command {
            Commands::Recommend {
                title,
                k,
                year_window,
                min_rating,
                min_votes,
                ..
            } => {
                assert_eq!(title, "Heat");
                assert_eq!(k, Some(3));
                assert_eq!(year_window, Some(15));
                assert_eq!(min_rating, None);
                assert_eq!(min_votes, Some(200));
            }
            _ => panic!("expected recommend"),
        }
    }
}
