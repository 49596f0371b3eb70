use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use data_loader::{ballots, load_records, PreferenceStore, RatingRecord, RecordFormat};
use evaluation::{CrossValidator, EvaluationConfig, EvaluationReport, MissingPrediction};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use recommender::{
    recommend, recommend_items, top_matches, ItemSimilarityIndex, Scored, SimilarityMetric,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// collab-filter - collaborative filtering over sparse ratings
#[derive(Parser)]
#[command(name = "collab-filter")]
#[command(about = "Predict unobserved ratings and cross-validate the predictions", long_about = None)]
struct Cli {
    /// Rating file to load; repeat the flag for several files
    #[arg(short, long, required = true, action = ArgAction::Append)]
    records: Vec<PathBuf>,

    /// Layout of the rating files
    #[arg(short, long, value_enum, default_value = "json")]
    format: InputFormat,

    /// Shuffle the records with this seed before use
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum InputFormat {
    /// JSON array of {actor_id, item_id, rating}
    Json,
    /// One JSON record per line
    Jsonl,
    /// actor::item::rating lines
    Delimited,
    /// Roll-call ballot documents
    Ballots,
}

#[derive(Clone, Copy, ValueEnum)]
enum Metric {
    Pearson,
    Euclidean,
}

impl From<Metric> for SimilarityMetric {
    fn from(metric: Metric) -> Self {
        match metric {
            Metric::Pearson => SimilarityMetric::Pearson,
            Metric::Euclidean => SimilarityMetric::Euclidean,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Weighted ratings of similar actors
    User,
    /// Weighted own ratings of similar items
    Item,
}

#[derive(Clone, Copy, ValueEnum)]
enum Axis {
    Actor,
    Item,
}

#[derive(Clone, Copy, ValueEnum)]
enum Missing {
    Skip,
    ActorMean,
    Constant,
}

#[derive(Subcommand)]
enum Commands {
    /// K-fold cross-validation of item-based predictions
    Evaluate {
        /// Share of the records held out per fold
        #[arg(long, default_value = "0.1")]
        fraction: f64,

        /// Similar items kept per item
        #[arg(long, default_value = "10")]
        neighbors: usize,

        /// What to do with held-out items that get no prediction
        #[arg(long, value_enum, default_value = "skip")]
        missing: Missing,

        /// Prediction used with `--missing constant`
        #[arg(long)]
        constant: Option<f64>,

        /// Evaluate folds in parallel
        #[arg(long)]
        parallel: bool,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Predict ratings for an actor's unrated items
    Recommend {
        /// Actor to recommend for
        #[arg(long)]
        actor: String,

        #[arg(long, value_enum, default_value = "item")]
        mode: Mode,

        /// Similarity metric for user-based mode
        #[arg(long, value_enum, default_value = "pearson")]
        metric: Metric,

        /// Similar items kept per item in item-based mode
        #[arg(long, default_value = "10")]
        neighbors: usize,

        /// Saved item similarity index to use instead of building one
        #[arg(long)]
        index: Option<PathBuf>,

        /// Number of recommendations to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show the actors or items most similar to one id
    Similar {
        /// Actor or item id
        #[arg(long)]
        id: String,

        #[arg(long, value_enum, default_value = "actor")]
        axis: Axis,

        #[arg(long, value_enum, default_value = "pearson")]
        metric: Metric,

        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// Build the item similarity index and save it as JSON
    Index {
        /// Similar items kept per item
        #[arg(long, default_value = "10")]
        neighbors: usize,

        /// Where to write the index
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show record, actor and item counts
    Stats,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let start = Instant::now();
    let records = load(&cli).context("Failed to load rating records")?;
    println!(
        "{} Loaded {} records in {:?}",
        "✓".green(),
        records.len(),
        start.elapsed()
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Evaluate {
            fraction,
            neighbors,
            missing,
            constant,
            parallel,
            json,
        } => {
            let policy = missing_policy(missing, constant)?;
            let config = EvaluationConfig::new(fraction)
                .with_neighbors(neighbors)
                .with_missing_prediction(policy)
                .with_parallel(parallel);
            handle_evaluate(&records, config, json)?
        }
        Commands::Recommend {
            actor,
            mode,
            metric,
            neighbors,
            index,
            limit,
        } => {
            let options = RecommendOptions {
                mode,
                metric,
                neighbors,
                index,
                limit,
            };
            handle_recommend(&records, &actor, &options)?
        }
        Commands::Similar {
            id,
            axis,
            metric,
            limit,
        } => handle_similar(&records, &id, axis, metric, limit)?,
        Commands::Index { neighbors, output } => handle_index(&records, neighbors, &output)?,
        Commands::Stats => handle_stats(&records)?,
    }

    Ok(())
}

/// Read every input file, then shuffle if a seed was given
fn load(cli: &Cli) -> Result<Vec<RatingRecord>> {
    let mut records = match cli.format {
        InputFormat::Ballots => ballots::parse_ballots(&cli.records)?,
        InputFormat::Json | InputFormat::Jsonl | InputFormat::Delimited => {
            let format = match cli.format {
                InputFormat::Jsonl => RecordFormat::JsonLines,
                InputFormat::Delimited => RecordFormat::Delimited,
                _ => RecordFormat::JsonArray,
            };
            let mut records = Vec::new();
            for path in &cli.records {
                let loaded = load_records(path, format)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                info!("Read {} records from {}", loaded.len(), path.display());
                records.extend(loaded);
            }
            records
        }
    };

    if let Some(seed) = cli.seed {
        let mut rng = StdRng::seed_from_u64(seed);
        records.shuffle(&mut rng);
        info!("Shuffled records with seed {}", seed);
    }
    Ok(records)
}

fn missing_policy(missing: Missing, constant: Option<f64>) -> Result<MissingPrediction> {
    Ok(match missing {
        Missing::Skip => MissingPrediction::Skip,
        Missing::ActorMean => MissingPrediction::ActorMean,
        Missing::Constant => match constant {
            Some(value) => MissingPrediction::Constant(value),
            None => bail!("--missing constant requires --constant <VALUE>"),
        },
    })
}

/// Handle the 'evaluate' command
fn handle_evaluate(records: &[RatingRecord], config: EvaluationConfig, json: bool) -> Result<()> {
    let start = Instant::now();
    let validator = CrossValidator::new(config).context("Invalid evaluation settings")?;
    let report = validator
        .evaluate(records)
        .context("Cross-validation failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    println!("Finished in {:?}", start.elapsed());
    Ok(())
}

fn format_rmse(rmse: Option<f64>) -> String {
    rmse.map_or_else(|| "n/a".to_string(), |value| format!("{:.5}", value))
}

fn print_report(report: &EvaluationReport) {
    println!("{}", "Cross-validation results:".bold().blue());
    for fold in &report.folds {
        println!(
            "{} ({}:{}) rmse = {}  [{} predicted, {} defaulted, {} skipped]",
            format!("Segment {}", fold.fold + 1).green(),
            fold.start,
            fold.end,
            format_rmse(fold.rmse),
            fold.predicted,
            fold.defaulted,
            fold.skipped
        );
    }
    let per_fold: Vec<String> = report.rmses().into_iter().map(format_rmse).collect();
    println!("{}Per-fold RMSE: [{}]", "• ".cyan(), per_fold.join(", "));
    println!(
        "{}Mean RMSE: {} (std {})",
        "• ".cyan(),
        format_rmse(report.mean_rmse()),
        format_rmse(report.std_rmse())
    );
    if report.unscored_folds() > 0 {
        println!(
            "{}{} folds had no predictions and are left out of the mean",
            "• ".yellow(),
            report.unscored_folds()
        );
    }
    if report.total_skipped() > 0 {
        println!(
            "{}{} held-out records had no prediction and were left out",
            "• ".yellow(),
            report.total_skipped()
        );
    }
}

struct RecommendOptions {
    mode: Mode,
    metric: Metric,
    neighbors: usize,
    index: Option<PathBuf>,
    limit: usize,
}

/// Handle the 'recommend' command
fn handle_recommend(
    records: &[RatingRecord],
    actor: &str,
    options: &RecommendOptions,
) -> Result<()> {
    let store = PreferenceStore::from_records(records)?;
    if !store.contains(actor) {
        return Err(anyhow!("Actor {} not found", actor));
    }

    let recommendations = match options.mode {
        Mode::User => recommend(&store, actor, &SimilarityMetric::from(options.metric)),
        Mode::Item => {
            let index = match &options.index {
                Some(path) => load_index(path)?,
                None => {
                    if options.neighbors == 0 {
                        bail!("--neighbors must be at least 1");
                    }
                    ItemSimilarityIndex::build(&store, options.neighbors)
                }
            };
            recommend_items(&store, &index, actor)
        }
    };

    print_scored(&format!("Recommendations for {}:", actor), &recommendations, options.limit);
    Ok(())
}

/// Handle the 'index' command
fn handle_index(records: &[RatingRecord], neighbors: usize, output: &Path) -> Result<()> {
    if neighbors == 0 {
        bail!("--neighbors must be at least 1");
    }
    let store = PreferenceStore::from_records(records)?;

    let start = Instant::now();
    let index = ItemSimilarityIndex::build(&store, neighbors);
    println!(
        "{} Built index over {} items in {:?}",
        "✓".green(),
        index.len(),
        start.elapsed()
    );

    let json = serde_json::to_string(&index)?;
    fs::write(output, json)
        .with_context(|| format!("Failed to write index to {}", output.display()))?;
    println!("{}Saved to {}", "• ".cyan(), output.display());
    Ok(())
}

fn load_index(path: &Path) -> Result<ItemSimilarityIndex> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read index {}", path.display()))?;
    let index: ItemSimilarityIndex = serde_json::from_str(&json)
        .with_context(|| format!("{} is not a saved item index", path.display()))?;
    info!(
        "Loaded index over {} items, {} neighbours each",
        index.len(),
        index.neighbors_per_item()
    );
    Ok(index)
}

/// Handle the 'similar' command
fn handle_similar(
    records: &[RatingRecord],
    id: &str,
    axis: Axis,
    metric: Metric,
    limit: usize,
) -> Result<()> {
    let store = PreferenceStore::from_records(records)?;
    let store = match axis {
        Axis::Actor => store,
        Axis::Item => store.transpose(),
    };
    if !store.contains(id) {
        return Err(anyhow!("{} not found", id));
    }

    let matches = top_matches(&store, id, limit, &SimilarityMetric::from(metric));
    print_scored(&format!("Most similar to {}:", id), &matches, limit);
    Ok(())
}

/// Handle the 'stats' command
fn handle_stats(records: &[RatingRecord]) -> Result<()> {
    let store = PreferenceStore::from_records(records)?;
    let (actors, items, ratings) = store.counts();

    println!("{}", "Dataset:".bold().blue());
    println!("{}Records: {}", "• ".green(), records.len());
    println!("{}Actors: {}", "• ".green(), actors);
    println!("{}Items: {}", "• ".green(), items);
    println!("{}Distinct ratings: {}", "• ".green(), ratings);
    if let Some(mean) = store.global_mean() {
        println!("{}Mean rating: {:.3}", "• ".cyan(), mean);
    }
    if actors > 0 && items > 0 {
        let density = ratings as f64 / (actors as f64 * items as f64);
        println!("{}Density: {:.2}%", "• ".cyan(), density * 100.0);
    }
    Ok(())
}

fn print_scored(header: &str, entries: &[Scored], limit: usize) {
    println!("{}", header.bold().blue());
    if entries.is_empty() {
        println!("  (none)");
        return;
    }
    for (rank, entry) in entries.iter().take(limit).enumerate() {
        println!(
            "{}. {} - Score: {:.4}",
            (rank + 1).to_string().green(),
            entry.id,
            entry.score
        );
    }
}
