//! @ai:module:intent CLI for the function-call completion benchmark
//! @ai:module:layer presentation

use anyhow::Result;
use callbench::{
    config::BenchConfig,
    corpus::{AnalysisLoader, BudgetFilter, BuildStats, CorpusBuilder, CorpusSampler},
    evaluator::{Evaluator, FileComparison},
    report::{ComparisonResults, ReportGenerator},
    runner::{GeneratorTrait, HttpGenerator, MockGenerator, PredictionExecutor},
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "callbench")]
#[command(about = "Function-call completion benchmark for code models")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the benchmark corpus from static-analysis output
    Build {
        /// Directory of per-project analysis .json files
        #[arg(short = 'i', long)]
        analysis_dir: PathBuf,

        /// Output corpus file (.jsonl)
        #[arg(short, long)]
        output: PathBuf,

        /// Maximum completions sampled per function
        #[arg(short, long)]
        max_completions_per_function: Option<usize>,

        /// Fraction of a function's calls to sample
        #[arg(short = 'p', long)]
        completion_probability: Option<f64>,

        /// Random seed for sampling
        #[arg(short, long)]
        seed: Option<u64>,

        /// Overwrite an existing output file
        #[arg(short, long)]
        force: bool,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate predictions for every corpus record
    Predict {
        /// Corpus file produced by `build`
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for <model>.jsonl prediction files
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Models to run (comma-separated), all configured models by default
        #[arg(short, long)]
        models: Option<String>,

        /// Prefix each input with the project's available signatures
        #[arg(short, long)]
        signatures: bool,

        /// Overwrite existing prediction files
        #[arg(short, long)]
        force: bool,

        /// Run without calling any generation service
        #[arg(long)]
        dry_run: bool,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Compare predictions made with and without signatures
    Evaluate {
        /// Prediction directory of the run with signatures
        #[arg(long)]
        with_signatures: PathBuf,

        /// Prediction directory of the run without signatures
        #[arg(long)]
        without_signatures: PathBuf,

        /// Also write results.json and results.md here
        #[arg(short, long)]
        report_dir: Option<PathBuf>,
    },

    /// Render results.md from a saved results.json
    Report {
        /// Path to results.json
        #[arg(short, long)]
        results: PathBuf,

        /// Output Markdown file
        #[arg(short, long, default_value = "results.md")]
        output: PathBuf,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "callbench.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("callbench=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            analysis_dir,
            output,
            max_completions_per_function,
            completion_probability,
            seed,
            force,
            config,
        } => build_corpus(BuildArgs {
            analysis_dir,
            output,
            max_completions_per_function,
            completion_probability,
            seed,
            force,
            config,
        }),
        Commands::Predict {
            input,
            output_dir,
            models,
            signatures,
            force,
            dry_run,
            config,
        } => {
            run_predictions(PredictArgs {
                input,
                output_dir,
                models,
                signatures,
                force,
                dry_run,
                config,
            })
            .await
        }
        Commands::Evaluate {
            with_signatures,
            without_signatures,
            report_dir,
        } => evaluate(with_signatures, without_signatures, report_dir),
        Commands::Report { results, output } => render_report(results, output),
        Commands::Init { output } => init_config(output),
    }
}

struct BuildArgs {
    analysis_dir: PathBuf,
    output: PathBuf,
    max_completions_per_function: Option<usize>,
    completion_probability: Option<f64>,
    seed: Option<u64>,
    force: bool,
    config: Option<PathBuf>,
}

struct PredictArgs {
    input: PathBuf,
    output_dir: PathBuf,
    models: Option<String>,
    signatures: bool,
    force: bool,
    dry_run: bool,
    config: Option<PathBuf>,
}

/// @ai:intent Build the corpus file
/// @ai:effects fs:read, fs:write
fn build_corpus(args: BuildArgs) -> Result<()> {
    let mut config = load_or_default_config(args.config)?;

    if let Some(max) = args.max_completions_per_function {
        config.corpus.max_completions_per_function = max;
    }
    if let Some(p) = args.completion_probability {
        config.corpus.completion_probability = p;
    }
    if let Some(seed) = args.seed {
        config.corpus.seed = seed;
    }
    config.corpus.validate()?;

    let budgets = BudgetFilter::from_configs(&config.budgets)?;
    let sampler = CorpusSampler::from_config(&config.corpus);
    let mut builder = CorpusBuilder::new(sampler, budgets);

    let stats = builder.build(&AnalysisLoader::new(), &args.analysis_dir, &args.output, args.force)?;

    print_build_stats(&stats, &args.output);
    Ok(())
}

/// @ai:intent Run every selected model over the corpus
/// @ai:effects network, fs:read, fs:write
async fn run_predictions(args: PredictArgs) -> Result<()> {
    let config = load_or_default_config(args.config.clone())?;
    let names = parse_model_list(args.models.as_deref());
    let models = config.select_models(names.as_deref())?;

    if models.is_empty() {
        anyhow::bail!("No models configured. Add [[models]] entries to the configuration file.");
    }

    for model in models {
        if args.dry_run {
            let generator = Arc::new(MockGenerator::new(model.name.clone(), ""));
            predict_with(generator, &args).await?;
        } else {
            let generator = Arc::new(HttpGenerator::new(model)?);
            predict_with(generator, &args).await?;
        }
    }

    Ok(())
}

/// @ai:intent Split a comma-separated model list, dropping blanks
/// @ai:effects pure
fn parse_model_list(models: Option<&str>) -> Option<Vec<String>> {
    models.map(|s| {
        s.split(',')
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect()
    })
}

/// @ai:intent Run one generator and report where its predictions went
/// @ai:effects network, fs:write
async fn predict_with<G: GeneratorTrait>(generator: Arc<G>, args: &PredictArgs) -> Result<()> {
    let executor = PredictionExecutor::new(generator, args.signatures);
    let summary = executor.run(&args.input, &args.output_dir, args.force).await?;

    println!(
        "{}: {} predictions written to {} ({:.1}s)",
        summary.model,
        summary.records,
        summary.output.display(),
        summary.execution_time_ms as f64 / 1000.0
    );
    Ok(())
}

/// @ai:intent Compare the two prediction directories and print the results
/// @ai:effects fs:read, fs:write
fn evaluate(with_signatures: PathBuf, without_signatures: PathBuf, report_dir: Option<PathBuf>) -> Result<()> {
    let evaluator = Evaluator::new();
    let files = evaluator.compare_directories(&with_signatures, &without_signatures)?;

    for file in &files {
        print_comparison(file);
    }

    if let Some(dir) = report_dir {
        let results = ComparisonResults::new(&with_signatures, &without_signatures, files);
        ReportGenerator::new().generate_all(&results, &dir)?;
        println!("Reports generated in {}", dir.display());
    }

    Ok(())
}

/// @ai:intent Re-render the Markdown report from saved results
/// @ai:effects fs:read, fs:write
fn render_report(results_path: PathBuf, output: PathBuf) -> Result<()> {
    let results = ReportGenerator::new().render_markdown(&results_path, &output)?;
    println!(
        "Report for {} files written to {}",
        results.files.len(),
        output.display()
    );
    Ok(())
}

/// @ai:intent Initialize default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = BenchConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<BenchConfig> {
    match path {
        Some(p) => Ok(BenchConfig::load(&p)?),
        None => {
            let default_path = PathBuf::from("callbench.toml");

            if default_path.exists() {
                Ok(BenchConfig::load(&default_path)?)
            } else {
                Ok(BenchConfig::default())
            }
        }
    }
}

/// @ai:intent Print build counters to console
/// @ai:effects io
fn print_build_stats(stats: &BuildStats, output: &Path) {
    println!();
    println!("Corpus Build");
    println!("============");
    println!();
    println!("{:<30} {:>10}", "Analysis files:", stats.analysis_files);
    println!("{:<30} {:>10}", "Skipped documents:", stats.skipped_documents);
    println!("{:<30} {:>10}", "Projects:", stats.projects);
    println!("{:<30} {:>10}", "Functions:", stats.functions);
    println!("{:<30} {:>10}", "Call occurrences:", stats.occurrences);
    println!("{:<30} {:>10}", "Sampled:", stats.sampled);
    println!("{:<30} {:>10}", "Rejected by token budget:", stats.rejected_by_budget);
    println!("{}", "-".repeat(41));
    println!("{:<30} {:>10}", "Records written:", stats.records_written);
    println!();
    println!("Corpus saved to {}", output.display());
}

/// @ai:intent Print one file's significance report to console
/// @ai:effects io
fn print_comparison(file: &FileComparison) {
    let comparison = &file.comparison;

    println!();
    println!("{}", file.file);
    println!("{}", "=".repeat(file.file.len()));
    println!(
        "Valid results: {} with signatures, {} without signatures, {} paired",
        comparison.with_signatures_valid, comparison.without_signatures_valid, comparison.paired
    );
    println!();
    println!(
        "{:<16} {:<16} {:>8} {:>8} {:>10} {:>10}",
        "", "", "With", "Without", "p", "Cliff's d"
    );
    println!("{}", "-".repeat(72));

    for metric in &comparison.metrics {
        let effect = metric
            .effect_size
            .map(|d| format!("d = {:.3}", d))
            .unwrap_or_default();

        println!(
            "{:<16} {:<16} {:>8.2} {:>8.2} {:>10} {:>10}",
            metric.granularity.as_str(),
            metric.metric.as_str(),
            metric.with_signatures_mean,
            metric.without_signatures_mean,
            format!("p = {:.3}", metric.test.p_value),
            effect
        );
    }
    println!();
}
