//! Evaluation CLI: score a word-vector model against a category file with
//! top-k and odd-one-out accuracy.

use clap::Parser;
use embeval::{
    odd_one_out, topk, Config, EvalReport, KeyedVectors, OddOneOutOptions, TopkOptions,
};
use std::path::PathBuf;

/// Which metrics to run.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum Metric {
    Topk,
    OddOneOut,
    All,
}

/// Intrinsic evaluation of word embeddings.
#[derive(Parser, Debug)]
#[command(name = "eval")]
struct Args {
    /// Word vectors in word2vec text format.
    #[arg(long)]
    vectors: PathBuf,

    /// Category test-set file.
    #[arg(long)]
    categories: PathBuf,

    /// Metric to run.
    #[arg(long, value_enum, default_value = "all")]
    metric: Metric,

    /// Neighbors per word for top-k (default from config).
    #[arg(long)]
    k: Option<usize>,

    /// In-group size for odd-one-out (default from config).
    #[arg(long)]
    k_in: Option<usize>,

    /// Comparisons per category for odd-one-out (default from config).
    #[arg(long)]
    sample_size: Option<usize>,

    /// Sample out-words from this many top-frequency vocabulary entries.
    #[arg(long)]
    restrict_vocab: Option<usize>,

    /// Allow out-of-vocabulary test words; they are marked wrong instead of
    /// aborting the run.
    #[arg(long)]
    allow_oov: bool,

    /// Odd-one-out sampling seed (default from config).
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    let args = Args::parse();
    let config = Config::load()?;

    let model = KeyedVectors::from_word2vec_text(&args.vectors)?;
    println!(
        "Loaded {} vectors of dimension {} from {}",
        model.len(),
        model.dim(),
        args.vectors.display()
    );

    let allow_oov = args.allow_oov || config.eval.allow_oov;

    if matches!(args.metric, Metric::Topk | Metric::All) {
        let opts = TopkOptions {
            k: args.k.unwrap_or(config.eval.k),
            allow_oov,
        };
        let report = topk(&args.categories, &model, &opts)?;
        print_report(&format!("Top-{} Results", opts.k), &report);
    }

    if matches!(args.metric, Metric::OddOneOut | Metric::All) {
        let opts = OddOneOutOptions {
            k_in: args.k_in.unwrap_or(config.eval.k_in),
            sample_size: args.sample_size.unwrap_or(config.eval.sample_size),
            restrict_vocab: args.restrict_vocab.or(config.eval.restrict_vocab),
            allow_oov,
            seed: args.seed.unwrap_or(config.eval.seed),
        };
        let report = odd_one_out(&args.categories, &model, &opts)?;
        print_report("Odd-One-Out Results", &report);
    }

    Ok(())
}

fn print_report(title: &str, report: &EvalReport) {
    println!("\n=== {} ===", title);
    let mut labels: Vec<&String> = report.category_accuracy.keys().collect();
    labels.sort();
    for label in labels {
        println!(
            "  {} ({:.2}%, {} correct)",
            label.trim_start_matches(':'),
            report.category_accuracy[label] * 100.0,
            report.category_raw[label],
        );
    }
    println!("Accuracy: {:.4}", report.accuracy);
    println!("Correct:  {}", report.raw_correct);
    if !report.audit.oov.is_empty() {
        println!(
            "OOV:      {} of {} words ({:.2}%)",
            report.audit.oov.len(),
            report.audit.words_in_test,
            report.audit.ratio() * 100.0
        );
    }
    if !report.skipped.is_empty() {
        println!("Skipped:  {}", report.skipped.join(", "));
    }
}
