use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::warn;

use prose_lens_lib::models::{HumanizeOptions, Metric, RewriteResult, TextAnalysis};
use prose_lens_lib::services::config_store::{AppConfig, ConfigStore};
use prose_lens_lib::{analyze_with_config, humanize_with_config, init_logging};

/// proseLens - heuristic AI-likeness scoring and rule-based rewriting
#[derive(Parser, Debug)]
#[command(name = "proseLens")]
#[command(
    version,
    about = "Score Spanish or English prose for machine-like traits and rewrite it to read more naturally",
    after_help = "\
Examples:
  proseLens analyze essay.txt             Human-readable report
  proseLens analyze a.txt b.txt --json    One JSON document per file
  cat essay.txt | proseLens humanize      Rewrite stdin
  proseLens humanize essay.txt --seed 7   Reproducible rewrite
  proseLens config --init                 Write the default config file"
)]
struct Cli {
    /// Configuration directory (default: the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score text for AI-likeness, overall and per sentence
    Analyze {
        /// Files to analyze (default: read stdin)
        files: Vec<PathBuf>,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rewrite machine-like sentences according to their scores
    Humanize {
        /// File to rewrite (default: read stdin)
        file: Option<PathBuf>,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Print the rewrite result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

fn config_store(dir: Option<&Path>) -> Option<ConfigStore> {
    match dir {
        Some(dir) => Some(ConfigStore::new(dir.to_path_buf())),
        None => match ConfigStore::open_default() {
            Ok(store) => Some(store),
            Err(e) => {
                warn!("Using built-in defaults: {}", e);
                None
            }
        },
    }
}

fn load_config(store: Option<&ConfigStore>) -> Result<AppConfig> {
    match store {
        Some(store) => store
            .load()
            .with_context(|| format!("failed to load {}", store.config_file().display())),
        None => Ok(AppConfig::default()),
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn preview(s: &str, max_chars: usize) -> String {
    let mut out: String = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        out.push_str("...");
    }
    out.replace('\n', " ")
}

fn print_analysis(source: &str, analysis: &TextAnalysis) {
    println!("== {} ==", source);
    println!(
        "AI-likeness: {:.0}/100 ({})",
        analysis.overall.ai_probability,
        analysis.overall.label.as_str()
    );
    println!(
        "Language: {}  Words: {}  Sentences: {}",
        analysis.language.code(),
        analysis.word_count,
        analysis.sentence_count
    );
    if analysis.low_confidence {
        println!("Note: text is short; scores are low confidence.");
    }
    println!();

    for metric in Metric::ALL {
        if let Some(value) = analysis.overall.metrics.get(metric) {
            println!("  {:<22} {:>5.0}", metric.name(), value);
        }
    }
    println!();

    for sentence in &analysis.sentences {
        println!(
            "[S{:03}] {:>3.0} {:<7} {}",
            sentence.index + 1,
            sentence.result.ai_probability,
            sentence.highlight.as_str(),
            preview(&sentence.text, 100)
        );
    }
    println!();

    println!("{}", analysis.explanations.summary);
    for tip in &analysis.explanations.recommendations {
        println!("  - {}", tip);
    }
    println!();
}

fn print_rewrite(result: &RewriteResult) {
    println!("{}", result.text);
    println!();
    println!("Changes:");
    for change in &result.changes {
        println!("  - {}", change);
    }
    if let Some(seed) = result.seed {
        println!("Seed: {}", seed);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let store = config_store(cli.config.as_deref());
    let config = load_config(store.as_ref())?;

    match cli.command {
        Commands::Analyze { files, json } => {
            let inputs: Vec<(String, String)> = if files.is_empty() {
                vec![("<stdin>".to_string(), read_input(None)?)]
            } else {
                files
                    .iter()
                    .map(|path| -> Result<(String, String)> {
                        Ok((path.display().to_string(), read_input(Some(path))?))
                    })
                    .collect::<Result<_>>()?
            };

            for (source, text) in inputs {
                let analysis =
                    analyze_with_config(&text, &config.analysis).with_context(|| format!("cannot analyze {}", source))?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&analysis)?);
                } else {
                    print_analysis(&source, &analysis);
                }
            }
        }
        Commands::Humanize { file, seed, json } => {
            let text = read_input(file.as_deref())?;
            let analysis = analyze_with_config(&text, &config.analysis)?;
            let options = HumanizeOptions { seed };
            let result = humanize_with_config(&text, &analysis, &options, &config.humanizer)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_rewrite(&result);
            }
        }
        Commands::Config { init } => {
            if init {
                let store = store.context("no configuration directory available; pass --config")?;
                store.save(&config)?;
                println!("Wrote {}", store.config_file().display());
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
