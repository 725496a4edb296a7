use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

use prose_lens_lib::models::Sentence;
use prose_lens_lib::services::sentence_segmenter::split_sentences;
use prose_lens_lib::services::text_processor::detect_language;

/// Print the sentence spans the analyzer works with
#[derive(Parser, Debug)]
#[command(name = "split_sentences")]
struct Args {
    /// Plain-text file to split
    path: PathBuf,

    /// Number of sentences to print
    #[arg(long, default_value = "50")]
    sentences: usize,

    /// Also write the sentences (with tokens) as JSON
    #[arg(long)]
    out: Option<PathBuf>,
}

fn preview(s: &str, max_chars: usize) -> String {
    let mut out: String = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        out.push_str("...");
    }
    out.replace('\n', " ")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let text = std::fs::read_to_string(&args.path)
        .with_context(|| format!("read file failed: {}", args.path.display()))?;
    let language = detect_language(&text);
    let sentences = split_sentences(&text);

    println!("File: {}", args.path.display());
    println!("Text: {} chars ({} bytes)", text.chars().count(), text.len());
    println!("Language: {}", language.code());
    println!();

    println!("Sentences: {}", sentences.len());
    for s in sentences.iter().take(args.sentences) {
        println!(
            "[S{:04}] bytes=[{},{}] tokens={}  {}",
            s.index,
            s.start,
            s.end,
            s.tokens.len(),
            preview(&s.text, 120)
        );
    }
    if sentences.len() > args.sentences {
        println!("... ({} more sentences)", sentences.len() - args.sentences);
    }

    if let Some(out_path) = args.out {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Output<'a> {
            file: String,
            language: &'static str,
            chars: usize,
            bytes: usize,
            sentences: &'a [Sentence],
        }

        let out = Output {
            file: args.path.display().to_string(),
            language: language.code(),
            chars: text.chars().count(),
            bytes: text.len(),
            sentences: &sentences,
        };

        let json = serde_json::to_string_pretty(&out)?;
        std::fs::write(&out_path, json).with_context(|| format!("write out failed: {}", out_path.display()))?;
        println!();
        println!("Wrote JSON: {}", out_path.display());
    }

    Ok(())
}
