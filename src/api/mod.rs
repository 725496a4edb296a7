// Public API
// Boundary functions over the detection and rewriting services

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::info;

use crate::models::{Classification, HumanizeOptions, RewriteResult, TextAnalysis};
use crate::services::config_store::{AnalysisConfig, HumanizerConfig};
use crate::services::detection::{aggregate, build_sentence_analyses, compute_metric_set, explain};
use crate::services::rewriter::{rewrite, ALREADY_HUMAN_MESSAGE};
use crate::services::sentence_segmenter::split_sentences;
use crate::services::text_processor::{detect_language, words};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("sentence analyses do not match the text: {0}")]
    SentenceMismatch(String),
}

fn ensure_text(text: &str) -> Result<(), AnalysisError> {
    if text.trim().is_empty() {
        return Err(AnalysisError::InvalidInput("text is empty".to_string()));
    }
    Ok(())
}

/// Analyze text with the default configuration.
pub fn analyze(text: &str) -> Result<TextAnalysis, AnalysisError> {
    analyze_with_config(text, &AnalysisConfig::default())
}

/// Score the whole text and every sentence in it.
///
/// Text shorter than `config.min_chars` is still analyzed but flagged as
/// low confidence.
pub fn analyze_with_config(text: &str, config: &AnalysisConfig) -> Result<TextAnalysis, AnalysisError> {
    ensure_text(text)?;

    let sentences = split_sentences(text);
    let metrics = compute_metric_set(text, &config.tuning);
    let overall = aggregate(&metrics, &config.weights);
    let sentence_analyses = build_sentence_analyses(&sentences, config);
    let explanations = explain(overall.ai_probability, &overall.metrics);
    let char_count = text.chars().count();
    let low_confidence = char_count < config.min_chars;

    info!(
        chars = char_count,
        sentences = sentences.len(),
        score = overall.ai_probability,
        label = overall.label.as_str(),
        low_confidence,
        "analysis.completed"
    );

    Ok(TextAnalysis {
        language: detect_language(text),
        word_count: words(text).len(),
        sentence_count: sentences.len(),
        sentences: sentence_analyses,
        overall,
        low_confidence,
        explanations,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Rewrite text with the default humanizer settings.
pub fn humanize(text: &str, analysis: &TextAnalysis, options: &HumanizeOptions) -> Result<RewriteResult, AnalysisError> {
    humanize_with_config(text, analysis, options, &HumanizerConfig::default())
}

/// Rewrite text, seeding the random source from the options, then the
/// configuration, then a fresh draw. The seed used is reported back so the
/// run can be reproduced.
pub fn humanize_with_config(
    text: &str,
    analysis: &TextAnalysis,
    options: &HumanizeOptions,
    config: &HumanizerConfig,
) -> Result<RewriteResult, AnalysisError> {
    let seed = options
        .seed
        .or(config.seed)
        .unwrap_or_else(|| rand::rng().random());
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut result = humanize_with_rng(text, analysis, config, &mut rng)?;
    result.seed = Some(seed);
    Ok(result)
}

/// Rewrite text using a caller-supplied random source.
///
/// `analysis` must come from [`analyze`] on the same text: one sentence entry
/// per sentence, in order. Text whose overall score is below the mixed band
/// comes back unchanged whatever its sentences score.
pub fn humanize_with_rng(
    text: &str,
    analysis: &TextAnalysis,
    config: &HumanizerConfig,
    rng: &mut dyn RngCore,
) -> Result<RewriteResult, AnalysisError> {
    ensure_text(text)?;

    let analyses = &analysis.sentences;
    let sentences = split_sentences(text);
    if sentences.len() != analyses.len() {
        return Err(AnalysisError::SentenceMismatch(format!(
            "text has {} sentences but {} analyses were given",
            sentences.len(),
            analyses.len()
        )));
    }
    if let Some((sentence, _)) = sentences
        .iter()
        .zip(analyses)
        .find(|(sentence, entry)| sentence.text != entry.text)
    {
        return Err(AnalysisError::SentenceMismatch(format!(
            "sentence {} differs from its analysis",
            sentence.index + 1
        )));
    }

    if analysis.overall.ai_probability < Classification::MIXED_THRESHOLD {
        info!(score = analysis.overall.ai_probability, "humanize.skipped");
        return Ok(RewriteResult {
            text: text.to_string(),
            changes: vec![ALREADY_HUMAN_MESSAGE.to_string()],
            sentences: Vec::new(),
            seed: None,
        });
    }

    let scores: Vec<f64> = analyses.iter().map(|a| a.result.ai_probability).collect();
    let language = detect_language(text);
    let result = rewrite(text, &sentences, &scores, language, config, rng);

    info!(
        sentences = sentences.len(),
        language = language.code(),
        changes = result.changes.len(),
        "humanize.completed"
    );
    Ok(result)
}
