// Metric Engine
// Computes named metric sets for a whole document or a single sentence

use tracing::debug;

use super::{discourse, lexical, structural};
use crate::models::{clamp_score, Metric, MetricSet, Sentence};
use crate::services::config_store::MetricTuning;
use crate::services::sentence_segmenter::split_sentences;
use crate::services::text_processor::{lowercase_words, words};

/// Text pre-split once and shared by every metric.
pub struct Document<'a> {
    pub text: &'a str,
    pub sentences: Vec<Sentence>,
    /// Lowercased words of the whole text.
    pub words: Vec<String>,
}

impl<'a> Document<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            sentences: split_sentences(text),
            words: lowercase_words(text),
        }
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    pub fn sentence_word_counts(&self) -> Vec<f64> {
        self.sentences
            .iter()
            .map(|s| words(&s.text).len() as f64)
            .collect()
    }
}

/// Round to an integer score and clamp; NaN becomes the neutral score.
fn finalize(value: f64) -> f64 {
    clamp_score(value.round())
}

pub fn compute_metric(metric: Metric, doc: &Document, tuning: &MetricTuning) -> f64 {
    let raw = match metric {
        Metric::Perplexity => lexical::perplexity(doc, tuning),
        Metric::Entropy => lexical::entropy(doc, tuning),
        Metric::LexicalVariety => lexical::lexical_variety(doc, tuning),
        Metric::Burstiness => structural::burstiness(doc),
        Metric::Coherence => structural::coherence(doc),
        Metric::Relevance => structural::relevance(doc),
        Metric::RepetitivePatterns => structural::repetitive_patterns(doc),
        Metric::TransitionAbruptness => structural::transition_abruptness(doc),
        Metric::Fluency => discourse::fluency(doc),
        Metric::Naturalness => discourse::naturalness(doc),
        Metric::ExcessiveFormality => discourse::excessive_formality(doc),
    };
    finalize(raw)
}

fn compute_metrics(doc: &Document, metrics: &[Metric], tuning: &MetricTuning) -> MetricSet {
    MetricSet::from_scores(metrics.iter().map(|&m| (m, compute_metric(m, doc, tuning))))
}

/// All eleven metrics over the whole text.
/// Pairwise sentence metrics are O(n) in sentence count; everything else is linear in text length.
pub fn compute_metric_set(text: &str, tuning: &MetricTuning) -> MetricSet {
    let doc = Document::new(text);
    let set = compute_metrics(&doc, &Metric::ALL, tuning);
    debug!(
        sentences = doc.sentence_count(),
        words = doc.words.len(),
        metrics = ?set,
        "document metrics computed"
    );
    set
}

/// The sentence-level subset, computed on one sentence treated as its own document.
pub fn compute_sentence_metric_set(sentence: &str, tuning: &MetricTuning) -> MetricSet {
    let doc = Document::new(sentence);
    compute_metrics(&doc, &Metric::SENTENCE_LEVEL, tuning)
}

/// One metric with the default tuning.
pub fn metric_score(metric: Metric, text: &str) -> f64 {
    compute_metric(metric, &Document::new(text), &MetricTuning::default())
}
