// Segment Builder
// Builds per-sentence analyses from tokenizer sentences

use crate::models::{Highlight, Sentence, SentenceAnalysis};
use crate::services::config_store::AnalysisConfig;
use super::aggregation::aggregate;
use super::metric_engine::compute_sentence_metric_set;

/// Build one analysis per sentence, in source order
pub fn build_sentence_analyses(sentences: &[Sentence], config: &AnalysisConfig) -> Vec<SentenceAnalysis> {
    sentences
        .iter()
        .map(|sentence| make_sentence_analysis(sentence, config))
        .collect()
}

/// Score a single sentence with the reduced sentence-level metric subset
pub fn make_sentence_analysis(sentence: &Sentence, config: &AnalysisConfig) -> SentenceAnalysis {
    let metrics = compute_sentence_metric_set(&sentence.text, &config.tuning);
    let result = aggregate(&metrics, &config.sentence_weights);

    SentenceAnalysis {
        index: sentence.index,
        text: sentence.text.clone(),
        start: sentence.start,
        end: sentence.end,
        highlight: Highlight::from_score(result.ai_probability),
        result,
    }
}
