// Aggregation Logic
// Combines a metric set into one AI-likeness score and label

use crate::models::{clamp_score, AnalysisResult, Classification, MetricSet, NEUTRAL_SCORE};
use crate::services::config_store::MetricWeights;

/// Weighted mean of the AI-direction metric scores.
///
/// Only metrics present in `metrics` with a positive weight take part, and the
/// weights are renormalised over them, so tables that do not sum to 1.0 still
/// produce a score in [0, 100]. If none of the configured weights apply, the
/// document defaults are tried before falling back to the neutral score.
pub fn aggregate_score(metrics: &MetricSet, weights: &MetricWeights) -> f64 {
    weighted_ai_score(metrics, weights)
        .or_else(|| weighted_ai_score(metrics, &MetricWeights::document_default()))
        .map(|score| clamp_score(score.round()))
        .unwrap_or(NEUTRAL_SCORE)
}

fn weighted_ai_score(metrics: &MetricSet, weights: &MetricWeights) -> Option<f64> {
    let mut weighted = 0.0;
    let mut total = 0.0;
    for (metric, weight) in weights.positive() {
        if let Some(value) = metrics.get(metric) {
            weighted += weight * metric.ai_score(value);
            total += weight;
        }
    }
    (total > 0.0).then(|| weighted / total)
}

/// Score, label and the source metrics.
pub fn aggregate(metrics: &MetricSet, weights: &MetricWeights) -> AnalysisResult {
    let ai_probability = aggregate_score(metrics, weights);
    AnalysisResult {
        ai_probability,
        label: Classification::from_score(ai_probability),
        metrics: metrics.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Metric;

    fn uniform(value: f64) -> MetricSet {
        MetricSet::from_scores(Metric::ALL.iter().map(|&m| (m, value)))
    }

    #[test]
    fn test_human_direction_metrics_are_inverted() {
        // all-zero scores: human-direction metrics read as fully AI-like
        let score = aggregate_score(&uniform(0.0), &MetricWeights::document_default());
        // ai-direction share: repetitive 0.10 + abruptness 0.05 + formality 0.10
        assert_eq!(score, 75.0);
    }

    #[test]
    fn test_neutral_metrics_give_neutral_score() {
        let result = aggregate(&uniform(50.0), &MetricWeights::document_default());
        assert_eq!(result.ai_probability, 50.0);
        assert_eq!(result.label, Classification::Mixed);
    }

    #[test]
    fn test_unnormalised_weights_are_rescaled() {
        let mut doubled = MetricWeights::document_default();
        for metric in Metric::ALL {
            let w = doubled.get(metric);
            doubled.set(metric, w * 2.0);
        }
        let metrics = uniform(30.0).with_score(Metric::RepetitivePatterns, 90.0);
        assert_eq!(
            aggregate_score(&metrics, &doubled),
            aggregate_score(&metrics, &MetricWeights::document_default())
        );
    }

    #[test]
    fn test_sentence_weights_ignore_missing_metrics() {
        let metrics = MetricSet::from_scores([(Metric::RepetitivePatterns, 100.0)]);
        assert_eq!(aggregate_score(&metrics, &MetricWeights::sentence_default()), 100.0);
    }

    #[test]
    fn test_unusable_weights_fall_back() {
        let zero = MetricWeights::new([(Metric::Perplexity, 0.0)]);
        let metrics = uniform(50.0);
        assert_eq!(aggregate_score(&metrics, &zero), 50.0);
        assert_eq!(aggregate_score(&MetricSet::default(), &zero), NEUTRAL_SCORE);
    }

    #[test]
    fn test_repetition_is_monotonic() {
        let weights = MetricWeights::document_default();
        let base = uniform(40.0);
        let mut previous = 0.0;
        for value in (0..=100).step_by(5) {
            let score = aggregate_score(&base.with_score(Metric::RepetitivePatterns, value as f64), &weights);
            assert!(score >= previous);
            previous = score;
        }
    }
}
