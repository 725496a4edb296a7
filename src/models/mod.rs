// proseLens Data Models
// Shared by the analysis pipeline, the rewriter and the CLI

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Neutral score reported for metrics that cannot be computed on degenerate input.
pub const NEUTRAL_SCORE: f64 = 50.0;

// ============ Tokens & Sentences ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    Word,
    Punctuation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub text: String,
    /// UTF-8 byte offset (0-based) into the analyzed text.
    pub start: usize,
    /// UTF-8 byte offset (0-based, end-exclusive) into the analyzed text.
    pub end: usize,
    pub kind: TokenKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentence {
    pub index: usize,
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "en")]
    English,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Self::Spanish => "es",
            Self::English => "en",
        }
    }
}

// ============ Metrics ============

/// Which way a metric leans: towards human-written or AI-generated text as it grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricDirection {
    HumanLike,
    AiLike,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Perplexity,
    Burstiness,
    Entropy,
    Coherence,
    LexicalVariety,
    Fluency,
    Relevance,
    RepetitivePatterns,
    Naturalness,
    TransitionAbruptness,
    ExcessiveFormality,
}

impl Metric {
    pub const ALL: [Metric; 11] = [
        Metric::Perplexity,
        Metric::Burstiness,
        Metric::Entropy,
        Metric::Coherence,
        Metric::LexicalVariety,
        Metric::Fluency,
        Metric::Relevance,
        Metric::RepetitivePatterns,
        Metric::Naturalness,
        Metric::TransitionAbruptness,
        Metric::ExcessiveFormality,
    ];

    /// Metrics that stay meaningful on a single sentence.
    pub const SENTENCE_LEVEL: [Metric; 7] = [
        Metric::Perplexity,
        Metric::Burstiness,
        Metric::Entropy,
        Metric::Fluency,
        Metric::RepetitivePatterns,
        Metric::Naturalness,
        Metric::ExcessiveFormality,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Perplexity => "perplexity",
            Self::Burstiness => "burstiness",
            Self::Entropy => "entropy",
            Self::Coherence => "coherence",
            Self::LexicalVariety => "lexicalVariety",
            Self::Fluency => "fluency",
            Self::Relevance => "relevance",
            Self::RepetitivePatterns => "repetitivePatterns",
            Self::Naturalness => "naturalness",
            Self::TransitionAbruptness => "transitionAbruptness",
            Self::ExcessiveFormality => "excessiveFormality",
        }
    }

    pub fn direction(self) -> MetricDirection {
        match self {
            Self::RepetitivePatterns | Self::TransitionAbruptness | Self::ExcessiveFormality => {
                MetricDirection::AiLike
            }
            _ => MetricDirection::HumanLike,
        }
    }

    /// Re-express a raw metric value so that higher always means "more AI-like".
    pub fn ai_score(self, value: f64) -> f64 {
        match self.direction() {
            MetricDirection::AiLike => value,
            MetricDirection::HumanLike => 100.0 - value,
        }
    }
}

/// Metric name -> score in [0, 100]. Values are clamped on the way in and never NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Metric, f64>")]
pub struct MetricSet(BTreeMap<Metric, f64>);

impl From<BTreeMap<Metric, f64>> for MetricSet {
    fn from(scores: BTreeMap<Metric, f64>) -> Self {
        Self::from_scores(scores)
    }
}

impl MetricSet {
    pub fn from_scores<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = (Metric, f64)>,
    {
        Self(
            scores
                .into_iter()
                .map(|(metric, value)| (metric, clamp_score(value)))
                .collect(),
        )
    }

    /// Copy of this set with one metric replaced.
    pub fn with_score(&self, metric: Metric, value: f64) -> Self {
        let mut scores = self.0.clone();
        scores.insert(metric, clamp_score(value));
        Self(scores)
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.0.get(&metric).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.0.iter().map(|(m, v)| (*m, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Clamp a computed score into [0, 100]; non-finite values collapse to the neutral score.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        NEUTRAL_SCORE
    }
}

// ============ Classification ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    Human,
    MostlyHuman,
    Mixed,
    MostlyAi,
    Ai,
}

impl Classification {
    /// Lower bound (inclusive) of the "mixed" band; below it text reads as human.
    pub const MIXED_THRESHOLD: f64 = 40.0;

    /// Bands: [0,20) human, [20,40) mostly-human, [40,60) mixed, [60,80) mostly-ai, [80,100] ai.
    pub fn from_score(score: f64) -> Self {
        if score < 20.0 {
            Self::Human
        } else if score < Self::MIXED_THRESHOLD {
            Self::MostlyHuman
        } else if score < 60.0 {
            Self::Mixed
        } else if score < 80.0 {
            Self::MostlyAi
        } else {
            Self::Ai
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::MostlyHuman => "mostly-human",
            Self::Mixed => "mixed",
            Self::MostlyAi => "mostly-ai",
            Self::Ai => "ai",
        }
    }
}

/// Display class for sentence highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Highlight {
    Human,
    Ai,
    AiHigh,
}

impl Highlight {
    pub fn from_score(score: f64) -> Self {
        if score > 75.0 {
            Self::AiHigh
        } else if score > 50.0 {
            Self::Ai
        } else {
            Self::Human
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Ai => "ai",
            Self::AiHigh => "aiHigh",
        }
    }
}

// ============ Analysis Results ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub ai_probability: f64,
    pub label: Classification,
    pub metrics: MetricSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceAnalysis {
    pub index: usize,
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub highlight: Highlight,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricExplanation {
    pub metric: Metric,
    pub value: f64,
    pub description: String,
    pub interpretation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanations {
    pub summary: String,
    #[serde(default)]
    pub details: Vec<MetricExplanation>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnalysis {
    #[serde(flatten)]
    pub overall: AnalysisResult,
    pub sentences: Vec<SentenceAnalysis>,
    pub language: Language,
    pub word_count: usize,
    pub sentence_count: usize,
    /// Set when the text is shorter than the configured minimum; scores are still reported.
    pub low_confidence: bool,
    pub explanations: Explanations,
    pub version: String,
}

// ============ Rewriting ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleTier {
    Aggressive,
    Moderate,
    Minimal,
    Untouched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    DiscourseMarker,
    StructuralVariation,
    IdiomSubstitution,
    LexicalVariation,
    FirstPersonFraming,
    PersonalAside,
    SelfCorrection,
    EmphasisShift,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanizeOptions {
    /// Fixed seed for reproducible output; a fresh one is drawn when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceRewrite {
    pub index: usize,
    pub tier: RuleTier,
    pub original: String,
    pub rewritten: String,
    pub rules: Vec<RuleKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteResult {
    pub text: String,
    pub changes: Vec<String>,
    #[serde(default)]
    pub sentences: Vec<SentenceRewrite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(Classification::from_score(0.0), Classification::Human);
        assert_eq!(Classification::from_score(19.0), Classification::Human);
        assert_eq!(Classification::from_score(20.0), Classification::MostlyHuman);
        assert_eq!(Classification::from_score(39.0), Classification::MostlyHuman);
        assert_eq!(Classification::from_score(40.0), Classification::Mixed);
        assert_eq!(Classification::from_score(59.0), Classification::Mixed);
        assert_eq!(Classification::from_score(60.0), Classification::MostlyAi);
        assert_eq!(Classification::from_score(79.0), Classification::MostlyAi);
        assert_eq!(Classification::from_score(80.0), Classification::Ai);
        assert_eq!(Classification::from_score(100.0), Classification::Ai);
    }

    #[test]
    fn test_metric_set_clamps_and_rejects_nan() {
        let set = MetricSet::from_scores([
            (Metric::Perplexity, 140.0),
            (Metric::Entropy, -3.0),
            (Metric::Fluency, f64::NAN),
        ]);
        assert_eq!(set.get(Metric::Perplexity), Some(100.0));
        assert_eq!(set.get(Metric::Entropy), Some(0.0));
        assert_eq!(set.get(Metric::Fluency), Some(NEUTRAL_SCORE));
    }

    #[test]
    fn test_metric_set_clamps_when_deserialized() {
        let set: MetricSet = serde_json::from_str(r#"{"perplexity": 150.0, "burstiness": -3.5, "entropy": 42.0}"#).unwrap();
        assert_eq!(set.get(Metric::Perplexity), Some(100.0));
        assert_eq!(set.get(Metric::Burstiness), Some(0.0));
        assert_eq!(set.get(Metric::Entropy), Some(42.0));
        assert_eq!(serde_json::to_value(&set).unwrap()["perplexity"], 100.0);
    }

    #[test]
    fn test_metric_set_serializes_camel_case_keys() {
        let set = MetricSet::from_scores([(Metric::LexicalVariety, 42.0)]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"lexicalVariety":42.0}"#);
        let parsed: MetricSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, set);
    }

    #[test]
    fn test_label_serialization() {
        let json = serde_json::to_string(&Classification::MostlyAi).unwrap();
        assert_eq!(json, "\"mostly-ai\"");
    }

    #[test]
    fn test_ai_score_direction() {
        assert_eq!(Metric::Naturalness.ai_score(70.0), 30.0);
        assert_eq!(Metric::RepetitivePatterns.ai_score(70.0), 70.0);
    }
}
