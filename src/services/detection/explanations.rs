// Explanations
// Human-readable summary, per-metric interpretation and recommendations

use crate::models::{Explanations, Metric, MetricDirection, MetricExplanation, MetricSet};

/// Distance from the reference level that separates "near" from "far".
const BAND_WIDTH: f64 = 20.0;

/// Per-metric AI score above which a targeted tip is added.
const TIP_THRESHOLD: f64 = 70.0;

/// Typical score for ordinary human prose.
fn reference_level(metric: Metric) -> f64 {
    match metric {
        Metric::Perplexity | Metric::Burstiness | Metric::Entropy | Metric::LexicalVariety => 50.0,
        Metric::Coherence | Metric::Fluency => 70.0,
        Metric::Relevance | Metric::Naturalness => 60.0,
        Metric::RepetitivePatterns | Metric::TransitionAbruptness | Metric::ExcessiveFormality => 40.0,
    }
}

fn description(metric: Metric) -> &'static str {
    match metric {
        Metric::Perplexity => "How unpredictable the word sequence is.",
        Metric::Burstiness => "How much sentence length and punctuation vary.",
        Metric::Entropy => "How evenly spread word and phrase choices are.",
        Metric::Coherence => "How much vocabulary neighbouring sentences share.",
        Metric::LexicalVariety => "How many different words are used, adjusted for length.",
        Metric::Fluency => "Word length, connectives and punctuation balanced against stiff phrasing.",
        Metric::Relevance => "How tightly sentences stay on the main topic words.",
        Metric::RepetitivePatterns => "Repeated sentence openers, shapes and lengths.",
        Metric::Naturalness => "Idioms, self-corrections, personal voice and tense shifts.",
        Metric::TransitionAbruptness => "Sentence changes with no shared word, connective or reference.",
        Metric::ExcessiveFormality => "Formal set phrases and passive constructions per 100 words.",
    }
}

fn interpretation(metric: Metric, value: f64) -> String {
    let level = reference_level(metric);
    let (high, low) = match metric.direction() {
        MetricDirection::HumanLike => ("human-like", "machine-like"),
        MetricDirection::AiLike => ("machine-like", "human-like"),
    };
    let band = if value >= level + BAND_WIDTH {
        format!("well above the typical level; strongly {}", high)
    } else if value >= level {
        format!("at or above the typical level; leans {}", high)
    } else if value >= level - BAND_WIDTH {
        format!("below the typical level; leans {}", low)
    } else {
        format!("well below the typical level; strongly {}", low)
    };
    format!("{:.0} vs. typical {:.0}: {}.", value, level, band)
}

fn summary(score: f64) -> String {
    let text = if score > 80.0 {
        "The text shows very clear signs of machine generation: predictable wording, uniform structure and little personal voice."
    } else if score > 60.0 {
        "The text mostly reads as machine-generated, with a few variations that could come from human editing."
    } else if score > 40.0 {
        "The text mixes human and machine-like traits; parts of it may have been generated or heavily edited."
    } else if score > 20.0 {
        "The text mostly reads as human-written, although some passages are unusually uniform."
    } else {
        "The text reads as human-written, with the irregular rhythm and word choice typical of people."
    };
    format!("{} (AI-likeness {:.0}/100)", text, score)
}

fn recommendations(score: f64) -> Vec<String> {
    let base: &[&str] = if score > 60.0 {
        &[
            "Review the highlighted sentences before presenting this text as original work.",
            "Vary sentence length and openings; several sentences follow the same template.",
            "Add concrete personal observations or opinions where they fit.",
        ]
    } else if score > 40.0 {
        &[
            "Check the highlighted sentences; they carry most of the machine-like signal.",
            "Replace stock connectives and formal set phrases with plainer wording.",
        ]
    } else {
        &["No action needed; the text already shows natural variation."]
    };
    base.iter().map(|s| s.to_string()).collect()
}

fn metric_tip(metric: Metric) -> &'static str {
    match metric {
        Metric::Perplexity | Metric::Entropy => "Use less predictable word combinations.",
        Metric::Burstiness => "Mix short and long sentences and use more varied punctuation.",
        Metric::Coherence => "Let neighbouring sentences share some vocabulary without repeating whole phrases.",
        Metric::LexicalVariety => "Avoid reusing the same words; prefer synonyms.",
        Metric::Fluency => "Use ordinary connectives and fewer stiff adverbs.",
        Metric::Relevance => "Allow the occasional aside instead of repeating the main topic in every sentence.",
        Metric::RepetitivePatterns => "Start sentences differently and avoid formulaic conclusions.",
        Metric::Naturalness => "Add a personal remark, an idiom or a quick self-correction.",
        Metric::TransitionAbruptness => "Link sentences with a connective or a pronoun that points back.",
        Metric::ExcessiveFormality => "Turn passive constructions into active ones and drop formal set phrases.",
    }
}

/// Explain an aggregate score and the metrics behind it.
pub fn explain(score: f64, metrics: &MetricSet) -> Explanations {
    let details = metrics
        .iter()
        .map(|(metric, value)| MetricExplanation {
            metric,
            value,
            description: description(metric).to_string(),
            interpretation: interpretation(metric, value),
        })
        .collect();

    let mut recommendations = recommendations(score);
    if score > 40.0 {
        recommendations.extend(
            metrics
                .iter()
                .filter(|(metric, value)| metric.ai_score(*value) > TIP_THRESHOLD)
                .map(|(metric, _)| metric_tip(metric).to_string()),
        );
        recommendations.dedup();
    }

    Explanations {
        summary: summary(score),
        details,
        recommendations,
    }
}
