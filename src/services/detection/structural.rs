// Structural metrics: how sentences vary, connect and repeat.

use std::collections::HashSet;

use super::lexicon::{
    ANAPHORIC_PRONOUNS, CONCLUSION_MARKERS, CONJUNCTIONS, CONNECTIVES, COPULAS, DETERMINERS,
    OPENING_CONNECTIVES, PREPOSITIONS, STOPWORDS,
};
use super::metric_engine::Document;
use crate::models::NEUTRAL_SCORE;
use crate::services::text_processor::{
    content_words, lowercase_words, mean, repeated_share, std_dev, variance, word_frequencies, words,
};

const TOPIC_COUNT: usize = 5;

/// Sentence-length variation, punctuation diversity and connective openers.
/// Higher reads as more human.
pub fn burstiness(doc: &Document) -> f64 {
    let n = doc.sentence_count();
    if n == 0 {
        return NEUTRAL_SCORE;
    }

    let lengths: Vec<f64> = doc.sentences.iter().map(|s| s.text.chars().count() as f64).collect();
    let avg = mean(&lengths);
    let cv = if avg > 0.0 { std_dev(&lengths) / avg } else { 0.0 };

    let marks: HashSet<char> = doc.text.chars().filter(|c| ".!?;:,".contains(*c)).collect();
    let punctuation_diversity = marks.len() as f64 / 6.0;

    let connective_openers = doc
        .sentences
        .iter()
        .skip(1)
        .filter(|s| OPENING_CONNECTIVES.any_match(&leading_words(&s.text, 3)))
        .count();
    let transition_rate = connective_openers as f64 / (n - 1).max(1) as f64;

    (cv * 50.0 + punctuation_diversity * 25.0 + transition_rate * 25.0).min(100.0)
}

/// Jaccard overlap of 4+ letter words between neighbouring sentences.
/// Both very high and very low overlap are penalised, as are abrupt jumps.
pub fn coherence(doc: &Document) -> f64 {
    let n = doc.sentence_count();
    if n <= 1 {
        return NEUTRAL_SCORE;
    }

    let keywords: Vec<HashSet<String>> = doc
        .sentences
        .iter()
        .map(|s| content_words(&s.text, 4).into_iter().collect())
        .collect();

    let mut total_similarity = 0.0;
    let mut abrupt = 0usize;
    for pair in keywords.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);
        let common = current.intersection(next).count();
        let union = current.len() + next.len() - common;
        let similarity = if union == 0 { 0.0 } else { common as f64 / union as f64 };
        total_similarity += similarity;
        if similarity < 0.1 && current.len() > 3 && next.len() > 3 {
            abrupt += 1;
        }
    }

    let pairs = (n - 1) as f64;
    let avg = total_similarity / pairs;
    let mut score = avg * 100.0;
    if avg > 0.8 {
        score -= (avg - 0.8) * 100.0;
    } else if avg < 0.1 {
        score -= (0.1 - avg) * 100.0;
    }
    score - abrupt as f64 / pairs * 30.0
}

/// Coverage of the five most frequent 4+ letter words across sentences,
/// plus a bonus for digressions. Near-total coverage is penalised.
pub fn relevance(doc: &Document) -> f64 {
    let n = doc.sentence_count();
    let candidates = content_words(doc.text, 4);
    let mut frequencies = word_frequencies(&candidates);
    if n == 0 || frequencies.is_empty() {
        return NEUTRAL_SCORE;
    }
    // stable: ties keep first-occurrence order
    frequencies.sort_by(|a, b| b.1.cmp(&a.1));
    let topics: Vec<&str> = frequencies.iter().take(TOPIC_COUNT).map(|(w, _)| *w).collect();

    let sentence_words: Vec<HashSet<String>> = doc
        .sentences
        .iter()
        .map(|s| lowercase_words(&s.text).into_iter().collect())
        .collect();

    let mut coverage = 0.0;
    let mut has_topic = Vec::with_capacity(n);
    for set in &sentence_words {
        let hits = topics.iter().filter(|t| set.contains(**t)).count();
        coverage += hits as f64 / topics.len() as f64;
        has_topic.push(hits > 0);
    }

    let digressions = (1..n.saturating_sub(1))
        .filter(|&i| !has_topic[i] && has_topic[i - 1] && has_topic[i + 1])
        .count();

    let avg_coverage = coverage / n as f64 * 100.0;
    let mut score = avg_coverage + digressions as f64 / n as f64 * 20.0;
    if avg_coverage > 90.0 {
        score -= (avg_coverage - 90.0) * 0.5;
    }
    score.min(100.0)
}

/// Coarse word classes from closed-class lists and suffixes.
/// A heuristic, not a part-of-speech tagger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoarseTag {
    Name,
    Determiner,
    Conjunction,
    Preposition,
    Verb,
    Adverb,
    Other,
}

impl CoarseTag {
    pub fn of(word: &str) -> Self {
        if word.chars().next().is_some_and(char::is_uppercase) {
            return Self::Name;
        }
        let lower = word.to_lowercase();
        let w = lower.as_str();
        if DETERMINERS.contains(&w) {
            Self::Determiner
        } else if CONJUNCTIONS.contains(&w) {
            Self::Conjunction
        } else if PREPOSITIONS.contains(&w) {
            Self::Preposition
        } else if COPULAS.contains(&w)
            || vowel_before_suffix(w, "r", "aeioué")
            || vowel_before_suffix(w, "ndo", "aeiou")
            || ["do", "da", "dos", "das"].iter().any(|s| vowel_before_suffix(w, s, "aeiou"))
        {
            Self::Verb
        } else if w.ends_with("mente") {
            Self::Adverb
        } else {
            Self::Other
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Name => 'N',
            Self::Determiner => 'D',
            Self::Conjunction => 'C',
            Self::Preposition => 'P',
            Self::Verb => 'V',
            Self::Adverb => 'A',
            Self::Other => 'X',
        }
    }
}

fn vowel_before_suffix(word: &str, suffix: &str, vowels: &str) -> bool {
    word.strip_suffix(suffix)
        .and_then(|stem| stem.chars().last())
        .is_some_and(|c| vowels.contains(c))
}

pub fn tag_pattern(sentence: &str) -> String {
    words(sentence).into_iter().map(|w| CoarseTag::of(w).symbol()).collect()
}

/// Repeated three-word openers, uniform sentence lengths, repeated tag
/// patterns and a closing conclusion marker. Higher reads as more AI.
pub fn repetitive_patterns(doc: &Document) -> f64 {
    let n = doc.sentence_count();
    if n == 0 {
        return NEUTRAL_SCORE;
    }

    let openers: Vec<String> = doc.sentences.iter().map(|s| leading_words(&s.text, 3)).collect();
    let opener_rate = repeated_share(&openers);

    let length_variance = (variance(&doc.sentence_word_counts()) / 25.0).min(1.0);

    let patterns: Vec<String> = doc.sentences.iter().map(|s| tag_pattern(&s.text)).collect();
    let pattern_rate = repeated_share(&patterns);

    let conclusion = match doc.sentences.last() {
        Some(last) if n > 5 && CONCLUSION_MARKERS.any_match(&last.text) => 20.0,
        _ => 0.0,
    };

    (opener_rate * 30.0 + (1.0 - length_variance) * 30.0 + pattern_rate * 30.0 + conclusion).min(100.0)
}

/// Share of neighbouring sentences with no shared content word, no connective
/// and no anaphoric pronoun. Higher reads as more AI.
pub fn transition_abruptness(doc: &Document) -> f64 {
    let n = doc.sentence_count();
    if n <= 2 {
        return NEUTRAL_SCORE;
    }

    let content: Vec<HashSet<String>> = doc
        .sentences
        .iter()
        .map(|s| {
            content_words(&s.text, 3)
                .into_iter()
                .filter(|w| !STOPWORDS.contains(&w.as_str()))
                .collect()
        })
        .collect();

    let abrupt = (0..n - 1)
        .filter(|&i| {
            let next = &doc.sentences[i + 1].text;
            content[i].is_disjoint(&content[i + 1])
                && !CONNECTIVES.any_match(next)
                && !ANAPHORIC_PRONOUNS.any_match(next)
        })
        .count();

    abrupt as f64 / (n - 1) as f64 * 100.0
}

fn leading_words(text: &str, count: usize) -> String {
    lowercase_words(text).into_iter().take(count).collect::<Vec<_>>().join(" ")
}
