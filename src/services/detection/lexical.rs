// Lexical metrics: predictability, randomness and lexical diversity.
// All three read higher as more human.

use std::collections::{HashMap, HashSet};

use super::metric_engine::Document;
use crate::models::NEUTRAL_SCORE;
use crate::services::config_store::MetricTuning;
use crate::services::text_processor::{ngram_counts, shannon_entropy, variance, word_frequencies};

const MIN_WORDS_FOR_DIVERSITY: usize = 10;

/// Perplexity proxy: sentence-length variance, unique bigram ratio and the
/// entropy of the frequency-of-frequency distribution.
pub fn perplexity(doc: &Document, tuning: &MetricTuning) -> f64 {
    if doc.words.is_empty() {
        return NEUTRAL_SCORE;
    }

    let length_variance = (variance(&doc.sentence_word_counts()) * 10.0).min(100.0);

    let bigrams = ngram_counts(&doc.words, 2);
    let pairs = doc.words.len().saturating_sub(1).max(1);
    let bigram_ratio = bigrams.len() as f64 / pairs as f64 * 100.0;

    let frequencies = word_frequencies(&doc.words);
    let mut freq_of_freq: HashMap<usize, usize> = HashMap::new();
    for (_, count) in &frequencies {
        *freq_of_freq.entry(*count).or_insert(0) += 1;
    }
    let freq_entropy = (shannon_entropy(freq_of_freq.into_values(), frequencies.len()) * 20.0).min(100.0);

    length_variance * tuning.variance_weight
        + bigram_ratio * tuning.bigram_weight
        + freq_entropy * tuning.frequency_entropy_weight
}

/// Unigram and trigram Shannon entropy, blended and scaled.
pub fn entropy(doc: &Document, tuning: &MetricTuning) -> f64 {
    let total = doc.words.len();
    if total == 0 {
        return NEUTRAL_SCORE;
    }

    let unigram = shannon_entropy(word_frequencies(&doc.words).into_iter().map(|(_, c)| c), total);
    let trigram = shannon_entropy(ngram_counts(&doc.words, 3).into_values(), total.saturating_sub(2));

    ((unigram * tuning.unigram_entropy_weight + trigram * tuning.trigram_entropy_weight) * 15.0).min(100.0)
}

/// Type-token ratio (length adjusted), MTLD and hapax ratio.
pub fn lexical_variety(doc: &Document, tuning: &MetricTuning) -> f64 {
    let total = doc.words.len();
    if total < MIN_WORDS_FOR_DIVERSITY {
        return NEUTRAL_SCORE;
    }

    let frequencies = word_frequencies(&doc.words);
    let ttr = frequencies.len() as f64 / total as f64;
    let hapax = frequencies.iter().filter(|(_, c)| *c == 1).count() as f64 / total as f64;
    let mtld = mtld(&doc.words, tuning.mtld_threshold);

    let length_factor = (100.0 / total as f64).min(1.0);
    let normalized_ttr = ttr / (0.5 * length_factor + 0.5);
    let normalized_mtld = (mtld / 100.0).min(1.0);
    let normalized_hapax = hapax * 2.0;

    ((normalized_ttr * tuning.ttr_weight
        + normalized_mtld * tuning.mtld_weight
        + normalized_hapax * tuning.hapax_weight)
        * 100.0)
        .min(100.0)
}

/// Measure of textual lexical diversity: mean length of the word runs that
/// keep their running TTR above `threshold`.
fn mtld(words: &[String], threshold: f64) -> f64 {
    let mut factors = 0.0;
    let mut seen: HashSet<&str> = HashSet::new();
    let mut run = 0usize;

    for word in words {
        seen.insert(word.as_str());
        run += 1;
        if seen.len() as f64 / run as f64 <= threshold {
            factors += 1.0;
            seen.clear();
            run = 0;
        }
    }

    if run > 0 && threshold < 1.0 {
        let ttr = seen.len() as f64 / run as f64;
        factors += (1.0 - ttr) / (1.0 - threshold);
    }
    if factors == 0.0 {
        factors = 1.0;
    }

    words.len() as f64 / factors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> MetricTuning {
        MetricTuning::default()
    }

    #[test]
    fn test_empty_text_is_neutral() {
        let doc = Document::new("");
        assert_eq!(perplexity(&doc, &tuning()), NEUTRAL_SCORE);
        assert_eq!(entropy(&doc, &tuning()), NEUTRAL_SCORE);
        assert_eq!(lexical_variety(&doc, &tuning()), NEUTRAL_SCORE);
    }

    #[test]
    fn test_entropy_of_a_single_repeated_word_is_zero() {
        let doc = Document::new("eco eco eco eco");
        assert_eq!(entropy(&doc, &tuning()), 0.0);
    }

    #[test]
    fn test_lexical_variety_needs_ten_words() {
        let doc = Document::new("uno dos tres cuatro cinco seis siete ocho nueve");
        assert_eq!(lexical_variety(&doc, &tuning()), NEUTRAL_SCORE);
    }

    #[test]
    fn test_lexical_variety_all_distinct_words() {
        let text = "alfa beta gamma delta épsilon zeta eta theta iota kappa lambda mu nu xi ómicron pi rho sigma tau ípsilon";
        let doc = Document::new(text);
        assert_eq!(doc.words.len(), 20);
        // ttr 1.0, mtld 20/1 -> 0.2, hapax 1.0 -> 2.0
        let score = lexical_variety(&doc, &tuning());
        assert!((score - 98.0).abs() < 1e-9, "{}", score);
    }

    #[test]
    fn test_repetition_lowers_diversity() {
        let varied = Document::new("El río baja frío entre piedras grises mientras los niños gritan y corren hacia el puente viejo.");
        let flat = Document::new("El texto es el texto y el texto es el texto y el texto es el texto del texto.");
        assert!(lexical_variety(&varied, &tuning()) > lexical_variety(&flat, &tuning()));
        assert!(entropy(&varied, &tuning()) > entropy(&flat, &tuning()));
        assert!(perplexity(&varied, &tuning()) > perplexity(&flat, &tuning()));
    }

    #[test]
    fn test_mtld_counts_full_factors() {
        let words: Vec<String> = ["a", "a", "b", "b"].iter().map(|s| s.to_string()).collect();
        // "a a" drops to ttr 0.5 (factor), "b b" likewise
        assert_eq!(mtld(&words, 0.72), 2.0);
    }
}
