// Text Processing Service
// Word tokenization and the counting/statistics helpers shared by every metric

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::models::{Language, Token, TokenKind};
use crate::services::detection::lexicon::{ENGLISH_HINTS, SPANISH_HINTS};

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w+").expect("word regex"))
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w+|[^\w\s]").expect("token regex"))
}

/// Maximal runs of word characters (Unicode letters, digits, underscore).
/// Punctuation is dropped; no length filtering happens here.
pub fn words(text: &str) -> Vec<&str> {
    word_re().find_iter(text).map(|m| m.as_str()).collect()
}

/// Lowercased words, in order.
pub fn lowercase_words(text: &str) -> Vec<String> {
    words(text).into_iter().map(|w| w.to_lowercase()).collect()
}

/// Lowercased words with at least `min_chars` characters.
pub fn content_words(text: &str, min_chars: usize) -> Vec<String> {
    words(text)
        .into_iter()
        .filter(|w| w.chars().count() >= min_chars)
        .map(|w| w.to_lowercase())
        .collect()
}

/// Word and punctuation tokens with offsets shifted by `base_offset`.
pub fn tokenize(text: &str, base_offset: usize) -> Vec<Token> {
    token_re()
        .find_iter(text)
        .map(|m| {
            let is_word = m.as_str().chars().next().is_some_and(|c| c.is_alphanumeric() || c == '_');
            Token {
                text: m.as_str().to_string(),
                start: base_offset + m.start(),
                end: base_offset + m.end(),
                kind: if is_word { TokenKind::Word } else { TokenKind::Punctuation },
            }
        })
        .collect()
}

/// Frequencies in first-occurrence order (stable tie-breaking for "top N" lookups).
pub fn word_frequencies<S: AsRef<str>>(items: &[S]) -> Vec<(&str, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<(&str, usize)> = Vec::new();
    for item in items {
        let key = item.as_ref();
        match index.get(key) {
            Some(&i) => out[i].1 += 1,
            None => {
                index.insert(key, out.len());
                out.push((key, 1));
            }
        }
    }
    out
}

/// Fraction of distinct items that occur more than once.
pub fn repeated_share<S: AsRef<str>>(items: &[S]) -> f64 {
    let freq = word_frequencies(items);
    if freq.is_empty() {
        return 0.0;
    }
    let repeated = freq.iter().filter(|(_, c)| *c > 1).count();
    repeated as f64 / freq.len() as f64
}

/// Space-joined n-gram counts.
pub fn ngram_counts<S: AsRef<str>>(tokens: &[S], n: usize) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    if n == 0 || tokens.len() < n {
        return counts;
    }
    for window in tokens.windows(n) {
        let key = window.iter().map(|t| t.as_ref()).collect::<Vec<_>>().join(" ");
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Shannon entropy in bits of a count distribution.
pub fn shannon_entropy<I>(counts: I, total: usize) -> f64
where
    I: IntoIterator<Item = usize>,
{
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    -counts
        .into_iter()
        .filter(|&c| c > 0)
        .map(|c| {
            let p = c as f64 / total;
            p * p.log2()
        })
        .sum::<f64>()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance.
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Pick Spanish or English from closed-class word hits. Ties go to Spanish.
pub fn detect_language(text: &str) -> Language {
    let mut spanish = 0usize;
    let mut english = 0usize;
    for word in lowercase_words(text) {
        if SPANISH_HINTS.contains(&word.as_str()) {
            spanish += 1;
        }
        if ENGLISH_HINTS.contains(&word.as_str()) {
            english += 1;
        }
    }
    if english > spanish {
        Language::English
    } else {
        Language::Spanish
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_are_unicode_aware() {
        assert_eq!(words("¿Está Pérez aquí? Sí, claro."), vec!["Está", "Pérez", "aquí", "Sí", "claro"]);
    }

    #[test]
    fn test_content_words_filters_by_char_length() {
        assert_eq!(content_words("El año más útil", 4), vec!["útil"]);
        assert_eq!(content_words("El año más útil", 3), vec!["año", "más", "útil"]);
    }

    #[test]
    fn test_tokenize_offsets_point_into_text() {
        let text = "Hola, mundo.";
        let tokens = tokenize(text, 0);
        assert_eq!(tokens.len(), 4);
        for t in &tokens {
            assert_eq!(&text[t.start..t.end], t.text);
        }
        assert_eq!(tokens[1].kind, TokenKind::Punctuation);
        assert_eq!(tokens[2].kind, TokenKind::Word);
    }

    #[test]
    fn test_word_frequencies_first_occurrence_order() {
        let items = ["b", "a", "b", "c", "a", "b"];
        assert_eq!(word_frequencies(&items), vec![("b", 3), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn test_repeated_share() {
        assert_eq!(repeated_share(&["x", "x", "y"]), 0.5);
        assert_eq!(repeated_share::<&str>(&[]), 0.0);
    }

    #[test]
    fn test_ngram_counts() {
        let tokens = ["a", "b", "a", "b"];
        let counts = ngram_counts(&tokens, 2);
        assert_eq!(counts.get("a b"), Some(&2));
        assert_eq!(counts.get("b a"), Some(&1));
        assert!(ngram_counts(&tokens, 5).is_empty());
    }

    #[test]
    fn test_shannon_entropy() {
        assert_eq!(shannon_entropy([4], 4), 0.0);
        assert!((shannon_entropy([1, 1], 2) - 1.0).abs() < 1e-12);
        assert_eq!(shannon_entropy(Vec::<usize>::new(), 0), 0.0);
    }

    #[test]
    fn test_variance_and_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), 5.0);
        assert_eq!(variance(&values), 4.0);
        assert_eq!(std_dev(&values), 2.0);
        assert_eq!(variance(&[]), 0.0);
    }

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language("El texto es claro y la idea es buena."), Language::Spanish);
        assert_eq!(detect_language("The text is clear and the idea is good."), Language::English);
        assert_eq!(detect_language(""), Language::Spanish);
    }
}
