// Discourse metrics: register, idiom and voice signals.

use regex::Regex;
use std::sync::OnceLock;

use super::lexicon::{
    COLLOQUIAL_EXPRESSIONS, CONNECTIVES, FIRST_PERSON_MARKERS, FORMAL_ADVERBS, FORMAL_EXPRESSIONS,
    IDIOMS, PAST_TENSE, PRESENT_TENSE, SELF_CORRECTIONS, TEMPORAL_ADVERBS,
};
use super::metric_engine::Document;
use crate::models::NEUTRAL_SCORE;
use crate::services::text_processor::words;

const MIN_WORDS_FOR_FORMALITY: usize = 20;

fn comma_no_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)[^.!?]+, no, [^.!?]+").expect("comma-no regex"))
}

fn dash_restatement_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^.!?]+ [-–—] [^.!?]+ [-–—] [^.!?]+").expect("dash regex"))
}

fn passive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:es|son|fue|fueron|ha sido|han sido|será|serán|is|are|was|were|has been|have been|will be) [a-záéíóúüñ]+ (?:por|by)\b",
        )
        .expect("passive regex")
    })
}

fn reflexive_passive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bse [a-záéíóúüñ]+(?:a|e|ó)\b").expect("reflexive passive regex"))
}

/// Word length, connectives and punctuation, minus stiff adverbs plus colloquialisms.
/// Higher reads as more human.
pub fn fluency(doc: &Document) -> f64 {
    let n = doc.sentence_count();
    let tokens = words(doc.text);
    if n == 0 || tokens.is_empty() {
        return NEUTRAL_SCORE;
    }
    let total = tokens.len() as f64;
    let sentences = n as f64;

    let avg_word_len = tokens.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / total;
    let connectors = CONNECTIVES.count(doc.text) as f64;
    let punctuation = doc.text.chars().filter(|c| ",.;:!?".contains(*c)).count() as f64;
    let formal_per_100 = FORMAL_ADVERBS.count(doc.text) as f64 / (total / 100.0);
    let colloquial_per_200 = COLLOQUIAL_EXPRESSIONS.count(doc.text) as f64 / (total / 200.0);

    let word_length_score = (avg_word_len * 20.0).min(100.0);
    let connector_score = (connectors / sentences * 50.0).min(100.0);
    let punctuation_score = (punctuation / sentences * 25.0).min(100.0);
    let formality_penalty = (formal_per_100 * 25.0).min(50.0);
    let colloquial_bonus = (colloquial_per_200 * 100.0).min(50.0);

    word_length_score * 0.2 + connector_score * 0.3 + punctuation_score * 0.2 - formality_penalty * 0.15
        + colloquial_bonus * 0.15
}

/// Idioms, self-corrections, first-person voice and unmarked tense shifts.
/// Higher reads as more human.
pub fn naturalness(doc: &Document) -> f64 {
    let n = doc.sentence_count();
    if n == 0 {
        return NEUTRAL_SCORE;
    }
    let sentences = n as f64;
    let chars = doc.text.chars().count() as f64;

    let idiom_rate = IDIOMS.count(doc.text) as f64 / (chars / 1000.0);

    let corrections = SELF_CORRECTIONS.count(doc.text)
        + comma_no_re().find_iter(doc.text).count()
        + dash_restatement_re().find_iter(doc.text).count();
    let correction_rate = corrections as f64 / sentences;

    let personal_rate = FIRST_PERSON_MARKERS.count(doc.text) as f64 / sentences;

    let shifts = doc
        .sentences
        .windows(2)
        .filter(|pair| {
            let (current, next) = (&pair[0].text, &pair[1].text);
            let shifted = (PAST_TENSE.any_match(current) && PRESENT_TENSE.any_match(next))
                || (PRESENT_TENSE.any_match(current) && PAST_TENSE.any_match(next));
            shifted && !TEMPORAL_ADVERBS.any_match(next)
        })
        .count();
    let shift_rate = shifts as f64 / (n - 1).max(1) as f64;

    ((idiom_rate * 30.0 + correction_rate * 30.0 + personal_rate * 30.0 + shift_rate * 10.0) * 100.0).min(100.0)
}

/// Formal phrases and passive constructions per 100 words. Higher reads as more AI.
pub fn excessive_formality(doc: &Document) -> f64 {
    let total = doc.words.len();
    if total < MIN_WORDS_FOR_FORMALITY {
        return NEUTRAL_SCORE;
    }

    let formal = FORMAL_EXPRESSIONS.count(doc.text);
    let passives =
        passive_re().find_iter(doc.text).count() + reflexive_passive_re().find_iter(doc.text).count();
    let per_100 = (formal + passives) as f64 / (total as f64 / 100.0);

    (per_100 * 20.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_neutral() {
        let doc = Document::new("");
        assert_eq!(fluency(&doc), NEUTRAL_SCORE);
        assert_eq!(naturalness(&doc), NEUTRAL_SCORE);
        assert_eq!(excessive_formality(&doc), NEUTRAL_SCORE);
    }

    #[test]
    fn test_first_person_voice_raises_naturalness() {
        let personal = Document::new("Creo que mi perro me entiende. Yo lo noto cada día.");
        let flat = Document::new("El perro entiende órdenes. El animal responde cada día.");
        assert!(naturalness(&personal) > naturalness(&flat));
        assert_eq!(naturalness(&flat), 0.0);
    }

    #[test]
    fn test_tense_shift_without_marker_counts() {
        let shifted = Document::new("El día fue largo. El perro está cansado.");
        let marked = Document::new("El día fue largo. Ahora el perro está cansado.");
        assert!(naturalness(&shifted) > naturalness(&marked));
    }

    #[test]
    fn test_self_correction_patterns() {
        let doc = Document::new("Era azul, no, era verde. Bueno, o sea, casi verde.");
        assert!(naturalness(&doc) > 0.0);
    }

    #[test]
    fn test_formality_needs_twenty_words() {
        let doc = Document::new("Cabe destacar que el informe fue revisado por el comité.");
        assert_eq!(excessive_formality(&doc), NEUTRAL_SCORE);
    }

    #[test]
    fn test_formal_register_scores_high() {
        let formal = Document::new(
            "Cabe destacar que el informe fue revisado por el comité. Adicionalmente, en virtud de lo expuesto, \
             es imperativo señalar que los resultados fueron aprobados por la junta directiva sin objeciones.",
        );
        let casual = Document::new(
            "Mira, el informe lo miramos ayer con calma y la verdad es que quedó bien. \
             Luego se lo pasamos a la junta y nadie puso pegas, así que listo.",
        );
        assert!(excessive_formality(&formal) > excessive_formality(&casual));
        assert!(excessive_formality(&formal) >= 80.0);
    }

    #[test]
    fn test_formal_adverbs_lower_fluency() {
        let plain = Document::new("El plan salió bien. También ayudó el clima.");
        let stiff = Document::new("Indudablemente el plan salió bien. Consecuentemente ayudó el clima.");
        assert!(fluency(&stiff) < fluency(&plain));
        assert!(fluency(&plain) > 0.0);
    }
}
