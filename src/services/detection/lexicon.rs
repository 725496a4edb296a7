// Lexicon
// Static word and phrase catalogs (Spanish + English) consulted by the metrics.
// Loaded once, never mutated.

use regex::Regex;
use std::sync::LazyLock;

/// A fixed list of phrases, each compiled to its own case-insensitive, word-bounded matcher.
/// Occurrences are counted per phrase, so overlapping entries each count.
pub struct PhraseSet {
    patterns: Vec<Regex>,
}

impl PhraseSet {
    pub fn word_bounded(phrases: &[&str]) -> Self {
        let patterns = phrases
            .iter()
            .map(|p| Regex::new(&format!(r"(?i)\b{}\b", regex::escape(p))).expect("phrase regex"))
            .collect();
        Self { patterns }
    }

    /// Substring matching without word boundaries.
    pub fn anywhere(phrases: &[&str]) -> Self {
        let patterns = phrases
            .iter()
            .map(|p| Regex::new(&format!(r"(?i){}", regex::escape(p))).expect("phrase regex"))
            .collect();
        Self { patterns }
    }

    pub fn count(&self, text: &str) -> usize {
        self.patterns.iter().map(|re| re.find_iter(text).count()).sum()
    }

    pub fn any_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(text))
    }
}

/// Connectives recognised at the start of a sentence.
pub static OPENING_CONNECTIVES: LazyLock<PhraseSet> = LazyLock::new(|| {
    PhraseSet::word_bounded(&[
        "además", "sin embargo", "por lo tanto", "no obstante", "en cambio", "por otro lado",
        "asimismo", "en consecuencia", "de hecho", "en realidad", "por ejemplo", "es decir",
        "moreover", "however", "therefore", "nevertheless", "on the other hand", "in fact",
        "for example", "that is", "furthermore", "consequently",
    ])
});

/// General discourse connectives.
pub static CONNECTIVES: LazyLock<PhraseSet> = LazyLock::new(|| {
    PhraseSet::word_bounded(&[
        "además", "sin embargo", "por lo tanto", "en consecuencia", "por otro lado",
        "asimismo", "no obstante", "en cambio", "por ejemplo", "es decir",
        "también", "aunque", "mientras que", "a pesar de", "debido a",
        "puesto que", "ya que", "como resultado", "en particular", "específicamente",
        "also", "however", "therefore", "consequently", "on the other hand",
        "likewise", "nevertheless", "instead", "for example", "that is",
    ])
});

/// Stiff adverbs and connectives.
pub static FORMAL_ADVERBS: LazyLock<PhraseSet> = LazyLock::new(|| {
    PhraseSet::word_bounded(&[
        "adicionalmente", "consecuentemente", "subsecuentemente", "indudablemente", "evidentemente",
        "ciertamente", "considerablemente", "fundamentalmente", "primordialmente", "significativamente",
        "subsequently", "furthermore", "moreover", "nevertheless", "notwithstanding",
    ])
});

/// Formal adverbs plus formal multi-word connectives.
pub static FORMAL_EXPRESSIONS: LazyLock<PhraseSet> = LazyLock::new(|| {
    PhraseSet::word_bounded(&[
        "adicionalmente", "consecuentemente", "subsecuentemente", "indudablemente", "evidentemente",
        "ciertamente", "considerablemente", "fundamentalmente", "primordialmente", "significativamente",
        "en virtud de", "en función de", "en relación con", "en lo que respecta a", "en lo concerniente a",
        "cabe destacar que", "es menester", "es imperativo", "es preciso señalar", "es necesario enfatizar",
        "subsequently", "furthermore", "moreover", "nevertheless", "notwithstanding",
        "with regard to", "in relation to", "concerning the matter of", "it is imperative", "it must be emphasized",
    ])
});

pub static COLLOQUIAL_EXPRESSIONS: LazyLock<PhraseSet> = LazyLock::new(|| {
    PhraseSet::anywhere(&[
        "a lo mejor", "de vez en cuando", "dar en el clavo", "estar en las nubes",
        "meter la pata", "ponerse las pilas", "tirar la toalla", "echar una mano",
        "en un abrir y cerrar de ojos", "estar hasta las narices", "no tener ni idea",
        "once in a while", "piece of cake", "break a leg", "hang in there",
    ])
});

pub static IDIOMS: LazyLock<PhraseSet> = LazyLock::new(|| {
    PhraseSet::anywhere(&[
        "dar en el clavo", "estar en las nubes", "costar un ojo de la cara",
        "tomar el pelo", "ser pan comido", "estar como pez en el agua",
        "hit the nail on the head", "cost an arm and a leg", "piece of cake",
    ])
});

pub static SELF_CORRECTIONS: LazyLock<PhraseSet> = LazyLock::new(|| {
    PhraseSet::word_bounded(&[
        "quiero decir", "es decir", "mejor dicho", "o sea", "perdón", "corrijo", "rectificando",
        "I mean", "that is", "rather", "or rather", "sorry", "I meant",
    ])
});

/// First-person pronouns, opinion verbs and opinion phrases.
pub static FIRST_PERSON_MARKERS: LazyLock<PhraseSet> = LazyLock::new(|| {
    PhraseSet::word_bounded(&[
        "yo", "me", "mi", "conmigo", "nosotros", "nos", "nuestro",
        "I", "my", "mine", "we", "us", "our",
        "creo", "pienso", "opino", "siento", "recuerdo",
        "I think", "I believe", "I feel", "I remember",
        "en mi opinión", "desde mi punto de vista", "in my opinion", "from my perspective",
    ])
});

pub static PAST_TENSE: LazyLock<PhraseSet> = LazyLock::new(|| {
    PhraseSet::word_bounded(&[
        "fue", "fueron", "estuvo", "estuvieron", "hizo", "hicieron", "dijo", "dijeron",
        "was", "were", "did", "said",
    ])
});

pub static PRESENT_TENSE: LazyLock<PhraseSet> = LazyLock::new(|| {
    PhraseSet::word_bounded(&[
        "es", "son", "está", "están", "hace", "hacen", "dice", "dicen",
        "is", "are", "does", "do", "say",
    ])
});

pub static TEMPORAL_ADVERBS: LazyLock<PhraseSet> = LazyLock::new(|| {
    PhraseSet::word_bounded(&[
        "ahora", "antes", "después", "hoy", "ayer", "mañana", "actualmente", "previamente",
        "now", "before", "after", "today", "yesterday", "tomorrow", "currently", "previously",
    ])
});

pub static ANAPHORIC_PRONOUNS: LazyLock<PhraseSet> = LazyLock::new(|| {
    PhraseSet::word_bounded(&[
        "esto", "eso", "aquello", "él", "ella", "ellos", "ellas", "le", "les", "lo", "la", "los", "las",
        "su", "sus", "this", "that", "these", "those", "it", "they", "them", "their",
    ])
});

pub static CONCLUSION_MARKERS: LazyLock<PhraseSet> = LazyLock::new(|| {
    PhraseSet::word_bounded(&[
        "en conclusión", "para concluir", "en resumen", "en síntesis", "finalmente",
        "in conclusion", "to conclude", "in summary", "to summarize", "finally",
    ])
});

/// Function words ignored when looking for shared content between sentences.
pub const STOPWORDS: &[&str] = &[
    "el", "la", "los", "las", "un", "una", "unos", "unas", "y", "o", "a", "ante", "bajo", "con",
    "de", "desde", "en", "entre", "hacia", "hasta", "para", "por", "según", "sin", "sobre", "tras",
    "the", "a", "an", "and", "or", "to", "from", "with", "in", "on", "at", "by", "for",
];

// Closed-class lists for the coarse tagger. These are a heuristic, not a POS tagger.

pub const DETERMINERS: &[&str] = &["el", "la", "los", "las", "un", "una", "unos", "unas", "the", "a", "an"];

pub const CONJUNCTIONS: &[&str] = &[
    "y", "e", "o", "u", "pero", "mas", "sino", "because", "and", "or", "but", "yet", "so",
];

pub const PREPOSITIONS: &[&str] = &[
    "de", "del", "a", "al", "en", "por", "para", "con", "sin",
    "from", "to", "in", "by", "for", "with", "without",
];

pub const COPULAS: &[&str] = &[
    "es", "son", "está", "están", "fue", "fueron", "será", "serán", "is", "are", "was", "were", "will",
];

/// Frequent closed-class words used to guess the language.
pub const SPANISH_HINTS: &[&str] = &[
    "el", "la", "los", "las", "de", "del", "que", "y", "en", "es", "un", "una", "por", "con",
    "para", "se", "su", "al", "lo", "como", "más", "pero", "sus", "muy", "también", "son",
];

pub const ENGLISH_HINTS: &[&str] = &[
    "the", "of", "and", "to", "in", "is", "that", "it", "for", "with", "as", "was", "on", "are",
    "this", "by", "be", "or", "from", "at", "an", "but", "not", "very", "also", "have",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrase_set_respects_word_boundaries() {
        assert_eq!(CONNECTIVES.count("Además, esto también sirve."), 2);
        assert_eq!(PRESENT_TENSE.count("Esto describe algo"), 0);
        assert!(PAST_TENSE.any_match("Ayer FUE distinto"));
    }

    #[test]
    fn test_phrase_set_handles_accents() {
        assert_eq!(FORMAL_EXPRESSIONS.count("Cabe destacar que, indudablemente, funciona."), 2);
    }

    #[test]
    fn test_anywhere_matches_inside_longer_text() {
        assert_eq!(IDIOMS.count("Eso va a ser pan comido, ya verás."), 1);
    }

    #[test]
    fn test_overlapping_entries_each_count() {
        // "or rather" also contains "rather"
        assert_eq!(SELF_CORRECTIONS.count("It was blue, or rather green."), 2);
    }
}
