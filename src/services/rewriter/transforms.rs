// Sentence Transforms
// The rewrite rules and the string helpers they share

use rand::Rng;
use regex::{Match, Regex};
use std::sync::OnceLock;

use super::catalog::{self, Marker, MarkerPosition, PhraseEntry, Rewrite, RuleContext};
use crate::models::Language;

const TERMINALS: &[char] = &['.', '!', '?', '…'];
const OPENING_MARKS: &[char] = &['¿', '¡'];

/// Middle insertions need a real midpoint.
const MIN_WORDS_FOR_MIDDLE: usize = 4;
const MIN_WORDS_FOR_INVERSION: usize = 6;

fn declarative_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\p{Lu}[^.!?]*[.!?]$").expect("declarative regex"))
}

/// Split a sentence into its body and trailing terminal punctuation.
pub fn split_terminal(sentence: &str) -> (&str, &str) {
    let body = sentence.trim_end_matches(TERMINALS);
    (body, &sentence[body.len()..])
}

/// Lowercase the first letter, looking past an opening `¿` or `¡`, unless it
/// starts an acronym or is the English "I".
pub fn lowercase_first(text: &str) -> String {
    let rest = text.trim_start_matches(OPENING_MARKS);
    let marks = &text[..text.len() - rest.len()];
    let mut chars = rest.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {
            let tail = chars.as_str();
            let acronym = tail.starts_with(char::is_uppercase);
            let pronoun_i = first == 'I' && !tail.starts_with(char::is_alphanumeric);
            if acronym || pronoun_i {
                text.to_string()
            } else {
                format!("{}{}{}", marks, first.to_lowercase(), tail)
            }
        }
        _ => text.to_string(),
    }
}

pub fn uppercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Bernoulli draw that treats out-of-range probabilities as their nearest bound.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    if !probability.is_finite() || probability <= 0.0 {
        return false;
    }
    rng.random_bool(probability.min(1.0))
}

pub fn pick<T: Copy, R: Rng + ?Sized>(rng: &mut R, items: &[T]) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[rng.random_range(0..items.len())])
    }
}

/// Byte spans of the whitespace-separated words in `text`.
pub fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

/// Where the start marker ends; 0 when `prefix_len` is not a valid offset.
fn core_start(sentence: &str, prefix_len: usize) -> usize {
    if sentence.is_char_boundary(prefix_len) {
        prefix_len
    } else {
        0
    }
}

/// Byte offset just after the middle word of `sentence[from..]`, when that
/// part has enough words to have a midpoint.
fn middle_split(sentence: &str, from: usize) -> Option<usize> {
    let spans = word_spans(sentence.get(from..)?);
    if spans.len() < MIN_WORDS_FOR_MIDDLE {
        return None;
    }
    Some(from + spans[spans.len() / 2 - 1].1)
}

fn replace_match(sentence: &str, found: Match<'_>, replacement: &str) -> String {
    let replacement = if found.as_str().starts_with(char::is_uppercase) {
        uppercase_first(replacement)
    } else {
        replacement.to_string()
    };
    format!("{}{}{}", &sentence[..found.start()], replacement, &sentence[found.end()..])
}

/// First table entry, in table order, found after the start marker.
fn find_phrase<'s, T: Copy>(
    sentence: &'s str,
    table: &[PhraseEntry<T>],
    ctx: &RuleContext<'_>,
) -> Option<(Match<'s>, T)> {
    let from = core_start(sentence, ctx.prefix_len);
    table
        .iter()
        .find_map(|entry| entry.pattern.find_at(sentence, from).map(|found| (found, entry.value)))
}

fn starts_with_opening_mark(sentence: &str) -> bool {
    sentence.starts_with(OPENING_MARKS)
}

fn marker_fits(marker: Marker, sentence: &str, ctx: &RuleContext<'_>) -> bool {
    match marker.position {
        MarkerPosition::Start => !ctx.start_taken && !starts_with_opening_mark(sentence),
        MarkerPosition::Middle => {
            !ctx.middle_taken && middle_split(sentence, core_start(sentence, ctx.prefix_len)).is_some()
        }
        MarkerPosition::End => {
            // tag questions replace a plain full stop only
            !ctx.end_taken && (!marker.text.ends_with(['?', '!']) || split_terminal(sentence).1 == ".")
        }
    }
}

fn choose_marker(sentence: &str, markers: &[Marker], ctx: &mut RuleContext<'_>) -> Option<Marker> {
    let mut candidates: Vec<Marker> = markers
        .iter()
        .copied()
        .filter(|m| marker_fits(*m, sentence, ctx))
        .collect();
    if ctx.forced && candidates.iter().any(|m| m.position == MarkerPosition::Start) {
        candidates.retain(|m| m.position == MarkerPosition::Start);
    }
    let marker = pick(ctx.rng, &candidates)?;
    match marker.position {
        MarkerPosition::Start => {
            ctx.start_taken = true;
            ctx.prefix_len = marker.text.len();
        }
        MarkerPosition::Middle => ctx.middle_taken = true,
        MarkerPosition::End => ctx.end_taken = true,
    }
    Some(marker)
}

/// Insert a marker at its position. Middle markers go after the middle word
/// of the text following `from`. End markers that carry their own question
/// or exclamation mark replace the sentence terminal.
pub fn insert_marker(sentence: &str, from: usize, marker: Marker) -> Option<String> {
    match marker.position {
        MarkerPosition::Start => Some(format!("{}{}", marker.text, lowercase_first(sentence))),
        MarkerPosition::Middle => {
            let at = middle_split(sentence, from)?;
            let head = sentence[..at].trim_end_matches(',');
            Some(format!("{}{}{}", head, marker.text.trim_end(), &sentence[at..]))
        }
        MarkerPosition::End => {
            let (body, terminal) = split_terminal(sentence);
            let body = body.trim_end_matches(',');
            if marker.text.ends_with(['?', '!']) {
                Some(format!("{}{}", body, marker.text))
            } else {
                Some(format!("{}{}{}", body, marker.text, terminal))
            }
        }
    }
}

fn marker_label(marker: Marker) -> &'static str {
    marker.text.trim_matches(|c: char| c == ',' || c.is_whitespace())
}

fn apply_marker(sentence: &str, markers: &[Marker], ctx: &mut RuleContext<'_>) -> Option<(Marker, String)> {
    let from = core_start(sentence, ctx.prefix_len);
    let marker = choose_marker(sentence, markers, ctx)?;
    insert_marker(sentence, from, marker).map(|text| (marker, text))
}

pub fn add_discourse_marker(sentence: &str, ctx: &mut RuleContext<'_>) -> Option<Rewrite> {
    let (marker, text) = apply_marker(sentence, catalog::discourse_markers(ctx.language), ctx)?;
    Some(Rewrite {
        text,
        detail: format!("added discourse marker \"{}\"", marker_label(marker)),
    })
}

/// A capitalized sentence with a single terminal and no internal comma.
pub fn is_simple_declarative(sentence: &str) -> bool {
    declarative_re().is_match(sentence) && !sentence.contains(',')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureTransform {
    Emphatic,
    RhetoricalQuestion,
    ClauseInversion,
}

impl StructureTransform {
    pub const ALL: [StructureTransform; 3] = [
        StructureTransform::Emphatic,
        StructureTransform::RhetoricalQuestion,
        StructureTransform::ClauseInversion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StructureTransform::Emphatic => "emphatic exclamation",
            StructureTransform::RhetoricalQuestion => "rhetorical question",
            StructureTransform::ClauseInversion => "clause inversion",
        }
    }

    /// Deterministic rewrite; `None` when the sentence is too short for it.
    /// Clause inversion swaps the halves at the middle word boundary and
    /// keeps the spacing inside each half.
    pub fn apply(self, sentence: &str, language: Language) -> Option<String> {
        let (body, terminal) = split_terminal(sentence);
        match (self, language) {
            (StructureTransform::Emphatic, Language::Spanish) => Some(format!("¡{}!", body)),
            (StructureTransform::Emphatic, Language::English) => Some(format!("{}!", body)),
            (StructureTransform::RhetoricalQuestion, Language::Spanish) => Some(format!("¿{}?", body)),
            (StructureTransform::RhetoricalQuestion, Language::English) => {
                Some(format!("Isn't it true that {}?", lowercase_first(body)))
            }
            (StructureTransform::ClauseInversion, _) => {
                let spans = word_spans(body);
                if spans.len() < MIN_WORDS_FOR_INVERSION {
                    return None;
                }
                let mid = spans.len() / 2;
                let head = body[..spans[mid - 1].1].trim_end_matches(',');
                let tail = &body[spans[mid].0..];
                Some(format!("{}, {}{}", uppercase_first(tail), lowercase_first(head), terminal))
            }
        }
    }
}

/// Restructure the text after any start marker, which stays in place.
/// Gives up once the end was used, and skips clause inversion once the
/// midpoint was used.
pub fn vary_structure(sentence: &str, ctx: &mut RuleContext<'_>) -> Option<Rewrite> {
    if ctx.end_taken {
        return None;
    }
    let (prefix, core) = sentence.split_at(core_start(sentence, ctx.prefix_len));
    let core = uppercase_first(core);
    if !declarative_re().is_match(&core) {
        return None;
    }
    let mut options: Vec<(StructureTransform, String)> = StructureTransform::ALL
        .iter()
        .filter(|&&t| !(t == StructureTransform::ClauseInversion && ctx.middle_taken))
        .filter_map(|&t| t.apply(&core, ctx.language).map(|text| (t, text)))
        .collect();
    if options.is_empty() {
        return None;
    }
    let (transform, text) = options.swap_remove(ctx.rng.random_range(0..options.len()));
    ctx.start_taken = true;
    let text = if prefix.is_empty() {
        text
    } else {
        format!("{}{}", prefix, lowercase_first(&text))
    };
    Some(Rewrite {
        text,
        detail: format!("restructured as {}", transform.name()),
    })
}

/// Swap a plain phrase for an idiom, or failing that, append a colloquial
/// closing phrase. Outside the aggressive tier the closing phrase is a
/// random draw.
pub fn substitute_idiom(sentence: &str, ctx: &mut RuleContext<'_>) -> Option<Rewrite> {
    if let Some((found, idiom)) = find_phrase(sentence, catalog::idiom_table(ctx.language), ctx) {
        return Some(Rewrite {
            text: replace_match(sentence, found, idiom),
            detail: format!("replaced \"{}\" with the idiom \"{}\"", found.as_str(), idiom),
        });
    }

    let (body, terminal) = split_terminal(sentence);
    if ctx.end_taken || !matches!(terminal, "." | "!") {
        return None;
    }
    if !ctx.forced && !chance(ctx.rng, ctx.closing_probability) {
        return None;
    }
    let phrase = pick(ctx.rng, catalog::closing_phrases(ctx.language))?;
    ctx.end_taken = true;
    Some(Rewrite {
        text: format!("{}{}{}", body.trim_end_matches(','), phrase, terminal),
        detail: format!("added closing phrase \"{}\"", phrase.trim_start_matches(", ")),
    })
}

/// Replace the first formal phrase with a randomly chosen plainer variant.
pub fn increase_lexical_variety(sentence: &str, ctx: &mut RuleContext<'_>) -> Option<Rewrite> {
    let (found, variants) = find_phrase(sentence, catalog::variant_table(ctx.language), ctx)?;
    let replacement = pick(ctx.rng, variants)?;
    Some(Rewrite {
        text: replace_match(sentence, found, replacement),
        detail: format!("replaced \"{}\" with \"{}\"", found.as_str(), replacement),
    })
}

pub fn add_first_person_framing(sentence: &str, ctx: &mut RuleContext<'_>) -> Option<Rewrite> {
    let (marker, text) = apply_marker(sentence, catalog::personal_markers(ctx.language), ctx)?;
    Some(Rewrite {
        text,
        detail: format!("added first-person framing \"{}\"", marker_label(marker)),
    })
}

/// Splice a parenthetical aside after the middle word, before any comma there.
pub fn add_personal_aside(sentence: &str, ctx: &mut RuleContext<'_>) -> Option<Rewrite> {
    if ctx.middle_taken {
        return None;
    }
    let at = middle_split(sentence, core_start(sentence, ctx.prefix_len))?;
    let aside = pick(ctx.rng, catalog::personal_asides(ctx.language))?;
    let head = sentence[..at].trim_end_matches(',');
    ctx.middle_taken = true;
    Some(Rewrite {
        text: format!("{}{}{}", head, aside, &sentence[head.len()..]),
        detail: format!("added personal aside \"{}\"", aside.trim()),
    })
}

/// Reach an opinion verb through a spoken self-correction.
pub fn add_self_correction(sentence: &str, ctx: &mut RuleContext<'_>) -> Option<Rewrite> {
    let (found, corrected) = find_phrase(sentence, catalog::correction_table(ctx.language), ctx)?;
    Some(Rewrite {
        text: replace_match(sentence, found, corrected),
        detail: format!("self-corrected \"{}\"", found.as_str()),
    })
}

pub fn shift_emphasis(sentence: &str, ctx: &mut RuleContext<'_>) -> Option<Rewrite> {
    let (found, emphatic) = find_phrase(sentence, catalog::emphasis_table(ctx.language), ctx)?;
    Some(Rewrite {
        text: replace_match(sentence, found, emphatic),
        detail: format!("emphasized \"{}\" as \"{}\"", found.as_str(), emphatic),
    })
}
