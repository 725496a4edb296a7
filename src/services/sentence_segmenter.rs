// Sentence Segmenter
// Punctuation-driven sentence splitting with abbreviation masking.
// Spans are trimmed and carry byte offsets into the source text.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::models::Sentence;
use crate::services::text_processor::tokenize;

const TERMINALS: &[char] = &['.', '!', '?', '…'];
const CLOSERS: &[char] = &['"', '”', '’', '\'', '»', ')', ']'];
const OPENERS: &[char] = &['¿', '¡', '"', '“', '‘', '\'', '«', '(', '['];

fn abbreviation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?:\b[A-Za-z]\.){2,}|\b(?:Sra|Srta|Sr|Dra|Dr|Prof|Lic|Ing|Mrs|Mr|Ms|Jr|St|vs|etc)\.|\bp\. ej\.|\b[A-Za-z]+\.[A-Za-z]+\.",
        )
        .expect("abbreviation regex")
    })
}

/// Byte positions of periods that belong to abbreviations.
fn masked_periods(text: &str) -> HashSet<usize> {
    let mut masked = HashSet::new();
    for m in abbreviation_re().find_iter(text) {
        for (offset, c) in m.as_str().char_indices() {
            if c == '.' {
                masked.insert(m.start() + offset);
            }
        }
    }
    masked
}

/// Whitespace, then optional opening marks, then an uppercase letter.
fn starts_new_sentence(rest: &[(usize, char)]) -> bool {
    let mut k = 0;
    while k < rest.len() && rest[k].1.is_whitespace() {
        k += 1;
    }
    if k == 0 {
        return false;
    }
    while k < rest.len() && OPENERS.contains(&rest[k].1) {
        k += 1;
    }
    rest.get(k).is_some_and(|&(_, c)| c.is_uppercase())
}

fn push_span(text: &str, start: usize, end: usize, spans: &mut Vec<(usize, usize)>) {
    let slice = &text[start..end];
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return;
    }
    let s = start + (slice.len() - slice.trim_start().len());
    spans.push((s, s + trimmed.len()));
}

fn sentence_spans(text: &str) -> Vec<(usize, usize)> {
    let masked = masked_periods(text);
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let byte_at = |idx: usize| chars.get(idx).map_or(text.len(), |&(pos, _)| pos);

    let mut spans = Vec::new();
    let mut segment_start = 0usize;
    let mut i = 0usize;
    while i < chars.len() {
        let (pos, c) = chars[i];
        let terminal = matches!(c, '!' | '?' | '…') || (c == '.' && !masked.contains(&pos));
        if !terminal {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        while j < chars.len() && TERMINALS.contains(&chars[j].1) {
            j += 1;
        }
        while j < chars.len() && CLOSERS.contains(&chars[j].1) {
            j += 1;
        }
        if starts_new_sentence(&chars[j..]) {
            let end = byte_at(j);
            push_span(text, segment_start, end, &mut spans);
            segment_start = end;
        }
        i = j;
    }
    push_span(text, segment_start, text.len(), &mut spans);
    spans
}

/// Split `text` into sentences. Empty or whitespace-only input yields no sentences.
pub fn split_sentences(text: &str) -> Vec<Sentence> {
    sentence_spans(text)
        .into_iter()
        .enumerate()
        .map(|(index, (start, end))| {
            let body = &text[start..end];
            Sentence {
                index,
                text: body.to_string(),
                start,
                end,
                tokens: tokenize(body, start),
            }
        })
        .collect()
}

/// Rebuild a document from per-sentence replacements, keeping the original
/// text between and around the sentence spans.
pub fn join_with_original_spacing<S: AsRef<str>>(text: &str, sentences: &[Sentence], parts: &[S]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;
    for (sentence, part) in sentences.iter().zip(parts) {
        if sentence.start >= cursor && sentence.end <= text.len() {
            out.push_str(&text[cursor..sentence.start]);
            cursor = sentence.end;
        }
        out.push_str(part.as_ref());
    }
    if cursor <= text.len() {
        out.push_str(&text[cursor..]);
    }
    out
}
