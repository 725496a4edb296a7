// Rewriter Module
// Tier-driven sentence rewriting organized into submodules:
// - catalog: Marker, idiom and synonym tables plus the rule catalog
// - transforms: The individual rewrite rules and string splicing

pub mod catalog;
pub mod transforms;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use tracing::debug;

use crate::models::{Classification, Language, RewriteResult, RuleKind, RuleTier, Sentence, SentenceRewrite};
use crate::services::config_store::HumanizerConfig;
use crate::services::sentence_segmenter::join_with_original_spacing;
use catalog::{rules_for, Rewrite, RewriteRule, RuleContext};
use transforms::{chance, pick};

pub use catalog::RULE_CATALOG;
pub use transforms::StructureTransform;

pub const AGGRESSIVE_THRESHOLD: f64 = 80.0;
pub const MODERATE_THRESHOLD: f64 = 60.0;

pub const ALREADY_HUMAN_MESSAGE: &str = "Text already reads as mostly human-written; no changes were applied.";
pub const NO_OPPORTUNITY_MESSAGE: &str = "No clear rewrite opportunities were found; the text was left unchanged.";

/// Tier for a sentence score: above 80 aggressive, 60 to 80 moderate,
/// 40 up to 60 minimal, below 40 untouched.
pub fn tier_for_score(score: f64) -> RuleTier {
    if score > AGGRESSIVE_THRESHOLD {
        RuleTier::Aggressive
    } else if score >= MODERATE_THRESHOLD {
        RuleTier::Moderate
    } else if score >= Classification::MIXED_THRESHOLD {
        RuleTier::Minimal
    } else {
        RuleTier::Untouched
    }
}

/// Rules to attempt for one sentence, in application order.
fn select_rules(tier: RuleTier, config: &HumanizerConfig, rng: &mut dyn RngCore) -> Vec<&'static RewriteRule> {
    match tier {
        RuleTier::Aggressive => rules_for(tier),
        RuleTier::Moderate => {
            let mut pool = rules_for(tier);
            pool.shuffle(rng);
            let take = rng.random_range(2..=3);
            pool.truncate(take);
            pool
        }
        RuleTier::Minimal => {
            if !chance(rng, config.minimal_probability) {
                return Vec::new();
            }
            pick(rng, &rules_for(tier)).into_iter().collect()
        }
        RuleTier::Untouched => Vec::new(),
    }
}

fn attempt(rule: &RewriteRule, original: &str, current: &str, ctx: &mut RuleContext<'_>) -> Option<Rewrite> {
    if (rule.applies)(original) {
        (rule.apply)(current, ctx)
    } else {
        None
    }
}

/// Apply the tier's rules to one sentence. Returns the new text and, for each
/// rule that fired, its kind and a short description.
///
/// Predicates are checked against the sentence as given, so an earlier
/// insertion never disqualifies a later rule. On the aggressive tier a rule
/// that finds nothing to do hands over to its fallbacks.
pub fn rewrite_sentence(
    sentence: &str,
    tier: RuleTier,
    language: Language,
    config: &HumanizerConfig,
    rng: &mut dyn RngCore,
) -> (String, Vec<(RuleKind, String)>) {
    let rules = select_rules(tier, config, rng);
    let mut ctx = RuleContext::new(rng, language, config.closing_phrase_probability);
    ctx.forced = tier == RuleTier::Aggressive;
    let mut current = sentence.to_string();
    let mut applied: Vec<(RuleKind, String)> = Vec::new();

    for rule in rules {
        let mut fired = attempt(rule, sentence, &current, &mut ctx).map(|r| (rule.kind, r));
        if fired.is_none() && ctx.forced {
            for &kind in rule.fallbacks {
                if applied.iter().any(|(k, _)| *k == kind) {
                    continue;
                }
                fired = attempt(catalog::rule(kind), sentence, &current, &mut ctx).map(|r| (kind, r));
                if fired.is_some() {
                    break;
                }
            }
        }
        if let Some((kind, rewrite)) = fired {
            applied.push((kind, rewrite.detail));
            current = rewrite.text;
        }
    }
    (current, applied)
}

/// Rewrite every sentence according to its score and reassemble the text
/// with the original spacing between sentences.
///
/// `scores` holds one aggregate score per entry of `sentences`.
pub fn rewrite(
    text: &str,
    sentences: &[Sentence],
    scores: &[f64],
    language: Language,
    config: &HumanizerConfig,
    rng: &mut dyn RngCore,
) -> RewriteResult {
    let mut parts = Vec::with_capacity(sentences.len());
    let mut records = Vec::with_capacity(sentences.len());
    let mut changes = Vec::new();

    for (sentence, &score) in sentences.iter().zip(scores) {
        let tier = tier_for_score(score);
        let (rewritten, applied) = rewrite_sentence(&sentence.text, tier, language, config, rng);
        debug!(
            "Sentence {} scored {:.0} ({:?}): {} rule(s) applied",
            sentence.index + 1,
            score,
            tier,
            applied.len()
        );

        changes.extend(
            applied
                .iter()
                .map(|(_, detail)| format!("Sentence {}: {}", sentence.index + 1, detail)),
        );
        records.push(SentenceRewrite {
            index: sentence.index,
            tier,
            original: sentence.text.clone(),
            rewritten: rewritten.clone(),
            rules: applied.into_iter().map(|(kind, _)| kind).collect(),
        });
        parts.push(rewritten);
    }

    let text = if changes.is_empty() {
        let all_untouched = records.iter().all(|r| r.tier == RuleTier::Untouched);
        changes.push(if all_untouched { ALREADY_HUMAN_MESSAGE } else { NO_OPPORTUNITY_MESSAGE }.to_string());
        text.to_string()
    } else {
        join_with_original_spacing(text, sentences, &parts)
    };

    RewriteResult {
        text,
        changes,
        sentences: records,
        seed: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::sentence_segmenter::split_sentences;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn run(text: &str, score: f64, config: &HumanizerConfig, seed: u64) -> RewriteResult {
        let sentences = split_sentences(text);
        let scores = vec![score; sentences.len()];
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rewrite(text, &sentences, &scores, Language::Spanish, config, &mut rng)
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(tier_for_score(81.0), RuleTier::Aggressive);
        assert_eq!(tier_for_score(80.0), RuleTier::Moderate);
        assert_eq!(tier_for_score(60.0), RuleTier::Moderate);
        assert_eq!(tier_for_score(59.9), RuleTier::Minimal);
        assert_eq!(tier_for_score(40.0), RuleTier::Minimal);
        assert_eq!(tier_for_score(39.9), RuleTier::Untouched);
        assert_eq!(tier_for_score(f64::NAN), RuleTier::Untouched);
    }

    #[test]
    fn test_low_scores_leave_text_unchanged() {
        let text = "Ayer fuimos al río.  Hacía un frío tremendo, la verdad.";
        let result = run(text, 20.0, &HumanizerConfig::default(), 9);
        assert_eq!(result.text, text);
        assert_eq!(result.changes, vec![ALREADY_HUMAN_MESSAGE.to_string()]);
        assert!(result.sentences.iter().all(|s| s.rules.is_empty()));
    }

    #[test]
    fn test_same_seed_same_output() {
        let text = "Además el resultado es muy fácil de obtener. El texto es claro y muy formal. Es necesario revisar el plan.";
        let config = HumanizerConfig::default();
        for score in [90.0, 70.0, 50.0] {
            assert_eq!(run(text, score, &config, 42), run(text, score, &config, 42));
        }
    }

    #[test]
    fn test_aggressive_tier_stacks_rules() {
        let text = "Además el resultado es muy fácil de obtener.";
        for seed in 0..20 {
            let result = run(text, 95.0, &HumanizerConfig::default(), seed);
            let record = &result.sentences[0];
            assert_eq!(record.tier, RuleTier::Aggressive);
            assert!(record.rules.len() >= 4, "seed {}: {:?}", seed, record);
            assert!(record.rules.contains(&RuleKind::IdiomSubstitution));
            assert!(record.rules.contains(&RuleKind::LexicalVariation));
            assert!(result.text.contains("pan comido"));
            assert_eq!(result.changes.len(), record.rules.len());
        }
    }

    #[test]
    fn test_aggressive_tier_reaches_four_rules_on_plain_sentences() {
        let config = HumanizerConfig::default();
        let cases = [
            (Language::Spanish, "El sistema procesa los datos cada día."),
            (Language::Spanish, "Los alumnos leen sus libros en la biblioteca."),
            (Language::Spanish, "El sistema procesa\nlos datos   de forma muy eficiente cada día."),
            (Language::English, "The system processes the data every day."),
            (Language::English, "Our team reviews each report before lunch."),
        ];
        for (language, sentence) in cases {
            let starts: Vec<&str> = catalog::discourse_markers(language)
                .iter()
                .filter(|m| m.position == catalog::MarkerPosition::Start)
                .map(|m| m.text)
                .collect();
            for seed in 0..60 {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let (text, applied) = rewrite_sentence(sentence, RuleTier::Aggressive, language, &config, &mut rng);
                let kinds: Vec<RuleKind> = applied.iter().map(|(k, _)| *k).collect();
                assert!(kinds.len() >= 4, "seed {}: {:?} -> {}", seed, kinds, text);
                assert_eq!(kinds[0], RuleKind::DiscourseMarker);
                assert!(starts.iter().any(|m| text.starts_with(m)), "seed {}: {}", seed, text);
                let mut unique = kinds.clone();
                unique.sort_by_key(|k| *k as u8);
                unique.dedup();
                assert_eq!(unique.len(), kinds.len());
                if sentence.contains('\n') {
                    assert!(text.contains("procesa\nlos"), "seed {}: {}", seed, text);
                }
            }
        }
    }

    #[test]
    fn test_moderate_tier_applies_at_most_three() {
        let text = "Además el resultado es muy fácil de obtener.";
        for seed in 0..20 {
            let result = run(text, 70.0, &HumanizerConfig::default(), seed);
            let rules = &result.sentences[0].rules;
            assert!(rules.len() <= 3);
            let mut unique = rules.clone();
            unique.dedup();
            assert_eq!(unique.len(), rules.len());
        }
    }

    #[test]
    fn test_minimal_tier_applies_at_most_one() {
        let text = "Hace mucho frío hoy en la ciudad.";
        let mut never = HumanizerConfig::default();
        never.minimal_probability = 0.0;
        let result = run(text, 50.0, &never, 1);
        assert_eq!(result.text, text);
        assert_eq!(result.changes, vec![NO_OPPORTUNITY_MESSAGE.to_string()]);

        let mut always = HumanizerConfig::default();
        always.minimal_probability = 1.0;
        for seed in 0..20 {
            let result = run(text, 50.0, &always, seed);
            let rules = &result.sentences[0].rules;
            assert!(rules.len() <= 1);
            assert!(rules.iter().all(|k| *k != RuleKind::StructuralVariation && *k != RuleKind::LexicalVariation));
        }
    }

    #[test]
    fn test_spacing_between_sentences_is_kept() {
        let text = "Además el plan es muy fácil.\n\nEl texto es claro y muy formal.";
        let result = run(text, 95.0, &HumanizerConfig::default(), 3);
        assert_eq!(result.text.matches("\n\n").count(), 1);
        assert_eq!(result.sentences.len(), 2);
        assert!(result.text.starts_with(&result.sentences[0].rewritten));
        assert!(result.text.ends_with(&result.sentences[1].rewritten));
    }
}
