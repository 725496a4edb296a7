use prose_lens_lib::models::{Classification, HumanizeOptions, Metric, MetricSet};
use prose_lens_lib::services::config_store::{HumanizerConfig, MetricWeights};
use prose_lens_lib::services::detection::aggregate_score;
use prose_lens_lib::services::rewriter::ALREADY_HUMAN_MESSAGE;
use prose_lens_lib::{analyze, humanize, humanize_with_rng, AnalysisError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const REPETITIVE: &str = "El texto es claro y muy formal. El texto es simple y muy correcto. \
El texto es breve y muy preciso. El texto también es neutro y muy sencillo. \
El texto también es largo y muy uniforme. El texto es estable y muy ordenado. \
El texto es limpio y muy completo. El texto finalmente es sobrio y muy correcto.";

#[test]
fn repetitive_paragraph_reads_as_machine_written() {
    let analysis = analyze(REPETITIVE).unwrap();
    let repetition = analysis.overall.metrics.get(Metric::RepetitivePatterns).unwrap();
    assert!(repetition > 50.0, "repetitivePatterns = {}", repetition);
    assert!(matches!(
        analysis.overall.label,
        Classification::MostlyAi | Classification::Ai
    ));
    assert_eq!(analysis.sentence_count, 8);
    assert!(!analysis.low_confidence);
}

const FORMAL_REPORT: &str = "El texto es claro y presenta las ideas de forma significativamente ordenada. \
El texto también es preciso y presenta los datos en relación con el tema central. \
El texto es formal y presenta los argumentos de forma considerablemente ordenada. \
El texto también es breve y presenta las conclusiones en relación con el tema central. \
El texto es neutro y presenta los ejemplos de forma fundamentalmente ordenada. \
El texto también es correcto y presenta las fuentes en relación con el tema central. \
El texto es estable y presenta los resultados de forma evidentemente ordenada. \
El texto también es sencillo y presenta las tablas en relación con el tema central. \
El texto es completo y presenta las citas de forma ciertamente ordenada. \
El texto finalmente es coherente y presenta el resumen en relación con el tema central.";

#[test]
fn longer_formal_report_reads_as_machine_written_and_gets_rewritten() {
    let analysis = analyze(FORMAL_REPORT).unwrap();
    assert_eq!(analysis.sentence_count, 10);
    let repetition = analysis.overall.metrics.get(Metric::RepetitivePatterns).unwrap();
    assert!(repetition > 50.0, "repetitivePatterns = {}", repetition);
    assert!(
        matches!(analysis.overall.label, Classification::MostlyAi | Classification::Ai),
        "score {} ({:?})",
        analysis.overall.ai_probability,
        analysis.overall.label
    );

    let result = humanize(FORMAL_REPORT, &analysis, &HumanizeOptions { seed: Some(17) }).unwrap();
    assert_ne!(result.text, FORMAL_REPORT);
    assert_eq!(result.sentences.len(), 10);
    assert_eq!(analyze(&result.text).unwrap().sentence_count, 10);
}

#[test]
fn mostly_human_text_is_not_rewritten_even_with_a_suspect_sentence() {
    let mut analysis = analyze(REPETITIVE).unwrap();
    analysis.overall.ai_probability = 30.0;
    analysis.overall.label = Classification::from_score(30.0);
    for sentence in &mut analysis.sentences {
        sentence.result.ai_probability = 20.0;
    }
    analysis.sentences[3].result.ai_probability = 65.0;

    let result = humanize(REPETITIVE, &analysis, &HumanizeOptions { seed: Some(1) }).unwrap();
    assert_eq!(result.text, REPETITIVE);
    assert_eq!(result.changes, vec![ALREADY_HUMAN_MESSAGE.to_string()]);
}

#[test]
fn abbreviations_do_not_split_sentences() {
    let analysis = analyze("El Dr. Pérez llegó tarde. Se disculpó.").unwrap();
    assert_eq!(analysis.sentence_count, 2);
    assert_eq!(analysis.sentences[0].text, "El Dr. Pérez llegó tarde.");
}

#[test]
fn sentence_offsets_point_into_the_text() {
    let text = "Primera idea.  Segunda idea, más larga!\n¿Tercera?";
    let analysis = analyze(text).unwrap();
    let mut rebuilt = String::new();
    let mut cursor = 0;
    for sentence in &analysis.sentences {
        rebuilt.push_str(&text[cursor..sentence.start]);
        rebuilt.push_str(&sentence.text);
        cursor = sentence.end;
    }
    rebuilt.push_str(&text[cursor..]);
    assert_eq!(rebuilt, text);
}

#[test]
fn metrics_stay_in_bounds_for_odd_inputs() {
    let long = "palabra ".repeat(12_500);
    for text in ["a", "¿?", "1 2 3", "Sí.", long.as_str()] {
        let analysis = analyze(text).unwrap();
        for (metric, value) in analysis.overall.metrics.iter() {
            assert!(value.is_finite() && (0.0..=100.0).contains(&value), "{:?} = {}", metric, value);
        }
        for sentence in &analysis.sentences {
            assert!((0.0..=100.0).contains(&sentence.result.ai_probability));
        }
    }
}

#[test]
fn more_repetition_never_lowers_the_score() {
    let weights = MetricWeights::document_default();
    let base = MetricSet::from_scores(Metric::ALL.iter().map(|&m| (m, 55.0)));
    let low = aggregate_score(&base.with_score(Metric::RepetitivePatterns, 10.0), &weights);
    let high = aggregate_score(&base.with_score(Metric::RepetitivePatterns, 90.0), &weights);
    assert!(high >= low);
}

#[test]
fn fixed_seed_gives_identical_rewrites() {
    let analysis = analyze(REPETITIVE).unwrap();
    let options = HumanizeOptions { seed: Some(2024) };
    let first = humanize(REPETITIVE, &analysis, &options).unwrap();
    for _ in 0..3 {
        assert_eq!(humanize(REPETITIVE, &analysis, &options).unwrap().text, first.text);
    }
    assert_ne!(first.text, REPETITIVE);
    let applied: usize = first.sentences.iter().map(|s| s.rules.len()).sum();
    assert_eq!(first.changes.len(), applied);
    assert!(first.changes.iter().all(|c| c.starts_with("Sentence ")));
}

#[test]
fn human_scored_sentences_are_left_alone() {
    let mut analysis = analyze(REPETITIVE).unwrap();
    for sentence in &mut analysis.sentences {
        sentence.result.ai_probability = 25.0;
    }
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let result = humanize_with_rng(REPETITIVE, &analysis, &HumanizerConfig::default(), &mut rng).unwrap();
    assert_eq!(result.text, REPETITIVE);
    assert_eq!(result.changes, vec![ALREADY_HUMAN_MESSAGE.to_string()]);
}

#[test]
fn boundary_errors_are_reported() {
    assert!(matches!(analyze(""), Err(AnalysisError::InvalidInput(_))));

    let mut analysis = analyze(REPETITIVE).unwrap();
    analysis.sentences.remove(0);
    let err = humanize(REPETITIVE, &analysis, &HumanizeOptions::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::SentenceMismatch(_)));
}

#[test]
fn analysis_serializes_with_camel_case_fields() {
    let analysis = analyze(REPETITIVE).unwrap();
    let json = serde_json::to_value(&analysis).unwrap();
    assert!(json.get("aiProbability").is_some());
    assert!(json.get("sentenceCount").is_some());
    assert!(json["metrics"].get("repetitivePatterns").is_some());
    assert!(json["sentences"][0].get("highlight").is_some());
}
