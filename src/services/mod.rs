// proseLens Core Services

pub mod text_processor;
pub mod config_store;
pub mod detection;
pub mod rewriter;
pub mod sentence_segmenter;

pub use text_processor::*;
pub use config_store::*;
pub use sentence_segmenter::*;

// Re-export detection and rewriting entry points
pub use detection::{
    aggregate,
    aggregate_score,
    build_sentence_analyses,
    compute_metric,
    compute_metric_set,
    compute_sentence_metric_set,
    explain,
    make_sentence_analysis,
    metric_score,
};
pub use rewriter::{rewrite, rewrite_sentence, tier_for_score};
