// Detection Module
// Heuristic AI-likeness scoring organized into specialized submodules:
// - lexicon: Static word and phrase catalogs
// - lexical / structural / discourse: Metric families
// - metric_engine: Computes metric sets for documents and sentences
// - aggregation: Weighted score and classification
// - segment_builder: Per-sentence analyses
// - explanations: Summary, interpretations and recommendations

pub mod lexicon;
pub mod lexical;
pub mod structural;
pub mod discourse;
pub mod metric_engine;
pub mod aggregation;
pub mod segment_builder;
pub mod explanations;

// Re-export commonly used functions
pub use metric_engine::{
    compute_metric,
    compute_metric_set,
    compute_sentence_metric_set,
    metric_score,
    Document,
};
pub use aggregation::{aggregate, aggregate_score};
pub use segment_builder::{build_sentence_analyses, make_sentence_analysis};
pub use explanations::explain;
pub use structural::{tag_pattern, CoarseTag};
