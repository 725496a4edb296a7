// Configuration Storage Service
// Handles config file read/write and version backup

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::Metric;

const BACKUPS_TO_KEEP: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("no platform config directory available")]
    NoConfigDir,
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ConfigError + '_ {
    move |source| ConfigError::Io { path: path.to_path_buf(), source }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub humanizer: HumanizerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            analysis: AnalysisConfig::default(),
            humanizer: HumanizerConfig::default(),
        }
    }
}

/// Weight per metric. Missing metrics weigh zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricWeights(BTreeMap<Metric, f64>);

impl MetricWeights {
    pub fn new<I>(weights: I) -> Self
    where
        I: IntoIterator<Item = (Metric, f64)>,
    {
        Self(weights.into_iter().collect())
    }

    /// Whole-document weighting.
    pub fn document_default() -> Self {
        Self::new([
            (Metric::Perplexity, 0.10),
            (Metric::Burstiness, 0.10),
            (Metric::Entropy, 0.10),
            (Metric::Coherence, 0.05),
            (Metric::LexicalVariety, 0.10),
            (Metric::Fluency, 0.10),
            (Metric::Relevance, 0.05),
            (Metric::RepetitivePatterns, 0.10),
            (Metric::Naturalness, 0.15),
            (Metric::TransitionAbruptness, 0.05),
            (Metric::ExcessiveFormality, 0.10),
        ])
    }

    /// Single-sentence weighting. Coherence, relevance, lexical variety and
    /// transition abruptness need several sentences or words and are left out.
    pub fn sentence_default() -> Self {
        Self::new([
            (Metric::Perplexity, 0.15),
            (Metric::Burstiness, 0.15),
            (Metric::Entropy, 0.15),
            (Metric::Fluency, 0.10),
            (Metric::RepetitivePatterns, 0.15),
            (Metric::Naturalness, 0.15),
            (Metric::ExcessiveFormality, 0.15),
        ])
    }

    pub fn get(&self, metric: Metric) -> f64 {
        self.0.get(&metric).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, metric: Metric, weight: f64) {
        self.0.insert(metric, weight);
    }

    /// Usable weights: finite and strictly positive.
    pub fn positive(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.0
            .iter()
            .map(|(m, w)| (*m, *w))
            .filter(|(_, w)| w.is_finite() && *w > 0.0)
    }

    pub fn total(&self) -> f64 {
        self.positive().map(|(_, w)| w).sum()
    }
}

/// Sub-score weights inside the composite metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricTuning {
    pub variance_weight: f64,
    pub bigram_weight: f64,
    pub frequency_entropy_weight: f64,
    pub unigram_entropy_weight: f64,
    pub trigram_entropy_weight: f64,
    pub ttr_weight: f64,
    pub mtld_weight: f64,
    pub hapax_weight: f64,
    pub mtld_threshold: f64,
}

impl Default for MetricTuning {
    fn default() -> Self {
        Self {
            variance_weight: 0.3,
            bigram_weight: 0.4,
            frequency_entropy_weight: 0.3,
            unigram_entropy_weight: 0.6,
            trigram_entropy_weight: 0.4,
            ttr_weight: 0.3,
            mtld_weight: 0.4,
            hapax_weight: 0.3,
            mtld_threshold: 0.72,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    #[serde(default = "MetricWeights::document_default")]
    pub weights: MetricWeights,
    #[serde(default = "MetricWeights::sentence_default")]
    pub sentence_weights: MetricWeights,
    #[serde(default)]
    pub tuning: MetricTuning,
    /// Texts shorter than this many characters are flagged low-confidence.
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            weights: MetricWeights::document_default(),
            sentence_weights: MetricWeights::sentence_default(),
            tuning: MetricTuning::default(),
            min_chars: default_min_chars(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanizerConfig {
    /// Chance that a minimal-tier sentence gets its single rule.
    #[serde(default = "default_minimal_probability")]
    pub minimal_probability: f64,
    #[serde(default = "default_closing_probability")]
    pub closing_phrase_probability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for HumanizerConfig {
    fn default() -> Self {
        Self {
            minimal_probability: default_minimal_probability(),
            closing_phrase_probability: default_closing_probability(),
            seed: None,
        }
    }
}

fn default_version() -> String { env!("CARGO_PKG_VERSION").to_string() }
fn default_min_chars() -> usize { 100 }
fn default_minimal_probability() -> f64 { 0.5 }
fn default_closing_probability() -> f64 { 0.3 }

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Store rooted at the platform config directory.
    pub fn open_default() -> Result<Self, ConfigError> {
        Self::default_config_dir()
            .map(Self::new)
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("proseLens"))
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.config_dir).map_err(io_err(&self.config_dir))
    }

    /// Load configuration from file; a missing file yields the defaults.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file).map_err(io_err(&self.config_file))?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: self.config_file.clone(),
            source,
        })
    }

    /// Save configuration to file
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        self.ensure_dir()?;

        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config)?;

        fs::write(&self.config_file, content).map_err(io_err(&self.config_file))
    }

    fn create_backup(&self) -> Result<(), ConfigError> {
        let backup_dir = self.config_dir.join("backups");
        fs::create_dir_all(&backup_dir).map_err(io_err(&backup_dir))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S%.3f");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));

        fs::copy(&self.config_file, &backup_file).map_err(io_err(&backup_file))?;

        self.cleanup_old_backups(&backup_dir, BACKUPS_TO_KEEP)
    }

    /// Remove old backups, keeping only the most recent `keep`
    fn cleanup_old_backups(&self, backup_dir: &Path, keep: usize) -> Result<(), ConfigError> {
        let mut entries: Vec<PathBuf> = fs::read_dir(backup_dir)
            .map_err(io_err(backup_dir))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();

        if entries.len() <= keep {
            return Ok(());
        }

        // Timestamped names sort chronologically
        entries.sort();

        for path in entries.iter().take(entries.len() - keep) {
            let _ = fs::remove_file(path);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.analysis.min_chars, 100);
        assert_eq!(config.humanizer.minimal_probability, 0.5);
        assert!(config.humanizer.seed.is_none());
        assert!((config.analysis.weights.total() - 1.0).abs() < 1e-9);
        assert!((config.analysis.sentence_weights.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{"analysis":{"weights":{"naturalness":1.0}},"humanizer":{"seed":7}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.analysis.weights.get(Metric::Naturalness), 1.0);
        assert_eq!(config.analysis.weights.get(Metric::Coherence), 0.0);
        assert_eq!(config.analysis.sentence_weights, MetricWeights::sentence_default());
        assert_eq!(config.analysis.tuning.mtld_threshold, 0.72);
        assert_eq!(config.humanizer.seed, Some(7));
        assert_eq!(config.humanizer.closing_phrase_probability, 0.3);
    }

    #[test]
    fn test_positive_weights_skip_invalid_entries() {
        let weights = MetricWeights::new([
            (Metric::Perplexity, 0.5),
            (Metric::Entropy, -1.0),
            (Metric::Fluency, f64::NAN),
        ]);
        assert_eq!(weights.positive().count(), 1);
        assert_eq!(weights.total(), 0.5);
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("nested"));
        let config = store.load().unwrap();
        assert_eq!(config.analysis, AnalysisConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().to_path_buf());
        let mut config = AppConfig::default();
        config.analysis.min_chars = 250;
        config.humanizer.seed = Some(42);
        store.save(&config).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.analysis.min_chars, 250);
        assert_eq!(loaded.humanizer.seed, Some(42));
    }

    #[test]
    fn test_backups_are_capped() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().to_path_buf());
        let backup_dir = dir.path().join("backups");
        fs::create_dir_all(&backup_dir).unwrap();
        for i in 0..12 {
            fs::write(backup_dir.join(format!("config_2020010{:02}.json", i)), "{}").unwrap();
        }
        store.save(&AppConfig::default()).unwrap();
        store.save(&AppConfig::default()).unwrap();

        let remaining: Vec<_> = fs::read_dir(&backup_dir).unwrap().collect();
        assert_eq!(remaining.len(), BACKUPS_TO_KEEP);
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.json"), "{not json").unwrap();
        let store = ConfigStore::new(dir.path().to_path_buf());
        assert!(matches!(store.load(), Err(ConfigError::Parse { .. })));
    }
}
