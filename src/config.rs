//! Configuration for reference-point indexes and tree nodes.
//!
//! Both configuration types deserialize from JSON, and from TOML with the
//! `toml` feature. Missing fields take their defaults, unknown fields are
//! rejected, and every loaded document is validated.

use crate::error::{ProximaError, Result};
use crate::medoids::Initialization;
use crate::tree::distribution::DistributionStrategy;
use crate::tree::promotion::Promotion;
use crate::tree::split::SplitStrategy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Query algorithm used by [`IDistanceIndex::knn`](crate::IDistanceIndex::knn).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    /// Scan reference lists until no unseen point can beat the k-th result.
    #[default]
    Exact,
    /// Scan only the nearest reference lists, stopping each after `k`
    /// accepted candidates. May return fewer than `k` neighbors.
    Approximate,
}

/// Settings of an [`IDistanceIndex`](crate::IDistanceIndex).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
    /// Number of reference points. Capped at the relation size.
    #[serde(default = "IndexConfig::default_num_references")]
    pub num_references: usize,
    #[serde(default)]
    pub initialization: Initialization,
    #[serde(default)]
    pub query_mode: QueryMode,
    /// Reference lists scanned by approximate queries, nearest first.
    #[serde(default = "IndexConfig::default_approximate_references")]
    pub approximate_references: usize,
    /// Skip the remaining reference lists of an exact query once none of
    /// their points can enter the result.
    #[serde(default = "IndexConfig::default_early_termination")]
    pub early_termination: bool,
}

impl IndexConfig {
    const fn default_num_references() -> usize {
        16
    }

    const fn default_approximate_references() -> usize {
        1
    }

    const fn default_early_termination() -> bool {
        true
    }

    pub fn with_num_references(mut self, num_references: usize) -> Self {
        self.num_references = num_references;
        self
    }

    pub fn with_initialization(mut self, initialization: Initialization) -> Self {
        self.initialization = initialization;
        self
    }

    pub fn with_query_mode(mut self, query_mode: QueryMode) -> Self {
        self.query_mode = query_mode;
        self
    }

    pub fn with_approximate_references(mut self, lists: usize) -> Self {
        self.approximate_references = lists;
        self
    }

    pub fn with_early_termination(mut self, enabled: bool) -> Self {
        self.early_termination = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_references == 0 {
            return Err(ProximaError::InvalidConfig(
                "Number of references must be greater than zero".to_string(),
            ));
        }
        if self.approximate_references == 0 {
            return Err(ProximaError::InvalidConfig(
                "Approximate references must be greater than zero".to_string(),
            ));
        }
        if self.approximate_references > self.num_references {
            log::warn!(
                "approximate_references ({}) exceeds num_references ({}); approximate queries will scan every list",
                self.approximate_references,
                self.num_references
            );
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: IndexConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: IndexConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load a configuration file, choosing the format by extension
    /// (`.json`, or `.toml` with the `toml` feature).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&contents),
            #[cfg(feature = "toml")]
            Some("toml") => Self::from_toml(&contents),
            _ => Err(ProximaError::Config(format!(
                "Unsupported configuration file: {}",
                path.display()
            ))),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            num_references: Self::default_num_references(),
            initialization: Initialization::default(),
            query_mode: QueryMode::default(),
            approximate_references: Self::default_approximate_references(),
            early_termination: Self::default_early_termination(),
        }
    }
}

/// Node-level parameters of a tree index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreeConfig {
    /// Maximum number of entries per node.
    #[serde(default = "TreeConfig::default_capacity")]
    pub capacity: usize,
    /// Minimum number of entries per node after a split.
    #[serde(default = "TreeConfig::default_min_entries")]
    pub min_entries: usize,
    #[serde(default)]
    pub split: SplitStrategy,
    #[serde(default)]
    pub distribution: DistributionStrategy,
    #[serde(default)]
    pub promotion: Promotion,
}

impl TreeConfig {
    const fn default_capacity() -> usize {
        32
    }

    const fn default_min_entries() -> usize {
        12
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_min_entries(mut self, min_entries: usize) -> Self {
        self.min_entries = min_entries;
        self
    }

    pub fn with_split(mut self, split: SplitStrategy) -> Self {
        self.split = split;
        self
    }

    pub fn with_distribution(mut self, distribution: DistributionStrategy) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn with_promotion(mut self, promotion: Promotion) -> Self {
        self.promotion = promotion;
        self
    }

    /// An overflowing node has `capacity + 1` entries, which must be enough
    /// for two groups of `min_entries`.
    pub fn validate(&self) -> Result<()> {
        if self.capacity < 2 {
            return Err(ProximaError::InvalidConfig(
                "Node capacity must be at least 2".to_string(),
            ));
        }
        if self.min_entries == 0 {
            return Err(ProximaError::InvalidConfig(
                "Minimum entries must be greater than zero".to_string(),
            ));
        }
        if 2 * self.min_entries > self.capacity + 1 {
            return Err(ProximaError::InvalidConfig(format!(
                "Minimum entries {} too large for capacity {}",
                self.min_entries, self.capacity
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: TreeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: TreeConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            capacity: Self::default_capacity(),
            min_entries: Self::default_min_entries(),
            split: SplitStrategy::default(),
            distribution: DistributionStrategy::default(),
            promotion: Promotion::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_config_default() {
        let config = IndexConfig::default();
        assert_eq!(config.num_references, 16);
        assert_eq!(config.initialization, Initialization::FarthestFirst);
        assert_eq!(config.query_mode, QueryMode::Exact);
        assert_eq!(config.approximate_references, 1);
        assert!(config.early_termination);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_index_config_json() {
        let config = IndexConfig::default()
            .with_num_references(4)
            .with_initialization(Initialization::Random { seed: Some(3) })
            .with_query_mode(QueryMode::Approximate);
        let json = config.to_json().unwrap();
        let parsed = IndexConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);

        let partial = IndexConfig::from_json(r#"{"num_references": 8}"#).unwrap();
        assert_eq!(partial.num_references, 8);
        assert_eq!(partial.query_mode, QueryMode::Exact);
    }

    #[test]
    fn test_index_config_rejects_bad_documents() {
        assert!(matches!(
            IndexConfig::from_json(r#"{"num_references": 0}"#),
            Err(ProximaError::InvalidConfig(_))
        ));
        assert!(matches!(
            IndexConfig::from_json(r#"{"references": 4}"#),
            Err(ProximaError::Config(_))
        ));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_index_config_toml() {
        let config = IndexConfig::from_toml(
            r#"
            num_references = 6
            query_mode = "approximate"
            initialization = "pam_build"
            "#,
        )
        .unwrap();
        assert_eq!(config.num_references, 6);
        assert_eq!(config.query_mode, QueryMode::Approximate);
        assert_eq!(config.initialization, Initialization::PamBuild);

        let text = config.to_toml().unwrap();
        assert_eq!(IndexConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(&path, r#"{"num_references": 3, "early_termination": false}"#).unwrap();
        let config = IndexConfig::load(&path).unwrap();
        assert_eq!(config.num_references, 3);
        assert!(!config.early_termination);

        let unknown = dir.path().join("index.yaml");
        std::fs::write(&unknown, "num_references: 3").unwrap();
        assert!(IndexConfig::load(&unknown).is_err());
        assert!(IndexConfig::load(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_zero_counts_fail_validation() {
        let config = IndexConfig::default().with_num_references(0);
        assert!(matches!(config.validate(), Err(ProximaError::InvalidConfig(_))));
        let config = IndexConfig::default().with_approximate_references(0);
        assert!(matches!(config.validate(), Err(ProximaError::InvalidConfig(_))));
        assert!(TreeConfig::default().with_capacity(0).validate().is_err());
    }

    #[test]
    fn test_tree_config_validation() {
        assert!(TreeConfig::default().validate().is_ok());
        assert!(TreeConfig::default().with_capacity(4).with_min_entries(2).validate().is_ok());
        assert!(TreeConfig::default().with_capacity(4).with_min_entries(3).validate().is_err());
        assert!(TreeConfig::default().with_min_entries(0).validate().is_err());
    }

    #[test]
    fn test_tree_config_json() {
        let config = TreeConfig::default()
            .with_capacity(8)
            .with_min_entries(3)
            .with_split(SplitStrategy::AngTan)
            .with_distribution(DistributionStrategy::FarthestBalanced)
            .with_promotion(Promotion::MLBDist);
        let parsed = TreeConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);

        let json = r#"{"capacity": 10, "min_entries": 4, "split": "linear", "promotion": {"random": {"seed": 1}}}"#;
        let parsed = TreeConfig::from_json(json).unwrap();
        assert_eq!(parsed.split, SplitStrategy::Linear);
        assert_eq!(parsed.promotion, Promotion::Random { seed: Some(1) });
    }
}
