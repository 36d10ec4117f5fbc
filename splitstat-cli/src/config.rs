//! Configuration loading from splitstat.toml
//!
//! Analysis settings can live in a `splitstat.toml` in the project root,
//! discovered by walking up from the current directory. CLI flags override
//! file values.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Splitstat configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SplitConfig {
    /// Statistical settings
    #[serde(default)]
    pub analysis: AnalysisSection,
    /// Dataset location
    #[serde(default)]
    pub data: DataSection,
    /// Output settings
    #[serde(default)]
    pub output: OutputSection,
}

/// Statistical settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSection {
    /// Significance level
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Bootstrap / permutation resample count
    #[serde(default = "default_resamples")]
    pub resamples: usize,
    /// Target power for the t-test's sample-size analysis
    #[serde(default = "default_power")]
    pub power: f64,
    /// Base random seed
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Tests to run (names from the test registry)
    #[serde(default = "default_tests")]
    pub tests: Vec<String>,
    /// Metrics to analyze
    #[serde(default = "default_metrics")]
    pub metrics: Vec<String>,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            resamples: default_resamples(),
            power: default_power(),
            seed: default_seed(),
            tests: default_tests(),
            metrics: default_metrics(),
        }
    }
}

fn default_alpha() -> f64 {
    0.12
}
fn default_resamples() -> usize {
    10_000
}
fn default_power() -> f64 {
    0.8
}
fn default_seed() -> u64 {
    8
}
fn default_tests() -> Vec<String> {
    vec![
        "permutation".to_string(),
        "mannwhitney".to_string(),
        "bootstrap".to_string(),
        "ttest".to_string(),
    ]
}
fn default_metrics() -> Vec<String> {
    vec!["arpu".to_string(), "messages".to_string()]
}

/// Dataset location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSection {
    /// Directory containing the dated CSV drops
    #[serde(default = "default_directory")]
    pub directory: String,
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}

fn default_directory() -> String {
    "./all_csv_files".to_string()
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    /// Default output format: "human" or "json"
    #[serde(default = "default_format")]
    pub format: String,
    /// Output file path (stdout when unset)
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: default_format(),
            path: None,
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl SplitConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from the
    /// current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("splitstat.toml");
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# Splitstat Configuration

[analysis]
# Significance level for every decision
alpha = 0.12
# Bootstrap / permutation resample count
resamples = 10000
# Target power for the t-test's sample-size analysis
power = 0.8
# Base random seed (each analysis cell derives its own generator)
seed = 8
# Tests to run
tests = ["permutation", "mannwhitney", "bootstrap", "ttest"]
# Metrics to analyze ("user_retention" opts in the retention metric)
metrics = ["arpu", "messages"]

[data]
# Directory with users_all_<date>.csv / messages_all_<date>.csv /
# payments_all_<date>.csv drops
directory = "./all_csv_files"

[output]
# Output format: human or json
format = "human"
# Output file (uncomment to write instead of printing)
# path = "report.json"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SplitConfig::default();
        assert_eq!(config.analysis.alpha, 0.12);
        assert_eq!(config.analysis.resamples, 10_000);
        assert_eq!(config.analysis.seed, 8);
        assert_eq!(config.analysis.tests.len(), 4);
        assert_eq!(config.data.directory, "./all_csv_files");
        assert_eq!(config.output.format, "human");
    }

    #[test]
    fn test_parse_partial_toml_applies_defaults() {
        let toml_str = r#"
            [analysis]
            alpha = 0.05
            tests = ["permutation"]
        "#;

        let config: SplitConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.analysis.alpha, 0.05);
        assert_eq!(config.analysis.tests, vec!["permutation"]);
        // Defaults still apply
        assert_eq!(config.analysis.resamples, 10_000);
        assert_eq!(config.output.format, "human");
    }

    #[test]
    fn test_default_toml_parses() {
        let config: SplitConfig = toml::from_str(&SplitConfig::default_toml()).unwrap();
        assert_eq!(config.analysis.alpha, 0.12);
        assert_eq!(config.analysis.metrics, vec!["arpu", "messages"]);
    }
}
