//! Metrics engine configuration.
//!
//! Every constant used by the fidelity, energy and QES models lives here.
//! Fields missing from a YAML document take their defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};

/// Complete metrics configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// QES weights.
    #[serde(default)]
    pub weights: QesWeights,

    /// Gate error model.
    #[serde(default)]
    pub error_rates: ErrorRates,

    /// Decoherence time in layers; enables `exp(-depth / t)` when set.
    #[serde(default)]
    pub decoherence_time: Option<f64>,

    /// Energy model.
    #[serde(default)]
    pub energy: EnergyCosts,

    /// Added to energy in the E1 denominator.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    /// Gates-per-qubit value that maps to a size term of 1.0.
    #[serde(default = "default_gate_count_scale")]
    pub gate_count_scale: f64,

    /// Alert thresholds.
    #[serde(default)]
    pub alerts: AlertThresholds,
}

/// Weights of the QES aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QesWeights {
    #[serde(default = "default_fidelity_weight")]
    pub fidelity_weight: f64,

    #[serde(default = "default_efficiency_weight")]
    pub efficiency_weight: f64,

    #[serde(default = "default_depth_penalty")]
    pub depth_penalty: f64,

    #[serde(default = "default_size_penalty")]
    pub size_penalty: f64,
}

/// Per-gate error probabilities.
///
/// Lookup order: `per_kind` by canonical name, then `barrier` (always 0),
/// then the arity class of a built-in kind. Custom kinds without an
/// explicit entry use `default_error_rate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRates {
    #[serde(default = "default_single_qubit_error")]
    pub single_qubit: f64,

    #[serde(default = "default_two_qubit_error")]
    pub two_qubit: f64,

    #[serde(default = "default_multi_qubit_error")]
    pub multi_qubit: f64,

    #[serde(default = "default_error_rate")]
    pub default_error_rate: f64,

    #[serde(default)]
    pub per_kind: BTreeMap<String, f64>,
}

/// Per-gate energy costs, in arbitrary units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyCosts {
    #[serde(default = "default_energy_per_kind")]
    pub per_kind: BTreeMap<String, f64>,

    /// Cost of a kind missing from `per_kind`.
    #[serde(default = "default_energy_cost")]
    pub default_cost: f64,

    /// Static cost per register qubit.
    #[serde(default = "default_qubit_overhead")]
    pub qubit_overhead: f64,
}

/// Thresholds for advisory alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default = "default_min_fidelity")]
    pub min_fidelity: f64,

    #[serde(default = "default_min_qes")]
    pub min_qes: f64,

    #[serde(default = "default_max_two_qubit")]
    pub max_two_qubit: usize,
}

// Default value functions
fn default_epsilon() -> f64 {
    1e-9
}

fn default_gate_count_scale() -> f64 {
    10.0
}

fn default_fidelity_weight() -> f64 {
    0.6
}

fn default_efficiency_weight() -> f64 {
    0.2
}

fn default_depth_penalty() -> f64 {
    0.1
}

fn default_size_penalty() -> f64 {
    0.1
}

fn default_single_qubit_error() -> f64 {
    0.001
}

fn default_two_qubit_error() -> f64 {
    0.01
}

fn default_multi_qubit_error() -> f64 {
    0.02
}

fn default_error_rate() -> f64 {
    0.01
}

fn default_energy_per_kind() -> BTreeMap<String, f64> {
    [("h", 1.0), ("cx", 10.0), ("rz", 2.0)]
        .into_iter()
        .map(|(name, cost)| (name.to_string(), cost))
        .collect()
}

fn default_energy_cost() -> f64 {
    1.0
}

fn default_qubit_overhead() -> f64 {
    0.5
}

fn default_max_depth() -> usize {
    100
}

fn default_min_fidelity() -> f64 {
    0.8
}

fn default_min_qes() -> f64 {
    0.5
}

fn default_max_two_qubit() -> usize {
    50
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            weights: QesWeights::default(),
            error_rates: ErrorRates::default(),
            decoherence_time: None,
            energy: EnergyCosts::default(),
            epsilon: default_epsilon(),
            gate_count_scale: default_gate_count_scale(),
            alerts: AlertThresholds::default(),
        }
    }
}

impl Default for QesWeights {
    fn default() -> Self {
        Self {
            fidelity_weight: default_fidelity_weight(),
            efficiency_weight: default_efficiency_weight(),
            depth_penalty: default_depth_penalty(),
            size_penalty: default_size_penalty(),
        }
    }
}

impl Default for ErrorRates {
    fn default() -> Self {
        Self {
            single_qubit: default_single_qubit_error(),
            two_qubit: default_two_qubit_error(),
            multi_qubit: default_multi_qubit_error(),
            default_error_rate: default_error_rate(),
            per_kind: BTreeMap::new(),
        }
    }
}

impl Default for EnergyCosts {
    fn default() -> Self {
        Self {
            per_kind: default_energy_per_kind(),
            default_cost: default_energy_cost(),
            qubit_overhead: default_qubit_overhead(),
        }
    }
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            min_fidelity: default_min_fidelity(),
            min_qes: default_min_qes(),
            max_two_qubit: default_max_two_qubit(),
        }
    }
}

impl MetricsConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let contents =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(text: &str) -> ConfigResult<Self> {
        let config: MetricsConfig =
            serde_yaml_ng::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> ConfigResult<()> {
        let rates = &self.error_rates;
        check_rate("error_rates.single_qubit", rates.single_qubit)?;
        check_rate("error_rates.two_qubit", rates.two_qubit)?;
        check_rate("error_rates.multi_qubit", rates.multi_qubit)?;
        check_rate("error_rates.default_error_rate", rates.default_error_rate)?;
        for (name, &rate) in &rates.per_kind {
            check_rate(&format!("error_rates.per_kind.{name}"), rate)?;
        }

        let energy = &self.energy;
        check_non_negative("energy.default_cost", energy.default_cost)?;
        check_non_negative("energy.qubit_overhead", energy.qubit_overhead)?;
        for (name, &cost) in &energy.per_kind {
            check_non_negative(&format!("energy.per_kind.{name}"), cost)?;
        }

        let weights = &self.weights;
        check_non_negative("weights.fidelity_weight", weights.fidelity_weight)?;
        check_non_negative("weights.efficiency_weight", weights.efficiency_weight)?;
        check_non_negative("weights.depth_penalty", weights.depth_penalty)?;
        check_non_negative("weights.size_penalty", weights.size_penalty)?;

        check_positive("epsilon", self.epsilon)?;
        check_positive("gate_count_scale", self.gate_count_scale)?;
        if let Some(t) = self.decoherence_time {
            check_positive("decoherence_time", t)?;
        }

        if !(0.0..=1.0).contains(&self.alerts.min_fidelity) {
            return Err(ConfigError::invalid(
                "alerts.min_fidelity",
                format!("must be within [0, 1], got {}", self.alerts.min_fidelity),
            ));
        }
        if !self.alerts.min_qes.is_finite() {
            return Err(ConfigError::invalid("alerts.min_qes", "must be finite"));
        }

        Ok(())
    }
}

fn check_rate(field: &str, value: f64) -> ConfigResult<()> {
    if (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must be within [0, 1), got {value}"),
        ))
    }
}

fn check_non_negative(field: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must be a finite value >= 0, got {value}"),
        ))
    }
}

fn check_positive(field: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must be a finite value > 0, got {value}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MetricsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.error_rates.single_qubit, 0.001);
        assert_eq!(config.energy.per_kind.get("cx"), Some(&10.0));
        assert_eq!(config.alerts.max_depth, 100);
        assert!(config.decoherence_time.is_none());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = MetricsConfig::from_yaml("{}").unwrap();
        assert_eq!(config, MetricsConfig::default());
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r"
weights:
  fidelity_weight: 0.9
error_rates:
  per_kind:
    cz: 0.005
decoherence_time: 50.0
";
        let config = MetricsConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.weights.fidelity_weight, 0.9);
        assert_eq!(config.weights.efficiency_weight, 0.2);
        assert_eq!(config.error_rates.per_kind.get("cz"), Some(&0.005));
        assert_eq!(config.error_rates.two_qubit, 0.01);
        assert_eq!(config.decoherence_time, Some(50.0));
    }

    #[test]
    fn test_rate_of_one_rejected() {
        let mut config = MetricsConfig::default();
        config.error_rates.two_qubit = 1.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "error_rates.two_qubit"));
    }

    #[test]
    fn test_negative_cost_rejected() {
        let mut config = MetricsConfig::default();
        config.energy.per_kind.insert("h".into(), -1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_epsilon_must_be_positive() {
        let mut config = MetricsConfig::default();
        config.epsilon = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_yaml() {
        let err = MetricsConfig::from_yaml("weights: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
