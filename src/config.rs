//! Farm configuration.
//!
//! Loaded from JSON; every field has a default so partial documents work.
//!
//! ```
//! use printfarm_ops::config::FarmConfig;
//!
//! let cfg = FarmConfig::from_json_str(r#"{"default_finish": "Matte"}"#).unwrap();
//! assert_eq!(cfg.default_finish, "Matte");
//! assert!((cfg.stock_thresholds.low_ratio - 0.25).abs() < 1e-10);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::dispatching::{EvaluationMode, RuleKind};
use crate::error::{FarmError, Result};
use crate::models::{MaterialRequirement, DEFAULT_BUILD_TIME_PER_ITEM_MS, DEFAULT_FINISH};

/// Remaining-ratio thresholds for [`crate::models::StockStatus`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockThresholds {
    /// At or below this remaining/total ratio a unit is `Low`.
    pub low_ratio: f64,
    /// At or below this remaining/total ratio a unit is `Critical`.
    pub critical_ratio: f64,
}

impl Default for StockThresholds {
    fn default() -> Self {
        Self {
            low_ratio: 0.25,
            critical_ratio: 0.10,
        }
    }
}

/// One dispatching rule and its weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedRule {
    pub rule: RuleKind,
    /// Used in weighted mode only.
    #[serde(default = "unit_weight")]
    pub weight: f64,
}

fn unit_weight() -> f64 {
    1.0
}

impl WeightedRule {
    pub fn new(rule: RuleKind) -> Self {
        Self { rule, weight: 1.0 }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

/// Rule set deciding which queued job is allotted first.
///
/// Ties left after every rule are broken by job id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub mode: EvaluationMode,
    pub rules: Vec<WeightedRule>,
}

impl Default for DispatchConfig {
    /// Priority, then earliest due date.
    fn default() -> Self {
        Self {
            mode: EvaluationMode::Sequential,
            rules: vec![WeightedRule::new(RuleKind::Priority), WeightedRule::new(RuleKind::Edd)],
        }
    }
}

/// Per-farm settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmConfig {
    pub stock_thresholds: StockThresholds,
    /// Finish assumed for requirements that leave it out.
    pub default_finish: String,
    /// Material put on jobs derived from orders before planning refines them.
    pub placeholder_material: MaterialRequirement,
    /// Build time per item for printers added without one.
    pub default_build_time_per_item_ms: i64,
    pub dispatch: DispatchConfig,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            stock_thresholds: StockThresholds::default(),
            default_finish: DEFAULT_FINISH.to_string(),
            placeholder_material: MaterialRequirement::new("PLA", "#FFFFFF"),
            default_build_time_per_item_ms: DEFAULT_BUILD_TIME_PER_ITEM_MS,
            dispatch: DispatchConfig::default(),
        }
    }
}

impl FarmConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: FarmConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads, parses and validates a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "loading farm config");
        Self::from_json_str(&raw)
    }

    /// Checks threshold ranges, build time and rule weights.
    pub fn validate(&self) -> Result<()> {
        let t = &self.stock_thresholds;
        for (name, v) in [("low_ratio", t.low_ratio), ("critical_ratio", t.critical_ratio)] {
            if !(0.0..=1.0).contains(&v) {
                return Err(FarmError::Config(format!("{name} must be within [0, 1], got {v}")));
            }
        }
        if t.critical_ratio > t.low_ratio {
            return Err(FarmError::Config(format!(
                "critical_ratio ({}) must not exceed low_ratio ({})",
                t.critical_ratio, t.low_ratio
            )));
        }
        if self.default_build_time_per_item_ms <= 0 {
            return Err(FarmError::Config(
                "default_build_time_per_item_ms must be positive".to_string(),
            ));
        }
        if let Some(bad) = self.dispatch.rules.iter().find(|r| !r.weight.is_finite()) {
            return Err(FarmError::Config(format!(
                "weight of rule {:?} must be finite, got {}",
                bad.rule, bad.weight
            )));
        }
        Ok(())
    }
}
