//! Desk configuration: risk weights, decision thresholds, and the
//! high-risk country list.
//!
//! Loaded from a JSON file; every field has a production default so an
//! empty deployment works without any config on disk.

use crate::error::DeskResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Points added per onboarding risk flag. Scores are capped at 100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskWeights {
    pub high_risk_nationality: u8,
    pub missing_identification: u8,
    pub missing_trade_license: u8,
    pub missing_address: u8,
    pub pep: u8,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            high_risk_nationality: 20,
            missing_identification: 15,
            missing_trade_license: 10,
            missing_address: 5,
            pep: 30,
        }
    }
}

/// Score thresholds for the derived risk category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// score >= high  => high
    pub high: u8,
    /// score >= medium => medium (below: low)
    pub medium: u8,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self { high: 70, medium: 40 }
    }
}

/// Match-confidence thresholds for the screening decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningThresholds {
    /// confidence >= block => blocked
    pub block: u8,
    /// confidence >= flag  => flagged (below: cleared)
    pub flag: u8,
    /// Minimum name similarity (0.0-1.0) for a fuzzy match to be recorded.
    /// Sits below `flag` / 100 so a weak match can be recorded on the
    /// screening row while the decision still comes out cleared.
    pub fuzzy_floor: f64,
}

impl Default for ScreeningThresholds {
    fn default() -> Self {
        Self {
            block: 80,
            flag: 50,
            fuzzy_floor: 0.40,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeskConfig {
    #[serde(default)]
    pub risk_weights: RiskWeights,
    #[serde(default)]
    pub risk_thresholds: RiskThresholds,
    #[serde(default)]
    pub screening: ScreeningThresholds,
    /// ISO-2 codes considered high-risk for the nationality flag.
    #[serde(default = "default_high_risk_countries")]
    pub high_risk_countries: Vec<String>,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            risk_weights: RiskWeights::default(),
            risk_thresholds: RiskThresholds::default(),
            screening: ScreeningThresholds::default(),
            high_risk_countries: default_high_risk_countries(),
        }
    }
}

fn default_high_risk_countries() -> Vec<String> {
    // FATF call-for-action plus a conservative slice of the grey list.
    ["IR", "KP", "MM", "SY", "AF", "YE", "SS"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl DeskConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> DeskResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("reading {}: {e}", path.as_ref().display()))?;
        let cfg: DeskConfig = serde_json::from_str(&raw)?;
        Ok(cfg)
    }

    pub fn is_high_risk_country(&self, iso2: &str) -> bool {
        let up = iso2.to_uppercase();
        self.high_risk_countries.iter().any(|c| c == &up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_policy() {
        let cfg = DeskConfig::default();
        assert_eq!(cfg.risk_weights.pep, 30);
        assert_eq!(cfg.risk_thresholds.high, 70);
        assert_eq!(cfg.screening.block, 80);
        assert!(cfg.is_high_risk_country("ir"));
        assert!(!cfg.is_high_risk_country("CH"));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: DeskConfig =
            serde_json::from_str(r#"{"risk_thresholds": {"high": 75, "medium": 45}}"#).unwrap();
        assert_eq!(cfg.risk_thresholds.high, 75);
        assert_eq!(cfg.risk_weights.high_risk_nationality, 20);
        assert_eq!(cfg.screening.flag, 50);
    }
}
