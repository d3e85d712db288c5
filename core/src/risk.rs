//! Client risk scoring.
//!
//! A pure, deterministic rule engine: the score is a weighted sum of
//! onboarding flags capped at 100, and the category is a straight
//! thresholding of the score. Inputs come from the client profile plus the
//! current document state (a verified passport/national id satisfies the
//! identification flag, a verified trade-license document satisfies the
//! trade-license flag).

use crate::config::DeskConfig;
use crate::types::{ClientKind, RiskCategory};
use serde::Serialize;

/// Everything the scorer looks at.
#[derive(Debug, Clone, Copy)]
pub struct RiskInputs<'a> {
    pub kind: ClientKind,
    pub nationality: Option<&'a str>,
    pub has_identification: bool,
    pub has_trade_license: bool,
    pub has_address: bool,
    pub is_pep: bool,
}

/// Scoring outcome: the capped score, its category, and the flags that fired.
#[derive(Debug, Clone, Serialize)]
pub struct RiskProfile {
    pub score: u8,
    pub category: RiskCategory,
    pub factors: Vec<&'static str>,
}

pub fn assess(inputs: &RiskInputs<'_>, cfg: &DeskConfig) -> RiskProfile {
    let w = &cfg.risk_weights;
    let mut score: u32 = 0;
    let mut factors = Vec::new();

    if let Some(nat) = inputs.nationality {
        if cfg.is_high_risk_country(nat) {
            score += w.high_risk_nationality as u32;
            factors.push("high_risk_nationality");
        }
    }

    if !inputs.has_identification {
        score += w.missing_identification as u32;
        factors.push("missing_identification");
    }

    if inputs.kind == ClientKind::Company && !inputs.has_trade_license {
        score += w.missing_trade_license as u32;
        factors.push("missing_trade_license");
    }

    if !inputs.has_address {
        score += w.missing_address as u32;
        factors.push("missing_address");
    }

    if inputs.is_pep {
        score += w.pep as u32;
        factors.push("pep");
    }

    let score = score.min(100) as u8;
    RiskProfile {
        score,
        category: categorize(score, cfg),
        factors,
    }
}

pub fn categorize(score: u8, cfg: &DeskConfig) -> RiskCategory {
    if score >= cfg.risk_thresholds.high {
        RiskCategory::High
    } else if score >= cfg.risk_thresholds.medium {
        RiskCategory::Medium
    } else {
        RiskCategory::Low
    }
}
