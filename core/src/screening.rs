//! Watchlist screening: match evaluation and the run/review operations.
//!
//! Evaluation is pure: it scans the loaded watchlist for the best name or
//! alias match and derives a decision from the confidence thresholds
//! (>= block blocks, >= flag flags, else cleared; a weak match is still
//! recorded on the screening row).

use crate::config::DeskConfig;
use crate::desk::ComplianceDesk;
use crate::error::{DeskError, DeskResult};
use crate::matching::{normalize_name, similarity};
use crate::store::{ScreeningRow, WatchlistRow};
use crate::types::{ScreeningDecision, WatchlistKind};
use chrono::Utc;
use log::{info, warn};
use uuid::Uuid;

/// Best watchlist hit for one client name.
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    pub entry_id: String,
    pub list_name: String,
    pub matched_name: String,
    /// Which entry field matched: "name" or "alias".
    pub field: &'static str,
    pub confidence: u8,
}

#[derive(Debug, Clone)]
pub struct ScreeningOutcome {
    pub best: Option<MatchCandidate>,
    pub confidence: u8,
    pub decision: ScreeningDecision,
}

pub struct ScreeningEngine<'a> {
    cfg: &'a DeskConfig,
}

impl<'a> ScreeningEngine<'a> {
    pub fn new(cfg: &'a DeskConfig) -> Self {
        Self { cfg }
    }

    /// Scan the watchlist for the strongest match against `full_name`.
    ///
    /// A sanctions entry whose country equals the client's nationality gets
    /// a small confidence boost; nationality alone never produces a match
    /// (that risk is the scorer's high-risk-nationality flag).
    pub fn evaluate(
        &self,
        full_name: &str,
        nationality: Option<&str>,
        watchlist: &[WatchlistRow],
    ) -> ScreeningOutcome {
        let needle = normalize_name(full_name);
        let nat = nationality.map(|n| n.to_uppercase());
        let mut best: Option<MatchCandidate> = None;

        for entry in watchlist {
            let mut candidate: Option<(&'static str, &str, f64)> = None;

            let score = similarity(&needle, &normalize_name(&entry.full_name));
            if score >= self.cfg.screening.fuzzy_floor {
                candidate = Some(("name", entry.full_name.as_str(), score));
            }
            for alias in &entry.aliases {
                let score = similarity(&needle, &normalize_name(alias));
                if score >= self.cfg.screening.fuzzy_floor
                    && candidate.map_or(true, |(_, _, s)| score > s)
                {
                    candidate = Some(("alias", alias.as_str(), score));
                }
            }

            let Some((field, matched_name, score)) = candidate else {
                continue;
            };

            let mut confidence = (score * 100.0).round() as u32;
            if entry.kind == WatchlistKind::Sanctions
                && entry.country.is_some()
                && entry.country.as_deref().map(|c| c.to_uppercase()) == nat
            {
                confidence += 10;
            }
            let confidence = confidence.min(100) as u8;

            if best.as_ref().map_or(true, |b| confidence > b.confidence) {
                best = Some(MatchCandidate {
                    entry_id: entry.entry_id.clone(),
                    list_name: entry.list_name.clone(),
                    matched_name: matched_name.to_string(),
                    field,
                    confidence,
                });
            }
        }

        let confidence = best.as_ref().map_or(0, |b| b.confidence);
        ScreeningOutcome {
            decision: self.decide(confidence),
            confidence,
            best,
        }
    }

    pub fn decide(&self, confidence: u8) -> ScreeningDecision {
        if confidence >= self.cfg.screening.block {
            ScreeningDecision::Blocked
        } else if confidence >= self.cfg.screening.flag {
            ScreeningDecision::Flagged
        } else {
            ScreeningDecision::Cleared
        }
    }
}

// ── Desk operations ──────────────────────────────────────────────────────────

impl ComplianceDesk {
    /// Run a screening for one client against the current watchlist.
    /// Persists the screening row, mirrors the decision into the client's
    /// aml_status, and audits both in one transaction.
    pub fn run_screening(
        &mut self,
        company_id: &str,
        client_id: &str,
        actor: &str,
    ) -> DeskResult<ScreeningRow> {
        let client = self
            .store
            .get_client(company_id, client_id)?
            .ok_or_else(|| DeskError::not_found("client", client_id))?;

        let watchlist = self.store.watchlist()?;
        let engine = ScreeningEngine::new(&self.config);
        let outcome = engine.evaluate(
            &client.full_name,
            client.nationality.as_deref(),
            &watchlist,
        );

        let now = Utc::now();
        let row = ScreeningRow {
            screening_id: Uuid::new_v4().to_string(),
            company_id: company_id.to_string(),
            client_id: client_id.to_string(),
            matched: outcome.best.is_some(),
            matched_entry_id: outcome.best.as_ref().map(|b| b.entry_id.clone()),
            matched_name: outcome.best.as_ref().map(|b| b.matched_name.clone()),
            matched_list: outcome.best.as_ref().map(|b| b.list_name.clone()),
            matched_field: outcome.best.as_ref().map(|b| b.field.to_string()),
            confidence: outcome.confidence,
            decision: outcome.decision,
            screened_by: actor.to_string(),
            decided_by: actor.to_string(),
            created_at: now,
            decided_at: now,
        };

        let detail = serde_json::json!({
            "matched": row.matched,
            "matched_list": row.matched_list,
            "confidence": row.confidence,
            "decision": row.decision.as_str(),
        })
        .to_string();

        self.store.record_screening(&row, client.aml_status, &detail)?;

        match row.decision {
            ScreeningDecision::Blocked => warn!(
                "screening BLOCKED client {client_id} (confidence {}, screening {})",
                row.confidence, row.screening_id
            ),
            ScreeningDecision::Flagged => info!(
                "screening flagged client {client_id} (confidence {}, screening {})",
                row.confidence, row.screening_id
            ),
            ScreeningDecision::Cleared => {}
        }
        Ok(row)
    }

    /// Reviewer override of a screening decision. The client's aml_status
    /// follows because the reviewed screening becomes the most recently
    /// decided one. Returns the updated row.
    pub fn review_screening(
        &mut self,
        company_id: &str,
        screening_id: &str,
        decision: ScreeningDecision,
        reviewer: &str,
    ) -> DeskResult<ScreeningRow> {
        let changed =
            self.store
                .set_screening_decision(company_id, screening_id, decision, reviewer, Utc::now())?;
        if changed {
            info!("screening {screening_id} decision set to {} by {reviewer}", decision.as_str());
        }
        self.store
            .get_screening(company_id, screening_id)?
            .ok_or_else(|| DeskError::not_found("screening", screening_id))
    }

    pub fn list_screenings(
        &self,
        company_id: &str,
        client_id: &str,
    ) -> DeskResult<Vec<ScreeningRow>> {
        self.store.screenings_for_client(company_id, client_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(id: &str, name: &str, aliases: &[&str], country: Option<&str>) -> WatchlistRow {
        WatchlistRow {
            entry_id: id.to_string(),
            list_name: "OFAC_SDN".to_string(),
            kind: WatchlistKind::Sanctions,
            full_name: name.to_string(),
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
            country: country.map(|s| s.to_string()),
            notes: None,
            added_at: Utc::now(),
        }
    }

    #[test]
    fn exact_name_match_blocks() {
        let cfg = DeskConfig::default();
        let list = vec![entry("e1", "Viktor Orlov", &[], None)];
        let out = ScreeningEngine::new(&cfg).evaluate("Viktor Orlov", None, &list);
        assert_eq!(out.confidence, 100);
        assert_eq!(out.decision, ScreeningDecision::Blocked);
        assert_eq!(out.best.unwrap().field, "name");
    }

    #[test]
    fn alias_match_is_found() {
        let cfg = DeskConfig::default();
        let list = vec![entry("e1", "Viktor Orlov", &["V. Orlov", "Viktor Orloff"], None)];
        let out = ScreeningEngine::new(&cfg).evaluate("Viktor Orloff", None, &list);
        let best = out.best.unwrap();
        assert_eq!(best.field, "alias");
        assert_eq!(out.confidence, 100);
    }

    #[test]
    fn no_match_clears() {
        let cfg = DeskConfig::default();
        let list = vec![entry("e1", "Viktor Orlov", &[], None)];
        let out = ScreeningEngine::new(&cfg).evaluate("Amina Diallo", None, &list);
        assert!(out.best.is_none());
        assert_eq!(out.confidence, 0);
        assert_eq!(out.decision, ScreeningDecision::Cleared);
    }

    #[test]
    fn country_boost_applies_to_sanctions_entries() {
        let cfg = DeskConfig::default();
        // "Viktor Orlow" vs "Viktor Orlov": distance 1 over 12 chars => 92.
        let list = vec![entry("e1", "Viktor Orlov", &[], Some("IR"))];
        let engine = ScreeningEngine::new(&cfg);

        let without = engine.evaluate("Viktor Orlow", None, &list);
        let with = engine.evaluate("Viktor Orlow", Some("ir"), &list);
        assert!(with.confidence > without.confidence);
        assert!(with.confidence <= 100);
    }

    #[test]
    fn decision_thresholds() {
        let cfg = DeskConfig::default();
        let engine = ScreeningEngine::new(&cfg);
        assert_eq!(engine.decide(0), ScreeningDecision::Cleared);
        assert_eq!(engine.decide(49), ScreeningDecision::Cleared);
        assert_eq!(engine.decide(50), ScreeningDecision::Flagged);
        assert_eq!(engine.decide(79), ScreeningDecision::Flagged);
        assert_eq!(engine.decide(80), ScreeningDecision::Blocked);
        assert_eq!(engine.decide(100), ScreeningDecision::Blocked);
    }

    #[test]
    fn best_match_wins_across_entries() {
        let cfg = DeskConfig::default();
        let list = vec![
            entry("e1", "Victor Orloff", &[], None),
            entry("e2", "Viktor Orlov", &[], None),
        ];
        let out = ScreeningEngine::new(&cfg).evaluate("Viktor Orlov", None, &list);
        assert_eq!(out.best.unwrap().entry_id, "e2");
        assert_eq!(out.confidence, 100);
    }
}
