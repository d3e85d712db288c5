//! Client onboarding and the KYC lifecycle.
//!
//! Onboarding validates the intake, computes the initial risk profile, and
//! persists client + audit in one transaction. KYC transitions follow the
//! table in `KycStatus::can_transition_to`; approval additionally requires
//! a verified identification document and a non-blocked AML status.

use crate::desk::ComplianceDesk;
use crate::error::{DeskError, DeskResult};
use crate::risk::{self, RiskInputs, RiskProfile};
use crate::store::ClientRow;
use crate::types::{ClientKind, KycStatus, AmlStatus};
use chrono::Utc;
use log::info;
use uuid::Uuid;

/// Intake data for a new client (or a profile update).
#[derive(Debug, Clone)]
pub struct ClientIntake {
    pub kind: ClientKind,
    pub full_name: String,
    pub nationality: Option<String>,
    pub address: Option<String>,
    pub identification_number: Option<String>,
    pub trade_license: Option<String>,
    pub is_pep: bool,
}

impl ComplianceDesk {
    pub fn onboard_client(
        &mut self,
        company_id: &str,
        intake: ClientIntake,
        actor: &str,
    ) -> DeskResult<ClientRow> {
        self.get_company(company_id)?;
        validate_intake(&intake)?;

        let profile = self.score_intake(company_id, None, &intake)?;
        let now = Utc::now();
        let row = ClientRow {
            client_id: Uuid::new_v4().to_string(),
            company_id: company_id.to_string(),
            kind: intake.kind,
            full_name: intake.full_name.trim().to_string(),
            nationality: intake.nationality.map(|n| n.to_uppercase()),
            address: intake.address,
            identification_number: intake.identification_number,
            trade_license: intake.trade_license,
            is_pep: intake.is_pep,
            kyc_status: KycStatus::Pending,
            risk_score: profile.score,
            risk_category: profile.category,
            aml_status: AmlStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let detail = serde_json::json!({
            "kind": row.kind.as_str(),
            "risk_score": row.risk_score,
            "risk_category": row.risk_category.as_str(),
            "risk_factors": profile.factors,
        })
        .to_string();
        self.store.insert_client(&row, actor, &detail)?;

        info!(
            "onboarded client '{}' ({}) risk {} ({})",
            row.full_name,
            row.client_id,
            row.risk_score,
            row.risk_category.as_str()
        );
        Ok(row)
    }

    /// Replace the client's profile fields and re-derive the risk score.
    pub fn update_client_profile(
        &mut self,
        company_id: &str,
        client_id: &str,
        intake: ClientIntake,
        actor: &str,
    ) -> DeskResult<ClientRow> {
        let existing = self
            .store
            .get_client(company_id, client_id)?
            .ok_or_else(|| DeskError::not_found("client", client_id))?;
        validate_intake(&intake)?;

        let profile = self.score_intake(company_id, Some(client_id), &intake)?;
        let old_detail = profile_summary(&existing);
        let updated = ClientRow {
            kind: existing.kind, // client kind is immutable after onboarding
            full_name: intake.full_name.trim().to_string(),
            nationality: intake.nationality.map(|n| n.to_uppercase()),
            address: intake.address,
            identification_number: intake.identification_number,
            trade_license: intake.trade_license,
            is_pep: intake.is_pep,
            risk_score: profile.score,
            risk_category: profile.category,
            updated_at: Utc::now(),
            ..existing
        };
        let new_detail = profile_summary(&updated);

        self.store
            .update_client_profile(&updated, actor, &old_detail, &new_detail)?;
        Ok(updated)
    }

    pub fn get_client(&self, company_id: &str, client_id: &str) -> DeskResult<ClientRow> {
        self.store
            .get_client(company_id, client_id)?
            .ok_or_else(|| DeskError::not_found("client", client_id))
    }

    pub fn list_clients(&self, company_id: &str) -> DeskResult<Vec<ClientRow>> {
        self.store.list_clients(company_id)
    }

    // ── KYC lifecycle ──────────────────────────────────────────

    pub fn begin_review(&mut self, company_id: &str, client_id: &str, actor: &str) -> DeskResult<()> {
        self.transition_kyc(company_id, client_id, KycStatus::InReview, actor)
    }

    pub fn approve_client(
        &mut self,
        company_id: &str,
        client_id: &str,
        actor: &str,
    ) -> DeskResult<()> {
        let client = self
            .store
            .get_client(company_id, client_id)?
            .ok_or_else(|| DeskError::not_found("client", client_id))?;

        if client.aml_status == AmlStatus::Blocked {
            return Err(DeskError::Validation(
                "cannot approve a client with blocked AML status".into(),
            ));
        }
        if !self.store.has_verified_identification(company_id, client_id)? {
            return Err(DeskError::Validation(
                "cannot approve without a verified identification document".into(),
            ));
        }
        self.transition_kyc(company_id, client_id, KycStatus::Approved, actor)
    }

    pub fn reject_client(
        &mut self,
        company_id: &str,
        client_id: &str,
        actor: &str,
    ) -> DeskResult<()> {
        self.transition_kyc(company_id, client_id, KycStatus::Rejected, actor)
    }

    /// Periodic KYC refresh: an approved client falls back to expired.
    pub fn expire_kyc(&mut self, company_id: &str, client_id: &str, actor: &str) -> DeskResult<()> {
        self.transition_kyc(company_id, client_id, KycStatus::Expired, actor)
    }

    fn transition_kyc(
        &mut self,
        company_id: &str,
        client_id: &str,
        to: KycStatus,
        actor: &str,
    ) -> DeskResult<()> {
        let client = self
            .store
            .get_client(company_id, client_id)?
            .ok_or_else(|| DeskError::not_found("client", client_id))?;
        let from = client.kyc_status;
        if !from.can_transition_to(to) {
            return Err(DeskError::InvalidTransition {
                from: from.as_str().to_string(),
                to: to.as_str().to_string(),
            });
        }
        self.store
            .set_kyc_status(company_id, client_id, from, to, actor, Utc::now())?;
        info!(
            "client {client_id} kyc {} -> {} by {actor}",
            from.as_str(),
            to.as_str()
        );
        Ok(())
    }

    // ── Risk derivation ────────────────────────────────────────

    /// Score an intake. When `client_id` is set, verified documents also
    /// satisfy the identification / trade-license flags.
    fn score_intake(
        &self,
        company_id: &str,
        client_id: Option<&str>,
        intake: &ClientIntake,
    ) -> DeskResult<RiskProfile> {
        let (doc_ident, doc_license) = match client_id {
            Some(id) => (
                self.store.has_verified_identification(company_id, id)?,
                self.store.has_verified_trade_license(company_id, id)?,
            ),
            None => (false, false),
        };
        let inputs = RiskInputs {
            kind: intake.kind,
            nationality: intake.nationality.as_deref(),
            has_identification: intake.identification_number.is_some() || doc_ident,
            has_trade_license: intake.trade_license.is_some() || doc_license,
            has_address: intake.address.is_some(),
            is_pep: intake.is_pep,
        };
        Ok(risk::assess(&inputs, &self.config))
    }

    /// Recompute risk from the stored profile plus current document state.
    /// Persists and audits only when the score or category moved.
    pub(crate) fn rescore_client(
        &mut self,
        company_id: &str,
        client_id: &str,
        actor: &str,
    ) -> DeskResult<()> {
        let client = self
            .store
            .get_client(company_id, client_id)?
            .ok_or_else(|| DeskError::not_found("client", client_id))?;

        let inputs = RiskInputs {
            kind: client.kind,
            nationality: client.nationality.as_deref(),
            has_identification: client.identification_number.is_some()
                || self.store.has_verified_identification(company_id, client_id)?,
            has_trade_license: client.trade_license.is_some()
                || self.store.has_verified_trade_license(company_id, client_id)?,
            has_address: client.address.is_some(),
            is_pep: client.is_pep,
        };
        let profile = risk::assess(&inputs, &self.config);

        if profile.score == client.risk_score && profile.category == client.risk_category {
            return Ok(());
        }
        let old = risk_summary(client.risk_score, client.risk_category.as_str());
        let new = risk_summary(profile.score, profile.category.as_str());
        self.store.set_risk_profile(
            company_id,
            client_id,
            profile.score,
            profile.category,
            actor,
            Utc::now(),
            &old,
            &new,
        )?;
        Ok(())
    }
}

fn validate_intake(intake: &ClientIntake) -> DeskResult<()> {
    if intake.full_name.trim().is_empty() {
        return Err(DeskError::Validation("client full_name must not be empty".into()));
    }
    if let Some(nat) = &intake.nationality {
        if nat.len() != 2 || !nat.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DeskError::Validation(format!(
                "nationality must be an ISO-2 code, got '{nat}'"
            )));
        }
    }
    Ok(())
}

fn profile_summary(c: &crate::store::ClientRow) -> String {
    serde_json::json!({
        "full_name": c.full_name,
        "nationality": c.nationality,
        "address": c.address,
        "identification_number": c.identification_number,
        "trade_license": c.trade_license,
        "is_pep": c.is_pep,
        "risk_score": c.risk_score,
        "risk_category": c.risk_category.as_str(),
    })
    .to_string()
}

fn risk_summary(score: u8, category: &str) -> String {
    serde_json::json!({ "score": score, "category": category }).to_string()
}
