//! Screening history and the aml_status mirror invariant.
//!
//! A client's `aml_status` follows the most recently decided screening.
//! Both mutation paths below (initial run, post-hoc review) update the
//! screening row and the client row in a single transaction, auditing each
//! mutated entity once.

use super::{audit, ComplianceMetrics, ComplianceStore, ScreeningRow};
use crate::error::{DeskError, DeskResult};
use crate::types::{AmlStatus, ScreeningDecision};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

const SCREENING_COLS: &str = "screening_id, company_id, client_id, matched, matched_entry_id,
     matched_name, matched_list, matched_field, confidence, decision,
     screened_by, decided_by, created_at, decided_at";

impl ComplianceStore {
    /// Persist a freshly run screening and mirror its decision into the
    /// client's `aml_status` when that changes. `old_aml` is the client's
    /// status as read by the caller; `detail` is a JSON summary for audit.
    pub fn record_screening(
        &mut self,
        row: &ScreeningRow,
        old_aml: AmlStatus,
        detail: &str,
    ) -> DeskResult<()> {
        let new_aml = row.decision.as_aml_status();
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO screening (
                 screening_id, company_id, client_id, matched, matched_entry_id,
                 matched_name, matched_list, matched_field, confidence, decision,
                 screened_by, decided_by, created_at, decided_at
             ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14)",
            params![
                row.screening_id,
                row.company_id,
                row.client_id,
                row.matched as i64,
                row.matched_entry_id,
                row.matched_name,
                row.matched_list,
                row.matched_field,
                row.confidence as i64,
                row.decision,
                row.screened_by,
                row.decided_by,
                row.created_at,
                row.decided_at,
            ],
        )?;
        audit::append(
            &tx,
            &audit::AuditEvent {
                company_id: &row.company_id,
                actor: &row.screened_by,
                entity_kind: "screening",
                entity_id: &row.screening_id,
                action: "screened",
                field: None,
                old_value: None,
                new_value: Some(detail),
                created_at: row.created_at,
            },
        )?;

        if new_aml != old_aml {
            let n = tx.execute(
                "UPDATE client SET aml_status = ?1, updated_at = ?2
                 WHERE company_id = ?3 AND client_id = ?4",
                params![new_aml, row.created_at, row.company_id, row.client_id],
            )?;
            if n == 0 {
                return Err(DeskError::not_found("client", row.client_id.as_str()));
            }
            audit::append(
                &tx,
                &audit::AuditEvent {
                    company_id: &row.company_id,
                    actor: &row.screened_by,
                    entity_kind: "client",
                    entity_id: &row.client_id,
                    action: "aml_status_changed",
                    field: Some("aml_status"),
                    old_value: Some(old_aml.as_str()),
                    new_value: Some(new_aml.as_str()),
                    created_at: row.created_at,
                },
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Post-hoc reviewer override. The reviewed screening becomes the most
    /// recently decided one, so the client's `aml_status` follows its new
    /// decision. Returns false when the decision was already `to` (no-op).
    pub fn set_screening_decision(
        &mut self,
        company_id: &str,
        screening_id: &str,
        to: ScreeningDecision,
        reviewer: &str,
        now: DateTime<Utc>,
    ) -> DeskResult<bool> {
        let tx = self.conn.transaction()?;

        let sql = format!(
            "SELECT {SCREENING_COLS} FROM screening
             WHERE company_id = ?1 AND screening_id = ?2"
        );
        let existing = tx
            .prepare(&sql)?
            .query_row(params![company_id, screening_id], map_screening)
            .optional()?
            .ok_or_else(|| DeskError::not_found("screening", screening_id))?;

        if existing.decision == to {
            return Ok(false);
        }

        tx.execute(
            "UPDATE screening SET decision = ?1, decided_by = ?2, decided_at = ?3
             WHERE company_id = ?4 AND screening_id = ?5",
            params![to, reviewer, now, company_id, screening_id],
        )?;
        audit::append(
            &tx,
            &audit::AuditEvent {
                company_id,
                actor: reviewer,
                entity_kind: "screening",
                entity_id: screening_id,
                action: "decision_changed",
                field: Some("decision"),
                old_value: Some(existing.decision.as_str()),
                new_value: Some(to.as_str()),
                created_at: now,
            },
        )?;

        let old_aml: AmlStatus = tx.query_row(
            "SELECT aml_status FROM client WHERE company_id = ?1 AND client_id = ?2",
            params![company_id, existing.client_id],
            |r| r.get(0),
        )?;
        let new_aml = to.as_aml_status();
        if new_aml != old_aml {
            tx.execute(
                "UPDATE client SET aml_status = ?1, updated_at = ?2
                 WHERE company_id = ?3 AND client_id = ?4",
                params![new_aml, now, company_id, existing.client_id],
            )?;
            audit::append(
                &tx,
                &audit::AuditEvent {
                    company_id,
                    actor: reviewer,
                    entity_kind: "client",
                    entity_id: &existing.client_id,
                    action: "aml_status_changed",
                    field: Some("aml_status"),
                    old_value: Some(old_aml.as_str()),
                    new_value: Some(new_aml.as_str()),
                    created_at: now,
                },
            )?;
        }
        tx.commit()?;
        Ok(true)
    }

    pub fn get_screening(
        &self,
        company_id: &str,
        screening_id: &str,
    ) -> DeskResult<Option<ScreeningRow>> {
        let sql = format!(
            "SELECT {SCREENING_COLS} FROM screening
             WHERE company_id = ?1 AND screening_id = ?2"
        );
        let row = self
            .conn
            .prepare(&sql)?
            .query_row(params![company_id, screening_id], map_screening)
            .optional()?;
        Ok(row)
    }

    /// All screenings for a client, newest first.
    pub fn screenings_for_client(
        &self,
        company_id: &str,
        client_id: &str,
    ) -> DeskResult<Vec<ScreeningRow>> {
        let sql = format!(
            "SELECT {SCREENING_COLS} FROM screening
             WHERE company_id = ?1 AND client_id = ?2
             ORDER BY created_at DESC, rowid DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![company_id, client_id], map_screening)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// The screening whose decision the client's aml_status mirrors.
    pub fn latest_decided_screening(
        &self,
        company_id: &str,
        client_id: &str,
    ) -> DeskResult<Option<ScreeningRow>> {
        let sql = format!(
            "SELECT {SCREENING_COLS} FROM screening
             WHERE company_id = ?1 AND client_id = ?2
             ORDER BY decided_at DESC, rowid DESC
             LIMIT 1"
        );
        let row = self
            .conn
            .prepare(&sql)?
            .query_row(params![company_id, client_id], map_screening)
            .optional()?;
        Ok(row)
    }

    // ── Metrics ────────────────────────────────────────────────

    pub fn compliance_metrics(&self, company_id: &str) -> DeskResult<ComplianceMetrics> {
        let kyc = |status: &str| -> DeskResult<i64> {
            Ok(self.conn.query_row(
                "SELECT COUNT(*) FROM client WHERE company_id = ?1 AND kyc_status = ?2",
                params![company_id, status],
                |r| r.get(0),
            )?)
        };
        let aml = |status: &str| -> DeskResult<i64> {
            Ok(self.conn.query_row(
                "SELECT COUNT(*) FROM client WHERE company_id = ?1 AND aml_status = ?2",
                params![company_id, status],
                |r| r.get(0),
            )?)
        };

        let clients_total = self.client_count(company_id)?;
        let high_risk_clients: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM client WHERE company_id = ?1 AND risk_category = 'high'",
            params![company_id],
            |r| r.get(0),
        )?;
        let documents_pending: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM document WHERE company_id = ?1 AND status = 'pending'",
            params![company_id],
            |r| r.get(0),
        )?;
        let screenings_total: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM screening WHERE company_id = ?1",
            params![company_id],
            |r| r.get(0),
        )?;
        let screenings_matched: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM screening WHERE company_id = ?1 AND matched = 1",
            params![company_id],
            |r| r.get(0),
        )?;

        Ok(ComplianceMetrics {
            clients_total,
            kyc_pending: kyc("pending")?,
            kyc_in_review: kyc("in_review")?,
            kyc_approved: kyc("approved")?,
            kyc_rejected: kyc("rejected")?,
            kyc_expired: kyc("expired")?,
            aml_flagged: aml("flagged")?,
            aml_blocked: aml("blocked")?,
            high_risk_clients,
            documents_pending,
            screenings_total,
            screenings_matched,
        })
    }
}

fn map_screening(r: &rusqlite::Row<'_>) -> rusqlite::Result<ScreeningRow> {
    Ok(ScreeningRow {
        screening_id: r.get(0)?,
        company_id: r.get(1)?,
        client_id: r.get(2)?,
        matched: r.get::<_, i64>(3)? != 0,
        matched_entry_id: r.get(4)?,
        matched_name: r.get(5)?,
        matched_list: r.get(6)?,
        matched_field: r.get(7)?,
        confidence: r.get::<_, i64>(8)? as u8,
        decision: r.get(9)?,
        screened_by: r.get(10)?,
        decided_by: r.get(11)?,
        created_at: r.get(12)?,
        decided_at: r.get(13)?,
    })
}
