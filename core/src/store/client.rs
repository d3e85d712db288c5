//! Client table queries and tenant-scoped mutations.

use super::{audit, ClientRow, ComplianceStore};
use crate::error::{DeskError, DeskResult};
use crate::types::{KycStatus, RiskCategory};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

const CLIENT_COLS: &str = "client_id, company_id, kind, full_name, nationality, address,
     identification_number, trade_license, is_pep, kyc_status, risk_score,
     risk_category, aml_status, created_at, updated_at";

impl ComplianceStore {
    pub fn insert_client(&mut self, row: &ClientRow, actor: &str, detail: &str) -> DeskResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO client (
                 client_id, company_id, kind, full_name, nationality, address,
                 identification_number, trade_license, is_pep, kyc_status,
                 risk_score, risk_category, aml_status, created_at, updated_at
             ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15)",
            params![
                row.client_id,
                row.company_id,
                row.kind,
                row.full_name,
                row.nationality,
                row.address,
                row.identification_number,
                row.trade_license,
                row.is_pep as i64,
                row.kyc_status,
                row.risk_score as i64,
                row.risk_category,
                row.aml_status,
                row.created_at,
                row.updated_at,
            ],
        )?;
        audit::append(
            &tx,
            &audit::AuditEvent {
                company_id: &row.company_id,
                actor,
                entity_kind: "client",
                entity_id: &row.client_id,
                action: "onboarded",
                field: None,
                old_value: None,
                new_value: Some(detail),
                created_at: row.created_at,
            },
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Rewrite the profile columns (and derived risk) from `row`.
    /// One audit entry with before/after summaries rendered by the caller.
    pub fn update_client_profile(
        &mut self,
        row: &ClientRow,
        actor: &str,
        old_detail: &str,
        new_detail: &str,
    ) -> DeskResult<()> {
        let tx = self.conn.transaction()?;
        let n = tx.execute(
            "UPDATE client SET
                 full_name = ?1, nationality = ?2, address = ?3,
                 identification_number = ?4, trade_license = ?5, is_pep = ?6,
                 risk_score = ?7, risk_category = ?8, updated_at = ?9
             WHERE company_id = ?10 AND client_id = ?11",
            params![
                row.full_name,
                row.nationality,
                row.address,
                row.identification_number,
                row.trade_license,
                row.is_pep as i64,
                row.risk_score as i64,
                row.risk_category,
                row.updated_at,
                row.company_id,
                row.client_id,
            ],
        )?;
        if n == 0 {
            return Err(DeskError::not_found("client", row.client_id.as_str()));
        }
        audit::append(
            &tx,
            &audit::AuditEvent {
                company_id: &row.company_id,
                actor,
                entity_kind: "client",
                entity_id: &row.client_id,
                action: "profile_updated",
                field: None,
                old_value: Some(old_detail),
                new_value: Some(new_detail),
                created_at: row.updated_at,
            },
        )?;
        tx.commit()?;
        Ok(())
    }

    /// KYC transition. The WHERE clause pins the expected current status so
    /// a stale caller fails instead of clobbering a concurrent change.
    pub fn set_kyc_status(
        &mut self,
        company_id: &str,
        client_id: &str,
        from: KycStatus,
        to: KycStatus,
        actor: &str,
        now: DateTime<Utc>,
    ) -> DeskResult<()> {
        let tx = self.conn.transaction()?;
        let n = tx.execute(
            "UPDATE client SET kyc_status = ?1, updated_at = ?2
             WHERE company_id = ?3 AND client_id = ?4 AND kyc_status = ?5",
            params![to, now, company_id, client_id, from],
        )?;
        if n == 0 {
            return Err(DeskError::not_found("client", client_id));
        }
        audit::append(
            &tx,
            &audit::AuditEvent {
                company_id,
                actor,
                entity_kind: "client",
                entity_id: client_id,
                action: "kyc_status_changed",
                field: Some("kyc_status"),
                old_value: Some(from.as_str()),
                new_value: Some(to.as_str()),
                created_at: now,
            },
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Persist a recomputed risk score/category (document state changed).
    pub fn set_risk_profile(
        &mut self,
        company_id: &str,
        client_id: &str,
        score: u8,
        category: RiskCategory,
        actor: &str,
        now: DateTime<Utc>,
        old_detail: &str,
        new_detail: &str,
    ) -> DeskResult<()> {
        let tx = self.conn.transaction()?;
        let n = tx.execute(
            "UPDATE client SET risk_score = ?1, risk_category = ?2, updated_at = ?3
             WHERE company_id = ?4 AND client_id = ?5",
            params![score as i64, category, now, company_id, client_id],
        )?;
        if n == 0 {
            return Err(DeskError::not_found("client", client_id));
        }
        audit::append(
            &tx,
            &audit::AuditEvent {
                company_id,
                actor,
                entity_kind: "client",
                entity_id: client_id,
                action: "risk_rescored",
                field: Some("risk_score"),
                old_value: Some(old_detail),
                new_value: Some(new_detail),
                created_at: now,
            },
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn get_client(&self, company_id: &str, client_id: &str) -> DeskResult<Option<ClientRow>> {
        let sql = format!(
            "SELECT {CLIENT_COLS} FROM client WHERE company_id = ?1 AND client_id = ?2"
        );
        let row = self
            .conn
            .prepare(&sql)?
            .query_row(params![company_id, client_id], map_client)
            .optional()?;
        Ok(row)
    }

    pub fn list_clients(&self, company_id: &str) -> DeskResult<Vec<ClientRow>> {
        let sql = format!(
            "SELECT {CLIENT_COLS} FROM client WHERE company_id = ?1 ORDER BY created_at ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![company_id], map_client)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn client_count(&self, company_id: &str) -> DeskResult<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM client WHERE company_id = ?1",
            params![company_id],
            |r| r.get(0),
        )?)
    }
}

fn map_client(r: &rusqlite::Row<'_>) -> rusqlite::Result<ClientRow> {
    Ok(ClientRow {
        client_id: r.get(0)?,
        company_id: r.get(1)?,
        kind: r.get(2)?,
        full_name: r.get(3)?,
        nationality: r.get(4)?,
        address: r.get(5)?,
        identification_number: r.get(6)?,
        trade_license: r.get(7)?,
        is_pep: r.get::<_, i64>(8)? != 0,
        kyc_status: r.get(9)?,
        risk_score: r.get::<_, i64>(10)? as u8,
        risk_category: r.get(11)?,
        aml_status: r.get(12)?,
        created_at: r.get(13)?,
        updated_at: r.get(14)?,
    })
}
