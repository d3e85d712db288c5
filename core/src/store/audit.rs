//! Append-only audit log.
//!
//! Entries are written inside the same transaction as the mutation they
//! describe (see the module RULE in `store/mod.rs`). There is no update or
//! delete path for this table, by schema and by API.

use super::ComplianceStore;
use crate::error::DeskResult;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

/// A committed audit row.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AuditEntry {
    pub id: i64,
    pub company_id: String,
    pub actor: String,
    pub entity_kind: String,
    pub entity_id: String,
    pub action: String,
    pub field: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An audit entry about to be written, borrowed from the mutation site.
pub(super) struct AuditEvent<'a> {
    pub company_id: &'a str,
    pub actor: &'a str,
    pub entity_kind: &'a str,
    pub entity_id: &'a str,
    pub action: &'a str,
    pub field: Option<&'a str>,
    pub old_value: Option<&'a str>,
    pub new_value: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

/// Append one entry. Takes the transaction's connection so callers cannot
/// audit outside a mutation.
pub(super) fn append(conn: &Connection, e: &AuditEvent<'_>) -> DeskResult<()> {
    conn.execute(
        "INSERT INTO audit_log (company_id, actor, entity_kind, entity_id,
                                action, field, old_value, new_value, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            e.company_id,
            e.actor,
            e.entity_kind,
            e.entity_id,
            e.action,
            e.field,
            e.old_value,
            e.new_value,
            e.created_at,
        ],
    )?;
    Ok(())
}

impl ComplianceStore {
    /// Full history for one entity, oldest first.
    pub fn audit_for_entity(
        &self,
        company_id: &str,
        entity_kind: &str,
        entity_id: &str,
    ) -> DeskResult<Vec<AuditEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, company_id, actor, entity_kind, entity_id, action,
                    field, old_value, new_value, created_at
             FROM audit_log
             WHERE company_id = ?1 AND entity_kind = ?2 AND entity_id = ?3
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![company_id, entity_kind, entity_id], map_audit)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Most recent entries for a tenant, newest first.
    pub fn recent_audit(&self, company_id: &str, limit: i64) -> DeskResult<Vec<AuditEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, company_id, actor, entity_kind, entity_id, action,
                    field, old_value, new_value, created_at
             FROM audit_log
             WHERE company_id = ?1
             ORDER BY id DESC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![company_id, limit], map_audit)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn audit_count(&self, company_id: &str) -> DeskResult<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM audit_log WHERE company_id = ?1",
            params![company_id],
            |r| r.get(0),
        )?)
    }
}

fn map_audit(r: &rusqlite::Row<'_>) -> rusqlite::Result<AuditEntry> {
    Ok(AuditEntry {
        id: r.get(0)?,
        company_id: r.get(1)?,
        actor: r.get(2)?,
        entity_kind: r.get(3)?,
        entity_id: r.get(4)?,
        action: r.get(5)?,
        field: r.get(6)?,
        old_value: r.get(7)?,
        new_value: r.get(8)?,
        created_at: r.get(9)?,
    })
}
