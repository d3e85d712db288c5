//! Document table queries and lifecycle mutations.

use super::{audit, ComplianceStore, DocumentRow};
use crate::error::{DeskError, DeskResult};
use crate::types::DocumentStatus;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

const DOC_COLS: &str = "document_id, company_id, client_id, kind, file_name, content_type,
     size_bytes, storage_key, status, reject_reason, expires_at,
     uploaded_by, created_at, updated_at";

impl ComplianceStore {
    pub fn insert_document(&mut self, row: &DocumentRow) -> DeskResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO document (
                 document_id, company_id, client_id, kind, file_name,
                 content_type, size_bytes, storage_key, status, reject_reason,
                 expires_at, uploaded_by, created_at, updated_at
             ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14)",
            params![
                row.document_id,
                row.company_id,
                row.client_id,
                row.kind,
                row.file_name,
                row.content_type,
                row.size_bytes,
                row.storage_key,
                row.status,
                row.reject_reason,
                row.expires_at,
                row.uploaded_by,
                row.created_at,
                row.updated_at,
            ],
        )?;
        audit::append(
            &tx,
            &audit::AuditEvent {
                company_id: &row.company_id,
                actor: &row.uploaded_by,
                entity_kind: "document",
                entity_id: &row.document_id,
                action: "uploaded",
                field: None,
                old_value: None,
                new_value: Some(row.kind.as_str()),
                created_at: row.created_at,
            },
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Move a document from `from` to `to` (verify / reject / expire).
    /// The WHERE clause pins the expected current status.
    pub fn set_document_status(
        &mut self,
        company_id: &str,
        document_id: &str,
        from: DocumentStatus,
        to: DocumentStatus,
        reject_reason: Option<&str>,
        actor: &str,
        now: DateTime<Utc>,
    ) -> DeskResult<()> {
        let tx = self.conn.transaction()?;
        let n = tx.execute(
            "UPDATE document SET status = ?1, reject_reason = ?2, updated_at = ?3
             WHERE company_id = ?4 AND document_id = ?5 AND status = ?6",
            params![to, reject_reason, now, company_id, document_id, from],
        )?;
        if n == 0 {
            return Err(DeskError::not_found("document", document_id));
        }
        audit::append(
            &tx,
            &audit::AuditEvent {
                company_id,
                actor,
                entity_kind: "document",
                entity_id: document_id,
                action: "status_changed",
                field: Some("status"),
                old_value: Some(from.as_str()),
                new_value: Some(to.as_str()),
                created_at: now,
            },
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Sweep: expire every pending/verified document whose `expires_at` is in
    /// the past. Each expired document gets its own audit entry; the whole
    /// sweep is one transaction. Returns the expired document ids.
    pub fn expire_documents(
        &mut self,
        company_id: &str,
        now: DateTime<Utc>,
        actor: &str,
    ) -> DeskResult<Vec<String>> {
        let tx = self.conn.transaction()?;
        let expired: Vec<(String, DocumentStatus)> = {
            let mut stmt = tx.prepare(
                "SELECT document_id, status FROM document
                 WHERE company_id = ?1
                   AND status IN ('pending', 'verified')
                   AND expires_at IS NOT NULL AND expires_at < ?2
                 ORDER BY document_id",
            )?;
            let rows = stmt.query_map(params![company_id, now], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, DocumentStatus>(1)?))
            })?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        for (document_id, old_status) in &expired {
            tx.execute(
                "UPDATE document SET status = 'expired', updated_at = ?1
                 WHERE company_id = ?2 AND document_id = ?3",
                params![now, company_id, document_id],
            )?;
            audit::append(
                &tx,
                &audit::AuditEvent {
                    company_id,
                    actor,
                    entity_kind: "document",
                    entity_id: document_id,
                    action: "status_changed",
                    field: Some("status"),
                    old_value: Some(old_status.as_str()),
                    new_value: Some(DocumentStatus::Expired.as_str()),
                    created_at: now,
                },
            )?;
        }
        tx.commit()?;
        Ok(expired.into_iter().map(|(id, _)| id).collect())
    }

    pub fn get_document(
        &self,
        company_id: &str,
        document_id: &str,
    ) -> DeskResult<Option<DocumentRow>> {
        let sql = format!(
            "SELECT {DOC_COLS} FROM document WHERE company_id = ?1 AND document_id = ?2"
        );
        let row = self
            .conn
            .prepare(&sql)?
            .query_row(params![company_id, document_id], map_document)
            .optional()?;
        Ok(row)
    }

    pub fn documents_for_client(
        &self,
        company_id: &str,
        client_id: &str,
    ) -> DeskResult<Vec<DocumentRow>> {
        let sql = format!(
            "SELECT {DOC_COLS} FROM document
             WHERE company_id = ?1 AND client_id = ?2
             ORDER BY created_at ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![company_id, client_id], map_document)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Whether the client has at least one verified identification document
    /// (passport or national id).
    pub fn has_verified_identification(
        &self,
        company_id: &str,
        client_id: &str,
    ) -> DeskResult<bool> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM document
             WHERE company_id = ?1 AND client_id = ?2 AND status = 'verified'
               AND kind IN ('passport', 'national_id')",
            params![company_id, client_id],
            |r| r.get(0),
        )?;
        Ok(n > 0)
    }

    /// Whether the client has a verified trade-license document.
    pub fn has_verified_trade_license(
        &self,
        company_id: &str,
        client_id: &str,
    ) -> DeskResult<bool> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM document
             WHERE company_id = ?1 AND client_id = ?2 AND status = 'verified'
               AND kind = 'trade_license'",
            params![company_id, client_id],
            |r| r.get(0),
        )?;
        Ok(n > 0)
    }
}

fn map_document(r: &rusqlite::Row<'_>) -> rusqlite::Result<DocumentRow> {
    Ok(DocumentRow {
        document_id: r.get(0)?,
        company_id: r.get(1)?,
        client_id: r.get(2)?,
        kind: r.get(3)?,
        file_name: r.get(4)?,
        content_type: r.get(5)?,
        size_bytes: r.get(6)?,
        storage_key: r.get(7)?,
        status: r.get(8)?,
        reject_reason: r.get(9)?,
        expires_at: r.get(10)?,
        uploaded_by: r.get(11)?,
        created_at: r.get(12)?,
        updated_at: r.get(13)?,
    })
}
