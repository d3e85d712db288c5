//! SQLite persistence layer.
//!
//! RULE: Only the store module talks to the database. Workflow code calls
//! store methods; it never executes SQL directly.
//!
//! Every mutating method opens a transaction, applies the row change(s),
//! appends one audit entry per mutated entity, and commits. That is where
//! the audit invariant lives; callers cannot mutate state without an audit
//! trail.

mod audit;
mod client;
mod document;
mod screening;
mod watchlist;

use crate::error::DeskResult;
use crate::types::{
    ActorId, AmlStatus, ClientKind, CompanyId, DocumentKind, DocumentStatus, EntityId, KycStatus,
    RiskCategory, ScreeningDecision, WatchlistKind,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

pub use audit::AuditEntry;

pub struct ComplianceStore {
    conn: Connection,
}

// ── Rows ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CompanyRow {
    pub company_id: CompanyId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ClientRow {
    pub client_id: EntityId,
    pub company_id: CompanyId,
    pub kind: ClientKind,
    pub full_name: String,
    pub nationality: Option<String>,
    pub address: Option<String>,
    pub identification_number: Option<String>,
    pub trade_license: Option<String>,
    pub is_pep: bool,
    pub kyc_status: KycStatus,
    pub risk_score: u8,
    pub risk_category: RiskCategory,
    pub aml_status: AmlStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct DocumentRow {
    pub document_id: EntityId,
    pub company_id: CompanyId,
    pub client_id: EntityId,
    pub kind: DocumentKind,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub storage_key: String,
    pub status: DocumentStatus,
    pub reject_reason: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub uploaded_by: ActorId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ScreeningRow {
    pub screening_id: EntityId,
    pub company_id: CompanyId,
    pub client_id: EntityId,
    pub matched: bool,
    pub matched_entry_id: Option<String>,
    pub matched_name: Option<String>,
    pub matched_list: Option<String>,
    pub matched_field: Option<String>,
    pub confidence: u8,
    pub decision: ScreeningDecision,
    pub screened_by: ActorId,
    pub decided_by: ActorId,
    pub created_at: DateTime<Utc>,
    pub decided_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct WatchlistRow {
    pub entry_id: String,
    pub list_name: String,
    pub kind: WatchlistKind,
    pub full_name: String,
    pub aliases: Vec<String>,
    pub country: Option<String>,
    pub notes: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// Per-tenant dashboard counts.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ComplianceMetrics {
    pub clients_total: i64,
    pub kyc_pending: i64,
    pub kyc_in_review: i64,
    pub kyc_approved: i64,
    pub kyc_rejected: i64,
    pub kyc_expired: i64,
    pub aml_flagged: i64,
    pub aml_blocked: i64,
    pub high_risk_clients: i64,
    pub documents_pending: i64,
    pub screenings_total: i64,
    pub screenings_matched: i64,
}

// ── Connection lifecycle ─────────────────────────────────────────────────────

impl ComplianceStore {
    pub fn open(path: &str) -> DeskResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> DeskResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> DeskResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_clients.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/003_documents.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/004_screening.sql"))?;
        Ok(())
    }

    // ── Company ────────────────────────────────────────────────

    pub fn insert_company(&mut self, row: &CompanyRow, actor: &str) -> DeskResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO company (company_id, name, created_at) VALUES (?1, ?2, ?3)",
            params![row.company_id, row.name, row.created_at],
        )?;
        audit::append(
            &tx,
            &audit::AuditEvent {
                company_id: &row.company_id,
                actor,
                entity_kind: "company",
                entity_id: &row.company_id,
                action: "created",
                field: None,
                old_value: None,
                new_value: Some(&row.name),
                created_at: row.created_at,
            },
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn get_company(&self, company_id: &str) -> DeskResult<Option<CompanyRow>> {
        let row = self
            .conn
            .prepare("SELECT company_id, name, created_at FROM company WHERE company_id = ?1")?
            .query_row(params![company_id], |r| {
                Ok(CompanyRow {
                    company_id: r.get(0)?,
                    name: r.get(1)?,
                    created_at: r.get(2)?,
                })
            })
            .optional()?;
        Ok(row)
    }

    pub fn company_count(&self) -> DeskResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM company", [], |r| r.get(0))?)
    }
}
