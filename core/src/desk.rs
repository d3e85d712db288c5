//! The compliance desk facade: owns the store and the configuration.
//!
//! Workflow methods live in impl blocks next to their concern
//! (`onboarding.rs`, `documents.rs`, `screening.rs`); this module holds
//! construction, tenants, watchlist import, and reporting.

use crate::config::DeskConfig;
use crate::error::{DeskError, DeskResult};
use crate::store::{AuditEntry, ComplianceMetrics, ComplianceStore, CompanyRow, WatchlistRow};
use crate::types::WatchlistKind;
use chrono::Utc;
use log::info;
use serde::Deserialize;
use std::path::Path;
use uuid::Uuid;

pub struct ComplianceDesk {
    pub store: ComplianceStore,
    pub config: DeskConfig,
}

/// On-disk watchlist import format.
#[derive(Debug, Deserialize)]
pub struct WatchlistFile {
    pub entries: Vec<WatchlistEntryDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchlistEntryDef {
    pub entry_id: String,
    pub list_name: String,
    pub kind: WatchlistKind,
    pub full_name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ComplianceDesk {
    /// Open (or create) a desk database at `path` and apply migrations.
    pub fn open(path: &str, config: DeskConfig) -> DeskResult<Self> {
        let store = ComplianceStore::open(path)?;
        store.migrate()?;
        Ok(Self { store, config })
    }

    /// In-memory desk (used in tests).
    pub fn in_memory(config: DeskConfig) -> DeskResult<Self> {
        let store = ComplianceStore::in_memory()?;
        store.migrate()?;
        Ok(Self { store, config })
    }

    // ── Tenants ────────────────────────────────────────────────

    pub fn create_company(&mut self, name: &str, actor: &str) -> DeskResult<CompanyRow> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DeskError::Validation("company name must not be empty".into()));
        }
        let row = CompanyRow {
            company_id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.store.insert_company(&row, actor)?;
        info!("company '{}' created ({})", row.name, row.company_id);
        Ok(row)
    }

    pub fn get_company(&self, company_id: &str) -> DeskResult<CompanyRow> {
        self.store
            .get_company(company_id)?
            .ok_or_else(|| DeskError::not_found("company", company_id))
    }

    // ── Watchlist ──────────────────────────────────────────────

    /// Import (upsert) watchlist entries from a JSON file.
    pub fn import_watchlist(&mut self, path: impl AsRef<Path>) -> DeskResult<usize> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("reading {}: {e}", path.as_ref().display()))?;
        let file: WatchlistFile = serde_json::from_str(&raw)?;
        self.import_watchlist_entries(file.entries)
    }

    pub fn import_watchlist_entries(
        &mut self,
        entries: Vec<WatchlistEntryDef>,
    ) -> DeskResult<usize> {
        let now = Utc::now();
        let count = entries.len();
        for def in entries {
            if def.full_name.trim().is_empty() {
                return Err(DeskError::Validation(format!(
                    "watchlist entry '{}' has an empty name",
                    def.entry_id
                )));
            }
            self.store.upsert_watchlist_entry(&WatchlistRow {
                entry_id: def.entry_id,
                list_name: def.list_name,
                kind: def.kind,
                full_name: def.full_name,
                aliases: def.aliases,
                country: def.country,
                notes: def.notes,
                added_at: now,
            })?;
        }
        info!("imported {count} watchlist entries");
        Ok(count)
    }

    pub fn watchlist_len(&self) -> DeskResult<i64> {
        self.store.watchlist_len()
    }

    // ── Reporting ──────────────────────────────────────────────

    pub fn compliance_metrics(&self, company_id: &str) -> DeskResult<ComplianceMetrics> {
        self.store.compliance_metrics(company_id)
    }

    pub fn audit_for_entity(
        &self,
        company_id: &str,
        entity_kind: &str,
        entity_id: &str,
    ) -> DeskResult<Vec<AuditEntry>> {
        self.store.audit_for_entity(company_id, entity_kind, entity_id)
    }

    pub fn recent_audit(&self, company_id: &str, limit: i64) -> DeskResult<Vec<AuditEntry>> {
        self.store.recent_audit(company_id, limit)
    }
}
