//! Watchlist storage. Entries are deployment-global reference data (no
//! tenant column) and carry no audit trail; only client-facing state is
//! audited.

use super::{ComplianceStore, WatchlistRow};
use crate::error::DeskResult;
use rusqlite::params;

impl ComplianceStore {
    /// Insert or replace one entry (imports are idempotent by entry_id).
    pub fn upsert_watchlist_entry(&mut self, row: &WatchlistRow) -> DeskResult<()> {
        let aliases = serde_json::to_string(&row.aliases)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO watchlist_entry (
                 entry_id, list_name, kind, full_name, aliases, country, notes, added_at
             ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
            params![
                row.entry_id,
                row.list_name,
                row.kind,
                row.full_name,
                aliases,
                row.country,
                row.notes,
                row.added_at,
            ],
        )?;
        Ok(())
    }

    pub fn watchlist(&self) -> DeskResult<Vec<WatchlistRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT entry_id, list_name, kind, full_name, aliases, country, notes, added_at
             FROM watchlist_entry
             ORDER BY list_name, entry_id",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok((
                WatchlistRow {
                    entry_id: r.get(0)?,
                    list_name: r.get(1)?,
                    kind: r.get(2)?,
                    full_name: r.get(3)?,
                    aliases: Vec::new(),
                    country: r.get(5)?,
                    notes: r.get(6)?,
                    added_at: r.get(7)?,
                },
                r.get::<_, String>(4)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (mut entry, aliases_json) = row?;
            entry.aliases = serde_json::from_str(&aliases_json)?;
            out.push(entry);
        }
        Ok(out)
    }

    pub fn watchlist_len(&self) -> DeskResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM watchlist_entry", [], |r| r.get(0))?)
    }
}
