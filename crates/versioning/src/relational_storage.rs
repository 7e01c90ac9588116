//! Relational storage adapter (§4.12), gated behind the `sqlite` feature.
//! Activation runs inside a single transaction that demotes the old
//! active row and promotes the new one, so readers never observe a
//! window with zero or two active rows for a `rule_id`.

use crate::error::VersioningError;
use crate::record::{VersionRecord, VersionStatus};
use crate::storage::StorageAdapter;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

pub struct RelationalStorageAdapter {
    conn: Mutex<Connection>,
}

impl RelationalStorageAdapter {
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, VersioningError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS version_records (
                id TEXT PRIMARY KEY,
                rule_id TEXT NOT NULL,
                version_number INTEGER NOT NULL,
                content TEXT NOT NULL,
                created_by TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                status TEXT NOT NULL,
                changelog TEXT,
                parent_version_id TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_rule_id ON version_records(rule_id);",
        )?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub fn open_in_memory() -> Result<Self, VersioningError> {
        Self::open(":memory:")
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<VersionRecord> {
        let content_json: String = row.get("content")?;
        let status_str: String = row.get("status")?;
        let content = serde_json::from_str(&content_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))?;
        let status = match status_str.as_str() {
            "draft" => VersionStatus::Draft,
            "active" => VersionStatus::Active,
            _ => VersionStatus::Archived,
        };
        Ok(VersionRecord {
            id: row.get("id")?,
            rule_id: row.get("rule_id")?,
            version_number: row.get::<_, i64>("version_number")? as u64,
            content,
            created_by: row.get("created_by")?,
            created_at: row.get::<_, i64>("created_at")? as u64,
            status,
            changelog: row.get("changelog")?,
            parent_version_id: row.get("parent_version_id")?,
        })
    }
}

impl StorageAdapter for RelationalStorageAdapter {
    fn save(&self, record: &VersionRecord) -> Result<(), VersioningError> {
        let conn = self.conn.lock();
        let content_json = serde_json::to_string(&record.content)?;
        let status_str = match record.status {
            VersionStatus::Draft => "draft",
            VersionStatus::Active => "active",
            VersionStatus::Archived => "archived",
        };
        conn.execute(
            "INSERT OR REPLACE INTO version_records
                (id, rule_id, version_number, content, created_by, created_at, status, changelog, parent_version_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.id,
                record.rule_id,
                record.version_number as i64,
                content_json,
                record.created_by,
                record.created_at as i64,
                status_str,
                record.changelog,
                record.parent_version_id,
            ],
        )?;
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Option<VersionRecord>, VersioningError> {
        let conn = self.conn.lock();
        let record = conn
            .query_row("SELECT * FROM version_records WHERE id = ?1", params![id], Self::row_to_record)
            .optional()?;
        Ok(record)
    }

    fn list(&self, rule_id: &str, limit: Option<usize>) -> Result<Vec<VersionRecord>, VersioningError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT * FROM version_records WHERE rule_id = ?1 ORDER BY version_number DESC LIMIT ?2",
        )?;
        let limit = limit.unwrap_or(i64::MAX as usize) as i64;
        let rows = stmt.query_map(params![rule_id, limit], Self::row_to_record)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn find_active(&self, rule_id: &str) -> Result<Option<VersionRecord>, VersioningError> {
        let conn = self.conn.lock();
        let record = conn
            .query_row(
                "SELECT * FROM version_records WHERE rule_id = ?1 AND status = 'active'
                 ORDER BY version_number DESC LIMIT 1",
                params![rule_id],
                Self::row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    fn compare_and_set_active(&self, rule_id: &str, new_id: &str) -> Result<(), VersioningError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let exists: Option<String> =
            tx.query_row("SELECT id FROM version_records WHERE id = ?1", params![new_id], |r| r.get(0)).optional()?;
        if exists.is_none() {
            return Err(VersioningError::UnknownVersion(new_id.to_string()));
        }
        tx.execute(
            "UPDATE version_records SET status = 'archived' WHERE rule_id = ?1 AND status = 'active' AND id != ?2",
            params![rule_id, new_id],
        )?;
        tx.execute("UPDATE version_records SET status = 'active' WHERE id = ?1", params![new_id])?;
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_content() -> rules::Ruleset {
        rules::validate_document(&json!({
            "version": "1", "ruleset": "kyc",
            "rules": [{"id": "r1", "if": {"all": []}, "then": {"decision": "approve", "weight": 1.0, "reason": "ok"}}]
        }))
        .unwrap()
    }

    fn record(id: &str, version_number: u64, status: VersionStatus) -> VersionRecord {
        VersionRecord {
            id: id.to_string(),
            rule_id: "kyc".to_string(),
            version_number,
            content: sample_content(),
            created_by: "alice".to_string(),
            created_at: 0,
            status,
            changelog: None,
            parent_version_id: None,
        }
    }

    #[test]
    fn activation_is_transactional() {
        let adapter = RelationalStorageAdapter::open_in_memory().unwrap();
        adapter.save(&record("v1", 1, VersionStatus::Active)).unwrap();
        adapter.save(&record("v2", 2, VersionStatus::Draft)).unwrap();
        adapter.compare_and_set_active("kyc", "v2").unwrap();
        assert_eq!(adapter.find_active("kyc").unwrap().unwrap().id, "v2");
        assert_eq!(adapter.load("v1").unwrap().unwrap().status, VersionStatus::Archived);
    }
}
