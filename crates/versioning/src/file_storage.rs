//! File-storage adapter (§4.12): one JSON file per record under
//! `storage_path/rule_id/<version_id>.json`. Mutations acquire an
//! exclusive lock scoped to the rule_id so concurrent `save`/`activate`
//! calls against the same rule serialize the way §4.11 requires; writes
//! land via write-temp-then-rename, the same durability pattern the
//! content-addressed store in this workspace uses.

use crate::error::VersioningError;
use crate::record::{VersionRecord, VersionStatus};
use crate::storage::StorageAdapter;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct FileStorageAdapter {
    root: PathBuf,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FileStorageAdapter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), locks: Mutex::new(HashMap::new()) }
    }

    fn lock_for(&self, rule_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        locks.entry(rule_id.to_string()).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
    }

    fn rule_dir(&self, rule_id: &str) -> PathBuf {
        self.root.join(rule_id)
    }

    fn record_path(&self, rule_id: &str, id: &str) -> PathBuf {
        self.rule_dir(rule_id).join(format!("{id}.json"))
    }

    fn io_err(path: &Path, source: std::io::Error) -> VersioningError {
        VersioningError::Io { path: path.display().to_string(), source }
    }

    fn write_record(&self, record: &VersionRecord) -> Result<(), VersioningError> {
        let dir = self.rule_dir(&record.rule_id);
        fs::create_dir_all(&dir).map_err(|e| Self::io_err(&dir, e))?;
        let final_path = self.record_path(&record.rule_id, &record.id);
        let tmp_path = dir.join(format!("{}.tmp", record.id));
        let bytes = serde_json::to_vec_pretty(record)?;
        fs::write(&tmp_path, &bytes).map_err(|e| Self::io_err(&tmp_path, e))?;
        fs::rename(&tmp_path, &final_path).map_err(|e| Self::io_err(&final_path, e))?;
        Ok(())
    }

    fn read_record(path: &Path) -> Result<VersionRecord, VersioningError> {
        let bytes = fs::read(path).map_err(|e| Self::io_err(path, e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// All records for `rule_id`, sorted by `version_number` ascending.
    fn all_for_rule(&self, rule_id: &str) -> Result<Vec<VersionRecord>, VersioningError> {
        let dir = self.rule_dir(rule_id);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut records = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| Self::io_err(&dir, e))? {
            let entry = entry.map_err(|e| Self::io_err(&dir, e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                records.push(Self::read_record(&path)?);
            }
        }
        records.sort_by_key(|r| r.version_number);
        Ok(records)
    }
}

impl StorageAdapter for FileStorageAdapter {
    fn save(&self, record: &VersionRecord) -> Result<(), VersioningError> {
        let lock = self.lock_for(&record.rule_id);
        let _guard = lock.lock();
        self.write_record(record)
    }

    fn load(&self, id: &str) -> Result<Option<VersionRecord>, VersioningError> {
        if !self.root.exists() {
            return Ok(None);
        }
        for entry in fs::read_dir(&self.root).map_err(|e| Self::io_err(&self.root, e))? {
            let entry = entry.map_err(|e| Self::io_err(&self.root, e))?;
            if !entry.path().is_dir() {
                continue;
            }
            let candidate = entry.path().join(format!("{id}.json"));
            if candidate.exists() {
                return Ok(Some(Self::read_record(&candidate)?));
            }
        }
        Ok(None)
    }

    fn list(&self, rule_id: &str, limit: Option<usize>) -> Result<Vec<VersionRecord>, VersioningError> {
        let mut records = self.all_for_rule(rule_id)?;
        records.reverse(); // newest first
        if let Some(limit) = limit {
            records.truncate(limit);
        }
        Ok(records)
    }

    /// Self-heals the "no active or two active" crash scenario described
    /// in §4.11: if reconciliation finds more than one active record, the
    /// highest `version_number` wins and the rest are treated as archived
    /// for the purpose of this read (disk state is repaired lazily on the
    /// next `compare_and_set_active`).
    fn find_active(&self, rule_id: &str) -> Result<Option<VersionRecord>, VersioningError> {
        let records = self.all_for_rule(rule_id)?;
        let active: Vec<_> = records.into_iter().filter(|r| r.status == VersionStatus::Active).collect();
        Ok(active.into_iter().max_by_key(|r| r.version_number))
    }

    fn compare_and_set_active(&self, rule_id: &str, new_id: &str) -> Result<(), VersioningError> {
        let lock = self.lock_for(rule_id);
        let _guard = lock.lock();
        let mut records = self.all_for_rule(rule_id)?;
        let Some(target_idx) = records.iter().position(|r| r.id == new_id) else {
            return Err(VersioningError::UnknownVersion(new_id.to_string()));
        };
        records[target_idx].status = VersionStatus::Active;
        self.write_record(&records[target_idx])?;
        for (idx, record) in records.iter_mut().enumerate() {
            if idx != target_idx && record.status == VersionStatus::Active {
                record.status = VersionStatus::Archived;
                self.write_record(record)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rules::validate_document;
    use serde_json::json;

    fn sample_content() -> rules::Ruleset {
        validate_document(&json!({
            "version": "1",
            "ruleset": "kyc",
            "rules": [{"id": "r1", "if": {"all": []}, "then": {"decision": "approve", "weight": 1.0, "reason": "ok"}}]
        }))
        .unwrap()
    }

    fn record(id: &str, rule_id: &str, version_number: u64, status: VersionStatus) -> VersionRecord {
        VersionRecord {
            id: id.to_string(),
            rule_id: rule_id.to_string(),
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
    fn round_trips_through_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = FileStorageAdapter::new(dir.path());
        let rec = record("v1", "kyc", 1, VersionStatus::Active);
        adapter.save(&rec).unwrap();
        let loaded = adapter.load("v1").unwrap().unwrap();
        assert_eq!(loaded.id, "v1");
        assert_eq!(adapter.find_active("kyc").unwrap().unwrap().id, "v1");
    }

    #[test]
    fn activation_archives_previous_active() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = FileStorageAdapter::new(dir.path());
        adapter.save(&record("v1", "kyc", 1, VersionStatus::Active)).unwrap();
        adapter.save(&record("v2", "kyc", 2, VersionStatus::Draft)).unwrap();
        adapter.compare_and_set_active("kyc", "v2").unwrap();
        assert_eq!(adapter.find_active("kyc").unwrap().unwrap().id, "v2");
        let v1 = adapter.load("v1").unwrap().unwrap();
        assert_eq!(v1.status, VersionStatus::Archived);
    }

    #[test]
    fn list_sorts_newest_first_and_respects_limit() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = FileStorageAdapter::new(dir.path());
        adapter.save(&record("v1", "kyc", 1, VersionStatus::Archived)).unwrap();
        adapter.save(&record("v2", "kyc", 2, VersionStatus::Active)).unwrap();
        let listed = adapter.list("kyc", Some(1)).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "v2");
    }
}
