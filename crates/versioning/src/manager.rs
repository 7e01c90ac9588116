//! `VersioningManager` (§4.11): the rule-version lifecycle on top of a
//! pluggable [`StorageAdapter`]. All mutating operations serialize per
//! `rule_id` via an in-process per-key lock, in addition to whatever
//! locking the adapter itself performs.

use crate::error::VersioningError;
use crate::record::{diff_rulesets, History, RulesetDiff, VersionRecord, VersionStatus, VersionSummary};
use crate::storage::StorageAdapter;
use decision_core::ids::{new_trace_id, now_ms};
use parking_lot::Mutex;
use rules::Ruleset;
use std::collections::HashMap;
use std::sync::Arc;

pub struct VersioningManager<S: StorageAdapter> {
    storage: S,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: StorageAdapter> VersioningManager<S> {
    pub fn new(storage: S) -> Self {
        Self { storage, locks: Mutex::new(HashMap::new()) }
    }

    fn lock_for(&self, rule_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        locks.entry(rule_id.to_string()).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
    }

    /// Validates `content`, assigns the next `version_number` for
    /// `rule_id`, and persists it. The first version for a `rule_id` is
    /// always active; later ones are draft unless `activate_on_save` is
    /// set, in which case the previously-active record is archived in the
    /// same locked section.
    pub fn save_version(
        &self,
        rule_id: &str,
        content: Ruleset,
        created_by: &str,
        changelog: Option<String>,
        activate_on_save: bool,
    ) -> Result<VersionRecord, VersioningError> {
        let lock = self.lock_for(rule_id);
        let _guard = lock.lock();

        let existing = self.storage.list(rule_id, None)?;
        let next_number = existing.iter().map(|r| r.version_number).max().unwrap_or(0) + 1;
        let is_first = existing.is_empty();
        let parent_version_id = existing.first().map(|r| r.id.clone());

        let record = VersionRecord {
            id: new_trace_id(),
            rule_id: rule_id.to_string(),
            version_number: next_number,
            content,
            created_by: created_by.to_string(),
            created_at: now_ms(),
            status: if is_first { VersionStatus::Active } else { VersionStatus::Draft },
            changelog,
            parent_version_id,
        };
        self.storage.save(&record)?;

        if !is_first && activate_on_save {
            self.storage.compare_and_set_active(rule_id, &record.id)?;
            return self.storage.load(&record.id)?.ok_or_else(|| VersioningError::UnknownVersion(record.id.clone()));
        }
        Ok(record)
    }

    pub fn get_version(&self, id: &str) -> Result<Option<VersionRecord>, VersioningError> {
        self.storage.load(id)
    }

    pub fn get_versions(&self, rule_id: &str, limit: Option<usize>) -> Result<Vec<VersionRecord>, VersioningError> {
        self.storage.list(rule_id, limit)
    }

    pub fn get_active_version(&self, rule_id: &str) -> Result<Option<VersionRecord>, VersioningError> {
        self.storage.find_active(rule_id)
    }

    /// Atomically transitions `version_id` to active, archiving whatever
    /// was previously active for the same `rule_id`. A no-op if
    /// `version_id` is already the active record (§8 idempotence rule).
    pub fn activate(&self, version_id: &str) -> Result<VersionRecord, VersioningError> {
        let record = self.storage.load(version_id)?.ok_or_else(|| VersioningError::UnknownVersion(version_id.to_string()))?;
        let lock = self.lock_for(&record.rule_id);
        let _guard = lock.lock();
        if record.status == VersionStatus::Active {
            return Ok(record);
        }
        self.storage.compare_and_set_active(&record.rule_id, version_id)?;
        self.storage.load(version_id)?.ok_or_else(|| VersioningError::UnknownVersion(version_id.to_string()))
    }

    /// Semantically `activate`, but the caller is signalling this is a
    /// rollback; the returned record's `changelog` is annotated for audit
    /// purposes if none was already set.
    pub fn rollback(&self, version_id: &str) -> Result<VersionRecord, VersioningError> {
        let mut record = self.activate(version_id)?;
        if record.changelog.is_none() {
            record.changelog = Some(format!("rollback to version {}", record.version_number));
        }
        Ok(record)
    }

    pub fn compare(&self, a: &str, b: &str) -> Result<RulesetDiff, VersioningError> {
        let a = self.storage.load(a)?.ok_or_else(|| VersioningError::UnknownVersion(a.to_string()))?;
        let b = self.storage.load(b)?.ok_or_else(|| VersioningError::UnknownVersion(b.to_string()))?;
        Ok(diff_rulesets(&a.content, &b.content))
    }

    pub fn get_history(&self, rule_id: &str) -> Result<History, VersioningError> {
        let versions = self.storage.list(rule_id, None)?;
        if versions.is_empty() {
            return Err(VersioningError::UnknownRule(rule_id.to_string()));
        }
        let active = self.storage.find_active(rule_id)?;
        let earliest = versions.iter().map(|r| r.created_at).min();
        let latest = versions.iter().map(|r| r.created_at).max();
        Ok(History {
            rule_id: rule_id.to_string(),
            total_versions: versions.len(),
            active_version: active.map(|r| VersionSummary { id: r.id, version_number: r.version_number }),
            earliest_created_at: earliest,
            latest_created_at: latest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_storage::FileStorageAdapter;
    use serde_json::json;

    fn ruleset(decision: &str) -> Ruleset {
        rules::validate_document(&json!({
            "version": "1", "ruleset": "kyc",
            "rules": [{"id": "r1", "if": {"all": []}, "then": {"decision": decision, "weight": 1.0, "reason": "ok"}}]
        }))
        .unwrap()
    }

    #[test]
    fn first_save_is_active_subsequent_are_draft() {
        let dir = tempfile::tempdir().unwrap();
        let manager = VersioningManager::new(FileStorageAdapter::new(dir.path()));
        let v1 = manager.save_version("kyc", ruleset("approve"), "alice", None, false).unwrap();
        assert_eq!(v1.status, VersionStatus::Active);
        let v2 = manager.save_version("kyc", ruleset("reject"), "alice", None, false).unwrap();
        assert_eq!(v2.status, VersionStatus::Draft);
        assert_eq!(manager.get_active_version("kyc").unwrap().unwrap().id, v1.id);
    }

    #[test]
    fn rollback_semantics_match_scenario() {
        // §8 scenario 4: save v1, save v2 (auto-active), rollback to v1.
        let dir = tempfile::tempdir().unwrap();
        let manager = VersioningManager::new(FileStorageAdapter::new(dir.path()));
        let v1 = manager.save_version("kyc", ruleset("approve"), "alice", None, false).unwrap();
        let v2 = manager.save_version("kyc", ruleset("reject"), "alice", None, true).unwrap();
        assert_eq!(manager.get_active_version("kyc").unwrap().unwrap().id, v2.id);

        manager.rollback(&v1.id).unwrap();
        assert_eq!(manager.get_active_version("kyc").unwrap().unwrap().version_number, 1);
        let v2_after = manager.get_version(&v2.id).unwrap().unwrap();
        assert_eq!(v2_after.status, VersionStatus::Archived);
        let history = manager.get_history("kyc").unwrap();
        assert_eq!(history.active_version.unwrap().version_number, 1);
    }

    #[test]
    fn activate_on_current_active_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let manager = VersioningManager::new(FileStorageAdapter::new(dir.path()));
        let v1 = manager.save_version("kyc", ruleset("approve"), "alice", None, false).unwrap();
        let again = manager.activate(&v1.id).unwrap();
        assert_eq!(again.status, VersionStatus::Active);
    }
}
