//! Storage adapter interface (§4.12), consumed by [`crate::manager::VersioningManager`].

use crate::error::VersioningError;
use crate::record::VersionRecord;

pub trait StorageAdapter: Send + Sync {
    fn save(&self, record: &VersionRecord) -> Result<(), VersioningError>;
    fn load(&self, id: &str) -> Result<Option<VersionRecord>, VersioningError>;
    fn list(&self, rule_id: &str, limit: Option<usize>) -> Result<Vec<VersionRecord>, VersioningError>;
    fn find_active(&self, rule_id: &str) -> Result<Option<VersionRecord>, VersioningError>;

    /// Atomically make `new_id` the active record for `rule_id`, archiving
    /// whatever was previously active. Implementations must be
    /// linearizable per `rule_id`.
    fn compare_and_set_active(&self, rule_id: &str, new_id: &str) -> Result<(), VersioningError>;
}
