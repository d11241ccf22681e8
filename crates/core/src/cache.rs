//! Time-bounded read-through cache in front of a [`TrainingStore`].
//!
//! Each query key holds one [`CacheEntry`]. Entries are never swept: a stale
//! entry is detected on the next read and replaced. Writes invalidate the
//! keys they affect explicitly instead of waiting for expiry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::error::CoreError;
use crate::training::{AssignmentRecord, Employee, System, TrainingStore};
use crate::types::DbId;

/// Validity window per query type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheWindows {
    pub assignments: Duration,
    pub systems: Duration,
    pub untrained: Duration,
}

impl Default for CacheWindows {
    fn default() -> Self {
        Self {
            assignments: Duration::from_secs(10),
            systems: Duration::from_secs(60),
            untrained: Duration::from_secs(5),
        }
    }
}

/// A cached query result and the moment it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub fetched_at: Instant,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, fetched_at: Instant) -> Self {
        Self { value, fetched_at }
    }

    pub fn is_fresh(&self, now: Instant, window: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) < window
    }
}

/// Cached results of the three read queries for one session.
#[derive(Debug, Default)]
pub struct ReadCache {
    windows: CacheWindows,
    assignments: Option<CacheEntry<Vec<AssignmentRecord>>>,
    systems: Option<CacheEntry<Vec<System>>>,
    untrained: HashMap<DbId, CacheEntry<Vec<Employee>>>,
}

impl ReadCache {
    pub fn new(windows: CacheWindows) -> Self {
        Self {
            windows,
            ..Self::default()
        }
    }

    pub fn windows(&self) -> CacheWindows {
        self.windows
    }

    /// All assignments, fetched from `store` if missing or stale.
    pub async fn assignments(
        &mut self,
        store: &dyn TrainingStore,
        now: Instant,
    ) -> Result<&[AssignmentRecord], CoreError> {
        let fresh = self
            .assignments
            .as_ref()
            .is_some_and(|e| e.is_fresh(now, self.windows.assignments));
        if !fresh {
            let rows = store.list_assignments().await?;
            tracing::debug!(rows = rows.len(), "Fetched assignments");
            self.assignments = Some(CacheEntry::new(rows, now));
        }
        Ok(self
            .assignments
            .as_ref()
            .map(|e| e.value.as_slice())
            .unwrap_or_default())
    }

    /// All systems, fetched from `store` if missing or stale.
    pub async fn systems(
        &mut self,
        store: &dyn TrainingStore,
        now: Instant,
    ) -> Result<&[System], CoreError> {
        let fresh = self
            .systems
            .as_ref()
            .is_some_and(|e| e.is_fresh(now, self.windows.systems));
        if !fresh {
            let rows = store.list_systems().await?;
            tracing::debug!(rows = rows.len(), "Fetched systems");
            self.systems = Some(CacheEntry::new(rows, now));
        }
        Ok(self
            .systems
            .as_ref()
            .map(|e| e.value.as_slice())
            .unwrap_or_default())
    }

    /// Employees not yet trained on `system_id`, fetched if missing or stale.
    pub async fn untrained_employees(
        &mut self,
        store: &dyn TrainingStore,
        system_id: DbId,
        now: Instant,
    ) -> Result<&[Employee], CoreError> {
        let fresh = self
            .untrained
            .get(&system_id)
            .is_some_and(|e| e.is_fresh(now, self.windows.untrained));
        if !fresh {
            let rows = store.list_untrained_employees(system_id).await?;
            tracing::debug!(system_id, rows = rows.len(), "Fetched untrained employees");
            self.untrained.insert(system_id, CacheEntry::new(rows, now));
        }
        Ok(self
            .untrained
            .get(&system_id)
            .map(|e| e.value.as_slice())
            .unwrap_or_default())
    }

    /// Systems from the last successful fetch, fresh or not.
    pub fn cached_systems(&self) -> &[System] {
        self.systems
            .as_ref()
            .map(|e| e.value.as_slice())
            .unwrap_or_default()
    }

    pub fn invalidate_assignments(&mut self) {
        self.assignments = None;
    }

    pub fn invalidate_untrained(&mut self, system_id: DbId) {
        self.untrained.remove(&system_id);
    }

    pub fn invalidate_all(&mut self) {
        self.assignments = None;
        self.systems = None;
        self.untrained.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
