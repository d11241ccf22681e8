//! In-memory [`TrainingStore`] used by the unit tests of this crate.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::error::CoreError;
use crate::training::{AssignmentRecord, Employee, System, TrainingStore};
use crate::types::{DbId, Timestamp, TrainingDate};

pub fn training_date() -> TrainingDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
}

/// How often each read query reached the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct Calls {
    pub assignments: usize,
    pub systems: usize,
    pub untrained: usize,
}

struct Row {
    employee_id: DbId,
    system_id: DbId,
    training_date: Option<TrainingDate>,
    assigned_at: Timestamp,
}

#[derive(Default)]
struct Inner {
    employees: Vec<Employee>,
    systems: Vec<System>,
    rows: Vec<Row>,
    calls: Calls,
}

#[derive(Default)]
pub struct FakeStore {
    inner: Mutex<Inner>,
    failing: AtomicBool,
}

impl FakeStore {
    /// Systems `[{1, "WMS"}]`, employees `[{10, "A"}, {11, "B"}]`, no
    /// assignments.
    pub fn scenario() -> Self {
        Self::default()
            .with_system(1, "WMS")
            .with_employee(10, "A")
            .with_employee(11, "B")
    }

    pub fn with_system(self, id: DbId, name: &str) -> Self {
        self.inner.lock().unwrap().systems.push(System {
            id,
            name: name.to_string(),
        });
        self
    }

    pub fn with_employee(self, id: DbId, name: &str) -> Self {
        self.inner.lock().unwrap().employees.push(Employee {
            id,
            name: name.to_string(),
        });
        self
    }

    /// Make every subsequent call fail with a data access error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Calls {
        self.inner.lock().unwrap().calls
    }

    pub fn assignment_count(&self) -> usize {
        self.inner.lock().unwrap().rows.len()
    }

    fn check(&self) -> Result<(), CoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(CoreError::DataAccess("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

fn employee_name(inner: &Inner, id: DbId) -> String {
    inner
        .employees
        .iter()
        .find(|e| e.id == id)
        .map(|e| e.name.clone())
        .unwrap_or_default()
}

fn system_name(inner: &Inner, id: DbId) -> String {
    inner
        .systems
        .iter()
        .find(|s| s.id == id)
        .map(|s| s.name.clone())
        .unwrap_or_default()
}

#[async_trait]
impl TrainingStore for FakeStore {
    async fn list_assignments(&self) -> Result<Vec<AssignmentRecord>, CoreError> {
        self.check()?;
        let mut inner = self.inner.lock().unwrap();
        inner.calls.assignments += 1;

        let mut records: Vec<AssignmentRecord> = inner
            .rows
            .iter()
            .map(|r| AssignmentRecord {
                employee_id: r.employee_id,
                employee_name: employee_name(&inner, r.employee_id),
                system_id: r.system_id,
                system_name: system_name(&inner, r.system_id),
                training_date: r.training_date,
                assigned_at: r.assigned_at,
            })
            .collect();
        records.sort_by(|a, b| {
            b.assigned_at
                .cmp(&a.assigned_at)
                .then_with(|| a.employee_name.cmp(&b.employee_name))
                .then_with(|| a.system_name.cmp(&b.system_name))
        });
        Ok(records)
    }

    async fn list_systems(&self) -> Result<Vec<System>, CoreError> {
        self.check()?;
        let mut inner = self.inner.lock().unwrap();
        inner.calls.systems += 1;

        let mut systems = inner.systems.clone();
        systems.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(systems)
    }

    async fn list_untrained_employees(
        &self,
        system_id: DbId,
    ) -> Result<Vec<Employee>, CoreError> {
        self.check()?;
        let mut inner = self.inner.lock().unwrap();
        inner.calls.untrained += 1;

        let mut employees: Vec<Employee> = inner
            .employees
            .iter()
            .filter(|e| {
                !inner
                    .rows
                    .iter()
                    .any(|r| r.employee_id == e.id && r.system_id == system_id)
            })
            .cloned()
            .collect();
        employees.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(employees)
    }

    async fn register_assignments(
        &self,
        system_id: DbId,
        training_date: TrainingDate,
        employee_ids: &BTreeSet<DbId>,
    ) -> Result<u64, CoreError> {
        self.check()?;
        let mut inner = self.inner.lock().unwrap();

        // All-or-nothing: reject the batch before inserting anything.
        let unknown_employee = employee_ids
            .iter()
            .any(|id| !inner.employees.iter().any(|e| e.id == *id));
        let unknown_system = !inner.systems.iter().any(|s| s.id == system_id);
        if unknown_employee || unknown_system {
            return Err(CoreError::DataAccess(
                "insert violates foreign key constraint".to_string(),
            ));
        }

        let now = Utc::now();
        let mut inserted = 0;
        for &employee_id in employee_ids {
            let exists = inner
                .rows
                .iter()
                .any(|r| r.employee_id == employee_id && r.system_id == system_id);
            if !exists {
                inner.rows.push(Row {
                    employee_id,
                    system_id,
                    training_date: Some(training_date),
                    assigned_at: now,
                });
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}
