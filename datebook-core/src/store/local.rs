//! Local-simulated appointment store.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::appointment::{Appointment, AppointmentId, NewAppointment};
use crate::date::YearMonth;
use crate::error::{DatebookError, DatebookResult};
use crate::store::{AppointmentStore, ApplyMode};

/// In-memory store. Clones share the same records.
///
/// Used when no backend is configured, and as the storage behind
/// `datebook-server`.
#[derive(Debug, Clone, Default)]
pub struct LocalStore {
    records: Arc<Mutex<Vec<Appointment>>>,
}

impl LocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with existing records, kept in the given order.
    pub fn with_records(records: Vec<Appointment>) -> Self {
        LocalStore {
            records: Arc::new(Mutex::new(records)),
        }
    }

    fn records(&self) -> DatebookResult<MutexGuard<'_, Vec<Appointment>>> {
        self.records
            .lock()
            .map_err(|_| DatebookError::Store("local store lock poisoned".into()))
    }

    pub fn create_now(&self, request: &NewAppointment) -> DatebookResult<Appointment> {
        let record = request.validate()?.with_id(AppointmentId::generate());
        self.records()?.push(record.clone());
        tracing::debug!(id = %record.id, date = %record.date, "created appointment");
        Ok(record)
    }

    pub fn list_now(&self, month: YearMonth) -> DatebookResult<Vec<Appointment>> {
        Ok(self
            .records()?
            .iter()
            .filter(|record| month.contains(&record.date))
            .cloned()
            .collect())
    }

    pub fn delete_now(&self, id: &AppointmentId) -> DatebookResult<()> {
        let mut records = self.records()?;
        let position = records
            .iter()
            .position(|record| &record.id == id)
            .ok_or_else(|| DatebookError::NotFound(id.to_string()))?;
        records.remove(position);
        tracing::debug!(%id, "deleted appointment");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records().map(|records| records.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AppointmentStore for LocalStore {
    fn apply_mode(&self) -> ApplyMode {
        ApplyMode::Immediate
    }

    async fn create(&self, request: NewAppointment) -> DatebookResult<Appointment> {
        self.create_now(&request)
    }

    async fn list(&self, month: YearMonth) -> DatebookResult<Vec<Appointment>> {
        self.list_now(month)
    }

    async fn delete(&self, id: &AppointmentId) -> DatebookResult<()> {
        self.delete_now(id)
    }
}
