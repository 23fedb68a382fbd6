//! The appointment store contract and its two realizations.
//!
//! - [`LocalStore`] keeps records in memory and answers synchronously.
//! - [`RemoteStore`] persists through `datebook-server` over HTTP.
//!
//! Both are driven through [`AppointmentStore`]; [`ApplyMode`] tells the
//! controller when it may mirror an operation into its index.

pub mod local;
pub mod protocol;
pub mod remote;

use std::future::Future;

use crate::appointment::{Appointment, AppointmentId, NewAppointment};
use crate::date::YearMonth;
use crate::error::DatebookResult;

pub use local::LocalStore;
pub use remote::RemoteStore;

/// When a create or delete may be reflected in local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// No round trip: the store call and the local update happen together.
    Immediate,
    /// Local state changes only after the store confirms the operation.
    ConfirmThenApply,
}

pub trait AppointmentStore: Send + Sync {
    fn apply_mode(&self) -> ApplyMode;

    /// Persist a new appointment. Fails with `Validation` when the date is
    /// missing or not a canonical key.
    fn create(
        &self,
        request: NewAppointment,
    ) -> impl Future<Output = DatebookResult<Appointment>> + Send;

    /// Every appointment dated within `month`, in no particular order.
    fn list(
        &self,
        month: YearMonth,
    ) -> impl Future<Output = DatebookResult<Vec<Appointment>>> + Send;

    /// Remove an appointment. Fails with `NotFound` for unknown ids.
    fn delete(&self, id: &AppointmentId) -> impl Future<Output = DatebookResult<()>> + Send;
}

/// A store chosen at runtime.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    Local(LocalStore),
    Remote(RemoteStore),
}

impl StoreBackend {
    pub fn describe(&self) -> String {
        match self {
            StoreBackend::Local(_) => "local (in-memory)".to_string(),
            StoreBackend::Remote(remote) => format!("remote ({})", remote.base_url()),
        }
    }
}

impl AppointmentStore for StoreBackend {
    fn apply_mode(&self) -> ApplyMode {
        match self {
            StoreBackend::Local(store) => store.apply_mode(),
            StoreBackend::Remote(store) => store.apply_mode(),
        }
    }

    async fn create(&self, request: NewAppointment) -> DatebookResult<Appointment> {
        match self {
            StoreBackend::Local(store) => store.create(request).await,
            StoreBackend::Remote(store) => store.create(request).await,
        }
    }

    async fn list(&self, month: YearMonth) -> DatebookResult<Vec<Appointment>> {
        match self {
            StoreBackend::Local(store) => store.list(month).await,
            StoreBackend::Remote(store) => store.list(month).await,
        }
    }

    async fn delete(&self, id: &AppointmentId) -> DatebookResult<()> {
        match self {
            StoreBackend::Local(store) => store.delete(id).await,
            StoreBackend::Remote(store) => store.delete(id).await,
        }
    }
}
