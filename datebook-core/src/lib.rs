//! Core of datebook: a month calendar with appointments attached to dates.
//!
//! - `date` and `grid` compute the fixed 42-cell month view
//! - `index` projects appointments onto date keys
//! - `store` is the create/list/delete contract, with a local in-memory
//!   store and an HTTP client for `datebook-server`
//! - `controller` drives navigation and keeps the index in step with the store

pub mod appointment;
pub mod config;
pub mod controller;
pub mod date;
pub mod error;
pub mod grid;
pub mod index;
pub mod store;
pub mod time_format;

pub use appointment::{Appointment, AppointmentId, AppointmentKind, NewAppointment};
pub use controller::{FetchOutcome, MonthView, SyncController, SyncState};
pub use date::{DateKey, YearMonth};
pub use error::{DatebookError, DatebookResult};
pub use grid::CalendarCell;
pub use index::AppointmentIndex;
pub use store::{AppointmentStore, ApplyMode, LocalStore, RemoteStore, StoreBackend};
