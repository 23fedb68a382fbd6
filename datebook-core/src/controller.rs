//! Keeps the displayed month, the appointment index and the store in step.
//!
//! Each fetch is stamped with a sequence number when it is issued. When the
//! store answers, the response is applied only if no newer fetch has been
//! issued since; older responses are dropped as they arrive, whether they
//! succeeded or failed. Nothing is cancelled.
//!
//! Index mutations only happen while the controller state lock is held, so
//! readers see the index either before or after a rebuild, never during.
//!
//! A write confirmed while the latest fetch is still out may be missing
//! from that fetch's response. Such writes are kept aside and replayed onto
//! the rebuilt index.

use std::fmt;

use chrono::Local;
use serde::Serialize;
use tokio::sync::{Mutex, broadcast};

use crate::appointment::{Appointment, AppointmentId, NewAppointment};
use crate::date::{DateKey, YearMonth};
use crate::error::{DatebookError, DatebookResult};
use crate::grid::{self, CalendarCell};
use crate::index::AppointmentIndex;
use crate::store::{AppointmentStore, ApplyMode};

const GRID_READY_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Fetching,
    Applying,
    Error,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncState::Idle => "idle",
            SyncState::Fetching => "fetching",
            SyncState::Applying => "applying",
            SyncState::Error => "error",
        };
        f.write_str(s)
    }
}

/// A freshly computed grid for a month, handed to whatever draws it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthView {
    pub month: YearMonth,
    pub cells: Vec<CalendarCell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response was the latest one and is now displayed.
    Applied(MonthView),
    /// A newer fetch was issued before this one answered.
    Superseded,
}

/// A store write confirmed while the latest fetch was outstanding.
#[derive(Debug)]
enum PendingWrite {
    Created(Appointment),
    Deleted(AppointmentId),
}

#[derive(Debug)]
struct Inner {
    state: SyncState,
    displayed: YearMonth,
    /// Target of the most recent fetch. Relative navigation starts here.
    requested: YearMonth,
    latest_seq: u64,
    /// Sequence number of the last fetch that was issued as latest and has
    /// answered. Equal to `latest_seq` when no fetch is outstanding.
    settled_seq: u64,
    pending: Vec<PendingWrite>,
    index: AppointmentIndex,
}

impl Inner {
    fn view(&self, today: DateKey) -> MonthView {
        let dates = self.index.dates_in_month(self.displayed);
        MonthView {
            month: self.displayed,
            cells: grid::compute(self.displayed, today, &dates),
        }
    }

    fn fetch_outstanding(&self) -> bool {
        self.settled_seq != self.latest_seq
    }

    /// Remember a confirmed write if the outstanding fetch may not see it.
    fn note_write(&mut self, write: PendingWrite) {
        if self.fetch_outstanding() {
            self.pending.push(write);
        }
    }

    /// Apply writes the rebuilt index may be missing, for the month that
    /// was just fetched.
    fn replay_pending(&mut self, month: YearMonth) {
        for write in self.pending.drain(..) {
            match write {
                PendingWrite::Created(record) if month.contains(&record.date) => {
                    // Already there if the store answered after the write
                    let _ = self.index.insert(record);
                }
                PendingWrite::Created(_) => {}
                PendingWrite::Deleted(id) => {
                    let _ = self.index.remove(&id);
                }
            }
        }
    }

    fn note_failure(&mut self, err: &DatebookError) {
        if err.is_store_failure() {
            self.state = SyncState::Error;
        }
    }
}

#[derive(Debug)]
pub struct SyncController<S> {
    store: S,
    inner: Mutex<Inner>,
    grid_ready: broadcast::Sender<MonthView>,
    today: Option<DateKey>,
}

impl<S: AppointmentStore> SyncController<S> {
    /// A controller showing `bootstrap` with an empty index. Nothing is
    /// fetched until [`load`](Self::load) or a navigation.
    pub fn new(store: S, bootstrap: YearMonth) -> Self {
        let (grid_ready, _) = broadcast::channel(GRID_READY_CAPACITY);
        SyncController {
            store,
            inner: Mutex::new(Inner {
                state: SyncState::Idle,
                displayed: bootstrap,
                requested: bootstrap,
                latest_seq: 0,
                settled_seq: 0,
                pending: Vec::new(),
                index: AppointmentIndex::new(),
            }),
            grid_ready,
            today: None,
        }
    }

    /// Pin "today" instead of reading the local clock.
    pub fn with_today(mut self, today: DateKey) -> Self {
        self.today = Some(today);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Receive a [`MonthView`] after every change to the displayed grid.
    pub fn subscribe(&self) -> broadcast::Receiver<MonthView> {
        self.grid_ready.subscribe()
    }

    pub fn today(&self) -> DateKey {
        self.today
            .unwrap_or_else(|| DateKey::from_naive(Local::now().date_naive()))
    }

    pub async fn state(&self) -> SyncState {
        self.inner.lock().await.state
    }

    pub async fn displayed_month(&self) -> YearMonth {
        self.inner.lock().await.displayed
    }

    pub async fn appointments_on(&self, date: DateKey) -> Vec<Appointment> {
        self.inner.lock().await.index.by_date(&date).to_vec()
    }

    pub async fn labels_on(&self, date: DateKey) -> String {
        self.inner.lock().await.index.labels_on(&date)
    }

    /// Every indexed appointment, by date and then arrival order.
    pub async fn appointments(&self) -> Vec<Appointment> {
        self.inner.lock().await.index.iter().cloned().collect()
    }

    /// Grid for the displayed month, computed now.
    pub async fn month_view(&self) -> MonthView {
        self.inner.lock().await.view(self.today())
    }

    /// Fetch the month that is currently requested (the bootstrap month on
    /// a fresh controller).
    pub async fn load(&self) -> DatebookResult<FetchOutcome> {
        self.fetch(Ok).await
    }

    /// Move `delta` months from the most recently requested month.
    ///
    /// A delta that would leave the representable years is rejected before
    /// anything is fetched.
    pub async fn navigate(&self, delta: i64) -> DatebookResult<FetchOutcome> {
        self.fetch(move |requested| {
            requested.checked_navigate(delta).ok_or_else(|| {
                DatebookError::Validation(format!("cannot move {delta} months from {requested}"))
            })
        })
        .await
    }

    pub async fn goto(&self, month: YearMonth) -> DatebookResult<FetchOutcome> {
        self.fetch(move |_| Ok(month)).await
    }

    async fn fetch(
        &self,
        pick_target: impl FnOnce(YearMonth) -> DatebookResult<YearMonth> + Send,
    ) -> DatebookResult<FetchOutcome> {
        let (seq, target) = {
            let mut inner = self.inner.lock().await;
            let target = pick_target(inner.requested)?;
            inner.latest_seq += 1;
            inner.requested = target;
            inner.state = SyncState::Fetching;
            (inner.latest_seq, target)
        };
        tracing::debug!(seq, month = %target.to_key(), "fetching appointments");

        let result = self.store.list(target).await;

        let mut inner = self.inner.lock().await;
        if seq != inner.latest_seq {
            tracing::debug!(
                seq,
                latest = inner.latest_seq,
                month = %target.to_key(),
                "discarding superseded response"
            );
            return Ok(FetchOutcome::Superseded);
        }

        match result {
            Ok(records) => {
                inner.state = SyncState::Applying;
                inner.settled_seq = seq;
                inner.index.rebuild(records);
                inner.replay_pending(target);
                inner.displayed = target;
                inner.state = SyncState::Idle;

                let view = inner.view(self.today());
                self.publish(view.clone());
                Ok(FetchOutcome::Applied(view))
            }
            Err(err) => {
                tracing::warn!(seq, month = %target.to_key(), error = %err, "fetch failed");
                inner.state = SyncState::Error;
                inner.settled_seq = seq;
                inner.pending.clear();
                inner.requested = inner.displayed;
                Err(err)
            }
        }
    }

    /// Create an appointment through the store and mirror it into the
    /// index when it falls in the displayed month.
    ///
    /// With [`ApplyMode::Immediate`] the state lock is held across the store
    /// call; with [`ApplyMode::ConfirmThenApply`] it is released for the
    /// round trip and the index changes only once the store has answered.
    pub async fn create(&self, request: NewAppointment) -> DatebookResult<Appointment> {
        let held = match self.store.apply_mode() {
            ApplyMode::Immediate => Some(self.inner.lock().await),
            ApplyMode::ConfirmThenApply => None,
        };

        let result = self.store.create(request).await;

        let mut inner = match held {
            Some(guard) => guard,
            None => self.inner.lock().await,
        };
        let record = result.inspect_err(|err| inner.note_failure(err))?;
        inner.note_write(PendingWrite::Created(record.clone()));

        if inner.displayed.contains(&record.date) {
            match inner.index.insert(record.clone()) {
                Ok(()) => self.publish(inner.view(self.today())),
                // A fetch that finished during the round trip already has it
                Err(err) => tracing::debug!(error = %err, "created appointment already indexed"),
            }
        }

        Ok(record)
    }

    /// Delete an appointment through the store, then drop it from the index.
    ///
    /// Apply timing follows the store's [`ApplyMode`] as in
    /// [`create`](Self::create).
    pub async fn delete(&self, id: &AppointmentId) -> DatebookResult<()> {
        let held = match self.store.apply_mode() {
            ApplyMode::Immediate => Some(self.inner.lock().await),
            ApplyMode::ConfirmThenApply => None,
        };

        let result = self.store.delete(id).await;

        let mut inner = match held {
            Some(guard) => guard,
            None => self.inner.lock().await,
        };
        result.inspect_err(|err| inner.note_failure(err))?;
        inner.note_write(PendingWrite::Deleted(id.clone()));

        match inner.index.remove(id) {
            Ok(_) => self.publish(inner.view(self.today())),
            Err(_) => tracing::debug!(%id, "deleted appointment was not in the displayed month"),
        }

        Ok(())
    }

    fn publish(&self, view: MonthView) {
        // No subscribers is fine
        let _ = self.grid_ready.send(view);
    }
}
