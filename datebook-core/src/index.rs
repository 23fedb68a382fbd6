//! In-memory projection of appointments keyed by date.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::appointment::{Appointment, AppointmentId};
use crate::date::{DateKey, YearMonth};
use crate::error::{DatebookError, DatebookResult};

/// Appointments bucketed by date key.
///
/// Buckets keep arrival order and are never left empty. An id appears at
/// most once across all buckets.
#[derive(Debug, Clone, Default)]
pub struct AppointmentIndex {
    buckets: BTreeMap<DateKey, Vec<Appointment>>,
}

impl AppointmentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole index with `records`, in the given order.
    ///
    /// The new buckets are built on the side and swapped in at the end, so
    /// the index is never observed half-cleared. Repeated ids keep their
    /// first occurrence.
    pub fn rebuild(&mut self, records: impl IntoIterator<Item = Appointment>) {
        let mut buckets: BTreeMap<DateKey, Vec<Appointment>> = BTreeMap::new();
        let mut seen = HashSet::new();

        for record in records {
            if !seen.insert(record.id.clone()) {
                tracing::warn!(id = %record.id, "dropping repeated appointment id during rebuild");
                continue;
            }
            buckets.entry(record.date).or_default().push(record);
        }

        self.buckets = buckets;
    }

    /// Append `record` to the bucket of its date.
    pub fn insert(&mut self, record: Appointment) -> DatebookResult<()> {
        if self.contains(&record.id) {
            return Err(DatebookError::DuplicateAppointment(record.id.to_string()));
        }
        self.buckets.entry(record.date).or_default().push(record);
        Ok(())
    }

    /// Remove the record with `id`, returning it.
    pub fn remove(&mut self, id: &AppointmentId) -> DatebookResult<Appointment> {
        let (date, position) = self
            .buckets
            .iter()
            .find_map(|(date, bucket)| {
                bucket
                    .iter()
                    .position(|record| &record.id == id)
                    .map(|position| (*date, position))
            })
            .ok_or_else(|| DatebookError::NotFound(id.to_string()))?;

        let bucket = self
            .buckets
            .get_mut(&date)
            .ok_or_else(|| DatebookError::NotFound(id.to_string()))?;
        let removed = bucket.remove(position);
        if bucket.is_empty() {
            self.buckets.remove(&date);
        }
        Ok(removed)
    }

    pub fn contains(&self, id: &AppointmentId) -> bool {
        self.iter().any(|record| &record.id == id)
    }

    /// Appointments on `date` in arrival order; empty if there are none.
    pub fn by_date(&self, date: &DateKey) -> &[Appointment] {
        self.buckets.get(date).map(Vec::as_slice).unwrap_or_default()
    }

    /// Dates inside `month` that have at least one appointment.
    pub fn dates_in_month(&self, month: YearMonth) -> BTreeSet<DateKey> {
        let (Some(first), Some(last)) = (month.day(1), month.day(month.days_in_month())) else {
            return BTreeSet::new();
        };
        self.buckets
            .range(first..=last)
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(date, _)| *date)
            .collect()
    }

    /// The day's appointments as `"<time>: <title>"` lines.
    pub fn labels_on(&self, date: &DateKey) -> String {
        self.by_date(date)
            .iter()
            .map(Appointment::label)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// All appointments, by date and then arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &Appointment> {
        self.buckets.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointment::AppointmentKind;

    fn appt(id: &str, date: &str, title: &str) -> Appointment {
        Appointment {
            id: AppointmentId::new(id),
            date: date.parse().unwrap(),
            title: title.to_string(),
            time: "12:00 PM".to_string(),
            kind: AppointmentKind::General,
        }
    }

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn ids(records: &[Appointment]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn rebuild_keeps_insertion_order_within_a_date() {
        let mut index = AppointmentIndex::new();
        index.rebuild(vec![
            appt("a", "2025-04-05", "Checkup"),
            appt("b", "2025-04-05", "Class"),
        ]);

        assert_eq!(ids(index.by_date(&key("2025-04-05"))), vec!["a", "b"]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn rebuild_replaces_previous_contents() {
        let mut index = AppointmentIndex::new();
        index.rebuild(vec![appt("a", "2025-04-05", "Old")]);
        index.rebuild(vec![appt("b", "2025-05-01", "New")]);

        assert!(index.by_date(&key("2025-04-05")).is_empty());
        assert_eq!(ids(index.by_date(&key("2025-05-01"))), vec!["b"]);
        assert!(!index.contains(&AppointmentId::new("a")));
    }

    #[test]
    fn rebuild_drops_repeated_ids() {
        let mut index = AppointmentIndex::new();
        index.rebuild(vec![
            appt("a", "2025-04-05", "First"),
            appt("a", "2025-04-06", "Second"),
        ]);

        assert_eq!(index.len(), 1);
        assert_eq!(index.by_date(&key("2025-04-05"))[0].title, "First");
    }

    #[test]
    fn insert_appends_and_rejects_duplicates() {
        let mut index = AppointmentIndex::new();
        index.insert(appt("a", "2025-04-05", "One")).unwrap();
        index.insert(appt("b", "2025-04-05", "Two")).unwrap();

        let err = index.insert(appt("a", "2025-04-09", "Again")).unwrap_err();
        assert!(matches!(err, DatebookError::DuplicateAppointment(id) if id == "a"));
        assert_eq!(ids(index.by_date(&key("2025-04-05"))), vec!["a", "b"]);
        assert!(index.by_date(&key("2025-04-09")).is_empty());
    }

    #[test]
    fn remove_finds_record_in_any_bucket() {
        let mut index = AppointmentIndex::new();
        index.rebuild(vec![
            appt("a", "2025-04-05", "One"),
            appt("b", "2025-04-05", "Two"),
            appt("c", "2025-04-07", "Three"),
        ]);

        let removed = index.remove(&AppointmentId::new("b")).unwrap();
        assert_eq!(removed.title, "Two");
        assert_eq!(ids(index.by_date(&key("2025-04-05"))), vec!["a"]);

        index.remove(&AppointmentId::new("c")).unwrap();
        assert!(index.dates_in_month(YearMonth::new(2025, 3).unwrap()).len() == 1);
    }

    #[test]
    fn remove_unknown_id_leaves_index_untouched() {
        let mut index = AppointmentIndex::new();
        index.rebuild(vec![appt("a", "2025-04-05", "One")]);

        let err = index.remove(&AppointmentId::new("nonexistent-id")).unwrap_err();
        assert!(matches!(err, DatebookError::NotFound(_)));
        assert_eq!(index.len(), 1);
        assert_eq!(ids(index.by_date(&key("2025-04-05"))), vec!["a"]);
    }

    #[test]
    fn queries_on_missing_data_are_empty() {
        let index = AppointmentIndex::new();
        assert!(index.by_date(&key("2025-04-05")).is_empty());
        assert!(index.dates_in_month(YearMonth::new(2025, 3).unwrap()).is_empty());
        assert_eq!(index.labels_on(&key("2025-04-05")), "");
        assert!(index.is_empty());
    }

    #[test]
    fn dates_in_month_ignores_neighbouring_months() {
        let mut index = AppointmentIndex::new();
        index.rebuild(vec![
            appt("a", "2025-03-31", "Before"),
            appt("b", "2025-04-01", "First"),
            appt("c", "2025-04-30", "Last"),
            appt("d", "2025-04-30", "Last again"),
            appt("e", "2025-05-01", "After"),
        ]);

        let dates = index.dates_in_month(YearMonth::new(2025, 3).unwrap());
        assert_eq!(dates, [key("2025-04-01"), key("2025-04-30")].into());
    }

    #[test]
    fn labels_follow_bucket_order() {
        let mut index = AppointmentIndex::new();
        let mut late = appt("b", "2025-04-05", "Class");
        late.time = "6:00 PM".to_string();
        index.rebuild(vec![appt("a", "2025-04-05", "Checkup"), late]);

        assert_eq!(index.labels_on(&key("2025-04-05")), "12:00 PM: Checkup\n6:00 PM: Class");
    }
}
