//! Record store: the single owner of the in-memory subscription list.
//!
//! # Responsibility
//! - Load the persisted collection once when opened.
//! - Apply add/remove mutations and persist the whole list after each one.
//!
//! # Invariants
//! - Records keep insertion order; new records are appended.
//! - Every successful mutation triggers exactly one whole-collection save.
//! - Parse and save failures never abort or panic; they are reported via
//!   return values and logs.

use crate::model::subscription::{parse_amount, AmountParseError, Subscription};
use crate::repo::kv_repo::KeyValueStore;
use crate::repo::subscription_repo::{LoadOutcome, PersistError, SubscriptionPersistence};
use chrono::NaiveDate;
use log::{error, info, warn};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Result of a "log subscription" submission.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added(Subscription),
    /// The amount text did not parse; nothing changed.
    Rejected(AmountParseError),
}

impl AddOutcome {
    pub fn added(&self) -> Option<&Subscription> {
        match self {
            Self::Added(record) => Some(record),
            Self::Rejected(_) => None,
        }
    }
}

/// Result of a positional removal.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveOutcome {
    /// Removed records, in their former list order.
    pub removed: Vec<Subscription>,
    /// Requested positions that were past the end of the list.
    pub ignored_positions: Vec<usize>,
}

/// In-memory ordered subscription collection bound to its persistence.
pub struct RecordStore<S: KeyValueStore> {
    records: Vec<Subscription>,
    persistence: SubscriptionPersistence<S>,
    load_outcome: LoadOutcome,
    last_save_error: Option<PersistError>,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Builds the store and performs the one-time startup load.
    pub fn open(persistence: SubscriptionPersistence<S>) -> Self {
        let load_outcome = persistence.load();
        let records = load_outcome.clone().into_records();
        Self {
            records,
            persistence,
            load_outcome,
            last_save_error: None,
        }
    }

    /// Convenience for `open(SubscriptionPersistence::new(store))`.
    pub fn with_store(store: S) -> Self {
        Self::open(SubscriptionPersistence::new(store))
    }

    /// Current records in list order.
    pub fn all(&self) -> &[Subscription] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// How the startup load went.
    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    /// Most recent save failure, cleared by the next successful save.
    pub fn last_save_error(&self) -> Option<&PersistError> {
        self.last_save_error.as_ref()
    }

    pub fn persistence(&self) -> &SubscriptionPersistence<S> {
        &self.persistence
    }

    /// Logs a new subscription from form input.
    ///
    /// # Contract
    /// - Unparsable `amount_text` returns `Rejected` and leaves the list and
    ///   storage untouched.
    /// - Otherwise a fresh record is appended and the list is saved.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        amount_text: &str,
        renewal_date: NaiveDate,
    ) -> AddOutcome {
        let amount = match parse_amount(amount_text) {
            Ok(amount) => amount,
            Err(err) => {
                info!("event=subscription_add module=service status=rejected reason={err}");
                return AddOutcome::Rejected(err);
            }
        };

        let record = Subscription::new(name, amount, renewal_date);
        self.records.push(record.clone());
        info!(
            "event=subscription_add module=service status=ok id={} count={}",
            record.id,
            self.records.len()
        );
        self.persist();
        AddOutcome::Added(record)
    }

    /// Removes every record at `positions` in one update.
    ///
    /// Positions index the list as it is before the call. Positions past the
    /// end are skipped. Storage is only written when something was removed.
    pub fn remove(&mut self, positions: &BTreeSet<usize>) -> RemoveOutcome {
        let len = self.records.len();
        let ignored_positions: Vec<usize> = positions.range(len..).copied().collect();

        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(len);
        for (index, record) in std::mem::take(&mut self.records).into_iter().enumerate() {
            if positions.contains(&index) {
                removed.push(record);
            } else {
                kept.push(record);
            }
        }
        self.records = kept;

        if !ignored_positions.is_empty() {
            warn!(
                "event=subscription_remove module=service status=partial ignored={:?} len={}",
                ignored_positions, len
            );
        }
        if !removed.is_empty() {
            info!(
                "event=subscription_remove module=service status=ok removed={} count={}",
                removed.len(),
                self.records.len()
            );
            self.persist();
        }

        RemoveOutcome {
            removed,
            ignored_positions,
        }
    }

    fn persist(&mut self) {
        match self.persistence.save(&self.records) {
            Ok(()) => self.last_save_error = None,
            Err(err) => {
                error!(
                    "event=subscriptions_persist module=service status=error count={} error={err}",
                    self.records.len()
                );
                self.last_save_error = Some(err);
            }
        }
    }
}

/// Thread-safe handle serializing all access to one `RecordStore`.
pub struct SharedRecordStore<S: KeyValueStore> {
    inner: Arc<Mutex<RecordStore<S>>>,
}

impl<S: KeyValueStore> Clone for SharedRecordStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: KeyValueStore> SharedRecordStore<S> {
    pub fn new(store: RecordStore<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Runs `f` with exclusive access to the store.
    ///
    /// Lock poisoning is ignored.
    pub fn with_store<T>(&self, f: impl FnOnce(&mut RecordStore<S>) -> T) -> T {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }
}

#[cfg(test)]
mod tests {
    use super::{AddOutcome, RecordStore, SharedRecordStore};
    use crate::repo::kv_repo::MemoryKeyValueStore;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;
    use std::thread;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    #[test]
    fn remove_reports_out_of_range_positions() {
        let mut store = RecordStore::with_store(MemoryKeyValueStore::new());
        store.add("a", "1", date());
        store.add("b", "2", date());

        let outcome = store.remove(&BTreeSet::from([1, 7]));
        assert_eq!(outcome.removed.len(), 1);
        assert_eq!(outcome.removed[0].name, "b");
        assert_eq!(outcome.ignored_positions, vec![7]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn shared_store_serializes_concurrent_adds() {
        let shared = SharedRecordStore::new(RecordStore::with_store(MemoryKeyValueStore::new()));
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for n in 0..5 {
                        let outcome = shared
                            .with_store(|store| store.add(format!("w{worker}-{n}"), "4.5", date()));
                        assert!(matches!(outcome, AddOutcome::Added(_)));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        shared.with_store(|store| {
            assert_eq!(store.len(), 40);
            let reloaded = store.persistence().load().into_records();
            assert_eq!(reloaded, store.all());
        });
    }
}
