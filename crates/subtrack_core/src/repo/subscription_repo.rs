//! Whole-collection persistence of subscription records.
//!
//! # Responsibility
//! - Serialize the full record collection into one JSON blob.
//! - Store and fetch that blob under a fixed key.
//!
//! # Invariants
//! - Writes always replace the whole collection; there is no partial save.
//! - Only records passing `Subscription::validate()` are written, so every
//!   saved blob decodes back.
//! - `load` never returns an error. Missing and undecodable blobs are
//!   reported through `LoadOutcome` and read as an empty collection.

use crate::model::subscription::{Subscription, SubscriptionValidationError};
use crate::repo::kv_repo::{KeyValueStore, KvError};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Key holding the encoded subscription collection.
pub const SUBSCRIPTIONS_KEY: &str = "subscriptions";

pub type PersistResult<T> = Result<T, PersistError>;

/// Failure while saving the collection.
#[derive(Debug)]
pub enum PersistError {
    /// A record failed validation; nothing was written.
    Invalid {
        position: usize,
        error: SubscriptionValidationError,
    },
    Encode(serde_json::Error),
    Storage(KvError),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid { position, error } => {
                write!(f, "subscription at position {position} is invalid: {error}")
            }
            Self::Encode(err) => write!(f, "failed to encode subscriptions: {err}"),
            Self::Storage(err) => write!(f, "failed to write subscriptions: {err}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid { error, .. } => Some(error),
            Self::Encode(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<KvError> for PersistError {
    fn from(value: KvError) -> Self {
        Self::Storage(value)
    }
}

/// Result of reading the stored collection.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Blob decoded successfully (possibly to an empty list).
    Loaded(Vec<Subscription>),
    /// Nothing stored under the key yet.
    Missing,
    /// Stored blob could not be read or decoded; its contents are ignored.
    Corrupt { reason: String },
}

impl LoadOutcome {
    /// Records to start from; empty unless the load succeeded.
    pub fn into_records(self) -> Vec<Subscription> {
        match self {
            Self::Loaded(records) => records,
            Self::Missing | Self::Corrupt { .. } => Vec::new(),
        }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Loaded(_) => "loaded",
            Self::Missing => "missing",
            Self::Corrupt { .. } => "corrupt",
        }
    }
}

/// Persistence adapter over a host key-value store.
pub struct SubscriptionPersistence<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SubscriptionPersistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Encodes `records` and overwrites the stored blob.
    ///
    /// # Errors
    /// - `Invalid` for the first record failing validation; storage is left
    ///   untouched.
    ///
    /// # Side effects
    /// - Emits a `subscriptions_save` log event with count and byte size.
    pub fn save(&mut self, records: &[Subscription]) -> PersistResult<()> {
        for (position, record) in records.iter().enumerate() {
            if let Err(error) = record.validate() {
                error!(
                    "event=subscriptions_save module=repo status=error error_code=invalid_record position={position} error={error}"
                );
                return Err(PersistError::Invalid { position, error });
            }
        }

        let blob = serde_json::to_vec(records).map_err(|err| {
            error!(
                "event=subscriptions_save module=repo status=error error_code=encode_failed error={err}"
            );
            PersistError::Encode(err)
        })?;

        if let Err(err) = self.store.set(SUBSCRIPTIONS_KEY, &blob) {
            error!(
                "event=subscriptions_save module=repo status=error error_code=storage_write_failed error={err}"
            );
            return Err(err.into());
        }

        debug!(
            "event=subscriptions_save module=repo status=ok count={} bytes={}",
            records.len(),
            blob.len()
        );
        Ok(())
    }

    /// Reads and decodes the stored blob.
    pub fn load(&self) -> LoadOutcome {
        let outcome = match self.store.get(SUBSCRIPTIONS_KEY) {
            Ok(None) => LoadOutcome::Missing,
            Ok(Some(blob)) => match serde_json::from_slice::<Vec<Subscription>>(&blob) {
                Ok(records) => LoadOutcome::Loaded(records),
                Err(err) => LoadOutcome::Corrupt {
                    reason: err.to_string(),
                },
            },
            Err(err) => LoadOutcome::Corrupt {
                reason: err.to_string(),
            },
        };

        match &outcome {
            LoadOutcome::Corrupt { reason } => warn!(
                "event=subscriptions_load module=repo status=degraded outcome=corrupt reason={reason}"
            ),
            LoadOutcome::Loaded(records) => info!(
                "event=subscriptions_load module=repo status=ok outcome={} count={}",
                outcome.label(),
                records.len()
            ),
            LoadOutcome::Missing => info!(
                "event=subscriptions_load module=repo status=ok outcome={} count=0",
                outcome.label()
            ),
        }
        outcome
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
