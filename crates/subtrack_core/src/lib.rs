//! Core domain logic for SubTrack.
//! Owns the subscription list, its persistence, and the test alert seam.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::subscription::{
    parse_amount, AmountParseError, Subscription, SubscriptionId, SubscriptionValidationError,
};
pub use repo::kv_repo::{
    KeyValueStore, KvError, KvResult, MemoryKeyValueStore, SqliteKeyValueStore,
};
pub use repo::subscription_repo::{
    LoadOutcome, PersistError, PersistResult, SubscriptionPersistence, SUBSCRIPTIONS_KEY,
};
pub use service::notification_service::{
    fire_test_alert, LogNotifier, Notifier, NotifyError, TestAlert,
};
pub use service::subscription_service::{
    AddOutcome, RecordStore, RemoveOutcome, SharedRecordStore,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
