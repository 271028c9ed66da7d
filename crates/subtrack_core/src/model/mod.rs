//! Domain model for tracked subscriptions.
//!
//! # Invariants
//! - Every record is identified by a non-nil `SubscriptionId`.
//! - Only the id is unique; names and dates may repeat.

pub mod subscription;
