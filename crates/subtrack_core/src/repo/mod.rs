//! Storage layer: host key-value store and subscription persistence.
//!
//! # Responsibility
//! - Define the byte-level key-value contract and its implementations.
//! - Isolate encoding and storage details from the record store.

pub mod kv_repo;
pub mod subscription_repo;
