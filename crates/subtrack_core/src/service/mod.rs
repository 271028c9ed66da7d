//! Core use-case services.
//!
//! # Responsibility
//! - Own the record collection and its mutation entry points.
//! - Keep CLI/presentation layers decoupled from storage details.

pub mod notification_service;
pub mod subscription_service;
