//! Shared domain types for chatscope.
//!
//! This crate contains the domain types used across the dashboard:
//! chat messages, derived conversations, operator status overrides, email
//! notification subscriptions, configuration, and their associated error
//! types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod conversation;
pub mod error;
pub mod message;
pub mod status;
pub mod subscription;
