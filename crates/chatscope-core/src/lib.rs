//! Business logic and store trait definitions for chatscope.
//!
//! This crate defines the "ports" (store traits) that the infrastructure
//! layer implements, the pure conversation pipeline (aggregation, status
//! resolution and the search projection) and the email notification list.
//! It depends only on `chatscope-types` -- never on `chatscope-infra` or
//! any database/IO crate.

pub mod aggregate;
pub mod dashboard;
pub mod export;
pub mod present;
pub mod projection;
pub mod repository;
pub mod resolver;
pub mod service;
pub mod subscription;
