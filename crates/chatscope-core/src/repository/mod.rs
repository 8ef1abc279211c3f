//! Store traits implemented by the infrastructure layer.
//!
//! The message store is read-only from the core's point of view. The status
//! and subscription stores are read in full and written one upsert at a
//! time.

pub mod message;
pub mod status;
pub mod subscription;
