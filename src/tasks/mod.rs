//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside a store.
//!
//! # Tasks
//! - Purge: Removes expired entries at a configured interval

mod purge;

pub use purge::{spawn_purge_task, ExpirationSweep};
