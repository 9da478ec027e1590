//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the store is open.
//!
//! # Tasks
//! - Cache cleanup: TTL sweep plus FIFO pruning at configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;
