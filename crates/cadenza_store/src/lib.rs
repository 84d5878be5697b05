//! In-memory reference storage for the Cadenza publish pipeline.
//!
//! Durable persistence is an external collaborator specified by the
//! traits in `cadenza_interface`; this crate provides the in-memory
//! implementation used by tests and by hosts that do not need
//! durability. Every trait method offers read-modify-write consistency
//! per row.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod memory;

pub use memory::MemoryStore;
