//! Distributed MultiMap Cluster Library
//!
//! This library crate defines the core modules of a distributed multimap:
//! a map whose keys each hold a set of values, sharded across cluster
//! members by key partition. It serves as the foundation for the node
//! binary (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of three loosely coupled subsystems:
//!
//! - **`portable`**: the versioned binary wire codec. Frames carry a class
//!   discriminator, named fields for schema introspection, and a raw
//!   trailing section for the single variable-length value blob.
//! - **`routing`**: deterministic partition resolution from opaque key
//!   bytes, the static partition-to-member table, and the delivery client.
//!   A key-based request always reaches exactly one member.
//! - **`multimap`**: the request family (contains / put / remove), the
//!   translation into server-side operations carrying the caller's logical
//!   thread id for lock reentrancy, and the local partitioned store.

pub mod multimap;
pub mod portable;
pub mod routing;
