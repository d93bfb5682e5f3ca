//! Partition Routing Module
//!
//! Resolves which cluster member owns the partition a key belongs to, and
//! delivers opaque request frames to that single member. This is what makes
//! key-based requests "cheap": one hop to one owner, never a cluster-wide
//! broadcast.
//!
//! ## Core Concepts
//! - **Partitioning**: the key space is divided into a fixed number of
//!   partitions by a stable digest over the opaque key bytes.
//! - **Placement**: `RoutingTable` maps each partition onto the static,
//!   ordered peer list (table *maintenance* is an external concern; the
//!   list is fixed at startup).
//! - **Delivery**: `ClusterClient` POSTs the encoded frame to the owner with
//!   bounded retries.

pub mod client;
pub mod partitioner;
pub mod table;

#[cfg(test)]
mod tests;

use std::net::SocketAddr;
use thiserror::Error;

/// Routing failures. These are surfaced to the caller unchanged; retry
/// policy beyond the bounded in-client attempts belongs to the transport.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("no owner for partition {partition}: routing table is empty")]
    NoOwner { partition: u32 },

    #[error("peer {addr} unreachable after {attempts} attempts: {reason}")]
    PeerUnreachable {
        addr: SocketAddr,
        attempts: usize,
        reason: String,
    },

    #[error("peer {addr} rejected the request with status {status}")]
    PeerRejected { addr: SocketAddr, status: u16 },
}
