use super::RoutingError;
use std::net::SocketAddr;

/// Static partition table: an ordered peer list plus the local bind address.
///
/// Ownership is positional: partition `p` is owned by `peers[p % len]`, the
/// same placement rule the cluster's other members apply, so every node
/// resolves the same owner without coordination. Keeping the list sorted
/// makes the placement independent of the order peers were supplied in.
pub struct RoutingTable {
    local_addr: SocketAddr,
    peers: Vec<SocketAddr>,
}

impl RoutingTable {
    /// `peers` is the complete cluster list; the local address is added if
    /// the caller did not include it.
    pub fn new(local_addr: SocketAddr, mut peers: Vec<SocketAddr>) -> Self {
        if !peers.contains(&local_addr) {
            peers.push(local_addr);
        }
        peers.sort();
        peers.dedup();
        Self { local_addr, peers }
    }

    pub fn owner(&self, partition: u32) -> Result<SocketAddr, RoutingError> {
        if self.peers.is_empty() {
            return Err(RoutingError::NoOwner { partition });
        }
        Ok(self.peers[partition as usize % self.peers.len()])
    }

    pub fn is_local(&self, partition: u32) -> Result<bool, RoutingError> {
        Ok(self.owner(partition)? == self.local_addr)
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }
}
