use sha2::{Digest, Sha256};

pub const DEFAULT_PARTITION_COUNT: u32 = 256;

/// Derives the partition a key belongs to. The digest is taken over the
/// opaque key bytes, so byte-identical keys land on the same partition in
/// every process and on every platform, for the lifetime of the cluster.
#[derive(Debug, Clone)]
pub struct Partitioner {
    partition_count: u32,
}

impl Partitioner {
    pub fn new(partition_count: u32) -> Self {
        assert!(partition_count > 0, "partition count must be positive");
        Self { partition_count }
    }

    pub fn partition_count(&self) -> u32 {
        self.partition_count
    }

    pub fn partition_for(&self, key: &[u8]) -> u32 {
        let digest = Sha256::digest(key);
        let prefix = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
        prefix % self.partition_count
    }
}

impl Default for Partitioner {
    fn default() -> Self {
        Self::new(DEFAULT_PARTITION_COUNT)
    }
}
