use serde::{Deserialize, Serialize};
use std::fmt;

/// A pre-serialized blob in the generic binary representation (a key or a
/// value). Opaque to the request layer: it is routed on and compared for
/// equality, never introspected.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Data(Vec<u8>);

impl Data {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Data {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Data {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Blobs can be large; print the length and a short hex prefix.
        write!(f, "Data({} bytes", self.0.len())?;
        if !self.0.is_empty() {
            write!(f, ": ")?;
            for byte in self.0.iter().take(8) {
                write!(f, "{:02x}", byte)?;
            }
            if self.0.len() > 8 {
                write!(f, "..")?;
            }
        }
        write!(f, ")")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}
