//! MultiMap Request Protocol
//!
//! The request family registry: class discriminators, the decode dispatch
//! that turns an incoming frame into a concrete request, and the HTTP
//! contracts (endpoint constants and response DTOs) for the invoke path.
//!
//! Requests travel as portable codec frames; responses are small JSON DTOs,
//! the same convention every other inter-node reply in the cluster uses.

use super::operations::MultiMapOperation;
use super::request::{CallSignature, KeyBasedContainsRequest, PutRequest, RemoveRequest};
use super::types::Data;
use crate::portable::error::CodecError;
use crate::portable::reader::PortableReader;
use crate::routing::partitioner::Partitioner;
use serde::{Deserialize, Serialize};

/// Endpoint accepting encoded request frames, both from clients and from
/// members forwarding a frame to the partition owner.
pub const ENDPOINT_INVOKE: &str = "/multimap/invoke";

// Class discriminators, unique within the multimap request family. Frozen:
// changing a value breaks decoding against every already-deployed member.
pub const CLASS_KEY_BASED_CONTAINS: i32 = 11;
pub const CLASS_PUT: i32 = 12;
pub const CLASS_REMOVE: i32 = 13;

/// A decoded member-side view of any key-based multimap request.
#[derive(Debug, Clone)]
pub enum MultiMapRequest {
    Contains(KeyBasedContainsRequest),
    Put(PutRequest),
    Remove(RemoveRequest),
}

impl MultiMapRequest {
    /// Reads the discriminator and selects the matching decoder. A frame
    /// from outside the family fails with `MalformedWireData` before any
    /// field is touched.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        match PortableReader::peek_class_id(bytes)? {
            CLASS_KEY_BASED_CONTAINS => {
                Ok(Self::Contains(KeyBasedContainsRequest::decode(bytes)?))
            }
            CLASS_PUT => Ok(Self::Put(PutRequest::decode(bytes)?)),
            CLASS_REMOVE => Ok(Self::Remove(RemoveRequest::decode(bytes)?)),
            other => Err(CodecError::MalformedWireData(format!(
                "unknown multimap request class id {other}"
            ))),
        }
    }

    pub fn target_partition(&self, partitioner: &Partitioner) -> u32 {
        match self {
            Self::Contains(req) => req.target_partition(partitioner),
            Self::Put(req) => req.target_partition(partitioner),
            Self::Remove(req) => req.target_partition(partitioner),
        }
    }

    pub fn prepare_operation(&self) -> MultiMapOperation {
        match self {
            Self::Contains(req) => MultiMapOperation::ContainsEntry(req.prepare_operation()),
            Self::Put(req) => MultiMapOperation::Put(req.prepare_operation()),
            Self::Remove(req) => MultiMapOperation::Remove(req.prepare_operation()),
        }
    }
}

impl CallSignature for MultiMapRequest {
    fn method_name(&self) -> &'static str {
        match self {
            Self::Contains(req) => req.method_name(),
            Self::Put(req) => req.method_name(),
            Self::Remove(req) => req.method_name(),
        }
    }

    fn parameters(&self) -> Vec<&Data> {
        match self {
            Self::Contains(req) => req.parameters(),
            Self::Put(req) => req.parameters(),
            Self::Remove(req) => req.parameters(),
        }
    }
}

/// Reply for the invoke endpoint. `result` carries the boolean outcome of
/// the executed operation; `error` is set instead when decode, routing, or
/// execution failed.
#[derive(Debug, Serialize, Deserialize)]
pub struct InvokeResponse {
    pub result: Option<bool>,
    pub error: Option<String>,
}
