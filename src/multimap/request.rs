use super::operations::{ContainsEntryOperation, PutOperation, RemoveOperation};
use super::protocol::{CLASS_KEY_BASED_CONTAINS, CLASS_PUT, CLASS_REMOVE};
use super::types::Data;
use crate::portable::error::CodecError;
use crate::portable::reader::PortableReader;
use crate::portable::writer::PortableWriter;
use crate::routing::partitioner::Partitioner;

const FIELD_THREAD_ID: &str = "threadId";
const FIELD_NAME: &str = "name";
const FIELD_KEY: &str = "key";

/// Logical view of a request for cross-cutting consumers (audit logging,
/// proxying) that need to render a call signature without knowing anything
/// about the wire format.
pub trait CallSignature {
    /// The logical method this request stands for.
    fn method_name(&self) -> &'static str;

    /// The ordered parameter blobs of the logical call.
    fn parameters(&self) -> Vec<&Data>;
}

/// The routable base every key-based multimap request embeds: the target
/// collection name plus the pre-serialized key the routing layer hashes.
/// Concrete requests hold one of these and delegate routing and base
/// encoding to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBasedRequest {
    name: String,
    key: Data,
}

impl KeyBasedRequest {
    pub fn new(name: impl Into<String>, key: Data) -> Self {
        Self {
            name: name.into(),
            key,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &Data {
        &self.key
    }

    /// Two requests with byte-identical keys always resolve to the same
    /// partition; the derivation itself belongs to the partitioner.
    pub fn target_partition(&self, partitioner: &Partitioner) -> u32 {
        partitioner.partition_for(self.key.as_slice())
    }

    pub(crate) fn write_base(&self, writer: &mut PortableWriter) -> Result<(), CodecError> {
        writer.write_str(FIELD_NAME, &self.name)?;
        writer.write_bytes(FIELD_KEY, self.key.as_slice())
    }

    pub(crate) fn read_base(reader: &mut PortableReader<'_>) -> Result<Self, CodecError> {
        let name = reader.read_str(FIELD_NAME)?;
        let key = Data::new(reader.read_bytes(FIELD_KEY)?);
        Ok(Self { name, key })
    }
}

/// Checks whether a key is present in a multimap (no value supplied), or
/// whether an exact key/value pair is stored (value supplied).
///
/// This request is cheap: it is always routed to the one member owning the
/// key's partition, unlike the full-scan contains variant that must visit
/// every partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBasedContainsRequest {
    base: KeyBasedRequest,
    value: Option<Data>,
    thread_id: u64,
}

impl KeyBasedContainsRequest {
    /// Key-presence variant; the thread id defaults to 0.
    pub fn new(name: impl Into<String>, key: Data) -> Self {
        Self {
            base: KeyBasedRequest::new(name, key),
            value: None,
            thread_id: 0,
        }
    }

    /// Switches to the key/value-presence variant.
    pub fn with_value(mut self, value: Data) -> Self {
        self.value = Some(value);
        self
    }

    /// Stamps the caller's logical thread identity. The id is an opaque
    /// correlation token; this layer infers nothing from its value.
    pub fn with_thread_id(mut self, thread_id: u64) -> Self {
        self.thread_id = thread_id;
        self
    }

    pub fn name(&self) -> &str {
        self.base.name()
    }

    pub fn key(&self) -> &Data {
        self.base.key()
    }

    pub fn value(&self) -> Option<&Data> {
        self.value.as_ref()
    }

    pub fn thread_id(&self) -> u64 {
        self.thread_id
    }

    pub fn target_partition(&self, partitioner: &Partitioner) -> u32 {
        self.base.target_partition(partitioner)
    }

    /// Wire order: thread id, base fields, then the value as the nullable
    /// raw trailing section. A null value means "key presence only".
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let mut writer = PortableWriter::new(CLASS_KEY_BASED_CONTAINS);
        writer.write_u64(FIELD_THREAD_ID, self.thread_id);
        self.base.write_base(&mut writer)?;
        writer.write_raw_data(self.value.as_ref().map(Data::as_slice))?;
        Ok(writer.finish())
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut reader = PortableReader::open(bytes, CLASS_KEY_BASED_CONTAINS)?;
        let thread_id = reader.read_u64(FIELD_THREAD_ID)?;
        let base = KeyBasedRequest::read_base(&mut reader)?;
        let value = reader.read_raw_data()?.map(Data::new);
        Ok(Self {
            base,
            value,
            thread_id,
        })
    }

    /// Translates this request into its one-shot server-side executable.
    /// Side-effect-free apart from constructing the operation; the request
    /// itself is never mutated.
    pub fn prepare_operation(&self) -> ContainsEntryOperation {
        ContainsEntryOperation::new(
            self.base.name().to_string(),
            self.base.key().clone(),
            self.value.clone(),
            self.thread_id,
        )
    }
}

impl CallSignature for KeyBasedContainsRequest {
    fn method_name(&self) -> &'static str {
        if self.value.is_none() {
            return "containsKey";
        }
        "containsEntry"
    }

    fn parameters(&self) -> Vec<&Data> {
        match &self.value {
            None => vec![self.base.key()],
            Some(value) => vec![self.base.key(), value],
        }
    }
}

/// Adds a value to the set stored under a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutRequest {
    base: KeyBasedRequest,
    value: Data,
    thread_id: u64,
}

impl PutRequest {
    pub fn new(name: impl Into<String>, key: Data, value: Data) -> Self {
        Self {
            base: KeyBasedRequest::new(name, key),
            value,
            thread_id: 0,
        }
    }

    pub fn with_thread_id(mut self, thread_id: u64) -> Self {
        self.thread_id = thread_id;
        self
    }

    pub fn target_partition(&self, partitioner: &Partitioner) -> u32 {
        self.base.target_partition(partitioner)
    }

    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let mut writer = PortableWriter::new(CLASS_PUT);
        writer.write_u64(FIELD_THREAD_ID, self.thread_id);
        self.base.write_base(&mut writer)?;
        writer.write_raw_data(Some(self.value.as_slice()))?;
        Ok(writer.finish())
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut reader = PortableReader::open(bytes, CLASS_PUT)?;
        let thread_id = reader.read_u64(FIELD_THREAD_ID)?;
        let base = KeyBasedRequest::read_base(&mut reader)?;
        let value = reader.read_raw_data()?.map(Data::new).ok_or_else(|| {
            CodecError::MalformedWireData("put request requires a value".to_string())
        })?;
        Ok(Self {
            base,
            value,
            thread_id,
        })
    }

    pub fn prepare_operation(&self) -> PutOperation {
        PutOperation::new(
            self.base.name().to_string(),
            self.base.key().clone(),
            self.value.clone(),
            self.thread_id,
        )
    }
}

impl CallSignature for PutRequest {
    fn method_name(&self) -> &'static str {
        "put"
    }

    fn parameters(&self) -> Vec<&Data> {
        vec![self.base.key(), &self.value]
    }
}

/// Removes one value from the set stored under a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveRequest {
    base: KeyBasedRequest,
    value: Data,
    thread_id: u64,
}

impl RemoveRequest {
    pub fn new(name: impl Into<String>, key: Data, value: Data) -> Self {
        Self {
            base: KeyBasedRequest::new(name, key),
            value,
            thread_id: 0,
        }
    }

    pub fn with_thread_id(mut self, thread_id: u64) -> Self {
        self.thread_id = thread_id;
        self
    }

    pub fn target_partition(&self, partitioner: &Partitioner) -> u32 {
        self.base.target_partition(partitioner)
    }

    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let mut writer = PortableWriter::new(CLASS_REMOVE);
        writer.write_u64(FIELD_THREAD_ID, self.thread_id);
        self.base.write_base(&mut writer)?;
        writer.write_raw_data(Some(self.value.as_slice()))?;
        Ok(writer.finish())
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut reader = PortableReader::open(bytes, CLASS_REMOVE)?;
        let thread_id = reader.read_u64(FIELD_THREAD_ID)?;
        let base = KeyBasedRequest::read_base(&mut reader)?;
        let value = reader.read_raw_data()?.map(Data::new).ok_or_else(|| {
            CodecError::MalformedWireData("remove request requires a value".to_string())
        })?;
        Ok(Self {
            base,
            value,
            thread_id,
        })
    }

    pub fn prepare_operation(&self) -> RemoveOperation {
        RemoveOperation::new(
            self.base.name().to_string(),
            self.base.key().clone(),
            self.value.clone(),
            self.thread_id,
        )
    }
}

impl CallSignature for RemoveRequest {
    fn method_name(&self) -> &'static str {
        "remove"
    }

    fn parameters(&self) -> Vec<&Data> {
        vec![self.base.key(), &self.value]
    }
}
