use super::error::CodecError;
use super::{FORMAT_VERSION, MAX_DATA_LEN, RAW_NULL, RAW_PRESENT, TAG_DATA, TAG_LONG, TAG_UTF};

/// Serializes one request frame: version, class discriminator, named fields,
/// then the raw trailing section. Named fields must all be written before
/// the first raw write.
pub struct PortableWriter {
    buf: Vec<u8>,
    raw_started: bool,
}

impl PortableWriter {
    pub fn new(class_id: i32) -> Self {
        let mut buf = Vec::with_capacity(64);
        buf.push(FORMAT_VERSION);
        buf.extend_from_slice(&class_id.to_be_bytes());
        Self {
            buf,
            raw_started: false,
        }
    }

    pub fn write_u64(&mut self, name: &str, value: u64) {
        self.field_header(name, TAG_LONG);
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_str(&mut self, name: &str, value: &str) -> Result<(), CodecError> {
        check_len(value.len())?;
        self.field_header(name, TAG_UTF);
        self.buf.extend_from_slice(&(value.len() as u32).to_be_bytes());
        self.buf.extend_from_slice(value.as_bytes());
        Ok(())
    }

    pub fn write_bytes(&mut self, name: &str, value: &[u8]) -> Result<(), CodecError> {
        check_len(value.len())?;
        self.field_header(name, TAG_DATA);
        self.buf.extend_from_slice(&(value.len() as u32).to_be_bytes());
        self.buf.extend_from_slice(value);
        Ok(())
    }

    /// Appends the raw trailing section. `None` writes a null marker, which
    /// decodes back as `None`; `Some(&[])` writes a present empty blob.
    pub fn write_raw_data(&mut self, value: Option<&[u8]>) -> Result<(), CodecError> {
        self.raw_started = true;
        match value {
            None => self.buf.push(RAW_NULL),
            Some(bytes) => {
                check_len(bytes.len())?;
                self.buf.push(RAW_PRESENT);
                self.buf.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
                self.buf.extend_from_slice(bytes);
            }
        }
        Ok(())
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    fn field_header(&mut self, name: &str, tag: u8) {
        debug_assert!(
            !self.raw_started,
            "named fields must precede the raw section"
        );
        self.buf
            .extend_from_slice(&(name.len() as u16).to_be_bytes());
        self.buf.extend_from_slice(name.as_bytes());
        self.buf.push(tag);
    }
}

fn check_len(len: usize) -> Result<(), CodecError> {
    if len > MAX_DATA_LEN {
        return Err(CodecError::PayloadTooLarge {
            len,
            max: MAX_DATA_LEN,
        });
    }
    Ok(())
}
