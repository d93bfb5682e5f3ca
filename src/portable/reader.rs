use super::error::CodecError;
use super::{FORMAT_VERSION, MAX_DATA_LEN, RAW_NULL, RAW_PRESENT, TAG_DATA, TAG_LONG, TAG_UTF};

/// Deserializes one request frame. The read order must mirror the write
/// order exactly: each named read verifies the recorded field name and type
/// tag, so a schema drift between sender and receiver surfaces as
/// `MalformedWireData` instead of silently misread fields.
pub struct PortableReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> PortableReader<'a> {
    /// Validates the frame preamble and positions the reader at the first
    /// named field. Fails if the version is unsupported or the class
    /// discriminator is not the expected one.
    pub fn open(buf: &'a [u8], expected_class_id: i32) -> Result<Self, CodecError> {
        let mut reader = Self { buf, pos: 0 };
        reader.check_preamble()?;
        let class_id = i32::from_be_bytes(reader.take_array::<4>("class discriminator")?);
        if class_id != expected_class_id {
            return Err(CodecError::MalformedWireData(format!(
                "class id mismatch: expected {expected_class_id}, found {class_id}"
            )));
        }
        Ok(reader)
    }

    /// Reads only the class discriminator, without committing to a decoder.
    /// Used by the request family dispatch to select the concrete type.
    pub fn peek_class_id(buf: &[u8]) -> Result<i32, CodecError> {
        let mut reader = PortableReader { buf, pos: 0 };
        reader.check_preamble()?;
        Ok(i32::from_be_bytes(
            reader.take_array::<4>("class discriminator")?,
        ))
    }

    pub fn read_u64(&mut self, name: &str) -> Result<u64, CodecError> {
        self.field_header(name, TAG_LONG)?;
        Ok(u64::from_be_bytes(self.take_array::<8>("long payload")?))
    }

    pub fn read_str(&mut self, name: &str) -> Result<String, CodecError> {
        self.field_header(name, TAG_UTF)?;
        let len = self.take_len("utf length")?;
        let bytes = self.take(len, "utf payload")?;
        String::from_utf8(bytes.to_vec()).map_err(|_| {
            CodecError::MalformedWireData(format!("field `{name}` is not valid UTF-8"))
        })
    }

    pub fn read_bytes(&mut self, name: &str) -> Result<Vec<u8>, CodecError> {
        self.field_header(name, TAG_DATA)?;
        let len = self.take_len("data length")?;
        Ok(self.take(len, "data payload")?.to_vec())
    }

    /// Reads the raw trailing section written by
    /// [`write_raw_data`](super::writer::PortableWriter::write_raw_data).
    /// A null marker decodes as `None`; a present empty blob as `Some(vec![])`.
    pub fn read_raw_data(&mut self) -> Result<Option<Vec<u8>>, CodecError> {
        let marker = self.take_array::<1>("raw marker")?[0];
        match marker {
            RAW_NULL => Ok(None),
            RAW_PRESENT => {
                let len = self.take_len("raw data length")?;
                Ok(Some(self.take(len, "raw data payload")?.to_vec()))
            }
            other => Err(CodecError::MalformedWireData(format!(
                "unknown raw data marker {other:#04x}"
            ))),
        }
    }

    fn check_preamble(&mut self) -> Result<(), CodecError> {
        let version = self.take_array::<1>("format version")?[0];
        if version != FORMAT_VERSION {
            return Err(CodecError::MalformedWireData(format!(
                "unsupported format version {version}"
            )));
        }
        Ok(())
    }

    fn field_header(&mut self, expected: &str, expected_tag: u8) -> Result<(), CodecError> {
        let name_len = u16::from_be_bytes(self.take_array::<2>("field name length")?) as usize;
        let name = self.take(name_len, "field name")?;
        if name != expected.as_bytes() {
            let found = String::from_utf8_lossy(name);
            return Err(CodecError::MalformedWireData(format!(
                "expected field `{expected}`, found `{found}`"
            )));
        }
        let tag = self.take_array::<1>("field tag")?[0];
        if tag != expected_tag {
            return Err(CodecError::MalformedWireData(format!(
                "field `{expected}` has unexpected type tag {tag}"
            )));
        }
        Ok(())
    }

    fn take_len(&mut self, what: &str) -> Result<usize, CodecError> {
        let len = u32::from_be_bytes(self.take_array::<4>(what)?) as usize;
        if len > MAX_DATA_LEN {
            return Err(CodecError::MalformedWireData(format!(
                "{what} of {len} bytes exceeds the {MAX_DATA_LEN} byte limit"
            )));
        }
        Ok(len)
    }

    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8], CodecError> {
        if self.buf.len() - self.pos < n {
            return Err(CodecError::MalformedWireData(format!(
                "truncated frame while reading {what}"
            )));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self, what: &str) -> Result<[u8; N], CodecError> {
        let slice = self.take(N, what)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }
}
