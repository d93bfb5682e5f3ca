//! Portable Codec Tests
//!
//! Validates the frame layout invariants: preamble checks, named-field
//! verification, raw-section nullability, and both failure taxonomies
//! (`MalformedWireData` on decode, `PayloadTooLarge` on encode).

#[cfg(test)]
mod tests {
    use crate::portable::error::CodecError;
    use crate::portable::reader::PortableReader;
    use crate::portable::writer::PortableWriter;
    use crate::portable::MAX_DATA_LEN;

    const TEST_CLASS_ID: i32 = 77;

    fn sample_frame(value: Option<&[u8]>) -> Vec<u8> {
        let mut writer = PortableWriter::new(TEST_CLASS_ID);
        writer.write_u64("threadId", 42);
        writer.write_str("name", "orders").unwrap();
        writer.write_bytes("key", &[0xAB, 0xCD]).unwrap();
        writer.write_raw_data(value).unwrap();
        writer.finish()
    }

    // ============================================================
    // ROUND-TRIP
    // ============================================================

    #[test]
    fn test_named_fields_round_trip() {
        let frame = sample_frame(Some(&[1, 2, 3]));

        let mut reader = PortableReader::open(&frame, TEST_CLASS_ID).unwrap();
        assert_eq!(reader.read_u64("threadId").unwrap(), 42);
        assert_eq!(reader.read_str("name").unwrap(), "orders");
        assert_eq!(reader.read_bytes("key").unwrap(), vec![0xAB, 0xCD]);
        assert_eq!(reader.read_raw_data().unwrap(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_null_raw_data_is_distinct_from_empty() {
        let null_frame = sample_frame(None);
        let empty_frame = sample_frame(Some(&[]));

        assert_ne!(
            null_frame, empty_frame,
            "null and empty raw sections must differ on the wire"
        );

        let mut reader = PortableReader::open(&null_frame, TEST_CLASS_ID).unwrap();
        reader.read_u64("threadId").unwrap();
        reader.read_str("name").unwrap();
        reader.read_bytes("key").unwrap();
        assert_eq!(reader.read_raw_data().unwrap(), None);

        let mut reader = PortableReader::open(&empty_frame, TEST_CLASS_ID).unwrap();
        reader.read_u64("threadId").unwrap();
        reader.read_str("name").unwrap();
        reader.read_bytes("key").unwrap();
        assert_eq!(
            reader.read_raw_data().unwrap(),
            Some(vec![]),
            "a present empty blob must decode as Some"
        );
    }

    #[test]
    fn test_empty_string_and_empty_bytes_round_trip() {
        let mut writer = PortableWriter::new(TEST_CLASS_ID);
        writer.write_str("name", "").unwrap();
        writer.write_bytes("key", &[]).unwrap();
        let frame = writer.finish();

        let mut reader = PortableReader::open(&frame, TEST_CLASS_ID).unwrap();
        assert_eq!(reader.read_str("name").unwrap(), "");
        assert_eq!(reader.read_bytes("key").unwrap(), Vec::<u8>::new());
    }

    // ============================================================
    // PREAMBLE AND FIELD VERIFICATION
    // ============================================================

    #[test]
    fn test_foreign_class_id_is_rejected() {
        let frame = sample_frame(None);

        let result = PortableReader::open(&frame, TEST_CLASS_ID + 1);
        assert!(
            matches!(result, Err(CodecError::MalformedWireData(_))),
            "a foreign discriminator must fail the open"
        );
    }

    #[test]
    fn test_peek_class_id_reads_discriminator() {
        let frame = sample_frame(None);
        assert_eq!(PortableReader::peek_class_id(&frame).unwrap(), TEST_CLASS_ID);
    }

    #[test]
    fn test_unsupported_version_is_rejected() {
        let mut frame = sample_frame(None);
        frame[0] = 9;

        let result = PortableReader::open(&frame, TEST_CLASS_ID);
        assert!(matches!(result, Err(CodecError::MalformedWireData(_))));
    }

    #[test]
    fn test_wrong_field_name_is_rejected() {
        let frame = sample_frame(None);

        let mut reader = PortableReader::open(&frame, TEST_CLASS_ID).unwrap();
        let result = reader.read_u64("timestamp");
        assert!(
            matches!(result, Err(CodecError::MalformedWireData(ref msg)) if msg.contains("timestamp")),
            "field name mismatch should be reported, got: {:?}",
            result
        );
    }

    #[test]
    fn test_wrong_field_tag_is_rejected() {
        let frame = sample_frame(None);

        let mut reader = PortableReader::open(&frame, TEST_CLASS_ID).unwrap();
        // "threadId" was written as a long, reading it as a string must fail
        let result = reader.read_str("threadId");
        assert!(matches!(result, Err(CodecError::MalformedWireData(_))));
    }

    // ============================================================
    // TRUNCATION AND CORRUPTION
    // ============================================================

    #[test]
    fn test_truncated_frame_fails_at_every_length() {
        let frame = sample_frame(Some(&[1, 2, 3]));

        // Any prefix of a valid frame must decode with an error, never panic.
        for cut in 0..frame.len() {
            let truncated = &frame[..cut];
            let mut reader = match PortableReader::open(truncated, TEST_CLASS_ID) {
                Ok(reader) => reader,
                Err(CodecError::MalformedWireData(_)) => continue,
                Err(other) => panic!("unexpected error for cut {}: {:?}", cut, other),
            };
            let result = reader
                .read_u64("threadId")
                .and_then(|_| reader.read_str("name"))
                .and_then(|_| reader.read_bytes("key"))
                .and_then(|_| reader.read_raw_data().map(|_| ()));
            assert!(
                matches!(result, Err(CodecError::MalformedWireData(_))),
                "cut at {} should surface truncation",
                cut
            );
        }
    }

    #[test]
    fn test_unknown_raw_marker_is_rejected() {
        let mut writer = PortableWriter::new(TEST_CLASS_ID);
        writer.write_raw_data(None).unwrap();
        let mut frame = writer.finish();
        let marker_pos = frame.len() - 1;
        frame[marker_pos] = 7;

        let mut reader = PortableReader::open(&frame, TEST_CLASS_ID).unwrap();
        assert!(matches!(
            reader.read_raw_data(),
            Err(CodecError::MalformedWireData(_))
        ));
    }

    #[test]
    fn test_corrupt_length_prefix_does_not_allocate() {
        let mut writer = PortableWriter::new(TEST_CLASS_ID);
        writer.write_bytes("key", &[0xAB]).unwrap();
        let mut frame = writer.finish();

        // Overwrite the 4-byte length prefix with u32::MAX; the reader must
        // reject it from the length cap, not attempt the allocation.
        let len_pos = frame.len() - 5;
        frame[len_pos..len_pos + 4].copy_from_slice(&u32::MAX.to_be_bytes());

        let mut reader = PortableReader::open(&frame, TEST_CLASS_ID).unwrap();
        assert!(matches!(
            reader.read_bytes("key"),
            Err(CodecError::MalformedWireData(_))
        ));
    }

    // ============================================================
    // ENCODE-SIDE LIMITS
    // ============================================================

    #[test]
    fn test_oversized_blob_fails_with_payload_too_large() {
        let oversized = vec![0u8; MAX_DATA_LEN + 1];

        let mut writer = PortableWriter::new(TEST_CLASS_ID);
        let result = writer.write_bytes("key", &oversized);
        assert_eq!(
            result,
            Err(CodecError::PayloadTooLarge {
                len: MAX_DATA_LEN + 1,
                max: MAX_DATA_LEN
            })
        );

        let mut writer = PortableWriter::new(TEST_CLASS_ID);
        let result = writer.write_raw_data(Some(&oversized));
        assert!(matches!(result, Err(CodecError::PayloadTooLarge { .. })));
    }
}
