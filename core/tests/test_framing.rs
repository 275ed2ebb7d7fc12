// Chunk header suite. Validates:
// * canonical encoding of every field, varint length included
// * validation before any byte reaches the sink
// * EOF handling: clean EOF vs truncated header
// * bounds on nonce length and declared ciphertext length

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chunkseal_core::{
        crypto::Scheme,
        framing::{
            decode_chunk_header, encode_chunk_header, read_chunk_header, write_chunk_header,
            ChunkError, ChunkHeader, ChunkKind,
        },
        StreamError,
    };

    const NONCE: [u8; 12] = [9, 8, 7, 6, 5, 4, 3, 2, 1, 0, 0xAA, 0xBB];
    const MAX: u64 = 1_024_000 + 16;

    fn data_header(len: u64) -> ChunkHeader {
        ChunkHeader::new(ChunkKind::Data, Scheme::Aes256Gcm, &NONCE, len).unwrap()
    }

    fn wire(h: &ChunkHeader) -> Vec<u8> {
        let mut out = Vec::new();
        write_chunk_header(&mut out, h).unwrap();
        out
    }

// ## 1. Encoding

    #[test]
    fn data_header_layout() {
        let bytes = wire(&data_header(300));
        assert_eq!(&bytes[..2], b"ct");
        assert_eq!(bytes[2], 0x01);
        assert_eq!(bytes[3], 0x01);
        assert_eq!(bytes[4], 12);
        assert_eq!(&bytes[5..17], &NONCE);
        assert_eq!(&bytes[17..], &[0xac, 0x02]);
        assert_eq!(bytes.len(), data_header(300).encoded_len());
    }

    #[test]
    fn terminator_layout() {
        let h = ChunkHeader::terminator(Scheme::Aes256Gcm, &NONCE).unwrap();
        let bytes = wire(&h);
        assert_eq!(bytes[2], 0xF1);
        assert_eq!(*bytes.last().unwrap(), 0x00);
        assert_eq!(bytes.len(), 2 + 3 + 12 + 1);
    }

    #[test]
    fn write_returns_encoded_length() {
        let h = data_header(1_024_016);
        let mut out = Vec::new();
        let n = write_chunk_header(&mut out, &h).unwrap();
        assert_eq!(n, out.len());
        let (_, m) = encode_chunk_header(&h).unwrap();
        assert_eq!(n, m);
    }

// ## 2. Validation before write

    #[test]
    fn unknown_kind_is_rejected_without_output() {
        let mut h = data_header(32);
        h.kind = 0x42;
        let mut out = Vec::new();
        let err = write_chunk_header(&mut out, &h).unwrap_err();
        assert!(matches!(err, StreamError::Chunk(ChunkError::InvalidChunkKind(0x42))));
        assert!(out.is_empty());
    }

    #[test]
    fn unknown_scheme_is_rejected_without_output() {
        let mut h = data_header(32);
        h.scheme = 0x7F;
        let mut out = Vec::new();
        let err = write_chunk_header(&mut out, &h).unwrap_err();
        assert!(matches!(err, StreamError::Chunk(ChunkError::InvalidScheme(0x7F))));
        assert!(out.is_empty());
    }

    #[test]
    fn oversized_nonce_cannot_be_built() {
        let nonce = [0u8; 129];
        let err = ChunkHeader::new(ChunkKind::Data, Scheme::Aes256Gcm, &nonce, 1).unwrap_err();
        assert!(matches!(err, ChunkError::InvalidNonceLength(129)));
    }

    #[test]
    fn max_nonce_is_accepted() {
        let nonce = [0x5Au8; 128];
        let h = ChunkHeader::new(ChunkKind::Data, Scheme::Aes256Gcm, &nonce, 20).unwrap();
        let bytes = wire(&h);
        let (back, used) = decode_chunk_header(&bytes, MAX).unwrap();
        assert_eq!(back, h);
        assert_eq!(used, bytes.len());
    }

// ## 3. Decoding

    #[test]
    fn read_returns_same_header() {
        for len in [16u64, 127, 128, 1_024_016] {
            let h = data_header(len);
            let bytes = wire(&h);
            let back = read_chunk_header(&mut Cursor::new(bytes), MAX).unwrap();
            assert_eq!(back, h);
            assert_eq!(back.kind().unwrap(), ChunkKind::Data);
            assert_eq!(back.scheme().unwrap(), Scheme::Aes256Gcm);
        }
    }

    #[test]
    fn clean_eof_is_unexpected_end_of_stream() {
        let err = read_chunk_header(&mut Cursor::new(Vec::<u8>::new()), MAX).unwrap_err();
        assert!(matches!(err, StreamError::UnexpectedEndOfStream));
    }

    #[test]
    fn eof_inside_header_is_truncated() {
        let bytes = wire(&data_header(300));
        for cut in 1..bytes.len() {
            let err = read_chunk_header(&mut Cursor::new(bytes[..cut].to_vec()), MAX).unwrap_err();
            assert!(
                matches!(err, StreamError::Truncated { .. }),
                "cut at {cut} gave {err:?}"
            );
        }
    }

    #[test]
    fn bad_tag_is_rejected_first() {
        let mut bytes = wire(&data_header(300));
        bytes[0] = b'x';
        bytes[2] = 0x99; // bad kind too; tag must win
        let err = read_chunk_header(&mut Cursor::new(bytes), MAX).unwrap_err();
        assert!(matches!(err, StreamError::Chunk(ChunkError::InvalidTag(t)) if t == *b"xt"));
    }

    #[test]
    fn bad_kind_is_rejected() {
        let mut bytes = wire(&data_header(300));
        bytes[2] = 0x02;
        let err = read_chunk_header(&mut Cursor::new(bytes), MAX).unwrap_err();
        assert!(matches!(err, StreamError::Chunk(ChunkError::InvalidChunkKind(0x02))));
    }

    #[test]
    fn bad_scheme_is_rejected() {
        let mut bytes = wire(&data_header(300));
        bytes[3] = 0xEE;
        let err = read_chunk_header(&mut Cursor::new(bytes), MAX).unwrap_err();
        assert!(matches!(err, StreamError::Chunk(ChunkError::InvalidScheme(0xEE))));
    }

    #[test]
    fn nonce_length_over_limit_is_rejected() {
        let mut bytes = b"ct".to_vec();
        bytes.extend_from_slice(&[0x01, 0x01, 129]);
        bytes.extend_from_slice(&[0u8; 129]);
        bytes.push(0x10);
        let err = read_chunk_header(&mut Cursor::new(bytes), MAX).unwrap_err();
        assert!(matches!(err, StreamError::Chunk(ChunkError::InvalidNonceLength(129))));
    }

    #[test]
    fn declared_length_over_bound_is_rejected() {
        let bytes = wire(&data_header(MAX + 1));
        let err = read_chunk_header(&mut Cursor::new(bytes), MAX).unwrap_err();
        assert!(matches!(
            err,
            StreamError::Chunk(ChunkError::OversizedChunk { have, max }) if have == MAX + 1 && max == MAX
        ));
    }

    #[test]
    fn declared_length_at_bound_is_accepted() {
        let bytes = wire(&data_header(MAX));
        assert_eq!(read_chunk_header(&mut Cursor::new(bytes), MAX).unwrap().ciphertext_len, MAX);
    }

    #[test]
    fn overlong_varint_is_malformed() {
        let mut bytes = wire(&data_header(0));
        bytes.pop();
        bytes.extend_from_slice(&[0xFF; 11]);
        let err = read_chunk_header(&mut Cursor::new(bytes), u64::MAX).unwrap_err();
        assert!(matches!(err, StreamError::Chunk(ChunkError::MalformedLength)));
    }

    #[test]
    fn terminator_with_payload_is_rejected() {
        let mut h = ChunkHeader::terminator(Scheme::Aes256Gcm, &NONCE).unwrap();
        h.ciphertext_len = 5;
        assert!(matches!(encode_chunk_header(&h), Err(ChunkError::NonEmptyTerminator(5))));

        let mut bytes = wire(&ChunkHeader::terminator(Scheme::Aes256Gcm, &NONCE).unwrap());
        *bytes.last_mut().unwrap() = 0x05;
        let err = read_chunk_header(&mut Cursor::new(bytes), MAX).unwrap_err();
        assert!(matches!(err, StreamError::Chunk(ChunkError::NonEmptyTerminator(5))));
    }

    #[test]
    fn kind_registry_is_closed() {
        for raw in 0u8..=255 {
            let ok = ChunkKind::try_from_u8(raw).is_ok();
            assert_eq!(ok, matches!(raw, 0x01 | 0xF0 | 0xF1), "raw=0x{raw:02x}");
        }
    }
}
