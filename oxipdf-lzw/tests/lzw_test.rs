//! LZWDecode integration tests.
//!
//! Fixtures come from weezl's MSB encoder: the TIFF size switch matches
//! `/EarlyChange 1`, the plain switch matches `/EarlyChange 0`.

use oxipdf_core::error::FilterError;
use oxipdf_core::params::DecodeParms;
use oxipdf_core::traits::StreamFilter;
use oxipdf_lzw::{LzwConfig, LzwDecoder, LzwFilter, decompress};
use weezl::BitOrder;
use weezl::encode::Encoder;

fn encode_early(data: &[u8]) -> Vec<u8> {
    Encoder::with_tiff_size_switch(BitOrder::Msb, 8)
        .encode(data)
        .expect("weezl encoding failed")
}

fn encode_late(data: &[u8]) -> Vec<u8> {
    Encoder::new(BitOrder::Msb, 8)
        .encode(data)
        .expect("weezl encoding failed")
}

/// Pack `(code, width)` pairs MSB-first, zero padding the last byte.
fn pack(codes: &[(u16, u8)]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut buffer = 0u32;
    let mut bits = 0u8;
    for &(code, width) in codes {
        buffer = (buffer << width) | u32::from(code);
        bits += width;
        while bits >= 8 {
            out.push((buffer >> (bits - 8)) as u8);
            bits -= 8;
        }
        buffer &= (1u32 << bits) - 1;
    }
    if bits > 0 {
        out.push((buffer << (8 - bits)) as u8);
    }
    out
}

fn pseudo_random(len: usize) -> Vec<u8> {
    let mut seed: u64 = 0x123456789ABCDEF0;
    (0..len)
        .map(|_| {
            // Linear congruential generator
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            (seed >> 32) as u8
        })
        .collect()
}

#[test]
fn test_lzw_classic_string() {
    let original = b"TOBEORNOTTOBEORTOBEORNOT";
    let decoded = decompress(&encode_early(original), None).expect("decoding failed");
    assert_eq!(decoded, original);
}

#[test]
fn test_lzw_310_bytes() {
    let original = b"This is a test of compression! ".repeat(10);
    assert_eq!(original.len(), 310);

    let decoded = decompress(&encode_early(&original), None).expect("decoding failed");
    assert_eq!(decoded.len(), 310);
    assert_eq!(decoded, original);
}

#[test]
fn test_lzw_empty_stream() {
    let decoded = decompress(&encode_early(b""), None).expect("decoding failed");
    assert!(decoded.is_empty());

    let decoded = decompress(b"", None).expect("decoding failed");
    assert!(decoded.is_empty());
}

#[test]
fn test_lzw_fixture_sizes() {
    for size in [1, 10, 255, 256, 257, 500, 1000, 4095, 4096, 4097] {
        let original = vec![b'A'; size];
        let decoded = decompress(&encode_early(&original), None).expect("decoding failed");
        assert_eq!(decoded, original, "mismatch for input size {}", size);
    }
}

#[test]
fn test_lzw_incremental_pattern() {
    let mut original = Vec::new();
    for i in 0..256 {
        for _ in 0..10 {
            original.push(i as u8);
        }
    }

    let decoded = decompress(&encode_early(&original), None).expect("decoding failed");
    assert_eq!(decoded, original);
}

#[test]
fn test_lzw_table_overflow_and_clear() {
    // Random data fills the 4096-entry table several times over.
    let original = pseudo_random(64 * 1024);
    let decoded = decompress(&encode_early(&original), None).expect("decoding failed");
    assert_eq!(decoded, original);
}

#[test]
fn test_lzw_late_change() {
    let original = b"The quick brown fox jumps over the lazy dog. ".repeat(100);
    let parms = DecodeParms::new().with("EarlyChange", 0);

    let decoded = decompress(&encode_late(&original), Some(&parms)).expect("decoding failed");
    assert_eq!(decoded, original);
}

#[test]
fn test_lzw_chunking_invariance() {
    let original = b"The quick brown fox jumps over the lazy dog. ".repeat(50);
    let encoded = encode_early(&original);

    for chunk_size in [1, 2, 3, 7, 64, encoded.len()] {
        let mut filter = LzwFilter::new();
        let mut out = Vec::new();
        filter.begin_decode(None).unwrap();
        for chunk in encoded.chunks(chunk_size) {
            filter.decode_block(chunk, &mut out).unwrap();
        }
        filter.end_decode(&mut out).unwrap();
        assert_eq!(out, original, "mismatch for chunk size {}", chunk_size);
    }
}

#[test]
fn test_lzw_width_switch_at_511() {
    // 254 codes grow the table from 258 to 511 entries, so the next code
    // is read with 10 bits.
    let mut codes: Vec<(u16, u8)> = (0..254).map(|i| (i as u16 % 200, 9)).collect();
    codes.push((256, 10));
    codes.push((u16::from(b'A'), 9));
    codes.push((257, 9));

    let decoded = decompress(&pack(&codes), None).expect("decoding failed");
    assert_eq!(decoded.len(), 255);
    assert_eq!(decoded[253], 253 % 200);
    assert_eq!(decoded[254], b'A');
}

#[test]
fn test_lzw_width_stays_nine_below_511() {
    let mut codes: Vec<(u16, u8)> = (0..253).map(|i| (i as u16 % 200, 9)).collect();
    codes.push((257, 9));

    let mut decoder = LzwDecoder::new(LzwConfig::PDF);
    let mut out = Vec::new();
    decoder.feed(&pack(&codes), &mut out).unwrap();
    decoder.finish().unwrap();
    assert!(decoder.is_finished());
    assert_eq!(out.len(), 253);
    assert_eq!(decoder.code_bits(), 9);
}

#[test]
fn test_lzw_late_change_switches_at_512() {
    let mut codes: Vec<(u16, u8)> = (0..254).map(|i| (i as u16 % 200, 9)).collect();
    codes.push((u16::from(b'B'), 9));
    codes.push((257, 10));

    let mut decoder = LzwDecoder::new(LzwConfig::PDF_LATE_CHANGE);
    let mut out = Vec::new();
    decoder.feed(&pack(&codes), &mut out).unwrap();
    assert!(decoder.is_finished());
    assert_eq!(out.len(), 255);
    assert_eq!(out[254], b'B');
}

#[test]
fn test_lzw_clear_resets_width() {
    let mut codes: Vec<(u16, u8)> = (0..254).map(|i| (i as u16 % 200, 9)).collect();
    codes.push((256, 10));

    let mut decoder = LzwDecoder::new(LzwConfig::PDF);
    let mut out = Vec::new();
    decoder.feed(&pack(&codes), &mut out).unwrap();
    assert_eq!(decoder.code_bits(), 9);
}

#[test]
fn test_lzw_corrupt_first_code() {
    let data = pack(&[(256, 9), (400, 9)]);
    let err = decompress(&data, None).unwrap_err();
    assert!(matches!(
        err,
        FilterError::ValueOutOfRange {
            filter: "LZWDecode",
            ..
        }
    ));
}

#[test]
fn test_lzw_bad_early_change() {
    let parms = DecodeParms::new().with("EarlyChange", 5);
    let err = decompress(&encode_early(b"abc"), Some(&parms)).unwrap_err();
    assert!(matches!(err, FilterError::InvalidParameter { .. }));
}

#[test]
fn test_lzw_tiff_predictor() {
    // Two gray rows of three samples, differenced horizontally.
    let predicted = [10u8, 1, 1, 20, 2, 2];
    let parms = DecodeParms::new()
        .with("Predictor", 2)
        .with("Columns", 3);

    let decoded = decompress(&encode_early(&predicted), Some(&parms)).expect("decoding failed");
    assert_eq!(decoded, [10, 11, 12, 20, 22, 24]);
}

#[test]
fn test_lzw_filter_reusable_after_failure() {
    let mut filter = LzwFilter::new();
    assert!(filter.decode(&pack(&[(300, 9)]), None).is_err());

    let decoded = filter
        .decode(&encode_early(b"recovered"), None)
        .expect("decoding failed");
    assert_eq!(decoded, b"recovered");
}
