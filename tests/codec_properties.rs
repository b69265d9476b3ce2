use image::{Rgb, RgbImage};
use lsb_courier::{
    StegoError, bitstream, capacity, embed_sequence, embed_single, extract_sequence,
    extract_single,
};
use rand::{Rng, RngCore};

/// 一个辅助函数，用于创建一个带有随机像素的帧
fn random_frame(width: u32, height: u32) -> RgbImage {
    let mut raw = vec![0u8; (width * height * 3) as usize];
    rand::rng().fill_bytes(&mut raw);
    RgbImage::from_raw(width, height, raw).expect("buffer matches dimensions")
}

/// 一个辅助函数，生成随机的可打印 ASCII 文本
fn random_ascii(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len).map(|_| char::from(rng.random_range(0x20u8..0x7f))).collect()
}

#[test]
fn test_roundtrip_random_payloads() {
    for len in [1, 7, 64, 300] {
        let frame = random_frame(64, 48);
        let payload = random_ascii(len);
        let doctored = embed_single(&frame, &payload).unwrap();
        assert_eq!(extract_single(&doctored), Some(payload));
    }
}

#[test]
fn test_roundtrip_full_latin1_range() {
    // 0xFF 0xFE 会组成结束标记，这里刻意避开
    let payload: String = (1u8..=0xFD).map(char::from).collect();
    let frame = random_frame(40, 40);
    let doctored = embed_single(&frame, &payload).unwrap();
    assert_eq!(extract_single(&doctored), Some(payload));
}

#[test]
fn test_capacity_boundary_exact_fit() {
    // 4x4 帧可容纳 48 比特，恰好是 4 个字符加 16 位结束标记
    let frame = random_frame(4, 4);
    assert_eq!(bitstream::encoded_len(4), capacity::max_bits(4, 4));

    let doctored = embed_single(&frame, "ABCD").unwrap();
    assert_eq!(extract_single(&doctored).as_deref(), Some("ABCD"));

    assert_eq!(
        embed_single(&frame, "ABCDE"),
        Err(StegoError::PayloadTooLarge {
            required: 56,
            available: 48
        })
    );
    assert!(capacity::validate(48, 4, 4).is_ok());
    assert!(capacity::validate(49, 4, 4).is_err());
}

#[test]
fn test_two_by_two_frame_is_too_small_for_one_char() {
    let frame = RgbImage::new(2, 2);
    assert_eq!(
        embed_single(&frame, "A"),
        Err(StegoError::PayloadTooLarge {
            required: 24,
            available: 12
        })
    );

    let frame = random_frame(4, 4);
    let doctored = embed_single(&frame, "A").unwrap();
    assert_eq!(extract_single(&doctored).as_deref(), Some("A"));
}

#[test]
fn test_empty_payload_is_rejected() {
    let frame = random_frame(8, 8);
    assert_eq!(embed_single(&frame, ""), Err(StegoError::EmptyPayload));
    assert_eq!(
        embed_sequence(&[frame.clone(), frame], ""),
        Err(StegoError::EmptyPayload)
    );
}

#[test]
fn test_wide_characters_are_rejected() {
    let frame = random_frame(32, 32);
    assert_eq!(
        embed_single(&frame, "naïve ✓"),
        Err(StegoError::UnsupportedCharacter { ch: '✓', index: 6 })
    );
}

#[test]
fn test_unmodified_carrier_yields_nothing() {
    let frame = RgbImage::from_fn(32, 32, |x, y| Rgb([(x * 8) as u8, (y * 8) as u8, 64]));
    assert_eq!(extract_single(&frame), None);
    assert_eq!(extract_sequence(&[frame.clone(), frame]), None);
    assert_eq!(extract_sequence(&[]), None);
}

#[test]
fn test_extraction_is_idempotent() {
    let frame = embed_single(&random_frame(16, 16), "same every time").unwrap();
    let first = extract_single(&frame);
    let second = extract_single(&frame);
    assert_eq!(first, second);
    assert_eq!(first.as_deref(), Some("same every time"));
}

#[test]
fn test_embedding_changes_only_low_bits() {
    let frame = random_frame(20, 20);
    let doctored = embed_single(&frame, "only the lowest bit moves").unwrap();
    assert_eq!(doctored.dimensions(), frame.dimensions());
    assert!(
        frame
            .as_raw()
            .iter()
            .zip(doctored.as_raw())
            .all(|(a, b)| a & !1 == b & !1)
    );
}

#[test]
fn test_multi_frame_continuation() {
    // 每帧 4x2 像素可容纳 24 比特，"Hi" 编码后为 32 比特
    let frames: Vec<RgbImage> = (0..4).map(|_| random_frame(4, 2)).collect();
    let doctored = embed_sequence(&frames, "Hi").unwrap();

    assert_eq!(doctored.len(), frames.len());
    let bits = bitstream::encode("Hi").unwrap();
    let written: Vec<bool> = doctored[0]
        .as_raw()
        .iter()
        .chain(&doctored[1].as_raw()[..8])
        .map(|sample| sample & 1 == 1)
        .collect();
    assert_eq!(written, bits);

    assert_eq!(doctored[1].as_raw()[8..], frames[1].as_raw()[8..]);
    assert_eq!(doctored[2], frames[2]);
    assert_eq!(doctored[3], frames[3]);

    assert_eq!(extract_sequence(&doctored).as_deref(), Some("Hi"));
}

#[test]
fn test_sequence_capacity_is_checked_up_front() {
    let frames: Vec<RgbImage> = (0..3).map(|_| random_frame(2, 2)).collect();
    // 三帧共 36 比特，"Hi" 需要 32 比特，"Hey" 需要 40 比特
    assert!(embed_sequence(&frames, "Hi").is_ok());
    assert_eq!(
        embed_sequence(&frames, "Hey"),
        Err(StegoError::PayloadTooLarge {
            required: 40,
            available: 36
        })
    );
}

#[test]
fn test_sequence_with_mixed_frame_sizes() {
    let frames = vec![random_frame(3, 1), random_frame(1, 1), random_frame(10, 10)];
    let payload = "mixed sizes are fine";
    let doctored = embed_sequence(&frames, payload).unwrap();

    let dimensions: Vec<_> = doctored.iter().map(RgbImage::dimensions).collect();
    assert_eq!(dimensions, vec![(3, 1), (1, 1), (10, 10)]);
    assert_eq!(extract_sequence(&doctored).as_deref(), Some(payload));
}

#[test]
fn test_terminator_inside_payload_cuts_it_short() {
    // ÿ (0xFF) 后接 þ (0xFE) 恰好组成结束标记 1111111111111110
    let frame = random_frame(16, 16);
    let doctored = embed_single(&frame, "a\u{ff}\u{fe}z").unwrap();
    assert_eq!(extract_single(&doctored).as_deref(), Some("a"));

    let doctored = embed_single(&frame, "\u{ff}\u{fe}rest").unwrap();
    assert_eq!(extract_single(&doctored), None);

    let frames = vec![random_frame(2, 2); 4];
    let doctored = embed_sequence(&frames, "b\u{ff}\u{fe}").unwrap();
    assert_eq!(extract_sequence(&doctored).as_deref(), Some("b"));
}

#[test]
fn test_single_frame_sequence_matches_single_api() {
    let frame = random_frame(12, 12);
    let payload = "one frame";
    let single = embed_single(&frame, payload).unwrap();
    let sequence = embed_sequence(std::slice::from_ref(&frame), payload).unwrap();
    assert_eq!(sequence, vec![single]);
}
