//! # 隐写编解码接口
//!
//! 对外暴露的四个操作：单帧/多帧的嵌入与提取。
//!
//! 嵌入在修改任何像素之前完成空载荷与容量校验，因此要么完整成功，
//! 要么返回错误且不产生任何部分嵌入的载体。
//! 提取是宽松的：没有结束标记或末尾比特不完整都视为"没有隐藏信息"，
//! 统一返回 `None`，因为提取经常作用在从未被隐写过的载体上。

use image::RgbImage;
use log::debug;

use crate::bitstream::{self, BitSequence};
use crate::capacity;
use crate::error::StegoError;
use crate::sequence;
use crate::steganography::{self, Extraction};

/// 将文本隐藏到单帧中，返回新的帧。
///
/// # Errors
///
/// * [`StegoError::EmptyPayload`] - `payload` 为空。
/// * [`StegoError::UnsupportedCharacter`] - 含有码位大于 255 的字符。
/// * [`StegoError::PayloadTooLarge`] - 载荷加结束标记超过 `width * height * 3` 个比特。
pub fn embed_single(frame: &RgbImage, payload: &str) -> Result<RgbImage, StegoError> {
    let bits = prepare(payload)?;
    capacity::validate(bits.len(), frame.width(), frame.height())?;

    Ok(steganography::embed(frame, &bits))
}

/// 从单帧中提取隐藏的文本。
pub fn extract_single(frame: &RgbImage) -> Option<String> {
    recover_text(steganography::extract(frame))
}

/// 将文本跨帧隐藏到有序的帧序列中。
///
/// 在修改任何帧之前，先用所有帧的总容量校验载荷大小。
///
/// # Errors
///
/// 与 [`embed_single`] 相同，其中容量按所有帧之和计算。
pub fn embed_sequence(frames: &[RgbImage], payload: &str) -> Result<Vec<RgbImage>, StegoError> {
    let bits = prepare(payload)?;
    capacity::validate_sequence(bits.len(), frames)?;

    Ok(sequence::embed(frames, &bits))
}

/// 从帧序列中提取隐藏的文本。
pub fn extract_sequence(frames: &[RgbImage]) -> Option<String> {
    recover_text(sequence::extract(frames))
}

fn prepare(payload: &str) -> Result<BitSequence, StegoError> {
    if payload.is_empty() {
        return Err(StegoError::EmptyPayload);
    }
    bitstream::encode(payload)
}

fn recover_text(extraction: Extraction) -> Option<String> {
    if !extraction.found {
        debug!(
            "no terminator found after scanning {} bits",
            extraction.bits.len()
        );
        return None;
    }

    match bitstream::decode(&extraction.bits) {
        Ok(text) if !text.is_empty() => Some(text),
        Ok(_) => None,
        Err(err) => {
            debug!("discarding extracted bits: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TERMINATOR;
    use image::Rgb;

    #[test]
    fn test_single_roundtrip() {
        let frame = RgbImage::from_pixel(8, 8, Rgb([12, 34, 56]));
        let doctored = embed_single(&frame, "hello").unwrap();
        assert_eq!(extract_single(&doctored).as_deref(), Some("hello"));
    }

    #[test]
    fn test_empty_payload_checked_before_capacity() {
        let frame = RgbImage::new(0, 0);
        assert_eq!(embed_single(&frame, ""), Err(StegoError::EmptyPayload));
        assert_eq!(embed_sequence(&[], ""), Err(StegoError::EmptyPayload));
    }

    #[test]
    fn test_malformed_trailing_bits_are_not_a_payload() {
        let mut bits = vec![true, false, true];
        bits.extend_from_slice(&TERMINATOR);
        let frame = steganography::embed(&RgbImage::new(4, 4), &bits);

        assert_eq!(extract_single(&frame), None);
        assert_eq!(extract_sequence(&[frame]), None);
    }

    #[test]
    fn test_bare_terminator_means_nothing_found() {
        let frame = steganography::embed(&RgbImage::new(4, 4), &TERMINATOR);
        assert_eq!(extract_single(&frame), None);
    }

    #[test]
    fn test_sequence_rejects_oversized_payload_before_mutation() {
        let frames = vec![RgbImage::new(2, 2); 3];
        let err = embed_sequence(&frames, "toolong").unwrap_err();
        assert_eq!(
            err,
            StegoError::PayloadTooLarge {
                required: 72,
                available: 36
            }
        );
    }
}
