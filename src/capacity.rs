//! # 容量模块
//!
//! 根据载体尺寸计算可容纳的最大比特数，并在修改任何像素之前校验载荷大小。

use image::RgbImage;

use crate::constants::{BITS_PER_CHAR, CHANNELS_PER_PIXEL, TERMINATOR};
use crate::error::StegoError;

/// 单帧 `width` x `height` 可容纳的比特数。
pub fn max_bits(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS_PER_PIXEL
}

/// 校验 `bit_len` 个比特能否放入单帧。
///
/// # Errors
///
/// 超出容量时返回 [`StegoError::PayloadTooLarge`]。
pub fn validate(bit_len: usize, width: u32, height: u32) -> Result<(), StegoError> {
    check(bit_len, max_bits(width, height))
}

/// 帧序列中所有帧的容量之和。
pub fn sequence_max_bits(frames: &[RgbImage]) -> usize {
    frames
        .iter()
        .map(|frame| max_bits(frame.width(), frame.height()))
        .sum()
}

/// 校验 `bit_len` 个比特能否放入整个帧序列。
///
/// # Errors
///
/// 超出所有帧的总容量时返回 [`StegoError::PayloadTooLarge`]。
pub fn validate_sequence(bit_len: usize, frames: &[RgbImage]) -> Result<(), StegoError> {
    check(bit_len, sequence_max_bits(frames))
}

/// 给定容量下最多能隐藏的字符数。
pub fn max_chars(max_bits: usize) -> usize {
    max_bits.saturating_sub(TERMINATOR.len()) / BITS_PER_CHAR
}

fn check(required: usize, available: usize) -> Result<(), StegoError> {
    if required > available {
        return Err(StegoError::PayloadTooLarge {
            required,
            available,
        });
    }
    Ok(())
}
