//! # 比特流模块
//!
//! 负责文本载荷与比特序列之间的转换。每个字符按 8 位、最高位优先展开，
//! 编码结果末尾追加固定的 16 位结束标记 [`TERMINATOR`]。

use crate::constants::{BITS_PER_CHAR, TERMINATOR};
use crate::error::StegoError;

/// 按顺序排列的单个比特。
pub type BitSequence = Vec<bool>;

/// 将文本载荷编码为比特序列，并在末尾追加结束标记。
///
/// # Errors
///
/// 当某个字符的码位大于 255 时返回 [`StegoError::UnsupportedCharacter`]，
/// 不会做静默截断。
pub fn encode(payload: &str) -> Result<BitSequence, StegoError> {
    let mut bits = Vec::with_capacity(payload.len() * BITS_PER_CHAR + TERMINATOR.len());

    for (index, ch) in payload.chars().enumerate() {
        let byte = u8::try_from(ch).map_err(|_| StegoError::UnsupportedCharacter { ch, index })?;
        bits.extend((0..BITS_PER_CHAR).rev().map(|shift| (byte >> shift) & 1 == 1));
    }

    bits.extend_from_slice(&TERMINATOR);
    Ok(bits)
}

/// 将已去掉结束标记的比特序列还原为文本。
///
/// # Errors
///
/// 比特数不是 8 的倍数时返回 [`StegoError::MalformedPayload`]。
pub fn decode(bits: &[bool]) -> Result<String, StegoError> {
    if bits.len() % BITS_PER_CHAR != 0 {
        return Err(StegoError::MalformedPayload { bits: bits.len() });
    }

    Ok(bits
        .chunks_exact(BITS_PER_CHAR)
        .map(|group| char::from(group.iter().fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit))))
        .collect())
}

/// 判断比特序列是否以结束标记结尾。
pub fn ends_with_terminator(bits: &[bool]) -> bool {
    bits.ends_with(&TERMINATOR)
}

/// 含 `chars` 个字符的载荷编码后的总比特数 (包括结束标记)。
pub fn encoded_len(chars: usize) -> usize {
    chars * BITS_PER_CHAR + TERMINATOR.len()
}
