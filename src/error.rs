//! # 错误类型模块
//!
//! 隐写核心 (比特流、容量校验、嵌入与提取) 使用的强类型错误。
//! 命令行层通过 `anyhow` 为这些错误补充上下文。

use thiserror::Error;

/// 隐写核心可能返回的错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// 尝试隐藏一段空文本。
    #[error("the payload is empty, there is nothing to hide")]
    EmptyPayload,

    /// 载荷中含有超出单字节范围 (0-255) 的字符。
    #[error("character {ch:?} at index {index} is outside the single-byte range 0-255")]
    UnsupportedCharacter { ch: char, index: usize },

    /// 载荷 (含结束标记) 所需的比特数超过了载体容量。
    #[error("payload needs {required} bits but the carrier only holds {available}")]
    PayloadTooLarge { required: usize, available: usize },

    /// 去掉结束标记后的比特数不是 8 的倍数。
    #[error("payload bit count {bits} is not a multiple of 8")]
    MalformedPayload { bits: usize },

    /// 文件类型无法被解码为像素缓冲区。只由载体适配层产生。
    #[error("unsupported carrier: {0}")]
    UnsupportedCarrier(String),
}
