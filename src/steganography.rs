//! # 单帧 LSB 隐写模块
//!
//! 按光栅顺序 (自上而下、从左到右) 遍历像素，每个像素依次使用 R、G、B
//! 三个通道的最低有效位承载一个比特。
//!
//! `RgbImage` 的底层缓冲区本身就是按行优先、通道交错的 `[R, G, B, R, G, B, ...]`，
//! 因此直接顺序遍历样本即为规定的嵌入顺序。

use image::RgbImage;

use crate::bitstream::{self, BitSequence};
use crate::constants::TERMINATOR;

/// 一次提取的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// 找到结束标记时为去掉标记后的载荷比特，否则为已收集的全部比特。
    pub bits: BitSequence,
    /// 是否遇到了结束标记。为 `false` 时 `bits` 不能当作有效载荷使用。
    pub found: bool,
}

/// 增量式的结束标记扫描器，可以跨越多帧持续累积比特。
#[derive(Debug, Default)]
pub struct TerminatorScanner {
    bits: BitSequence,
    found: bool,
}

impl TerminatorScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// 扫描一帧的全部样本，遇到结束标记立即停止。
    ///
    /// 返回是否已经找到结束标记；找到之后再次调用不会读取任何样本。
    pub fn scan(&mut self, frame: &RgbImage) -> bool {
        if self.found {
            return true;
        }

        for &sample in frame.as_raw() {
            self.bits.push(sample & 1 == 1);
            if bitstream::ends_with_terminator(&self.bits) {
                self.found = true;
                break;
            }
        }

        self.found
    }

    pub fn is_found(&self) -> bool {
        self.found
    }

    /// 结束扫描。找到标记时会把它从比特序列中去掉。
    pub fn finish(mut self) -> Extraction {
        if self.found {
            self.bits.truncate(self.bits.len() - TERMINATOR.len());
        }
        Extraction {
            bits: self.bits,
            found: self.found,
        }
    }
}

/// 将比特写入 `frame` 的最低有效位，返回实际写入的比特数。
///
/// 比特耗尽后剩余的样本保持不变；帧容量不足时只写入能放下的部分，
/// 由调用方事先完成容量校验。
pub fn embed_in_place(frame: &mut RgbImage, bits: &[bool]) -> usize {
    let samples: &mut [u8] = &mut **frame;
    let mut written = 0;

    for (sample, &bit) in samples.iter_mut().zip(bits) {
        *sample = (*sample & !1) | u8::from(bit);
        written += 1;
    }

    written
}

/// 返回嵌入了 `bits` 的新帧，尺寸与通道布局保持不变。
pub fn embed(frame: &RgbImage, bits: &[bool]) -> RgbImage {
    let mut doctored = frame.clone();
    embed_in_place(&mut doctored, bits);
    doctored
}

/// 从单帧中提取比特，直到遇到结束标记或扫描完整帧。
pub fn extract(frame: &RgbImage) -> Extraction {
    let mut scanner = TerminatorScanner::new();
    scanner.scan(frame);
    scanner.finish()
}
