//! # 多帧隐写模块
//!
//! 将单帧的 LSB 嵌入推广到有序的帧序列 (GIF 动画或视频帧)。
//! 所有帧共享同一个比特游标：前一帧写满后从下一帧的第一个样本继续，
//! 提取时同样跨越帧边界连续扫描，直到遇到结束标记。

use image::RgbImage;

use crate::steganography::{self, Extraction, TerminatorScanner};

/// 将 `bits` 依次写入帧序列，返回与输入顺序、数量一致的新帧。
///
/// 比特写完之后的帧原样复制；各帧的尺寸可以互不相同。
/// 容量不足时多余的比特会被丢弃，调用方应先用
/// [`validate_sequence`](crate::capacity::validate_sequence) 校验。
pub fn embed(frames: &[RgbImage], bits: &[bool]) -> Vec<RgbImage> {
    let mut cursor = 0;

    frames
        .iter()
        .map(|frame| {
            let mut doctored = frame.clone();
            if cursor < bits.len() {
                cursor += steganography::embed_in_place(&mut doctored, &bits[cursor..]);
            }
            doctored
        })
        .collect()
}

/// 按顺序扫描帧序列，在第一次出现结束标记的位置停止 (可能跨越帧边界)。
pub fn extract(frames: &[RgbImage]) -> Extraction {
    let mut scanner = TerminatorScanner::new();

    for frame in frames {
        if scanner.scan(frame) {
            break;
        }
    }

    scanner.finish()
}
