//! # lsb_courier 库
//!
//! 本库包含 LSB 隐写工具的核心逻辑：把一段文本 (例如链接) 逐位写入像素 R、G、B
//! 通道的最低有效位，并在之后按相同顺序扫描恢复。载体可以是单张图像，
//! 也可以是 GIF 动画或视频解码出的有序帧序列。
//!
//! ```
//! use image::{Rgb, RgbImage};
//! use lsb_courier::{embed_single, extract_single};
//!
//! let cover = RgbImage::from_pixel(16, 16, Rgb([120, 60, 200]));
//! let doctored = embed_single(&cover, "https://example.com/v/42").unwrap();
//! assert_eq!(extract_single(&doctored).as_deref(), Some("https://example.com/v/42"));
//! assert_eq!(extract_single(&cover), None);
//! ```

// 声明库包含的所有模块。

pub mod bitstream;
pub mod capacity;
pub mod carrier;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod error;
pub mod handler;
pub mod sequence;
pub mod steganography;

pub use codec::{embed_sequence, embed_single, extract_sequence, extract_single};
pub use error::StegoError;
