//! # 载体适配模块
//!
//! 负责在文件字节与 RGB 像素帧之间转换，隐写核心本身不接触任何文件格式。
//!
//! * 静态图像 (PNG、BMP、JPEG 等) 解码为单帧，隐写后统一输出为 PNG。
//! * GIF 动画解码为帧序列，隐写后重新编码为 GIF。
//! * 视频通过 ffmpeg 解码为帧序列，隐写后编码为无损的 FFV1/Matroska。

pub mod animated;
pub mod still;
pub mod video;

use std::path::Path;

use crate::error::StegoError;

pub use animated::{Animation, decode_gif, encode_gif};
pub use still::{decode_still, encode_still};
pub use video::{VideoClip, VideoTools, decode_video, encode_video};

/// 根据文件扩展名判定的载体类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarrierKind {
    /// 单帧静态图像。
    Still,
    /// GIF 动画。
    Animated,
    /// 视频文件。
    Video,
}

impl CarrierKind {
    /// 根据路径的扩展名 (不区分大小写) 判定载体类型。
    ///
    /// # Errors
    ///
    /// 扩展名缺失或不受支持时返回 [`StegoError::UnsupportedCarrier`]。
    pub fn from_path(path: &Path) -> Result<Self, StegoError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| {
                StegoError::UnsupportedCarrier(format!(
                    "'{}' has no file extension",
                    path.display()
                ))
            })?;

        match extension.as_str() {
            "png" | "bmp" | "tif" | "tiff" | "webp" | "qoi" | "jpg" | "jpeg" => Ok(Self::Still),
            "gif" => Ok(Self::Animated),
            "mp4" | "avi" | "mov" | "mkv" | "webm" => Ok(Self::Video),
            other => Err(StegoError::UnsupportedCarrier(format!(
                "'.{other}' files are not supported"
            ))),
        }
    }

    /// 隐写结果使用的文件扩展名。
    pub fn output_extension(self) -> &'static str {
        match self {
            Self::Still => "png",
            Self::Animated => "gif",
            Self::Video => video::OUTPUT_EXTENSION,
        }
    }
}
