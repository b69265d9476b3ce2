use std::io::Cursor;

use anyhow::{Context, Result};
use image::{ImageFormat, RgbImage};

/// 将任意受支持格式的图像字节解码为 RGB 帧，透明通道会被丢弃。
pub fn decode_still(bytes: &[u8]) -> Result<RgbImage> {
    let image = image::load_from_memory(bytes).context("Unable to decode the image data.")?;
    Ok(image.to_rgb8())
}

/// 将帧编码为 PNG。PNG 是无损格式，最低有效位可以完整保留。
pub fn encode_still(frame: &RgbImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    frame
        .write_to(&mut buffer, ImageFormat::Png)
        .context("Unable to encode the image as PNG.")?;
    Ok(buffer.into_inner())
}
