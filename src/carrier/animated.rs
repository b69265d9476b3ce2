use std::io::Cursor;

use anyhow::{Context, Result};
use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::{AnimationDecoder, Delay, DynamicImage, Frame, RgbImage};
use log::debug;

/// 解码后的 GIF 动画：按播放顺序排列的完整画布帧以及每帧的显示时长。
#[derive(Debug, Clone)]
pub struct Animation {
    pub frames: Vec<RgbImage>,
    pub delays: Vec<Delay>,
}

impl Animation {
    /// 用相同的帧时长组装动画。
    pub fn with_uniform_delay(frames: Vec<RgbImage>, delay: Delay) -> Self {
        let delays = vec![delay; frames.len()];
        Self { frames, delays }
    }

    /// 替换全部帧，保留原有的帧时长。
    pub fn with_frames(self, frames: Vec<RgbImage>) -> Self {
        Self {
            frames,
            delays: self.delays,
        }
    }
}

/// 将 GIF 字节解码为帧序列。
pub fn decode_gif(bytes: &[u8]) -> Result<Animation> {
    let decoder = GifDecoder::new(Cursor::new(bytes)).context("Unable to read the GIF header.")?;
    let decoded = decoder
        .into_frames()
        .collect_frames()
        .context("Unable to decode the GIF frames.")?;

    let (frames, delays): (Vec<RgbImage>, Vec<Delay>) = decoded
        .into_iter()
        .map(|frame| {
            let delay = frame.delay();
            (DynamicImage::ImageRgba8(frame.into_buffer()).to_rgb8(), delay)
        })
        .unzip();

    let animation = Animation { frames, delays };
    debug!("decoded GIF with {} frames", animation.frames.len());
    Ok(animation)
}

/// 将帧序列重新编码为无限循环的 GIF。
///
/// GIF 每帧最多只能有 256 种颜色。隐写后颜色数仍不超过 256 的帧会使用精确调色板，
/// 超出时编码器会量化颜色，这些帧中的最低有效位将无法保留。
pub fn encode_gif(animation: &Animation) -> Result<Vec<u8>> {
    anyhow::ensure!(
        animation.frames.len() == animation.delays.len(),
        "Every GIF frame needs a delay: {} frames, {} delays.",
        animation.frames.len(),
        animation.delays.len()
    );

    let mut buffer = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut buffer);
        encoder
            .set_repeat(Repeat::Infinite)
            .context("Unable to write the GIF loop extension.")?;

        for (index, (frame, &delay)) in animation.frames.iter().zip(&animation.delays).enumerate() {
            let rgba = DynamicImage::ImageRgb8(frame.clone()).to_rgba8();
            encoder
                .encode_frame(Frame::from_parts(rgba, 0, 0, delay))
                .with_context(|| format!("Unable to encode GIF frame {index}."))?;
        }
    }

    Ok(buffer)
}
