use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};

use anyhow::{Context, Result};
use image::RgbImage;
use log::{debug, info, warn};

use crate::constants::{DEFAULT_FFMPEG, DEFAULT_FFPROBE};

/// 隐写后视频使用的容器扩展名。
pub const OUTPUT_EXTENSION: &str = "mkv";

/// 用于读写视频的外部程序。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoTools {
    pub ffmpeg: String,
    pub ffprobe: String,
}

impl Default for VideoTools {
    fn default() -> Self {
        Self {
            ffmpeg: DEFAULT_FFMPEG.to_string(),
            ffprobe: DEFAULT_FFPROBE.to_string(),
        }
    }
}

/// 解码后的视频：尺寸一致的 RGB 帧以及 ffprobe 报告的帧率 (如 `30000/1001`)。
#[derive(Debug, Clone)]
pub struct VideoClip {
    pub frames: Vec<RgbImage>,
    pub frame_rate: String,
}

impl VideoClip {
    /// 替换全部帧，保留原有帧率。
    pub fn with_frames(self, frames: Vec<RgbImage>) -> Self {
        Self {
            frames,
            frame_rate: self.frame_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StreamInfo {
    width: u32,
    height: u32,
    frame_rate: String,
}

/// 通过 ffmpeg 将视频字节解码为 RGB 帧序列。
///
/// 输入先写入一个唯一命名的临时文件 (扩展名为 `extension`，便于 ffmpeg 识别容器)，
/// 函数返回时无论成功与否都会删除。
pub fn decode_video(bytes: &[u8], extension: &str, tools: &VideoTools) -> Result<VideoClip> {
    let mut input = tempfile::Builder::new()
        .prefix("lsb_courier_in_")
        .suffix(&format!(".{extension}"))
        .tempfile()
        .context("Unable to create a temporary file for the video.")?;
    input
        .write_all(bytes)
        .and_then(|_| input.flush())
        .context("Unable to write the video to a temporary file.")?;

    let stream = probe(input.path(), tools)?;
    info!(
        "decoding video: {}x{} @ {} fps",
        stream.width, stream.height, stream.frame_rate
    );

    let mut child = Command::new(&tools.ffmpeg)
        .args(decode_args(input.path()))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to spawn '{}'. Is ffmpeg installed?", tools.ffmpeg))?;

    let frames = match read_frames(&mut child, stream.width, stream.height) {
        Ok(frames) => frames,
        Err(err) => {
            reap(&mut child);
            return Err(err);
        }
    };

    let status = child.wait().context("ffmpeg decode process failed.")?;
    anyhow::ensure!(status.success(), "ffmpeg decode exited with status: {status}");

    info!("decoded {} frames", frames.len());
    Ok(VideoClip {
        frames,
        frame_rate: stream.frame_rate,
    })
}

/// 通过 ffmpeg 将帧序列编码为无损的 FFV1/Matroska 视频并返回文件字节。
///
/// 所有帧必须尺寸一致。有损编码会破坏最低有效位，因此固定使用 FFV1。
pub fn encode_video(clip: &VideoClip, tools: &VideoTools) -> Result<Vec<u8>> {
    let first = clip.frames.first().context("The video has no frames to encode.")?;
    let (width, height) = first.dimensions();
    anyhow::ensure!(
        clip.frames.iter().all(|frame| frame.dimensions() == (width, height)),
        "All video frames must share the same size ({width}x{height})."
    );

    let output = tempfile::Builder::new()
        .prefix("lsb_courier_out_")
        .suffix(&format!(".{OUTPUT_EXTENSION}"))
        .tempfile()
        .context("Unable to create a temporary file for the encoded video.")?;

    info!(
        "encoding {} frames ({}x{} @ {} fps)",
        clip.frames.len(),
        width,
        height,
        clip.frame_rate
    );

    let mut child = Command::new(&tools.ffmpeg)
        .args(["-y", "-v", "error", "-f", "rawvideo", "-pixel_format", "rgb24"])
        .arg("-video_size")
        .arg(format!("{width}x{height}"))
        .arg("-framerate")
        .arg(&clip.frame_rate)
        .args(["-i", "pipe:0", "-c:v", "ffv1", "-level", "3", "-pix_fmt", "bgr0"])
        .arg(output.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to spawn '{}'. Is ffmpeg installed?", tools.ffmpeg))?;

    if let Err(err) = write_frames(&mut child, &clip.frames) {
        reap(&mut child);
        return Err(err);
    }
    drop(child.stdin.take());

    let status = child.wait().context("ffmpeg encode process failed.")?;
    anyhow::ensure!(status.success(), "ffmpeg encode exited with status: {status}");

    let bytes = fs::read(output.path()).context("Unable to read the encoded video.")?;
    info!("video encoding complete: {} bytes", bytes.len());
    Ok(bytes)
}

/// 解码命令的参数。`-noautorotate` 保证输出帧与 ffprobe 报告的编码尺寸一致。
fn decode_args(input: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-v", "error", "-noautorotate", "-i"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(input.as_os_str().to_owned());
    args.extend(
        ["-map", "0:v:0", "-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"]
            .into_iter()
            .map(OsString::from),
    );
    args
}

fn read_frames(child: &mut Child, width: u32, height: u32) -> Result<Vec<RgbImage>> {
    let stdout = child
        .stdout
        .as_mut()
        .context("ffmpeg stdout was not captured.")?;
    let frame_size = width as usize * height as usize * 3;
    let mut frames = Vec::new();

    loop {
        let mut buf = vec![0u8; frame_size];
        if !read_exact_or_eof(stdout, &mut buf).context("Failed to read a frame from ffmpeg.")? {
            break;
        }
        let frame = RgbImage::from_raw(width, height, buf)
            .context("ffmpeg produced a frame of unexpected size.")?;
        frames.push(frame);
    }
    Ok(frames)
}

fn write_frames(child: &mut Child, frames: &[RgbImage]) -> Result<()> {
    let stdin = child.stdin.as_mut().context("ffmpeg stdin was not captured.")?;
    for frame in frames {
        stdin
            .write_all(frame.as_raw())
            .context("Failed to write frame data to ffmpeg.")?;
    }
    Ok(())
}

/// 出错时结束并回收 ffmpeg 子进程，避免留下僵尸进程。
fn reap(child: &mut Child) {
    drop(child.stdin.take());
    if let Err(err) = child.kill() {
        debug!("ffmpeg already exited: {err}");
    }
    if let Err(err) = child.wait() {
        warn!("Failed to reap ffmpeg: {err}");
    }
}

/// 读取第一条视频流的宽、高与帧率。
fn probe(path: &Path, tools: &VideoTools) -> Result<StreamInfo> {
    let output = Command::new(&tools.ffprobe)
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,r_frame_rate",
            "-of",
            "csv=p=0",
        ])
        .arg(path)
        .output()
        .with_context(|| format!("Failed to run '{}'. Is ffprobe installed?", tools.ffprobe))?;

    anyhow::ensure!(
        output.status.success(),
        "ffprobe exited with status: {}",
        output.status
    );

    parse_stream_info(&String::from_utf8_lossy(&output.stdout))
}

/// 解析 `ffprobe -of csv=p=0` 的输出，例如 `1920,1080,30000/1001`。
fn parse_stream_info(text: &str) -> Result<StreamInfo> {
    let line = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .context("ffprobe reported no video stream.")?;

    let mut fields = line.split(',').map(str::trim);
    let width: u32 = fields
        .next()
        .and_then(|field| field.parse().ok())
        .with_context(|| format!("Unexpected ffprobe width in '{line}'."))?;
    let height: u32 = fields
        .next()
        .and_then(|field| field.parse().ok())
        .with_context(|| format!("Unexpected ffprobe height in '{line}'."))?;
    let frame_rate = fields
        .next()
        .filter(|field| !field.is_empty() && *field != "0/0")
        .with_context(|| format!("Unexpected ffprobe frame rate in '{line}'."))?
        .to_string();

    anyhow::ensure!(
        width > 0 && height > 0,
        "ffprobe reported an empty video stream ({width}x{height})."
    );

    Ok(StreamInfo {
        width,
        height,
        frame_rate,
    })
}

/// 读取恰好 `buf.len()` 个字节，在帧边界处遇到 EOF 时返回 `Ok(false)`。
fn read_exact_or_eof(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "partial frame read",
                ));
            }
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}
