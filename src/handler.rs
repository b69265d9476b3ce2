//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、按载体类型选择解码/编码方式、调用隐写核心，
//! 并向用户报告结果。

use crate::capacity;
use crate::carrier::{
    CarrierKind, VideoTools, decode_gif, decode_still, decode_video, encode_gif, encode_still,
    encode_video,
};
use crate::cli::{CapacityArgs, HideArgs, RecoverArgs};
use crate::codec::{embed_sequence, embed_single, extract_sequence, extract_single};
use crate::constants::{DOCTORED_PREFIX, MAX_MESSAGE_CHARS, RECOVERED_PREFIX};
use crate::error::StegoError;
use anyhow::{Context, Result};
use colored::Colorize;
use image::RgbImage;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取载体和文本、检查文本长度与输出路径、按载体类型隐藏文本，
/// 最后将结果写入目标文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 载体的扩展名不受支持，或无法读取载体/文本文件。
/// * 文本为空、超过长度上限或含有单字节范围以外的字符。
/// * 载体没有足够的空间来隐藏文本。
/// * 目标文件已存在且未指定 `--force`，或无法写入目标文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let kind = CarrierKind::from_path(&args.image)?;
    let message = read_message(&args)?;

    anyhow::ensure!(
        !message.is_empty(),
        "The text to hide is empty. There is nothing to hide."
    );

    let chars = message.chars().count();
    anyhow::ensure!(
        chars <= MAX_MESSAGE_CHARS,
        "The text is too long. \nLength: {}, Limit: {}",
        chars.to_string().red().bold(),
        MAX_MESSAGE_CHARS.to_string().green().bold()
    );

    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_hidden_path(&args.image, kind));
    ensure_writable(&dest, args.force)?;

    let carrier = read_carrier(&args.image)?;
    info!(
        "hiding {} characters in {:?} carrier {}",
        chars,
        kind,
        args.image.display()
    );

    let tools = VideoTools::from(&args.video);
    let doctored = hide_in_carrier(kind, &args.image, &carrier, &message, &tools)?;

    fs::write(&dest, doctored).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的载体、按载体类型提取隐藏的文本，并写入目标文本文件。
/// 载体中没有隐藏文本属于正常情况：此时只打印提示，不写入任何文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 载体的扩展名不受支持，或无法读取、解码载体文件。
/// * 目标文件已存在且未指定 `--force`，或无法写入目标文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let kind = CarrierKind::from_path(&args.image)?;
    let dest = args
        .text
        .clone()
        .unwrap_or_else(|| default_recovered_path(&args.image));
    ensure_writable(&dest, args.force)?;

    let carrier = read_carrier(&args.image)?;
    info!("scanning {:?} carrier {}", kind, args.image.display());

    let tools = VideoTools::from(&args.video);
    let Some(text) = recover_from_carrier(kind, &args.image, &carrier, &tools)? else {
        println!(
            "No hidden text was found in: {}",
            args.image.to_string_lossy().yellow().bold()
        );
        return Ok(());
    };

    fs::write(&dest, text).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑。
///
/// 解码载体的全部帧并报告可容纳的比特数与最大字符数。
///
/// # Errors
///
/// 载体的扩展名不受支持，或无法读取、解码载体文件时返回错误。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let kind = CarrierKind::from_path(&args.image)?;
    let carrier = read_carrier(&args.image)?;
    let tools = VideoTools::from(&args.video);
    let frames = load_frames(kind, &args.image, &carrier, &tools)?;

    let bits = capacity::sequence_max_bits(&frames);
    let chars = capacity::max_chars(bits).min(MAX_MESSAGE_CHARS);

    println!("Carrier: {}", args.image.to_string_lossy().bold());
    println!("Frames: {}", frames.len());
    println!("Capacity: {} bits", bits.to_string().green().bold());
    println!(
        "Longest text that fits: {} characters",
        chars.to_string().green().bold()
    );
    Ok(())
}

fn read_message(args: &HideArgs) -> Result<String> {
    match (&args.message, &args.text) {
        (Some(message), _) => Ok(message.clone()),
        (None, Some(path)) => fs::read_to_string(path).with_context(|| {
            format!(
                "Unable to read text file: {}",
                path.to_string_lossy().red().bold()
            )
        }),
        (None, None) => anyhow::bail!("Provide the text to hide with --text or --message."),
    }
}

fn read_carrier(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| {
        format!(
            "Unable to read carrier file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

fn hide_in_carrier(
    kind: CarrierKind,
    path: &Path,
    carrier: &[u8],
    message: &str,
    tools: &VideoTools,
) -> Result<Vec<u8>> {
    match kind {
        CarrierKind::Still => {
            let frame = decode_still(carrier).with_context(|| decode_failure(path))?;
            let doctored = embed_single(&frame, message).map_err(explain)?;
            encode_still(&doctored)
        }
        CarrierKind::Animated => {
            let animation = decode_gif(carrier).with_context(|| decode_failure(path))?;
            let frames = embed_sequence(&animation.frames, message).map_err(explain)?;
            let encoded = encode_gif(&animation.with_frames(frames))?;
            verify_gif(&encoded, message)?;
            Ok(encoded)
        }
        CarrierKind::Video => {
            let clip = decode_video(carrier, &extension_of(path), tools)
                .with_context(|| decode_failure(path))?;
            let frames = embed_sequence(&clip.frames, message).map_err(explain)?;
            encode_video(&clip.with_frames(frames), tools)
        }
    }
}

/// 重新解码编码后的 GIF 并核对隐藏的文本。
///
/// 帧的颜色超过 256 种时编码器会量化调色板，最低有效位随之丢失。
fn verify_gif(encoded: &[u8], message: &str) -> Result<()> {
    let reread = decode_gif(encoded).context("Unable to re-read the encoded GIF.")?;
    anyhow::ensure!(
        extract_sequence(&reread.frames).as_deref() == Some(message),
        "The GIF palette cannot hold the embedded colours, so the hidden text would be lost. \nUse a GIF with fewer colours, or a PNG or video carrier."
    );
    Ok(())
}

fn recover_from_carrier(
    kind: CarrierKind,
    path: &Path,
    carrier: &[u8],
    tools: &VideoTools,
) -> Result<Option<String>> {
    if kind == CarrierKind::Still {
        let frame = decode_still(carrier).with_context(|| decode_failure(path))?;
        return Ok(extract_single(&frame));
    }

    let frames = load_frames(kind, path, carrier, tools)?;
    Ok(extract_sequence(&frames))
}

fn load_frames(
    kind: CarrierKind,
    path: &Path,
    carrier: &[u8],
    tools: &VideoTools,
) -> Result<Vec<RgbImage>> {
    let frames = match kind {
        CarrierKind::Still => vec![decode_still(carrier).with_context(|| decode_failure(path))?],
        CarrierKind::Animated => {
            decode_gif(carrier)
                .with_context(|| decode_failure(path))?
                .frames
        }
        CarrierKind::Video => {
            decode_video(carrier, &extension_of(path), tools)
                .with_context(|| decode_failure(path))?
                .frames
        }
    };
    Ok(frames)
}

/// 将核心错误转换为面向用户的说明，容量不足时给出所需与可用的比特数。
fn explain(err: StegoError) -> anyhow::Error {
    match err {
        StegoError::PayloadTooLarge {
            required,
            available,
        } => anyhow::Error::new(err).context(format!(
            "Not enough space in the carrier to hide the text. \nRequired: {} bits, Available: {} bits",
            required.to_string().red().bold(),
            available.to_string().green().bold()
        )),
        other => anyhow::Error::new(other),
    }
}

fn decode_failure(path: &Path) -> String {
    format!(
        "Unable to decode carrier file: {}",
        path.to_string_lossy().red().bold()
    )
}

fn ensure_writable(dest: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !dest.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        dest.to_string_lossy().red().bold()
    );
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

fn file_stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// 默认的隐写输出路径：与输入同目录的 `doctored_<文件名>.<输出扩展名>`。
pub fn default_hidden_path(image: &Path, kind: CarrierKind) -> PathBuf {
    image.with_file_name(format!(
        "{DOCTORED_PREFIX}{}.{}",
        file_stem_of(image),
        kind.output_extension()
    ))
}

/// 默认的恢复文本路径：与输入同目录的 `recovered_<文件名>.txt`。
pub fn default_recovered_path(image: &Path) -> PathBuf {
    image.with_file_name(format!("{RECOVERED_PREFIX}{}.txt", file_stem_of(image)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hidden_path() {
        assert_eq!(
            default_hidden_path(Path::new("/tmp/photo.jpg"), CarrierKind::Still),
            PathBuf::from("/tmp/doctored_photo.png")
        );
        assert_eq!(
            default_hidden_path(Path::new("clip.GIF"), CarrierKind::Animated),
            PathBuf::from("doctored_clip.gif")
        );
        assert_eq!(
            default_hidden_path(Path::new("movies/trip.mp4"), CarrierKind::Video),
            PathBuf::from("movies/doctored_trip.mkv")
        );
    }

    #[test]
    fn test_default_recovered_path() {
        assert_eq!(
            default_recovered_path(Path::new("/tmp/doctored_photo.png")),
            PathBuf::from("/tmp/recovered_doctored_photo.txt")
        );
    }

    #[test]
    fn test_explain_capacity_error() {
        let err = explain(StegoError::PayloadTooLarge {
            required: 24,
            available: 12,
        });
        assert!(err.to_string().contains("Not enough space"));
        assert_eq!(
            err.downcast_ref::<StegoError>(),
            Some(&StegoError::PayloadTooLarge {
                required: 24,
                available: 12
            })
        );
    }

    #[test]
    fn test_explain_passes_other_errors_through() {
        let err = explain(StegoError::EmptyPayload);
        assert_eq!(err.to_string(), StegoError::EmptyPayload.to_string());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("a/b.MP4")), "mp4");
        assert_eq!(extension_of(Path::new("noext")), "");
    }
}
