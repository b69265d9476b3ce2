//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{Args, Parser};
use std::path::PathBuf;

use crate::carrier::VideoTools;
use crate::constants::{DEFAULT_FFMPEG, DEFAULT_FFPROBE};

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在图像、GIF 动画和视频中隐藏或恢复一段文本 (例如链接)。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在无损图像 (如 PNG, BMP)、GIF 动画和视频中隐藏或恢复一段文本 (例如链接)。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、recover (恢复) 和 capacity (容量)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在图像、GIF 动画或视频中隐藏文本。
    Hide(HideArgs),

    /// 从经过隐写的载体中恢复隐藏的文本。
    Recover(RecoverArgs),

    /// 显示载体最多能隐藏多少字符。
    Capacity(CapacityArgs),
}

/// 视频载体使用的外部程序，可通过环境变量配置。
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct VideoArgs {
    /// ffmpeg 可执行文件路径。
    #[arg(long, env = "LSB_COURIER_FFMPEG", default_value = DEFAULT_FFMPEG)]
    pub ffmpeg: String,

    /// ffprobe 可执行文件路径。
    #[arg(long, env = "LSB_COURIER_FFPROBE", default_value = DEFAULT_FFPROBE)]
    pub ffprobe: String,
}

impl Default for VideoArgs {
    fn default() -> Self {
        let VideoTools { ffmpeg, ffprobe } = VideoTools::default();
        Self { ffmpeg, ffprobe }
    }
}

impl From<&VideoArgs> for VideoTools {
    fn from(args: &VideoArgs) -> Self {
        Self {
            ffmpeg: args.ffmpeg.clone(),
            ffprobe: args.ffprobe.clone(),
        }
    }
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的载体文件路径 (PNG, BMP, JPEG, GIF, MP4, MOV, AVI, MKV 等)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文本内容的文件路径。
    #[arg(short, long, required_unless_present = "message", conflicts_with = "message")]
    pub text: Option<PathBuf>,

    /// 直接在命令行中给出要隐藏的文本。
    #[arg(short, long)]
    pub message: Option<String>,

    /// 隐写完成后，保存结果的输出路径。
    /// 默认为输入文件同目录下的 `doctored_<文件名>`，扩展名为 png、gif 或 mkv。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,

    #[command(flatten)]
    pub video: VideoArgs,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏文本数据的载体文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文本后，保存文本内容的输出路径。
    /// 默认为输入文件同目录下的 `recovered_<文件名>.txt`。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,

    #[command(flatten)]
    pub video: VideoArgs,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要检查的载体文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    #[command(flatten)]
    pub video: VideoArgs,
}
