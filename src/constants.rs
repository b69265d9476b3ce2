/// 单个字符编码后占用的比特数。
/// 载荷中的每个字符都必须位于 0-255 的单字节范围内。
pub const BITS_PER_CHAR: usize = 8;

/// 每个像素参与隐写的颜色通道数，固定顺序为 (R, G, B)。
pub const CHANNELS_PER_PIXEL: usize = 3;

/// 载荷结束标记 `1111111111111110`：十五个 1 后接一个 0。
///
/// 提取时一旦最近的 16 个比特等于该模式就立即停止扫描。
/// 若载荷本身的比特流中出现了同样的模式，提取会在该处提前结束。
pub const TERMINATOR: [bool; 16] = [
    true, true, true, true, true, true, true, true, true, true, true, true, true, true, true,
    false,
];

/// 一次隐写允许的最大字符数。
pub const MAX_MESSAGE_CHARS: usize = 5000;

/// 默认输出载体文件名的前缀。
pub const DOCTORED_PREFIX: &str = "doctored_";

/// 默认恢复文本文件名的前缀。
pub const RECOVERED_PREFIX: &str = "recovered_";

/// 默认的 ffmpeg 可执行文件。
pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// 默认的 ffprobe 可执行文件。
pub const DEFAULT_FFPROBE: &str = "ffprobe";
