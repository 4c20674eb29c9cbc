/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 `debug` 或 `info`。重复调用不会报错。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(provider: &str, model: &str) {
    info!("{}", "=".repeat(60));
    info!("📘 Leaving Certificate Honours Maths");
    info!("🤖 模型: {} ({})", model, provider);
    info!("{}", "=".repeat(60));
}

/// 记录真题索引加载结果
///
/// # 参数
/// - `total`: 题目总数
/// - `topics`: 不同主题标签数量
/// - `skipped`: 被跳过的文件
pub fn log_corpus_status(total: usize, topics: usize, skipped: &[String]) {
    if total == 0 {
        warn!("⚠️ 真题索引未加载 - 将在没有真题参考的情况下生成题目");
    } else {
        info!("✅ 真题索引已加载: {} 道题, {} 个主题标签", total, topics);
    }
    for path in skipped {
        warn!("⚠️ 已跳过: {}", path);
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("abc", 5), "abc");
        assert_eq!(truncate_text("θθθθθθ", 3), "θθθ...");
    }
}
