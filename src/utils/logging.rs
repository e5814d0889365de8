/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use crate::config::Config;
use tracing::info;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 题目管理面板");
    info!("📡 存储模式: {:?}", config.store_mode);
    info!("📝 失败记录: {}", config.failure_log_file);
    info!("{}", "=".repeat(60));
}

/// 记录会话结束信息
pub fn log_shutdown(cached: usize, failure_log: &str) {
    info!("\n{}", "=".repeat(60));
    info!(
        "📊 会话结束 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("缓存题目数: {}", cached);
    info!("失败记录已保存至: {}", failure_log);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
