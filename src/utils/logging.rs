//! 日志工具模块
//!
//! 提供日志初始化、文件头写入和输出的辅助函数

use std::fs;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化全局日志订阅器
///
/// 日志级别由 RUST_LOG 控制，默认 info
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化导出文件（写入文件头）
///
/// # 参数
/// - `log_file_path`: 导出文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n时政改写日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `model_name`: 使用的模型名称
pub fn log_startup(model_name: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 时政改写与出题模式");
    info!("📊 使用模型: {}", model_name);
    info!("{}", "=".repeat(60));
}

/// 记录会话结束统计
///
/// # 参数
/// - `analyses`: 完成的分析次数
/// - `quizzes`: 生成的题目总数
pub fn log_session_stats(analyses: usize, quizzes: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 本次会话统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("✅ 分析次数: {}", analyses);
    info!("📝 生成题目: {}", quizzes);
    info!("{}", "=".repeat(60));
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
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a long sentence", 6), "a long...");
    }

    #[test]
    fn test_init_log_file() {
        let path = std::env::temp_dir().join("ca_rewriter_log_header_test.txt");
        let path_str = path.to_string_lossy().to_string();

        init_log_file(&path_str).expect("写入文件头失败");

        let content = std::fs::read_to_string(&path).expect("读取失败");
        assert!(content.contains("时政改写日志"));

        let _ = std::fs::remove_file(&path);
    }
}
