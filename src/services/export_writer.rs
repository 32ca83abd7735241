//! 导出写入服务 - 业务能力层
//!
//! 只负责"把渲染好的文本写入导出文件"能力，不关心流程

use std::fs::OpenOptions;
use std::io::Write;

use tracing::debug;

use crate::error::{AppError, AppResult};

/// 导出写入服务
///
/// 职责：
/// - 把一段渲染好的文本追加到导出文件
/// - 不负责渲染
/// - 不关心会话状态
pub struct ExportWriter {
    export_file_path: String,
}

impl ExportWriter {
    /// 使用指定文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            export_file_path: path.into(),
        }
    }

    /// 导出文件路径
    pub fn path(&self) -> &str {
        &self.export_file_path
    }

    /// 追加写入一段文本，段落之间以分隔线隔开
    pub fn write(&self, text: &str) -> AppResult<()> {
        debug!(
            "写入导出文件: {} | 文本长度: {}",
            self.export_file_path,
            text.len()
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.export_file_path)
            .map_err(|e| AppError::file_write_failed(&self.export_file_path, e))?;

        let block = format!(
            "{}\n导出时间: {}\n{}\n\n{}\n",
            "=".repeat(60),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            "=".repeat(60),
            text
        );

        file.write_all(block.as_bytes())
            .map_err(|e| AppError::file_write_failed(&self.export_file_path, e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_appends_blocks() {
        let path = std::env::temp_dir().join("ca_rewriter_export_test.txt");
        let path_str = path.to_string_lossy().to_string();
        let _ = std::fs::remove_file(&path);

        let writer = ExportWriter::with_path(&path_str);
        writer.write("first block").expect("写入失败");
        writer.write("second block").expect("写入失败");

        let content = std::fs::read_to_string(&path).expect("读取失败");
        assert!(content.contains("first block"));
        assert!(content.contains("second block"));

        let _ = std::fs::remove_file(&path);
    }
}
