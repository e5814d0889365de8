//! 失败记录服务 - 业务能力层
//!
//! 只负责把失败的远程修改追加写入失败记录文件，不关心流程

use crate::error::{AppResult, FileError};
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

/// 失败记录服务
///
/// 职责：
/// - 将失败的复制/删除/保存写入失败记录文件
/// - 每条失败一行，带时间戳，便于用户事后核对和重试
pub struct FailureLog {
    path: String,
}

impl FailureLog {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// 写入会话头（覆盖已有内容）
    pub fn init(&self) -> AppResult<()> {
        let header = format!(
            "{}\n题目管理失败记录 - {}\n{}\n\n",
            "=".repeat(60),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            "=".repeat(60)
        );
        std::fs::write(&self.path, header).map_err(|source| FileError::WriteFailed {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }

    /// 追加一条失败记录
    ///
    /// # 参数
    /// - `action`: 操作名称（复制 / 删除 / 保存）
    /// - `id`: 题目 id
    /// - `reason`: 失败原因
    pub fn record(&self, action: &str, id: &str, reason: &str) -> AppResult<()> {
        debug!("写入失败记录: {} | 题目 {} | {}", action, id, reason);

        let line = format!(
            "[{}] {} | 题目 {} | 原因: {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            action,
            id,
            reason
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| FileError::WriteFailed {
                path: self.path.clone(),
                source,
            })?;

        file.write_all(line.as_bytes())
            .map_err(|source| FileError::WriteFailed {
                path: self.path.clone(),
                source,
            })?;

        Ok(())
    }
}
