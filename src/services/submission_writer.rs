//! 提交文件写入服务 - 业务能力层
//!
//! 只负责把整理好的记录写成两个提交文件

use crate::config::SubmissionIdentity;
use crate::error::{AppError, AppResult, FileError};
use crate::models::{Task1Line, Task2Record};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// 提交文件写入服务
pub struct SubmissionWriter {
    output_dir: PathBuf,
    identity: SubmissionIdentity,
}

impl SubmissionWriter {
    pub fn new(output_dir: impl Into<PathBuf>, identity: SubmissionIdentity) -> Self {
        Self {
            output_dir: output_dir.into(),
            identity,
        }
    }

    pub fn task1_path(&self) -> PathBuf {
        self.output_dir.join(self.identity.task1_run_id())
    }

    pub fn task2_path(&self) -> PathBuf {
        self.output_dir.join(self.identity.task2_run_id())
    }

    /// 写入两个提交文件，返回 (task1 路径, task2 路径)
    pub async fn write_all(
        &self,
        task1_lines: &[Task1Line],
        task2_records: &[Task2Record],
    ) -> AppResult<(PathBuf, PathBuf)> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| FileError::CreateDirFailed {
                path: self.output_dir.display().to_string(),
                source,
            })?;

        let task1_path = self.task1_path();
        write_file(&task1_path, &render_task1(task1_lines)).await?;
        info!("✓ task 1 已写入 {} ({} 行)", task1_path.display(), task1_lines.len());

        let task2_path = self.task2_path();
        write_file(&task2_path, &render_task2(task2_records)?).await?;
        info!("✓ task 2 已写入 {} ({} 篇)", task2_path.display(), task2_records.len());

        Ok((task1_path, task2_path))
    }
}

/// task 1：每行一个问题，整体去掉首尾空白，末尾没有换行
pub fn render_task1(lines: &[Task1Line]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.to_tsv());
        out.push('\n');
    }
    out.trim().to_string()
}

/// task 2：每篇文章一行 JSON，每行以换行结尾
pub fn render_task2(records: &[Task2Record]) -> AppResult<String> {
    let mut out = String::new();
    for record in records {
        let line =
            serde_json::to_string(record).map_err(|source| FileError::SerializeFailed { source })?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

async fn write_file(path: &Path, content: &str) -> AppResult<()> {
    debug!("写入 {} ({} 字节)", path.display(), content.len());
    fs::write(path, content)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))
}
