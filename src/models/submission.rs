//! 提交文件的数据结构

use serde::Serialize;
use serde_json::Value as JsonValue;

/// task 2 中固定的类型标签
pub const RUN_TYPE_AUTOMATIC: &str = "automatic";

/// task 1 的一行：文章 ID、队伍 ID、run label、问题编号、问题文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task1Line {
    pub article_id: String,
    pub team_id: String,
    pub run_id: String,
    /// 从 1 开始
    pub question_index: usize,
    pub question: String,
}

impl Task1Line {
    /// 以制表符拼接各列
    pub fn to_tsv(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}",
            self.article_id, self.team_id, self.run_id, self.question_index, self.question
        )
    }
}

/// task 2 的一条记录（每篇文章一行 JSON）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task2Record {
    pub metadata: Task2Metadata,
    pub responses: Vec<ReportResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task2Metadata {
    pub team_id: String,
    pub run_id: String,
    pub topic_id: String,
    #[serde(rename = "type")]
    pub run_type: String,
    pub use_starter_kit: u8,
}

/// 报告中的一句话
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportResponse {
    pub text: String,
    pub citations: JsonValue,
}
