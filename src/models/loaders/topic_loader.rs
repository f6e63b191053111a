use crate::error::{AppError, AppResult, InputError};
use crate::models::topic::Topic;
use std::collections::HashSet;
use std::path::Path;
use tokio::fs;
use tracing::warn;

/// 读取主题文件，按出现顺序返回文章 ID
///
/// 空白行跳过；重复的 ID 保留（会被再处理一次），只打警告
pub async fn load_topic_ids(topics_path: &Path) -> AppResult<Vec<String>> {
    let content = fs::read_to_string(topics_path)
        .await
        .map_err(|e| AppError::input_read_failed(topics_path.display().to_string(), e))?;

    parse_topic_ids(&content, &topics_path.display().to_string())
}

pub(crate) fn parse_topic_ids(content: &str, source_name: &str) -> AppResult<Vec<String>> {
    let mut ids = Vec::new();
    let mut seen = HashSet::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let topic: Topic = serde_json::from_str(line).map_err(|source| InputError::TopicParseFailed {
            path: source_name.to_string(),
            line: line_no + 1,
            source,
        })?;

        if !seen.insert(topic.docid.clone()) {
            warn!("主题文件中 {} 重复出现 (第 {} 行)", topic.docid, line_no + 1);
        }
        ids.push(topic.docid);
    }

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_file_order() {
        let content = r#"{"docid": "b", "title": "B"}
{"docid": "a"}
{"docid": "c", "url": "https://example.com"}
"#;
        let ids = parse_topic_ids(content, "topics.jsonl").unwrap();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_skips_blank_lines_and_keeps_duplicates() {
        let content = "{\"docid\": \"a\"}\n\n   \n{\"docid\": \"a\"}\n";
        let ids = parse_topic_ids(content, "topics.jsonl").unwrap();
        assert_eq!(ids, vec!["a", "a"]);
    }

    #[test]
    fn test_reports_line_number_of_bad_line() {
        let content = "{\"docid\": \"a\"}\n{\"title\": \"no docid\"}\n";
        let err = parse_topic_ids(content, "topics.jsonl").unwrap_err();
        match err {
            AppError::Input(InputError::TopicParseFailed { path, line, .. }) => {
                assert_eq!(path, "topics.jsonl");
                assert_eq!(line, 2);
            }
            other => panic!("意外的错误: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_input_error() {
        let err = load_topic_ids(Path::new("/nonexistent/topics.jsonl"))
            .await
            .unwrap_err();
        assert!(err.is_input_error());
    }
}
