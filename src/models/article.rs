//! 文章数据模型
//!
//! tracking 数据里的题目和报告句子以 `question_1`、`sentence_1` 这样的编号键存放，
//! 这里把它们还原成有序列表

use crate::error::InputError;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// tracking 数据中的单篇文章（原始结构）
#[derive(Debug, Clone, Deserialize)]
pub struct TrackingRecord {
    pub question_generation: HashMap<String, QuestionEntry>,
    pub report_generation: HashMap<String, SentenceEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionEntry {
    pub question: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentenceEntry {
    pub sentence: String,
    /// 引用列表，原样写入输出
    pub citations: JsonValue,
}

/// 报告中的一句话及其引用
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSentence {
    pub text: String,
    pub citations: JsonValue,
}

/// 整理后的文章记录
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRecord {
    pub article_id: String,
    /// 按编号排列的问题（第 0 个对应 question_1）
    pub questions: Vec<String>,
    /// 按编号排列的报告句子（第 0 个对应 sentence_1）
    pub report_sentences: Vec<ReportSentence>,
}

impl ArticleRecord {
    /// 从原始 tracking 记录整理出有序的问题和句子
    ///
    /// 编号从 1 连续到条目数，任何一个编号缺失都视为输入错误
    pub fn from_tracking(article_id: &str, record: TrackingRecord) -> Result<Self, InputError> {
        let TrackingRecord {
            question_generation,
            report_generation,
        } = record;

        let questions = take_indexed(article_id, "question_generation", "question", question_generation)?
            .into_iter()
            .map(|entry| entry.question)
            .collect();

        let report_sentences = take_indexed(article_id, "report_generation", "sentence", report_generation)?
            .into_iter()
            .map(|entry| ReportSentence {
                text: entry.sentence,
                citations: entry.citations,
            })
            .collect();

        Ok(Self {
            article_id: article_id.to_string(),
            questions,
            report_sentences,
        })
    }

    /// 报告句子的纯文本
    pub fn sentence_texts(&self) -> Vec<String> {
        self.report_sentences.iter().map(|s| s.text.clone()).collect()
    }
}

fn take_indexed<T>(
    article_id: &str,
    section: &'static str,
    prefix: &str,
    mut entries: HashMap<String, T>,
) -> Result<Vec<T>, InputError> {
    let count = entries.len();
    let mut ordered = Vec::with_capacity(count);

    for i in 1..=count {
        let key = format!("{}_{}", prefix, i);
        let entry = entries
            .remove(&key)
            .ok_or_else(|| InputError::MissingIndexedEntry {
                article_id: article_id.to_string(),
                section,
                key,
            })?;
        ordered.push(entry);
    }

    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: JsonValue) -> TrackingRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_orders_by_numeric_index_not_key_order() {
        let record = parse(json!({
            "question_generation": {
                "question_10": {"question": "q10"},
                "question_2": {"question": "q2"},
                "question_1": {"question": "q1"},
                "question_3": {"question": "q3"},
                "question_4": {"question": "q4"},
                "question_5": {"question": "q5"},
                "question_6": {"question": "q6"},
                "question_7": {"question": "q7"},
                "question_8": {"question": "q8"},
                "question_9": {"question": "q9"}
            },
            "report_generation": {
                "sentence_2": {"sentence": "Second.", "citations": ["b"]},
                "sentence_1": {"sentence": "First.", "citations": ["a"]}
            }
        }));

        let article = ArticleRecord::from_tracking("doc-1", record).unwrap();

        assert_eq!(article.questions.first().map(String::as_str), Some("q1"));
        assert_eq!(article.questions.last().map(String::as_str), Some("q10"));
        assert_eq!(article.sentence_texts(), vec!["First.", "Second."]);
        assert_eq!(article.report_sentences[1].citations, json!(["b"]));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let record = parse(json!({
            "question_generation": {
                "question_1": {"question": "q1", "rationale": "why"}
            },
            "report_generation": {},
            "article": {"title": "ignored"}
        }));

        let article = ArticleRecord::from_tracking("doc-1", record).unwrap();
        assert_eq!(article.questions, vec!["q1"]);
        assert!(article.report_sentences.is_empty());
    }

    #[test]
    fn test_gap_in_numbering_is_an_error() {
        let record = parse(json!({
            "question_generation": {
                "question_1": {"question": "q1"},
                "question_3": {"question": "q3"}
            },
            "report_generation": {}
        }));

        let err = ArticleRecord::from_tracking("doc-7", record).unwrap_err();
        match err {
            InputError::MissingIndexedEntry {
                article_id,
                section,
                key,
            } => {
                assert_eq!(article_id, "doc-7");
                assert_eq!(section, "question_generation");
                assert_eq!(key, "question_2");
            }
            other => panic!("意外的错误: {other}"),
        }
    }

    #[test]
    fn test_citations_keep_object_key_order() {
        let record = parse(json!({
            "question_generation": {},
            "report_generation": {
                "sentence_1": {
                    "sentence": "Only.",
                    "citations": [{"zeta": 1, "alpha": 2}]
                }
            }
        }));

        let article = ArticleRecord::from_tracking("doc-1", record).unwrap();
        let rendered = serde_json::to_string(&article.report_sentences[0].citations).unwrap();
        assert_eq!(rendered, r#"[{"zeta":1,"alpha":2}]"#);
    }
}
