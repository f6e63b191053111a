//! 报告缩写服务 - 业务能力层
//!
//! 只负责"把一组句子缩短一次"，不检查句子数和字数，这些由缩写循环负责

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::future::Future;
use tracing::debug;

use crate::config::{Config, ShorteningPolicy};
use crate::error::{AppResult, FileError};
use crate::services::llm_service::{LlmService, StructuredOutput};

/// 缩写能力
///
/// 输入当前句子和当前词数，返回改写后的句子
pub trait ReportShortener {
    fn shorten(
        &self,
        sentences: &[String],
        word_count: usize,
    ) -> impl Future<Output = AppResult<Vec<String>>> + Send;
}

/// 模型返回的结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShortenedSentences {
    pub sentences: Vec<String>,
}

impl ShortenedSentences {
    pub fn output_schema() -> StructuredOutput {
        StructuredOutput {
            name: "Sentences".to_string(),
            schema: json!({
                "type": "object",
                "properties": {
                    "sentences": {
                        "type": "array",
                        "items": {"type": "string"}
                    }
                },
                "required": ["sentences"],
                "additionalProperties": false
            }),
        }
    }
}

/// 本次至少需要删掉的词数：`max(当前词数 - 目标词数, 最少删除词数)`
pub fn words_to_remove(word_count: usize, target_words: usize, min_words_to_remove: usize) -> usize {
    word_count
        .saturating_sub(target_words)
        .max(min_words_to_remove)
}

/// 基于 LLM 的报告缩写
pub struct LlmReportShortener {
    llm: LlmService,
    word_limit: usize,
    target_words: usize,
    min_words_to_remove: usize,
}

impl LlmReportShortener {
    pub fn new(config: &Config) -> Self {
        Self::with_service(LlmService::new(config), config.shortening_policy())
    }

    pub fn with_service(llm: LlmService, policy: ShorteningPolicy) -> Self {
        Self {
            llm,
            word_limit: policy.word_limit,
            target_words: policy.target_words,
            min_words_to_remove: policy.min_words_to_remove,
        }
    }

    /// 构建系统消息
    fn build_system_message(&self, word_count: usize) -> String {
        build_system_message(
            word_count,
            self.word_limit,
            self.target_words,
            words_to_remove(word_count, self.target_words, self.min_words_to_remove),
        )
    }
}

impl ReportShortener for LlmReportShortener {
    async fn shorten(&self, sentences: &[String], word_count: usize) -> AppResult<Vec<String>> {
        let system_message = self.build_system_message(word_count);
        let user_message = build_user_message(sentences)?;

        debug!(
            "请求缩写: {} 句, {} 词, 模型 {}",
            sentences.len(),
            word_count,
            self.llm.model_name()
        );

        let response: ShortenedSentences = self
            .llm
            .send_structured(
                &system_message,
                &user_message,
                &ShortenedSentences::output_schema(),
            )
            .await?;

        Ok(response.sentences)
    }
}

pub(crate) fn build_system_message(
    word_count: usize,
    word_limit: usize,
    target_words: usize,
    words_to_remove: usize,
) -> String {
    format!(
        r#"You are a professional fact-checker who has written a report comprising sentences that provide background and context to help readers assess the trustworthiness of a news article. The report exceeds the {word_limit}-word limit and must be shortened. The number of words are counted by splitting the sentence by white space characters. The current report has {word_count} words. You MUST remove at least {words_to_remove} words to get the report down to approximately {target_words} words.

Your task is to aggressively condense the report while:
- Preserving the core meaning and factual accuracy
- Maintaining the same number of sentences
- Ensuring each sentence remains coherent and informative
- Removing all unnecessary words, redundant phrases, and verbose expressions

Be decisive in your editing: remove filler words, simplify complex phrases, use shorter synonyms, and eliminate redundancy. Your goal is to achieve the target word reduction in one pass."#
    )
}

/// 句子列表以 4 空格缩进的 JSON 数组附在提示后面
pub(crate) fn build_user_message(sentences: &[String]) -> AppResult<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    sentences
        .serialize(&mut ser)
        .map_err(|source| FileError::SerializeFailed { source })?;

    let list = String::from_utf8_lossy(&buf);
    Ok(format!("The report is shown below. \n{}", list))
}
