//! 报告缩写循环 - 流程层
//!
//! 核心职责：决定一篇报告要不要缩写、缩写几次、何时停下
//!
//! 流程：
//! 1. 原报告词数不超过上限 → 原样使用，不调用模型
//! 2. 否则最多调用 `max_attempts` 次缩写，每次调用前先看是否已达标
//! 3. 循环结束后句子数必须和原报告一致，否则整个运行中止
//!
//! 次数用尽仍超出上限不算错误，只记警告

use tracing::info;

use crate::config::ShorteningPolicy;
use crate::error::{AppResult, ShorteningError};
use crate::services::ReportShortener;
use crate::utils::logging::log_over_budget;
use crate::utils::word_count_of;
use crate::workflow::article_ctx::ArticleCtx;

/// 一篇报告的缩写结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShorteningOutcome {
    /// 最终句子，与原报告一一对应
    pub sentences: Vec<String>,
    pub original_word_count: usize,
    pub final_word_count: usize,
    /// 实际调用缩写的次数
    pub attempts: usize,
    /// 最终词数是否在上限内
    pub within_budget: bool,
}

impl ShorteningOutcome {
    /// 是否经过了改写
    pub fn was_shortened(&self) -> bool {
        self.attempts > 0
    }
}

/// 报告缩写循环
///
/// - 不持有报告数据，只依赖缩写能力和参数
/// - 每篇文章调用一次 `run`，文章之间没有共享状态
pub struct ShorteningLoop<'a, S: ReportShortener> {
    shortener: &'a S,
    policy: ShorteningPolicy,
}

impl<'a, S: ReportShortener> ShorteningLoop<'a, S> {
    pub fn new(shortener: &'a S, policy: ShorteningPolicy) -> Self {
        Self { shortener, policy }
    }

    pub fn policy(&self) -> &ShorteningPolicy {
        &self.policy
    }

    pub async fn run(&self, ctx: &ArticleCtx, original: &[String]) -> AppResult<ShorteningOutcome> {
        let original_word_count = word_count_of(original);
        let limit = self.policy.word_limit;

        if original_word_count <= limit {
            return Ok(ShorteningOutcome {
                sentences: original.to_vec(),
                original_word_count,
                final_word_count: original_word_count,
                attempts: 0,
                within_budget: true,
            });
        }

        info!("{} 报告共 {} 词，超过上限 {}", ctx, original_word_count, limit);

        let mut sentences = original.to_vec();
        let mut word_count = original_word_count;
        let mut attempts = 0;

        for i in 0..self.policy.max_attempts {
            if word_count <= limit {
                break;
            }

            info!("{} 当前 {} 词，第 {} 次缩写...", ctx, word_count, i + 1);
            sentences = self.shortener.shorten(&sentences, word_count).await?;
            word_count = word_count_of(&sentences);
            attempts += 1;
        }

        if sentences.len() != original.len() {
            return Err(ShorteningError::SentenceCountMismatch {
                article_id: ctx.article_id.clone(),
                expected: original.len(),
                actual: sentences.len(),
            }
            .into());
        }

        info!("{} 缩写后共 {} 词", ctx, word_count);

        let within_budget = word_count <= limit;
        if !within_budget {
            log_over_budget(&ctx.article_id, word_count, limit);
        }

        Ok(ShorteningOutcome {
            sentences,
            original_word_count,
            final_word_count: word_count,
            attempts,
            within_budget,
        })
    }
}
