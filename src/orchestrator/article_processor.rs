//! 单篇文章处理器 - 编排层
//!
//! ## 职责
//!
//! - 把文章的问题整理成 task 1 行
//! - 交给缩写循环处理报告
//! - 把缩写结果和原始引用拼成 task 2 记录
//!
//! 缩写后的句子只替换文本，引用始终来自原始记录

use tracing::info;

use crate::config::SubmissionIdentity;
use crate::error::AppResult;
use crate::models::{
    ArticleRecord, ReportResponse, Task1Line, Task2Metadata, Task2Record, RUN_TYPE_AUTOMATIC,
};
use crate::services::ReportShortener;
use crate::workflow::{ArticleCtx, ShorteningLoop, ShorteningOutcome};

/// 单篇文章的处理结果
#[derive(Debug, Clone)]
pub struct ArticleSubmission {
    pub task1_lines: Vec<Task1Line>,
    pub task2_record: Task2Record,
    pub outcome: ShorteningOutcome,
}

/// 处理单篇文章
pub async fn process_article<S: ReportShortener>(
    ctx: &ArticleCtx,
    record: &ArticleRecord,
    shortening: &ShorteningLoop<'_, S>,
    identity: &SubmissionIdentity,
) -> AppResult<ArticleSubmission> {
    let task1_lines = build_task1_lines(record, identity);
    info!("{} {} 个问题", ctx, task1_lines.len());

    let outcome = shortening.run(ctx, &record.sentence_texts()).await?;
    let task2_record = build_task2_record(record, &outcome.sentences, identity);

    Ok(ArticleSubmission {
        task1_lines,
        task2_record,
        outcome,
    })
}

pub fn build_task1_lines(record: &ArticleRecord, identity: &SubmissionIdentity) -> Vec<Task1Line> {
    let run_id = identity.task1_run_id();
    record
        .questions
        .iter()
        .enumerate()
        .map(|(i, question)| Task1Line {
            article_id: record.article_id.clone(),
            team_id: identity.team_id.clone(),
            run_id: run_id.clone(),
            question_index: i + 1,
            question: question.clone(),
        })
        .collect()
}

/// `texts` 与 `record.report_sentences` 按位置一一对应
pub fn build_task2_record(
    record: &ArticleRecord,
    texts: &[String],
    identity: &SubmissionIdentity,
) -> Task2Record {
    let responses = record
        .report_sentences
        .iter()
        .zip(texts)
        .map(|(original, text)| ReportResponse {
            text: text.clone(),
            citations: original.citations.clone(),
        })
        .collect();

    Task2Record {
        metadata: Task2Metadata {
            team_id: identity.team_id.clone(),
            run_id: identity.task2_run_id(),
            topic_id: record.article_id.clone(),
            run_type: RUN_TYPE_AUTOMATIC.to_string(),
            use_starter_kit: 1,
        },
        responses,
    }
}
