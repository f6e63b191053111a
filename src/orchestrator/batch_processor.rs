//! 批量文章处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责运行的生命周期和全局统计。
//!
//! 1. **应用初始化**：记录启动信息、创建 LLM 缩写服务
//! 2. **加载输入**：主题列表 + tracking 数据，任何缺失都在写文件前中止
//! 3. **顺序处理**：逐篇处理文章，每次缩写调用都等待返回后再继续
//! 4. **写出结果**：全部文章处理完后一次性写两个提交文件
//! 5. **全局统计**：汇总问题数、缩写次数、仍超限的报告数

use std::path::Path;

use tracing::info;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{load_inputs, SubmissionInput, Task1Line, Task2Record};
use crate::orchestrator::article_processor::process_article;
use crate::services::{LlmReportShortener, ReportShortener, SubmissionWriter};
use crate::utils::logging;
use crate::workflow::{ArticleCtx, ShorteningLoop};

/// 应用主结构
pub struct App {
    config: Config,
    shortener: LlmReportShortener,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Self {
        logging::log_startup(&config);
        let shortener = LlmReportShortener::new(&config);
        Self { config, shortener }
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> AppResult<RunSummary> {
        run_submission(&self.config, &self.shortener).await
    }
}

/// 一次运行的统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub articles: usize,
    pub questions: usize,
    /// 调用过缩写的报告数
    pub shortened: usize,
    /// 缩写次数用尽后仍超限的报告数
    pub over_budget: usize,
    pub shorten_calls: usize,
}

/// 读取输入、逐篇处理、写出提交文件
pub async fn run_submission<S: ReportShortener>(config: &Config, shortener: &S) -> AppResult<RunSummary> {
    info!("\n📁 正在读取输入...");
    let input = load_inputs(
        Path::new(&config.topics_path),
        Path::new(&config.tracking_data_path),
    )
    .await?;
    logging::log_inputs_loaded(input.article_ids.len(), &config.topics_path);

    let (task1_lines, task2_records, summary) = process_all_articles(config, &input, shortener).await?;

    let writer = SubmissionWriter::new(&config.output_dir, config.identity());
    writer.write_all(&task1_lines, &task2_records).await?;

    logging::print_final_stats(
        summary.articles,
        summary.questions,
        summary.shortened,
        summary.over_budget,
        summary.shorten_calls,
    );

    Ok(summary)
}

/// 按主题顺序处理所有文章
async fn process_all_articles<S: ReportShortener>(
    config: &Config,
    input: &SubmissionInput,
    shortener: &S,
) -> AppResult<(Vec<Task1Line>, Vec<Task2Record>, RunSummary)> {
    let identity = config.identity();
    let shortening = ShorteningLoop::new(shortener, config.shortening_policy());
    let total = input.article_ids.len();

    let mut task1_lines = Vec::new();
    let mut task2_records = Vec::with_capacity(total);
    let mut summary = RunSummary::default();

    for (idx, article_id) in input.article_ids.iter().enumerate() {
        let ctx = ArticleCtx::new(article_id.as_str(), idx + 1, total);
        logging::log_article_start(ctx.article_index, total, article_id);

        let record = input.record(article_id)?;
        let submission = process_article(&ctx, record, &shortening, &identity).await?;

        summary.articles += 1;
        summary.questions += submission.task1_lines.len();
        summary.shorten_calls += submission.outcome.attempts;
        if submission.outcome.was_shortened() {
            summary.shortened += 1;
        }
        if !submission.outcome.within_budget {
            summary.over_budget += 1;
        }

        task1_lines.extend(submission.task1_lines);
        task2_records.push(submission.task2_record);
    }

    Ok((task1_lines, task2_records, summary))
}
