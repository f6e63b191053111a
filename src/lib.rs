//! # DRAGUN Submission
//!
//! 为 TREC DRAGUN 评测生成提交文件：
//! - task 1：每篇文章生成的澄清问题（制表符分隔）
//! - task 2：每篇文章生成的报告句子及引用（每行一个 JSON），
//!   超过字数上限时通过 LLM 反复缩写
//!
//! ## 架构设计
//!
//! ### ① 数据层（Models）
//! - `models/` - 输入记录、提交记录以及加载器
//!
//! ### ② 业务能力层（Services）
//! - `LlmService` - 结构化输出的 LLM 调用能力
//! - `LlmReportShortener` - 把一组句子缩短一次
//! - `SubmissionWriter` - 写两个提交文件
//!
//! ### ③ 流程层（Workflow）
//! - `ArticleCtx` - 上下文封装（文章 ID + 序号）
//! - `ShorteningLoop` - 有上限次数的缩写循环
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 整次运行：加载、逐篇处理、写出、统计
//! - `orchestrator/article_processor` - 单篇文章：问题 + 报告
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, ShorteningPolicy, SubmissionIdentity};
pub use error::{AppError, AppResult};
pub use models::{ArticleRecord, SubmissionInput};
pub use orchestrator::{process_article, run_submission, App, RunSummary};
pub use services::{LlmReportShortener, ReportShortener};
pub use workflow::{ArticleCtx, ShorteningLoop, ShorteningOutcome};
