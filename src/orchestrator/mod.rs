//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责整次运行的调度，是整个系统的"指挥中心"。
//!
//! ### `batch_processor` - 批量文章处理器
//! - 管理应用生命周期（初始化、运行）
//! - 加载输入（主题列表 + tracking 数据）
//! - 逐篇处理并写出提交文件
//! - 输出全局统计信息
//!
//! ### `article_processor` - 单篇文章处理器
//! - 生成 task 1 行
//! - 调用缩写循环
//! - 生成 task 2 记录
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<文章>)
//!     ↓
//! article_processor (处理单篇文章)
//!     ↓
//! workflow::ShorteningLoop (处理单篇报告)
//!     ↓
//! services (能力层：shortener / llm / writer)
//! ```

pub mod article_processor;
pub mod batch_processor;

// 重新导出主要类型
pub use article_processor::{process_article, ArticleSubmission};
pub use batch_processor::{run_submission, App, RunSummary};
