//! 文章处理上下文
//!
//! 封装"我正在处理第几篇文章、它的 ID 是什么"这一信息

use std::fmt::Display;

/// 文章处理上下文
#[derive(Debug, Clone)]
pub struct ArticleCtx {
    /// 文章 ID（主题文件中的 docid）
    pub article_id: String,

    /// 在主题列表中的位置（从1开始，仅用于日志显示）
    pub article_index: usize,

    /// 本次运行的文章总数
    pub total: usize,
}

impl ArticleCtx {
    pub fn new(article_id: impl Into<String>, article_index: usize, total: usize) -> Self {
        Self {
            article_id: article_id.into(),
            article_index,
            total,
        }
    }
}

impl Display for ArticleCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[文章 {}/{} {}]", self.article_index, self.total, self.article_id)
    }
}
