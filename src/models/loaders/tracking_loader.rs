use crate::error::{AppError, AppResult, InputError};
use crate::models::article::{ArticleRecord, TrackingRecord};
use crate::models::loaders::topic_loader::load_topic_ids;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;
use tracing::info;

/// 本次运行要处理的全部输入
#[derive(Debug, Clone)]
pub struct SubmissionInput {
    /// 处理顺序，也是输出顺序
    pub article_ids: Vec<String>,
    pub records: HashMap<String, ArticleRecord>,
}

impl SubmissionInput {
    pub fn record(&self, article_id: &str) -> AppResult<&ArticleRecord> {
        self.records.get(article_id).ok_or_else(|| {
            InputError::MissingArticle {
                article_id: article_id.to_string(),
            }
            .into()
        })
    }
}

/// 读取 tracking 数据（文章 ID → 原始记录）
pub async fn load_tracking_data(tracking_path: &Path) -> AppResult<HashMap<String, TrackingRecord>> {
    let content = fs::read_to_string(tracking_path)
        .await
        .map_err(|e| AppError::input_read_failed(tracking_path.display().to_string(), e))?;

    let data = serde_json::from_str(&content).map_err(|source| InputError::TrackingParseFailed {
        path: tracking_path.display().to_string(),
        source,
    })?;

    Ok(data)
}

/// 读取主题列表和 tracking 数据，只保留主题列表中的文章
///
/// 主题列表里有但 tracking 数据里没有的文章直接报错
pub async fn load_inputs(topics_path: &Path, tracking_path: &Path) -> AppResult<SubmissionInput> {
    let article_ids = load_topic_ids(topics_path).await?;
    let tracking = load_tracking_data(tracking_path).await?;

    info!(
        "tracking 数据包含 {} 篇文章，主题列表 {} 篇",
        tracking.len(),
        article_ids.len()
    );

    build_input(article_ids, tracking)
}

pub(crate) fn build_input(
    article_ids: Vec<String>,
    mut tracking: HashMap<String, TrackingRecord>,
) -> AppResult<SubmissionInput> {
    let mut records = HashMap::with_capacity(article_ids.len());

    for article_id in &article_ids {
        if records.contains_key(article_id) {
            continue;
        }
        let raw = tracking
            .remove(article_id)
            .ok_or_else(|| InputError::MissingArticle {
                article_id: article_id.clone(),
            })?;
        records.insert(article_id.clone(), ArticleRecord::from_tracking(article_id, raw)?);
    }

    Ok(SubmissionInput {
        article_ids,
        records,
    })
}
