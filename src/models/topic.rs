use serde::Deserialize;

/// 主题文件中的一行，只关心 docid
#[derive(Debug, Clone, Deserialize)]
pub struct Topic {
    pub docid: String,
}
