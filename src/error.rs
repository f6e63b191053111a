use async_openai::error::OpenAIError;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入文件相关错误
    #[error("输入错误: {0}")]
    Input(#[from] InputError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 报告缩写不变量被破坏
    #[error("缩写错误: {0}")]
    Shortening(#[from] ShorteningError),
    /// 输出文件错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 输入文件错误
#[derive(Debug, Error)]
pub enum InputError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 主题文件某一行不是合法 JSON
    #[error("主题文件解析失败 ({path} 第 {line} 行): {source}")]
    TopicParseFailed {
        path: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    /// tracking 数据解析失败
    #[error("tracking 数据解析失败 ({path}): {source}")]
    TrackingParseFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// 主题列表中的文章不在 tracking 数据里
    #[error("tracking 数据中找不到文章: {article_id}")]
    MissingArticle { article_id: String },
    /// 编号条目缺失（如 question_3 不存在）
    #[error("文章 {article_id} 的 {section} 中缺少 {key}")]
    MissingIndexedEntry {
        article_id: String,
        section: &'static str,
        key: String,
    },
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// 构建请求失败
    #[error("构建 LLM 请求失败: {source}")]
    RequestBuildFailed {
        #[source]
        source: OpenAIError,
    },
    /// API 调用失败（已用尽重试次数）
    #[error("LLM API调用失败 (模型: {model}, 共尝试 {attempts} 次): {source}")]
    ApiCallFailed {
        model: String,
        attempts: usize,
        #[source]
        source: OpenAIError,
    },
    /// 返回结果为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyResponse { model: String },
    /// 模型拒绝回答
    #[error("LLM拒绝回答 (模型: {model}): {reason}")]
    Refused { model: String, reason: String },
    /// 返回内容不符合结构化格式
    #[error("LLM返回内容不符合格式 (模型: {model}, 响应: {content}): {source}")]
    MalformedResponse {
        model: String,
        content: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 报告缩写错误
#[derive(Debug, Error)]
pub enum ShorteningError {
    /// 缩写后的句子数与原报告不一致
    #[error("文章 {article_id} 缩写后句子数不一致: 原 {expected} 句, 现 {actual} 句")]
    SentenceCountMismatch {
        article_id: String,
        expected: usize,
        actual: usize,
    },
}

/// 输出文件错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 创建目录失败
    #[error("创建目录失败 ({path}): {source}")]
    CreateDirFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 序列化失败
    #[error("序列化失败: {source}")]
    SerializeFailed {
        #[source]
        source: serde_json::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: &'static str,
    },
    /// 配置值不合法
    #[error("配置项 {field} 不合法: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建输入文件读取错误
    pub fn input_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Input(InputError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建输出文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 是否为输入阶段的错误
    pub fn is_input_error(&self) -> bool {
        matches!(self, AppError::Input(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_mismatch_message() {
        let err: AppError = ShorteningError::SentenceCountMismatch {
            article_id: "doc-1".to_string(),
            expected: 3,
            actual: 2,
        }
        .into();

        let msg = err.to_string();
        assert!(msg.contains("doc-1"));
        assert!(msg.contains("原 3 句"));
        assert!(msg.contains("现 2 句"));
    }

    #[test]
    fn test_source_chain_is_kept() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = AppError::input_read_failed("topics.jsonl", io);

        assert!(err.is_input_error());
        let source = std::error::Error::source(&err).expect("应该有 source");
        assert!(source.to_string().contains("topics.jsonl"));
    }
}
