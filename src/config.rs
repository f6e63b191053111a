use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// 默认配置文件路径（可通过 SUBMISSION_CONFIG 覆盖）
pub const DEFAULT_CONFIG_FILE: &str = "submission.toml";

/// LLM 服务提供方
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI 或兼容 OpenAI API 的服务
    #[default]
    OpenAi,
    /// Azure OpenAI，部署名即模型名
    Azure,
}

impl FromStr for LlmProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "azure" => Ok(LlmProvider::Azure),
            _ => Err(()),
        }
    }
}

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 主题文件（JSONL，每行包含 docid）
    pub topics_path: String,
    /// 上游生成的 tracking 数据
    pub tracking_data_path: String,
    /// 输出目录
    pub output_dir: String,
    /// 队伍 ID
    pub team_id: String,
    /// run ID 前缀，输出文件名和 run label 都由它派生
    pub run_id_prefix: String,
    // --- 缩写参数 ---
    pub word_limit: usize,
    pub target_words: usize,
    pub min_words_to_remove: usize,
    pub max_shorten_attempts: usize,
    // --- LLM 配置 ---
    pub llm_provider: LlmProvider,
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    /// 仅 Azure 使用
    pub llm_api_version: String,
    pub llm_model_name: String,
    /// 网络错误、限流或服务端错误时的重试次数（不含第一次调用）
    pub llm_max_retries: usize,
    pub llm_retry_delay_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            topics_path: "./data/trec-2025-dragun-topics.jsonl".to_string(),
            tracking_data_path: "output/tracking_data.json".to_string(),
            output_dir: "output".to_string(),
            team_id: "dragun-organizers".to_string(),
            run_id_prefix: "dragun-organizers-starter-kit".to_string(),
            word_limit: 250,
            target_words: 240,
            min_words_to_remove: 20,
            max_shorten_attempts: 5,
            llm_provider: LlmProvider::OpenAi,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_api_version: "2024-10-21".to_string(),
            llm_model_name: "gpt-4.1".to_string(),
            llm_max_retries: 2,
            llm_retry_delay_ms: 1000,
            verbose_logging: false,
        }
    }
}

/// 缩写循环的参数
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShorteningPolicy {
    /// 字数上限，超过才需要缩写
    pub word_limit: usize,
    /// 每次缩写的目标字数，略低于上限
    pub target_words: usize,
    /// 每次至少要求删掉的字数
    pub min_words_to_remove: usize,
    /// 每篇文章最多调用缩写的次数
    pub max_attempts: usize,
}

impl Default for ShorteningPolicy {
    fn default() -> Self {
        Self {
            word_limit: 250,
            target_words: 240,
            min_words_to_remove: 20,
            max_attempts: 5,
        }
    }
}

/// 写进提交文件的固定身份信息
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionIdentity {
    pub team_id: String,
    pub run_id_prefix: String,
}

impl SubmissionIdentity {
    pub fn new(team_id: impl Into<String>, run_id_prefix: impl Into<String>) -> Self {
        Self {
            team_id: team_id.into(),
            run_id_prefix: run_id_prefix.into(),
        }
    }

    /// task 1 的 run label，同时也是输出文件名
    pub fn task1_run_id(&self) -> String {
        format!("{}-task-1", self.run_id_prefix)
    }

    /// task 2 的 run ID，同时也是输出文件名
    pub fn task2_run_id(&self) -> String {
        format!("{}-task-2", self.run_id_prefix)
    }
}

impl Config {
    /// 按顺序叠加：默认值 → TOML 文件（可选）→ 环境变量
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// 同 `load`，环境变量从 `lookup` 读取
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 显式指定的配置文件必须存在，默认文件可以没有
        let mut config = match lookup("SUBMISSION_CONFIG") {
            Some(path) => Self::from_toml_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_toml_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };

        config.apply_env_with(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// 只用环境变量覆盖默认值
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_with(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件读取，缺省字段使用默认值
    pub fn from_toml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用给定的查找函数覆盖配置项
    ///
    /// 查找函数通常就是 `std::env::var`，测试里可以换成 HashMap
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| keys.iter().find_map(|k| lookup(k));

        if let Some(v) = lookup("TOPICS_PATH") {
            self.topics_path = v;
        }
        if let Some(v) = lookup("TRACKING_DATA_PATH") {
            self.tracking_data_path = v;
        }
        if let Some(v) = lookup("OUTPUT_DIR") {
            self.output_dir = v;
        }
        if let Some(v) = lookup("TEAM_ID") {
            self.team_id = v;
        }
        if let Some(v) = lookup("RUN_ID_PREFIX") {
            self.run_id_prefix = v;
        }

        parse_into(&lookup, "WORD_LIMIT", "usize", &mut self.word_limit)?;
        parse_into(&lookup, "TARGET_WORDS", "usize", &mut self.target_words)?;
        parse_into(&lookup, "MIN_WORDS_TO_REMOVE", "usize", &mut self.min_words_to_remove)?;
        parse_into(&lookup, "MAX_SHORTEN_ATTEMPTS", "usize", &mut self.max_shorten_attempts)?;
        parse_into(&lookup, "LLM_PROVIDER", "openai|azure", &mut self.llm_provider)?;

        if let Some(v) = first(&["LLM_API_KEY", "AZURE_OPENAI_API_KEY", "OPENAI_API_KEY"]) {
            self.llm_api_key = v;
        }
        if let Some(v) = first(&["LLM_API_BASE_URL", "AZURE_OPENAI_ENDPOINT"]) {
            self.llm_api_base_url = v;
        }
        if let Some(v) = first(&["LLM_API_VERSION", "OPENAI_API_VERSION"]) {
            self.llm_api_version = v;
        }
        // 只给了 Azure 端点、没有指定服务商时按 Azure 处理
        if lookup("LLM_PROVIDER").is_none()
            && lookup("LLM_API_BASE_URL").is_none()
            && lookup("AZURE_OPENAI_ENDPOINT").is_some()
        {
            self.llm_provider = LlmProvider::Azure;
        }
        if let Some(v) = lookup("LLM_MODEL_NAME") {
            self.llm_model_name = v;
        }

        parse_into(&lookup, "LLM_MAX_RETRIES", "usize", &mut self.llm_max_retries)?;
        parse_into(&lookup, "LLM_RETRY_DELAY_MS", "u64", &mut self.llm_retry_delay_ms)?;
        parse_into(&lookup, "VERBOSE_LOGGING", "bool", &mut self.verbose_logging)?;

        Ok(())
    }

    /// 检查配置值是否合法
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.team_id.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "team_id",
                reason: "不能为空".to_string(),
            });
        }
        if self.run_id_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "run_id_prefix",
                reason: "不能为空".to_string(),
            });
        }
        if self.word_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "word_limit",
                reason: "必须大于 0".to_string(),
            });
        }
        if self.target_words > self.word_limit {
            return Err(ConfigError::Invalid {
                field: "target_words",
                reason: format!("{} 超过字数上限 {}", self.target_words, self.word_limit),
            });
        }
        Ok(())
    }

    pub fn shortening_policy(&self) -> ShorteningPolicy {
        ShorteningPolicy {
            word_limit: self.word_limit,
            target_words: self.target_words,
            min_words_to_remove: self.min_words_to_remove,
            max_attempts: self.max_shorten_attempts,
        }
    }

    pub fn identity(&self) -> SubmissionIdentity {
        SubmissionIdentity::new(&self.team_id, &self.run_id_prefix)
    }
}

fn parse_into<T, F>(
    lookup: &F,
    var_name: &str,
    expected_type: &'static str,
    slot: &mut T,
) -> Result<(), ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(var_name) {
        *slot = value.trim().parse().map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.clone(),
            expected_type,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_run_constants() {
        let config = Config::default();
        assert_eq!(config.team_id, "dragun-organizers");
        assert_eq!(config.run_id_prefix, "dragun-organizers-starter-kit");
        assert_eq!(config.shortening_policy(), ShorteningPolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_identity_run_ids() {
        let identity = Config::default().identity();
        assert_eq!(identity.task1_run_id(), "dragun-organizers-starter-kit-task-1");
        assert_eq!(identity.task2_run_id(), "dragun-organizers-starter-kit-task-2");
    }

    #[test]
    fn test_toml_overrides_only_given_fields() {
        let config = Config::from_toml_str(
            r#"
team_id = "my-team"
word_limit = 300
llm_provider = "azure"
"#,
        )
        .unwrap();

        assert_eq!(config.team_id, "my-team");
        assert_eq!(config.word_limit, 300);
        assert_eq!(config.llm_provider, LlmProvider::Azure);
        assert_eq!(config.target_words, 240);
        assert_eq!(config.run_id_prefix, "dragun-organizers-starter-kit");
    }

    #[test]
    fn test_env_overrides_and_fallback_keys() {
        let mut config = Config::default();
        config
            .apply_env_with(lookup_from(&[
                ("MAX_SHORTEN_ATTEMPTS", "3"),
                ("AZURE_OPENAI_API_KEY", "azure-key"),
                ("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com"),
                ("OPENAI_API_VERSION", "2025-01-01-preview"),
                ("LLM_PROVIDER", "Azure"),
            ]))
            .unwrap();

        assert_eq!(config.max_shorten_attempts, 3);
        assert_eq!(config.llm_api_key, "azure-key");
        assert_eq!(config.llm_api_base_url, "https://example.openai.azure.com");
        assert_eq!(config.llm_api_version, "2025-01-01-preview");
        assert_eq!(config.llm_provider, LlmProvider::Azure);
    }

    #[test]
    fn test_azure_dotenv_selects_azure() {
        let mut config = Config::default();
        config
            .apply_env_with(lookup_from(&[
                ("AZURE_OPENAI_API_KEY", "azure-key"),
                ("AZURE_OPENAI_ENDPOINT", "https://x.openai.azure.com"),
                ("OPENAI_API_VERSION", "2024-10-21"),
            ]))
            .unwrap();

        assert_eq!(config.llm_provider, LlmProvider::Azure);
        assert_eq!(config.llm_api_base_url, "https://x.openai.azure.com");
        assert_eq!(config.llm_api_key, "azure-key");
        assert_eq!(config.llm_api_version, "2024-10-21");
    }

    #[test]
    fn test_explicit_provider_beats_azure_endpoint() {
        let mut config = Config::default();
        config
            .apply_env_with(lookup_from(&[
                ("LLM_PROVIDER", "openai"),
                ("AZURE_OPENAI_ENDPOINT", "https://x.openai.azure.com"),
            ]))
            .unwrap();
        assert_eq!(config.llm_provider, LlmProvider::OpenAi);
    }

    #[test]
    fn test_generic_base_url_keeps_openai() {
        let mut config = Config::default();
        config
            .apply_env_with(lookup_from(&[
                ("LLM_API_BASE_URL", "http://localhost:8000/v1"),
                ("AZURE_OPENAI_ENDPOINT", "https://x.openai.azure.com"),
            ]))
            .unwrap();
        assert_eq!(config.llm_provider, LlmProvider::OpenAi);
        assert_eq!(config.llm_api_base_url, "http://localhost:8000/v1");
    }

    #[test]
    fn test_load_layers_file_then_env() {
        let dir = std::env::temp_dir().join(format!("dragun-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("submission.toml");
        std::fs::write(
            &path,
            "team_id = \"file-team\"\nrun_id_prefix = \"file-run\"\nword_limit = 300\n",
        )
        .unwrap();
        let path_str = path.display().to_string();

        let config = Config::load_with(lookup_from(&[
            ("SUBMISSION_CONFIG", path_str.as_str()),
            ("TEAM_ID", "env-team"),
        ]))
        .unwrap();

        // 环境变量覆盖文件，文件覆盖默认值
        assert_eq!(config.team_id, "env-team");
        assert_eq!(config.run_id_prefix, "file-run");
        assert_eq!(config.word_limit, 300);
        assert_eq!(config.target_words, 240);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_requires_named_file() {
        let err = Config::load_with(lookup_from(&[(
            "SUBMISSION_CONFIG",
            "/nonexistent/dragun/submission.toml",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::ReadFailed { .. }));
    }

    #[test]
    fn test_primary_key_wins_over_fallback() {
        let mut config = Config::default();
        config
            .apply_env_with(lookup_from(&[
                ("LLM_API_KEY", "primary"),
                ("OPENAI_API_KEY", "fallback"),
            ]))
            .unwrap();
        assert_eq!(config.llm_api_key, "primary");
    }

    #[test]
    fn test_bad_number_is_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_env_with(lookup_from(&[("WORD_LIMIT", "lots")]))
            .unwrap_err();

        match err {
            ConfigError::EnvVarParseFailed { var_name, value, .. } => {
                assert_eq!(var_name, "WORD_LIMIT");
                assert_eq!(value, "lots");
            }
            other => panic!("意外的错误: {other}"),
        }
    }

    #[test]
    fn test_validate_rejects_target_above_limit() {
        let config = Config {
            target_words: 300,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "target_words", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_team() {
        let config = Config {
            team_id: "  ".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
