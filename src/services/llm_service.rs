//! LLM 服务 - 业务能力层
//!
//! 只负责"发请求、拿结构化结果"能力，不关心报告内容
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持 OpenAI 兼容端点和 Azure OpenAI
//! - 通过 JSON Schema 约束返回格式，并在本地严格解析

use async_openai::{
    config::{AzureConfig, OpenAIConfig},
    error::{ApiError, OpenAIError},
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse, ResponseFormat,
        ResponseFormatJsonSchema,
    },
    Client,
};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::{Config, LlmProvider};
use crate::error::{AppResult, LlmError};

/// 不同服务商的客户端
enum LlmBackend {
    OpenAi(Client<OpenAIConfig>),
    Azure(Client<AzureConfig>),
}

/// 结构化输出的 schema 描述
#[derive(Debug, Clone)]
pub struct StructuredOutput {
    pub name: String,
    pub schema: JsonValue,
}

/// LLM 服务
///
/// 职责：
/// - 以确定性参数（temperature 0，无惩罚项）调用模型
/// - 网络/API 错误时有限次重试
/// - 把返回内容严格解析为调用方给定的类型
pub struct LlmService {
    backend: LlmBackend,
    model_name: String,
    max_retries: usize,
    retry_delay: Duration,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        let backend = match config.llm_provider {
            LlmProvider::OpenAi => {
                let openai_config = OpenAIConfig::new()
                    .with_api_key(&config.llm_api_key)
                    .with_api_base(&config.llm_api_base_url);
                LlmBackend::OpenAi(Client::with_config(openai_config))
            }
            LlmProvider::Azure => {
                // Azure 上部署名即模型名
                let azure_config = AzureConfig::new()
                    .with_api_base(&config.llm_api_base_url)
                    .with_api_key(&config.llm_api_key)
                    .with_api_version(&config.llm_api_version)
                    .with_deployment_id(&config.llm_model_name);
                LlmBackend::Azure(Client::with_config(azure_config))
            }
        };

        Self {
            backend,
            model_name: config.llm_model_name.clone(),
            max_retries: config.llm_max_retries,
            retry_delay: Duration::from_millis(config.llm_retry_delay_ms),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 发送请求并把结果解析为 `T`
    ///
    /// # 参数
    /// - `system_message`: 系统消息
    /// - `user_message`: 用户消息
    /// - `output`: 返回内容需要满足的 JSON Schema
    ///
    /// # 返回
    /// 解析成功的结构化结果；格式不符直接报错，不重试
    pub async fn send_structured<T: DeserializeOwned>(
        &self,
        system_message: &str,
        user_message: &str,
        output: &StructuredOutput,
    ) -> AppResult<T> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let request = self.build_request(system_message, user_message, output)?;
        let response = self.create_with_retry(request).await?;
        let content = self.extract_content(response)?;

        decode_structured(&self.model_name, &content)
    }

    /// 构建确定性的结构化输出请求
    fn build_request(
        &self,
        system_message: &str,
        user_message: &str,
        output: &StructuredOutput,
    ) -> Result<CreateChatCompletionRequest, LlmError> {
        let build_err = |source: OpenAIError| LlmError::RequestBuildFailed { source };

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(system_message)
            .build()
            .map_err(build_err)?;
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(build_err)?;

        let messages = vec![
            ChatCompletionRequestMessage::System(system_msg),
            ChatCompletionRequestMessage::User(user_msg),
        ];

        CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.0_f32)
            .presence_penalty(0.0_f32)
            .frequency_penalty(0.0_f32)
            .response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: None,
                    name: output.name.clone(),
                    schema: Some(output.schema.clone()),
                    strict: Some(true),
                },
            })
            .build()
            .map_err(build_err)
    }

    /// 调用 API，网络或服务端错误时按指数退避重试
    async fn create_with_retry(
        &self,
        request: CreateChatCompletionRequest,
    ) -> Result<CreateChatCompletionResponse, LlmError> {
        let total_attempts = self.max_retries + 1;
        let mut delay = self.retry_delay;
        let mut attempt = 1;

        loop {
            let result = match &self.backend {
                LlmBackend::OpenAi(client) => client.chat().create(request.clone()).await,
                LlmBackend::Azure(client) => client.chat().create(request.clone()).await,
            };

            match result {
                Ok(response) => {
                    debug!("LLM API 调用成功 (第 {} 次)", attempt);
                    return Ok(response);
                }
                Err(e) if is_transient(&e) && attempt < total_attempts => {
                    warn!(
                        "LLM API 调用失败 (尝试 {}/{}): {}，{} 毫秒后重试...",
                        attempt,
                        total_attempts,
                        e,
                        delay.as_millis()
                    );
                    sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(source) => {
                    warn!("LLM API 调用失败: {}", source);
                    return Err(LlmError::ApiCallFailed {
                        model: self.model_name.clone(),
                        attempts: attempt,
                        source,
                    });
                }
            }
        }
    }

    /// 取出第一条回复的文本
    fn extract_content(&self, response: CreateChatCompletionResponse) -> Result<String, LlmError> {
        let message = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| LlmError::EmptyResponse {
                model: self.model_name.clone(),
            })?;

        if let Some(reason) = message.refusal {
            return Err(LlmError::Refused {
                model: self.model_name.clone(),
                reason,
            });
        }

        message
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| LlmError::EmptyResponse {
                model: self.model_name.clone(),
            })
    }
}

/// 网络错误总是重试；API 错误只重试限流和服务端故障
fn is_transient(err: &OpenAIError) -> bool {
    match err {
        OpenAIError::Reqwest(_) => true,
        OpenAIError::ApiError(api) => is_transient_api_error(api),
        _ => false,
    }
}

/// 限流、服务端错误和 429/5xx 状态码算临时错误，其余 4xx 不算
fn is_transient_api_error(err: &ApiError) -> bool {
    const TRANSIENT: [&str; 4] = [
        "rate_limit_exceeded",
        "rate_limit_error",
        "server_error",
        "internal_server_error",
    ];

    [err.code.as_deref(), err.r#type.as_deref()]
        .into_iter()
        .flatten()
        .any(|tag| {
            TRANSIENT.contains(&tag)
                || tag
                    .parse::<u16>()
                    .is_ok_and(|status| status == 429 || status >= 500)
        })
}

/// 把模型返回的文本严格解析为 `T`
pub fn decode_structured<T: DeserializeOwned>(model: &str, content: &str) -> AppResult<T> {
    serde_json::from_str(content.trim()).map_err(|source| {
        LlmError::MalformedResponse {
            model: model.to_string(),
            content: crate::utils::truncate_text(content, 200),
            source,
        }
        .into()
    })
}
