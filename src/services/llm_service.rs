//! LLM 服务 - 业务能力层
//!
//! 只负责"发送一次结构化请求"能力，不关心提示词内容和流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（默认指向 Gemini 的兼容端点）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
        ResponseFormatJsonSchema,
    },
    Client,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, ConfigError};

/// LLM 服务
///
/// 职责：
/// - 发送单条消息并要求返回符合指定 JSON schema 的内容
/// - 提取并清理响应文本
/// - 不构造提示词
/// - 不解析业务 JSON
/// - 不关心流程顺序
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    ///
    /// 密钥缺失时立即报错，不发起任何网络调用
    pub fn new(config: &Config) -> AppResult<Self> {
        if config.llm_api_key.trim().is_empty() {
            return Err(AppError::Config(ConfigError::MissingApiKey));
        }

        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Ok(Self {
            client,
            model_name: config.llm_model_name.clone(),
        })
    }

    /// 模型名称（用于日志和错误信息）
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 发送一次结构化请求
    ///
    /// 要求服务端返回符合 `schema` 的 JSON 文本。不同操作使用不同的
    /// 采样温度：改写和批量出题用低温度求稳定，单题重生成用高温度求多样。
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容（新闻原文或重组后的源文本）
    /// - `system_instruction`: 系统指令
    /// - `schema_name`: schema 名称（服务端要求的标识）
    /// - `schema`: 期望的输出 JSON schema
    /// - `temperature`: 采样温度
    ///
    /// # 返回
    /// 返回响应文本（已去除首尾空白）
    pub async fn send_structured(
        &self,
        user_message: &str,
        system_instruction: &str,
        schema_name: &str,
        schema: serde_json::Value,
        temperature: f32,
    ) -> AppResult<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!(
            "用户消息长度: {} 字符，schema: {}，温度: {}",
            user_message.len(),
            schema_name,
            temperature
        );

        // 构建消息列表
        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(system_instruction)
            .build()
            .map_err(|e| AppError::Other(e.to_string()))?;

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(|e| AppError::Other(e.to_string()))?;

        let messages = vec![
            ChatCompletionRequestMessage::System(system_msg),
            ChatCompletionRequestMessage::User(user_msg),
        ];

        // 构建请求，要求 JSON 输出符合 schema
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(temperature)
            .max_tokens(8192u32)
            .response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: None,
                    name: schema_name.to_string(),
                    schema: Some(schema),
                    strict: Some(true),
                },
            })
            .build()
            .map_err(|e| AppError::Other(e.to_string()))?;

        // 调用 API
        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm_service_call(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        // 提取响应内容
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| AppError::llm_empty_response(&self.model_name))?;

        Ok(content.trim().to_string())
    }
}
