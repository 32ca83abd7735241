use crate::error::{AppError, AppResult};
use serde::Deserialize;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM 配置 ---
    /// API 密钥（无默认值，缺失时在创建客户端前报错）
    pub llm_api_key: String,
    /// API 基础 URL（默认为 Gemini 的 OpenAI 兼容端点）
    pub llm_api_base_url: String,
    /// 模型名称
    pub llm_model_name: String,
    // --- 出题配置 ---
    /// 默认生成的题目数量
    pub default_mcq_count: usize,
    /// 单次最多生成的题目数量
    pub max_mcq_count: usize,
    // --- 输出配置 ---
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 导出文件路径
    pub export_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai"
                .to_string(),
            llm_model_name: "gemini-2.5-flash".to_string(),
            default_mcq_count: 5,
            max_mcq_count: 20,
            verbose_logging: false,
            export_file: "analysis_export.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            default_mcq_count: std::env::var("DEFAULT_MCQ_COUNT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.default_mcq_count),
            max_mcq_count: std::env::var("MAX_MCQ_COUNT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_mcq_count),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            export_file: std::env::var("EXPORT_FILE").unwrap_or(default.export_file),
        }
    }

    /// 从 TOML 文件加载配置，缺失字段取默认值
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path, e))?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 加载配置：CONFIG_FILE 指定了配置文件时优先使用，否则读环境变量
    pub fn load() -> AppResult<Self> {
        match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::from_file(&path),
            Err(_) => Ok(Self::from_env()),
        }
    }
}
