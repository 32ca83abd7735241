//! 内容生成服务 - 业务能力层
//!
//! 负责三种生成操作：全量分析、批量出题、单题重生成。
//! 每种操作有自己的系统指令、输出 schema 和采样温度。
//! 只处理"发请求 → 解析载荷 → 分配 id"，不关心会话状态。

use std::collections::HashSet;

use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, LlmError};
use crate::models::{LanguageContent, Mcq, McqPayload};
use crate::services::llm_service::LlmService;

/// 改写与批量出题的采样温度（低温度求稳定输出）
const REWRITE_TEMPERATURE: f32 = 0.3;
/// 单题重生成的采样温度（高温度换取不同的题目）
const REGENERATE_TEMPERATURE: f32 = 0.7;

const CONTENT_SYSTEM_INSTRUCTION: &str = r#"Role: You are an exam-focused current affairs rewriting engine.

Core Task:
REWRITE the given current affairs into five languages (Telugu, Hindi, Kannada, Tamil, English) using fully original content derived from the input.

Global Rules:
1. Analyze only the given text. Do not add, assume, or infer information not provided.
2. Tone: Simple, clear, neutral, factual, suitable for competitive exams (UPSC, SSC, Banking).
3. STRICTLY NO EMOJIS.
4. No extra commentary.

Languages order: Telugu, Hindi, Kannada, Tamil, English.
Structure per language:
    - Context: ~100 words, exam-oriented background.
    - Why this news matters: 7-8 points derived from text.
    - Where and When: factual location/date points.
    - Key Points for Exam: 5-7 crisp factual points.
"#;

const SINGLE_MCQ_INSTRUCTION: &str = r#"Role: You are an exam-focused question generator.
Task: Generate exactly ONE Multiple Choice Question (MCQ) based strictly on the provided input text.
Rules:
1. The question must be factual and suitable for competitive exams (UPSC/SSC).
2. It must have 4 options, 1 correct answer.
3. Provide a detailed 3-part explanation as an array of strings:
    - Point 1: DETAILED justification for the correct answer. Use phrases like "According to the news article" or "As per the news".
    - Point 2: Context/Background.
    - Point 3: Analysis of wrong options.
4. No emojis.
5. Do not use markdown.
"#;

/// 构造批量出题指令，要求服务端返回恰好 `count` 道题
fn mcq_batch_instruction(count: usize) -> String {
    format!(
        r#"Role: You are an exam-focused question generator.

Task:
Generate exactly {count} Multiple Choice Questions (MCQs) strictly based on the provided input content.

Global Rules:
1. Analyze only the given text.
2. Tone: Factual, suitable for competitive exams (UPSC, SSC, Banking).
3. STRICTLY NO EMOJIS.

Requirements per Question:
- Each question must have exactly 4 options (A, B, C, D).
- Only ONE option must be correct.
- Provide a Detailed Explanation (Array of 3 strings):
  1. First point: Why the correct answer is correct (Provide a VERY DETAILED, comprehensive justification using exact facts, figures, and reasoning. ALWAYS use phrases like "According to the news article" or "As per the news" instead of "from the text").
  2. Second point: Explanation from the news context.
  3. Third point: Why the other options are incorrect.
"#
    )
}

// ========== 输出 schema ==========

/// 内容改写 schema：五种语言的结构化改写结果
fn content_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "results": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "language": {
                            "type": "string",
                            "description": "The language of the content (Telugu, Hindi, Kannada, Tamil, English)",
                            "enum": ["Telugu", "Hindi", "Kannada", "Tamil", "English"]
                        },
                        "context": {
                            "type": "string",
                            "description": "Around 100 words. Simple, neutral, exam-oriented. Explain background and significance."
                        },
                        "significance": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "7-8 clear bullet points on governance, economy, society, policy, or competitive exams."
                        },
                        "locationAndDate": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "Bullet points only. Mention location and date. No assumptions."
                        },
                        "examPoints": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "5-7 crisp factual bullet points useful for UPSC, SSC, Banking, etc."
                        }
                    },
                    "required": ["language", "context", "significance", "locationAndDate", "examPoints"]
                }
            }
        },
        "required": ["results"]
    })
}

/// 单道题目的 schema（批量与单题共用）
fn mcq_item_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "question": { "type": "string" },
            "options": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": 4,
                "maxItems": 4,
                "description": "Exactly 4 options."
            },
            "correctOption": {
                "type": "string",
                "enum": ["A", "B", "C", "D"],
                "description": "The letter of the correct option."
            },
            "explanation": {
                "type": "array",
                "items": { "type": "string" },
                "description": "List of exactly 3 explanation points: 1. Detailed Justification, 2. Context, 3. Wrong options analysis."
            }
        },
        "required": ["question", "options", "correctOption", "explanation"]
    })
}

/// 批量出题 schema：题目列表包裹在 mcqs 字段里
fn mcq_batch_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "mcqs": {
                "type": "array",
                "description": "Multiple choice questions based strictly on the content.",
                "items": mcq_item_schema()
            }
        },
        "required": ["mcqs"]
    })
}

// ========== 载荷解析 ==========

#[derive(Debug, Deserialize)]
struct ContentEnvelope {
    results: Vec<LanguageContent>,
}

#[derive(Debug, Deserialize)]
struct McqBatchEnvelope {
    mcqs: Vec<McqPayload>,
}

/// 从响应文本中提取 JSON 正文
///
/// 部分模型会把 JSON 包在 markdown 代码块里，这里做一次容错剥离
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    // 形如 ```json ... ``` 或 ``` ... ```
    match Regex::new(r"(?s)^```(?:json)?\s*(.*?)\s*```$") {
        Ok(re) => re
            .captures(trimmed)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or(trimmed),
        Err(_) => trimmed,
    }
}

/// 解析分析响应，去除重复语言（保留首个出现的条目）
fn parse_analysis(raw: &str) -> AppResult<Vec<LanguageContent>> {
    let envelope: ContentEnvelope = serde_json::from_str(extract_json(raw))?;

    if envelope.results.is_empty() {
        return Err(AppError::schema_mismatch("results 列表为空"));
    }

    let mut seen = HashSet::new();
    let mut results = Vec::with_capacity(envelope.results.len());
    for content in envelope.results {
        if seen.insert(content.language) {
            results.push(content);
        } else {
            warn!("响应中语言 {} 出现多次，丢弃后续条目", content.language);
        }
    }

    Ok(results)
}

/// 解析批量出题响应并分配 id
///
/// 数量不符时不报错，记录警告后照常返回
fn parse_mcq_batch(raw: &str, expected: usize) -> AppResult<Vec<Mcq>> {
    let envelope: McqBatchEnvelope = serde_json::from_str(extract_json(raw))?;

    if envelope.mcqs.is_empty() {
        return Err(AppError::schema_mismatch("mcqs 列表为空"));
    }
    if envelope.mcqs.len() != expected {
        warn!(
            "请求 {} 道题，服务端返回 {} 道",
            expected,
            envelope.mcqs.len()
        );
    }

    Ok(envelope.mcqs.into_iter().map(Mcq::from_payload).collect())
}

/// 解析单题响应并分配 id
fn parse_single_mcq(raw: &str) -> AppResult<Mcq> {
    let payload: McqPayload = serde_json::from_str(extract_json(raw))?;
    Ok(Mcq::from_payload(payload))
}

// ========== 生成接口 ==========

/// 内容生成能力接口
///
/// 会话层只依赖这个接口；测试用脚本化实现替换真实服务，
/// 以便断言传给客户端的源文本
#[allow(async_fn_in_trait)]
pub trait ContentGenerator {
    /// 全量分析：把新闻原文改写成五种语言的结构化内容
    async fn analyze(&self, text: &str) -> AppResult<Vec<LanguageContent>>;

    /// 批量生成题目，要求恰好 `count` 道
    async fn generate_batch(&self, text: &str, count: usize) -> AppResult<Vec<Mcq>>;

    /// 重新生成单道题目
    ///
    /// 失败时返回固定的通用错误，不向上暴露底层原因
    async fn regenerate_one(&self, text: &str) -> AppResult<Mcq>;
}

/// 内容生成服务
///
/// 职责：
/// - 为三种操作构造提示词和 schema
/// - 解析并校验服务端载荷
/// - 为题目分配客户端 id
/// - 不持有会话状态
/// - 不关心源文本从何而来
pub struct GenerationService {
    llm: LlmService,
}

impl GenerationService {
    /// 创建新的生成服务
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self {
            llm: LlmService::new(config)?,
        })
    }

    /// 单题重生成的内部实现，错误在 `regenerate_one` 中统一收口
    async fn regenerate_inner(&self, text: &str) -> AppResult<Mcq> {
        let raw = self
            .llm
            .send_structured(
                text,
                SINGLE_MCQ_INSTRUCTION,
                "single_mcq",
                mcq_item_schema(),
                REGENERATE_TEMPERATURE,
            )
            .await?;

        parse_single_mcq(&raw)
    }
}

impl ContentGenerator for GenerationService {
    async fn analyze(&self, text: &str) -> AppResult<Vec<LanguageContent>> {
        debug!("开始全量分析，输入长度: {} 字符", text.len());

        let raw = self
            .llm
            .send_structured(
                text,
                CONTENT_SYSTEM_INSTRUCTION,
                "current_affairs_rewrite",
                content_schema(),
                REWRITE_TEMPERATURE,
            )
            .await?;

        let results = parse_analysis(&raw)?;
        debug!("分析完成，共 {} 种语言", results.len());
        Ok(results)
    }

    async fn generate_batch(&self, text: &str, count: usize) -> AppResult<Vec<Mcq>> {
        debug!("开始批量出题，请求 {} 道", count);

        let raw = self
            .llm
            .send_structured(
                text,
                &mcq_batch_instruction(count),
                "mcq_batch",
                mcq_batch_schema(),
                REWRITE_TEMPERATURE,
            )
            .await?;

        let mcqs = parse_mcq_batch(&raw, count)?;
        debug!("出题完成，共 {} 道", mcqs.len());
        Ok(mcqs)
    }

    async fn regenerate_one(&self, text: &str) -> AppResult<Mcq> {
        match self.regenerate_inner(text).await {
            Ok(mcq) => Ok(mcq),
            Err(e) => {
                // 底层原因只进日志，调用方拿到固定的通用错误
                warn!("单题重生成失败: {}", e);
                Err(AppError::Llm(LlmError::RegenerationFailed))
            }
        }
    }
}
