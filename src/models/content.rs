//! 内容数据模型
//!
//! 分析结果与练习题的领域类型，字段名与服务端 JSON 载荷保持一致
//! （camelCase）。题目 id 由客户端生成，服务端载荷不包含 id。

use serde::{Deserialize, Serialize};

use crate::models::language::Language;

/// 选项标签（按位置对应 A-D 四个选项）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
    C,
    D,
}

impl Choice {
    /// 全部标签，按选项位置顺序
    pub const ALL: [Choice; 4] = [Choice::A, Choice::B, Choice::C, Choice::D];

    /// 对应的选项下标（0-based）
    pub fn index(self) -> usize {
        match self {
            Choice::A => 0,
            Choice::B => 1,
            Choice::C => 2,
            Choice::D => 3,
        }
    }

    /// 显示用字母
    pub fn letter(self) -> &'static str {
        match self {
            Choice::A => "A",
            Choice::B => "B",
            Choice::C => "C",
            Choice::D => "D",
        }
    }

    /// 尝试从字母解析（忽略大小写）
    pub fn from_letter(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "A" => Some(Choice::A),
            "B" => Some(Choice::B),
            "C" => Some(Choice::C),
            "D" => Some(Choice::D),
            _ => None,
        }
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// 单一语言的改写内容
///
/// 每次分析调用对每种语言至多产生一条，之后只会被整体替换
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageContent {
    pub language: Language,
    /// 背景介绍（约 100 词）
    pub context: String,
    /// 新闻重要性要点
    pub significance: Vec<String>,
    /// 地点与时间要点
    pub location_and_date: Vec<String>,
    /// 考点要点
    pub exam_points: Vec<String>,
}

/// 服务端返回的题目载荷（不含 id）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqPayload {
    pub question: String,
    /// 固定 4 个选项，长度不符在反序列化时即报错
    pub options: [String; 4],
    pub correct_option: Choice,
    /// 固定 3 条解析：正确原因 / 新闻背景 / 错误选项分析
    pub explanation: [String; 3],
}

/// 练习题
///
/// id 为客户端生成的不透明唯一标识
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mcq {
    pub id: String,
    pub question: String,
    pub options: [String; 4],
    pub correct_option: Choice,
    pub explanation: [String; 3],
}

impl Mcq {
    /// 生成新的题目 id
    pub fn new_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    /// 从服务端载荷创建题目，分配新 id
    pub fn from_payload(payload: McqPayload) -> Self {
        Self {
            id: Self::new_id(),
            question: payload.question,
            options: payload.options,
            correct_option: payload.correct_option,
            explanation: payload.explanation,
        }
    }
}

impl std::fmt::Display for Mcq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 截断题干以便显示（最多80个字符）
        let preview = if self.question.chars().count() > 80 {
            self.question.chars().take(80).collect::<String>() + "..."
        } else {
            self.question.clone()
        };
        write!(f, "{} [答案: {}]", preview, self.correct_option)
    }
}

/// 一次完整分析的结果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResponse {
    /// 各语言改写内容，每种语言至多一条
    pub results: Vec<LanguageContent>,
    /// 练习题列表，未生成前为空
    #[serde(default)]
    pub mcqs: Vec<Mcq>,
}

impl AnalysisResponse {
    /// 查找英语条目
    pub fn english(&self) -> Option<&LanguageContent> {
        self.results
            .iter()
            .find(|r| r.language == Language::English)
    }

    /// 构造出题用的源文本
    ///
    /// 有英语条目时，把结构化的英语内容重组为提示词正文，
    /// 让题目基于模型自己改写过的内容而不是原始输入；
    /// 没有英语条目时退回原始输入。
    pub fn mcq_source_text(&self, fallback: &str) -> String {
        match self.english() {
            Some(english) => build_source_text(english),
            None => fallback.to_string(),
        }
    }
}

/// 把英语条目重组为出题提示词正文
fn build_source_text(content: &LanguageContent) -> String {
    let mut text = String::new();
    text.push_str("Context:\n");
    text.push_str(&content.context);
    text.push_str("\n\nWhy this news matters:\n");
    push_bullets(&mut text, &content.significance);
    text.push_str("\nWhere and When:\n");
    push_bullets(&mut text, &content.location_and_date);
    text.push_str("\nKey Points for Exam:\n");
    push_bullets(&mut text, &content.exam_points);
    text
}

fn push_bullets(text: &mut String, points: &[String]) {
    for point in points {
        text.push_str("- ");
        text.push_str(point);
        text.push('\n');
    }
}
