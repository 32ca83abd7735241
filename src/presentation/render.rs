//! 纯文本渲染
//!
//! 把语言卡片和题目渲染成终端可读的纯文本。
//! 小节标题沿用提示词约定的四个英文标题。

use crate::models::{AnalysisResponse, Choice, LanguageContent, Mcq};
use crate::presentation::view_state::QuizViewState;

/// 渲染单张语言卡片
pub fn render_language_card(content: &LanguageContent) -> String {
    let name = content.language.name();
    let mut out = String::new();

    out.push_str(name);
    out.push('\n');
    out.push_str(&"=".repeat(name.len()));
    out.push_str("\n\n");

    push_section(&mut out, "Context", std::slice::from_ref(&content.context));
    push_section(&mut out, "Why this news matters", &content.significance);
    push_section(&mut out, "Where and When", &content.location_and_date);
    push_section(&mut out, "Key Points for Exam", &content.exam_points);

    out
}

fn push_section(out: &mut String, title: &str, lines: &[String]) {
    out.push_str(title);
    out.push('\n');
    out.push_str(&"-".repeat(title.len()));
    out.push('\n');
    for line in lines {
        out.push_str("• ");
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
}

/// 渲染单道题目
///
/// `position` 为列表中的展示序号（1-based）。
/// 解析和正确答案只在视图状态标记展开后出现。
pub fn render_mcq(position: usize, mcq: &Mcq, view: &QuizViewState) -> String {
    let state = view.get(&mcq.id);
    let mut out = String::new();

    out.push_str(&format!("Q{}. {}\n", position, mcq.question));

    for (choice, option) in Choice::ALL.iter().zip(mcq.options.iter()) {
        let marker = if state.selected == Some(*choice) {
            ">"
        } else {
            " "
        };
        out.push_str(&format!("{} {}) {}\n", marker, choice.letter(), option));
    }

    if state.revealed {
        out.push_str(&format!("Correct Answer: {}\n", mcq.correct_option));
        if let Some(correct) = view.is_correct(mcq) {
            out.push_str(if correct {
                "Your answer: correct\n"
            } else {
                "Your answer: incorrect\n"
            });
        }
        out.push_str("Explanation:\n");
        for point in &mcq.explanation {
            out.push_str(&format!("• {}\n", point));
        }
    }

    out
}

/// 渲染题目列表（含题数标题行）
pub fn render_quiz(mcqs: &[Mcq], view: &QuizViewState) -> String {
    if mcqs.is_empty() {
        return "No questions available. Try generating a quiz first.\n".to_string();
    }

    let mut out = format!("Practice Quiz • {} Questions\n\n", mcqs.len());
    for (idx, mcq) in mcqs.iter().enumerate() {
        out.push_str(&render_mcq(idx + 1, mcq, view));
        out.push('\n');
    }
    out
}

/// 渲染完整分析结果（全部语言卡片 + 题目列表）
pub fn render_analysis(response: &AnalysisResponse, view: &QuizViewState) -> String {
    let mut out = String::new();
    for content in &response.results {
        out.push_str(&render_language_card(content));
        out.push('\n');
    }
    if !response.mcqs.is_empty() {
        out.push_str(&render_quiz(&response.mcqs, view));
    }
    out
}
