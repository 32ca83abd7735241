//! 答题视图状态
//!
//! 每道题的"已选选项 / 是否展开解析"按题目 id 记录，
//! 与领域数据（题目列表）分开持有。题目被删除后对应条目
//! 成为孤儿，读取时视为不存在即可，不算错误。

use std::collections::HashMap;

use crate::models::{Choice, Mcq};

/// 单道题的视图状态
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionUiState {
    /// 用户已选的选项
    pub selected: Option<Choice>,
    /// 是否展开解析
    pub revealed: bool,
}

/// 全部题目的视图状态（按题目 id 索引）
#[derive(Debug, Default)]
pub struct QuizViewState {
    states: HashMap<String, QuestionUiState>,
}

impl QuizViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取某道题的视图状态（无记录时返回默认值）
    pub fn get(&self, id: &str) -> QuestionUiState {
        self.states.get(id).copied().unwrap_or_default()
    }

    /// 选择选项，同时展开解析
    pub fn select(&mut self, id: &str, choice: Choice) {
        let state = self.states.entry(id.to_string()).or_default();
        state.selected = Some(choice);
        state.revealed = true;
    }

    /// 展开/收起解析
    pub fn toggle_reveal(&mut self, id: &str) {
        let state = self.states.entry(id.to_string()).or_default();
        state.revealed = !state.revealed;
    }

    /// 判断已选选项是否为正确答案（未作答返回 None）
    pub fn is_correct(&self, mcq: &Mcq) -> Option<bool> {
        self.get(&mcq.id)
            .selected
            .map(|choice| choice == mcq.correct_option)
    }

    /// 清空全部视图状态
    pub fn reset(&mut self) {
        self.states.clear();
    }
}
