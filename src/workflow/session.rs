//! 审阅会话 - 流程层
//!
//! 核心职责：驱动"一篇新闻"的完整处理流程与状态流转
//!
//! 状态流转：
//! 1. IDLE → LOADING：提交非空输入（空输入直接忽略，不触发请求）
//! 2. LOADING → SUCCESS：响应解析成功
//! 3. LOADING → ERROR：网络失败 / 空响应 / JSON 不合法
//! 4. SUCCESS / ERROR → IDLE：显式清空
//!
//! 出题和单题重生成是 SUCCESS 状态内的子操作，用独立的进行中标记
//! 跟踪，失败时只记日志并清除标记，已有结果保持可见。

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{AnalysisResponse, Mcq};
use crate::services::ContentGenerator;

/// 顶层请求生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// 当前展示的标签页
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTab {
    /// 改写内容
    #[default]
    Content,
    /// 练习题
    Mcq,
}

/// 提交结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 分析成功
    Success,
    /// 分析失败（错误信息已记入会话状态）
    Failed,
    /// 跳过（输入为空或正在加载）
    Skipped,
}

/// 审阅会话
///
/// 持有一次完整处理的全部派生状态，通过 `ContentGenerator` 接口
/// 发起生成调用。所有操作都要求 `&mut self`，因此会话内部不会有
/// 两个请求交错；把会话状态复制到多个任务里驱动的嵌入方会继承
/// "后完成者覆盖"的行为，本层不做请求围栏。
pub struct ReviewSession<G> {
    generator: G,
    input_text: String,
    state: AppState,
    data: Option<AnalysisResponse>,
    error: Option<String>,
    active_tab: ActiveTab,
    mcq_count: usize,
    default_mcq_count: usize,
    max_mcq_count: usize,
    /// 正在重生成的题目 id（单槽位展示标记，不做互斥）
    regenerating_id: Option<String>,
    /// 出题面板是否进行中
    generating_mcqs: bool,
}

impl<G: ContentGenerator> ReviewSession<G> {
    /// 创建新的审阅会话
    pub fn new(generator: G, config: &Config) -> Self {
        Self {
            generator,
            input_text: String::new(),
            state: AppState::Idle,
            data: None,
            error: None,
            active_tab: ActiveTab::Content,
            mcq_count: config.default_mcq_count,
            default_mcq_count: config.default_mcq_count,
            max_mcq_count: config.max_mcq_count,
            regenerating_id: None,
            generating_mcqs: false,
        }
    }

    // ========== 状态读取 ==========

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn data(&self) -> Option<&AnalysisResponse> {
        self.data.as_ref()
    }

    pub fn mcqs(&self) -> &[Mcq] {
        self.data.as_ref().map(|d| d.mcqs.as_slice()).unwrap_or(&[])
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn active_tab(&self) -> ActiveTab {
        self.active_tab
    }

    pub fn mcq_count(&self) -> usize {
        self.mcq_count
    }

    pub fn regenerating_id(&self) -> Option<&str> {
        self.regenerating_id.as_deref()
    }

    pub fn is_generating_mcqs(&self) -> bool {
        self.generating_mcqs
    }

    // ========== 状态变更 ==========

    /// 设置输入文本（加载中时忽略，对应输入框禁用）
    pub fn set_input(&mut self, text: impl Into<String>) {
        if self.state == AppState::Loading {
            debug!("正在分析，忽略输入变更");
            return;
        }
        self.input_text = text.into();
    }

    /// 切换标签页
    pub fn set_active_tab(&mut self, tab: ActiveTab) {
        self.active_tab = tab;
    }

    /// 提交分析
    ///
    /// 空输入（含纯空白）不触发任何请求，状态保持不变
    pub async fn analyze(&mut self) -> SubmitOutcome {
        if self.input_text.trim().is_empty() {
            debug!("输入为空，忽略本次提交");
            return SubmitOutcome::Skipped;
        }

        self.state = AppState::Loading;
        self.error = None;
        self.data = None;
        // 新分析回到内容页，出题状态一并复位
        self.active_tab = ActiveTab::Content;
        self.generating_mcqs = false;
        self.regenerating_id = None;

        info!("🔍 开始分析，输入长度: {} 字符", self.input_text.len());

        match self.generator.analyze(&self.input_text).await {
            Ok(results) => {
                self.data = Some(AnalysisResponse {
                    results,
                    mcqs: Vec::new(),
                });
                self.state = AppState::Success;
                info!("✓ 分析完成");
                SubmitOutcome::Success
            }
            Err(e) => {
                warn!("⚠️ 分析失败: {}", e);
                self.error = Some(e.to_string());
                self.state = AppState::Error;
                SubmitOutcome::Failed
            }
        }
    }

    /// 清空会话，无条件回到初始状态
    pub fn clear(&mut self) {
        self.input_text.clear();
        self.data = None;
        self.error = None;
        self.state = AppState::Idle;
        self.active_tab = ActiveTab::Content;
        self.mcq_count = self.default_mcq_count;
        self.generating_mcqs = false;
        self.regenerating_id = None;
        info!("已清空会话");
    }

    /// 按 id 删除题目
    ///
    /// 只删除匹配的一条，其余条目顺序不变；id 不存在时不做任何事
    pub fn delete_mcq(&mut self, id: &str) -> bool {
        let Some(data) = self.data.as_mut() else {
            return false;
        };

        let before = data.mcqs.len();
        data.mcqs.retain(|m| m.id != id);
        let removed = data.mcqs.len() != before;

        if removed {
            info!("🗑️ 已删除题目 {}", id);
        } else {
            debug!("题目 {} 不存在，忽略删除", id);
        }
        removed
    }

    /// 生成练习题
    ///
    /// 源文本优先用英语改写内容重组，退回原始输入。
    /// 失败不影响顶层状态和已有内容，只清除进行中标记。
    pub async fn generate_quiz(&mut self, count: usize) -> bool {
        if count == 0 {
            warn!("题目数量必须为正整数，忽略本次请求");
            return false;
        }

        let Some(source_text) = self.mcq_source_text() else {
            warn!("尚无分析结果，无法出题");
            return false;
        };

        let count = if count > self.max_mcq_count {
            warn!(
                "请求 {} 道超过上限，按 {} 道处理",
                count, self.max_mcq_count
            );
            self.max_mcq_count
        } else {
            count
        };
        self.mcq_count = count;

        info!("📝 开始出题，共 {} 道...", count);
        self.generating_mcqs = true;
        let outcome = self.generator.generate_batch(&source_text, count).await;
        self.generating_mcqs = false;

        match outcome {
            Ok(mcqs) => {
                info!("✓ 出题完成，共 {} 道", mcqs.len());
                if let Some(data) = self.data.as_mut() {
                    data.mcqs = mcqs;
                }
                true
            }
            Err(e) => {
                // 出题失败不得丢弃已渲染的改写内容
                warn!("⚠️ 出题失败: {}", e);
                false
            }
        }
    }

    /// 重新生成指定题目
    ///
    /// 成功时在原位置替换为新 id 的新题；失败时列表与顶层状态
    /// 保持不变，只清除进行中标记
    pub async fn regenerate_mcq(&mut self, id: &str) -> bool {
        let Some(source_text) = self.mcq_source_text() else {
            warn!("尚无分析结果，无法重生成");
            return false;
        };

        let exists = self.mcqs().iter().any(|m| m.id == id);
        if !exists {
            debug!("题目 {} 不存在，忽略重生成", id);
            return false;
        }

        info!("🔄 重新生成题目 {}...", id);
        self.regenerating_id = Some(id.to_string());
        let outcome = self.generator.regenerate_one(&source_text).await;
        self.regenerating_id = None;

        match outcome {
            Ok(new_mcq) => {
                if let Some(data) = self.data.as_mut() {
                    if let Some(slot) = data.mcqs.iter_mut().find(|m| m.id == id) {
                        info!("✓ 已用新题 {} 替换 {}", new_mcq.id, id);
                        *slot = new_mcq;
                        return true;
                    }
                }
                false
            }
            Err(e) => {
                warn!("⚠️ {}", e);
                false
            }
        }
    }

    /// 构造出题用的源文本
    ///
    /// 有分析结果时交给 `AnalysisResponse` 做英语重组，否则返回 None
    fn mcq_source_text(&self) -> Option<String> {
        self.data
            .as_ref()
            .map(|d| d.mcq_source_text(&self.input_text))
    }
}
