//! # Current Affairs Rewriter
//!
//! 一个把新闻原文改写成五语种备考内容并生成练习题的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单次调用
//! - `LlmService` - 发送一次结构化 LLM 请求的能力
//! - `GenerationService` - 分析 / 批量出题 / 单题重生成三种生成能力
//! - `ExportWriter` - 写导出文件能力
//!
//! ### ② 流程层（Workflow）
//! - `workflow/` - 定义"一篇新闻"的完整处理流程
//! - `ReviewSession` - 状态机（IDLE → LOADING → SUCCESS/ERROR）
//!   与题目列表管理（删除 / 原位替换）
//!
//! ### ③ 展示层（Presentation）
//! - `presentation/` - 按题目 id 记录作答状态，渲染纯文本输出
//!
//! ### ④ 应用层（App）
//! - `app` - 交互主循环，读取原文、分发命令
//!
//! ## 模块结构

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod presentation;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{AnalysisResponse, Choice, Language, LanguageContent, Mcq};
pub use services::{ContentGenerator, GenerationService, LlmService};
pub use workflow::{ActiveTab, AppState, ReviewSession, SubmitOutcome};
