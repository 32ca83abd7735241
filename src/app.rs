use std::io::Write as _;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::warn;

use crate::config::Config;
use crate::models::Choice;
use crate::presentation::{render, QuizViewState};
use crate::services::{ExportWriter, GenerationService};
use crate::utils::logging;
use crate::workflow::{ActiveTab, AppState, ReviewSession, SubmitOutcome};

/// 应用主结构
///
/// 从标准输入读取新闻原文，驱动审阅会话，并以纯文本渲染结果
pub struct App {
    session: ReviewSession<GenerationService>,
    view: QuizViewState,
    export: ExportWriter,
    default_mcq_count: usize,
    // 会话统计
    analyses: usize,
    generated: usize,
}

impl App {
    /// 初始化应用
    ///
    /// 密钥缺失时在这里直接失败，不进入交互循环
    pub fn initialize(config: Config) -> Result<Self> {
        // 初始化导出文件头
        logging::init_log_file(&config.export_file)?;

        logging::log_startup(&config.llm_model_name);

        let generator = GenerationService::new(&config)?;
        let session = ReviewSession::new(generator, &config);

        Ok(Self {
            session,
            view: QuizViewState::new(),
            export: ExportWriter::with_path(&config.export_file),
            default_mcq_count: config.default_mcq_count,
            analyses: 0,
            generated: 0,
        })
    }

    /// 运行交互主循环
    pub async fn run(mut self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();

        loop {
            if self.session.state() == AppState::Idle {
                println!("\n请粘贴新闻原文，单独一行 END 结束（EOF 退出）：");
                match read_passage(&mut lines).await? {
                    Some(text) => self.session.set_input(text),
                    None => break,
                }

                match self.session.analyze().await {
                    SubmitOutcome::Success => {
                        self.analyses += 1;
                        self.view.reset();
                        self.render_active_tab();
                        print_help();
                    }
                    SubmitOutcome::Failed => {
                        println!(
                            "处理失败: {}",
                            self.session.error().unwrap_or("未知错误")
                        );
                        println!("输入 clear 后可重新开始，quit 退出。");
                    }
                    SubmitOutcome::Skipped => continue,
                }
            }

            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            if !self.handle_command(line.trim()).await {
                break;
            }
        }

        logging::log_session_stats(self.analyses, self.generated);
        Ok(())
    }

    /// 处理单条命令，返回是否继续运行
    async fn handle_command(&mut self, line: &str) -> bool {
        let mut tokens = line.split_whitespace();
        let Some(command) = tokens.next() else {
            return true;
        };

        match command {
            "content" => {
                self.session.set_active_tab(ActiveTab::Content);
                self.render_active_tab();
            }
            "mcq" => {
                self.session.set_active_tab(ActiveTab::Mcq);
                self.render_active_tab();
            }
            "quiz" => {
                let count = tokens
                    .next()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(self.default_mcq_count);
                if self.session.generate_quiz(count).await {
                    self.generated += self.session.mcqs().len();
                    self.view.reset();
                    self.session.set_active_tab(ActiveTab::Mcq);
                    self.render_active_tab();
                }
            }
            "pick" => {
                let pos = tokens.next().and_then(|t| t.parse::<usize>().ok());
                let choice = tokens.next().and_then(Choice::from_letter);
                match (pos.and_then(|p| self.mcq_id_at(p)), choice) {
                    (Some(id), Some(choice)) => {
                        self.view.select(&id, choice);
                        self.render_question(&id);
                    }
                    _ => println!("用法: pick <题号> <A-D>"),
                }
            }
            "reveal" => match tokens.next().and_then(|t| t.parse::<usize>().ok()) {
                Some(pos) => match self.mcq_id_at(pos) {
                    Some(id) => {
                        self.view.toggle_reveal(&id);
                        self.render_question(&id);
                    }
                    None => println!("题号 {} 不存在", pos),
                },
                None => println!("用法: reveal <题号>"),
            },
            "regen" => match tokens.next().and_then(|t| t.parse::<usize>().ok()) {
                Some(pos) => match self.mcq_id_at(pos) {
                    Some(id) => {
                        if self.session.regenerate_mcq(&id).await {
                            self.session.set_active_tab(ActiveTab::Mcq);
                            self.render_active_tab();
                        }
                    }
                    None => println!("题号 {} 不存在", pos),
                },
                None => println!("用法: regen <题号>"),
            },
            "delete" => match tokens.next().and_then(|t| t.parse::<usize>().ok()) {
                Some(pos) => match self.mcq_id_at(pos) {
                    Some(id) => {
                        self.session.delete_mcq(&id);
                        self.session.set_active_tab(ActiveTab::Mcq);
                        self.render_active_tab();
                    }
                    None => println!("题号 {} 不存在", pos),
                },
                None => println!("用法: delete <题号>"),
            },
            "export" => self.export_current(),
            "clear" => {
                self.session.clear();
                self.view.reset();
            }
            "help" => print_help(),
            "quit" | "exit" => return false,
            other => {
                println!("未知命令: {}（输入 help 查看可用命令）", other);
            }
        }

        true
    }

    /// 渲染当前标签页
    fn render_active_tab(&self) {
        let Some(data) = self.session.data() else {
            println!("尚无分析结果。");
            return;
        };

        match self.session.active_tab() {
            ActiveTab::Content => {
                for content in &data.results {
                    println!("{}", render::render_language_card(content));
                }
            }
            ActiveTab::Mcq => {
                println!("{}", render::render_quiz(&data.mcqs, &self.view));
            }
        }
    }

    /// 渲染单道题目（按 id）
    fn render_question(&self, id: &str) {
        let mcqs = self.session.mcqs();
        if let Some(pos) = mcqs.iter().position(|m| m.id == id) {
            println!("{}", render::render_mcq(pos + 1, &mcqs[pos], &self.view));
        }
    }

    /// 导出当前结果到文件
    fn export_current(&self) {
        let Some(data) = self.session.data() else {
            println!("尚无分析结果，无法导出。");
            return;
        };

        let text = render::render_analysis(data, &self.view);
        match self.export.write(&text) {
            Ok(()) => println!("已导出至: {}", self.export.path()),
            Err(e) => warn!("⚠️ 导出失败: {}", e),
        }
    }

    /// 题号（1-based）转题目 id
    fn mcq_id_at(&self, position: usize) -> Option<String> {
        position
            .checked_sub(1)
            .and_then(|idx| self.session.mcqs().get(idx))
            .map(|m| m.id.clone())
    }
}

/// 逐行读取新闻原文，直到单独一行 END
///
/// 返回 None 表示输入流已结束
async fn read_passage(lines: &mut Lines<BufReader<Stdin>>) -> Result<Option<String>> {
    let mut buffer = Vec::new();

    loop {
        match lines.next_line().await? {
            Some(line) if line.trim() == "END" => break,
            Some(line) => buffer.push(line),
            None => {
                if buffer.is_empty() {
                    return Ok(None);
                }
                break;
            }
        }
    }

    Ok(Some(buffer.join("\n")))
}

// ========== 输出辅助函数 ==========

fn print_help() {
    println!("可用命令:");
    println!("  content            查看改写内容");
    println!("  mcq                查看练习题");
    println!("  quiz [数量]        生成练习题");
    println!("  pick <题号> <A-D>  作答（作答后自动展开解析）");
    println!("  reveal <题号>      展开/收起解析");
    println!("  regen <题号>       重新生成该题");
    println!("  delete <题号>      删除该题");
    println!("  export             导出当前结果");
    println!("  clear              清空会话");
    println!("  quit               退出");
}
