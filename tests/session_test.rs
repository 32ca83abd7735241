//! 会话状态机集成测试
//!
//! 用脚本化的生成后端替换真实服务，记录每次调用收到的源文本，
//! 验证状态流转、列表管理和源文本重组的行为。

use std::sync::{Arc, Mutex};

use current_affairs_rewriter::error::{AppError, AppResult, LlmError};
use current_affairs_rewriter::models::{Choice, LanguageContent, Mcq};
use current_affairs_rewriter::{
    ActiveTab, AppState, Config, ContentGenerator, Language, ReviewSession, SubmitOutcome,
};

/// 后端收到的调用记录
#[derive(Debug, Clone, PartialEq)]
enum Call {
    Analyze(String),
    Batch(String, usize),
    Regenerate(String),
}

/// 脚本开关（测试中途可翻转）
#[derive(Debug, Default)]
struct Script {
    fail_analyze: bool,
    fail_batch: bool,
    fail_regenerate: bool,
    /// 分析结果是否包含英语条目
    with_english: bool,
}

/// 脚本化生成后端
struct ScriptedGenerator {
    calls: Arc<Mutex<Vec<Call>>>,
    script: Arc<Mutex<Script>>,
}

impl ScriptedGenerator {
    fn new() -> (Self, Arc<Mutex<Vec<Call>>>, Arc<Mutex<Script>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let script = Arc::new(Mutex::new(Script::default()));
        (
            Self {
                calls: calls.clone(),
                script: script.clone(),
            },
            calls,
            script,
        )
    }
}

impl ContentGenerator for ScriptedGenerator {
    async fn analyze(&self, text: &str) -> AppResult<Vec<LanguageContent>> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Analyze(text.to_string()));

        let script = self.script.lock().unwrap();
        if script.fail_analyze {
            return Err(AppError::llm_service_call(
                "mock-model",
                std::io::Error::new(std::io::ErrorKind::Other, "service unavailable"),
            ));
        }

        let mut results = vec![hindi_fixture()];
        if script.with_english {
            results.push(english_fixture());
        }
        Ok(results)
    }

    async fn generate_batch(&self, text: &str, count: usize) -> AppResult<Vec<Mcq>> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Batch(text.to_string(), count));

        if self.script.lock().unwrap().fail_batch {
            return Err(AppError::llm_empty_response("mock-model"));
        }

        Ok((0..count).map(|i| make_mcq(&format!("question {}", i))).collect())
    }

    async fn regenerate_one(&self, text: &str) -> AppResult<Mcq> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Regenerate(text.to_string()));

        if self.script.lock().unwrap().fail_regenerate {
            return Err(AppError::Llm(LlmError::RegenerationFailed));
        }

        Ok(make_mcq("regenerated question"))
    }
}

// ========== 测试夹具 ==========

fn hindi_fixture() -> LanguageContent {
    LanguageContent {
        language: Language::Hindi,
        context: "hindi context".to_string(),
        significance: vec!["hindi point".to_string()],
        location_and_date: vec!["hindi location".to_string()],
        exam_points: vec!["hindi exam point".to_string()],
    }
}

fn english_fixture() -> LanguageContent {
    LanguageContent {
        language: Language::English,
        context: "India launched a new navigation satellite.".to_string(),
        significance: vec![
            "Strengthens regional navigation".to_string(),
            "Supports disaster response".to_string(),
        ],
        location_and_date: vec!["Sriharikota, January 2025".to_string()],
        exam_points: vec![
            "Launched by ISRO".to_string(),
            "Part of the NavIC constellation".to_string(),
        ],
    }
}

/// 英语夹具对应的重组源文本
const RECONSTRUCTED: &str = "Context:\n\
    India launched a new navigation satellite.\n\
    \n\
    Why this news matters:\n\
    - Strengthens regional navigation\n\
    - Supports disaster response\n\
    \n\
    Where and When:\n\
    - Sriharikota, January 2025\n\
    \n\
    Key Points for Exam:\n\
    - Launched by ISRO\n\
    - Part of the NavIC constellation\n";

const RAW_INPUT: &str = "ISRO launched a satellite from Sriharikota in January 2025.";

fn make_mcq(question: &str) -> Mcq {
    Mcq {
        id: Mcq::new_id(),
        question: question.to_string(),
        options: [
            "option a".to_string(),
            "option b".to_string(),
            "option c".to_string(),
            "option d".to_string(),
        ],
        correct_option: Choice::B,
        explanation: [
            "justification".to_string(),
            "context".to_string(),
            "wrong options".to_string(),
        ],
    }
}

fn new_session() -> (
    ReviewSession<ScriptedGenerator>,
    Arc<Mutex<Vec<Call>>>,
    Arc<Mutex<Script>>,
) {
    let (generator, calls, script) = ScriptedGenerator::new();
    (
        ReviewSession::new(generator, &Config::default()),
        calls,
        script,
    )
}

async fn analyzed_session() -> (
    ReviewSession<ScriptedGenerator>,
    Arc<Mutex<Vec<Call>>>,
    Arc<Mutex<Script>>,
) {
    let (mut session, calls, script) = new_session();
    session.set_input(RAW_INPUT);
    assert_eq!(session.analyze().await, SubmitOutcome::Success);
    (session, calls, script)
}

// ========== 状态流转 ==========

#[tokio::test]
async fn test_analyze_success_reaches_success_state() {
    let (session, calls, _script) = analyzed_session().await;

    assert_eq!(session.state(), AppState::Success);
    assert_eq!(session.active_tab(), ActiveTab::Content);
    assert!(session.error().is_none());

    let data = session.data().expect("应当有分析结果");
    assert_eq!(data.results.len(), 1);
    assert!(data.mcqs.is_empty());

    assert_eq!(
        *calls.lock().unwrap(),
        vec![Call::Analyze(RAW_INPUT.to_string())]
    );
}

#[tokio::test]
async fn test_analyze_failure_reaches_error_state() {
    let (mut session, _calls, script) = new_session();
    script.lock().unwrap().fail_analyze = true;

    session.set_input(RAW_INPUT);
    assert_eq!(session.analyze().await, SubmitOutcome::Failed);

    assert_eq!(session.state(), AppState::Error);
    // 分析路径把底层错误信息透传给会话
    let message = session.error().expect("应当记录错误信息");
    assert!(message.contains("service unavailable"));
    assert!(session.data().is_none());
}

#[test]
fn test_empty_input_never_reaches_backend() {
    tokio_test::block_on(async {
        let (mut session, calls, _script) = new_session();
        session.set_input("   \n\t  ");

        assert_eq!(session.analyze().await, SubmitOutcome::Skipped);

        assert_eq!(session.state(), AppState::Idle);
        assert!(calls.lock().unwrap().is_empty());
    });
}

#[tokio::test]
async fn test_clear_resets_to_defaults() {
    let (mut session, _calls, _script) = analyzed_session().await;
    assert!(session.generate_quiz(3).await);
    session.set_active_tab(ActiveTab::Mcq);

    session.clear();

    assert_eq!(session.state(), AppState::Idle);
    assert!(session.input_text().is_empty());
    assert!(session.data().is_none());
    assert!(session.error().is_none());
    assert_eq!(session.active_tab(), ActiveTab::Content);
    assert_eq!(session.mcq_count(), Config::default().default_mcq_count);
}

// ========== 列表管理 ==========

#[tokio::test]
async fn test_generate_batch_returns_requested_count() {
    let (mut session, _calls, _script) = analyzed_session().await;

    assert!(session.generate_quiz(4).await);

    let mcqs = session.mcqs();
    assert_eq!(mcqs.len(), 4);
    for mcq in mcqs {
        assert_eq!(mcq.options.len(), 4);
        assert_eq!(mcq.explanation.len(), 3);
    }

    // id 唯一
    let mut ids: Vec<&str> = mcqs.iter().map(|m| m.id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 4);
}

#[tokio::test]
async fn test_delete_preserves_order_of_rest() {
    let (mut session, _calls, _script) = analyzed_session().await;
    assert!(session.generate_quiz(3).await);

    let ids: Vec<String> = session.mcqs().iter().map(|m| m.id.clone()).collect();
    assert!(session.delete_mcq(&ids[1]));

    let remaining: Vec<&str> = session.mcqs().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(remaining, vec![ids[0].as_str(), ids[2].as_str()]);

    // 不存在的 id 不做任何事
    assert!(!session.delete_mcq("no-such-id"));
    assert_eq!(session.mcqs().len(), 2);
}

#[tokio::test]
async fn test_regenerate_replaces_in_place() {
    let (mut session, _calls, _script) = analyzed_session().await;
    assert!(session.generate_quiz(3).await);

    let before: Vec<String> = session.mcqs().iter().map(|m| m.id.clone()).collect();
    let target = before[1].clone();

    assert!(session.regenerate_mcq(&target).await);

    let mcqs = session.mcqs();
    assert_eq!(mcqs.len(), 3, "总数不变");
    assert_eq!(mcqs[0].id, before[0], "前一条不受影响");
    assert_eq!(mcqs[2].id, before[2], "后一条不受影响");
    assert_ne!(mcqs[1].id, target, "替换后 id 是新的");
    assert_eq!(mcqs[1].question, "regenerated question");
    assert!(session.regenerating_id().is_none());
}

// ========== 源文本重组 ==========

#[tokio::test]
async fn test_mcq_operations_use_english_reconstruction() {
    let (mut session, calls, script) = new_session();
    script.lock().unwrap().with_english = true;

    session.set_input(RAW_INPUT);
    assert_eq!(session.analyze().await, SubmitOutcome::Success);
    assert!(session.generate_quiz(2).await);

    let target = session.mcqs()[0].id.clone();
    assert!(session.regenerate_mcq(&target).await);

    let calls = calls.lock().unwrap();
    assert_eq!(
        calls[1],
        Call::Batch(RECONSTRUCTED.to_string(), 2),
        "出题用重组后的英语内容而不是原文"
    );
    assert_eq!(
        calls[2],
        Call::Regenerate(RECONSTRUCTED.to_string()),
        "重生成同样用重组后的英语内容"
    );
}

#[tokio::test]
async fn test_mcq_operations_fall_back_to_raw_input() {
    // 分析结果没有英语条目时，退回原始输入
    let (mut session, calls, _script) = analyzed_session().await;
    assert!(session.generate_quiz(2).await);

    let calls = calls.lock().unwrap();
    assert_eq!(calls[1], Call::Batch(RAW_INPUT.to_string(), 2));
}

// ========== 局部失败隔离 ==========

#[tokio::test]
async fn test_batch_failure_keeps_rendered_content() {
    let (mut session, _calls, script) = analyzed_session().await;
    script.lock().unwrap().fail_batch = true;

    assert!(!session.generate_quiz(5).await);

    // 出题失败不得丢弃已渲染的改写内容，也不进入 ERROR 状态
    assert_eq!(session.state(), AppState::Success);
    assert!(session.error().is_none());
    assert_eq!(session.data().unwrap().results.len(), 1);
    assert!(!session.is_generating_mcqs());
}

#[tokio::test]
async fn test_regenerate_failure_leaves_everything_unchanged() {
    let (mut session, _calls, script) = analyzed_session().await;
    assert!(session.generate_quiz(2).await);

    let before: Vec<(String, String)> = session
        .mcqs()
        .iter()
        .map(|m| (m.id.clone(), m.question.clone()))
        .collect();

    script.lock().unwrap().fail_regenerate = true;
    let target = before[0].0.clone();
    assert!(!session.regenerate_mcq(&target).await);

    let after: Vec<(String, String)> = session
        .mcqs()
        .iter()
        .map(|m| (m.id.clone(), m.question.clone()))
        .collect();

    assert_eq!(before, after, "列表完全不变");
    assert_eq!(session.state(), AppState::Success);
    assert!(session.error().is_none());
    assert!(session.regenerating_id().is_none());
}
