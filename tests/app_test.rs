mod common;

use common::{cache_ids, ids, record};
use question_admin::app::Step;
use question_admin::clients::MemoryQuestionStore;
use question_admin::command::Command;
use question_admin::config::{Config, StoreMode};
use question_admin::App;

async fn app(dir: &tempfile::TempDir) -> App<MemoryQuestionStore> {
    let config = Config {
        store_mode: StoreMode::Memory,
        failure_log_file: dir.path().join("failures.txt").to_string_lossy().to_string(),
        ..Default::default()
    };
    let store = MemoryQuestionStore::with_records(vec![
        record("1", "q1", "What is HTML?"),
        record("2", "q2", "What is CSS?"),
    ]);
    App::initialize(config, store).await.expect("初始化失败")
}

async fn run(app: &mut App<MemoryQuestionStore>, line: &str, confirmed: bool) -> String {
    let command = Command::parse(line).unwrap().unwrap();
    match app.execute(command, confirmed).await {
        Step::Continue(output) => output,
        Step::Quit => panic!("unexpected quit"),
    }
}

#[tokio::test]
async fn test_editor_flow_through_commands() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(&dir).await;

    run(&mut app, "new", false).await;
    run(&mut app, "set text What is the DOM?", false).await;
    run(&mut app, "set quiz q1", false).await;
    let output = run(&mut app, "submit", false).await;

    assert!(output.starts_with("✓ 已创建 #3"));
    assert_eq!(cache_ids(app.session()), ids(&["3", "1", "2"]));
}

#[tokio::test]
async fn test_set_without_editor() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(&dir).await;

    let output = run(&mut app, "set text hello", false).await;
    assert!(output.contains("编辑器未打开"));
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(&dir).await;

    run(&mut app, "toggle 1", false).await;
    let prompt = app.confirmation_prompt(&Command::Delete);
    assert_eq!(prompt.as_deref(), Some("确定删除选中的 1 个题目吗？"));

    let output = run(&mut app, "del", false).await;
    assert_eq!(output, "已取消");
    assert_eq!(app.session().cache().len(), 2);

    run(&mut app, "del", true).await;
    assert_eq!(cache_ids(app.session()), ids(&["2"]));
}

#[tokio::test]
async fn test_toggle_hidden_row_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(&dir).await;

    run(&mut app, "search css", false).await;
    let output = run(&mut app, "toggle 1", false).await;
    assert!(output.contains("不在当前列表中"));
    assert!(app.session().selection().is_empty());
}

#[tokio::test]
async fn test_run_with_scripted_input() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(&dir).await;

    let script = "all\ndup\ndel 1\ny\nquit\nlist\n";
    app.run_with(script.as_bytes()).await.unwrap();

    // 两个副本插入最前，随后题目 1 被删除；quit 之后的指令不执行
    assert_eq!(cache_ids(app.session()), ids(&["3", "4", "2"]));
    assert!(!app.session().lifecycle().is_mounted());
}
