mod common;

use common::{cache_ids, ids, record, RewritingStore, UnmountingStore};
use question_admin::clients::{MemoryQuestionStore, StoreCall};
use question_admin::error::{AppError, BusinessError};
use question_admin::orchestrator::BulkOutcome;
use question_admin::services::FailureLog;
use question_admin::{DashboardSession, EditorOutcome};

async fn mount(seed: Vec<question_admin::QuestionRecord>) -> DashboardSession<MemoryQuestionStore> {
    DashboardSession::mount(MemoryQuestionStore::with_records(seed))
        .await
        .expect("挂载会话失败")
}

fn yes(_: &str) -> bool {
    true
}

#[tokio::test]
async fn test_search_then_duplicate_scenario() {
    let mut session = mount(vec![record("1", "q1", "What is HTML?")]).await;

    session.set_search("html");
    assert_eq!(session.visible_ids(), ids(&["1"]));

    session.set_search("css");
    assert!(session.visible().is_empty());

    session.set_search("");
    session.toggle("1");
    let outcome = session.bulk_duplicate().await.unwrap();
    assert!(matches!(outcome, BulkOutcome::Completed(ref r) if r.is_complete_success()));

    let records = session.cache().records();
    assert_eq!(cache_ids(&session), ids(&["2", "1"]));
    assert_eq!(records[0].question_text, "What is HTML? (Copy)");
    assert_eq!(records[0].quiz_id, "q1");
    assert_eq!(records[1].question_text, "What is HTML?");
    assert!(session.selection().is_empty());
}

#[tokio::test]
async fn test_bulk_duplicate_two_records() {
    let mut session = mount(vec![
        record("1", "q1", "What is HTML?"),
        record("2", "q1", "What is CSS?"),
    ])
    .await;
    let originals = session.cache().records().to_vec();

    session.select_all();
    session.bulk_duplicate().await.unwrap();

    assert_eq!(session.cache().len(), 4);
    let texts: Vec<&str> = session
        .cache()
        .records()
        .iter()
        .map(|r| r.question_text.as_str())
        .collect();
    assert_eq!(
        texts,
        vec![
            "What is HTML? (Copy)",
            "What is CSS? (Copy)",
            "What is HTML?",
            "What is CSS?"
        ]
    );
    assert_eq!(&session.cache().records()[2..], &originals[..]);
}

#[tokio::test]
async fn test_bulk_delete_partial_failure_keeps_failed_for_retry() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("failures.txt");

    let mut session = mount(vec![record("a", "q1", "first"), record("b", "q1", "second")])
        .await
        .with_failure_log(FailureLog::new(log_path.to_string_lossy()));
    session.store().fail_for_id("b");

    session.toggle("a");
    session.toggle("b");
    let outcome = session.bulk_delete(&mut yes).await.unwrap();

    let report = match outcome {
        BulkOutcome::Completed(report) => report,
        other => panic!("unexpected outcome: {:?}", other),
    };
    assert_eq!(report.succeeded, ids(&["a"]));
    assert_eq!(report.failed_ids(), ids(&["b"]));

    assert!(!session.cache().contains("a"));
    assert!(session.cache().contains("b"));
    assert_eq!(session.selection().ids(), &ids(&["b"])[..]);
    assert_eq!(session.last_report(), Some(&report));

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("删除 | 题目 b"));

    // 更正后重试
    session.store().clear_failures();
    session.bulk_delete(&mut yes).await.unwrap();
    assert!(session.cache().is_empty());
    assert!(session.selection().is_empty());
}

#[tokio::test]
async fn test_bulk_delete_issues_one_call_per_id() {
    let mut session = mount(vec![
        record("1", "q1", "a"),
        record("2", "q1", "b"),
        record("3", "q1", "c"),
    ])
    .await;
    session.toggle("3");
    session.toggle("1");

    session.bulk_delete(&mut yes).await.unwrap();

    let deletes: Vec<StoreCall> = session
        .store()
        .calls()
        .into_iter()
        .filter(|c| matches!(c, StoreCall::Delete(_)))
        .collect();
    assert_eq!(deletes.len(), 2);
    assert!(deletes.contains(&StoreCall::Delete("1".to_string())));
    assert!(deletes.contains(&StoreCall::Delete("3".to_string())));
    assert_eq!(cache_ids(&session), ids(&["2"]));
}

#[tokio::test]
async fn test_unchanged_edit_updates_in_place() {
    let mut session = mount(vec![
        record("1", "q1", "What is HTML?"),
        record("2", "q1", "What is CSS?"),
    ])
    .await;
    let before = session.cache().records().to_vec();

    assert!(session.open_existing("2"));
    let outcome = session.submit_editor().await.unwrap();

    assert!(matches!(outcome, EditorOutcome::Updated(_)));
    assert_eq!(
        session.store().calls().last(),
        Some(&StoreCall::Update("2".to_string(), before[1].payload()))
    );
    assert_eq!(session.cache().records(), &before[..]);
    assert_eq!(
        session
            .cache()
            .records()
            .iter()
            .filter(|r| r.id == "2")
            .count(),
        1
    );
}

#[tokio::test]
async fn test_create_through_editor_inserts_at_head() {
    let mut session = mount(vec![record("1", "q1", "What is HTML?")]).await;

    session.open_new();
    {
        let draft = session.editor_mut().draft_mut().unwrap();
        draft.question_text = "What is the DOM?".to_string();
        draft.quiz_id = "q1".to_string();
        draft.points = 2;
    }
    let outcome = session.submit_editor().await.unwrap();

    let created = match outcome {
        EditorOutcome::Created(record) => record,
        other => panic!("unexpected outcome: {:?}", other),
    };
    assert_eq!(created.id, "2");
    assert_eq!(cache_ids(&session), ids(&["2", "1"]));
    assert!(!session.editor().is_open());
}

#[tokio::test]
async fn test_empty_question_text_never_reaches_store() {
    let mut session = mount(vec![record("1", "q1", "What is HTML?")]).await;
    let calls_before = session.store().calls();

    session.open_new();
    session.editor_mut().draft_mut().unwrap().quiz_id = "q1".to_string();
    let err = session.submit_editor().await.unwrap_err();

    assert!(err.is_validation());
    assert_eq!(session.store().calls(), calls_before);
    assert!(session.editor().is_open());
    assert_eq!(session.cache().len(), 1);
}

#[tokio::test]
async fn test_unknown_quiz_rejected_locally() {
    let mut session = mount(vec![record("1", "q1", "What is HTML?")]).await;

    session.open_new();
    {
        let draft = session.editor_mut().draft_mut().unwrap();
        draft.question_text = "Orphan".to_string();
        draft.quiz_id = "q404".to_string();
    }
    let err = session.submit_editor().await.unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_failed_update_leaves_cache_and_draft() {
    let mut session = mount(vec![record("1", "q1", "What is HTML?")]).await;
    session.store().fail_for_id("1");

    session.open_existing("1");
    session.editor_mut().draft_mut().unwrap().question_text = "Edited".to_string();
    let err = session.submit_editor().await.unwrap_err();

    assert!(err.is_remote());
    assert_eq!(session.cache().get("1").unwrap().question_text, "What is HTML?");
    assert_eq!(
        session.editor().draft().unwrap().question_text,
        "Edited"
    );
}

#[tokio::test]
async fn test_refresh_rescopes_selection() {
    let mut session = mount(vec![record("1", "q1", "a"), record("2", "q1", "b")]).await;
    session.select_all();

    // 其它编辑者在远程删除了题目 2
    question_admin::QuestionStore::delete(session.store(), "2")
        .await
        .unwrap();

    session.refresh().await.unwrap();
    assert_eq!(cache_ids(&session), ids(&["1"]));
    assert_eq!(session.selection().ids(), &ids(&["1"])[..]);
}

#[tokio::test]
async fn test_result_discarded_after_unmount() {
    let seed = vec![record("1", "q1", "What is HTML?")];
    let store = UnmountingStore::new(MemoryQuestionStore::with_records(seed));
    let mut session = DashboardSession::new(store);
    session.refresh().await.unwrap();

    session.store().arm(session.lifecycle());
    session.toggle("1");
    let err = session.bulk_duplicate().await.unwrap_err();

    assert!(matches!(err, AppError::Business(BusinessError::SessionClosed)));
    // 远程已创建，但本地缓存未被修改
    assert_eq!(session.store().inner.snapshot().len(), 2);
    assert_eq!(session.cache().len(), 1);
}

#[tokio::test]
async fn test_mount_failure_is_remote_error() {
    let store = MemoryQuestionStore::new();
    store.set_unavailable(true);

    match DashboardSession::mount(store).await {
        Err(err) => assert!(err.is_remote()),
        Ok(_) => panic!("挂载应该失败"),
    }
}

async fn mount_rewriting(
    seed: Vec<question_admin::QuestionRecord>,
    id: &str,
) -> DashboardSession<RewritingStore> {
    let store = RewritingStore::new(MemoryQuestionStore::with_records(seed), id);
    DashboardSession::mount(store).await.expect("挂载会话失败")
}

#[tokio::test]
async fn test_created_record_without_id_keeps_editor_open() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("failures.txt");
    let mut session = mount_rewriting(vec![record("1", "q1", "What is HTML?")], "")
        .await
        .with_failure_log(FailureLog::new(log_path.to_string_lossy()));

    session.open_new();
    {
        let draft = session.editor_mut().draft_mut().unwrap();
        draft.question_text = "What is the DOM?".to_string();
        draft.quiz_id = "q1".to_string();
    }
    let err = session.submit_editor().await.unwrap_err();

    assert!(err.is_remote());
    assert_eq!(session.cache().len(), 1);
    assert!(session.editor().is_open());
    assert_eq!(
        session.editor().draft().unwrap().question_text,
        "What is the DOM?"
    );
    assert!(session.editor().last_error().is_some());
    assert!(std::fs::read_to_string(&log_path).unwrap().contains("保存"));
}

#[tokio::test]
async fn test_created_record_with_cached_id_is_rejected() {
    let mut session = mount_rewriting(vec![record("1", "q1", "What is HTML?")], "1").await;

    session.open_new();
    {
        let draft = session.editor_mut().draft_mut().unwrap();
        draft.question_text = "What is the DOM?".to_string();
        draft.quiz_id = "q1".to_string();
    }
    assert!(session.submit_editor().await.unwrap_err().is_remote());
    assert_eq!(session.cache().records()[0].question_text, "What is HTML?");
    assert!(session.editor().is_open());

    assert!(session.duplicate_one("1").await.unwrap_err().is_remote());
    assert_eq!(session.cache().len(), 1);
}

#[tokio::test]
async fn test_bulk_duplicate_with_unusable_ids_reports_failures() {
    let mut session = mount_rewriting(vec![record("1", "q1", "a"), record("2", "q1", "b")], "").await;
    session.select_all();

    let report = match session.bulk_duplicate().await.unwrap() {
        BulkOutcome::Completed(report) => report,
        other => panic!("unexpected outcome: {:?}", other),
    };

    assert!(report.succeeded.is_empty());
    assert_eq!(report.failed_ids(), ids(&["1", "2"]));
    assert_eq!(cache_ids(&session), ids(&["1", "2"]));
}

#[tokio::test]
async fn test_update_applies_to_submitted_id() {
    let mut session = mount_rewriting(vec![record("1", "q1", "What is HTML?")], "001").await;

    assert!(session.open_existing("1"));
    session.editor_mut().draft_mut().unwrap().question_text = "Edited".to_string();
    let outcome = session.submit_editor().await.unwrap();

    assert!(matches!(outcome, EditorOutcome::Updated(_)));
    assert_eq!(session.cache().len(), 1);
    assert_eq!(session.cache().records()[0].question_text, "Edited");
}
