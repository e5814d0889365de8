//! 文本渲染
//!
//! 把会话状态格式化成终端输出，不修改任何状态

use crate::clients::QuestionStore;
use crate::models::{QuestionRecord, QuizGrouping};
use crate::orchestrator::{BulkReport, DashboardSession};
use crate::utils::truncate_text;
use crate::workflow::{EditorState, RecordEditor};

const TEXT_WIDTH: usize = 60;

/// 渲染可见列表
pub fn render_list<S: QuestionStore>(session: &DashboardSession<S>) -> String {
    let visible = session.visible();
    let mut out = String::new();

    if session.search_term().trim().is_empty() {
        out.push_str(&format!("共 {} 个题目", session.cache().len()));
    } else {
        out.push_str(&format!(
            "搜索 {:?}: {}/{} 个题目",
            session.search_term(),
            visible.len(),
            session.cache().len()
        ));
    }
    out.push_str(&format!("，已选 {}\n", session.selection().len()));

    for record in visible {
        let mark = if session.selection().contains(&record.id) {
            "[x]"
        } else {
            "[ ]"
        };
        out.push_str(&format!("{} {}\n", mark, render_row(record)));
    }
    out
}

pub fn render_row(record: &QuestionRecord) -> String {
    format!(
        "#{:<6} {:<8} {:<8} {}分 {}秒  {}",
        record.id,
        record.quiz_id,
        record.question_type,
        record.points,
        record.time_limit_seconds,
        truncate_text(&record.question_text, TEXT_WIDTH)
    )
}

pub fn render_editor(editor: &RecordEditor) -> String {
    let (draft, status) = match editor.state() {
        EditorState::Closed => return "编辑器未打开".to_string(),
        EditorState::Open { draft, error } => (
            draft,
            error
                .as_ref()
                .map(|e| format!("❌ {}", e))
                .unwrap_or_default(),
        ),
        EditorState::Submitting(draft) => (draft, "提交中...".to_string()),
    };

    let title = match &draft.id {
        Some(id) => format!("编辑题目 #{}", id),
        None => "新建题目".to_string(),
    };

    let mut out = format!(
        "── {} ──\n  text:   {}\n  quiz:   {}\n  points: {}\n  time:   {}\n  type:   {}\n",
        title,
        draft.question_text,
        draft.quiz_id,
        draft.points,
        draft.time_limit_seconds,
        draft.question_type
    );
    if !status.is_empty() {
        out.push_str(&format!("  {}\n", status));
    }
    out
}

pub fn render_report(report: &BulkReport) -> String {
    let mut out = report.summary();
    for failure in &report.failed {
        out.push_str(&format!("\n  ❌ #{}: {}", failure.id, failure.reason));
    }
    for id in &report.skipped {
        out.push_str(&format!("\n  ⏭ #{}: 已不在列表中", id));
    }
    out
}

pub fn render_quizzes(groupings: &[QuizGrouping]) -> String {
    if groupings.is_empty() {
        return "暂无测验".to_string();
    }
    groupings
        .iter()
        .map(|g| format!("{} [{}]", g, g.quiz_id))
        .collect::<Vec<_>>()
        .join("\n")
}
