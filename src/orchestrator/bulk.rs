//! 批量操作协调器 - 编排层
//!
//! ## 职责
//!
//! 对当前选择执行批量复制/删除：每个 id 一次远程调用，全部并发等待，
//! 之后一次性写回缓存。
//!
//! ## 失败语义
//!
//! - 单个 id 的失败只影响它自己，不会阻止其它调用，也不会回滚成功项
//! - 删除：只移除确认删除成功的 id；失败的 id 留在缓存和选择中以便重试
//! - 复制：成功的副本按选择顺序插入缓存最前；之后清空选择
//! - 返回的副本缺少 id 或 id 已存在时按失败计入
//!
//! 执行（`execute_*`）与写回（`reconcile_*`）分开，
//! 调用方可以在两者之间检查会话是否仍然有效。

use crate::clients::QuestionStore;
use crate::error::{AppError, AppResult};
use crate::models::{QuestionPayload, QuestionRecord};
use crate::state::{QuestionCache, SelectionTracker};
use futures::future::join_all;
use tracing::{info, warn};

/// 批量操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Duplicate,
    Delete,
}

impl BulkAction {
    pub fn label(&self) -> &'static str {
        match self {
            BulkAction::Duplicate => "复制",
            BulkAction::Delete => "删除",
        }
    }
}

/// 单个 id 的失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkFailure {
    pub id: String,
    pub reason: String,
}

/// 批量操作结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkReport {
    pub action: BulkAction,
    /// 成功的源 id（按选择顺序）
    pub succeeded: Vec<String>,
    /// 复制产生的新 id（按选择顺序）
    pub created: Vec<String>,
    pub failed: Vec<BulkFailure>,
    /// 缓存中已不存在而跳过的 id
    pub skipped: Vec<String>,
}

impl BulkReport {
    fn new(action: BulkAction) -> Self {
        Self {
            action,
            succeeded: Vec::new(),
            created: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_ids(&self) -> Vec<String> {
        self.failed.iter().map(|f| f.id.clone()).collect()
    }

    pub fn summary(&self) -> String {
        let total = self.succeeded.len() + self.failed.len();
        let mut text = format!(
            "{}完成: 成功 {}/{}",
            self.action.label(),
            self.succeeded.len(),
            total
        );
        if !self.failed.is_empty() {
            text.push_str(&format!("，失败 {}", self.failed.len()));
        }
        if !self.skipped.is_empty() {
            text.push_str(&format!("，跳过 {}", self.skipped.len()));
        }
        text
    }
}

/// 批量删除确认提示
pub fn delete_prompt(count: usize) -> String {
    format!("确定删除选中的 {} 个题目吗？", count)
}

// ========== 删除 ==========

/// 并发删除，结果按给定顺序返回
pub async fn execute_delete<S: QuestionStore>(
    store: &S,
    ids: &[String],
) -> Vec<(String, AppResult<()>)> {
    info!("🗑️ 批量删除 {} 个题目...", ids.len());
    let calls = ids.iter().map(|id| async move {
        let result = store.delete(id).await;
        (id.clone(), result)
    });
    join_all(calls).await
}

/// 写回删除结果
///
/// 选择被设为失败的 id，便于更正后重试
pub fn reconcile_delete(
    cache: &mut QuestionCache,
    selection: &mut SelectionTracker,
    results: Vec<(String, AppResult<()>)>,
) -> BulkReport {
    let mut report = BulkReport::new(BulkAction::Delete);

    for (id, result) in results {
        match result {
            Ok(()) => report.succeeded.push(id),
            Err(e) => {
                warn!("⚠️ 删除题目 {} 失败: {}", id, e);
                report.failed.push(BulkFailure {
                    id,
                    reason: e.to_string(),
                });
            }
        }
    }

    cache.remove_many(&report.succeeded);
    selection.set(&report.failed_ids());

    log_report(&report);
    report
}

// ========== 复制 ==========

/// 复制计划：待创建的副本和缓存中缺失的 id
#[derive(Debug, Clone, Default)]
pub struct DuplicatePlan {
    pub payloads: Vec<(String, QuestionPayload)>,
    pub skipped: Vec<String>,
}

/// 从缓存查找源记录并构造副本请求
pub fn plan_duplicates(cache: &QuestionCache, ids: &[String]) -> DuplicatePlan {
    let mut plan = DuplicatePlan::default();
    for id in ids {
        match cache.get(id) {
            Some(record) => plan.payloads.push((id.clone(), record.duplicate_payload())),
            None => {
                warn!("⚠️ 题目 {} 不在缓存中，跳过复制", id);
                plan.skipped.push(id.clone());
            }
        }
    }
    plan
}

/// 并发创建副本，结果按计划顺序返回
pub async fn execute_duplicate<S: QuestionStore>(
    store: &S,
    plan: &DuplicatePlan,
) -> Vec<(String, AppResult<QuestionRecord>)> {
    info!("📄 批量复制 {} 个题目...", plan.payloads.len());
    let calls = plan.payloads.iter().map(|(id, payload)| async move {
        let result = store.create(payload).await;
        (id.clone(), result)
    });
    join_all(calls).await
}

/// 写回复制结果，无论成败都清空选择
pub fn reconcile_duplicate(
    cache: &mut QuestionCache,
    selection: &mut SelectionTracker,
    skipped: Vec<String>,
    results: Vec<(String, AppResult<QuestionRecord>)>,
) -> BulkReport {
    let mut report = BulkReport::new(BulkAction::Duplicate);
    report.skipped = skipped;

    let mut copies: Vec<QuestionRecord> = Vec::new();
    for (id, result) in results {
        let result = result.and_then(|record| admit_copy(cache, &copies, record));
        match result {
            Ok(record) => {
                report.succeeded.push(id);
                report.created.push(record.id.clone());
                copies.push(record);
            }
            Err(e) => {
                warn!("⚠️ 复制题目 {} 失败: {}", id, e);
                report.failed.push(BulkFailure {
                    id,
                    reason: e.to_string(),
                });
            }
        }
    }

    cache.insert_front_many(copies);
    selection.clear();

    log_report(&report);
    report
}

/// 远程返回的副本必须带有缓存和本批次中都未出现的 id
fn admit_copy(
    cache: &QuestionCache,
    copies: &[QuestionRecord],
    record: QuestionRecord,
) -> AppResult<QuestionRecord> {
    let check = cache.check_new(&record.id).and_then(|()| {
        if copies.iter().any(|c| c.id == record.id) {
            Err(format!("id {} 已存在", record.id))
        } else {
            Ok(())
        }
    });
    match check {
        Ok(()) => Ok(record),
        Err(reason) => Err(AppError::invalid_record("POST /questions", reason)),
    }
}

fn log_report(report: &BulkReport) {
    if report.is_complete_success() {
        info!("✓ {}", report.summary());
    } else {
        warn!("⚠️ {}", report.summary());
    }
}
