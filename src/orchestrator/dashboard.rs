//! 题目管理会话 - 编排层
//!
//! ## 职责
//!
//! `DashboardSession` 是管理面板的上下文对象，挂载时创建、卸载时结束。
//! 它持有远程题库、题目缓存、搜索词、选择状态和编辑器，
//! 把用户操作翻译成远程调用，并在调用返回后写回缓存。
//!
//! ## 并发约定
//!
//! - 所有修改都通过 `&mut self` 进行，同一时刻只有一个操作在修改缓存，
//!   操作未返回前无法再次触发
//! - 批量调用并发执行，写回在全部返回后一次完成
//! - 会话卸载后返回的远程结果直接丢弃，不再修改缓存

use crate::clients::QuestionStore;
use crate::error::{AppError, AppResult, BusinessError};
use crate::models::{QuestionRecord, QuizGrouping};
use crate::orchestrator::bulk::{self, BulkAction, BulkReport};
use crate::services::FailureLog;
use crate::state::{filter, QuestionCache, SelectionTracker};
use crate::workflow::{EditorOutcome, RecordEditor};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 会话生命周期句柄
///
/// 可被克隆并交给外部（例如界面）以便在操作进行中卸载会话
#[derive(Debug, Clone)]
pub struct Lifecycle {
    mounted: Arc<AtomicBool>,
}

impl Lifecycle {
    fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }
}

/// 用户确认（阻塞式是/否）
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// 批量操作的最终状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkOutcome {
    /// 用户取消，没有任何远程调用
    Cancelled,
    Completed(BulkReport),
}

pub struct DashboardSession<S: QuestionStore> {
    store: S,
    cache: QuestionCache,
    selection: SelectionTracker,
    search_term: String,
    editor: RecordEditor,
    lifecycle: Lifecycle,
    failure_log: Option<FailureLog>,
    last_report: Option<BulkReport>,
}

impl<S: QuestionStore> DashboardSession<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: QuestionCache::new(),
            selection: SelectionTracker::new(),
            search_term: String::new(),
            editor: RecordEditor::new(),
            lifecycle: Lifecycle::new(),
            failure_log: None,
            last_report: None,
        }
    }

    /// 失败项同时写入失败记录文件
    pub fn with_failure_log(mut self, failure_log: FailureLog) -> Self {
        self.failure_log = Some(failure_log);
        self
    }

    /// 挂载：创建会话并从远程加载缓存
    pub async fn mount(store: S) -> AppResult<Self> {
        let mut session = Self::new(store);
        session.refresh().await?;
        Ok(session)
    }

    // ========== 只读视图 ==========

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cache(&self) -> &QuestionCache {
        &self.cache
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn editor(&self) -> &RecordEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut RecordEditor {
        &mut self.editor
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.clone()
    }

    pub fn last_report(&self) -> Option<&BulkReport> {
        self.last_report.as_ref()
    }

    /// 当前搜索词下可见的题目
    pub fn visible(&self) -> Vec<&QuestionRecord> {
        filter::apply(self.cache.records(), &self.search_term)
    }

    pub fn visible_ids(&self) -> Vec<String> {
        filter::visible_ids(self.cache.records(), &self.search_term)
    }

    pub fn quiz_groupings(&self) -> Vec<QuizGrouping> {
        self.cache.quiz_groupings()
    }

    // ========== 生命周期 ==========

    pub fn unmount(&self) {
        info!("会话已卸载");
        self.lifecycle.unmount();
    }

    fn ensure_mounted(&self) -> AppResult<()> {
        if self.lifecycle.is_mounted() {
            Ok(())
        } else {
            debug!("会话已卸载，丢弃远程结果");
            Err(BusinessError::SessionClosed.into())
        }
    }

    /// 从远程重新加载缓存，选择收敛到可见集合
    pub async fn refresh(&mut self) -> AppResult<usize> {
        self.ensure_mounted()?;
        let records = self.store.list_all().await?;
        self.ensure_mounted()?;

        self.cache.load(records);
        self.rescope_selection();
        info!("✓ 已加载 {} 个题目", self.cache.len());
        Ok(self.cache.len())
    }

    // ========== 搜索与选择 ==========

    /// 更新搜索词
    ///
    /// 不在新可见集合中的已选 id 会被丢弃
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.rescope_selection();
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        self.selection.toggle(id)
    }

    pub fn select_all(&mut self) {
        let visible = self.visible_ids();
        self.selection.select_all(&visible);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn rescope_selection(&mut self) {
        let visible = self.visible_ids();
        let dropped = self.selection.retain_visible(&visible);
        if dropped > 0 {
            debug!("选择中有 {} 个题目不再可见，已取消选择", dropped);
        }
    }

    // ========== 批量操作 ==========

    /// 批量删除，执行前需要用户确认
    pub async fn bulk_delete(&mut self, confirm: &mut impl Confirm) -> AppResult<BulkOutcome> {
        self.ensure_mounted()?;
        if self.selection.is_empty() {
            return Err(BusinessError::EmptySelection.into());
        }

        let ids = self.selection.ids().to_vec();
        if !confirm.confirm(&bulk::delete_prompt(ids.len())) {
            info!("已取消批量删除");
            return Ok(BulkOutcome::Cancelled);
        }

        let results = bulk::execute_delete(&self.store, &ids).await;
        self.ensure_mounted()?;

        let report = bulk::reconcile_delete(&mut self.cache, &mut self.selection, results);
        Ok(self.finish_bulk(report))
    }

    /// 批量复制
    pub async fn bulk_duplicate(&mut self) -> AppResult<BulkOutcome> {
        self.ensure_mounted()?;
        if self.selection.is_empty() {
            return Err(BusinessError::EmptySelection.into());
        }

        let plan = bulk::plan_duplicates(&self.cache, self.selection.ids());
        let results = bulk::execute_duplicate(&self.store, &plan).await;
        self.ensure_mounted()?;

        let report =
            bulk::reconcile_duplicate(&mut self.cache, &mut self.selection, plan.skipped, results);
        Ok(self.finish_bulk(report))
    }

    fn finish_bulk(&mut self, report: BulkReport) -> BulkOutcome {
        for failure in &report.failed {
            self.log_failure(report.action.label(), &failure.id, &failure.reason);
        }
        self.last_report = Some(report.clone());
        BulkOutcome::Completed(report)
    }

    // ========== 单行操作 ==========

    /// 删除单个题目
    ///
    /// # 返回
    /// - `Ok(false)`: 用户取消，或题目已不在缓存中
    /// - `Ok(true)`: 删除成功
    pub async fn delete_one(&mut self, id: &str, confirm: &mut impl Confirm) -> AppResult<bool> {
        self.ensure_mounted()?;
        if !self.cache.contains(id) {
            debug!("题目 {} 已不在缓存中", id);
            return Ok(false);
        }
        if !confirm.confirm(&bulk::delete_prompt(1)) {
            return Ok(false);
        }

        let result = self.store.delete(id).await;
        self.ensure_mounted()?;

        match result {
            Ok(()) => {
                self.cache.remove(id);
                self.selection.remove(id);
                info!("✓ 题目 {} 已删除", id);
                Ok(true)
            }
            Err(e) => Err(self.remote_failure(BulkAction::Delete.label(), id, e)),
        }
    }

    /// 复制单个题目，返回新记录；题目已不在缓存中时返回 `Ok(None)`
    pub async fn duplicate_one(&mut self, id: &str) -> AppResult<Option<QuestionRecord>> {
        self.ensure_mounted()?;
        let payload = match self.cache.get(id) {
            Some(record) => record.duplicate_payload(),
            None => {
                debug!("题目 {} 已不在缓存中", id);
                return Ok(None);
            }
        };

        let result = self.store.create(&payload).await;
        self.ensure_mounted()?;

        let result = result.and_then(|record| match self.cache.check_new(&record.id) {
            Ok(()) => Ok(record),
            Err(reason) => Err(AppError::invalid_record("POST /questions", reason)),
        });
        match result {
            Ok(record) => {
                self.cache.insert_front(record.clone());
                info!("✓ 题目 {} 已复制为 {}", id, record.id);
                Ok(Some(record))
            }
            Err(e) => Err(self.remote_failure(BulkAction::Duplicate.label(), id, e)),
        }
    }

    // ========== 编辑器 ==========

    /// 打开空白编辑器
    pub fn open_new(&mut self) {
        self.editor.open_new();
    }

    /// 以缓存中的题目打开编辑器，题目不存在时返回 false
    pub fn open_existing(&mut self, id: &str) -> bool {
        match self.cache.get(id) {
            Some(record) => {
                self.editor.open_existing(record);
                true
            }
            None => false,
        }
    }

    pub fn close_editor(&mut self) -> bool {
        self.editor.close()
    }

    /// 提交编辑器并写回缓存
    ///
    /// 新建返回的记录无法放入缓存时（缺少 id 或 id 重复），
    /// 按远程错误处理：草稿恢复到编辑器中，缓存不变
    pub async fn submit_editor(&mut self) -> AppResult<EditorOutcome> {
        self.ensure_mounted()?;
        let known_quizzes = self.cache.quiz_ids();
        let submitted = self.editor.draft().cloned();
        let draft_id = submitted
            .as_ref()
            .and_then(|d| d.id.clone())
            .unwrap_or_default();

        let result = self.editor.submit(&self.store, &known_quizzes).await;
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                if e.is_remote() {
                    self.log_failure("保存", &draft_id, &e.to_string());
                }
                return Err(e);
            }
        };
        self.ensure_mounted()?;

        match &outcome {
            EditorOutcome::Created(record) => {
                if let Err(reason) = self.cache.check_new(&record.id) {
                    let error = AppError::invalid_record("POST /questions", reason);
                    if let Some(draft) = submitted {
                        self.editor.restore(draft, &error);
                    }
                    return Err(self.remote_failure("保存", &draft_id, error));
                }
                self.cache.insert_front(record.clone());
            }
            EditorOutcome::Updated(record) => {
                if record.id != draft_id {
                    warn!("题目 {} 更新后返回的 id 为 {}", draft_id, record.id);
                }
                if !self.cache.replace(&draft_id, record.clone()) {
                    debug!("题目 {} 已不在缓存中，忽略更新结果", draft_id);
                }
            }
        }
        self.rescope_selection();
        Ok(outcome)
    }

    // ========== 失败处理 ==========

    fn remote_failure(&self, action: &str, id: &str, error: AppError) -> AppError {
        warn!("⚠️ {}题目 {} 失败: {}", action, id, error);
        self.log_failure(action, id, &error.to_string());
        error
    }

    fn log_failure(&self, action: &str, id: &str, reason: &str) {
        if let Some(log) = &self.failure_log {
            if let Err(e) = log.record(action, id, reason) {
                warn!("写入失败记录失败: {}", e);
            }
        }
    }
}
