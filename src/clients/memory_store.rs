//! 进程内题库
//!
//! 离线模式下代替 HTTP 题库，id 按递增整数分配。
//! 支持按 id 或题干注入失败，并记录每一次调用，便于检查远程交互。

use crate::clients::question_store::QuestionStore;
use crate::error::{AppError, AppResult};
use crate::models::{QuestionPayload, QuestionRecord};
use std::collections::HashSet;
use std::sync::Mutex;
use tracing::debug;

/// 一次远程调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    ListAll,
    Create(QuestionPayload),
    Update(String, QuestionPayload),
    Delete(String),
}

#[derive(Debug, Default)]
struct Inner {
    records: Vec<QuestionRecord>,
    /// 下一个可分配的 id，`None` 表示已耗尽
    next_id: Option<u64>,
    failing_ids: HashSet<String>,
    failing_texts: HashSet<String>,
    unavailable: bool,
    calls: Vec<StoreCall>,
}

#[derive(Debug)]
pub struct MemoryQuestionStore {
    inner: Mutex<Inner>,
}

impl Default for MemoryQuestionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryQuestionStore {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// 用种子数据创建，新 id 从现有最大数字 id 之后开始
    pub fn with_records(records: Vec<QuestionRecord>) -> Self {
        let next_id = records
            .iter()
            .filter_map(|r| r.id.parse::<u64>().ok())
            .max()
            .map_or(Some(1), |max| max.checked_add(1));

        Self {
            inner: Mutex::new(Inner {
                records,
                next_id,
                ..Default::default()
            }),
        }
    }

    /// 该 id 的更新/删除调用将失败
    pub fn fail_for_id(&self, id: impl Into<String>) {
        self.lock().failing_ids.insert(id.into());
    }

    /// 题干等于该文本的创建调用将失败
    pub fn fail_create_for_text(&self, text: impl Into<String>) {
        self.lock().failing_texts.insert(text.into());
    }

    /// 所有调用都失败
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// 清除所有注入的失败
    pub fn clear_failures(&self) {
        let mut inner = self.lock();
        inner.failing_ids.clear();
        inner.failing_texts.clear();
        inner.unavailable = false;
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    pub fn snapshot(&self) -> Vec<QuestionRecord> {
        self.lock().records.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // 锁内不会 panic，中毒后继续使用内部数据
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Inner {
    fn check_available(&self, endpoint: &str) -> AppResult<()> {
        if self.unavailable {
            return Err(AppError::unavailable(endpoint, "题库不可用"));
        }
        Ok(())
    }
}

impl QuestionStore for MemoryQuestionStore {
    async fn list_all(&self) -> AppResult<Vec<QuestionRecord>> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::ListAll);
        inner.check_available("GET /questions")?;
        Ok(inner.records.clone())
    }

    async fn create(&self, payload: &QuestionPayload) -> AppResult<QuestionRecord> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::Create(payload.clone()));
        inner.check_available("POST /questions")?;

        if inner.failing_texts.contains(&payload.question_text) {
            return Err(AppError::unavailable("POST /questions", "创建被拒绝"));
        }

        let Some(id) = inner.next_id else {
            return Err(AppError::unavailable("POST /questions", "可分配的 id 已耗尽"));
        };
        inner.next_id = id.checked_add(1);
        let record = QuestionRecord::from_payload(id.to_string(), payload.clone());
        inner.records.insert(0, record.clone());
        debug!("内存题库创建题目 {}", record.id);
        Ok(record)
    }

    async fn update(&self, id: &str, payload: &QuestionPayload) -> AppResult<QuestionRecord> {
        let endpoint = format!("PUT /questions/{}", id);
        let mut inner = self.lock();
        inner
            .calls
            .push(StoreCall::Update(id.to_string(), payload.clone()));
        inner.check_available(&endpoint)?;

        if inner.failing_ids.contains(id) {
            return Err(AppError::unavailable(endpoint, "更新被拒绝"));
        }

        let record = QuestionRecord::from_payload(id, payload.clone());
        match inner.records.iter_mut().find(|r| r.id == id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(record)
            }
            None => Err(AppError::unavailable(endpoint, "题目不存在")),
        }
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let endpoint = format!("DELETE /questions/{}", id);
        let mut inner = self.lock();
        inner.calls.push(StoreCall::Delete(id.to_string()));
        inner.check_available(&endpoint)?;

        if inner.failing_ids.contains(id) {
            return Err(AppError::unavailable(endpoint, "删除被拒绝"));
        }

        let before = inner.records.len();
        inner.records.retain(|r| r.id != id);
        if inner.records.len() == before {
            return Err(AppError::unavailable(endpoint, "题目不存在"));
        }
        Ok(())
    }
}
