#![allow(dead_code)]

use question_admin::clients::MemoryQuestionStore;
use question_admin::error::AppResult;
use question_admin::orchestrator::Lifecycle;
use question_admin::{QuestionPayload, QuestionRecord, QuestionStore};
use std::sync::Mutex;

pub fn record(id: &str, quiz_id: &str, text: &str) -> QuestionRecord {
    QuestionRecord::from_payload(
        id,
        QuestionPayload {
            question_text: text.to_string(),
            quiz_id: quiz_id.to_string(),
            ..Default::default()
        },
    )
}

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

pub fn cache_ids<S: QuestionStore>(session: &question_admin::DashboardSession<S>) -> Vec<String> {
    session
        .cache()
        .records()
        .iter()
        .map(|r| r.id.clone())
        .collect()
}

/// 在远程调用返回前卸载会话的题库，用于模拟调用进行中页面被关闭
pub struct UnmountingStore {
    pub inner: MemoryQuestionStore,
    lifecycle: Mutex<Option<Lifecycle>>,
}

impl UnmountingStore {
    pub fn new(inner: MemoryQuestionStore) -> Self {
        Self {
            inner,
            lifecycle: Mutex::new(None),
        }
    }

    pub fn arm(&self, lifecycle: Lifecycle) {
        *self.lifecycle.lock().unwrap() = Some(lifecycle);
    }

    fn fire(&self) {
        if let Some(lifecycle) = self.lifecycle.lock().unwrap().as_ref() {
            lifecycle.unmount();
        }
    }
}

impl QuestionStore for UnmountingStore {
    async fn list_all(&self) -> AppResult<Vec<QuestionRecord>> {
        let result = self.inner.list_all().await;
        self.fire();
        result
    }

    async fn create(&self, payload: &QuestionPayload) -> AppResult<QuestionRecord> {
        let result = self.inner.create(payload).await;
        self.fire();
        result
    }

    async fn update(&self, id: &str, payload: &QuestionPayload) -> AppResult<QuestionRecord> {
        let result = self.inner.update(id, payload).await;
        self.fire();
        result
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.inner.delete(id).await;
        self.fire();
        result
    }
}

/// 把创建和更新返回的记录 id 改写为固定值，用于模拟不守约定的服务端
pub struct RewritingStore {
    pub inner: MemoryQuestionStore,
    id: String,
}

impl RewritingStore {
    pub fn new(inner: MemoryQuestionStore, id: &str) -> Self {
        Self {
            inner,
            id: id.to_string(),
        }
    }

    fn rewrite(&self, result: AppResult<QuestionRecord>) -> AppResult<QuestionRecord> {
        result.map(|record| QuestionRecord {
            id: self.id.clone(),
            ..record
        })
    }
}

impl QuestionStore for RewritingStore {
    async fn list_all(&self) -> AppResult<Vec<QuestionRecord>> {
        self.inner.list_all().await
    }

    async fn create(&self, payload: &QuestionPayload) -> AppResult<QuestionRecord> {
        self.rewrite(self.inner.create(payload).await)
    }

    async fn update(&self, id: &str, payload: &QuestionPayload) -> AppResult<QuestionRecord> {
        self.rewrite(self.inner.update(id, payload).await)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.inner.delete(id).await
    }
}
