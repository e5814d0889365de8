//! 题目编辑器 - 流程层
//!
//! 单次编辑/创建的短生命周期状态机：
//!
//! ```text
//! Closed → Open(draft) → Submitting → Closed            (成功)
//!                                   → Open(draft, error) (校验或远程失败)
//! ```
//!
//! 编辑器只负责产生校验后的请求并调用远程题库；
//! 返回的规范记录交给调用方写回缓存。

use crate::clients::QuestionStore;
use crate::error::{AppError, AppResult, BusinessError, ValidationError};
use crate::models::{
    QuestionPayload, QuestionRecord, QuestionType, DEFAULT_POINTS, DEFAULT_TIME_LIMIT_SECONDS,
    MIN_TIME_LIMIT_SECONDS,
};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// 编辑中的草稿
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    /// 编辑已有题目时保留其 id，用于区分更新与创建
    pub id: Option<String>,
    pub quiz_id: String,
    pub question_text: String,
    pub points: u32,
    pub time_limit_seconds: u32,
    pub question_type: QuestionType,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            id: None,
            quiz_id: String::new(),
            question_text: String::new(),
            points: DEFAULT_POINTS,
            time_limit_seconds: DEFAULT_TIME_LIMIT_SECONDS,
            question_type: QuestionType::Single,
        }
    }
}

impl From<&QuestionRecord> for Draft {
    fn from(record: &QuestionRecord) -> Self {
        Self {
            id: Some(record.id.clone()),
            quiz_id: record.quiz_id.clone(),
            question_text: record.question_text.clone(),
            points: record.points,
            time_limit_seconds: record.time_limit_seconds,
            question_type: record.question_type,
        }
    }
}

impl Draft {
    /// 本地校验
    ///
    /// `known_quizzes` 为空时不检查测验是否存在（缓存为空时无从校验）
    pub fn validate(&self, known_quizzes: &BTreeSet<String>) -> Result<(), ValidationError> {
        if self.question_text.trim().is_empty() {
            return Err(ValidationError::EmptyQuestionText);
        }
        if self.quiz_id.trim().is_empty() {
            return Err(ValidationError::EmptyQuizId);
        }
        if !known_quizzes.is_empty() && !known_quizzes.contains(&self.quiz_id) {
            return Err(ValidationError::UnknownQuiz {
                quiz_id: self.quiz_id.clone(),
            });
        }
        if self.points == 0 {
            return Err(ValidationError::InvalidPoints {
                points: self.points,
            });
        }
        if self.time_limit_seconds < MIN_TIME_LIMIT_SECONDS {
            return Err(ValidationError::TimeLimitTooShort {
                seconds: self.time_limit_seconds,
                min: MIN_TIME_LIMIT_SECONDS,
            });
        }
        Ok(())
    }

    pub fn payload(&self) -> QuestionPayload {
        QuestionPayload {
            question_text: self.question_text.clone(),
            quiz_id: self.quiz_id.clone(),
            points: self.points,
            time_limit_seconds: self.time_limit_seconds,
            question_type: self.question_type,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

/// 编辑器状态
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Closed,
    Open {
        draft: Draft,
        /// 上一次提交失败的原因
        error: Option<String>,
    },
    Submitting(Draft),
}

/// 提交成功的结果，调用方据此写回缓存
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorOutcome {
    /// 新建：插入到缓存最前
    Created(QuestionRecord),
    /// 更新：替换缓存中同 id 的记录
    Updated(QuestionRecord),
}

impl EditorOutcome {
    pub fn record(&self) -> &QuestionRecord {
        match self {
            EditorOutcome::Created(record) | EditorOutcome::Updated(record) => record,
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordEditor {
    state: EditorState,
}

impl RecordEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 打开空白草稿（新建）
    pub fn open_new(&mut self) {
        self.state = EditorState::Open {
            draft: Draft::default(),
            error: None,
        };
    }

    /// 以已有题目打开（编辑）
    pub fn open_existing(&mut self, record: &QuestionRecord) {
        self.state = EditorState::Open {
            draft: Draft::from(record),
            error: None,
        };
    }

    /// 关闭并丢弃草稿
    ///
    /// # 返回
    /// 是否确实丢弃了一个草稿
    pub fn close(&mut self) -> bool {
        let was_open = matches!(self.state, EditorState::Open { .. });
        if was_open {
            self.state = EditorState::Closed;
        }
        was_open
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, EditorState::Open { .. })
    }

    pub fn draft(&self) -> Option<&Draft> {
        match &self.state {
            EditorState::Open { draft, .. } | EditorState::Submitting(draft) => Some(draft),
            EditorState::Closed => None,
        }
    }

    /// 可修改的草稿，只在 Open 状态下可用
    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        match &mut self.state {
            EditorState::Open { draft, .. } => Some(draft),
            _ => None,
        }
    }

    pub fn last_error(&self) -> Option<&str> {
        match &self.state {
            EditorState::Open { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    /// 提交草稿
    ///
    /// 草稿带 id 时调用更新，否则调用创建。
    /// 校验失败不会访问远程题库；任何失败都保持 Open 状态且草稿不变。
    pub async fn submit<S: QuestionStore>(
        &mut self,
        store: &S,
        known_quizzes: &BTreeSet<String>,
    ) -> AppResult<EditorOutcome> {
        let draft = match std::mem::take(&mut self.state) {
            EditorState::Open { draft, .. } => draft,
            other => {
                self.state = other;
                return Err(BusinessError::EditorNotOpen.into());
            }
        };

        if let Err(e) = draft.validate(known_quizzes) {
            warn!("⚠️ 草稿未通过校验: {}", e);
            self.state = EditorState::Open {
                draft,
                error: Some(e.to_string()),
            };
            return Err(e.into());
        }

        let id = draft.id.clone();
        let payload = draft.payload();
        self.state = EditorState::Submitting(draft);

        let result = match id {
            Some(id) => store
                .update(&id, &payload)
                .await
                .map(EditorOutcome::Updated),
            None => store.create(&payload).await.map(EditorOutcome::Created),
        };

        match result {
            Ok(outcome) => {
                info!("✓ 题目 {} 已保存", outcome.record().id);
                self.state = EditorState::Closed;
                Ok(outcome)
            }
            Err(e) => {
                warn!("⚠️ 保存题目失败: {}", e);
                self.reopen_with_error(&e);
                Err(e)
            }
        }
    }

    /// 以给定草稿重新打开，并记录失败原因
    pub fn restore(&mut self, draft: Draft, error: &AppError) {
        self.state = EditorState::Open {
            draft,
            error: Some(error.to_string()),
        };
    }

    fn reopen_with_error(&mut self, error: &AppError) {
        if let EditorState::Submitting(draft) = std::mem::take(&mut self.state) {
            self.state = EditorState::Open {
                draft,
                error: Some(error.to_string()),
            };
        }
    }
}
