use serde::{Deserialize, Serialize};

/// 复制题目时附加在题干后的标记
pub const COPY_MARKER: &str = " (Copy)";

/// 默认分值
pub const DEFAULT_POINTS: u32 = 1;

/// 默认时间限制（秒）
pub const DEFAULT_TIME_LIMIT_SECONDS: u32 = 60;

/// 最短时间限制（秒）
pub const MIN_TIME_LIMIT_SECONDS: u32 = 10;

/// 题型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// 单选
    #[default]
    Single,
    /// 多选
    Multiple,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Single => "single",
            QuestionType::Multiple => "multiple",
        }
    }
}

impl std::str::FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(QuestionType::Single),
            "multiple" => Ok(QuestionType::Multiple),
            other => Err(format!("未知题型: {}", other)),
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

fn default_points() -> u32 {
    DEFAULT_POINTS
}

fn default_time_limit() -> u32 {
    DEFAULT_TIME_LIMIT_SECONDS
}

/// 题目记录
///
/// `id` 由远程题库分配，本地缓存中的记录必定带有非空 `id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: String,
    pub quiz_id: String,
    pub question_text: String,
    #[serde(default = "default_points")]
    pub points: u32,
    #[serde(default = "default_time_limit")]
    pub time_limit_seconds: u32,
    #[serde(default)]
    pub question_type: QuestionType,
}

impl QuestionRecord {
    /// 由远程分配的 id 和提交内容组装记录
    pub fn from_payload(id: impl Into<String>, payload: QuestionPayload) -> Self {
        Self {
            id: id.into(),
            quiz_id: payload.quiz_id,
            question_text: payload.question_text,
            points: payload.points,
            time_limit_seconds: payload.time_limit_seconds,
            question_type: payload.question_type,
        }
    }

    /// 提取可提交的字段（不含 id）
    pub fn payload(&self) -> QuestionPayload {
        QuestionPayload {
            question_text: self.question_text.clone(),
            quiz_id: self.quiz_id.clone(),
            points: self.points,
            time_limit_seconds: self.time_limit_seconds,
            question_type: self.question_type,
        }
    }

    /// 生成副本的提交内容：清除 id，题干追加复制标记
    pub fn duplicate_payload(&self) -> QuestionPayload {
        let mut payload = self.payload();
        payload.question_text.push_str(COPY_MARKER);
        payload
    }
}

/// 创建/更新请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    pub question_text: String,
    pub quiz_id: String,
    pub points: u32,
    pub time_limit_seconds: u32,
    pub question_type: QuestionType,
}

impl Default for QuestionPayload {
    fn default() -> Self {
        Self {
            question_text: String::new(),
            quiz_id: String::new(),
            points: DEFAULT_POINTS,
            time_limit_seconds: DEFAULT_TIME_LIMIT_SECONDS,
            question_type: QuestionType::Single,
        }
    }
}

/// 测验分组（从缓存派生的只读视图）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizGrouping {
    pub quiz_id: String,
    pub label: String,
    pub question_count: usize,
}

impl QuizGrouping {
    pub fn new(quiz_id: impl Into<String>, question_count: usize) -> Self {
        let quiz_id = quiz_id.into();
        Self {
            label: format!("测验 {}", quiz_id),
            quiz_id,
            question_count,
        }
    }
}

impl std::fmt::Display for QuizGrouping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} 题)", self.label, self.question_count)
    }
}
