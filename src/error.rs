use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 本地校验错误（提交前）
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 远程题库调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 业务流程错误
    #[error("业务错误: {0}")]
    Business(#[from] BusinessError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// 编辑器提交前的本地校验错误
///
/// 只在本地产生，不会触发任何网络请求
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 题干为空（去除首尾空白后）
    #[error("题干不能为空")]
    EmptyQuestionText,
    /// 未选择测验
    #[error("必须选择所属测验")]
    EmptyQuizId,
    /// 测验不在已知分组中
    #[error("测验 {quiz_id} 不存在")]
    UnknownQuiz { quiz_id: String },
    /// 分值必须为正整数
    #[error("分值必须大于 0 (当前: {points})")]
    InvalidPoints { points: u32 },
    /// 时间限制过短
    #[error("时间限制至少 {min} 秒 (当前: {seconds})")]
    TimeLimitTooShort { seconds: u32, min: u32 },
}

/// 远程题库调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// API 返回错误响应
    #[error("API返回错误响应 ({endpoint}): status={status}, message={message:?}")]
    BadResponse {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// JSON 解析失败
    #[error("JSON解析失败 ({endpoint}): {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 服务不可用
    #[error("服务不可用 ({endpoint}): {reason}")]
    Unavailable { endpoint: String, reason: String },
    /// id 无法作为单个路径段发送
    #[error("无效的题目 id: {id:?}")]
    InvalidId { id: String },
    /// 返回的记录不符合约定（缺少 id、id 重复等）
    #[error("返回的题目无效 ({endpoint}): {reason}")]
    InvalidRecord { endpoint: String, reason: String },
}

/// 业务流程错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusinessError {
    /// 批量操作需要非空选择
    #[error("没有选中任何题目")]
    EmptySelection,
    /// 编辑器未处于打开状态
    #[error("编辑器未打开")]
    EditorNotOpen,
    /// 会话已卸载，远程结果被丢弃
    #[error("会话已关闭，结果已丢弃")]
    SessionClosed,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件解析失败
    #[error("配置文件 {path} 解析失败: {source}")]
    ParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 未知的存储模式
    #[error("未知的存储模式: {value} (可选: http, memory)")]
    UnknownStoreMode { value: String },
    /// API 地址无法解析
    #[error("无效的 API 地址 {value}: {reason}")]
    InvalidBaseUrl { value: String, reason: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建API请求失败错误
    pub fn api_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建服务不可用错误
    pub fn unavailable(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Api(ApiError::Unavailable {
            endpoint: endpoint.into(),
            reason: reason.into(),
        })
    }

    /// 创建返回记录无效错误
    pub fn invalid_record(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Api(ApiError::InvalidRecord {
            endpoint: endpoint.into(),
            reason: reason.into(),
        })
    }

    /// 是否为本地校验错误
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    /// 是否为远程调用错误
    pub fn is_remote(&self) -> bool {
        matches!(self, AppError::Api(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
