//! # Question Admin
//!
//! 题目管理面板：在本地缓存中镜像远程题库，支持搜索、多选、
//! 批量复制/删除，以及通过编辑器新建和修改单个题目。
//!
//! ## 架构设计
//!
//! ### ① 接入层（Clients）
//! - `clients/` - 远程题库接口 `QuestionStore`
//! - `HttpQuestionStore` - JSON REST 实现
//! - `MemoryQuestionStore` - 进程内实现（离线模式）
//!
//! ### ② 状态层（State）
//! - `state/cache` - 题目缓存，按插入顺序排列
//! - `state/filter` - 搜索过滤
//! - `state/selection` - 批量操作的选择
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/editor` - 单个题目的新建/编辑状态机
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/bulk` - 批量复制/删除，逐个 id 记录成败
//! - `orchestrator/dashboard` - 会话上下文，负责远程调用后的缓存写回
//!
//! ### ⑤ 界面（App）
//! - `app` / `command` / `render` - 命令行管理面板

pub mod app;
pub mod clients;
pub mod command;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod render;
pub mod services;
pub mod state;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use clients::{HttpQuestionStore, MemoryQuestionStore, QuestionStore};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{QuestionPayload, QuestionRecord, QuestionType, QuizGrouping};
pub use orchestrator::{BulkOutcome, BulkReport, DashboardSession};
pub use workflow::{EditorOutcome, RecordEditor};
