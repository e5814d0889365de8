//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `dashboard` - 管理面板会话
//! - 持有远程题库、缓存、选择、搜索词和编辑器
//! - 管理挂载/卸载生命周期，卸载后丢弃远程结果
//! - 单行复制/删除、编辑器提交后的缓存写回
//!
//! ### `bulk` - 批量操作协调器
//! - 按选择并发调用远程题库
//! - 逐个 id 记录成败，只写回确认成功的结果
//!
//! ## 层次关系
//!
//! ```text
//! app (命令行界面)
//!     ↓
//! orchestrator::dashboard (会话上下文)
//!     ↓
//! orchestrator::bulk / workflow::editor
//!     ↓
//! state (cache / filter / selection)  +  clients (QuestionStore)
//! ```

pub mod bulk;
pub mod dashboard;

pub use bulk::{BulkAction, BulkFailure, BulkReport};
pub use dashboard::{BulkOutcome, Confirm, DashboardSession, Lifecycle};
