//! 本地状态层
//!
//! - `cache` - 题目缓存，远程题库在本会话内的有序镜像
//! - `filter` - 搜索过滤，从缓存派生可见子集
//! - `selection` - 批量操作的选择状态

pub mod cache;
pub mod filter;
pub mod selection;

pub use cache::QuestionCache;
pub use selection::SelectionTracker;
