//! 远程题库接口
//!
//! 远程题库是题目的权威来源。本地缓存只在调用成功返回后才更新。
//! 调用不带幂等键，模糊失败后重试可能产生重复记录。

use crate::error::AppResult;
use crate::models::{QuestionPayload, QuestionRecord};

/// 远程题库
#[allow(async_fn_in_trait)]
pub trait QuestionStore {
    /// 获取全部题目
    async fn list_all(&self) -> AppResult<Vec<QuestionRecord>>;

    /// 创建题目，返回带有服务端 id 的记录
    async fn create(&self, payload: &QuestionPayload) -> AppResult<QuestionRecord>;

    /// 更新题目，返回服务端规范化后的记录
    async fn update(&self, id: &str, payload: &QuestionPayload) -> AppResult<QuestionRecord>;

    /// 删除题目
    async fn delete(&self, id: &str) -> AppResult<()>;
}
