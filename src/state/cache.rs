//! 题目缓存
//!
//! 当前会话内远程题库的有序镜像。顺序即插入顺序：最新创建的记录在最前。
//! 所有修改都是同步的，只在触发它的远程调用返回之后进行。

use crate::models::{QuestionRecord, QuizGrouping};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct QuestionCache {
    records: Vec<QuestionRecord>,
}

impl QuestionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用远程列表整体替换缓存
    ///
    /// 空 id 和重复 id 的记录会被丢弃（保留第一次出现的）
    pub fn load(&mut self, records: Vec<QuestionRecord>) {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(records.len());

        for record in records {
            if record.id.is_empty() {
                warn!("忽略没有 id 的题目: {}", record.question_text);
                continue;
            }
            if !seen.insert(record.id.clone()) {
                warn!("忽略重复的题目 id: {}", record.id);
                continue;
            }
            kept.push(record);
        }

        debug!("缓存已加载 {} 个题目", kept.len());
        self.records = kept;
    }

    /// 插入到最前面
    ///
    /// # 返回
    /// id 为空或已存在时返回 false，缓存不变
    pub fn insert_front(&mut self, record: QuestionRecord) -> bool {
        if let Err(reason) = self.check_new(&record.id) {
            warn!("拒绝缓存题目: {}", reason);
            return false;
        }
        self.records.insert(0, record);
        true
    }

    /// 新记录的 id 能否进入缓存，不能时返回原因
    pub fn check_new(&self, id: &str) -> Result<(), String> {
        if id.is_empty() {
            return Err("缺少 id".to_string());
        }
        if self.contains(id) {
            return Err(format!("id {} 已存在", id));
        }
        Ok(())
    }

    /// 按给定顺序整体插入到最前面，返回实际插入的数量
    pub fn insert_front_many(&mut self, records: Vec<QuestionRecord>) -> usize {
        let mut inserted = 0;
        // 倒序插入，保证结果与给定顺序一致
        for record in records.into_iter().rev() {
            if self.insert_front(record) {
                inserted += 1;
            }
        }
        inserted
    }

    /// 原位替换，id 不存在时返回 false
    pub fn replace(&mut self, id: &str, record: QuestionRecord) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => {
                debug!("替换时未找到题目 {}", id);
                false
            }
        }
    }

    /// 删除单个题目，id 不存在时返回 false
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }

    /// 批量删除，返回实际删除的数量
    pub fn remove_many<S: AsRef<str>>(&mut self, ids: &[S]) -> usize {
        let targets: HashSet<&str> = ids.iter().map(|id| id.as_ref()).collect();
        let before = self.records.len();
        self.records.retain(|r| !targets.contains(r.id.as_str()));
        before - self.records.len()
    }

    pub fn get(&self, id: &str) -> Option<&QuestionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 缓存中出现过的所有测验 id
    pub fn quiz_ids(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.quiz_id.clone()).collect()
    }

    /// 测验分组，按 quiz id 排序，每次调用都重新计算
    pub fn quiz_groupings(&self) -> Vec<QuizGrouping> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.quiz_id.as_str()).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(quiz_id, count)| QuizGrouping::new(quiz_id, count))
            .collect()
    }
}
