//! 选择状态
//!
//! 记录被标记为批量操作的题目 id，按选中顺序保存。
//! 批量复制按这个顺序插入新记录。

use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    ids: Vec<String>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 切换单个 id 的选中状态
    ///
    /// # 返回
    /// 切换后是否处于选中状态
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(pos) = self.ids.iter().position(|s| s == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    /// 全选切换
    ///
    /// 当前选择恰好等于可见集合时清空，否则设为可见集合。
    /// 作用范围是过滤后的可见记录，而不是整个缓存。
    pub fn select_all(&mut self, visible_ids: &[String]) {
        if self.equals_set(visible_ids) {
            self.clear();
        } else {
            self.set(visible_ids);
        }
    }

    /// 直接设定选择（去重，保持给定顺序）
    pub fn set(&mut self, ids: &[String]) {
        let mut seen = HashSet::new();
        self.ids = ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// 丢弃不在可见集合中的 id
    ///
    /// # 返回
    /// 被丢弃的数量
    pub fn retain_visible(&mut self, visible_ids: &[String]) -> usize {
        let visible: HashSet<&str> = visible_ids.iter().map(String::as_str).collect();
        let before = self.ids.len();
        self.ids.retain(|id| visible.contains(id.as_str()));
        before - self.ids.len()
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|s| s != id);
        self.ids.len() != before
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn equals_set(&self, other: &[String]) -> bool {
        let mine: HashSet<&str> = self.ids.iter().map(String::as_str).collect();
        let theirs: HashSet<&str> = other.iter().map(String::as_str).collect();
        mine == theirs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_toggle() {
        let mut selection = SelectionTracker::new();
        assert!(selection.toggle("1"));
        assert!(selection.toggle("2"));
        assert!(!selection.toggle("1"));
        assert_eq!(selection.ids(), &ids(&["2"])[..]);
    }

    #[test]
    fn test_select_all_toggle_law() {
        let visible = ids(&["1", "2", "3"]);
        let mut selection = SelectionTracker::new();

        selection.select_all(&visible);
        assert_eq!(selection.len(), 3);
        selection.select_all(&visible);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_select_all_from_partial_selects_everything_visible() {
        let visible = ids(&["1", "2", "3"]);
        let mut selection = SelectionTracker::new();
        selection.toggle("2");

        selection.select_all(&visible);
        assert_eq!(selection.ids(), &visible[..]);
    }

    #[test]
    fn test_select_all_with_empty_view_clears() {
        let mut selection = SelectionTracker::new();
        selection.select_all(&[]);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_retain_visible_drops_stale_ids() {
        let mut selection = SelectionTracker::new();
        selection.set(&ids(&["1", "2", "3"]));

        let dropped = selection.retain_visible(&ids(&["3", "1"]));
        assert_eq!(dropped, 1);
        assert_eq!(selection.ids(), &ids(&["1", "3"])[..]);
    }

    #[test]
    fn test_set_dedupes() {
        let mut selection = SelectionTracker::new();
        selection.set(&ids(&["1", "1", "2"]));
        assert_eq!(selection.len(), 2);
    }
}
