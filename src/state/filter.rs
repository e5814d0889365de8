use crate::models::QuestionRecord;
use regex::{Regex, RegexBuilder};

/// 搜索过滤
///
/// 对题干做不区分大小写的子串匹配。空白搜索词返回全部记录。
/// 结果保持缓存顺序，不修改缓存，也不跨调用缓存结果。
pub fn apply<'a>(records: &'a [QuestionRecord], search_term: &str) -> Vec<&'a QuestionRecord> {
    if search_term.trim().is_empty() {
        return records.iter().collect();
    }

    let matcher = Matcher::new(search_term);
    records
        .iter()
        .filter(|r| matcher.is_match(&r.question_text))
        .collect()
}

/// 过滤后可见记录的 id，顺序与 [`apply`] 一致
pub fn visible_ids(records: &[QuestionRecord], search_term: &str) -> Vec<String> {
    apply(records, search_term)
        .into_iter()
        .map(|r| r.id.clone())
        .collect()
}

enum Matcher {
    Pattern(Regex),
    // 极长的搜索词可能超出正则大小限制
    Lowercase(String),
}

impl Matcher {
    fn new(term: &str) -> Self {
        match RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        {
            Ok(re) => Matcher::Pattern(re),
            Err(_) => Matcher::Lowercase(term.to_lowercase()),
        }
    }

    fn is_match(&self, text: &str) -> bool {
        match self {
            Matcher::Pattern(re) => re.is_match(text),
            Matcher::Lowercase(term) => text.to_lowercase().contains(term.as_str()),
        }
    }
}
