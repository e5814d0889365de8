//! 命令行指令解析
//!
//! 每行一条指令，对应管理面板上的一个按钮或输入框

use crate::models::QuestionType;

/// 编辑器字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Text(String),
    Quiz(String),
    Points(u32),
    TimeLimit(u32),
    Type(QuestionType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 显示当前可见列表
    List,
    /// 设置搜索词（空为清除）
    Search(String),
    Toggle(String),
    SelectAll,
    ClearSelection,
    /// 批量复制
    Duplicate,
    /// 批量删除
    Delete,
    DuplicateRow(String),
    DeleteRow(String),
    New,
    Edit(String),
    Set(FieldUpdate),
    Submit,
    Cancel,
    Refresh,
    Quizzes,
    Help,
    Quit,
}

pub const HELP: &str = "\
可用指令:
  list                     显示列表
  search [词]              搜索题干（不带参数则清除）
  toggle <id>              选中/取消选中
  all                      全选可见题目（再次执行取消）
  clear                    清空选择
  dup | del                批量复制 / 批量删除
  dup <id> | del <id>      复制 / 删除单个题目
  new | edit <id>          新建 / 编辑题目
  set text|quiz|points|time|type <值>
  submit | cancel          提交 / 放弃编辑
  refresh                  重新加载
  quizzes                  显示测验分组
  quit                     退出";

impl Command {
    /// 解析一行输入
    ///
    /// # 返回
    /// 空行返回 `Ok(None)`
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "list" | "ls" => Command::List,
            "search" | "/" => Command::Search(rest.to_string()),
            "toggle" | "t" => Command::Toggle(require_arg(head, rest)?),
            "all" => Command::SelectAll,
            "clear" => Command::ClearSelection,
            "dup" | "duplicate" if rest.is_empty() => Command::Duplicate,
            "dup" | "duplicate" => Command::DuplicateRow(rest.to_string()),
            "del" | "delete" if rest.is_empty() => Command::Delete,
            "del" | "delete" => Command::DeleteRow(rest.to_string()),
            "new" => Command::New,
            "edit" => Command::Edit(require_arg(head, rest)?),
            "set" => Command::Set(parse_field(rest)?),
            "submit" => Command::Submit,
            "cancel" => Command::Cancel,
            "refresh" => Command::Refresh,
            "quizzes" => Command::Quizzes,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("未知指令: {}（输入 help 查看帮助）", other)),
        };

        Ok(Some(command))
    }
}

fn require_arg(head: &str, rest: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("{} 需要一个题目 id", head))
    } else {
        Ok(rest.to_string())
    }
}

fn parse_field(rest: &str) -> Result<FieldUpdate, String> {
    let (field, value) = match rest.split_once(char::is_whitespace) {
        Some((field, value)) => (field, value.trim()),
        None => (rest, ""),
    };

    let number = |value: &str| {
        value
            .parse::<u32>()
            .map_err(|_| format!("{} 需要一个非负整数，收到: {:?}", field, value))
    };

    match field.to_ascii_lowercase().as_str() {
        // 题干允许为空，由提交时的校验拦截
        "text" => Ok(FieldUpdate::Text(value.to_string())),
        "quiz" => Ok(FieldUpdate::Quiz(value.to_string())),
        "points" => Ok(FieldUpdate::Points(number(value)?)),
        "time" => Ok(FieldUpdate::TimeLimit(number(value)?)),
        "type" => Ok(FieldUpdate::Type(value.parse()?)),
        "" => Err("set 需要字段名".to_string()),
        other => Err(format!("未知字段: {}", other)),
    }
}
