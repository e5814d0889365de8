//! 命令行管理面板
//!
//! 逐行读取指令，交给会话执行，再把结果渲染到终端。
//! 删除前先输出确认提示并读取下一行作为回答。

use crate::clients::QuestionStore;
use crate::command::{Command, FieldUpdate, HELP};
use crate::config::Config;
use crate::error::AppError;
use crate::orchestrator::{bulk, BulkOutcome, DashboardSession};
use crate::render;
use crate::services::FailureLog;
use crate::utils::logging::{log_shutdown, log_startup};
use crate::workflow::EditorOutcome;
use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// 单条指令执行后的去向
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Continue(String),
    Quit,
}

/// 应用主结构
pub struct App<S: QuestionStore> {
    config: Config,
    session: DashboardSession<S>,
}

impl<S: QuestionStore> App<S> {
    /// 初始化应用：写失败记录头，挂载会话并加载题目
    pub async fn initialize(config: Config, store: S) -> Result<Self> {
        log_startup(&config);

        let failure_log = FailureLog::new(&config.failure_log_file);
        failure_log
            .init()
            .with_context(|| format!("无法初始化失败记录: {}", config.failure_log_file))?;

        let session = DashboardSession::mount(store)
            .await
            .context("加载题目列表失败")?
            .with_failure_log(failure_log);

        Ok(Self { config, session })
    }

    pub fn session(&self) -> &DashboardSession<S> {
        &self.session
    }

    /// 从标准输入运行
    pub async fn run(&mut self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        self.run_with(stdin).await
    }

    /// 从任意输入源运行，直到 quit 或输入结束
    pub async fn run_with<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<()> {
        let mut lines = input.lines();
        println!("{}", render::render_list(&self.session));
        println!("输入 help 查看指令");

        while let Some(line) = lines.next_line().await? {
            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(msg) => {
                    println!("{}", msg);
                    continue;
                }
            };

            let confirmed = match self.confirmation_prompt(&command) {
                Some(prompt) => {
                    println!("{} [y/N]", prompt);
                    let answer = lines.next_line().await?.unwrap_or_default();
                    is_yes(&answer)
                }
                None => false,
            };

            match self.execute(command, confirmed).await {
                Step::Continue(output) => println!("{}", output),
                Step::Quit => break,
            }
        }

        self.session.unmount();
        log_shutdown(self.session.cache().len(), &self.config.failure_log_file);
        Ok(())
    }

    /// 需要确认的指令返回提示文本
    pub fn confirmation_prompt(&self, command: &Command) -> Option<String> {
        match command {
            Command::Delete if !self.session.selection().is_empty() => {
                Some(bulk::delete_prompt(self.session.selection().len()))
            }
            Command::DeleteRow(id) if self.session.cache().contains(id) => {
                Some(bulk::delete_prompt(1))
            }
            _ => None,
        }
    }

    /// 执行一条指令
    ///
    /// `confirmed` 只对删除指令有意义
    pub async fn execute(&mut self, command: Command, confirmed: bool) -> Step {
        let mut answer = move |_: &str| confirmed;

        let output = match command {
            Command::Quit => return Step::Quit,
            Command::Help => HELP.to_string(),
            Command::List => render::render_list(&self.session),
            Command::Quizzes => render::render_quizzes(&self.session.quiz_groupings()),
            Command::Search(term) => {
                self.session.set_search(term);
                render::render_list(&self.session)
            }
            Command::Toggle(id) => {
                if !self.session.visible_ids().contains(&id) {
                    format!("题目 #{} 不在当前列表中", id)
                } else {
                    self.session.toggle(&id);
                    render::render_list(&self.session)
                }
            }
            Command::SelectAll => {
                self.session.select_all();
                render::render_list(&self.session)
            }
            Command::ClearSelection => {
                self.session.clear_selection();
                render::render_list(&self.session)
            }
            Command::Duplicate => match self.session.bulk_duplicate().await {
                Ok(outcome) => self.describe_bulk(outcome),
                Err(e) => describe_error(&e),
            },
            Command::Delete => match self.session.bulk_delete(&mut answer).await {
                Ok(outcome) => self.describe_bulk(outcome),
                Err(e) => describe_error(&e),
            },
            Command::DuplicateRow(id) => match self.session.duplicate_one(&id).await {
                Ok(Some(record)) => format!("✓ 已复制为 #{}\n{}", record.id, self.list()),
                Ok(None) => format!("题目 #{} 已不在列表中", id),
                Err(e) => describe_error(&e),
            },
            Command::DeleteRow(id) => match self.session.delete_one(&id, &mut answer).await {
                Ok(true) => format!("✓ 已删除 #{}\n{}", id, self.list()),
                Ok(false) if self.session.cache().contains(&id) => "已取消".to_string(),
                Ok(false) => format!("题目 #{} 已不在列表中", id),
                Err(e) => describe_error(&e),
            },
            Command::New => {
                self.session.open_new();
                render::render_editor(self.session.editor())
            }
            Command::Edit(id) => {
                if self.session.open_existing(&id) {
                    render::render_editor(self.session.editor())
                } else {
                    format!("题目 #{} 已不在列表中", id)
                }
            }
            Command::Set(update) => self.apply_field(update),
            Command::Submit => match self.session.submit_editor().await {
                Ok(EditorOutcome::Created(record)) => {
                    format!("✓ 已创建 #{}\n{}", record.id, self.list())
                }
                Ok(EditorOutcome::Updated(record)) => {
                    format!("✓ 已更新 #{}\n{}", record.id, self.list())
                }
                Err(AppError::Validation(_)) | Err(AppError::Api(_)) => {
                    render::render_editor(self.session.editor())
                }
                Err(e) => describe_error(&e),
            },
            Command::Cancel => {
                if self.session.close_editor() {
                    "已放弃编辑".to_string()
                } else {
                    "编辑器未打开".to_string()
                }
            }
            Command::Refresh => match self.session.refresh().await {
                Ok(count) => format!("✓ 已重新加载 {} 个题目\n{}", count, self.list()),
                Err(e) => describe_error(&e),
            },
        };

        Step::Continue(output)
    }

    fn apply_field(&mut self, update: FieldUpdate) -> String {
        let Some(draft) = self.session.editor_mut().draft_mut() else {
            return "编辑器未打开，先执行 new 或 edit <id>".to_string();
        };

        match update {
            FieldUpdate::Text(text) => draft.question_text = text,
            FieldUpdate::Quiz(quiz_id) => draft.quiz_id = quiz_id,
            FieldUpdate::Points(points) => draft.points = points,
            FieldUpdate::TimeLimit(seconds) => draft.time_limit_seconds = seconds,
            FieldUpdate::Type(question_type) => draft.question_type = question_type,
        }
        render::render_editor(self.session.editor())
    }

    fn describe_bulk(&self, outcome: BulkOutcome) -> String {
        match outcome {
            BulkOutcome::Cancelled => "已取消".to_string(),
            BulkOutcome::Completed(report) => {
                if !report.is_complete_success() {
                    info!("失败详情已写入 {}", self.config.failure_log_file);
                }
                format!("{}\n{}", render::render_report(&report), self.list())
            }
        }
    }

    fn list(&self) -> String {
        render::render_list(&self.session)
    }
}

fn describe_error(error: &AppError) -> String {
    warn!("{}", error);
    format!("❌ {}", error)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes" | "是")
}
