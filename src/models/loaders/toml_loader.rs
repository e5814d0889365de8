use crate::models::question::QuestionRecord;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// 种子文件结构
///
/// ```toml
/// [[questions]]
/// id = "1"
/// quizId = "q1"
/// questionText = "What is HTML?"
/// ```
#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    questions: Vec<QuestionRecord>,
}

/// 从 TOML 种子文件加载题目记录
pub async fn load_seed_file(path: &Path) -> Result<Vec<QuestionRecord>> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取种子文件: {}", path.display()))?;

    let seed = parse_seed(&content)
        .with_context(|| format!("无法解析种子文件: {}", path.display()))?;

    tracing::info!("成功加载 {} 个种子题目", seed.len());

    Ok(seed)
}

fn parse_seed(content: &str) -> Result<Vec<QuestionRecord>> {
    let seed: SeedFile = toml::from_str(content)?;
    Ok(seed.questions)
}
