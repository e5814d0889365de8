use anyhow::{Context, Result};
use question_admin::clients::{HttpQuestionStore, MemoryQuestionStore};
use question_admin::config::{Config, StoreMode};
use question_admin::models::load_seed_file;
use question_admin::{logger, App};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logger::init(config.verbose_logging);

    match config.store_mode {
        StoreMode::Http => {
            let store = HttpQuestionStore::new(&config)?;
            App::initialize(config, store).await?.run().await?;
        }
        StoreMode::Memory => {
            let seed = match &config.seed_file {
                Some(path) => load_seed_file(Path::new(path))
                    .await
                    .with_context(|| format!("加载种子数据失败: {}", path))?,
                None => Vec::new(),
            };
            let store = MemoryQuestionStore::with_records(seed);
            App::initialize(config, store).await?.run().await?;
        }
    }

    Ok(())
}
