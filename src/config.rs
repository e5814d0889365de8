use crate::error::{AppResult, ConfigError, FileError};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

/// 远程题库的实现方式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    /// HTTP JSON 接口
    #[default]
    Http,
    /// 进程内存储（离线演示）
    Memory,
}

impl FromStr for StoreMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(StoreMode::Http),
            "memory" => Ok(StoreMode::Memory),
            _ => Err(ConfigError::UnknownStoreMode {
                value: s.to_string(),
            }),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 题库 API 地址
    pub api_base_url: String,
    /// 题库 API 令牌（为空则不发送）
    pub api_token: String,
    /// 存储模式
    pub store_mode: StoreMode,
    /// 内存模式下的种子文件
    pub seed_file: Option<String>,
    /// 失败记录文件
    pub failure_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".to_string(),
            api_token: String::new(),
            store_mode: StoreMode::Http,
            seed_file: None,
            failure_log_file: "failures.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 加载配置：先读 `QUESTION_ADMIN_CONFIG` 指定的文件（如有），再用环境变量覆盖
    pub fn load() -> AppResult<Self> {
        let base = match std::env::var("QUESTION_ADMIN_CONFIG") {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    /// 从 TOML 文件读取，缺失的键使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| FileError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    fn from_toml_str(content: &str, path: &str) -> AppResult<Self> {
        let config = toml::from_str(content).map_err(|source| ConfigError::ParseFailed {
            path: path.to_string(),
            source,
        })?;
        Ok(config)
    }

    fn with_env_overrides(self) -> Self {
        Self {
            api_base_url: std::env::var("QUESTION_API_BASE_URL").unwrap_or(self.api_base_url),
            api_token: std::env::var("QUESTION_API_TOKEN").unwrap_or(self.api_token),
            store_mode: std::env::var("STORE_MODE")
                .ok()
                .and_then(|v| match v.parse::<StoreMode>() {
                    Ok(mode) => Some(mode),
                    Err(e) => {
                        warn!("{}，使用 {:?}", e, self.store_mode);
                        None
                    }
                })
                .unwrap_or(self.store_mode),
            seed_file: std::env::var("SEED_FILE").ok().or(self.seed_file),
            failure_log_file: std::env::var("FAILURE_LOG_FILE").unwrap_or(self.failure_log_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.verbose_logging),
        }
    }
}
