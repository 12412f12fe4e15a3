//! 应用配置
//!
//! 配置文件（TOML/JSON/YAML）与 `LORN_` 前缀的环境变量合并后绑定到 [`ContainerSettings`]

use crate::builder::LoggingConfig;
use di_abstractions::ContainerConfig;
use infrastructure_common::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, error};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "LORN";

/// 环境变量中嵌套键的分隔符，例如 `LORN_CONTAINER__ROOT_NAMESPACE`
pub const ENV_SEPARATOR: &str = "__";

/// 应用配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContainerSettings {
    /// 容器配置
    pub container: ContainerConfig,
    /// 日志配置
    pub logging: LoggingSettings,
}

/// 配置文件中的日志设置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// 日志级别：trace、debug、info、warn、error
    pub level: String,
    /// 是否使用 JSON 格式
    pub json: bool,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            show_target: true,
            show_thread_ids: false,
        }
    }
}

impl LoggingSettings {
    /// 转换为日志配置
    pub fn to_logging_config(&self) -> ConfigResult<LoggingConfig> {
        let level = self
            .level
            .parse::<tracing::Level>()
            .map_err(|_| ConfigError::ValidationError {
                message: format!("无效的日志级别: {}", self.level),
            })?;

        Ok(LoggingConfig {
            level,
            show_target: self.show_target,
            show_thread_ids: self.show_thread_ids,
            json_format: self.json,
            ..LoggingConfig::default()
        })
    }
}

impl ContainerSettings {
    /// 从可选的配置文件和环境变量加载配置
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            debug!("加载配置文件: {}", path.display());
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR),
            )
            .build()
            .map_err(|e| {
                error!("配置构建失败: {}", e);
                ConfigError::ParseError {
                    source: Box::new(e),
                }
            })?;

        let settings: Self = settings.try_deserialize().map_err(|e| {
            error!("配置绑定失败: {}", e);
            ConfigError::ParseError {
                source: Box::new(e),
            }
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// 校验配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.container.max_resolution_depth == 0 {
            return Err(ConfigError::ValidationError {
                message: "container.max_resolution_depth 必须大于 0".to_string(),
            });
        }
        self.logging.to_logging_config().map(|_| ())
    }
}
