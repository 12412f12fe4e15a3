//! 应用构建器

use crate::application::Application;
use crate::settings::ContainerSettings;
use di_abstractions::{Pipeline, TypeScanner, UnresolvedPolicy};
use di_impl::{ComponentCatalog, ContainerRegistry, RouteTable};
use infrastructure_common::{ComponentDescriptor, InfrastructureError, InfrastructureResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// 应用构建器
///
/// 使用建造者模式注册组件、加载配置，并一次性完成容器和路由表的构建
pub struct ApplicationBuilder {
    /// 组件目录
    catalog: ComponentCatalog,
    /// 配置
    settings: ContainerSettings,
    /// 配置文件路径，构建时加载
    settings_file: Option<PathBuf>,
    /// 在配置之上覆盖的根命名空间
    root_namespace: Option<String>,
    /// 在配置之上覆盖的构建流程
    pipeline: Option<Pipeline>,
    /// 在配置之上覆盖的处理策略
    unresolved_policy: Option<UnresolvedPolicy>,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl ApplicationBuilder {
    /// 创建新的应用构建器
    pub fn new() -> Self {
        Self {
            catalog: ComponentCatalog::new(),
            settings: ContainerSettings::default(),
            settings_file: None,
            root_namespace: None,
            pipeline: None,
            unresolved_policy: None,
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
        }
    }

    /// 注册组件描述符
    pub fn register(mut self, descriptor: ComponentDescriptor) -> InfrastructureResult<Self> {
        debug!("注册组件: {}", descriptor.qualified_name());
        self.catalog.register(descriptor)?;
        Ok(self)
    }

    /// 批量注册组件描述符
    pub fn register_all<I>(mut self, descriptors: I) -> InfrastructureResult<Self>
    where
        I: IntoIterator<Item = ComponentDescriptor>,
    {
        self.catalog.register_all(descriptors)?;
        Ok(self)
    }

    /// 使用已经加载好的配置
    pub fn with_settings(mut self, settings: ContainerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// 构建时从配置文件和环境变量加载配置
    pub fn settings_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref();
        info!("使用配置文件: {}", path.display());
        self.settings_file = Some(path.to_path_buf());
        self
    }

    /// 设置扫描的根命名空间
    pub fn root_namespace(mut self, root_namespace: impl Into<String>) -> Self {
        self.root_namespace = Some(root_namespace.into());
        self
    }

    /// 设置构建流程
    pub fn pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    /// 设置无法解析依赖时的处理策略
    pub fn unresolved_policy(mut self, policy: UnresolvedPolicy) -> Self {
        self.unresolved_policy = Some(policy);
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true; // 启用日志初始化
        self
    }

    /// 构建应用
    pub fn build(self) -> InfrastructureResult<Application> {
        // 只有在明确配置了日志时才初始化日志
        if self.logging_enabled {
            self.initialize_logging()?;
        }
        info!("开始构建应用");

        let mut settings = match &self.settings_file {
            Some(path) => ContainerSettings::load(Some(path.as_path()))?,
            None => self.settings,
        };
        if let Some(root_namespace) = self.root_namespace {
            settings.container.root_namespace = root_namespace;
        }
        if let Some(pipeline) = self.pipeline {
            settings.container.pipeline = pipeline;
        }
        if let Some(policy) = self.unresolved_policy {
            settings.container.unresolved_policy = policy;
        }

        let scanner: Arc<dyn TypeScanner> = Arc::new(self.catalog);
        let registry = ContainerRegistry::bootstrap(scanner, &settings.container)?;
        let routes = RouteTable::from_registry(&registry)?;

        let application = Application::new(registry, routes, settings);
        let stats = application.stats();
        info!(
            "应用构建完成: 发现 {} 个类型, 创建 {} 个组件实例, {} 个路由",
            stats.discovered_types, stats.created_beans, stats.routes
        );
        Ok(application)
    }

    /// 初始化日志系统
    fn initialize_logging(&self) -> InfrastructureResult<()> {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(self.logging_config.level)
            .with_target(self.logging_config.show_target)
            .with_thread_ids(self.logging_config.show_thread_ids)
            .with_file(self.logging_config.show_file)
            .with_line_number(self.logging_config.show_line_number);

        if self.logging_config.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .map_err(|e| InfrastructureError::BootstrapFailed {
            message: format!("日志初始化失败: {}", e),
        })?;

        info!("日志系统初始化完成");
        Ok(())
    }
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 覆盖日志级别
    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.level = level;
        self
    }
}
