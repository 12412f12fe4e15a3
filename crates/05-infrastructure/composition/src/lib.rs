//! # 组合层
//!
//! 负责把组件目录、配置和日志组合成一个完整的、可运行的应用。
//!
//! ## 主要功能
//!
//! - **应用构建器**: 使用建造者模式注册组件并构建容器与路由表
//! - **配置加载**: 配置文件与 `LORN_` 前缀的环境变量
//! - **请求分发**: 把路由结果转换为带状态码的响应
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_composition::{ApplicationBuilder, DispatchRequest, LoggingConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let application = ApplicationBuilder::new()
//!         .settings_file("config/lorn.toml")
//!         .with_logging(LoggingConfig::development())
//!         .build()?;
//!
//!     let response = application.dispatch(&DispatchRequest::new("GET", "/users"));
//!     println!("{} {}", response.status, response.body);
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod builder;
pub mod dispatcher;
pub mod settings;


// 重新导出主要类型
pub use application::Application;
pub use builder::{ApplicationBuilder, LoggingConfig};
pub use dispatcher::{DispatchRequest, DispatchResponse, CONTENT_TYPE_HTML};
pub use settings::{ContainerSettings, LoggingSettings};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
