//! # 依赖注入具体实现
//!
//! 提供组件目录、绑定名称解析器、组件工厂、容器注册表和路由表的具体实现。
//!
//! 启动流程：扫描 → 创建实例 → 注入依赖 → 映射路径。启动完成后注册表和路由表只读。

pub mod binding;
pub mod catalog;
pub mod factory;
mod pipeline;
pub mod registry;
pub mod routing;

pub use binding::CachedBindingResolver;
pub use catalog::ComponentCatalog;
pub use factory::{DefaultBeanFactory, DESIGNATION_THRESHOLD};
pub use registry::ContainerRegistry;
pub use routing::RouteTable;
