//! # Infrastructure Common
//!
//! 依赖注入容器与请求路由共享的基础类型。
//!
//! ## 核心类型
//!
//! - [`TypeInfo`] - 类型身份与绑定声明（契约、别名）
//! - [`ComponentDescriptor`] - 组件的类型化注册描述
//! - [`BeanInstance`] - 容器创建的单例组件实例
//! - [`RequestMapping`] - 控制器的路径映射
//! - 错误类型：[`DependencyError`]、[`ComponentError`]、[`RoutingError`]、[`InfrastructureError`]
//!
//! ## 设计原则
//!
//! - 组件元数据在注册时以类型化的值给出，不依赖运行时反射
//! - 启动完成后所有实例与元数据只读，可跨线程共享

pub mod bean;
pub mod component;
pub mod errors;
pub mod metadata;

pub use bean::*;
pub use component::*;
pub use errors::*;
pub use metadata::*;
