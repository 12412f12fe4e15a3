//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义类型扫描、绑定名称解析、组件创建和路由解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`TypeScanner`] - 类型扫描器接口
//! - [`BindingResolver`] - 绑定名称解析器接口
//! - [`BeanFactory`] - 组件工厂接口
//! - [`ComponentRegistry`] - 组件注册表接口
//! - [`RouteResolver`] - 路由解析器接口

pub mod container;
pub mod factory;
pub mod registry;
pub mod resolver;
pub mod routing;
pub mod scanner;

pub use container::*;
pub use factory::*;
pub use registry::*;
pub use resolver::*;
pub use routing::*;
pub use scanner::*;
