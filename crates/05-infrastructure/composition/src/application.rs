//! 应用实例
//!
//! 组合根构建出的唯一应用对象，持有容器注册表、路由表和生效的配置

use crate::settings::ContainerSettings;
use di_abstractions::{ComponentRegistry, ContainerStats, RouteEntry};
use di_impl::{ContainerRegistry, RouteTable};
use infrastructure_common::DependencyError;
use std::sync::Arc;

/// 应用
///
/// 构建完成后不可变，可以通过 `Arc` 在多个任务之间共享
#[derive(Debug)]
pub struct Application {
    registry: ContainerRegistry,
    routes: RouteTable,
    settings: ContainerSettings,
}

impl Application {
    pub(crate) fn new(
        registry: ContainerRegistry,
        routes: RouteTable,
        settings: ContainerSettings,
    ) -> Self {
        Self {
            registry,
            routes,
            settings,
        }
    }

    /// 容器注册表
    pub fn registry(&self) -> &ContainerRegistry {
        &self.registry
    }

    /// 路由表
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// 生效的配置
    pub fn settings(&self) -> &ContainerSettings {
        &self.settings
    }

    /// 按具体类型或契约类型获取唯一的组件实例
    pub fn resolve<T>(&self) -> Result<Arc<T>, DependencyError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.registry.resolve::<T>()
    }

    /// 按路径、请求方法排序列出所有路由
    pub fn route_entries(&self) -> impl Iterator<Item = &Arc<RouteEntry>> {
        self.routes.entries()
    }

    /// 统计信息
    pub fn stats(&self) -> ContainerStats {
        ContainerStats {
            routes: self.routes.len(),
            ..self.registry.stats()
        }
    }
}
