//! 路由表实现

use crate::registry::ContainerRegistry;
use di_abstractions::{RouteEntry, RouteResolver};
use infrastructure_common::{HttpMethod, RoutingError, RoutingResult};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// 路由表
///
/// 同一路径可以为不同的请求方法分别注册处理器；启动后只读
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: BTreeMap<String, BTreeMap<Option<HttpMethod>, Arc<RouteEntry>>>,
}

impl RouteTable {
    /// 创建空路由表
    pub fn new() -> Self {
        Self::default()
    }

    /// 从控制器实例构建路由表
    pub fn from_registry(registry: &ContainerRegistry) -> RoutingResult<Self> {
        info!("映射请求路径");
        let mut table = Self::new();

        for (descriptor, bean) in registry.managed() {
            if !descriptor.is_controller() {
                continue;
            }

            let base_path = descriptor
                .request_mapping
                .as_ref()
                .map(|mapping| mapping.path.as_str())
                .unwrap_or_default();

            for handler in &descriptor.handlers {
                table.insert(RouteEntry {
                    path: format!("{}{}", base_path, handler.mapping.path),
                    method: handler.mapping.method,
                    handler: handler.clone(),
                    controller: bean.clone(),
                })?;
            }
        }

        info!("路由表构建完成: {} 个路由", table.len());
        Ok(table)
    }

    /// 注册路由条目，同一路径和请求方法只能注册一次
    pub fn insert(&mut self, entry: RouteEntry) -> RoutingResult<()> {
        let slots = self.routes.entry(entry.path.clone()).or_default();

        match slots.entry(entry.method) {
            Entry::Occupied(_) => Err(RoutingError::DuplicateRoute {
                path: entry.path,
                method: method_label(entry.method),
            }),
            Entry::Vacant(vacant) => {
                debug!(
                    "映射路径: {} {} -> {}.{}",
                    method_label(entry.method),
                    entry.path,
                    entry.controller.type_info(),
                    entry.handler.name
                );
                vacant.insert(Arc::new(entry));
                Ok(())
            }
        }
    }

    /// 路由条目数量
    pub fn len(&self) -> usize {
        self.routes.values().map(BTreeMap::len).sum()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// 按路径、请求方法排序列出所有路由
    pub fn entries(&self) -> impl Iterator<Item = &Arc<RouteEntry>> {
        self.routes.values().flat_map(BTreeMap::values)
    }
}

impl RouteResolver for RouteTable {
    fn resolve(
        &self,
        path: &str,
        method: Option<HttpMethod>,
    ) -> Result<Arc<RouteEntry>, RoutingError> {
        let slots = self
            .routes
            .get(path)
            .ok_or_else(|| RoutingError::PathNotFound {
                path: path.to_string(),
            })?;

        let found = match method {
            Some(_) => slots.get(&method).or_else(|| slots.get(&None)),
            None => slots.get(&None).or_else(|| match slots.len() {
                1 => slots.values().next(),
                _ => None,
            }),
        };

        found.cloned().ok_or_else(|| RoutingError::MethodNotFound {
            path: path.to_string(),
            method: method_label(method),
        })
    }
}

fn method_label(method: Option<HttpMethod>) -> String {
    method.map_or_else(|| "ANY".to_string(), |method| method.to_string())
}
