//! 绑定名称解析实现

use dashmap::DashMap;
use di_abstractions::{BindingResolver, TypeScanner};
use infrastructure_common::{BindingName, TypeInfo};
use std::sync::Arc;
use tracing::debug;

/// 带缓存的绑定名称解析器
///
/// 参数类型只携带身份信息，解析前先通过扫描器换成注册时的完整类型信息。
/// 结果按全限定名称缓存，同一类型的多次查询返回同一份列表
pub struct CachedBindingResolver {
    scanner: Option<Arc<dyn TypeScanner>>,
    cache: DashMap<String, Arc<[BindingName]>>,
}

impl CachedBindingResolver {
    /// 创建不依赖扫描器的解析器，只使用传入的类型信息
    pub fn new() -> Self {
        Self {
            scanner: None,
            cache: DashMap::new(),
        }
    }

    /// 创建通过扫描器补全类型信息的解析器
    pub fn with_scanner(scanner: Arc<dyn TypeScanner>) -> Self {
        Self {
            scanner: Some(scanner),
            cache: DashMap::new(),
        }
    }

    /// 按契约、别名、简单名称的规则计算绑定名称
    pub fn compute(type_info: &TypeInfo) -> Vec<BindingName> {
        let mut names = type_info.interfaces.clone();
        if type_info.aliases.is_empty() {
            names.push(type_info.short_name().to_string());
        } else {
            names.extend(type_info.aliases.iter().cloned());
        }
        names
    }

    /// 已缓存的类型数量
    pub fn cached_types(&self) -> usize {
        self.cache.len()
    }

    fn canonical(&self, type_info: &TypeInfo) -> TypeInfo {
        self.scanner
            .as_ref()
            .and_then(|scanner| scanner.load_by_type_id(type_info.id))
            .map(|descriptor| descriptor.type_info.clone())
            .unwrap_or_else(|| type_info.clone())
    }
}

impl Default for CachedBindingResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CachedBindingResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedBindingResolver")
            .field("scanner", &self.scanner.as_ref().map(|s| s.name().to_string()))
            .field("cached_types", &self.cache.len())
            .finish()
    }
}

impl BindingResolver for CachedBindingResolver {
    fn binding_names_of(&self, type_info: &TypeInfo) -> Arc<[BindingName]> {
        if let Some(hit) = self.cache.get(&type_info.qualified_name) {
            return hit.value().clone();
        }

        let canonical = self.canonical(type_info);
        let names: Arc<[BindingName]> = Self::compute(&canonical).into();
        debug!("计算绑定名称: {} -> {:?}", canonical, names);

        self.cache
            .entry(type_info.qualified_name.clone())
            .or_insert(names)
            .value()
            .clone()
    }
}
