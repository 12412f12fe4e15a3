//! 组件目录
//!
//! 以命名空间树保存注册的组件描述符，供扫描器递归遍历

use di_abstractions::TypeScanner;
use infrastructure_common::{namespace_of, ComponentDescriptor, ComponentError};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 命名空间节点
#[derive(Debug, Default)]
struct NamespaceNode {
    /// 直接位于该命名空间下的类型（注册顺序）
    types: Vec<String>,
    /// 子命名空间（注册顺序）
    children: Vec<String>,
}

/// 组件目录
///
/// 注册完成后只读；扫描时先列出命名空间自身的类型，再按注册顺序递归子命名空间
#[derive(Debug, Default)]
pub struct ComponentCatalog {
    descriptors: HashMap<String, Arc<ComponentDescriptor>>,
    type_ids: HashMap<TypeId, String>,
    namespaces: HashMap<String, NamespaceNode>,
}

impl ComponentCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册组件描述符
    pub fn register(&mut self, descriptor: ComponentDescriptor) -> Result<(), ComponentError> {
        let qualified_name = descriptor.qualified_name().to_string();
        if self.descriptors.contains_key(&qualified_name) {
            return Err(ComponentError::RegistrationError {
                type_name: qualified_name,
                message: "同名类型已经注册".to_string(),
            });
        }

        let namespace = namespace_of(&qualified_name).to_string();
        self.ensure_namespace(&namespace);
        if let Some(node) = self.namespaces.get_mut(&namespace) {
            node.types.push(qualified_name.clone());
        }

        debug!("注册组件描述符: {}", qualified_name);
        self.type_ids
            .insert(descriptor.type_info.id, qualified_name.clone());
        self.descriptors
            .insert(qualified_name, Arc::new(descriptor));
        Ok(())
    }

    /// 批量注册组件描述符
    pub fn register_all<I>(&mut self, descriptors: I) -> Result<(), ComponentError>
    where
        I: IntoIterator<Item = ComponentDescriptor>,
    {
        for descriptor in descriptors {
            self.register(descriptor)?;
        }
        Ok(())
    }

    /// 已注册的类型数量
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// 确保命名空间及其所有上级命名空间存在
    fn ensure_namespace(&mut self, namespace: &str) {
        if self.namespaces.contains_key(namespace) {
            return;
        }
        self.namespaces
            .insert(namespace.to_string(), NamespaceNode::default());

        if namespace.is_empty() {
            return;
        }
        let parent = namespace_of(namespace).to_string();
        self.ensure_namespace(&parent);
        if let Some(node) = self.namespaces.get_mut(&parent) {
            node.children.push(namespace.to_string());
        }
    }

    fn walk(&self, namespace: &str, found: &mut Vec<String>) {
        let Some(node) = self.namespaces.get(namespace) else {
            return;
        };
        debug!("扫描命名空间: {}", namespace);
        found.extend(node.types.iter().cloned());
        for child in &node.children {
            self.walk(child, found);
        }
    }
}

impl TypeScanner for ComponentCatalog {
    fn scan(&self, root_namespace: &str) -> Result<Vec<String>, ComponentError> {
        if !self.namespaces.contains_key(root_namespace) {
            return Err(ComponentError::scan_error(format!(
                "找不到命名空间: {}",
                root_namespace
            )));
        }

        let mut found = Vec::new();
        self.walk(root_namespace, &mut found);
        Ok(found)
    }

    fn load(&self, qualified_name: &str) -> Option<Arc<ComponentDescriptor>> {
        self.descriptors.get(qualified_name).cloned()
    }

    fn load_by_type_id(&self, type_id: TypeId) -> Option<Arc<ComponentDescriptor>> {
        let qualified_name = self.type_ids.get(&type_id)?;
        self.load(qualified_name)
    }

    fn name(&self) -> &str {
        "ComponentCatalog"
    }
}
