//! 类型扫描器抽象接口
//!
//! 提供在命名空间下发现组件类型的能力

use infrastructure_common::{ComponentDescriptor, ComponentError};
use std::any::TypeId;
use std::sync::Arc;

/// 类型扫描器 trait
///
/// 扫描只负责发现，不创建实例
pub trait TypeScanner: Send + Sync {
    /// 递归列出根命名空间下所有类型的全限定名称
    ///
    /// 根命名空间不存在时返回 [`ComponentError::ScanError`]
    fn scan(&self, root_namespace: &str) -> Result<Vec<String>, ComponentError>;

    /// 按全限定名称加载组件描述符
    fn load(&self, qualified_name: &str) -> Option<Arc<ComponentDescriptor>>;

    /// 按类型ID加载组件描述符
    fn load_by_type_id(&self, type_id: TypeId) -> Option<Arc<ComponentDescriptor>>;

    /// 获取扫描器名称
    fn name(&self) -> &str;
}
