//! 组件注册表抽象接口

use infrastructure_common::{Bean, BeanMap, DependencyError, TypeInfo};
use std::sync::Arc;

/// 组件注册表 trait
///
/// 启动完成后只读
pub trait ComponentRegistry: Send + Sync {
    /// 按绑定名称获取组件实例集合
    fn beans_named(&self, name: &str) -> &[Bean];

    /// 绑定名称到组件实例的完整映射
    fn bindings(&self) -> &BeanMap;

    /// 按创建顺序列出所有组件实例
    fn instances(&self) -> &[Bean];

    /// 组件实例数量
    fn bean_count(&self) -> usize {
        self.instances().len()
    }

    /// 按具体类型或契约类型解析唯一的组件实例
    fn resolve<T>(&self) -> Result<Arc<T>, DependencyError>
    where
        T: ?Sized + Send + Sync + 'static,
        Self: Sized,
    {
        let mut candidates = self.instances().iter().filter_map(|bean| bean.get::<T>());
        let type_name = TypeInfo::of::<T>().qualified_name;

        match (candidates.next(), candidates.next()) {
            (Some(instance), None) => Ok(instance),
            (None, _) => Err(DependencyError::ComponentNotRegistered { type_name }),
            (Some(_), Some(_)) => Err(DependencyError::unresolved(
                type_name,
                "存在多个可用的组件实例",
            )),
        }
    }
}
