//! 组件工厂抽象接口
//!
//! 提供构造函数选择和组件实例创建

use infrastructure_common::{
    Bean, BeanMap, ComponentDescriptor, ConstructorDescriptor, DependencyError,
};

/// 组件工厂 trait
///
/// 创建组件实例但不修改注册表
pub trait BeanFactory: Send + Sync {
    /// 创建组件实例
    ///
    /// 如果类型自身的某个绑定名称已经唯一指向一个现有实例，直接返回该实例
    fn create_bean(
        &self,
        descriptor: &ComponentDescriptor,
        existing_beans: &BeanMap,
    ) -> Result<Bean, DependencyError>;

    /// 选择用于注入的构造函数
    fn select_constructor<'a>(
        &self,
        descriptor: &'a ComponentDescriptor,
    ) -> Result<&'a ConstructorDescriptor, DependencyError>;
}
