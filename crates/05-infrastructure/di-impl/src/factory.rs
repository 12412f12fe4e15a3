//! 组件工厂实现
//!
//! 负责构造函数选择、构造参数解析和组件实例创建

use di_abstractions::{BeanFactory, BindingResolver, UnresolvedPolicy};
use infrastructure_common::{
    Bean, BeanMap, ComponentDescriptor, ConstructorArgs, ConstructorDescriptor, DependencyError,
    DependencyResult, ParameterDescriptor,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// 多个公开构造函数时，注入标记数量必须超过该值才会被选中
pub const DESIGNATION_THRESHOLD: usize = 1;

/// 默认组件工厂
pub struct DefaultBeanFactory {
    resolver: Arc<dyn BindingResolver>,
    unresolved_policy: UnresolvedPolicy,
}

impl DefaultBeanFactory {
    /// 创建组件工厂
    pub fn new(resolver: Arc<dyn BindingResolver>) -> Self {
        Self {
            resolver,
            unresolved_policy: UnresolvedPolicy::default(),
        }
    }

    /// 设置无法解析依赖时的处理策略
    pub fn with_unresolved_policy(mut self, policy: UnresolvedPolicy) -> Self {
        self.unresolved_policy = policy;
        self
    }

    /// 查找可以直接复用的现有实例
    ///
    /// 同类型的实例总是可以复用；没有公开构造函数的类型（例如只声明契约的类型）
    /// 复用绑定名称下唯一的实现
    fn find_existing(
        &self,
        descriptor: &ComponentDescriptor,
        existing_beans: &BeanMap,
    ) -> Option<Bean> {
        let constructible = descriptor.public_constructors().next().is_some();
        let names = self.resolver.binding_names_of(&descriptor.type_info);

        names
            .iter()
            .find_map(|name| match existing_beans.get(name).map(Vec::as_slice) {
                Some([bean])
                    if !constructible || bean.type_info().id == descriptor.type_info.id =>
                {
                    Some(bean.clone())
                }
                _ => None,
            })
    }

    /// 解析构造函数的全部参数
    pub fn resolve_arguments(
        &self,
        owner: &str,
        constructor: &ConstructorDescriptor,
        existing_beans: &BeanMap,
    ) -> DependencyResult<ConstructorArgs> {
        let slots = constructor
            .parameters
            .iter()
            .enumerate()
            .map(|(index, parameter)| {
                self.resolve_parameter(owner, index, parameter, existing_beans)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ConstructorArgs::new(owner, slots))
    }

    /// 解析单个构造参数
    ///
    /// 带限定别名的参数只按别名查找，别名必须唯一匹配；
    /// 否则依次尝试参数类型的绑定名称，取第一个唯一匹配的实例
    fn resolve_parameter(
        &self,
        owner: &str,
        index: usize,
        parameter: &ParameterDescriptor,
        existing_beans: &BeanMap,
    ) -> Result<Option<Bean>, DependencyError> {
        if let Some(alias) = &parameter.qualifier {
            return match existing_beans.get(alias).map(Vec::as_slice).unwrap_or_default() {
                [bean] => Ok(Some(bean.clone())),
                [] => Err(DependencyError::unresolved(
                    owner,
                    format!("第 {} 个参数的限定别名 {} 没有匹配的组件", index, alias),
                )),
                many => Err(DependencyError::unresolved(
                    owner,
                    format!(
                        "第 {} 个参数的限定别名 {} 匹配到 {} 个组件",
                        index,
                        alias,
                        many.len()
                    ),
                )),
            };
        }

        let names = self.resolver.binding_names_of(&parameter.type_info);
        let mut ambiguous = Vec::new();
        for name in names.iter() {
            match existing_beans.get(name).map(Vec::as_slice).unwrap_or_default() {
                [] => continue,
                [bean] => {
                    debug!(
                        "参数 {}#{} 通过绑定名称 {} 解析为 {}",
                        owner,
                        index,
                        name,
                        bean.type_info()
                    );
                    return Ok(Some(bean.clone()));
                }
                many => {
                    debug!("绑定名称 {} 当前绑定了 {} 个组件", name, many.len());
                    ambiguous.push(name.as_str());
                }
            }
        }

        if !ambiguous.is_empty() {
            return Err(DependencyError::unresolved(
                owner,
                format!(
                    "第 {} 个参数 ({}) 的绑定名称 {:?} 都对应多个组件，需要限定别名",
                    index, parameter.type_info, ambiguous
                ),
            ));
        }

        match self.unresolved_policy {
            UnresolvedPolicy::LeaveUnset => {
                warn!(
                    "参数 {}#{} ({}) 没有可用的组件，保持为空",
                    owner, index, parameter.type_info
                );
                Ok(None)
            }
            UnresolvedPolicy::Escalate => Err(DependencyError::unresolved(
                owner,
                format!("第 {} 个参数 ({}) 没有可用的组件", index, parameter.type_info),
            )),
        }
    }
}

impl std::fmt::Debug for DefaultBeanFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultBeanFactory")
            .field("resolver", &"<resolver>")
            .field("unresolved_policy", &self.unresolved_policy)
            .finish()
    }
}

impl BeanFactory for DefaultBeanFactory {
    fn create_bean(
        &self,
        descriptor: &ComponentDescriptor,
        existing_beans: &BeanMap,
    ) -> Result<Bean, DependencyError> {
        let type_name = descriptor.qualified_name();

        if let Some(bean) = self.find_existing(descriptor, existing_beans) {
            debug!("复用已有组件实例: {} -> {}", type_name, bean.type_info());
            return Ok(bean);
        }

        let constructor = self.select_constructor(descriptor)?;
        let args = self.resolve_arguments(type_name, constructor, existing_beans)?;
        let object = constructor
            .construct(&args)
            .map_err(|source| DependencyError::BeanCreation {
                type_name: type_name.to_string(),
                source,
            })?;

        debug!("创建组件实例: {}", type_name);
        Ok(Arc::new(descriptor.instantiate(object)?))
    }

    fn select_constructor<'a>(
        &self,
        descriptor: &'a ComponentDescriptor,
    ) -> Result<&'a ConstructorDescriptor, DependencyError> {
        let type_name = descriptor.qualified_name();
        let public: Vec<&'a ConstructorDescriptor> = descriptor.public_constructors().collect();

        match public.as_slice() {
            [] => Err(DependencyError::ambiguous_constructor(
                type_name,
                "没有公开的构造函数",
            )),
            [only] => Ok(*only),
            many => {
                let designated: Vec<&'a ConstructorDescriptor> = many
                    .iter()
                    .copied()
                    .filter(|constructor| constructor.designations > DESIGNATION_THRESHOLD)
                    .collect();

                match designated.as_slice() {
                    [chosen] => Ok(*chosen),
                    [] => Err(DependencyError::ambiguous_constructor(
                        type_name,
                        format!(
                            "有 {} 个公开构造函数，但没有构造函数的注入标记多于 {} 个",
                            many.len(),
                            DESIGNATION_THRESHOLD
                        ),
                    )),
                    _ => Err(DependencyError::ambiguous_constructor(
                        type_name,
                        format!("有 {} 个构造函数同时满足注入标记条件", designated.len()),
                    )),
                }
            }
        }
    }
}
