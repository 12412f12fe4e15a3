//! 容器构建流程
//!
//! 构造函数注入流程按依赖深度优先创建实例；字段注入流程先统一无参构造，再写入字段

use crate::registry::ContainerRegistry;
use di_abstractions::{
    BeanFactory, BindingResolver, ContainerConfig, ResolveContext, TypeScanner, UnresolvedPolicy,
};
use infrastructure_common::{
    Bean, ComponentDescriptor, ComponentError, ConstructorArgs, DependencyError,
    InfrastructureError, ParameterDescriptor,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 扫描根命名空间并加载受管组件的描述符
fn discover(
    scanner: &dyn TypeScanner,
    root_namespace: &str,
) -> Result<(usize, Vec<Arc<ComponentDescriptor>>), ComponentError> {
    info!("扫描组件类型: {}", root_namespace);
    let names = scanner.scan(root_namespace)?;

    let mut managed = Vec::new();
    for name in &names {
        let descriptor = scanner.load(name).ok_or_else(|| ComponentError::InvalidMetadata {
            message: format!("扫描结果中的类型没有描述符: {}", name),
        })?;
        if descriptor.is_managed() {
            managed.push(descriptor);
        } else {
            debug!("跳过未标记的类型: {}", name);
        }
    }

    info!("发现 {} 个类型, 其中 {} 个受容器管理", names.len(), managed.len());
    Ok((names.len(), managed))
}

/// 构造函数注入流程
pub(crate) struct ConstructorPipeline<'a> {
    scanner: Arc<dyn TypeScanner>,
    resolver: Arc<dyn BindingResolver>,
    factory: &'a dyn BeanFactory,
    config: &'a ContainerConfig,
    candidates: Vec<Arc<ComponentDescriptor>>,
    context: ResolveContext,
    registry: ContainerRegistry,
}

impl<'a> ConstructorPipeline<'a> {
    pub(crate) fn new(
        scanner: Arc<dyn TypeScanner>,
        resolver: Arc<dyn BindingResolver>,
        factory: &'a dyn BeanFactory,
        config: &'a ContainerConfig,
    ) -> Self {
        Self {
            scanner,
            resolver,
            factory,
            config,
            candidates: Vec::new(),
            context: ResolveContext::new(config.max_resolution_depth),
            registry: ContainerRegistry::default(),
        }
    }

    pub(crate) fn run(mut self) -> Result<ContainerRegistry, InfrastructureError> {
        let (discovered, candidates) =
            discover(self.scanner.as_ref(), &self.config.root_namespace)?;
        self.registry.discovered_types = discovered;
        self.candidates = candidates;

        info!("按构造函数注入创建组件实例");
        for descriptor in self.candidates.clone() {
            self.ensure(&descriptor)?;
        }
        Ok(self.registry)
    }

    /// 确保组件已经创建，必要时先创建它的构造参数提供者
    fn ensure(&mut self, descriptor: &Arc<ComponentDescriptor>) -> Result<Bean, DependencyError> {
        let type_name = descriptor.qualified_name();
        if let Some(bean) = self.registry.bean_of_type(type_name) {
            return Ok(bean.clone());
        }

        self.context.push_type(type_name)?;
        // 构造函数无法选择时交给工厂报告具体错误
        if let Ok(constructor) = self.factory.select_constructor(descriptor) {
            for parameter in &constructor.parameters {
                self.prepare(parameter)?;
            }
        }

        let bean = self.factory.create_bean(descriptor, &self.registry.bindings)?;
        self.context.pop_type();

        let names = self.resolver.binding_names_of(&descriptor.type_info);
        let key = descriptor.type_info.registration_key();
        debug!("登记组件实例: {} -> {:?}", type_name, names);
        self.registry.register(
            descriptor.clone(),
            bean.clone(),
            names
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(key.as_str())),
        );
        Ok(bean)
    }

    /// 按绑定名称的优先顺序预先创建参数的提供者
    ///
    /// 某个名称下已经有唯一实例时停止。因为回到解析链而无法创建的提供者会被跳过，
    /// 只有在所有名称都无法唯一匹配时才报告循环依赖
    fn prepare(&mut self, parameter: &ParameterDescriptor) -> Result<(), DependencyError> {
        let wanted: Vec<String> = match &parameter.qualifier {
            Some(alias) => vec![alias.clone()],
            None => self.resolver.binding_names_of(&parameter.type_info).to_vec(),
        };

        let mut cycle: Option<DependencyError> = None;
        for name in &wanted {
            for provider in self.providers_named(name) {
                let provider_name = provider.qualified_name();
                if self.context.contains(provider_name) {
                    cycle.get_or_insert_with(|| self.context.cycle_through(provider_name));
                    continue;
                }

                let depth = self.context.depth();
                match self.ensure(&provider) {
                    Ok(_) => {}
                    Err(error @ DependencyError::CircularDependency { .. }) => {
                        debug!("暂不创建 {}: {}", provider_name, error);
                        self.context.unwind_to(depth);
                        cycle.get_or_insert(error);
                    }
                    Err(error) => return Err(error),
                }
            }

            if self.registry.bindings.get(name).map_or(0, Vec::len) == 1 {
                return Ok(());
            }
        }

        match cycle {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// 绑定名称下的候选组件
    fn providers_named(&self, name: &str) -> Vec<Arc<ComponentDescriptor>> {
        self.candidates
            .iter()
            .filter(|candidate| {
                self.resolver
                    .binding_names_of(&candidate.type_info)
                    .iter()
                    .any(|bound| bound == name)
            })
            .cloned()
            .collect()
    }
}

/// 字段注入流程
pub(crate) struct FieldInjectionPipeline<'a> {
    scanner: Arc<dyn TypeScanner>,
    config: &'a ContainerConfig,
    registry: ContainerRegistry,
}

impl<'a> FieldInjectionPipeline<'a> {
    pub(crate) fn new(scanner: Arc<dyn TypeScanner>, config: &'a ContainerConfig) -> Self {
        Self {
            scanner,
            config,
            registry: ContainerRegistry::default(),
        }
    }

    pub(crate) fn run(mut self) -> Result<ContainerRegistry, InfrastructureError> {
        let (discovered, candidates) =
            discover(self.scanner.as_ref(), &self.config.root_namespace)?;
        self.registry.discovered_types = discovered;

        info!("通过无参构造函数创建组件实例");
        for descriptor in candidates {
            self.instantiate(descriptor)?;
        }

        info!("注入字段依赖");
        let managed: Vec<(Arc<ComponentDescriptor>, Bean)> = self
            .registry
            .managed()
            .map(|(descriptor, bean)| (descriptor.clone(), bean.clone()))
            .collect();
        for (descriptor, bean) in managed {
            self.inject(&descriptor, &bean)?;
        }
        Ok(self.registry)
    }

    fn instantiate(
        &mut self,
        descriptor: Arc<ComponentDescriptor>,
    ) -> Result<(), DependencyError> {
        let type_name = descriptor.qualified_name().to_string();
        let constructor = descriptor.default_constructor().ok_or_else(|| {
            DependencyError::bean_creation(type_name.clone(), "没有公开的无参构造函数")
        })?;

        let object = constructor
            .construct(&ConstructorArgs::new(type_name.clone(), Vec::new()))
            .map_err(|source| DependencyError::BeanCreation {
                type_name: type_name.clone(),
                source,
            })?;
        let bean = Arc::new(descriptor.instantiate(object)?);

        let key = descriptor.type_info.registration_key();
        debug!("登记组件实例: {} -> {}", type_name, key);
        self.registry
            .register(descriptor, bean, std::iter::once(key.as_str()));
        Ok(())
    }

    fn inject(&self, descriptor: &ComponentDescriptor, bean: &Bean) -> Result<(), DependencyError> {
        for field in &descriptor.fields {
            let key = field.field_type.registration_key();
            match self.registry.bindings.get(&key).and_then(|beans| beans.first()) {
                Some(dependency) => {
                    debug!(
                        "注入字段 {}.{} <- {}",
                        descriptor.qualified_name(),
                        field.name,
                        key
                    );
                    field
                        .assign(bean, dependency)
                        .map_err(|source| DependencyError::BeanCreation {
                            type_name: descriptor.qualified_name().to_string(),
                            source,
                        })?;
                }
                None => match self.config.unresolved_policy {
                    UnresolvedPolicy::LeaveUnset => {
                        warn!(
                            "字段 {}.{} 没有类型为 {} 的组件，保持默认值",
                            descriptor.qualified_name(),
                            field.name,
                            field.field_type
                        );
                    }
                    UnresolvedPolicy::Escalate => {
                        return Err(DependencyError::unresolved(
                            descriptor.qualified_name(),
                            format!(
                                "字段 {} 没有类型为 {} 的组件",
                                field.name, field.field_type
                            ),
                        ));
                    }
                },
            }
        }
        Ok(())
    }
}
