//! 容器注册表实现

use crate::binding::CachedBindingResolver;
use crate::factory::DefaultBeanFactory;
use crate::pipeline::{ConstructorPipeline, FieldInjectionPipeline};
use di_abstractions::{
    BindingResolver, ComponentRegistry, ContainerConfig, ContainerStats, Pipeline, TypeScanner,
};
use infrastructure_common::{Bean, BeanMap, ComponentDescriptor, InfrastructureResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// 容器注册表
///
/// 启动时一次性构建完成，之后只读，可以在多个任务之间共享
#[derive(Debug, Default)]
pub struct ContainerRegistry {
    pub(crate) bindings: BeanMap,
    pub(crate) instances: Vec<Bean>,
    pub(crate) descriptors: Vec<Arc<ComponentDescriptor>>,
    pub(crate) by_type: HashMap<String, Bean>,
    pub(crate) discovered_types: usize,
}

impl ContainerRegistry {
    /// 扫描根命名空间并按配置的流程构建注册表
    pub fn bootstrap(
        scanner: Arc<dyn TypeScanner>,
        config: &ContainerConfig,
    ) -> InfrastructureResult<Self> {
        info!(
            "开始构建容器: 扫描器 {}, 根命名空间 {}, 流程 {:?}",
            scanner.name(),
            config.root_namespace,
            config.pipeline
        );

        let registry = match config.pipeline {
            Pipeline::Constructor => {
                let resolver: Arc<dyn BindingResolver> =
                    Arc::new(CachedBindingResolver::with_scanner(scanner.clone()));
                let factory = DefaultBeanFactory::new(resolver.clone())
                    .with_unresolved_policy(config.unresolved_policy);
                ConstructorPipeline::new(scanner, resolver, &factory, config).run()?
            }
            Pipeline::FieldInjection => FieldInjectionPipeline::new(scanner, config).run()?,
        };

        info!(
            "容器构建完成: {} 个组件实例, {} 个绑定名称",
            registry.instances.len(),
            registry.bindings.len()
        );
        Ok(registry)
    }

    /// 按全限定类型名称获取组件实例
    pub fn bean_of_type(&self, qualified_name: &str) -> Option<&Bean> {
        self.by_type.get(qualified_name)
    }

    /// 按创建顺序列出描述符与实例
    pub fn managed(&self) -> impl Iterator<Item = (&Arc<ComponentDescriptor>, &Bean)> {
        self.descriptors.iter().zip(self.instances.iter())
    }

    /// 统计信息，路由数量由路由表补充
    pub fn stats(&self) -> ContainerStats {
        ContainerStats {
            discovered_types: self.discovered_types,
            created_beans: self.instances.len(),
            binding_names: self.bindings.len(),
            routes: 0,
        }
    }

    /// 登记新创建的实例
    ///
    /// 同一个实例在同一名称下只出现一次
    pub(crate) fn register<'a, I>(
        &mut self,
        descriptor: Arc<ComponentDescriptor>,
        bean: Bean,
        names: I,
    ) where
        I: IntoIterator<Item = &'a str>,
    {
        self.by_type
            .insert(descriptor.qualified_name().to_string(), bean.clone());

        if self.instances.iter().any(|known| Arc::ptr_eq(known, &bean)) {
            return;
        }

        for name in names {
            let slot = self.bindings.entry(name.to_string()).or_default();
            if !slot.iter().any(|known| Arc::ptr_eq(known, &bean)) {
                slot.push(bean.clone());
            }
        }
        self.instances.push(bean);
        self.descriptors.push(descriptor);
    }
}

impl ComponentRegistry for ContainerRegistry {
    fn beans_named(&self, name: &str) -> &[Bean] {
        self.bindings.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    fn bindings(&self) -> &BeanMap {
        &self.bindings
    }

    fn instances(&self) -> &[Bean] {
        &self.instances
    }
}
