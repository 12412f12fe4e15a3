//! 依赖注入实现的集成测试

use di_abstractions::{ComponentRegistry, ContainerConfig, Pipeline, UnresolvedPolicy};
use di_impl::{ComponentCatalog, ContainerRegistry};
use infrastructure_common::{
    BoxError, ComponentDescriptor, ComponentError, ConstructorDescriptor, DependencyError, Injected,
    InfrastructureError, ParameterDescriptor, TypeInfo,
};
use std::sync::Arc;

/// 测试组件
#[derive(Debug, Default)]
struct Logger;

impl Logger {
    fn format(&self, message: &str) -> String {
        format!("[log] {}", message)
    }
}

#[derive(Debug)]
struct Service {
    logger: Arc<Logger>,
}

impl Service {
    fn greet(&self) -> String {
        self.logger.format("hello")
    }
}

#[derive(Debug, Default)]
struct Repository;

#[derive(Debug, Default)]
struct Clock;

#[derive(Debug, Default)]
struct Handler {
    repository: Injected<Repository>,
    clock: Injected<Clock>,
}

#[derive(Debug)]
struct Left;

/// 存储契约
trait Store: Send + Sync {
    fn kind(&self) -> &'static str;
}

#[derive(Debug, Default)]
struct MemoryStore;

impl Store for MemoryStore {
    fn kind(&self) -> &'static str {
        "memory"
    }
}

/// 依赖具体的内存存储
struct Indexer {
    store: Arc<MemoryStore>,
}

/// 同样实现存储契约，但依赖索引器
struct IndexedStore {
    indexer: Arc<Indexer>,
}

impl Store for IndexedStore {
    fn kind(&self) -> &'static str {
        "indexed"
    }
}

/// 只通过契约依赖存储
struct Reporter {
    store: Arc<dyn Store>,
}

#[derive(Debug)]
struct Right;

fn config() -> ContainerConfig {
    ContainerConfig::new(module_path!())
}

fn bootstrap(
    catalog: ComponentCatalog,
    config: &ContainerConfig,
) -> Result<ContainerRegistry, InfrastructureError> {
    ContainerRegistry::bootstrap(Arc::new(catalog), config)
}

fn service_catalog() -> anyhow::Result<ComponentCatalog> {
    let mut catalog = ComponentCatalog::new();
    // 服务先于依赖注册，验证按依赖深度优先创建
    catalog.register(
        ComponentDescriptor::service::<Service>()
            .constructor(
                ConstructorDescriptor::public()
                    .param(ParameterDescriptor::of::<Logger>())
                    .build(|args| {
                        Ok(Service {
                            logger: args.required::<Logger>(0)?,
                        })
                    }),
            )
            .build(),
    )?;
    catalog.register(
        ComponentDescriptor::component::<Logger>()
            .default_constructor()
            .build(),
    )?;
    Ok(catalog)
}

fn memory_store() -> ComponentDescriptor {
    ComponentDescriptor::component::<MemoryStore>()
        .implements(|store: Arc<MemoryStore>| -> Arc<dyn Store> { store })
        .default_constructor()
        .build()
}

fn indexer() -> ComponentDescriptor {
    ComponentDescriptor::component::<Indexer>()
        .constructor(
            ConstructorDescriptor::public()
                .param(ParameterDescriptor::of::<MemoryStore>())
                .build(|args| {
                    Ok(Indexer {
                        store: args.required::<MemoryStore>(0)?,
                    })
                }),
        )
        .build()
}

fn indexed_store() -> ComponentDescriptor {
    ComponentDescriptor::component::<IndexedStore>()
        .implements(|store: Arc<IndexedStore>| -> Arc<dyn Store> { store })
        .constructor(
            ConstructorDescriptor::public()
                .param(ParameterDescriptor::of::<Indexer>())
                .build(|args| {
                    Ok(IndexedStore {
                        indexer: args.required::<Indexer>(0)?,
                    })
                }),
        )
        .build()
}

fn reporter() -> ComponentDescriptor {
    ComponentDescriptor::component::<Reporter>()
        .constructor(
            ConstructorDescriptor::public()
                .param(ParameterDescriptor::of::<dyn Store>())
                .build(|args| {
                    Ok(Reporter {
                        store: args.required::<dyn Store>(0)?,
                    })
                }),
        )
        .build()
}

fn catalog_of(descriptors: Vec<ComponentDescriptor>) -> anyhow::Result<ComponentCatalog> {
    let mut catalog = ComponentCatalog::new();
    catalog.register_all(descriptors)?;
    Ok(catalog)
}

fn field_catalog() -> anyhow::Result<ComponentCatalog> {
    let mut catalog = ComponentCatalog::new();
    catalog.register(
        ComponentDescriptor::component::<Handler>()
            .default_constructor()
            .field("repository", |handler: &Handler| &handler.repository)
            .field("clock", |handler: &Handler| &handler.clock)
            .build(),
    )?;
    catalog.register(
        ComponentDescriptor::component::<Repository>()
            .default_constructor()
            .build(),
    )?;
    // 未标记的类型不会被实例化
    catalog.register(ComponentDescriptor::builder::<Clock>().default_constructor().build())?;
    Ok(catalog)
}

#[test]
fn test_constructor_pipeline_wires_dependencies() -> anyhow::Result<()> {
    let registry = bootstrap(service_catalog()?, &config())?;

    let service = registry.resolve::<Service>()?;
    let logger = registry.resolve::<Logger>()?;

    assert!(Arc::ptr_eq(&service.logger, &logger));
    assert_eq!(service.greet(), "[log] hello");
    assert_eq!(registry.bean_count(), 2);
    assert_eq!(registry.beans_named("Logger").len(), 1);
    assert_eq!(
        registry
            .beans_named(&TypeInfo::of::<Service>().registration_key())
            .len(),
        1
    );
    Ok(())
}

#[test]
fn test_constructor_pipeline_creates_dependencies_first() -> anyhow::Result<()> {
    let registry = bootstrap(service_catalog()?, &config())?;

    let order: Vec<&str> = registry
        .instances()
        .iter()
        .map(|bean| bean.type_info().short_name())
        .collect();
    assert_eq!(order, vec!["Logger", "Service"]);
    Ok(())
}

#[test]
fn test_dependency_cycle_is_reported() -> anyhow::Result<()> {
    let mut catalog = ComponentCatalog::new();
    catalog.register(
        ComponentDescriptor::component::<Left>()
            .constructor(
                ConstructorDescriptor::public()
                    .param(ParameterDescriptor::of::<Right>())
                    .build(|_| Ok(Left)),
            )
            .build(),
    )?;
    catalog.register(
        ComponentDescriptor::component::<Right>()
            .constructor(
                ConstructorDescriptor::public()
                    .param(ParameterDescriptor::of::<Left>())
                    .build(|_| Ok(Right)),
            )
            .build(),
    )?;

    match bootstrap(catalog, &config()) {
        Err(InfrastructureError::DependencyError {
            source: DependencyError::CircularDependency { dependency_chain },
        }) => {
            assert!(dependency_chain.contains("Left -> "));
            assert!(dependency_chain.ends_with("Left"));
        }
        other => panic!("期望循环依赖错误, 实际: {:?}", other.map(|r| r.bean_count())),
    }
    Ok(())
}

#[test]
fn test_unknown_root_namespace_fails() -> anyhow::Result<()> {
    let result = bootstrap(service_catalog()?, &ContainerConfig::new("missing::namespace"));

    assert!(matches!(
        result,
        Err(InfrastructureError::ComponentError {
            source: ComponentError::ScanError { .. }
        })
    ));
    Ok(())
}

#[test]
fn test_field_injection_leaves_missing_fields_unset() -> anyhow::Result<()> {
    let config = config().with_pipeline(Pipeline::FieldInjection);
    let registry = bootstrap(field_catalog()?, &config)?;

    let handler = registry.resolve::<Handler>()?;
    assert!(handler.repository.is_injected());
    assert!(!handler.clock.is_injected());
    assert_eq!(registry.bean_count(), 2);
    assert!(registry.beans_named("Repository").is_empty());
    Ok(())
}

#[test]
fn test_field_injection_escalates_missing_fields() -> anyhow::Result<()> {
    let config = config()
        .with_pipeline(Pipeline::FieldInjection)
        .with_unresolved_policy(UnresolvedPolicy::Escalate);

    assert!(matches!(
        bootstrap(field_catalog()?, &config),
        Err(InfrastructureError::DependencyError {
            source: DependencyError::UnresolvedDependency { .. }
        })
    ));
    Ok(())
}

#[test]
fn test_field_injection_requires_default_constructor() -> anyhow::Result<()> {
    let config = config().with_pipeline(Pipeline::FieldInjection);

    assert!(matches!(
        bootstrap(service_catalog()?, &config),
        Err(InfrastructureError::DependencyError {
            source: DependencyError::BeanCreation { .. }
        })
    ));
    Ok(())
}

#[test]
fn test_sibling_contract_is_not_a_dependency_edge() -> anyhow::Result<()> {
    let orders = [
        vec![memory_store(), indexer(), indexed_store()],
        vec![indexer(), indexed_store(), memory_store()],
        vec![indexed_store(), indexer(), memory_store()],
    ];

    for descriptors in orders {
        let registry = bootstrap(catalog_of(descriptors)?, &config())?;

        let indexer = registry.resolve::<Indexer>()?;
        let indexed = registry.resolve::<IndexedStore>()?;
        assert!(Arc::ptr_eq(&indexer.store, &registry.resolve::<MemoryStore>()?));
        assert!(Arc::ptr_eq(&indexed.indexer, &indexer));
        assert_eq!(indexed.kind(), "indexed");
        assert_eq!(registry.beans_named("Store").len(), 2);
        assert_eq!(registry.bean_count(), 3);
    }
    Ok(())
}

#[test]
fn test_cycle_through_contract_is_reported() -> anyhow::Result<()> {
    let indexed_reporter = || {
        ComponentDescriptor::component::<IndexedStore>()
            .implements(|store: Arc<IndexedStore>| -> Arc<dyn Store> { store })
            .constructor(
                ConstructorDescriptor::public()
                    .param(ParameterDescriptor::of::<Reporter>())
                    .build(|_| Err::<IndexedStore, BoxError>("不会被调用".into())),
            )
            .build()
    };

    let result = bootstrap(catalog_of(vec![reporter(), indexed_reporter()])?, &config());
    match result {
        Err(InfrastructureError::DependencyError {
            source: DependencyError::CircularDependency { dependency_chain },
        }) => {
            assert!(dependency_chain.contains("Reporter -> "));
            assert!(dependency_chain.contains("IndexedStore"));
        }
        other => panic!("期望循环依赖错误, 实际: {:?}", other.map(|r| r.bean_count())),
    }
    Ok(())
}

#[test]
fn test_contract_parameter_resolves_sole_implementation() -> anyhow::Result<()> {
    let registry = bootstrap(catalog_of(vec![reporter(), memory_store()])?, &config())?;

    let reporter = registry.resolve::<Reporter>()?;
    assert_eq!(reporter.store.kind(), "memory");
    Ok(())
}

#[tokio::test]
async fn test_concurrent_resolution_after_bootstrap() -> anyhow::Result<()> {
    let registry = Arc::new(bootstrap(service_catalog()?, &config())?);
    let logger = registry.resolve::<Logger>()?;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            let service = registry.resolve::<Service>()?;
            Ok::<_, DependencyError>(service)
        }));
    }

    for handle in handles {
        let service = handle.await??;
        assert!(Arc::ptr_eq(&service.logger, &logger));
    }
    Ok(())
}
