//! 容器与路由表的端到端集成测试

use di_abstractions::{
    ComponentRegistry, ContainerConfig, RouteResolver, UnresolvedPolicy,
};
use di_impl::{ComponentCatalog, ContainerRegistry, RouteTable};
use infrastructure_common::{
    BoxError, ComponentDescriptor, ConstructorDescriptor, DependencyError, HttpMethod,
    InfrastructureError, ParameterDescriptor, RequestContext, RequestMapping, RoutingError,
};
use std::sync::Arc;

/// 日志组件
#[derive(Debug, Default)]
struct Logger;

impl Logger {
    fn line(&self, message: &str) -> String {
        format!("INFO {}", message)
    }
}

/// 缓存契约
trait Cache: Send + Sync {
    fn name(&self) -> &'static str;
}

#[derive(Debug, Default)]
struct FastCache;

impl Cache for FastCache {
    fn name(&self) -> &'static str {
        "fast"
    }
}

#[derive(Debug, Default)]
struct SlowCache;

impl Cache for SlowCache {
    fn name(&self) -> &'static str {
        "slow"
    }
}

/// 依赖日志和缓存的服务
struct UserService {
    logger: Arc<Logger>,
    cache: Arc<dyn Cache>,
}

impl UserService {
    fn describe(&self, id: &str) -> String {
        self.logger
            .line(&format!("user {} served from {} cache", id, self.cache.name()))
    }
}

/// 用户控制器
struct UserController {
    service: Arc<UserService>,
}

fn logger() -> ComponentDescriptor {
    ComponentDescriptor::component::<Logger>()
        .default_constructor()
        .build()
}

fn fast_cache() -> ComponentDescriptor {
    ComponentDescriptor::component::<FastCache>()
        .implements(|cache: Arc<FastCache>| -> Arc<dyn Cache> { cache })
        .alias("fast")
        .default_constructor()
        .build()
}

fn slow_cache() -> ComponentDescriptor {
    ComponentDescriptor::component::<SlowCache>()
        .implements(|cache: Arc<SlowCache>| -> Arc<dyn Cache> { cache })
        .default_constructor()
        .build()
}

fn user_service(cache: ParameterDescriptor) -> ComponentDescriptor {
    ComponentDescriptor::service::<UserService>()
        .constructor(
            ConstructorDescriptor::public()
                .param(ParameterDescriptor::of::<Logger>())
                .param(cache)
                .build(|args| {
                    Ok(UserService {
                        logger: args.required::<Logger>(0)?,
                        cache: args.required::<dyn Cache>(1)?,
                    })
                }),
        )
        .build()
}

fn user_controller() -> ComponentDescriptor {
    ComponentDescriptor::controller::<UserController>()
        .constructor(
            ConstructorDescriptor::public()
                .param(ParameterDescriptor::of::<UserService>())
                .build(|args| {
                    Ok(UserController {
                        service: args.required::<UserService>(0)?,
                    })
                }),
        )
        .request_mapping(RequestMapping::path("/users"))
        .handler("list", RequestMapping::get(""), |_: &UserController, _| {
            Ok::<_, BoxError>("all users")
        })
        .handler("create", RequestMapping::post(""), |_: &UserController, _| {
            Ok::<_, BoxError>("created")
        })
        .handler(
            "show",
            RequestMapping::get("/{id}"),
            |controller: &UserController, _| Ok::<_, BoxError>(controller.service.describe("42")),
        )
        .build()
}

fn catalog(descriptors: Vec<ComponentDescriptor>) -> anyhow::Result<Arc<ComponentCatalog>> {
    let mut catalog = ComponentCatalog::new();
    catalog.register_all(descriptors)?;
    Ok(Arc::new(catalog))
}

fn full_catalog() -> anyhow::Result<Arc<ComponentCatalog>> {
    catalog(vec![
        user_controller(),
        user_service(ParameterDescriptor::of::<dyn Cache>().qualified("fast")),
        slow_cache(),
        fast_cache(),
        logger(),
    ])
}

fn config() -> ContainerConfig {
    ContainerConfig::new(module_path!())
}

#[test]
fn test_logger_injected_into_service() -> anyhow::Result<()> {
    let registry = ContainerRegistry::bootstrap(
        catalog(vec![
            user_service(ParameterDescriptor::of::<dyn Cache>()),
            logger(),
            slow_cache(),
        ])?,
        &config(),
    )?;

    let service = registry.resolve::<UserService>()?;
    assert!(Arc::ptr_eq(&service.logger, &registry.resolve::<Logger>()?));
    assert_eq!(service.cache.name(), "slow");
    assert_eq!(registry.bean_count(), 3);
    Ok(())
}

#[test]
fn test_alias_selects_fast_cache() -> anyhow::Result<()> {
    let registry = ContainerRegistry::bootstrap(full_catalog()?, &config())?;

    let service = registry.resolve::<UserService>()?;
    assert_eq!(service.cache.name(), "fast");

    // 两个实现都被创建，契约名称下有两个候选
    assert_eq!(registry.beans_named("Cache").len(), 2);
    assert_eq!(registry.beans_named("fast").len(), 1);
    assert_eq!(registry.beans_named("SlowCache").len(), 1);
    assert!(registry.resolve::<SlowCache>().is_ok());
    assert!(matches!(
        registry.resolve::<dyn Cache>(),
        Err(DependencyError::UnresolvedDependency { .. })
    ));
    Ok(())
}

#[test]
fn test_untagged_contract_with_two_implementations_fails() -> anyhow::Result<()> {
    let result = ContainerRegistry::bootstrap(
        catalog(vec![
            user_service(ParameterDescriptor::of::<dyn Cache>()),
            logger(),
            fast_cache(),
            slow_cache(),
        ])?,
        &config(),
    );

    assert!(matches!(
        result,
        Err(InfrastructureError::DependencyError {
            source: DependencyError::UnresolvedDependency { .. }
        })
    ));
    Ok(())
}

#[test]
fn test_missing_contract_under_escalate_policy() -> anyhow::Result<()> {
    let config = config().with_unresolved_policy(UnresolvedPolicy::Escalate);
    let result = ContainerRegistry::bootstrap(
        catalog(vec![user_service(ParameterDescriptor::of::<dyn Cache>()), logger()])?,
        &config,
    );

    assert!(matches!(
        result,
        Err(InfrastructureError::DependencyError {
            source: DependencyError::UnresolvedDependency { .. }
        })
    ));
    Ok(())
}

#[test]
fn test_missing_contract_under_legacy_policy_reaches_constructor() -> anyhow::Result<()> {
    // 参数保持为空，构造函数自己决定是否接受
    let result = ContainerRegistry::bootstrap(
        catalog(vec![user_service(ParameterDescriptor::of::<dyn Cache>()), logger()])?,
        &config(),
    );

    assert!(matches!(
        result,
        Err(InfrastructureError::DependencyError {
            source: DependencyError::BeanCreation { .. }
        })
    ));
    Ok(())
}

#[test]
fn test_controller_routes_are_joined() -> anyhow::Result<()> {
    let registry = ContainerRegistry::bootstrap(full_catalog()?, &config())?;
    let routes = RouteTable::from_registry(&registry)?;

    let show = routes.resolve("/users/{id}", Some(HttpMethod::Get))?;
    let output = show
        .invoke(&RequestContext::new("/users/{id}", Some(HttpMethod::Get)))
        .map_err(|e| anyhow::anyhow!(e))?;
    assert_eq!(output, "INFO user 42 served from fast cache");

    let listed: Vec<String> = routes
        .entries()
        .map(|entry| format!("{:?} {}", entry.method, entry.path))
        .collect();
    assert_eq!(
        listed,
        vec![
            "Some(Get) /users",
            "Some(Post) /users",
            "Some(Get) /users/{id}",
        ]
    );
    Ok(())
}

#[test]
fn test_second_verb_on_same_path() -> anyhow::Result<()> {
    let registry = ContainerRegistry::bootstrap(full_catalog()?, &config())?;
    let routes = RouteTable::from_registry(&registry)?;

    assert_eq!(routes.resolve("/users", Some(HttpMethod::Get))?.handler.name, "list");
    assert_eq!(routes.resolve("/users", Some(HttpMethod::Post))?.handler.name, "create");
    assert_eq!(
        routes.resolve("/users", Some(HttpMethod::Put)).unwrap_err(),
        RoutingError::MethodNotFound {
            path: "/users".to_string(),
            method: "PUT".to_string(),
        }
    );
    Ok(())
}

#[test]
fn test_duplicate_route_fails_startup() -> anyhow::Result<()> {
    #[derive(Debug, Default)]
    struct EchoController;

    let echo = ComponentDescriptor::controller::<EchoController>()
        .default_constructor()
        .handler("first", RequestMapping::get("/echo"), |_: &EchoController, _| {
            Ok::<_, BoxError>("first")
        })
        .handler("second", RequestMapping::get("/echo"), |_: &EchoController, _| {
            Ok::<_, BoxError>("second")
        })
        .build();
    let registry = ContainerRegistry::bootstrap(catalog(vec![echo])?, &config())?;

    assert!(matches!(
        RouteTable::from_registry(&registry),
        Err(RoutingError::DuplicateRoute { .. })
    ));
    Ok(())
}

#[test]
fn test_constructor_cycle_fails_startup() -> anyhow::Result<()> {
    struct Chicken;
    struct Egg;

    let chicken = ComponentDescriptor::component::<Chicken>()
        .constructor(
            ConstructorDescriptor::public()
                .param(ParameterDescriptor::of::<Egg>())
                .build(|_| Ok(Chicken)),
        )
        .build();
    let egg = ComponentDescriptor::component::<Egg>()
        .constructor(
            ConstructorDescriptor::public()
                .param(ParameterDescriptor::of::<Chicken>())
                .build(|_| Ok(Egg)),
        )
        .build();

    let result = ContainerRegistry::bootstrap(catalog(vec![chicken, egg])?, &config());
    assert!(matches!(
        result,
        Err(InfrastructureError::DependencyError {
            source: DependencyError::CircularDependency { .. }
        })
    ));
    Ok(())
}

#[tokio::test]
async fn test_concurrent_route_resolution() -> anyhow::Result<()> {
    let registry = ContainerRegistry::bootstrap(full_catalog()?, &config())?;
    let routes = Arc::new(RouteTable::from_registry(&registry)?);

    let mut handles = Vec::new();
    for _ in 0..16 {
        let routes = routes.clone();
        handles.push(tokio::spawn(async move {
            let route = routes.resolve("/users/{id}", Some(HttpMethod::Get))?;
            route
                .invoke(&RequestContext::new("/users/{id}", Some(HttpMethod::Get)))
                .map_err(|e| anyhow::anyhow!(e))
        }));
    }

    for handle in handles {
        assert_eq!(handle.await??, "INFO user 42 served from fast cache");
    }
    Ok(())
}
