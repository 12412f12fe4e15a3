//! 示例组件
//!
//! 一个小型用户服务：日志、两种缓存实现、仓储、服务和两个控制器

use infrastructure_common::{
    BoxError, ComponentDescriptor, ConstructorDescriptor, ParameterDescriptor, RequestMapping,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// 示例组件所在的命名空间
pub const ROOT_NAMESPACE: &str = module_path!();

/// 日志组件
#[derive(Debug, Default)]
pub struct AuditLog;

impl AuditLog {
    pub fn record(&self, message: &str) {
        info!("[audit] {}", message);
    }
}

/// 缓存契约
pub trait Cache: Send + Sync {
    fn label(&self) -> &'static str;
}

/// 内存缓存
#[derive(Debug, Default)]
pub struct MemoryCache;

impl Cache for MemoryCache {
    fn label(&self) -> &'static str {
        "memory"
    }
}

/// 磁盘缓存
#[derive(Debug, Default)]
pub struct DiskCache;

impl Cache for DiskCache {
    fn label(&self) -> &'static str {
        "disk"
    }
}

/// 用户仓储
#[derive(Debug)]
pub struct UserRepository {
    users: RwLock<BTreeMap<u32, String>>,
}

impl Default for UserRepository {
    fn default() -> Self {
        let users = [(1, "alice"), (2, "bob")]
            .into_iter()
            .map(|(id, name)| (id, name.to_string()))
            .collect();
        Self {
            users: RwLock::new(users),
        }
    }
}

impl UserRepository {
    pub fn names(&self) -> Vec<String> {
        self.users.read().values().cloned().collect()
    }

    pub fn insert(&self, name: &str) -> u32 {
        let mut users = self.users.write();
        let id = users.keys().next_back().map_or(1, |last| last + 1);
        users.insert(id, name.to_string());
        id
    }
}

/// 用户服务
pub struct UserService {
    log: Arc<AuditLog>,
    cache: Arc<dyn Cache>,
    repository: Arc<UserRepository>,
}

impl UserService {
    pub fn list(&self) -> String {
        self.log.record("list users");
        format!(
            "<ul>{}</ul><!-- {} cache -->",
            self.repository
                .names()
                .iter()
                .map(|name| format!("<li>{}</li>", name))
                .collect::<String>(),
            self.cache.label()
        )
    }

    pub fn create(&self) -> String {
        let id = self.repository.insert("guest");
        self.log.record(&format!("created user {}", id));
        format!("created user {}", id)
    }
}

/// 用户控制器
pub struct UserController {
    service: Arc<UserService>,
}

/// 健康检查控制器
#[derive(Debug, Default)]
pub struct HealthController;

/// 全部示例组件的描述符
pub fn descriptors() -> Vec<ComponentDescriptor> {
    vec![
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
            .handler("list", RequestMapping::get(""), |c: &UserController, _| {
                Ok::<_, BoxError>(c.service.list())
            })
            .handler("create", RequestMapping::post(""), |c: &UserController, _| {
                Ok::<_, BoxError>(c.service.create())
            })
            .handler("show", RequestMapping::get("/{id}"), |_: &UserController, request| {
                Ok::<_, BoxError>(format!("user page for {}", request.path))
            })
            .build(),
        ComponentDescriptor::controller::<HealthController>()
            .default_constructor()
            .handler("health", RequestMapping::path("/health"), |_: &HealthController, _| {
                Ok::<_, BoxError>("UP")
            })
            .build(),
        ComponentDescriptor::service::<UserService>()
            .constructor(
                ConstructorDescriptor::public()
                    .param(ParameterDescriptor::of::<AuditLog>())
                    .param(ParameterDescriptor::of::<dyn Cache>().qualified("primary"))
                    .param(ParameterDescriptor::of::<UserRepository>())
                    .build(|args| {
                        Ok(UserService {
                            log: args.required::<AuditLog>(0)?,
                            cache: args.required::<dyn Cache>(1)?,
                            repository: args.required::<UserRepository>(2)?,
                        })
                    }),
            )
            .build(),
        ComponentDescriptor::component::<MemoryCache>()
            .implements(|cache: Arc<MemoryCache>| -> Arc<dyn Cache> { cache })
            .alias("primary")
            .default_constructor()
            .build(),
        ComponentDescriptor::component::<DiskCache>()
            .implements(|cache: Arc<DiskCache>| -> Arc<dyn Cache> { cache })
            .alias("secondary")
            .default_constructor()
            .build(),
        ComponentDescriptor::component::<UserRepository>()
            .default_constructor()
            .build(),
        ComponentDescriptor::component::<AuditLog>()
            .default_constructor()
            .build(),
    ]
}
