//! 容器配置

use serde::Deserialize;

/// 无法解析依赖时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedPolicy {
    /// 兼容旧行为：字段保持默认值，构造参数留空，并记录警告
    #[default]
    LeaveUnset,
    /// 升级为依赖解析失败
    Escalate,
}

/// 容器构建流程
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pipeline {
    /// 构造函数注入
    #[default]
    Constructor,
    /// 无参构造后直接字段注入
    FieldInjection,
}

/// 容器配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 扫描的根命名空间
    pub root_namespace: String,
    /// 构建流程
    pub pipeline: Pipeline,
    /// 无法解析依赖时的处理策略
    pub unresolved_policy: UnresolvedPolicy,
    /// 最大解析深度
    pub max_resolution_depth: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            root_namespace: String::new(),
            pipeline: Pipeline::default(),
            unresolved_policy: UnresolvedPolicy::default(),
            max_resolution_depth: 64,
        }
    }
}

impl ContainerConfig {
    /// 以根命名空间创建配置
    pub fn new(root_namespace: impl Into<String>) -> Self {
        Self {
            root_namespace: root_namespace.into(),
            ..Self::default()
        }
    }

    /// 设置构建流程
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// 设置无法解析依赖时的处理策略
    pub fn with_unresolved_policy(mut self, policy: UnresolvedPolicy) -> Self {
        self.unresolved_policy = policy;
        self
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerStats {
    /// 扫描发现的类型数量
    pub discovered_types: usize,
    /// 创建的组件实例数量
    pub created_beans: usize,
    /// 绑定名称数量
    pub binding_names: usize,
    /// 路由条目数量
    pub routes: usize,
}
