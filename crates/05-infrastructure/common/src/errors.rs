//! 错误类型定义

use thiserror::Error;

/// 通用的装箱错误类型，组件构造函数和处理器都返回它
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError { source: BoxError },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("组件未注册: {type_name}")]
    ComponentNotRegistered { type_name: String },

    #[error("无法确定注入构造函数: {type_name}, 原因: {message}")]
    AmbiguousConstructor { type_name: String, message: String },

    #[error("依赖解析失败: {type_name}, 原因: {message}")]
    UnresolvedDependency { type_name: String, message: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    BeanCreation { type_name: String, source: BoxError },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("解析深度超过上限 {max_depth}: {type_name}")]
    ResolutionDepthExceeded { type_name: String, max_depth: usize },
}

impl DependencyError {
    /// 创建依赖解析失败错误
    pub fn unresolved(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnresolvedDependency {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// 创建构造函数歧义错误
    pub fn ambiguous_constructor(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AmbiguousConstructor {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// 创建组件创建失败错误
    pub fn bean_creation(type_name: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::BeanCreation {
            type_name: type_name.into(),
            source: source.into(),
        }
    }
}

/// 组件错误类型
#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("组件扫描失败: {message}")]
    ScanError { message: String },

    #[error("组件注册失败: {type_name}, 原因: {message}")]
    RegistrationError { type_name: String, message: String },

    #[error("组件元数据无效: {message}")]
    InvalidMetadata { message: String },
}

impl ComponentError {
    /// 创建扫描错误
    pub fn scan_error(message: impl Into<String>) -> Self {
        Self::ScanError {
            message: message.into(),
        }
    }
}

/// 路由错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    #[error("路径没有对应的处理器: {path}")]
    PathNotFound { path: String },

    #[error("路径 {path} 不支持请求方法 {method}")]
    MethodNotFound { path: String, method: String },

    #[error("路由重复注册: {method} {path}")]
    DuplicateRoute { path: String, method: String },

    #[error("无法识别的请求方法: {raw}")]
    UnknownMethod { raw: String },
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("组件错误: {source}")]
    ComponentError {
        #[from]
        source: ComponentError,
    },

    #[error("路由错误: {source}")]
    RoutingError {
        #[from]
        source: RoutingError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type RoutingResult<T> = Result<T, RoutingError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let error = DependencyError::bean_creation("demo::Service", io);

        let source = std::error::Error::source(&error).expect("应该保留原始错误");
        assert_eq!(source.to_string(), "boom");
    }

    #[test]
    fn test_infrastructure_error_from_routing_error() {
        let error: InfrastructureError = RoutingError::PathNotFound {
            path: "/missing".to_string(),
        }
        .into();

        assert!(matches!(
            error,
            InfrastructureError::RoutingError {
                source: RoutingError::PathNotFound { .. }
            }
        ));
    }
}
