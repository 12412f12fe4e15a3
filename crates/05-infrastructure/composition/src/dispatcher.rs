//! 请求分发
//!
//! 把路由结果转换为带状态码的响应

use crate::application::Application;
use di_abstractions::RouteResolver;
use infrastructure_common::{HttpMethod, RequestContext, RoutingError};
use tracing::{debug, error, warn};

/// 成功响应的内容类型
pub const CONTENT_TYPE_HTML: &str = "text/html; charset=UTF-8";

/// 分发请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    /// 请求路径
    pub path: String,
    /// 请求方法的原始文本，`None` 表示未指定
    pub verb: Option<String>,
}

impl DispatchRequest {
    /// 创建带请求方法的请求
    pub fn new(verb: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            verb: Some(verb.into()),
        }
    }

    /// 创建不带请求方法的请求
    pub fn any(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            verb: None,
        }
    }
}

/// 分发响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResponse {
    /// 状态码
    pub status: u16,
    /// 状态说明
    pub reason: &'static str,
    /// 内容类型
    pub content_type: &'static str,
    /// 响应内容
    pub body: String,
}

impl DispatchResponse {
    /// 成功响应
    pub fn ok(body: String) -> Self {
        Self {
            status: 200,
            reason: "OK",
            content_type: CONTENT_TYPE_HTML,
            body,
        }
    }

    /// 错误响应，内容即状态说明
    pub fn error(status: u16, reason: &'static str) -> Self {
        Self {
            status,
            reason,
            content_type: CONTENT_TYPE_HTML,
            body: reason.to_string(),
        }
    }

    /// 请求格式错误
    pub fn bad_request() -> Self {
        Self::error(400, "Bad request")
    }

    /// 路径不存在
    pub fn not_found() -> Self {
        Self::error(404, "The resource is not found")
    }

    /// 请求方法不支持
    pub fn method_not_supported() -> Self {
        Self::error(403, "Method is not supported")
    }

    /// 处理器执行失败
    pub fn internal_error() -> Self {
        Self::error(500, "Internal server error")
    }

    /// 是否成功
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

impl From<&RoutingError> for DispatchResponse {
    fn from(error: &RoutingError) -> Self {
        match error {
            RoutingError::PathNotFound { .. } => Self::not_found(),
            RoutingError::MethodNotFound { .. } => Self::method_not_supported(),
            RoutingError::UnknownMethod { .. } => Self::bad_request(),
            RoutingError::DuplicateRoute { .. } => Self::internal_error(),
        }
    }
}

impl Application {
    /// 分发请求
    ///
    /// 请求方法按忽略大小写的方式解析；路由未命中和处理器失败都转换为对应的状态码
    pub fn dispatch(&self, request: &DispatchRequest) -> DispatchResponse {
        let method = match request
            .verb
            .as_deref()
            .map(str::parse::<HttpMethod>)
            .transpose()
        {
            Ok(method) => method,
            Err(e) => {
                warn!("{}", e);
                return DispatchResponse::from(&e);
            }
        };

        let route = match self.routes().resolve(&request.path, method) {
            Ok(route) => route,
            Err(e) => {
                debug!("{}", e);
                return DispatchResponse::from(&e);
            }
        };

        let context = RequestContext::new(request.path.clone(), method);
        match route.invoke(&context) {
            Ok(body) => DispatchResponse::ok(body),
            Err(e) => {
                error!(
                    "处理器执行失败: {}.{}, 错误: {}",
                    route.controller.type_info(),
                    route.handler.name,
                    e
                );
                DispatchResponse::internal_error()
            }
        }
    }
}
