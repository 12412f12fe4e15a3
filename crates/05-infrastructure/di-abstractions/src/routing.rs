//! 路由抽象接口

use infrastructure_common::{
    Bean, BoxError, HandlerDescriptor, HttpMethod, RequestContext, RoutingError,
};
use std::sync::Arc;

/// 路由条目
///
/// 启动时构建一次，之后不可变
#[derive(Debug, Clone)]
pub struct RouteEntry {
    /// 完整路径（基础路径 + 方法路径）
    pub path: String,
    /// 请求方法，`None` 表示匹配任意方法
    pub method: Option<HttpMethod>,
    /// 处理器方法
    pub handler: HandlerDescriptor,
    /// 所属控制器实例
    pub controller: Bean,
}

impl RouteEntry {
    /// 调用处理器
    pub fn invoke(&self, request: &RequestContext) -> Result<String, BoxError> {
        self.handler.invoke(&self.controller, request)
    }
}

/// 路由解析器 trait
pub trait RouteResolver: Send + Sync {
    /// 按路径和请求方法解析处理器
    ///
    /// 路径不存在返回 [`RoutingError::PathNotFound`]，
    /// 路径存在但方法不匹配返回 [`RoutingError::MethodNotFound`]
    fn resolve(
        &self,
        path: &str,
        method: Option<HttpMethod>,
    ) -> Result<Arc<RouteEntry>, RoutingError>;
}
