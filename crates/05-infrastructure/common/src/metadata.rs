//! 元数据定义
//!
//! 提供类型标识、绑定声明和请求映射等元数据

use crate::errors::RoutingError;
use std::any::TypeId;
use std::fmt;
use std::str::FromStr;

/// 绑定名称，组件通过它被查找
pub type BindingName = String;

/// 类型信息
///
/// 描述一个类型的身份：全限定名、简单名，以及它声明的契约与别名
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 简单类型名称（不包含模块路径）
    pub name: String,
    /// 全限定类型名称
    pub qualified_name: String,
    /// 类型ID
    pub id: TypeId,
    /// 直接实现的契约（简单名称，按声明顺序）
    pub interfaces: Vec<String>,
    /// 声明的限定别名（按声明顺序）
    pub aliases: Vec<String>,
}

impl TypeInfo {
    /// 从类型获取类型信息，支持 `dyn Trait` 契约类型
    pub fn of<T: ?Sized + 'static>() -> Self {
        let qualified_name = normalize_type_name(std::any::type_name::<T>());
        Self {
            name: simple_name(&qualified_name).to_string(),
            qualified_name,
            id: TypeId::of::<T>(),
            interfaces: Vec::new(),
            aliases: Vec::new(),
        }
    }

    /// 声明实现的契约
    pub fn implements<C: ?Sized + 'static>(self) -> Self {
        let contract = normalize_type_name(std::any::type_name::<C>());
        self.implements_named(simple_name(&contract))
    }

    /// 按名称声明实现的契约
    pub fn implements_named(mut self, contract: impl Into<String>) -> Self {
        self.interfaces.push(contract.into());
        self
    }

    /// 声明限定别名
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        &self.name
    }

    /// 类型所在的命名空间，顶层类型返回空字符串
    pub fn namespace(&self) -> &str {
        namespace_of(&self.qualified_name)
    }

    /// 字段注入使用的注册键：大写的全限定名称
    pub fn registration_key(&self) -> String {
        self.qualified_name.to_uppercase()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name)
    }
}

/// 去掉 trait object 的 `dyn` 前缀和自动 trait 约束
///
/// 只处理最外层的 trait object，泛型参数中的约束保持不变
fn normalize_type_name(raw: &str) -> String {
    let Some(object) = raw.strip_prefix("dyn ") else {
        return raw.to_string();
    };

    let mut depth = 0usize;
    for (index, ch) in object.char_indices() {
        match ch {
            '<' | '(' => depth += 1,
            '>' | ')' => depth = depth.saturating_sub(1),
            '+' if depth == 0 => return object[..index].trim_end().to_string(),
            _ => {}
        }
    }
    object.to_string()
}

/// 全限定名称中的最后一段，泛型参数不参与拆分
fn simple_name(qualified_name: &str) -> &str {
    let base = qualified_name.split('<').next().unwrap_or(qualified_name);
    base.rsplit("::").next().unwrap_or(base)
}

/// 全限定名称中最后一段之前的部分
pub fn namespace_of(qualified_name: &str) -> &str {
    let base = qualified_name.split('<').next().unwrap_or(qualified_name);
    base.rfind("::").map_or("", |index| &qualified_name[..index])
}

/// 请求方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    /// 方法的大写文本形式
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = RoutingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "delete" => Ok(HttpMethod::Delete),
            "patch" => Ok(HttpMethod::Patch),
            "head" => Ok(HttpMethod::Head),
            "options" => Ok(HttpMethod::Options),
            _ => Err(RoutingError::UnknownMethod {
                raw: raw.to_string(),
            }),
        }
    }
}

/// 请求映射
///
/// 类级别的映射提供基础路径，方法级别的映射提供子路径和可选的请求方法
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMapping {
    /// 路径
    pub path: String,
    /// 请求方法，`None` 表示匹配任意方法
    pub method: Option<HttpMethod>,
}

impl RequestMapping {
    /// 创建不限定请求方法的映射
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: None,
        }
    }

    /// 创建 GET 映射
    pub fn get(path: impl Into<String>) -> Self {
        Self::path(path).with_method(HttpMethod::Get)
    }

    /// 创建 POST 映射
    pub fn post(path: impl Into<String>) -> Self {
        Self::path(path).with_method(HttpMethod::Post)
    }

    /// 设置请求方法
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }
}

/// 传递给处理器的请求上下文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// 请求路径
    pub path: String,
    /// 请求方法
    pub method: Option<HttpMethod>,
}

impl RequestContext {
    /// 创建新的请求上下文
    pub fn new(path: impl Into<String>, method: Option<HttpMethod>) -> Self {
        Self {
            path: path.into(),
            method,
        }
    }
}
