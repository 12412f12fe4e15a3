//! 绑定名称解析抽象接口
//!
//! 提供绑定名称计算和解析链追踪

use infrastructure_common::{BindingName, DependencyError, TypeInfo};
use std::sync::Arc;

/// 绑定名称解析器 trait
///
/// 计算类型可以被查找到的有序绑定名称列表：先是直接实现的契约，
/// 然后是声明的别名；没有别名时以类型自身的简单名称兜底
pub trait BindingResolver: Send + Sync {
    /// 获取类型的绑定名称，结果按类型缓存
    fn binding_names_of(&self, type_info: &TypeInfo) -> Arc<[BindingName]>;
}

/// 解析上下文
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// 当前解析链，用于检测循环依赖
    pub resolution_chain: Vec<String>,
    /// 最大递归深度
    pub max_depth: usize,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new(max_depth: usize) -> Self {
        Self {
            resolution_chain: Vec::new(),
            max_depth,
        }
    }

    /// 添加类型到解析链
    pub fn push_type(&mut self, qualified_name: &str) -> Result<(), DependencyError> {
        if self.contains(qualified_name) {
            return Err(self.cycle_through(qualified_name));
        }
        if self.resolution_chain.len() >= self.max_depth {
            return Err(DependencyError::ResolutionDepthExceeded {
                type_name: qualified_name.to_string(),
                max_depth: self.max_depth,
            });
        }
        self.resolution_chain.push(qualified_name.to_string());
        Ok(())
    }

    /// 以当前解析链加上再次出现的类型构造循环依赖错误
    pub fn cycle_through(&self, qualified_name: &str) -> DependencyError {
        let chain = self
            .resolution_chain
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(qualified_name))
            .collect::<Vec<_>>()
            .join(" -> ");
        DependencyError::CircularDependency {
            dependency_chain: chain,
        }
    }

    /// 从解析链中移除类型
    pub fn pop_type(&mut self) {
        self.resolution_chain.pop();
    }

    /// 回退解析链到指定深度
    pub fn unwind_to(&mut self, depth: usize) {
        self.resolution_chain.truncate(depth);
    }

    /// 当前深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }

    /// 类型是否已经在解析链上
    pub fn contains(&self, qualified_name: &str) -> bool {
        self.resolution_chain.iter().any(|name| name == qualified_name)
    }
}
