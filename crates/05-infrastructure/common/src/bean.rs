//! 组件实例
//!
//! 容器为每个组件描述符创建唯一的实例，并为它的具体类型和每个声明的契约保存类型化视图

use crate::errors::DependencyError;
use crate::metadata::{BindingName, TypeInfo};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 类型擦除后的共享对象
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// 共享的组件实例
pub type Bean = Arc<BeanInstance>;

/// 绑定名称到组件实例集合的映射
pub type BeanMap = HashMap<BindingName, Vec<Bean>>;

/// 视图转换函数：输入具体对象，输出装箱后的 `Arc<View>`
pub(crate) type ViewFn = Arc<dyn Fn(&AnyArc) -> Option<AnyArc> + Send + Sync>;

/// 组件对外暴露的一种类型化视图
#[derive(Clone)]
pub(crate) struct ContractView {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) cast: ViewFn,
}

impl ContractView {
    /// 具体类型本身的视图
    pub(crate) fn concrete<T: Send + Sync + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            cast: Arc::new(|object: &AnyArc| {
                object
                    .clone()
                    .downcast::<T>()
                    .ok()
                    .map(|typed| Arc::new(typed) as AnyArc)
            }),
        }
    }

    /// 契约视图，通过声明时提供的转换函数得到 `Arc<C>`
    pub(crate) fn contract<T, C, F>(cast: F) -> Self
    where
        T: Send + Sync + 'static,
        C: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<T>) -> Arc<C> + Send + Sync + 'static,
    {
        Self {
            type_id: TypeId::of::<C>(),
            type_name: std::any::type_name::<C>(),
            cast: Arc::new(move |object: &AnyArc| {
                object
                    .clone()
                    .downcast::<T>()
                    .ok()
                    .map(|typed| Arc::new(cast(typed)) as AnyArc)
            }),
        }
    }
}

/// 组件实例
///
/// 单例作用域，由容器在进程生命周期内独占持有
pub struct BeanInstance {
    type_info: TypeInfo,
    views: HashMap<TypeId, AnyArc>,
}

impl BeanInstance {
    /// 用构造结果和视图列表创建实例
    pub(crate) fn new(
        type_info: TypeInfo,
        object: AnyArc,
        views: &[ContractView],
    ) -> Result<Self, DependencyError> {
        let mut materialized = HashMap::with_capacity(views.len());
        for view in views {
            let cast = (view.cast)(&object).ok_or_else(|| {
                DependencyError::bean_creation(
                    type_info.qualified_name.clone(),
                    format!("构造结果无法转换为 {}", view.type_name),
                )
            })?;
            materialized.insert(view.type_id, cast);
        }

        Ok(Self {
            type_info,
            views: materialized,
        })
    }

    /// 组件的类型信息
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 以具体类型或声明过的契约类型取出实例
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let view = self.views.get(&TypeId::of::<T>())?;
        (**view).downcast_ref::<Arc<T>>().cloned()
    }
}

impl fmt::Debug for BeanInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanInstance")
            .field("type", &self.type_info.qualified_name)
            .field("views", &self.views.len())
            .finish()
    }
}

/// 构造函数的实参
///
/// 每个位置对应一个参数；未能解析的参数在兼容模式下为空
#[derive(Debug, Clone)]
pub struct ConstructorArgs {
    owner: String,
    slots: Vec<Option<Bean>>,
}

impl ConstructorArgs {
    /// 创建实参列表
    pub fn new(owner: impl Into<String>, slots: Vec<Option<Bean>>) -> Self {
        Self {
            owner: owner.into(),
            slots,
        }
    }

    /// 取出必需的参数
    pub fn required<T: ?Sized + Send + Sync + 'static>(
        &self,
        index: usize,
    ) -> Result<Arc<T>, DependencyError> {
        let bean = self
            .slots
            .get(index)
            .and_then(Option::as_ref)
            .ok_or_else(|| {
                DependencyError::unresolved(
                    self.owner.clone(),
                    format!("第 {} 个参数没有注入任何组件", index),
                )
            })?;

        bean.get::<T>().ok_or_else(|| {
            DependencyError::unresolved(
                self.owner.clone(),
                format!(
                    "第 {} 个参数的组件 {} 不能作为 {} 使用",
                    index,
                    bean.type_info(),
                    std::any::type_name::<T>()
                ),
            )
        })
    }

    /// 取出可选的参数
    pub fn optional<T: ?Sized + Send + Sync + 'static>(&self, index: usize) -> Option<Arc<T>> {
        self.slots.get(index)?.as_ref()?.get::<T>()
    }

    /// 参数个数
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// 是否没有参数
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
