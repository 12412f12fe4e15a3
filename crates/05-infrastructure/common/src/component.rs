//! 组件描述定义
//!
//! 组件通过类型化的描述符注册：描述符携带标记、绑定声明、构造函数、字段和请求映射，
//! 取代运行时反射读取的注解

use crate::bean::{AnyArc, BeanInstance, ConstructorArgs, ContractView};
use crate::errors::{BoxError, DependencyError};
use crate::metadata::{RequestContext, RequestMapping, TypeInfo};
use once_cell::sync::OnceCell;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 组件标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// 普通组件
    Component,
    /// 服务
    Service,
    /// 控制器，参与路由表构建
    Controller,
}

/// 构造函数可见性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
}

type ConstructFn = Arc<dyn Fn(&ConstructorArgs) -> Result<AnyArc, BoxError> + Send + Sync>;
type AssignFn = Arc<dyn Fn(&BeanInstance, &BeanInstance) -> Result<(), BoxError> + Send + Sync>;
type HandlerFn =
    Arc<dyn Fn(&BeanInstance, &RequestContext) -> Result<String, BoxError> + Send + Sync>;

/// 构造函数参数描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    /// 参数声明的类型
    pub type_info: TypeInfo,
    /// 参数上声明的限定别名
    pub qualifier: Option<String>,
}

impl ParameterDescriptor {
    /// 以类型声明参数，支持 `dyn Trait`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            qualifier: None,
        }
    }

    /// 为参数指定限定别名
    pub fn qualified(mut self, alias: impl Into<String>) -> Self {
        self.qualifier = Some(alias.into());
        self
    }
}

/// 构造函数描述
#[derive(Clone)]
pub struct ConstructorDescriptor {
    /// 可见性
    pub visibility: Visibility,
    /// 参数列表（按声明顺序）
    pub parameters: Vec<ParameterDescriptor>,
    /// 注入标记的数量
    pub designations: usize,
    construct: ConstructFn,
}

impl ConstructorDescriptor {
    /// 声明公开构造函数
    pub fn public() -> ConstructorBuilder {
        ConstructorBuilder::new(Visibility::Public)
    }

    /// 声明非公开构造函数，构造函数选择时不予考虑
    pub fn private() -> ConstructorBuilder {
        ConstructorBuilder::new(Visibility::Private)
    }

    /// 是否公开
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// 参数个数
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// 调用构造函数
    pub fn construct(&self, args: &ConstructorArgs) -> Result<AnyArc, BoxError> {
        (self.construct)(args)
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("visibility", &self.visibility)
            .field("parameters", &self.parameters)
            .field("designations", &self.designations)
            .field("construct", &"<function>")
            .finish()
    }
}

/// 构造函数构建器
#[derive(Debug)]
pub struct ConstructorBuilder {
    visibility: Visibility,
    parameters: Vec<ParameterDescriptor>,
    designations: usize,
}

impl ConstructorBuilder {
    fn new(visibility: Visibility) -> Self {
        Self {
            visibility,
            parameters: Vec::new(),
            designations: 0,
        }
    }

    /// 追加参数
    pub fn param(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// 追加一个注入标记，可重复
    pub fn autowired(mut self) -> Self {
        self.designations += 1;
        self
    }

    /// 绑定构造逻辑，完成构建
    pub fn build<T, F>(self, construct: F) -> ConstructorDescriptor
    where
        T: Send + Sync + 'static,
        F: Fn(&ConstructorArgs) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        ConstructorDescriptor {
            visibility: self.visibility,
            parameters: self.parameters,
            designations: self.designations,
            construct: Arc::new(move |args: &ConstructorArgs| {
                construct(args).map(|value| Arc::new(value) as AnyArc)
            }),
        }
    }
}

/// 可注入字段
///
/// 字段注入在实例共享之后进行，因此字段只能写入一次
pub struct Injected<T: ?Sized>(OnceCell<Arc<T>>);

impl<T: ?Sized> Injected<T> {
    /// 创建未注入的字段
    pub fn new() -> Self {
        Self(OnceCell::new())
    }

    /// 获取已注入的值
    pub fn get(&self) -> Option<&Arc<T>> {
        self.0.get()
    }

    /// 是否已注入
    pub fn is_injected(&self) -> bool {
        self.0.get().is_some()
    }

    /// 写入字段
    pub fn inject(&self, value: Arc<T>) -> Result<(), BoxError> {
        self.0.set(value).map_err(|_| "字段已经注入过".into())
    }
}

impl<T: ?Sized> Default for Injected<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Injected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Injected").field(&self.is_injected()).finish()
    }
}

/// 字段描述
#[derive(Clone)]
pub struct FieldDescriptor {
    /// 字段名称
    pub name: String,
    /// 字段声明的类型
    pub field_type: TypeInfo,
    assign: AssignFn,
}

impl FieldDescriptor {
    /// 把依赖写入目标实例的字段
    pub fn assign(&self, target: &BeanInstance, dependency: &BeanInstance) -> Result<(), BoxError> {
        (self.assign)(target, dependency)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("field_type", &self.field_type.qualified_name)
            .finish()
    }
}

/// 处理器方法描述
#[derive(Clone)]
pub struct HandlerDescriptor {
    /// 方法名称
    pub name: String,
    /// 方法级别的请求映射
    pub mapping: RequestMapping,
    invoke: HandlerFn,
}

impl HandlerDescriptor {
    /// 在所属控制器上调用处理器
    pub fn invoke(
        &self,
        controller: &BeanInstance,
        request: &RequestContext,
    ) -> Result<String, BoxError> {
        (self.invoke)(controller, request)
    }
}

impl fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("name", &self.name)
            .field("mapping", &self.mapping)
            .finish()
    }
}

/// 组件描述符
///
/// 注册时生成一次，之后不可变
#[derive(Clone)]
pub struct ComponentDescriptor {
    /// 类型信息（包含契约和别名）
    pub type_info: TypeInfo,
    /// 组件标记，`None` 表示不受容器管理
    pub kind: Option<ComponentKind>,
    /// 构造函数列表
    pub constructors: Vec<ConstructorDescriptor>,
    /// 字段列表
    pub fields: Vec<FieldDescriptor>,
    /// 类级别的请求映射
    pub request_mapping: Option<RequestMapping>,
    /// 处理器方法列表
    pub handlers: Vec<HandlerDescriptor>,
    views: Vec<ContractView>,
}

impl ComponentDescriptor {
    /// 不带标记的描述符构建器
    pub fn builder<T: Send + Sync + 'static>() -> ComponentBuilder<T> {
        ComponentBuilder::new(None)
    }

    /// 普通组件
    pub fn component<T: Send + Sync + 'static>() -> ComponentBuilder<T> {
        ComponentBuilder::new(Some(ComponentKind::Component))
    }

    /// 服务组件
    pub fn service<T: Send + Sync + 'static>() -> ComponentBuilder<T> {
        ComponentBuilder::new(Some(ComponentKind::Service))
    }

    /// 控制器组件
    pub fn controller<T: Send + Sync + 'static>() -> ComponentBuilder<T> {
        ComponentBuilder::new(Some(ComponentKind::Controller))
    }

    /// 全限定类型名称
    pub fn qualified_name(&self) -> &str {
        &self.type_info.qualified_name
    }

    /// 是否受容器管理
    pub fn is_managed(&self) -> bool {
        self.kind.is_some()
    }

    /// 是否为控制器
    pub fn is_controller(&self) -> bool {
        self.kind == Some(ComponentKind::Controller)
    }

    /// 公开构造函数
    pub fn public_constructors(&self) -> impl Iterator<Item = &ConstructorDescriptor> {
        self.constructors.iter().filter(|c| c.is_public())
    }

    /// 公开的无参构造函数
    pub fn default_constructor(&self) -> Option<&ConstructorDescriptor> {
        self.public_constructors().find(|c| c.arity() == 0)
    }

    /// 用构造结果创建组件实例
    pub fn instantiate(&self, object: AnyArc) -> Result<BeanInstance, DependencyError> {
        BeanInstance::new(self.type_info.clone(), object, &self.views)
    }
}

impl fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("type_info", &self.type_info)
            .field("kind", &self.kind)
            .field("constructors", &self.constructors)
            .field("fields", &self.fields)
            .field("request_mapping", &self.request_mapping)
            .field("handlers", &self.handlers)
            .finish()
    }
}

/// 组件描述符构建器
pub struct ComponentBuilder<T> {
    descriptor: ComponentDescriptor,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> ComponentBuilder<T> {
    fn new(kind: Option<ComponentKind>) -> Self {
        Self {
            descriptor: ComponentDescriptor {
                type_info: TypeInfo::of::<T>(),
                kind,
                constructors: Vec::new(),
                fields: Vec::new(),
                request_mapping: None,
                handlers: Vec::new(),
                views: vec![ContractView::concrete::<T>()],
            },
            _marker: PhantomData,
        }
    }

    /// 声明实现的契约，并提供到契约类型的转换
    ///
    /// ```ignore
    /// ComponentDescriptor::component::<FastCache>()
    ///     .implements(|cache: Arc<FastCache>| -> Arc<dyn Cache> { cache })
    /// ```
    pub fn implements<C, F>(mut self, cast: F) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<T>) -> Arc<C> + Send + Sync + 'static,
    {
        self.descriptor.type_info = self.descriptor.type_info.implements::<C>();
        self.descriptor.views.push(ContractView::contract(cast));
        self
    }

    /// 只声明契约名称，不提供类型化视图
    pub fn implements_named(mut self, contract: impl Into<String>) -> Self {
        self.descriptor.type_info = self.descriptor.type_info.implements_named(contract);
        self
    }

    /// 声明限定别名，可重复
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.descriptor.type_info = self.descriptor.type_info.alias(alias);
        self
    }

    /// 添加构造函数
    pub fn constructor(mut self, constructor: ConstructorDescriptor) -> Self {
        self.descriptor.constructors.push(constructor);
        self
    }

    /// 添加基于 `Default` 的公开无参构造函数
    pub fn default_constructor(self) -> Self
    where
        T: Default,
    {
        self.constructor(ConstructorDescriptor::public().build(|_| Ok(T::default())))
    }

    /// 声明可注入字段
    pub fn field<D, F>(mut self, name: impl Into<String>, accessor: F) -> Self
    where
        D: Send + Sync + 'static,
        F: Fn(&T) -> &Injected<D> + Send + Sync + 'static,
    {
        let assign: AssignFn = Arc::new(move |target: &BeanInstance, dependency: &BeanInstance| {
            let owner = target.get::<T>().ok_or("目标实例类型不匹配")?;
            let value = dependency.get::<D>().ok_or("依赖实例类型不匹配")?;
            accessor(&*owner).inject(value)
        });

        self.descriptor.fields.push(FieldDescriptor {
            name: name.into(),
            field_type: TypeInfo::of::<D>(),
            assign,
        });
        self
    }

    /// 设置类级别的请求映射
    pub fn request_mapping(mut self, mapping: RequestMapping) -> Self {
        self.descriptor.request_mapping = Some(mapping);
        self
    }

    /// 声明处理器方法
    pub fn handler<R, F>(
        mut self,
        name: impl Into<String>,
        mapping: RequestMapping,
        handler: F,
    ) -> Self
    where
        R: ToString + 'static,
        F: Fn(&T, &RequestContext) -> Result<R, BoxError> + Send + Sync + 'static,
    {
        let invoke: HandlerFn =
            Arc::new(move |controller: &BeanInstance, request: &RequestContext| {
                let owner = controller.get::<T>().ok_or("控制器实例类型不匹配")?;
                handler(&*owner, request).map(|output| output.to_string())
            });

        self.descriptor.handlers.push(HandlerDescriptor {
            name: name.into(),
            mapping,
            invoke,
        });
        self
    }

    /// 完成构建
    pub fn build(self) -> ComponentDescriptor {
        self.descriptor
    }
}
