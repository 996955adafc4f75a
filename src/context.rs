//! # Context 模块
//!
//! 定义求值上下文与宿主对象的属性暴露接口。
//!
//! ## 沙箱边界
//!
//! 规则能看到的宿主状态完全由宿主通过 [`AttributeSurface`] 显式声明：
//! 一个扁平的、以字符串为键的属性表。引擎不调用任意宿主方法、
//! 不传递参数、不做反射；未声明的属性一律视为不存在。

use std::collections::HashMap;
use std::fmt;

use crate::value::Value;

/// 宿主对象的属性暴露接口
///
/// 宿主为每种可被规则访问的对象类型实现此 trait。
/// 引擎只会调用这两个方法，这就是全部的安全边界。
pub trait AttributeSurface {
    /// 对象的类型名称，用于错误信息
    fn type_name(&self) -> &str;

    /// 查找命名属性
    ///
    /// 返回 `None` 表示该对象不暴露此属性。
    fn attribute(&self, name: &str) -> Option<Binding<'_>>;
}

/// 变量或属性解析出的绑定：标量值，或宿主对象引用
///
/// 引擎在单次求值调用之外不保留任何 `Binding`。
#[derive(Clone)]
pub enum Binding<'host> {
    /// 标量值
    Value(Value),
    /// 宿主对象引用
    Object(&'host dyn AttributeSurface),
}

impl Binding<'_> {
    /// 绑定的类型名称，用于错误信息
    pub fn kind_name(&self) -> String {
        match self {
            Binding::Value(value) => value.kind_name().to_string(),
            Binding::Object(object) => object.type_name().to_string(),
        }
    }

    /// 真值判定：对象恒为真，值按 [`Value::is_truthy`]
    pub fn is_truthy(&self) -> bool {
        match self {
            Binding::Value(value) => value.is_truthy(),
            Binding::Object(_) => true,
        }
    }
}

impl From<Value> for Binding<'_> {
    fn from(value: Value) -> Self {
        Binding::Value(value)
    }
}

impl fmt::Debug for Binding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Binding::Object(object) => f.debug_tuple("Object").field(&object.type_name()).finish(),
        }
    }
}

impl PartialEq for Binding<'_> {
    /// 结构相等：值按 [`Value`] 的相等语义，对象按引用同一性
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Binding::Value(a), Binding::Value(b)) => a == b,
            (Binding::Object(a), Binding::Object(b)) => std::ptr::addr_eq(*a, *b),
            _ => false,
        }
    }
}

/// 求值上下文
///
/// 提供变量查找能力，由调用方在每次求值前构造、调用后丢弃。
pub trait EvalContext {
    /// 获取变量绑定
    fn get_var(&self, name: &str) -> Option<Binding<'_>>;
}

impl<'host> EvalContext for HashMap<String, Binding<'host>> {
    fn get_var(&self, name: &str) -> Option<Binding<'_>> {
        self.get(name).cloned()
    }
}

/// 纯标量上下文的便捷实现
impl EvalContext for HashMap<String, Value> {
    fn get_var(&self, name: &str) -> Option<Binding<'_>> {
        self.get(name).cloned().map(Binding::Value)
    }
}
