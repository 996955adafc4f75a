//! # Value 模块
//!
//! 定义规则求值的运行时值类型。
//!
//! ## 设计原则
//!
//! - 值类型是**封闭的和类型**，比较和类型错误检测必须穷尽所有情况
//! - 值是不可变的，求值过程不产生任何副作用

use serde::{Deserialize, Serialize};

/// 运行时值
///
/// 规则中任意子表达式求值的结果。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// 整数
    Int(i64),
    /// 浮点数
    Float(f64),
    /// 字符串
    String(String),
    /// 布尔值
    Bool(bool),
    /// 空值
    Nil,
}

impl Value {
    /// 值的类型名称，用于错误信息
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "Integer",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Bool(_) => "Boolean",
            Value::Nil => "Nil",
        }
    }

    /// 真值判定
    ///
    /// `Nil` 和 `false` 为假；其余值（包括 `0`、`0.0`、空字符串）为真。
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// 是否为 `Nil`
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// 数值视图，整数提升为浮点数
    ///
    /// 非数值返回 `None`。
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
