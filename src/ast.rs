//! # AST 模块
//!
//! 定义规则表达式的抽象语法树。
//!
//! AST 是一棵由父节点独占所有权的树（无共享、无环），
//! 解析成功的非空规则恰好产出一棵完整的树。

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// 二元运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `and`
    And,
    /// `or`
    Or,
}

impl BinaryOperator {
    /// 运算符的源码写法，用于错误信息
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Eq => "==",
            BinaryOperator::Ne => "!=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Le => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Ge => ">=",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
        }
    }
}

/// 表达式 AST 节点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// 字面量值
    Literal(Value),

    /// 变量引用
    Variable { name: String },

    /// 属性访问
    ///
    /// `a.b.c` 解析为左结合的嵌套节点：
    /// `AttributeAccess(AttributeAccess(Variable(a), b), c)`
    AttributeAccess {
        object: Box<Node>,
        attribute: String,
    },

    /// 二元运算
    BinaryOp {
        op: BinaryOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    /// 整数字面量
    pub fn int(n: i64) -> Self {
        Self::Literal(Value::Int(n))
    }

    /// 浮点数字面量
    pub fn float(x: f64) -> Self {
        Self::Literal(Value::Float(x))
    }

    /// 字符串字面量
    pub fn string(s: impl Into<String>) -> Self {
        Self::Literal(Value::String(s.into()))
    }

    /// 布尔字面量
    pub fn bool(b: bool) -> Self {
        Self::Literal(Value::Bool(b))
    }

    /// nil 字面量
    pub fn nil() -> Self {
        Self::Literal(Value::Nil)
    }

    /// 变量引用
    pub fn var(name: impl Into<String>) -> Self {
        Self::Variable { name: name.into() }
    }

    /// 属性访问
    pub fn attr(object: Node, attribute: impl Into<String>) -> Self {
        Self::AttributeAccess {
            object: Box::new(object),
            attribute: attribute.into(),
        }
    }

    /// 二元运算
    pub fn binary(op: BinaryOperator, left: Node, right: Node) -> Self {
        Self::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// 逻辑与
    pub fn and(left: Node, right: Node) -> Self {
        Self::binary(BinaryOperator::And, left, right)
    }

    /// 逻辑或
    pub fn or(left: Node, right: Node) -> Self {
        Self::binary(BinaryOperator::Or, left, right)
    }

    /// 相等比较
    pub fn eq(left: Node, right: Node) -> Self {
        Self::binary(BinaryOperator::Eq, left, right)
    }
}
