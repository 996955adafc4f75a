//! # Engine 模块
//!
//! 规则引擎的公共入口：tokenize → parse → evaluate 的完整管线，
//! 以及可跨上下文复用的已编译规则 [`Rule`]。
//!
//! 每次调用都是自包含的：不缓存、不重试、不保留上下文引用。
//! 同一条规则文本需要反复求值时，用 [`Rule::parse`] 编译一次复用即可。

use serde::{Deserialize, Serialize};

use crate::ast::Node;
use crate::context::{Binding, EvalContext};
use crate::error::{EvalError, ParseError, RulesResult};
use crate::eval;
use crate::lexer::tokenize;
use crate::parser;
use crate::value::Value;

/// 评估一条规则，返回布尔结果
///
/// 顶层结果按真值判定收敛为布尔值（`nil` 和 `false` 为假，其余为真）。
pub fn evaluate(rule: &str, ctx: &impl EvalContext) -> RulesResult<bool> {
    let compiled = Rule::parse(rule)?;
    Ok(compiled.evaluate(ctx)?)
}

/// 评估一条规则，返回原始值（不做真值收敛）
pub fn evaluate_value(rule: &str, ctx: &impl EvalContext) -> RulesResult<Value> {
    let compiled = Rule::parse(rule)?;
    Ok(compiled.evaluate_value(ctx)?)
}

/// 已编译的规则
///
/// 一次解析，跨上下文复用；也可序列化为 JSON 缓存编译结果。
/// 同一段规则文本反复解析产出结构相同的 `Rule`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    root: Node,
}

impl Rule {
    /// 解析规则文本
    pub fn parse(rule: &str) -> Result<Self, ParseError> {
        let tokens = tokenize(rule)?;
        Ok(Self {
            root: parser::parse(tokens)?,
        })
    }

    /// 规则的 AST 根节点
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// 对给定上下文求值为布尔结果
    pub fn evaluate(&self, ctx: &impl EvalContext) -> Result<bool, EvalError> {
        eval::evaluate_to_bool(&self.root, ctx)
    }

    /// 对给定上下文求值为原始值
    ///
    /// 顶层解析为裸对象时无法以 [`Value`] 表示，
    /// 报 [`EvalError::NonValueResult`]。
    pub fn evaluate_value(&self, ctx: &impl EvalContext) -> Result<Value, EvalError> {
        match eval::evaluate(&self.root, ctx)? {
            Binding::Value(value) => Ok(value),
            Binding::Object(obj) => Err(EvalError::NonValueResult {
                type_name: obj.type_name().to_string(),
            }),
        }
    }

    /// 序列化为 JSON，用于缓存已编译规则
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// 从 JSON 恢复已编译规则
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
