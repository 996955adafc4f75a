//! # Rules Engine
//!
//! 沙箱化的布尔规则引擎核心库。
//!
//! 给定一条文本规则（如 `user.age > 20 and user.member == true`）和一个把
//! 名字映射到宿主对象的上下文，把规则求值为布尔结果。规则可以来自
//! 半受信来源（管理后台、配置文件）：求值过程绝不调用任意宿主方法，
//! 绝不越出宿主通过 [`AttributeSurface`] 显式声明的属性表。
//!
//! ## 架构概述
//!
//! 三个组件按严格的管线顺序工作，全部无状态、无 IO、无共享可变状态：
//!
//! ```text
//! 规则文本 ──► [Lexer] ──► Vec<Token> ──► [Parser] ──► Node ──► [Evaluator] ──► bool
//! ```
//!
//! ## 核心类型
//!
//! - [`Rule`]：已编译的规则（一次解析，跨上下文复用）
//! - [`Value`]：运行时值（封闭和类型）
//! - [`AttributeSurface`]：宿主对象的属性暴露接口（沙箱边界）
//! - [`EvalContext`]：变量查找上下文
//! - [`EngineError`]：解析错误与求值错误的统一类型
//!
//! ## 使用示例
//!
//! ```ignore
//! use rules_engine::{evaluate, Value};
//! use std::collections::HashMap;
//!
//! let mut ctx: HashMap<String, Value> = HashMap::new();
//! ctx.insert("age".to_string(), Value::Int(25));
//! ctx.insert("member".to_string(), Value::Bool(true));
//!
//! assert!(evaluate("age > 20 and member == true", &ctx)?);
//! ```
//!
//! ## 模块结构
//!
//! - [`lexer`]：词法分析（文本 → token 序列）
//! - [`parser`]：优先级爬升解析器（token 序列 → AST）
//! - [`ast`]：AST 节点定义
//! - [`eval`]：沙箱化求值器
//! - [`value`]：运行时值类型
//! - [`context`]：求值上下文与属性暴露接口
//! - [`engine`]：公共入口与已编译规则
//! - [`error`]：错误类型定义

pub mod ast;
pub mod context;
pub mod engine;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod value;

// 重导出核心类型
pub use ast::{BinaryOperator, Node};
pub use context::{AttributeSurface, Binding, EvalContext};
pub use engine::{Rule, evaluate, evaluate_value};
pub use error::{EngineError, EvalError, ParseError, RulesResult};
pub use lexer::{Token, TokenKind, tokenize};
pub use value::Value;
