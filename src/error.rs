//! # Error 模块
//!
//! 定义 rules-engine 中使用的错误类型。
//!
//! 解析阶段和求值阶段的错误严格分离：解析失败时求值不会开始，
//! 任何错误都立即中止整次求值（没有部分结果，也不会默认回退为 false）。

use thiserror::Error;

use crate::parser::MAX_NESTING_DEPTH;

/// 解析错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// 无法识别的字符
    #[error("无法识别的字符，剩余输入: '{remainder}'")]
    UnexpectedCharacter { remainder: String },

    /// 意外的 token
    #[error("意外的 token: '{token}'")]
    UnexpectedToken { token: String },

    /// 表达式在需要操作数处意外结束
    #[error("表达式意外结束")]
    UnexpectedEndOfInput,

    /// 括号未闭合
    #[error("缺少右括号 ')'")]
    UnclosedGroup,

    /// 空规则
    #[error("空表达式")]
    EmptyExpression,

    /// 完整表达式之后还有多余 token
    #[error("表达式末尾存在无法解析的内容: '{token}'")]
    UnexpectedTrailingInput { token: String },

    /// 嵌套过深
    #[error("表达式嵌套超过 {} 层", MAX_NESTING_DEPTH)]
    NestingTooDeep,
}

/// 求值错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// 变量未定义
    #[error("未定义的变量: '{name}'")]
    UndefinedVariable { name: String },

    /// 对 nil 做属性访问
    #[error("不能访问 nil 的属性")]
    NilAttributeAccess,

    /// 标量值不暴露属性表
    #[error("{kind} 类型的值不暴露属性")]
    NoAttributeSurface { kind: String },

    /// 对象的属性表中没有该属性
    #[error("{type_name} 类型的对象没有属性 '{name}'")]
    UndefinedAttribute { type_name: String, name: String },

    /// 运算符两侧的类型无法比较
    #[error("运算符 '{operator}' 的操作数类型不匹配: {left} 与 {right}")]
    TypeMismatch {
        operator: &'static str,
        left: String,
        right: String,
    },

    /// 规则的顶层结果是裸对象，无法以 Value 表示
    #[error("规则的顶层结果是 {type_name} 对象，不是值")]
    NonValueResult { type_name: String },
}

/// rules-engine 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// 解析错误
    #[error("解析错误: {0}")]
    Parse(#[from] ParseError),

    /// 求值错误
    #[error("求值错误: {0}")]
    Eval(#[from] EvalError),
}

/// Result 类型别名
pub type RulesResult<T> = Result<T, EngineError>;
