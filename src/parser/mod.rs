//! # Parser 模块
//!
//! 运算符优先级爬升解析器（precedence climbing），把 token 序列折叠成单棵 AST。
//!
//! ## 算法
//!
//! `parse_expression(min_prec)`：先解析一个前缀项，然后只要下一个 token
//! 是优先级高于 `min_prec` 的二元运算符，就消费它并以该运算符的优先级
//! 递归解析右侧，左结合地折叠成 `BinaryOp`。
//!
//! ## 优先级（数值越大绑定越紧）
//!
//! ```text
//! or            1
//! and           2
//! ==  !=        3
//! <  <=  >  >=  4
//! ```
//!
//! token 序列通过游标只进不退地消费，不回溯；空输入和完整表达式之后的
//! 多余 token 都是解析错误。


use crate::ast::{BinaryOperator, Node};
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::value::Value;

/// 表达式嵌套深度上限
///
/// 在解析期约束树深，求值递归深度随之有界，调用栈不会被病态规则耗尽。
pub const MAX_NESTING_DEPTH: usize = 64;

/// 把完整的 token 序列解析为单棵 AST
pub fn parse(tokens: Vec<Token>) -> Result<Node, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::EmptyExpression);
    }

    let mut parser = Parser::new(tokens);
    let node = parser.parse_expression(0, 0)?;
    if let Some(extra) = parser.peek() {
        return Err(ParseError::UnexpectedTrailingInput {
            token: extra.text.clone(),
        });
    }
    Ok(node)
}

/// 识别二元运算符 token，返回运算符和优先级
fn binary_operator(token: &Token) -> Option<(BinaryOperator, u8)> {
    if token.kind != TokenKind::Operator && token.kind != TokenKind::Logical {
        return None;
    }
    match token.text.as_str() {
        "or" => Some((BinaryOperator::Or, 1)),
        "and" => Some((BinaryOperator::And, 2)),
        "==" => Some((BinaryOperator::Eq, 3)),
        "!=" => Some((BinaryOperator::Ne, 3)),
        "<" => Some((BinaryOperator::Lt, 4)),
        "<=" => Some((BinaryOperator::Le, 4)),
        ">" => Some((BinaryOperator::Gt, 4)),
        ">=" => Some((BinaryOperator::Ge, 4)),
        _ => None,
    }
}

/// Token 游标解析器
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// 优先级爬升主循环
    fn parse_expression(&mut self, min_prec: u8, depth: usize) -> Result<Node, ParseError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep);
        }

        let mut left = self.parse_prefix(depth)?;

        // 每折叠一次，左脊就加深一层，同样计入深度预算：
        // 扁平的长运算符链和深括号嵌套一样会撑深树
        let mut folds = 0;
        loop {
            let Some((op, prec)) = self.peek().and_then(binary_operator) else {
                break;
            };
            if prec <= min_prec {
                break;
            }
            folds += 1;
            if depth + folds > MAX_NESTING_DEPTH {
                return Err(ParseError::NestingTooDeep);
            }
            self.pos += 1; // 消费运算符
            let right = self.parse_expression(prec, depth + folds)?;
            left = Node::binary(op, left, right);
        }

        Ok(left)
    }

    /// 解析前缀项：字面量、变量（含属性链）或括号分组
    fn parse_prefix(&mut self, depth: usize) -> Result<Node, ParseError> {
        let Some(token) = self.advance() else {
            return Err(ParseError::UnexpectedEndOfInput);
        };

        match token.kind {
            TokenKind::Integer => match token.text.parse::<i64>() {
                Ok(n) => Ok(Node::int(n)),
                // 超出 i64 范围的字面量按无法解析处理
                Err(_) => Err(ParseError::UnexpectedToken { token: token.text }),
            },
            TokenKind::Float => match token.text.parse::<f64>() {
                Ok(x) => Ok(Node::float(x)),
                Err(_) => Err(ParseError::UnexpectedToken { token: token.text }),
            },
            TokenKind::StringLiteral => Ok(Node::Literal(Value::String(token.text))),
            TokenKind::Boolean => Ok(Node::bool(token.text == "true")),
            TokenKind::Nil => Ok(Node::nil()),
            TokenKind::Identifier => self.parse_variable(token.text),
            TokenKind::LParen => self.parse_grouped(depth),
            _ => Err(ParseError::UnexpectedToken { token: token.text }),
        }
    }

    /// 变量引用，贪婪消费零个或多个 `.identifier` 后缀
    fn parse_variable(&mut self, name: String) -> Result<Node, ParseError> {
        let mut node = Node::Variable { name };
        while self.peek().is_some_and(|t| t.kind == TokenKind::Dot) {
            self.pos += 1; // 消费点号
            match self.advance() {
                Some(t) if t.kind == TokenKind::Identifier => {
                    node = Node::attr(node, t.text);
                }
                Some(t) => return Err(ParseError::UnexpectedToken { token: t.text }),
                None => return Err(ParseError::UnexpectedEndOfInput),
            }
        }
        Ok(node)
    }

    /// 括号分组，要求匹配的右括号
    fn parse_grouped(&mut self, depth: usize) -> Result<Node, ParseError> {
        let node = self.parse_expression(0, depth + 1)?;
        match self.advance() {
            Some(t) if t.kind == TokenKind::RParen => Ok(node),
            _ => Err(ParseError::UnclosedGroup),
        }
    }
}
