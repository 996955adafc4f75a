//! # Lexer 模块
//!
//! 把规则文本切分为带类型的 token 序列（手写字符扫描器，无 regex 依赖）。
//!
//! ## 匹配顺序
//!
//! 每个扫描位置按固定优先级尝试：空白（跳过）、数字（浮点数优先于整数）、
//! 字符串字面量、标识符/关键字、比较运算符（双字符优先于单字符前缀）、
//! 括号、点号。任何位置都匹配不上时，整个词法分析失败并报告未消费的剩余输入。

use crate::error::ParseError;

/// Token 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// 浮点数字面量
    Float,
    /// 整数字面量
    Integer,
    /// 字符串字面量（`text` 为解码后的内容，不含引号）
    StringLiteral,
    /// 布尔字面量（`true` / `false`）
    Boolean,
    /// `nil` 字面量
    Nil,
    /// 标识符
    Identifier,
    /// 比较运算符
    Operator,
    /// 逻辑关键字（`and` / `or`）
    Logical,
    /// 左括号
    LParen,
    /// 右括号
    RParen,
    /// 点号
    Dot,
}

/// 词法单元
///
/// 一经产出即不可变；解析器只进不退地消费 token 序列。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// 对规则文本做词法分析
pub fn tokenize(rule: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(rule).run()
}

/// 字符扫描器
struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn remaining(&self) -> &str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn consume_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn unexpected_character(&self) -> ParseError {
        ParseError::UnexpectedCharacter {
            remainder: self.remaining().to_string(),
        }
    }

    fn run(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let Some(c) = self.peek_char() else {
                break;
            };

            let token = match c {
                '(' => {
                    self.consume_char();
                    Token::new(TokenKind::LParen, "(")
                }
                ')' => {
                    self.consume_char();
                    Token::new(TokenKind::RParen, ")")
                }
                '.' => {
                    self.consume_char();
                    Token::new(TokenKind::Dot, ".")
                }
                '\'' | '"' => self.scan_string(c)?,
                '=' | '!' | '<' | '>' => self.scan_operator()?,
                '-' => self.scan_number()?,
                c if c.is_ascii_digit() => self.scan_number()?,
                c if c.is_ascii_alphabetic() || c == '_' => self.scan_word(),
                _ => return Err(self.unexpected_character()),
            };
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// 扫描数字字面量
    ///
    /// 可带前导负号；仅当小数点后紧跟数字时才归入浮点数，
    /// 否则把 `.` 留给属性访问。
    fn scan_number(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;
        if self.peek_char() == Some('-') {
            self.consume_char();
        }
        if self.consume_digits() == 0 {
            self.pos = start;
            return Err(self.unexpected_character());
        }

        let mut lookahead = self.remaining().chars();
        if lookahead.next() == Some('.') && lookahead.next().is_some_and(|c| c.is_ascii_digit()) {
            self.consume_char();
            self.consume_digits();
            Ok(Token::new(TokenKind::Float, &self.input[start..self.pos]))
        } else {
            Ok(Token::new(TokenKind::Integer, &self.input[start..self.pos]))
        }
    }

    fn consume_digits(&mut self) -> usize {
        let mut count = 0;
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.consume_char();
            count += 1;
        }
        count
    }

    /// 扫描字符串字面量
    ///
    /// 单引号或双引号包裹；`\'` 和 `\"` 解码为裸引号，
    /// 其余反斜杠序列原样保留。未闭合的字面量是词法错误。
    fn scan_string(&mut self, quote: char) -> Result<Token, ParseError> {
        let start = self.pos;
        self.consume_char(); // 开引号
        let mut text = String::new();
        while let Some(c) = self.consume_char() {
            if c == quote {
                return Ok(Token::new(TokenKind::StringLiteral, text));
            }
            if c == '\\' {
                match self.consume_char() {
                    Some(escaped @ ('\'' | '"')) => text.push(escaped),
                    Some(other) => {
                        text.push('\\');
                        text.push(other);
                    }
                    None => break,
                }
            } else {
                text.push(c);
            }
        }
        self.pos = start;
        Err(self.unexpected_character())
    }

    /// 扫描比较运算符，双字符运算符优先于单字符前缀
    fn scan_operator(&mut self) -> Result<Token, ParseError> {
        for op in ["==", "!=", "<=", ">=", "<", ">"] {
            if self.remaining().starts_with(op) {
                self.pos += op.len();
                return Ok(Token::new(TokenKind::Operator, op));
            }
        }
        Err(self.unexpected_character())
    }

    /// 整词扫描标识符，再归类关键字
    ///
    /// 标识符限定 ASCII：字母或下划线开头，后接字母、数字或下划线。
    /// 先取完整的单词再判断是否为关键字，`trueish` 因此是一个标识符
    /// 而不是 `true` 加 `ish` 两个 token。
    fn scan_word(&mut self) -> Token {
        let start = self.pos;
        while self
            .peek_char()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.consume_char();
        }
        let word = &self.input[start..self.pos];
        match word {
            "true" | "false" => Token::new(TokenKind::Boolean, word),
            "nil" => Token::new(TokenKind::Nil, word),
            "and" | "or" => Token::new(TokenKind::Logical, word),
            _ => Token::new(TokenKind::Identifier, word),
        }
    }
}
