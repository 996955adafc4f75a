//! # Eval 模块
//!
//! 沙箱化的 AST 求值器。
//!
//! ## 设计原则
//!
//! - 求值是**确定性**的纯函数：相同的 AST 和上下文必得相同结果
//! - 深度优先、自左向右，遇到首个错误立即整体失败
//! - 对宿主对象只通过 [`AttributeSurface`](crate::context::AttributeSurface)
//!   读属性，绝不调用其他宿主行为
//!
//! ## 语义要点
//!
//! - `and` / `or` 短路：结果已确定时不求值右操作数
//! - 相等比较对所有类型有定义，跨类型恒不相等（Int/Float 按数值提升除外）
//! - 排序比较仅限数值对数值、字符串对字符串，其余组合是类型错误

use std::cmp::Ordering;

use crate::ast::{BinaryOperator, Node};
use crate::context::{Binding, EvalContext};
use crate::error::EvalError;
use crate::value::Value;

/// 对 AST 求值
///
/// 结果是一个 [`Binding`]：绝大多数规则的根是比较或逻辑运算，
/// 产出 `Binding::Value(Value::Bool(..))`；裸变量规则也可能解析出对象引用。
pub fn evaluate<'c, C: EvalContext>(node: &Node, ctx: &'c C) -> Result<Binding<'c>, EvalError> {
    match node {
        Node::Literal(value) => Ok(Binding::Value(value.clone())),

        Node::Variable { name } => ctx
            .get_var(name)
            .ok_or_else(|| EvalError::UndefinedVariable { name: name.clone() }),

        Node::AttributeAccess { object, attribute } => match evaluate(object, ctx)? {
            Binding::Value(Value::Nil) => Err(EvalError::NilAttributeAccess),
            Binding::Value(value) => Err(EvalError::NoAttributeSurface {
                kind: value.kind_name().to_string(),
            }),
            Binding::Object(obj) => {
                obj.attribute(attribute)
                    .ok_or_else(|| EvalError::UndefinedAttribute {
                        type_name: obj.type_name().to_string(),
                        name: attribute.clone(),
                    })
            }
        },

        Node::BinaryOp { op, left, right } => match op {
            BinaryOperator::And => {
                let left_val = evaluate(left, ctx)?;
                // 短路：左侧为假时不求值右侧
                if !left_val.is_truthy() {
                    return Ok(Binding::Value(Value::Bool(false)));
                }
                let right_val = evaluate(right, ctx)?;
                Ok(Binding::Value(Value::Bool(right_val.is_truthy())))
            }
            BinaryOperator::Or => {
                let left_val = evaluate(left, ctx)?;
                // 短路：左侧为真时不求值右侧
                if left_val.is_truthy() {
                    return Ok(Binding::Value(Value::Bool(true)));
                }
                let right_val = evaluate(right, ctx)?;
                Ok(Binding::Value(Value::Bool(right_val.is_truthy())))
            }
            BinaryOperator::Eq => equality(left, right, ctx, false),
            BinaryOperator::Ne => equality(left, right, ctx, true),
            BinaryOperator::Lt => ordered(*op, left, right, ctx, Ordering::is_lt),
            BinaryOperator::Le => ordered(*op, left, right, ctx, Ordering::is_le),
            BinaryOperator::Gt => ordered(*op, left, right, ctx, Ordering::is_gt),
            BinaryOperator::Ge => ordered(*op, left, right, ctx, Ordering::is_ge),
        },
    }
}

/// 将 AST 求值为布尔结果（按真值判定收敛）
pub fn evaluate_to_bool<C: EvalContext>(node: &Node, ctx: &C) -> Result<bool, EvalError> {
    Ok(evaluate(node, ctx)?.is_truthy())
}

/// 相等族运算（`==` / `!=`）：两侧都求值，不短路
fn equality<'c, C: EvalContext>(
    left: &Node,
    right: &Node,
    ctx: &'c C,
    negate: bool,
) -> Result<Binding<'c>, EvalError> {
    let left_val = evaluate(left, ctx)?;
    let right_val = evaluate(right, ctx)?;
    Ok(Binding::Value(Value::Bool(
        bindings_equal(&left_val, &right_val) != negate,
    )))
}

/// 排序族运算（`<` / `<=` / `>` / `>=`）：两侧都求值，再按谓词检验排序结果
fn ordered<'c, C: EvalContext>(
    op: BinaryOperator,
    left: &Node,
    right: &Node,
    ctx: &'c C,
    test: fn(Ordering) -> bool,
) -> Result<Binding<'c>, EvalError> {
    let left_val = evaluate(left, ctx)?;
    let right_val = evaluate(right, ctx)?;
    Ok(Binding::Value(Value::Bool(
        order_values(op, &left_val, &right_val)?.is_some_and(test),
    )))
}

/// 相等判定
///
/// 对所有绑定组合有定义：值对值按 [`values_equal`]，
/// 对象对对象按引用同一性，值对对象恒不相等。
fn bindings_equal(left: &Binding<'_>, right: &Binding<'_>) -> bool {
    match (left, right) {
        (Binding::Value(a), Binding::Value(b)) => values_equal(a, b),
        (Binding::Object(a), Binding::Object(b)) => std::ptr::addr_eq(*a, *b),
        _ => false,
    }
}

/// 值相等：同类按原生相等，Int/Float 按数值提升，跨类恒不相等
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Nil, Value::Nil) => true,
        _ => false,
    }
}

/// 排序比较
///
/// 仅数值对数值（带提升）或字符串对字符串可排序，其余组合是类型错误。
/// `NaN` 参与的比较返回 `None`，所有排序运算对它都为假。
fn order_values(
    op: BinaryOperator,
    left: &Binding<'_>,
    right: &Binding<'_>,
) -> Result<Option<Ordering>, EvalError> {
    if let (Binding::Value(a), Binding::Value(b)) = (left, right) {
        match (a, b) {
            (Value::Int(x), Value::Int(y)) => return Ok(Some(x.cmp(y))),
            (Value::String(x), Value::String(y)) => return Ok(Some(x.cmp(y))),
            _ => {
                if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
                    return Ok(x.partial_cmp(&y));
                }
            }
        }
    }
    Err(EvalError::TypeMismatch {
        operator: op.symbol(),
        left: left.kind_name(),
        right: right.kind_name(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AttributeSurface;
    use std::collections::HashMap;

    /// 测试用的简单上下文
    struct TestContext<'host> {
        vars: HashMap<String, Binding<'host>>,
    }

    impl<'host> TestContext<'host> {
        fn new() -> Self {
            Self {
                vars: HashMap::new(),
            }
        }

        fn with_var(mut self, name: &str, binding: Binding<'host>) -> Self {
            self.vars.insert(name.to_string(), binding);
            self
        }

        fn with_value(self, name: &str, value: Value) -> Self {
            self.with_var(name, Binding::Value(value))
        }
    }

    impl EvalContext for TestContext<'_> {
        fn get_var(&self, name: &str) -> Option<Binding<'_>> {
            self.vars.get(name).cloned()
        }
    }

    /// 测试用的宿主对象：显式声明的属性表
    enum Attr {
        Value(Value),
        Child(Record),
    }

    struct Record {
        type_name: &'static str,
        attrs: Vec<(&'static str, Attr)>,
    }

    impl Record {
        fn new(type_name: &'static str) -> Self {
            Self {
                type_name,
                attrs: Vec::new(),
            }
        }

        fn with_value(mut self, name: &'static str, value: Value) -> Self {
            self.attrs.push((name, Attr::Value(value)));
            self
        }

        fn with_child(mut self, name: &'static str, child: Record) -> Self {
            self.attrs.push((name, Attr::Child(child)));
            self
        }
    }

    impl AttributeSurface for Record {
        fn type_name(&self) -> &str {
            self.type_name
        }

        fn attribute(&self, name: &str) -> Option<Binding<'_>> {
            self.attrs.iter().find(|(n, _)| *n == name).map(|(_, attr)| match attr {
                Attr::Value(value) => Binding::Value(value.clone()),
                Attr::Child(child) => Binding::Object(child),
            })
        }
    }

    /// 任何属性访问都 panic 的对象，用于验证短路
    struct PanicSurface;

    impl AttributeSurface for PanicSurface {
        fn type_name(&self) -> &str {
            "Panic"
        }

        fn attribute(&self, _name: &str) -> Option<Binding<'_>> {
            panic!("短路失败：右操作数被求值了");
        }
    }

    fn eval_value(node: &Node, ctx: &impl EvalContext) -> Value {
        match evaluate(node, ctx).unwrap() {
            Binding::Value(value) => value,
            Binding::Object(obj) => panic!("期望值，得到对象 {}", obj.type_name()),
        }
    }

    // ---------------------------------------------------------------------
    // 字面量与变量
    // ---------------------------------------------------------------------

    #[test]
    fn test_literal_evaluation() {
        let ctx = TestContext::new();

        assert_eq!(eval_value(&Node::int(42), &ctx), Value::Int(42));
        assert_eq!(eval_value(&Node::string("hi"), &ctx), Value::from("hi"));
        assert_eq!(eval_value(&Node::nil(), &ctx), Value::Nil);
    }

    #[test]
    fn test_variable_lookup() {
        let ctx = TestContext::new().with_value("name", Value::from("Alice"));

        assert_eq!(eval_value(&Node::var("name"), &ctx), Value::from("Alice"));
    }

    #[test]
    fn test_undefined_variable() {
        let ctx = TestContext::new();

        assert_eq!(
            evaluate(&Node::var("ghost"), &ctx).unwrap_err(),
            EvalError::UndefinedVariable {
                name: "ghost".to_string()
            }
        );
    }

    // ---------------------------------------------------------------------
    // 属性访问
    // ---------------------------------------------------------------------

    #[test]
    fn test_attribute_access() {
        let user = Record::new("User").with_value("age", Value::Int(30));
        let ctx = TestContext::new().with_var("user", Binding::Object(&user));

        let node = Node::attr(Node::var("user"), "age");
        assert_eq!(eval_value(&node, &ctx), Value::Int(30));
    }

    #[test]
    fn test_nested_attribute_chain() {
        let user = Record::new("User").with_child(
            "address",
            Record::new("Address").with_value("city", Value::from("New York")),
        );
        let ctx = TestContext::new().with_var("user", Binding::Object(&user));

        let node = Node::attr(Node::attr(Node::var("user"), "address"), "city");
        assert_eq!(eval_value(&node, &ctx), Value::from("New York"));
    }

    #[test]
    fn test_undefined_attribute() {
        let user = Record::new("User").with_value("age", Value::Int(30));
        let ctx = TestContext::new().with_var("user", Binding::Object(&user));

        let node = Node::attr(Node::var("user"), "ghost_field");
        assert_eq!(
            evaluate(&node, &ctx).unwrap_err(),
            EvalError::UndefinedAttribute {
                type_name: "User".to_string(),
                name: "ghost_field".to_string()
            }
        );
    }

    #[test]
    fn test_nil_attribute_access() {
        let fundraiser = Record::new("Fundraiser").with_value("team", Value::Nil);
        let ctx = TestContext::new().with_var("fundraiser", Binding::Object(&fundraiser));

        // fundraiser.team == nil 为真
        let node = Node::eq(Node::attr(Node::var("fundraiser"), "team"), Node::nil());
        assert_eq!(eval_value(&node, &ctx), Value::Bool(true));

        // 但继续访问 nil 的属性是错误
        let node = Node::attr(Node::attr(Node::var("fundraiser"), "team"), "name");
        assert_eq!(
            evaluate(&node, &ctx).unwrap_err(),
            EvalError::NilAttributeAccess
        );
    }

    #[test]
    fn test_scalar_has_no_attribute_surface() {
        let ctx = TestContext::new().with_value("name", Value::from("Alice"));

        let node = Node::attr(Node::var("name"), "length");
        assert_eq!(
            evaluate(&node, &ctx).unwrap_err(),
            EvalError::NoAttributeSurface {
                kind: "String".to_string()
            }
        );
    }

    // ---------------------------------------------------------------------
    // 相等与排序
    // ---------------------------------------------------------------------

    #[test]
    fn test_equality_like_kinds() {
        let ctx = TestContext::new();

        assert_eq!(
            eval_value(&Node::eq(Node::int(1), Node::int(1)), &ctx),
            Value::Bool(true)
        );
        assert_eq!(
            eval_value(&Node::eq(Node::string("a"), Node::string("b")), &ctx),
            Value::Bool(false)
        );
        assert_eq!(
            eval_value(&Node::eq(Node::nil(), Node::nil()), &ctx),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_equality_numeric_promotion() {
        let ctx = TestContext::new();

        // 1 == 1.0 为真（数值提升）
        assert_eq!(
            eval_value(&Node::eq(Node::int(1), Node::float(1.0)), &ctx),
            Value::Bool(true)
        );
        assert_eq!(
            eval_value(&Node::eq(Node::float(2.5), Node::int(2)), &ctx),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_equality_across_kinds_is_false_not_error() {
        let ctx = TestContext::new();

        assert_eq!(
            eval_value(&Node::eq(Node::int(1), Node::string("1")), &ctx),
            Value::Bool(false)
        );
        assert_eq!(
            eval_value(
                &Node::binary(BinaryOperator::Ne, Node::bool(true), Node::nil()),
                &ctx
            ),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_ordering_comparisons() {
        let ctx = TestContext::new();

        let node = Node::binary(BinaryOperator::Gt, Node::int(30), Node::int(20));
        assert_eq!(eval_value(&node, &ctx), Value::Bool(true));

        let node = Node::binary(BinaryOperator::Le, Node::int(5), Node::float(5.0));
        assert_eq!(eval_value(&node, &ctx), Value::Bool(true));

        // 字符串按字典序
        let node = Node::binary(BinaryOperator::Lt, Node::string("apple"), Node::string("banana"));
        assert_eq!(eval_value(&node, &ctx), Value::Bool(true));
    }

    #[test]
    fn test_ordering_type_mismatch() {
        let ctx = TestContext::new();

        let node = Node::binary(BinaryOperator::Gt, Node::int(30), Node::string("text"));
        assert_eq!(
            evaluate(&node, &ctx).unwrap_err(),
            EvalError::TypeMismatch {
                operator: ">",
                left: "Integer".to_string(),
                right: "String".to_string()
            }
        );

        // 布尔值和 nil 不可排序
        let node = Node::binary(BinaryOperator::Lt, Node::bool(true), Node::bool(false));
        assert!(matches!(
            evaluate(&node, &ctx).unwrap_err(),
            EvalError::TypeMismatch { .. }
        ));
        let node = Node::binary(BinaryOperator::Ge, Node::nil(), Node::nil());
        assert!(matches!(
            evaluate(&node, &ctx).unwrap_err(),
            EvalError::TypeMismatch { .. }
        ));
    }

    // ---------------------------------------------------------------------
    // 逻辑运算与短路
    // ---------------------------------------------------------------------

    #[test]
    fn test_logical_truthiness_coercion() {
        let ctx = TestContext::new();

        // 0 和空字符串都为真
        assert_eq!(
            eval_value(&Node::and(Node::int(0), Node::string("")), &ctx),
            Value::Bool(true)
        );
        assert_eq!(
            eval_value(&Node::and(Node::int(1), Node::nil()), &ctx),
            Value::Bool(false)
        );
        assert_eq!(
            eval_value(&Node::or(Node::nil(), Node::bool(false)), &ctx),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_and_short_circuits() {
        let trap = PanicSurface;
        let ctx = TestContext::new()
            .with_value("flag", Value::Bool(false))
            .with_var("trap", Binding::Object(&trap));

        // 左侧为假，右侧的属性访问不会发生
        let node = Node::and(Node::var("flag"), Node::attr(Node::var("trap"), "boom"));
        assert_eq!(eval_value(&node, &ctx), Value::Bool(false));

        // 右侧引用未定义变量也不会报错
        let node = Node::and(Node::var("flag"), Node::var("missing"));
        assert_eq!(eval_value(&node, &ctx), Value::Bool(false));
    }

    #[test]
    fn test_or_short_circuits() {
        let trap = PanicSurface;
        let ctx = TestContext::new()
            .with_value("flag", Value::Bool(true))
            .with_var("trap", Binding::Object(&trap));

        let node = Node::or(Node::var("flag"), Node::attr(Node::var("trap"), "boom"));
        assert_eq!(eval_value(&node, &ctx), Value::Bool(true));

        let node = Node::or(Node::var("flag"), Node::var("missing"));
        assert_eq!(eval_value(&node, &ctx), Value::Bool(true));
    }

    #[test]
    fn test_comparison_does_not_short_circuit() {
        let ctx = TestContext::new().with_value("a", Value::Int(1));

        // 比较运算两侧都求值，右侧的未定义变量立即失败
        let node = Node::eq(Node::var("a"), Node::var("missing"));
        assert_eq!(
            evaluate(&node, &ctx).unwrap_err(),
            EvalError::UndefinedVariable {
                name: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_object_equality_is_identity() {
        let a = Record::new("User");
        let b = Record::new("User");
        let ctx = TestContext::new()
            .with_var("a", Binding::Object(&a))
            .with_var("a2", Binding::Object(&a))
            .with_var("b", Binding::Object(&b));

        assert_eq!(
            eval_value(&Node::eq(Node::var("a"), Node::var("a2")), &ctx),
            Value::Bool(true)
        );
        assert_eq!(
            eval_value(&Node::eq(Node::var("a"), Node::var("b")), &ctx),
            Value::Bool(false)
        );
        // 对象不可排序
        let node = Node::binary(BinaryOperator::Lt, Node::var("a"), Node::var("b"));
        assert!(matches!(
            evaluate(&node, &ctx).unwrap_err(),
            EvalError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_evaluate_to_bool() {
        let ctx = TestContext::new().with_value("score", Value::Int(0));

        // 真值收敛：0 为真，nil 为假
        assert!(evaluate_to_bool(&Node::var("score"), &ctx).unwrap());
        assert!(!evaluate_to_bool(&Node::nil(), &ctx).unwrap());
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let user = Record::new("User").with_value("age", Value::Int(30));
        let ctx = TestContext::new().with_var("user", Binding::Object(&user));

        let node = Node::binary(
            BinaryOperator::Gt,
            Node::attr(Node::var("user"), "age"),
            Node::int(20),
        );
        let first = eval_value(&node, &ctx);
        let second = eval_value(&node, &ctx);
        assert_eq!(first, second);
    }
}
