//! Evaluator for validated expressions
//!
//! Evaluation is total: every expression that passed static validation
//! produces a [`Value`] on every context, with no error path and no
//! panic. All runtime anomalies resolve to defined values instead:
//!
//! - a path that does not resolve in the current context reads as `Null`
//! - relational operators compare integers only; any other operand
//!   combination yields `Bool(false)`
//! - equality is structural and yields `Bool(false)` across variants
//! - `&&` and `||` short-circuit on truthiness and always yield a `Bool`
//!
//! Determinism follows from totality plus the context's own guarantee
//! that its registry view is stable for the duration of one evaluation.

use crate::ast::{BinaryOp, Expr, Literal, Path, UnaryOp};
use crate::value::Value;
use tenet_core::EvalContext;

/// Evaluate an expression against a context
pub fn evaluate(expr: &Expr, ctx: &EvalContext<'_>) -> Value {
    match expr {
        Expr::Literal(lit) => literal_value(lit),
        Expr::Path(path) => resolve_path(path, ctx),
        Expr::Unary {
            op: UnaryOp::Not,
            operand,
        } => Value::Bool(!evaluate(operand, ctx).is_truthy()),
        Expr::Binary { op, lhs, rhs } => evaluate_binary(*op, lhs, rhs, ctx),
        Expr::Call { name, args } => call(name, args, ctx),
    }
}

/// Evaluate an expression and reduce it to a verdict
///
/// An invariant holds exactly when its expression evaluates truthy.
pub fn holds(expr: &Expr, ctx: &EvalContext<'_>) -> bool {
    evaluate(expr, ctx).is_truthy()
}

fn literal_value(lit: &Literal) -> Value {
    match lit {
        Literal::Null => Value::Null,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Int(i) => Value::Int(*i),
        Literal::Str(s) => Value::Str(s.clone()),
    }
}

fn evaluate_binary(op: BinaryOp, lhs: &Expr, rhs: &Expr, ctx: &EvalContext<'_>) -> Value {
    match op {
        BinaryOp::And => {
            if !evaluate(lhs, ctx).is_truthy() {
                Value::Bool(false)
            } else {
                Value::Bool(evaluate(rhs, ctx).is_truthy())
            }
        }
        BinaryOp::Or => {
            if evaluate(lhs, ctx).is_truthy() {
                Value::Bool(true)
            } else {
                Value::Bool(evaluate(rhs, ctx).is_truthy())
            }
        }
        BinaryOp::Eq => Value::Bool(evaluate(lhs, ctx) == evaluate(rhs, ctx)),
        BinaryOp::NotEq => Value::Bool(evaluate(lhs, ctx) != evaluate(rhs, ctx)),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            match (evaluate(lhs, ctx), evaluate(rhs, ctx)) {
                (Value::Int(a), Value::Int(b)) => Value::Bool(match op {
                    BinaryOp::Lt => a < b,
                    BinaryOp::Le => a <= b,
                    BinaryOp::Gt => a > b,
                    BinaryOp::Ge => a >= b,
                    _ => unreachable!("outer match covers relational operators only"),
                }),
                _ => Value::Bool(false),
            }
        }
    }
}

/// Resolve a dotted path against the context
///
/// Paths outside the context's scope, and paths that name nothing, read
/// as `Null`.
fn resolve_path(path: &Path, ctx: &EvalContext<'_>) -> Value {
    let segments: Vec<&str> = path.segments.iter().map(String::as_str).collect();
    match segments.as_slice() {
        ["state", "id"] => Value::Str(ctx.state().id().as_str().to_string()),
        ["state", "structure", key] => ctx
            .state()
            .structure_value(key)
            .map(Value::from)
            .unwrap_or(Value::Null),
        ["transition", "from"] => ctx
            .from()
            .map(|id| Value::Str(id.as_str().to_string()))
            .unwrap_or(Value::Null),
        ["registry", "count"] => ctx
            .registry()
            .map(|r| Value::Int(r.state_count() as i64))
            .unwrap_or(Value::Null),
        ["ordering", "max_index"] => ctx
            .ordering()
            .map(|o| Value::Int(o.max_index))
            .unwrap_or(Value::Null),
        ["ordering", "next_index"] => ctx
            .ordering()
            .map(|o| Value::Int(o.next_index))
            .unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

fn call(name: &str, args: &[Expr], ctx: &EvalContext<'_>) -> Value {
    let values: Vec<Value> = args.iter().map(|arg| evaluate(arg, ctx)).collect();
    match (name, values.as_slice()) {
        ("exists", [v]) => Value::Bool(!matches!(v, Value::Null)),
        ("is_null", [v]) => Value::Bool(matches!(v, Value::Null)),
        ("is_string", [v]) => Value::Bool(matches!(v, Value::Str(_))),
        ("is_int", [v]) => Value::Bool(matches!(v, Value::Int(_))),
        ("is_bool", [v]) => Value::Bool(matches!(v, Value::Bool(_))),
        ("non_empty", [v]) => Value::Bool(matches!(v, Value::Str(s) if !s.is_empty())),
        ("eq", [a, b]) => Value::Bool(a == b),
        ("contains_state", [v]) => match (v, ctx.registry()) {
            (Value::Str(id), Some(registry)) => Value::Bool(registry.contains_state(id)),
            _ => Value::Bool(false),
        },
        ("max_order_index", []) => ctx
            .ordering()
            .map(|o| Value::Int(o.max_index))
            .unwrap_or(Value::Null),
        ("next_order_index", []) => ctx
            .ordering()
            .map(|o| Value::Int(o.next_index))
            .unwrap_or(Value::Null),
        // Unreachable for validated expressions; resolve to absence
        _ => Value::Null,
    }
}
