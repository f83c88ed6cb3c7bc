//! Compilation: parse, validate, and freeze an expression
//!
//! Compilation is the only way to obtain an evaluable expression, so an
//! expression that touches forbidden paths or unknown functions can never
//! be evaluated, not even once.

use crate::ast::Expr;
use crate::error::CompileError;
use crate::eval;
use crate::parser::parse;
use crate::validator::validate;
use crate::value::Value;
use tenet_core::EvalContext;
use tracing::trace;

/// A parsed, validated, evaluable expression
///
/// Keeps the original source text alongside the tree; the source is the
/// expression's identity for registry hashing and display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledExpr {
    source: String,
    expr: Expr,
}

impl CompiledExpr {
    /// The original source text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The validated expression tree
    pub fn ast(&self) -> &Expr {
        &self.expr
    }

    /// Evaluate to a verdict: `true` when the expression holds
    pub fn evaluate(&self, ctx: &EvalContext<'_>) -> bool {
        eval::holds(&self.expr, ctx)
    }

    /// Evaluate to the raw value
    pub fn evaluate_value(&self, ctx: &EvalContext<'_>) -> Value {
        eval::evaluate(&self.expr, ctx)
    }
}

/// Compile source text into an evaluable expression
pub fn compile(source: &str) -> Result<CompiledExpr, CompileError> {
    let expr = parse(source)?;
    validate(&expr)?;
    trace!(source, depth = expr.depth(), "Compiled invariant expression");
    Ok(CompiledExpr {
        source: source.to_string(),
        expr,
    })
}
