//! Static safety validator for parsed expressions
//!
//! Validation runs once, at load time, before an expression is ever
//! evaluated. It enforces the allow-lists that keep invariant predicates
//! structural:
//!
//! - paths must be rooted at `state`, `transition`, `registry`, or
//!   `ordering`
//! - paths must never reach semantic data (`state.data`, `state.content`,
//!   `state.embedding`, `state.score`, or any segment named `payload`)
//! - function calls must name an allow-listed function with its exact arity
//! - the expression tree must not exceed [`MAX_DEPTH`]
//! - integer literals must stay inside the safe interchange range
//!
//! A validation failure prevents the expression from being loaded at all;
//! no partially-validated expression is ever evaluated.

use crate::ast::{Expr, Literal};
use crate::error::ValidationError;

/// Maximum allowed expression tree depth
pub const MAX_DEPTH: usize = 16;

/// Largest integer magnitude representable exactly in interchange formats
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

/// Path roots an expression may read
pub const ALLOWED_ROOTS: &[&str] = &["state", "transition", "registry", "ordering"];

/// Path prefixes that reach semantic data and are always forbidden
const FORBIDDEN_PREFIXES: &[&[&str]] = &[
    &["state", "data"],
    &["state", "content"],
    &["state", "embedding"],
    &["state", "score"],
];

/// Path segment that is forbidden anywhere in a path
const FORBIDDEN_SEGMENT: &str = "payload";

/// Allow-listed functions with their arities
const FUNCTIONS: &[(&str, usize)] = &[
    ("contains_state", 1),
    ("eq", 2),
    ("exists", 1),
    ("is_bool", 1),
    ("is_int", 1),
    ("is_null", 1),
    ("is_string", 1),
    ("max_order_index", 0),
    ("next_order_index", 0),
    ("non_empty", 1),
];

/// Arity of an allow-listed function, or `None` if unknown
pub fn function_arity(name: &str) -> Option<usize> {
    FUNCTIONS
        .iter()
        .find(|(fname, _)| *fname == name)
        .map(|(_, arity)| *arity)
}

/// Validate a parsed expression against the allow-lists
///
/// Returns the first violation found in a deterministic left-to-right
/// walk. `Ok(())` means the expression is safe to evaluate forever.
pub fn validate(expr: &Expr) -> Result<(), ValidationError> {
    let depth = expr.depth();
    if depth > MAX_DEPTH {
        return Err(ValidationError::DepthExceeded {
            depth,
            max: MAX_DEPTH,
        });
    }
    walk(expr)
}

fn walk(expr: &Expr) -> Result<(), ValidationError> {
    match expr {
        Expr::Literal(Literal::Int(value)) => {
            // unsigned_abs: i64::MIN has no i64 absolute value
            if value.unsigned_abs() > MAX_SAFE_INTEGER as u64 {
                return Err(ValidationError::IntegerOutOfRange { value: *value });
            }
            Ok(())
        }
        Expr::Literal(_) => Ok(()),
        Expr::Path(path) => {
            let root = path.root();
            if !ALLOWED_ROOTS.contains(&root) {
                return Err(ValidationError::UnknownRoot {
                    root: root.to_string(),
                });
            }
            if path.segments.iter().any(|s| s == FORBIDDEN_SEGMENT) {
                return Err(ValidationError::ForbiddenPath {
                    path: path.dotted(),
                });
            }
            for prefix in FORBIDDEN_PREFIXES {
                if path.segments.len() >= prefix.len()
                    && path.segments.iter().zip(prefix.iter()).all(|(a, b)| a == b)
                {
                    return Err(ValidationError::ForbiddenPath {
                        path: path.dotted(),
                    });
                }
            }
            Ok(())
        }
        Expr::Call { name, args } => {
            match function_arity(name) {
                None => {
                    return Err(ValidationError::UnknownFunction {
                        name: name.clone(),
                    })
                }
                Some(arity) if arity != args.len() => {
                    return Err(ValidationError::WrongArity {
                        name: name.clone(),
                        expected: arity,
                        found: args.len(),
                    })
                }
                Some(_) => {}
            }
            for arg in args {
                walk(arg)?;
            }
            Ok(())
        }
        Expr::Unary { operand, .. } => walk(operand),
        Expr::Binary { lhs, rhs, .. } => {
            walk(lhs)?;
            walk(rhs)
        }
    }
}
