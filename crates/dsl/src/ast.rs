//! Abstract syntax tree of the invariant expression language
//!
//! Every node kind is a variant of one closed sum type, and both the
//! validator and the evaluator match on it exhaustively. Adding a node
//! kind is a compile-time obligation for both, never a silent runtime gap.

use std::fmt;

/// A literal value in source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// `null`
    Null,
    /// `true` or `false`
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// String literal
    Str(String),
}

/// A dotted path such as `state.structure.isRoot`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    /// Segments in source order; never empty
    pub segments: Vec<String>,
}

impl Path {
    /// Create a path from its segments
    pub fn new(segments: Vec<String>) -> Self {
        Path { segments }
    }

    /// The root segment
    pub fn root(&self) -> &str {
        self.segments.first().map(String::as_str).unwrap_or("")
    }

    /// The path in dotted form
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dotted())
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical negation of truthiness
    Not,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "!"),
        }
    }
}

/// Binary operators, grouped by precedence level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `&&` (short-circuit)
    And,
    /// `||` (short-circuit)
    Or,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        };
        write!(f, "{text}")
    }
}

/// An expression tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A literal value
    Literal(Literal),
    /// A dotted path into the evaluation context
    Path(Path),
    /// A call to an allow-listed function
    Call {
        /// Function name
        name: String,
        /// Argument expressions in source order
        args: Vec<Expr>,
    },
    /// A unary operation
    Unary {
        /// The operator
        op: UnaryOp,
        /// The operand
        operand: Box<Expr>,
    },
    /// A binary operation
    Binary {
        /// The operator
        op: BinaryOp,
        /// Left operand
        lhs: Box<Expr>,
        /// Right operand
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Depth of the expression tree (a leaf has depth 1)
    pub fn depth(&self) -> usize {
        match self {
            Expr::Literal(_) | Expr::Path(_) => 1,
            Expr::Call { args, .. } => 1 + args.iter().map(Expr::depth).max().unwrap_or(0),
            Expr::Unary { operand, .. } => 1 + operand.depth(),
            Expr::Binary { lhs, rhs, .. } => 1 + lhs.depth().max(rhs.depth()),
        }
    }
}
