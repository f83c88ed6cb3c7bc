//! # Tenet DSL
//!
//! The invariant expression language: a small, pure, total language for
//! writing structural invariants as source text.
//!
//! ## Pipeline
//!
//! ```text
//! source text
//!     │
//!     ▼
//! ┌─────────┐    ┌──────────┐    ┌───────────┐    ┌───────────┐
//! │  Lexer   │ ─► │  Parser  │ ─► │ Validator │ ─► │ Evaluator │
//! │ (tokens) │    │  (AST)   │    │ (allow-   │    │ (Value)   │
//! └─────────┘    └──────────┘    │  lists)   │    └───────────┘
//!                                └───────────┘
//! ```
//!
//! The first three stages run once, at load time, via [`compile`]. The
//! evaluator runs per judgment and is total: no error path, no panic, no
//! side effect.
//!
//! ## Key Principle
//!
//! Static validation is the security boundary. An expression that could
//! read semantic data (`state.data`, any `payload` segment, ...) fails
//! compilation and therefore can never be evaluated. The evaluator
//! assumes nothing: even an unvalidated tree would only ever read the
//! few paths the context exposes.
//!
//! ## Example
//!
//! ```
//! use tenet_core::{EvalContext, State};
//! use tenet_dsl::compile;
//!
//! let expr = compile("is_string(state.id) && non_empty(state.id)").unwrap();
//! let state = State::new("S1");
//! assert!(expr.evaluate(&EvalContext::for_state(&state)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod compile;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod validator;
pub mod value;

pub use ast::{BinaryOp, Expr, Literal, Path, UnaryOp};
pub use compile::{compile, CompiledExpr};
pub use error::{CompileError, LexError, ParseError, ValidationError};
pub use eval::{evaluate, holds};
pub use lexer::lex;
pub use parser::{parse, MAX_PARSE_DEPTH};
pub use token::{Token, TokenKind};
pub use validator::{function_arity, validate, ALLOWED_ROOTS, MAX_DEPTH, MAX_SAFE_INTEGER};
pub use value::Value;
