//! Arithmetic expression trees and the text parser that produces them.
//!
//! The evaluator only consumes [`ExpressionNode`]; [`parse`] is the single
//! way text enters the system.

pub mod ast;
pub mod parser;

pub use ast::{ExpressionNode, Operator};
pub use parser::{parse, ParseError, MAX_DEPTH, MAX_NESTING, MAX_OPERATORS};
