//! Compiler pipeline entry points.
//!
//! text → tokenize → split → validate → to_postfix → build_tree, once per
//! side. Each stage returns a typed error and the pipeline stops at the
//! first one; no partial equation is ever produced.

use serde::{Deserialize, Serialize};

use crate::Real;
use crate::builder::build_tree;
use crate::context::EvalContext;
use crate::error::{ParseError, Result, Side};
use crate::eval::eval_ast;
use crate::lexer::{LexerOptions, tokenize_with};
use crate::postfix::to_postfix;
use crate::split::split_tokens;
use crate::types::{AstExpr, Equation, Token};
use crate::validate::{ValidatorMode, validate_with};

/// Settings for the whole pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub lexer: LexerOptions,
    pub validator: ValidatorMode,
}

/// Validates, converts and builds one side.
fn compile_side(tokens: &[Token], side: Side, options: &ParseOptions) -> Result<AstExpr> {
    validate_with(tokens, options.validator).map_err(|e| ParseError::validation(side, e))?;
    let postfix = to_postfix(tokens).map_err(|e| ParseError::build(side, e))?;
    build_tree(postfix).map_err(|e| ParseError::build(side, e))
}

/// Parses an equation with the default options.
///
/// # Examples
///
/// ```
/// use exp_plot::context::EvalContext;
/// use exp_plot::engine::parse;
///
/// // No `=`: read as `x^2 = y`
/// let eq = parse("x^2").unwrap();
/// assert_eq!(eq.implicit(&EvalContext::at(3.0, 9.0)), 0.0);
///
/// assert!(parse("x*y").is_err());
/// ```
pub fn parse(text: &str) -> Result<Equation> {
    parse_with(text, &ParseOptions::default())
}

/// Parses an equation.
#[tracing::instrument(level = "debug", skip(options))]
pub fn parse_with(text: &str, options: &ParseOptions) -> Result<Equation> {
    let tokens = tokenize_with(text, &options.lexer)?;
    tracing::trace!(count = tokens.len(), "tokenized");

    let (lhs, rhs) = split_tokens(tokens)?;
    let lhs = compile_side(&lhs, Side::Left, options)?;
    let rhs = compile_side(&rhs, Side::Right, options)?;

    let equation = Equation::new(lhs, rhs);
    tracing::debug!(%equation, "parsed equation");
    Ok(equation)
}

/// Parses a single expression with no `=` and no splitting.
///
/// Unlike [`parse`], constant expressions such as `2+3*4` are accepted.
pub fn parse_expression(text: &str) -> Result<AstExpr> {
    parse_expression_with(text, &ParseOptions::default())
}

pub fn parse_expression_with(text: &str, options: &ParseOptions) -> Result<AstExpr> {
    let tokens = tokenize_with(text, &options.lexer)?;
    compile_side(&tokens, Side::Left, options)
}

/// Interprets a string as a mathematical expression, evaluates it, and returns the result.
///
/// # Examples
///
/// ```
/// use exp_plot::context::EvalContext;
/// use exp_plot::engine::interp;
///
/// let ctx = EvalContext::new();
/// assert_eq!(interp("2 + 3 * 4", &ctx).unwrap(), 14.0);
/// assert_eq!(interp("2^3^2", &ctx).unwrap(), 512.0);
///
/// let ctx = EvalContext::at(3.0, 0.0);
/// assert_eq!(interp("2x + 1", &ctx).unwrap(), 7.0);
/// ```
pub fn interp(expression: &str, ctx: &EvalContext) -> Result<Real> {
    let ast = parse_expression(expression)?;
    Ok(eval_ast(&ast, ctx))
}
