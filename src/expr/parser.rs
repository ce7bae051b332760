use nom::{
    branch::alt,
    character::complete::{char, digit0, digit1, multispace0},
    combinator::{all_consuming, cut, map_res, opt, recognize, value},
    multi::fold_many0,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use thiserror::Error;

use super::ast::{ExpressionNode, Operator};

type ParserResult<'a, O> = IResult<&'a str, O>;

const FRAGMENT_LEN: usize = 16;

/// Deepest parenthesis nesting accepted.
pub const MAX_NESTING: usize = 64;

/// Longest chain of operator nodes from the root to any leaf.
pub const MAX_DEPTH: usize = 128;

/// Most operator nodes, i.e. jobs, a single expression may create.
pub const MAX_OPERATORS: usize = 1024;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("expression is empty")]
    Empty,

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unexpected input at position {position}: '{fragment}'")]
    Unexpected { position: usize, fragment: String },

    #[error("parentheses nest deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    #[error("expression is deeper than {limit} operators")]
    TooDeep { limit: usize },

    #[error("expression has more than {limit} operators")]
    TooLarge { limit: usize },
}

impl ParseError {
    fn at(text: &str, rest: &str) -> Self {
        if rest.is_empty() {
            return ParseError::UnexpectedEnd;
        }
        ParseError::Unexpected {
            position: text.len() - rest.len(),
            fragment: rest.chars().take(FRAGMENT_LEN).collect(),
        }
    }
}

/// Parse infix arithmetic into a binary tree.
///
/// `*` and `/` bind tighter than `+` and `-`; all four are left-associative.
/// A `-` written directly before a number belongs to the literal, so `2*-3`
/// is a product of two leaves.
///
/// Trees are bounded by [`MAX_NESTING`], [`MAX_DEPTH`] and [`MAX_OPERATORS`]
/// so that parsing, evaluating and dropping them never recurses without limit.
pub fn parse(text: &str) -> Result<ExpressionNode, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    check_bounds(text)?;

    let tree = match all_consuming(ws(expr))(text) {
        Ok((_, tree)) => tree,
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            return Err(ParseError::at(text, e.input))
        }
        Err(nom::Err::Incomplete(_)) => return Err(ParseError::UnexpectedEnd),
    };

    if tree.internal_node_count() > MAX_OPERATORS {
        return Err(ParseError::TooLarge {
            limit: MAX_OPERATORS,
        });
    }
    if tree.depth() > MAX_DEPTH {
        return Err(ParseError::TooDeep { limit: MAX_DEPTH });
    }
    Ok(tree)
}

/// Reject input whose parse alone would nest or allocate too much.
///
/// Every operator node consumes one symbol and every literal at most one
/// sign, so `n` operators never need more than `2n + 1` symbols.
fn check_bounds(text: &str) -> Result<(), ParseError> {
    let mut nesting = 0usize;
    let mut symbols = 0usize;

    for c in text.chars() {
        match c {
            '(' => {
                nesting += 1;
                if nesting > MAX_NESTING {
                    return Err(ParseError::NestingTooDeep { limit: MAX_NESTING });
                }
            }
            ')' => nesting = nesting.saturating_sub(1),
            '+' | '-' | '*' | '/' => symbols += 1,
            _ => {}
        }
    }

    if symbols > 2 * MAX_OPERATORS + 1 {
        return Err(ParseError::TooLarge {
            limit: MAX_OPERATORS,
        });
    }
    Ok(())
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> ParserResult<'a, O>
where
    F: FnMut(&'a str) -> ParserResult<'a, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn expr(input: &str) -> ParserResult<ExpressionNode> {
    let additive = alt((value(Operator::Add, char('+')), value(Operator::Sub, char('-'))));
    let (input, first) = term(input)?;
    fold_many0(
        pair(ws(additive), cut(term)),
        move || first.clone(),
        |acc, (op, rhs)| ExpressionNode::binary(op, acc, rhs),
    )(input)
}

fn term(input: &str) -> ParserResult<ExpressionNode> {
    let multiplicative = alt((value(Operator::Mul, char('*')), value(Operator::Div, char('/'))));
    let (input, first) = factor(input)?;
    fold_many0(
        pair(ws(multiplicative), cut(factor)),
        move || first.clone(),
        |acc, (op, rhs)| ExpressionNode::binary(op, acc, rhs),
    )(input)
}

fn factor(input: &str) -> ParserResult<ExpressionNode> {
    ws(alt((number, parenthesized)))(input)
}

fn parenthesized(input: &str) -> ParserResult<ExpressionNode> {
    preceded(char('('), cut(terminated(ws(expr), char(')'))))(input)
}

fn number(input: &str) -> ParserResult<ExpressionNode> {
    map_res(
        recognize(tuple((
            opt(char('-')),
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                recognize(pair(char('.'), digit1)),
            )),
        ))),
        |text: &str| text.parse::<f64>().map(ExpressionNode::literal),
    )(input)
}
