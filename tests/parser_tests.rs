use abacus::expr::{
    parse, ExpressionNode, Operator, ParseError, MAX_DEPTH, MAX_NESTING, MAX_OPERATORS,
};

fn lit(value: f64) -> ExpressionNode {
    ExpressionNode::literal(value)
}

fn bin(op: Operator, left: ExpressionNode, right: ExpressionNode) -> ExpressionNode {
    ExpressionNode::binary(op, left, right)
}

fn nested(levels: usize) -> String {
    format!("{}1+2{}", "(".repeat(levels), ")".repeat(levels))
}

/// Full binary tree of additions with `2^levels - 1` operators.
fn balanced(levels: u32) -> String {
    if levels == 0 {
        return "1".to_string();
    }
    let half = balanced(levels - 1);
    format!("({}+{})", half, half)
}

#[test]
fn test_single_literal() {
    assert_eq!(parse("42").unwrap(), lit(42.0));
    assert_eq!(parse("  3.25 ").unwrap(), lit(3.25));
}

#[test]
fn test_precedence_multiplication_below_addition() {
    let tree = parse("2+3*4").unwrap();
    assert_eq!(
        tree,
        bin(Operator::Add, lit(2.0), bin(Operator::Mul, lit(3.0), lit(4.0)))
    );
    assert_eq!(tree.internal_node_count(), 2);
}

#[test]
fn test_left_associativity() {
    assert_eq!(
        parse("8-3-2").unwrap(),
        bin(Operator::Sub, bin(Operator::Sub, lit(8.0), lit(3.0)), lit(2.0))
    );
    assert_eq!(
        parse("24/4/2").unwrap(),
        bin(Operator::Div, bin(Operator::Div, lit(24.0), lit(4.0)), lit(2.0))
    );
}

#[test]
fn test_parentheses_override_precedence() {
    assert_eq!(
        parse("(2+3)*4").unwrap(),
        bin(Operator::Mul, bin(Operator::Add, lit(2.0), lit(3.0)), lit(4.0))
    );
}

#[test]
fn test_nested_parentheses_and_whitespace() {
    assert_eq!(
        parse(" 2 *\t( ( 1.5 - .5 ) ) ").unwrap(),
        bin(Operator::Mul, lit(2.0), bin(Operator::Sub, lit(1.5), lit(0.5)))
    );
}

#[test]
fn test_negative_literals() {
    assert_eq!(
        parse("2*-3").unwrap(),
        bin(Operator::Mul, lit(2.0), lit(-3.0))
    );
    assert_eq!(
        parse("-3-2").unwrap(),
        bin(Operator::Sub, lit(-3.0), lit(2.0))
    );
    assert_eq!(
        parse("1 - -1").unwrap(),
        bin(Operator::Sub, lit(1.0), lit(-1.0))
    );
}

#[test]
fn test_trailing_dot_literal() {
    assert_eq!(parse("5.").unwrap(), lit(5.0));
}

#[test]
fn test_empty_input() {
    assert_eq!(parse(""), Err(ParseError::Empty));
    assert_eq!(parse("   \n"), Err(ParseError::Empty));
}

#[test]
fn test_unexpected_end() {
    assert_eq!(parse("2+"), Err(ParseError::UnexpectedEnd));
    assert_eq!(parse("(2+3"), Err(ParseError::UnexpectedEnd));
    assert_eq!(parse("2*("), Err(ParseError::UnexpectedEnd));
}

#[test]
fn test_unexpected_input_reports_position() {
    assert_eq!(
        parse("2+*3"),
        Err(ParseError::Unexpected {
            position: 2,
            fragment: "*3".to_string()
        })
    );
    assert_eq!(
        parse("2 3"),
        Err(ParseError::Unexpected {
            position: 2,
            fragment: "3".to_string()
        })
    );
    assert_eq!(
        parse("abc"),
        Err(ParseError::Unexpected {
            position: 0,
            fragment: "abc".to_string()
        })
    );
    assert_eq!(
        parse("()"),
        Err(ParseError::Unexpected {
            position: 1,
            fragment: ")".to_string()
        })
    );
}

#[test]
fn test_unsupported_operator_is_rejected() {
    assert_eq!(
        parse("2 % 3"),
        Err(ParseError::Unexpected {
            position: 2,
            fragment: "% 3".to_string()
        })
    );
}

#[test]
fn test_error_messages() {
    assert_eq!(ParseError::Empty.to_string(), "expression is empty");
    assert_eq!(
        ParseError::UnexpectedEnd.to_string(),
        "unexpected end of expression"
    );
    assert_eq!(
        parse("1 ? 2").unwrap_err().to_string(),
        "unexpected input at position 2: '? 2'"
    );
}

// =============================================================================
// Size Limits
// =============================================================================

#[test]
fn test_nesting_at_limit_is_accepted() {
    let tree = parse(&nested(MAX_NESTING)).unwrap();
    assert_eq!(tree, bin(Operator::Add, lit(1.0), lit(2.0)));
}

#[test]
fn test_nesting_past_limit_is_rejected() {
    assert_eq!(
        parse(&nested(MAX_NESTING + 1)),
        Err(ParseError::NestingTooDeep { limit: MAX_NESTING })
    );
    // Far past the limit, where unbounded descent would exhaust the stack.
    assert_eq!(
        parse(&format!("{}1{}", "(".repeat(2000), ")".repeat(2000))),
        Err(ParseError::NestingTooDeep { limit: MAX_NESTING })
    );
}

#[test]
fn test_depth_at_limit_is_accepted() {
    let tree = parse(&format!("1{}", "+1".repeat(MAX_DEPTH))).unwrap();
    assert_eq!(tree.depth(), MAX_DEPTH);
    assert_eq!(tree.internal_node_count(), MAX_DEPTH);
}

#[test]
fn test_depth_past_limit_is_rejected() {
    assert_eq!(
        parse(&format!("1{}", "+1".repeat(MAX_DEPTH + 1))),
        Err(ParseError::TooDeep { limit: MAX_DEPTH })
    );
    assert_eq!(
        parse(&format!("2{}", "*2".repeat(MAX_DEPTH + 1))),
        Err(ParseError::TooDeep { limit: MAX_DEPTH })
    );
}

#[test]
fn test_operator_count_at_limit_is_accepted() {
    // 1023 operators in the balanced part, one more on top.
    let tree = parse(&format!("{}+1", balanced(10))).unwrap();
    assert_eq!(tree.internal_node_count(), MAX_OPERATORS);
    assert_eq!(tree.depth(), 11);
}

#[test]
fn test_operator_count_past_limit_is_rejected() {
    assert_eq!(
        parse(&format!("{}+1+1", balanced(10))),
        Err(ParseError::TooLarge {
            limit: MAX_OPERATORS
        })
    );
    assert_eq!(
        parse(&vec!["1"; 5000].join("+")),
        Err(ParseError::TooLarge {
            limit: MAX_OPERATORS
        })
    );
}

#[test]
fn test_limit_error_messages() {
    assert_eq!(
        ParseError::NestingTooDeep { limit: 64 }.to_string(),
        "parentheses nest deeper than 64 levels"
    );
    assert_eq!(
        ParseError::TooDeep { limit: 128 }.to_string(),
        "expression is deeper than 128 operators"
    );
    assert_eq!(
        ParseError::TooLarge { limit: 1024 }.to_string(),
        "expression has more than 1024 operators"
    );
}
