use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            _ => None,
        }
    }

    /// IEEE-754 arithmetic; division by zero yields an infinity or NaN.
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Operator::Add => left + right,
            Operator::Sub => left - right,
            Operator::Mul => left * right,
            Operator::Div => left / right,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Binary expression tree. Internal nodes always own both children.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionNode {
    Literal(f64),
    Binary {
        op: Operator,
        left: Box<ExpressionNode>,
        right: Box<ExpressionNode>,
    },
}

impl ExpressionNode {
    pub fn literal(value: f64) -> Self {
        ExpressionNode::Literal(value)
    }

    pub fn binary(op: Operator, left: ExpressionNode, right: ExpressionNode) -> Self {
        ExpressionNode::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, ExpressionNode::Literal(_))
    }

    /// Number of operator nodes, i.e. the number of jobs evaluating this tree creates.
    pub fn internal_node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let ExpressionNode::Binary { left, right, .. } = node {
                count += 1;
                stack.push(left.as_ref());
                stack.push(right.as_ref());
            }
        }
        count
    }

    /// Operator nodes on the longest path from this node to a leaf. A leaf has depth 0.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0)];
        while let Some((node, level)) = stack.pop() {
            match node {
                ExpressionNode::Literal(_) => deepest = deepest.max(level),
                ExpressionNode::Binary { left, right, .. } => {
                    stack.push((left.as_ref(), level + 1));
                    stack.push((right.as_ref(), level + 1));
                }
            }
        }
        deepest
    }
}

impl fmt::Display for ExpressionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionNode::Literal(value) => write!(f, "{}", value),
            ExpressionNode::Binary { op, left, right } => {
                write!(f, "({} {} {})", left, op, right)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_symbol_round_trip() {
        for op in [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div] {
            assert_eq!(Operator::from_symbol(op.symbol()), Some(op));
        }
        assert_eq!(Operator::from_symbol('%'), None);
    }

    #[test]
    fn operator_apply() {
        assert_eq!(Operator::Add.apply(2.0, 3.0), 5.0);
        assert_eq!(Operator::Sub.apply(5.0, 3.0), 2.0);
        assert_eq!(Operator::Mul.apply(4.0, 3.0), 12.0);
        assert_eq!(Operator::Div.apply(6.0, 2.0), 3.0);
        assert!(Operator::Div.apply(0.0, 0.0).is_nan());
    }

    #[test]
    fn internal_node_count() {
        let leaf = ExpressionNode::literal(1.0);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.internal_node_count(), 0);

        // (1 + 2) * (3 - 4)
        let tree = ExpressionNode::binary(
            Operator::Mul,
            ExpressionNode::binary(
                Operator::Add,
                ExpressionNode::literal(1.0),
                ExpressionNode::literal(2.0),
            ),
            ExpressionNode::binary(
                Operator::Sub,
                ExpressionNode::literal(3.0),
                ExpressionNode::literal(4.0),
            ),
        );
        assert!(!tree.is_leaf());
        assert_eq!(tree.internal_node_count(), 3);
        assert_eq!(tree.depth(), 2);
        assert_eq!(leaf.depth(), 0);
        assert_eq!(tree.to_string(), "((1 + 2) * (3 - 4))");
    }
}
