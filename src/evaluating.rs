use crate::parsing::*;
use crate::scanning::*;

pub fn evaluate(tree: &SyntaxTree, node: NodeId) -> f64 {
    match tree.token(node) {
        Token::literal(value) => value,
        Token::operator(operator) => match (tree.left(node), tree.right(node)) {
            (Some(left), Some(right)) => {
                apply(operator, evaluate(tree, left), evaluate(tree, right))
            }
            // An operator that never received both operands yields zero.
            _ => 0.0,
        },
        _ => 0.0,
    }
}

fn apply(operator: Operator, left: f64, right: f64) -> f64 {
    use Operator::*;
    match operator {
        addition => left + right,
        subtraction => left - right,
        multiplication => left * right,
        // Division by zero yields zero, not an error.
        division => {
            if right == 0.0 {
                0.0
            } else {
                left / right
            }
        }
        exponentiation => left.powf(right),
        equals => 0.0,
    }
}
