//! Evaluation of simple expressions: spans holding only signed decimal
//! literals, `Infinity` and the operators `+ - * / ^ !`. The span is split
//! into an operation tree by lowest-precedence operator first and folded
//! back together through the numeric primitives.

use crate::error::CalcError;
use crate::numeric;

/// Internal marker for a negated operand, produced when a unary minus
/// follows `*`, `/` or `^` and consumed only by leaf parsing.
const NEGATIVE_MARK: char = 'N';

/// Split priority, lowest-binding tier first. A span is always split on
/// every occurrence of the first operator present in this order, which
/// yields left-associative variadic chains for the `+ - * /` tiers.
const OPERATORS: [char; 6] = ['+', '-', '*', '/', '^', '!'];

/// A node of the operation tree: a signed number, or an operator applied
/// to an ordered operand list.
#[derive(Debug, PartialEq)]
enum Node {
    Leaf(f64),
    Operation(char, Vec<Node>),
}

/// Collapses chains of adjacent sign operators to a single effective sign.
/// The rewriting is confluent and strictly shrinking, so a plain loop to
/// the fixed point terminates.
pub fn plus_minus_axiom(expr: &str) -> String {
    let mut current = expr.to_string();
    loop {
        let collapsed = current
            .replace("++", "+")
            .replace("--", "+")
            .replace("+-", "-")
            .replace("-+", "-");
        if collapsed == current {
            return current;
        }
        current = collapsed;
    }
}

/// Resolves unary signs sitting behind a higher-precedence operator:
/// `*+ /+ ^+` lose the sign, `*- /- ^-` swap it for the negative mark.
/// Runs after the sign chains have already been collapsed.
fn fold_unary_signs(expr: &str) -> String {
    expr.replace("*+", "*")
        .replace("/+", "/")
        .replace("^+", "^")
        .replace("*-", &format!("*{}", NEGATIVE_MARK))
        .replace("/-", &format!("/{}", NEGATIVE_MARK))
        .replace("^-", &format!("^{}", NEGATIVE_MARK))
}

/// Evaluates a simple-expression span to a number. Undefined results come
/// back as NaN; structural problems (empty operands, malformed literals,
/// wrong arity) come back as errors.
pub fn evaluate(span: &str) -> Result<f64, CalcError> {
    let prepared = fold_unary_signs(&plus_minus_axiom(span));
    let tree = split(&prepared)?;
    apply(tree)
}

fn split(span: &str) -> Result<Node, CalcError> {
    // A leading sign is folded into the first operand before splitting,
    // otherwise it would be lost as an empty piece of the `+`/`-` tier.
    let owned;
    let span = if let Some(rest) = span.strip_prefix('-') {
        owned = format!("{}{}", NEGATIVE_MARK, rest);
        owned.as_str()
    } else if let Some(rest) = span.strip_prefix('+') {
        rest
    } else {
        span
    };

    for &operator in OPERATORS.iter() {
        if !span.contains(operator) {
            continue;
        }
        let mut operands = Vec::new();
        for piece in span.split(operator) {
            if piece.is_empty() {
                continue;
            }
            operands.push(split(piece)?);
        }
        if operands.is_empty() {
            return Err(CalcError::MissingOperand);
        }
        return Ok(Node::Operation(operator, operands));
    }
    parse_leaf(span)
}

fn parse_leaf(literal: &str) -> Result<Node, CalcError> {
    let (negative, digits) = match literal.strip_prefix(NEGATIVE_MARK) {
        Some(rest) => (true, rest),
        None => (false, literal),
    };
    if digits.is_empty() {
        return Err(CalcError::MissingOperand);
    }
    let value: f64 = digits.parse()?;
    Ok(Node::Leaf(if negative { -value } else { value }))
}

/// Post-order evaluation: operands first, then the node's own operator.
fn apply(node: Node) -> Result<f64, CalcError> {
    let (operator, operands) = match node {
        Node::Leaf(value) => return Ok(value),
        Node::Operation(operator, operands) => (operator, operands),
    };
    let mut values = Vec::with_capacity(operands.len());
    for operand in operands {
        values.push(apply(operand)?);
    }
    match operator {
        '+' => numeric::add(&values),
        '-' => numeric::subtract(&values),
        '*' => numeric::multiply(&values),
        '/' => numeric::divide(&values),
        '^' => {
            if values.len() != 2 {
                return Err(CalcError::MissingOperand);
            }
            numeric::power(values[0], values[1])
        }
        '!' => {
            if values.len() != 1 {
                return Err(CalcError::MissingOperand);
            }
            numeric::factorize(values[0])
        }
        _ => Err(CalcError::InvalidOperand(operator.to_string())),
    }
}
