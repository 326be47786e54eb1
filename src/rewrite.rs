//! The reduction engine. The expression lives in a flat string buffer that
//! is normalized once and then rewritten pass by pass: every pass drains
//! the reducible categories in a fixed order, replacing each matched span
//! with its computed value until only a simple expression remains.

use std::f64::consts;
use std::ops::Range;

use rand::Rng;

use crate::error::CalcError;
use crate::numeric;
use crate::pattern;
use crate::split;

/// Textual form of an undefined intermediate value. Substituted values are
/// formatted through [`format_number`], so this is the only spelling that
/// can appear in the buffer.
const UNDEFINED_MARK: &str = "NaN";

/// Extra reduction passes granted on top of one per buffer byte, so the
/// worst-case pass count stays proportional to the input size.
const PASS_MARGIN: usize = 16;

/// Reduces an expression string to a single number, rounded to the given
/// number of significant decimal digits.
pub fn reduce(input: &str, precision: usize) -> Result<f64, CalcError> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if !balanced(&compact) {
        return Err(CalcError::UnbalancedBrackets);
    }
    let mut buffer = normalize(&compact);

    let mut stalled = 0;
    for _ in 0..buffer.len() + PASS_MARGIN {
        if buffer.contains(UNDEFINED_MARK) {
            return Err(CalcError::Undefined);
        }
        if pattern::is_simple(&buffer) {
            return finalize(&buffer, precision);
        }
        let snapshot = buffer.clone();
        run_pass(&mut buffer)?;
        if buffer == snapshot {
            stalled += 1;
            if stalled >= 2 {
                return Err(CalcError::NoProgress);
            }
        } else {
            stalled = 0;
        }
    }
    Err(CalcError::NoProgress)
}

/// Equal bracket counts and never-negative nesting depth.
fn balanced(buffer: &str) -> bool {
    let mut depth: i64 = 0;
    for c in buffer.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => (),
        }
        if depth < 0 {
            return false;
        }
    }
    depth == 0
}

/// One-time preprocessing. The stages assume their predecessors have run,
/// so the order is fixed: constants, then RAND expansion, then implicit
/// multiplication, then scientific notation.
fn normalize(input: &str) -> String {
    let mut buffer = input
        .replace("PI", &bracketed_literal(consts::PI))
        .replace('E', &bracketed_literal(consts::E));
    expand_random(&mut buffer);
    loop {
        let inserted = pattern::insert_multiplication(&buffer);
        if inserted == buffer {
            break;
        }
        buffer = inserted;
    }
    expand_scientific(&buffer)
}

fn bracketed_literal(value: f64) -> String {
    format!("({})", value)
}

/// Every `RAND` occurrence becomes an independently drawn uniform value
/// from `[0, 1)`, wrapped in brackets.
fn expand_random(buffer: &mut String) {
    let mut rng = rand::thread_rng();
    while let Some(position) = buffer.find("RAND") {
        let value: f64 = rng.gen();
        buffer.replace_range(position..position + 4, &format!("({})", value));
    }
}

/// Rewrites `e±k` scientific notation into `*10^±k` until none remains.
/// The sign folding of the splitter later absorbs the explicit sign.
fn expand_scientific(buffer: &str) -> String {
    let mut current = buffer.to_string();
    while let Some(range) = pattern::scientific(&current) {
        let exponent = current[range.start + 1..range.end].to_string();
        current.replace_range(range, &format!("*10^{}", exponent));
    }
    current
}

/// One full reduction pass over the buffer.
fn run_pass(buffer: &mut String) -> Result<(), CalcError> {
    reduce_functions(buffer)?;
    reduce_roots(buffer)?;
    reduce_factorials(buffer)?;
    reduce_powers(buffer)?;
    reduce_groups(buffer)?;
    strip_constants(buffer);
    *buffer = split::plus_minus_axiom(buffer);
    *buffer = expand_scientific(buffer);
    Ok(())
}

fn reduce_functions(buffer: &mut String) -> Result<(), CalcError> {
    while let Some(call) = pattern::function_call(buffer) {
        let argument = parse_number(&call.argument)?;
        let value = match call.name.as_str() {
            "log" => numeric::log(argument)?,
            "ln" => numeric::ln(argument)?,
            "sin" => numeric::sin(argument)?,
            "cos" => numeric::cos(argument)?,
            "tan" => numeric::tan(argument)?,
            "cotan" => numeric::cotan(argument)?,
            "sinh" => numeric::sinh(argument)?,
            "cosh" => numeric::cosh(argument)?,
            "tanh" => numeric::tanh(argument)?,
            other => return Err(CalcError::InvalidOperand(other.to_string())),
        };
        if !substitute(buffer, call.range, value) {
            break;
        }
    }
    Ok(())
}

fn reduce_roots(buffer: &mut String) -> Result<(), CalcError> {
    while let Some(call) = pattern::root_call(buffer) {
        let degree = parse_number(&call.degree)?;
        let radicand = parse_number(&call.radicand)?;
        let value = numeric::root(radicand, degree)?;
        if !substitute(buffer, call.range, value) {
            break;
        }
    }
    Ok(())
}

fn reduce_factorials(buffer: &mut String) -> Result<(), CalcError> {
    while let Some(found) = pattern::bracket_factorial(buffer) {
        let operand = parse_number(&found.operand)?;
        let value = numeric::factorize(operand)?;
        if !substitute(buffer, found.range, value) {
            break;
        }
    }
    Ok(())
}

fn reduce_powers(buffer: &mut String) -> Result<(), CalcError> {
    while let Some(found) = pattern::bracket_power(buffer) {
        let base = parse_number(&found.base)?;
        let exponent = parse_number(&found.exponent)?;
        let value = numeric::power(base, exponent)?;
        if !substitute(buffer, found.range, value) {
            break;
        }
    }
    Ok(())
}

/// Innermost operator-bearing groups go through the splitter and come back
/// as bracketed values, ready for the surrounding form to consume.
fn reduce_groups(buffer: &mut String) -> Result<(), CalcError> {
    while let Some(group) = pattern::simple_group(buffer) {
        let value = split::evaluate(&group.operand)?;
        if !substitute(buffer, group.range, value) {
            break;
        }
    }
    Ok(())
}

/// Removes redundant brackets around lone constants. Strictly shrinking.
fn strip_constants(buffer: &mut String) {
    while let Some(constant) = pattern::bare_constant(buffer) {
        buffer.replace_range(constant.range, &constant.operand);
    }
}

/// Splices a computed value back into the buffer, re-wrapped in brackets.
/// Returns false when the replacement text equals the matched span, which
/// would otherwise let a drain loop spin forever.
fn substitute(buffer: &mut String, range: Range<usize>, value: f64) -> bool {
    let text = format!("({})", format_number(value));
    if buffer[range.clone()] == text {
        return false;
    }
    buffer.replace_range(range, &text);
    true
}

fn parse_number(literal: &str) -> Result<f64, CalcError> {
    Ok(literal.parse()?)
}

/// The inverse of [`parse_number`]: infinities keep the spelling the
/// patterns recognize, and plain values use the standard decimal form,
/// which never carries an exponent.
fn format_number(value: f64) -> String {
    if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        value.to_string()
    }
}

/// Final state: the buffer is a simple expression. Any residual
/// scientific notation is expanded, the span is evaluated, and the result
/// is rounded down to the requested precision.
fn finalize(buffer: &str, precision: usize) -> Result<f64, CalcError> {
    let expanded = expand_scientific(buffer);
    let value = split::evaluate(&expanded)?;
    if value.is_nan() {
        return Err(CalcError::Undefined);
    }
    Ok(numeric::round_significant(value, precision))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reduce10(input: &str) -> Result<f64, CalcError> {
        reduce(input, 10)
    }

    #[test]
    fn bracket_balance() {
        assert!(balanced("3+(14-sin(3))"));
        assert!(balanced(""));
        assert!(!balanced("3+(14-sin(3)"));
        assert!(!balanced(")("));
        assert_eq!(
            reduce10("3+(14-sin(3)"),
            Err(CalcError::UnbalancedBrackets)
        );
    }

    #[test]
    fn normalization_pipeline() {
        assert_eq!(normalize("2PI"), "2*(3.141592653589793)");
        assert_eq!(normalize("3E"), "3*(2.718281828459045)");
        assert_eq!(normalize("1.5e+2"), "1.5*10^+2");
        assert_eq!(normalize("3log(2)"), "3*log(2)");
        assert_eq!(normalize("2(3)(4)"), "2*(3)*(4)");
    }

    #[test]
    fn random_expansion_stays_in_range() {
        let mut buffer = "RAND+RAND".to_string();
        expand_random(&mut buffer);
        assert!(!buffer.contains("RAND"));
        let value = reduce10("RAND").unwrap();
        assert!((0.0..1.0).contains(&value));
    }

    #[test]
    fn stray_tokens_hit_the_no_progress_net() {
        assert_eq!(reduce10("2+frac(3)"), Err(CalcError::NoProgress));
        assert_eq!(reduce10("sinus(1)+2"), Err(CalcError::NoProgress));
        assert_eq!(reduce10("5%3"), Err(CalcError::NoProgress));
        assert_eq!(reduce10("3+()"), Err(CalcError::NoProgress));
    }

    #[test]
    fn undefined_marks_are_detected() {
        assert_eq!(reduce10("0/0"), Err(CalcError::Undefined));
        assert_eq!(reduce10("(2.5)!"), Err(CalcError::Undefined));
        assert_eq!(reduce10("(-1)^0.5"), Err(CalcError::Undefined));
        assert_eq!(reduce10("tan(PI/2)"), Err(CalcError::Undefined));
        assert_eq!(reduce10("cotan(0)"), Err(CalcError::Undefined));
    }
}
