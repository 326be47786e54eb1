use std::f64::consts::{FRAC_PI_2, PI};

use crate::error::CalcError;

/// Significant digits kept by the transcendental wrappers. Rounding here
/// damps the floating noise that would otherwise leak into the buffer and
/// keeps asymptote detection stable.
const DAMPING_DIGITS: usize = 13;

/// Results this close to an integer are snapped to it. Covers roots that
/// are mathematically exact integers, e.g. the 14th root of 678223072849.
const INTEGER_TOLERANCE: f64 = 1e-12;

/// How close `x mod pi` must come to an asymptote point before tan or
/// cotan give up and report the value as undefined.
const ASYMPTOTE_TOLERANCE: f64 = 1e-12;

/// Rounds `value` to the given number of significant decimal digits.
/// Non-finite values and zero pass through unchanged.
pub fn round_significant(value: f64, digits: usize) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return value;
    }
    format!("{:.*e}", digits - 1, value).parse().unwrap_or(value)
}

/// Validates an operand list: at least `required` operands, none of them
/// NaN. A NaN operand is a caller bug, not a numeric result, and is
/// reported as an invalid operand rather than folded into the output.
fn check_values(values: &[f64], required: usize) -> Result<(), CalcError> {
    if values.len() < required {
        return Err(CalcError::MissingOperand);
    }
    for value in values {
        if value.is_nan() {
            return Err(CalcError::InvalidOperand(value.to_string()));
        }
    }
    Ok(())
}

pub fn add(values: &[f64]) -> Result<f64, CalcError> {
    check_values(values, 1)?;
    Ok(values.iter().fold(0.0, |acc, v| acc + v))
}

/// Left-fold subtraction; a single operand is negated.
pub fn subtract(values: &[f64]) -> Result<f64, CalcError> {
    check_values(values, 1)?;
    if values.len() == 1 {
        return Ok(-values[0]);
    }
    Ok(values[1..].iter().fold(values[0], |acc, v| acc - v))
}

/// Left-fold product. A literal zero short-circuits the fold, but only
/// when no operand is infinite: `0 * Infinity` must come out as NaN, not
/// as the short-circuit zero.
pub fn multiply(values: &[f64]) -> Result<f64, CalcError> {
    check_values(values, 2)?;
    if values.iter().any(|v| *v == 0.0) && !values.iter().any(|v| v.is_infinite()) {
        return Ok(0.0);
    }
    Ok(values[1..].iter().fold(values[0], |acc, v| acc * v))
}

/// Left-fold division with IEEE semantics: `0/x = 0`, `x/0` is
/// sign-correct infinity, `0/0` and `Inf/Inf` are NaN.
pub fn divide(values: &[f64]) -> Result<f64, CalcError> {
    check_values(values, 2)?;
    Ok(values[1..].iter().fold(values[0], |acc, v| acc / v))
}

/// Iterative factorial. Defined for non-negative integers and positive
/// infinity; everything else has no real-valued factorial and yields NaN.
pub fn factorize(value: f64) -> Result<f64, CalcError> {
    check_values(&[value], 1)?;
    if value == f64::INFINITY {
        return Ok(f64::INFINITY);
    }
    if value < 0.0 || value.fract() != 0.0 {
        return Ok(f64::NAN);
    }
    let mut product: f64 = 1.0;
    let mut k = value;
    while k > 1.0 && product.is_finite() {
        product *= k;
        k -= 1.0;
    }
    Ok(product)
}

pub fn power(base: f64, exponent: f64) -> Result<f64, CalcError> {
    check_values(&[base, exponent], 2)?;
    Ok(base.powf(exponent))
}

/// The n-th root of `value`, derived from `power` with exponent `1/n`.
/// Odd-integer roots of negative bases flip the sign instead of going
/// complex; other negative-base roots yield NaN.
pub fn root(value: f64, degree: f64) -> Result<f64, CalcError> {
    check_values(&[value, degree], 2)?;
    let result = if value < 0.0 {
        if degree.fract() == 0.0 && degree.abs() % 2.0 == 1.0 {
            -(-value).powf(1.0 / degree)
        } else {
            f64::NAN
        }
    } else {
        value.powf(1.0 / degree)
    };
    if result.is_finite() && (result - result.round()).abs() < INTEGER_TOLERANCE {
        return Ok(result.round());
    }
    Ok(result)
}

pub fn ln(value: f64) -> Result<f64, CalcError> {
    check_values(&[value], 1)?;
    Ok(round_significant(value.ln(), DAMPING_DIGITS))
}

pub fn log(value: f64) -> Result<f64, CalcError> {
    check_values(&[value], 1)?;
    Ok(round_significant(value.log10(), DAMPING_DIGITS))
}

pub fn sin(value: f64) -> Result<f64, CalcError> {
    check_values(&[value], 1)?;
    Ok(round_significant(value.sin(), DAMPING_DIGITS))
}

pub fn cos(value: f64) -> Result<f64, CalcError> {
    check_values(&[value], 1)?;
    Ok(round_significant(value.cos(), DAMPING_DIGITS))
}

/// Tangent, with NaN exactly at the asymptotes. Without the guard the
/// float representation of pi/2 produces a large finite value instead.
pub fn tan(value: f64) -> Result<f64, CalcError> {
    check_values(&[value], 1)?;
    if at_asymptote(value, FRAC_PI_2) {
        return Ok(f64::NAN);
    }
    Ok(round_significant(value.tan(), DAMPING_DIGITS))
}

/// Cotangent, undefined at integer multiples of pi.
pub fn cotan(value: f64) -> Result<f64, CalcError> {
    check_values(&[value], 1)?;
    if at_asymptote(value, 0.0) {
        return Ok(f64::NAN);
    }
    Ok(round_significant(1.0 / value.tan(), DAMPING_DIGITS))
}

pub fn sinh(value: f64) -> Result<f64, CalcError> {
    check_values(&[value], 1)?;
    Ok(round_significant(value.sinh(), DAMPING_DIGITS))
}

pub fn cosh(value: f64) -> Result<f64, CalcError> {
    check_values(&[value], 1)?;
    Ok(round_significant(value.cosh(), DAMPING_DIGITS))
}

pub fn tanh(value: f64) -> Result<f64, CalcError> {
    check_values(&[value], 1)?;
    Ok(round_significant(value.tanh(), DAMPING_DIGITS))
}

/// True when `value` modulo pi lands on `offset`, i.e. the point is an
/// asymptote of tan (offset pi/2) or cotan (offset 0). The remainder lives
/// in `[0, pi)`, so the comparison wraps around by one period.
fn at_asymptote(value: f64, offset: f64) -> bool {
    if !value.is_finite() {
        return false;
    }
    let distance = value.rem_euclid(PI) - offset;
    distance.abs() < ASYMPTOTE_TOLERANCE
        || (distance - PI).abs() < ASYMPTOTE_TOLERANCE
        || (distance + PI).abs() < ASYMPTOTE_TOLERANCE
}
