use super::*;

/// For some string input, compare `eval(_)` against the expected output.
fn compare(input: &str, expected: f64) {
    match eval(input) {
        Ok(output) => assert_eq!(output, expected, "eval({:?})", input),
        Err(e) => panic!("eval({:?}) failed: {}", input, e),
    }
}

/// Like `compare`, but within a small tolerance for float noise.
fn compare_close(input: &str, expected: f64) {
    match eval(input) {
        Ok(output) => assert!(
            (output - expected).abs() < 1e-6,
            "eval({:?}) = {}, expected about {}",
            input,
            output,
            expected
        ),
        Err(e) => panic!("eval({:?}) failed: {}", input, e),
    }
}

#[test]
fn basics() {
    let cases = vec![
        ("6+3*2", 12.0),
        ("(6+3)*2", 18.0),
        ("6+3*(2+1)", 15.0),
        ("  1 +   1", 2.0),
        ("3+3", 6.0),
        ("1+8*4", 33.0),
        ("8-3-2", 3.0),
        ("(1)", 1.0),
        ("-5+2", -3.0),
    ];
    for (input, expected) in cases {
        compare(input, expected);
    }
}

#[test]
fn powers_factorials_and_roots() {
    let cases = vec![
        ("2^10", 1024.0),
        ("(2)^10", 1024.0),
        ("(2)^-3", 0.125),
        ("3!", 6.0),
        ("(3)!", 6.0),
        ("(6+3)!", 362880.0),
        ("4!/2", 12.0),
        ("(3)root(27)", 3.0),
        ("(2)root(16)", 4.0),
        ("(3)root(8+1)", 2.080083823),
    ];
    for (input, expected) in cases {
        compare(input, expected);
    }
}

#[test]
fn implicit_multiplication() {
    let cases = vec![
        ("2(3+4)", 14.0),
        ("(2)(3)", 6.0),
        ("3log(100)", 6.0),
        ("(2)5", 10.0),
    ];
    for (input, expected) in cases {
        compare(input, expected);
    }
}

#[test]
fn constants_and_scientific_notation() {
    compare_close("PI", 3.141592654);
    compare_close("2PI", 6.283185307);
    compare_close("E", 2.718281828);
    compare_close("3E", 8.154845485);
    compare("1.5e+2", 150.0);
    compare("25e-1", 2.5);
    compare("1e+2+1e+2", 200.0);
}

#[test]
fn random_literal() {
    for _ in 0..8 {
        let value = eval("RAND").unwrap();
        assert!((0.0..1.0).contains(&value));
    }
    let value = eval("RAND+RAND").unwrap();
    assert!((0.0..2.0).contains(&value));
}

#[test]
fn function_nesting() {
    compare_close("log(4*5-4)", 1.204119983);
    compare("sin(PI/6)", 0.5);
    compare_close("2*(8+log(100)+7)-8", 26.0);
}

#[test]
fn composite_expression() {
    compare_close(
        "7*4+log(8+13*sin(18.3-4/2)+22)/3!-ln(14+3!)",
        25.230416403,
    );
}

#[test]
fn division_edges() {
    assert_eq!(eval("5/0"), Ok(f64::INFINITY));
    assert_eq!(eval("-5/0"), Ok(f64::NEG_INFINITY));
    assert_eq!(eval("0/5"), Ok(0.0));
    assert_eq!(eval("0/0"), Err(CalcError::Undefined));
    assert_eq!(eval("(1/0)+5"), Ok(f64::INFINITY));
    assert_eq!(eval("ln(0)"), Ok(f64::NEG_INFINITY));
}

#[test]
fn undefined_operations() {
    assert_eq!(eval("(2.5)!"), Err(CalcError::Undefined));
    assert_eq!(eval("(-9)!"), Err(CalcError::Undefined));
    assert_eq!(eval("(-1)^0.5"), Err(CalcError::Undefined));
    assert_eq!(eval("tan(PI/2)"), Err(CalcError::Undefined));
    assert_eq!(eval("ln(-1)"), Err(CalcError::Undefined));
}

#[test]
fn bracket_errors() {
    assert_eq!(eval("3+(14-sin(3)"), Err(CalcError::UnbalancedBrackets));
    assert!(eval("3+(14-sin(3))").is_ok());
    assert_eq!(eval(")("), Err(CalcError::UnbalancedBrackets));
    assert_eq!(eval("((1)"), Err(CalcError::UnbalancedBrackets));
}

#[test]
fn irreducible_inputs() {
    assert_eq!(eval("2+frac(3)"), Err(CalcError::NoProgress));
    assert_eq!(eval("sinus(1)+2"), Err(CalcError::NoProgress));
    assert_eq!(eval("5%3"), Err(CalcError::NoProgress));
}

#[test]
fn missing_operands() {
    assert_eq!(eval("5*"), Err(CalcError::MissingOperand));
    assert_eq!(eval("2^3^2"), Err(CalcError::MissingOperand));
}

#[test]
fn sign_chains() {
    let cases = vec![
        ("0--5", 5.0),
        ("3+---+--+++-+--+--+-+++-6", 9.0),
        ("5-(-3)", 8.0),
        ("2-+3", -1.0),
        ("8*-2", -16.0),
    ];
    for (input, expected) in cases {
        compare(input, expected);
    }
}

#[test]
fn infinity_propagation() {
    assert_eq!(eval("Infinity"), Ok(f64::INFINITY));
    assert_eq!(eval("-Infinity"), Ok(f64::NEG_INFINITY));
    assert_eq!(eval("3+Infinity"), Ok(f64::INFINITY));
    assert_eq!(eval("sin(Infinity)"), Err(CalcError::Undefined));
    assert_eq!(eval("ln(Infinity)"), Ok(f64::INFINITY));
}

#[test]
fn finalization_is_idempotent() {
    for input in &["2/3", "6+3*2", "log(7)", "3/5.01393/6"] {
        let first = eval(input).unwrap();
        let second = eval(&first.to_string()).unwrap();
        assert_eq!(first, second, "re-evaluating {:?}", input);
    }
}

#[test]
fn error_codes_are_stable() {
    assert_eq!(CalcError::UnbalancedBrackets.code(), "ERR:BRACKETS");
    assert_eq!(CalcError::Undefined.code(), "ERR:UNDEFINED");
    assert_eq!(CalcError::NoProgress.code(), "ERR:INFINITYLOOP");
    assert_eq!(CalcError::MissingOperand.code(), "ERR:MISSINGOPERAND");
    assert_eq!(
        CalcError::InvalidOperand("NaN".into()).code(),
        "ERR:MISSINGOPERAND"
    );
}
