//! Recognition of the reducible syntactic forms inside the expression
//! buffer. Every finder is a pure function returning the leftmost match of
//! its category as a byte span plus owned capture text, so the caller can
//! splice the buffer without holding borrows into it.

use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;

/// An unsigned decimal literal: `5`, `5.`, `5.25` or `.25`.
const NUMBER: &str = r"(?:[0-9]+\.?[0-9]*|\.[0-9]+)";

/// Function names, longest first so that e.g. `sinh` is never cut down to
/// `sin`. `root` is listed with them for the debracketing guards only; it
/// has its own two-bracket form.
const FUNCTION_NAMES: [&str; 10] = [
    "cotan", "cosh", "sinh", "tanh", "log", "ln", "sin", "cos", "tan", "root",
];

lazy_static! {
    static ref FUNCTION: Regex = Regex::new(&format!(
        r"(cotan|cosh|sinh|tanh|log|ln|sin|cos|tan)\(([+-]?(?:{n}|Infinity))\)",
        n = NUMBER
    ))
    .unwrap();
    static ref ROOT: Regex = Regex::new(&format!(
        r"\(([+-]?{n})\)root\(([+-]?{n})\)",
        n = NUMBER
    ))
    .unwrap();
    static ref FACTORIAL: Regex = Regex::new(&format!(
        r"\(([+-]?(?:{n}|Infinity))\)!",
        n = NUMBER
    ))
    .unwrap();
    static ref POWER: Regex = Regex::new(&format!(
        r"\(([+-]?(?:{n}|Infinity))\)\^([+-]?(?:{n}|Infinity))",
        n = NUMBER
    ))
    .unwrap();
    static ref GROUP: Regex =
        Regex::new(r"\((?:Infinity|[0-9.!^*/+-])+\)").unwrap();
    static ref CONSTANT: Regex = Regex::new(&format!(
        r"\(([+-]?(?:{n}|Infinity))\)",
        n = NUMBER
    ))
    .unwrap();
    static ref CONSTANT_BODY: Regex = Regex::new(&format!(
        r"^[+-]?(?:{n}|Infinity)$",
        n = NUMBER
    ))
    .unwrap();
    static ref SCIENTIFIC: Regex = Regex::new(r"e[+-][0-9]+").unwrap();
    static ref IMPLICIT_LEFT: Regex =
        Regex::new(r"([0-9)!])([sctl(])").unwrap();
    static ref IMPLICIT_RIGHT: Regex =
        Regex::new(r"([)!])([0-9sctl(])").unwrap();
    static ref SIMPLE: Regex =
        Regex::new(r"^(?:Infinity|[0-9.!^*/+-])*$").unwrap();
}

#[derive(Debug, PartialEq)]
pub struct FunctionCall {
    pub range: Range<usize>,
    pub name: String,
    pub argument: String,
}

#[derive(Debug, PartialEq)]
pub struct RootCall {
    pub range: Range<usize>,
    pub degree: String,
    pub radicand: String,
}

#[derive(Debug, PartialEq)]
pub struct UnaryMatch {
    pub range: Range<usize>,
    pub operand: String,
}

#[derive(Debug, PartialEq)]
pub struct PowerMatch {
    pub range: Range<usize>,
    pub base: String,
    pub exponent: String,
}

/// Leftmost function call whose argument is already a plain literal.
pub fn function_call(buffer: &str) -> Option<FunctionCall> {
    FUNCTION.captures(buffer).map(|caps| {
        let whole = caps.get(0).expect("capture 0 always present");
        FunctionCall {
            range: whole.start()..whole.end(),
            name: caps[1].to_string(),
            argument: caps[2].to_string(),
        }
    })
}

/// Leftmost `(n)root(x)` with literal degree and radicand.
pub fn root_call(buffer: &str) -> Option<RootCall> {
    ROOT.captures(buffer).map(|caps| {
        let whole = caps.get(0).expect("capture 0 always present");
        RootCall {
            range: whole.start()..whole.end(),
            degree: caps[1].to_string(),
            radicand: caps[2].to_string(),
        }
    })
}

/// Leftmost `(x)!` with literal content.
pub fn bracket_factorial(buffer: &str) -> Option<UnaryMatch> {
    FACTORIAL.captures(buffer).map(|caps| {
        let whole = caps.get(0).expect("capture 0 always present");
        UnaryMatch {
            range: whole.start()..whole.end(),
            operand: caps[1].to_string(),
        }
    })
}

/// Leftmost `(x)^y` with literal base and exponent.
pub fn bracket_power(buffer: &str) -> Option<PowerMatch> {
    POWER.captures(buffer).map(|caps| {
        let whole = caps.get(0).expect("capture 0 always present");
        PowerMatch {
            range: whole.start()..whole.end(),
            base: caps[1].to_string(),
            exponent: caps[2].to_string(),
        }
    })
}

/// Leftmost innermost bracketed group that still needs arithmetic, i.e.
/// whose content is operator-bearing rather than a lone signed constant.
/// The content class excludes parentheses, which is what guarantees the
/// match is innermost.
pub fn simple_group(buffer: &str) -> Option<UnaryMatch> {
    for found in GROUP.find_iter(buffer) {
        let body = &buffer[found.start() + 1..found.end() - 1];
        if !CONSTANT_BODY.is_match(body) {
            return Some(UnaryMatch {
                range: found.start()..found.end(),
                operand: body.to_string(),
            });
        }
    }
    None
}

/// Leftmost redundantly bracketed constant, `(x)` holding a lone signed
/// number. Skipped when the brackets are semantically load-bearing: as a
/// function or root argument, or followed by `!`, `^` or `root`, which all
/// consume the bracketed form.
pub fn bare_constant(buffer: &str) -> Option<UnaryMatch> {
    for caps in CONSTANT.captures_iter(buffer) {
        let whole = caps.get(0).expect("capture 0 always present");
        let before = &buffer[..whole.start()];
        let after = &buffer[whole.end()..];
        if FUNCTION_NAMES.iter().any(|name| before.ends_with(name)) {
            continue;
        }
        if after.starts_with('!')
            || after.starts_with('^')
            || after.starts_with("root")
        {
            continue;
        }
        return Some(UnaryMatch {
            range: whole.start()..whole.end(),
            operand: caps[1].to_string(),
        });
    }
    None
}

/// Leftmost scientific-notation suffix `e±digits`.
pub fn scientific(buffer: &str) -> Option<Range<usize>> {
    SCIENTIFIC.find(buffer).map(|m| m.start()..m.end())
}

/// One round of implicit-multiplication insertion. Covers a digit, closing
/// bracket or factorial butting against a function name or opening bracket,
/// and a closing bracket or factorial butting against a digit.
pub fn insert_multiplication(buffer: &str) -> String {
    let first = IMPLICIT_LEFT.replace_all(buffer, "${1}*${2}");
    IMPLICIT_RIGHT.replace_all(&first, "${1}*${2}").into_owned()
}

/// True when the buffer is a fully reducible simple expression: numeric
/// literals, `Infinity` and the operators `+ - * / ^ !` only.
pub fn is_simple(buffer: &str) -> bool {
    SIMPLE.is_match(buffer)
}
