//! Infix regex preprocessing: explicit-concatenation insertion and
//! shunting-yard conversion to postfix, plus the `compile` convenience
//! that drives the whole regex pipeline down to a minimized [`Dfa`].
//!
//! Supported syntax is intentionally small: `|`, concatenation
//! (implicit), `*`, `+`, `?`, grouping `(...)`, and any other character
//! as an operand literal. No character classes, no escapes, no capture
//! groups.

use crate::dfa::Dfa;
use crate::nfa::{self, Nfa};
use std::collections::BTreeSet;
use thiserror::Error;

/// The operator alphabet. Any character not in this set is an operand.
const OPERATORS: &[char] = &['|', '*', '?', '+', '(', ')', '·'];

/// Explicit concatenation marker inserted between adjacent operand-like
/// tokens, consumed by [`to_postfix`] as an ordinary binary operator.
const CONCAT: char = '·';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegexError {
    #[error("unbalanced parentheses in regex")]
    UnbalancedParens,
    #[error("unknown operator '{0}' in postfix stream")]
    UnknownOperator(char),
    #[error("malformed postfix expression: stack had {0} fragments at the end, expected 1")]
    MalformedPostfix(usize),
}

fn is_operand(c: char) -> bool {
    !OPERATORS.contains(&c)
}

/// Inserts the explicit concatenation marker `·` between every adjacent
/// pair `(x, y)` where `x` is an operand, `)`, `*`, `+` or `?`, and `y`
/// is an operand or `(`.
pub fn insert_concatenation(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(chars.len() * 2);

    let left_ok = |c: char| is_operand(c) || c == ')' || c == '*' || c == '+' || c == '?';
    let right_ok = |c: char| is_operand(c) || c == '(';

    for (i, &c) in chars.iter().enumerate() {
        out.push(c);
        if let Some(&next) = chars.get(i + 1) {
            if left_ok(c) && right_ok(next) {
                out.push(CONCAT);
            }
        }
    }
    out
}

fn precedence(op: char) -> u8 {
    match op {
        '*' | '+' | '?' => 3,
        '·' => 2,
        '|' => 1,
        _ => 0,
    }
}

/// Standard shunting-yard, operating on the output of
/// [`insert_concatenation`] (or any string where `·` already marks
/// concatenation explicitly).
pub fn to_postfix(s: &str) -> Result<String, RegexError> {
    let mut output = String::with_capacity(s.len());
    let mut ops: Vec<char> = Vec::new();

    for c in s.chars() {
        if is_operand(c) {
            output.push(c);
        } else if c == '(' {
            ops.push(c);
        } else if c == ')' {
            loop {
                match ops.pop() {
                    Some('(') => break,
                    Some(op) => output.push(op),
                    None => return Err(RegexError::UnbalancedParens),
                }
            }
        } else {
            while let Some(&top) = ops.last() {
                if top != '(' && precedence(top) >= precedence(c) {
                    output.push(ops.pop().unwrap());
                } else {
                    break;
                }
            }
            ops.push(c);
        }
    }

    while let Some(op) = ops.pop() {
        if op == '(' {
            return Err(RegexError::UnbalancedParens);
        }
        output.push(op);
    }

    Ok(output)
}

/// Compiles a regex all the way down: insert concatenation, convert to
/// postfix, build the Thompson NFA, run subset construction over the
/// alphabet of operand characters appearing in the pattern, and
/// minimize the result.
pub fn compile(pattern: &str) -> Result<Dfa<()>, RegexError> {
    let nfa = to_nfa(pattern)?;
    let alphabet = operand_alphabet(pattern);
    let mut dfa = nfa::to_dfa(&nfa, &alphabet);
    dfa.minimize();
    Ok(dfa)
}

/// Runs the regex preprocessor and Thompson construction (insert
/// concatenation, shunting-yard, then build), stopping short of
/// subset construction.
pub fn to_nfa(pattern: &str) -> Result<Nfa<()>, RegexError> {
    let postfix = to_postfix(&insert_concatenation(pattern))?;
    nfa::thompson_build(&postfix)
}

fn operand_alphabet(pattern: &str) -> Vec<char> {
    let set: BTreeSet<char> = pattern.chars().filter(|&c| is_operand(c)).collect();
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenation_insertion() {
        assert_eq!(insert_concatenation("a(b|c)*"), "a·(b|c)*");
    }

    #[test]
    fn postfix_conversion() {
        // a(b|c)* -> a·(b|c)* -> abc|*·
        assert_eq!(to_postfix(&insert_concatenation("a(b|c)*")).unwrap(), "abc|*·");
    }

    #[test]
    fn unbalanced_parens_reported() {
        assert_eq!(to_postfix("(a|b"), Err(RegexError::UnbalancedParens));
        assert_eq!(to_postfix("a|b)"), Err(RegexError::UnbalancedParens));
    }

    #[test]
    fn postfix_is_deterministic() {
        let p = "a(b|c)*d?e+";
        let a = to_postfix(&insert_concatenation(p)).unwrap();
        let b = to_postfix(&insert_concatenation(p)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn compiled_regex_accepts_expected_strings() {
        let dfa = compile("a(b|c)*").unwrap();
        assert!(dfa.accepts("a".chars()));
        assert!(dfa.accepts("ab".chars()));
        assert!(dfa.accepts("ac".chars()));
        assert!(dfa.accepts("abcbc".chars()));
        assert!(!dfa.accepts("".chars()));
        assert!(!dfa.accepts("b".chars()));
        assert!(!dfa.accepts("ba".chars()));
    }
}
