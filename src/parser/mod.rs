//! Ambient text formats used by tests and benchmarks to build
//! non-trivial DFAs and grammars without hand-writing Rust literals.
//! Neither format is a supported on-disk artifact of the core
//! pipelines; both are a convenience for fixtures only.
//!
//! ## DFA table format
//!
//! A whitespace-separated transition table: one header line listing
//! the alphabet (each symbol exactly one character), then one line per
//! state with, in order: optional `->`/`→` marking the initial state,
//! optional `*` marking an accepting state, the state name, then one
//! target state name per alphabet symbol. `#` starts a line comment.
//!
//! ```text
//!        a  b  c
//! → * s0 s1 s0 s2
//!     s1 s2 s1 s1
//!   * s2 s2 s2 s2
//! ```
//!
//! ## Grammar format
//!
//! ```text
//! Nonterminals: S A B
//! Terminals: a b
//! Start: S
//! S -> a A | a B
//! A -> b
//! B -> b
//! ```

mod fa;
pub mod grammar;

use crate::dfa::Dfa;
use crate::grammar::Grammar;
use grammar::ParsedGrammar;
use nom::{combinator::all_consuming, error::Error, Finish};

#[derive(Debug)]
pub struct ParsedDfa<'a> {
    pub head: Vec<&'a str>,
    pub states: Vec<ParsedDfaState<'a>>,
}

#[derive(Debug)]
pub struct ParsedDfaState<'a> {
    pub name: &'a str,
    pub initial: bool,
    pub accepting: bool,
    pub transitions: Vec<&'a str>,
}

/// Parses a DFA table. The whole string must be parsable. The result
/// is not guaranteed to describe a valid DFA (duplicate states,
/// dangling transitions, a missing initial state); use
/// [`TryInto::try_into`] to validate and build a [`Dfa`].
pub fn dfa(input: &str) -> Result<ParsedDfa, Error<&str>> {
    all_consuming(fa::full_dfa)(input).finish().map(|(_, d)| d)
}

pub use crate::dfa::parse::DfaParseError;

impl<'a> TryFrom<ParsedDfa<'a>> for Dfa<()> {
    type Error = DfaParseError<'a>;

    fn try_from(value: ParsedDfa<'a>) -> Result<Self, Self::Error> {
        crate::dfa::parse::from_parsed(value)
    }
}

/// Parses a grammar. The whole string must be parsable; see
/// [`TryInto::try_into`] to validate and build a [`Grammar`].
pub fn grammar(input: &str) -> Result<ParsedGrammar, Error<&str>> {
    all_consuming(grammar::full_grammar)(input).finish().map(|(_, g)| g)
}

pub use crate::grammar::parse::GrammarParseError;

impl<'a> TryFrom<ParsedGrammar<'a>> for Grammar {
    type Error = GrammarParseError<'a>;

    fn try_from(value: ParsedGrammar<'a>) -> Result<Self, Self::Error> {
        crate::grammar::parse::from_parsed(value)
    }
}
