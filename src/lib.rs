//!# parsegen
//!
//! `parsegen` is the algorithmic core of a classical compiler front-end:
//! it compiles a regular expression in infix notation into a minimized
//! deterministic finite automaton (Thompson construction, subset
//! construction, table-filling minimization), and it compiles a
//! context-free grammar into an LALR(1) ACTION/GOTO table usable by a
//! stack-based shift-reduce driver (LR(1) canonical collection, kernel
//! merging, conflict detection).
//!
//! ## Regex pipeline
//!
//! ```rust
//! use parsegen::regex;
//!
//! let dfa = regex::compile("a(b|c)*").unwrap();
//! assert!(dfa.accepts("a".chars()));
//! assert!(dfa.accepts("abcbc".chars()));
//! assert!(!dfa.accepts("ba".chars()));
//! ```
//!
//! ## Grammar pipeline
//!
//! ```rust
//! use parsegen::grammar::{Grammar, Production, Symbol};
//! use parsegen::lalr;
//! use parsegen::driver::SimpleToken;
//!
//! let s = Symbol::nonterminal("S");
//! let lparen = Symbol::terminal("(");
//! let rparen = Symbol::terminal(")");
//!
//! let grammar = Grammar::new(
//!     vec![s.clone()],
//!     vec![lparen.clone(), rparen.clone()],
//!     s.clone(),
//!     vec![
//!         Production::new(s.clone(), vec![lparen, s.clone(), rparen]),
//!         Production::new(s, vec![]),
//!     ],
//! );
//!
//! let table = lalr::build(&grammar);
//! assert!(table.conflicts().is_empty());
//!
//! let tokens = [
//!     SimpleToken::new("("),
//!     SimpleToken::new("("),
//!     SimpleToken::new(")"),
//!     SimpleToken::new(")"),
//! ];
//! assert!(table.parse(&tokens).is_accepted());
//! ```
//!
//! ## Scope
//!
//! This crate owns the two hard, tightly coupled pipelines above. It
//! does not own a token lexeme/type carrier type (see [`driver::Token`]
//! for the contract it expects), a grammar-text loader beyond the small
//! ambient one in [`parser::grammar`], or any CLI/file-I/O/pretty
//! printing as a product feature — [`table`] and [`parser`] exist only
//! to give the test suite and benchmarks a convenient way to build
//! non-trivial automata and grammars, not as supported on-disk formats.

pub mod dfa;
pub mod driver;
pub mod grammar;
pub mod lalr;
pub mod lr1;
pub mod nfa;
pub mod parser;
pub mod regex;
mod table;

#[cfg(test)]
mod tests;
