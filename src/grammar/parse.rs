use crate::grammar::{Grammar, Production, Symbol};
use crate::parser::grammar::ParsedGrammar;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrammarParseError<'a> {
    #[error("'{0}' appears twice in the nonterminal list")]
    DuplicateNonterminal(&'a str),
    #[error("'{0}' appears twice in the terminal list")]
    DuplicateTerminal(&'a str),
    #[error("'{0}' is declared as both a nonterminal and a terminal")]
    AmbiguousSymbol(&'a str),
    #[error("start symbol '{0}' is not among the declared nonterminals")]
    UnknownStartSymbol(&'a str),
    #[error("'{0}' on the left of a production is not a declared nonterminal")]
    UnknownProductionLeft(&'a str),
    #[error("'{0}' is used in a production but was not declared as a terminal or nonterminal")]
    UndeclaredSymbol(&'a str),
    #[error("'{0}' is reserved and cannot be declared as a nonterminal or terminal")]
    ReservedSymbolName(&'a str),
}

fn is_reserved(name: &str) -> bool {
    name == "$" || name == "ε"
}

/// Validates a [`ParsedGrammar`] and builds a [`Grammar`]. `ε` as the
/// sole symbol of an alternative denotes an empty production; any other
/// occurrence of `ε` is rejected by [`symbol_of`] since it is a reserved
/// name.
pub fn from_parsed(value: ParsedGrammar) -> Result<Grammar, GrammarParseError> {
    use GrammarParseError::*;
    let ParsedGrammar {
        nonterminals,
        terminals,
        start,
        productions,
    } = value;

    let mut nonterminal_names = HashSet::new();
    for &name in &nonterminals {
        if is_reserved(name) {
            return Err(ReservedSymbolName(name));
        }
        if !nonterminal_names.insert(name) {
            return Err(DuplicateNonterminal(name));
        }
    }

    let mut terminal_names = HashSet::new();
    for &name in &terminals {
        if is_reserved(name) {
            return Err(ReservedSymbolName(name));
        }
        if !terminal_names.insert(name) {
            return Err(DuplicateTerminal(name));
        }
        if nonterminal_names.contains(name) {
            return Err(AmbiguousSymbol(name));
        }
    }

    if !nonterminal_names.contains(start) {
        return Err(UnknownStartSymbol(start));
    }

    let symbol_of = |name: &'_ str| -> Result<Symbol, GrammarParseError> {
        if nonterminal_names.contains(name) {
            Ok(Symbol::nonterminal(name))
        } else if terminal_names.contains(name) {
            Ok(Symbol::terminal(name))
        } else {
            Err(UndeclaredSymbol(name))
        }
    };

    let mut built_productions = Vec::new();
    for production in &productions {
        if !nonterminal_names.contains(production.left) {
            return Err(UnknownProductionLeft(production.left));
        }
        let left = Symbol::nonterminal(production.left);
        for alternative in &production.alternatives {
            let right = if alternative.len() == 1 && alternative[0] == "ε" {
                Vec::new()
            } else {
                alternative
                    .iter()
                    .map(|name| symbol_of(name))
                    .collect::<Result<Vec<_>, _>>()?
            };
            built_productions.push(Production::new(left.clone(), right));
        }
    }

    let nonterminals = nonterminals.iter().map(|&n| Symbol::nonterminal(n)).collect();
    let terminals = terminals.iter().map(|&n| Symbol::terminal(n)).collect();
    let start = Symbol::nonterminal(start);

    Ok(Grammar::new(nonterminals, terminals, start, built_productions))
}
