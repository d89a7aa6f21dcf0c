//! LR(1) canonical collection: grammar augmentation, FIRST sets,
//! CLOSURE, GOTO, and the worklist build of the canonical collection.
//!
//! States are addressed by index into [`Lr1Automaton::states`], the
//! same "arena of states, edges store indices" shape used by
//! [`crate::nfa`] and [`crate::dfa`]; an [`Lr1State`] is a `HashSet` of
//! [`Item`]s rather than a `Vec`, since state identity here is
//! structural equality of the item *set*, and `HashSet`'s `PartialEq`
//! already implements "same elements regardless of order" for us.

use crate::grammar::{Grammar, Production, Symbol};
use std::collections::{HashMap, HashSet, VecDeque};

pub type Lr1State = HashSet<Item>;

/// A triple (production, dot position, lookahead terminal). `production`
/// is an index into [`Lr1Automaton::productions`] rather than a cloned
/// [`Production`]; productions are compared by identity there, which
/// sidesteps any collision between the synthetic augmented-start name
/// and a real grammar symbol entirely — the augmented production is
/// always index 0, checked by identity, never by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Item {
    pub production: usize,
    pub dot: usize,
    pub lookahead: Symbol,
}

impl Item {
    /// The (production, dot) pair, with lookahead stripped — the key
    /// LALR merging groups LR(1) states by.
    pub fn kernel(&self) -> (usize, usize) {
        (self.production, self.dot)
    }

    /// `dot == 0`: an item freshly introduced by CLOSURE, not yet
    /// shifted into. By convention the augmented start item (dot 0,
    /// production 0) is treated as a kernel item, not a starter.
    pub fn is_starter(&self) -> bool {
        self.dot == 0 && self.production != 0
    }

    pub fn is_kernel_item(&self) -> bool {
        !self.is_starter()
    }
}

#[derive(Debug, Clone)]
pub struct Lr1Automaton {
    pub states: Vec<Lr1State>,
    /// `transitions[i]` maps a grammar symbol to the destination state
    /// index reached by `GOTO(states[i], symbol)`.
    pub transitions: Vec<HashMap<Symbol, usize>>,
    /// The augmented grammar's productions. Index 0 is always the
    /// synthetic `S' -> S` production introduced by augmentation.
    pub productions: Vec<Production>,
}

impl Lr1Automaton {
    /// Builds the canonical LR(1) collection for `grammar`.
    pub fn build(grammar: &Grammar) -> Self {
        let productions = augment(grammar);
        let first = first_sets(grammar, &productions);
        let symbols = goto_symbols(grammar);

        let start_item = Item {
            production: 0,
            dot: 0,
            lookahead: Symbol::end(),
        };
        let start_state = closure(&productions, &first, HashSet::from([start_item]));

        let mut states = vec![start_state];
        let mut transitions = vec![HashMap::new()];
        let mut worklist: VecDeque<usize> = VecDeque::from([0]);

        while let Some(from) = worklist.pop_front() {
            // Clone out so `closure`/`goto` below can still borrow
            // `states` immutably for the equality scan.
            let items = states[from].clone();
            for x in &symbols {
                let target = goto(&productions, &first, &items, x);
                if target.is_empty() {
                    continue;
                }
                let to = match states.iter().position(|s| s == &target) {
                    Some(existing) => existing,
                    None => {
                        states.push(target);
                        transitions.push(HashMap::new());
                        let new_idx = states.len() - 1;
                        worklist.push_back(new_idx);
                        new_idx
                    }
                };
                transitions[from].insert(x.clone(), to);
            }
        }

        Lr1Automaton {
            states,
            transitions,
            productions,
        }
    }
}

/// Introduces a fresh start non-terminal `S'` and the production
/// `S' -> S`, prepended so it always lives at index 0.
fn augment(grammar: &Grammar) -> Vec<Production> {
    let augmented_start = Symbol::nonterminal(&format!("{}'", grammar.start.name));
    let mut productions = Vec::with_capacity(grammar.productions.len() + 1);
    productions.push(Production::new(augmented_start, vec![grammar.start.clone()]));
    productions.extend(grammar.productions.iter().cloned());
    productions
}

/// The grammar symbols GOTO is computed over: every terminal and
/// non-terminal in declaration order. Neither `$` nor the augmented
/// start symbol ever appears after a dot, so both are correctly
/// excluded.
fn goto_symbols(grammar: &Grammar) -> Vec<Symbol> {
    grammar
        .terminals
        .iter()
        .chain(grammar.nonterminals.iter())
        .cloned()
        .collect()
}

/// FIRST sets over every symbol mentioned by `productions`. Terminals
/// and `$` map to singletons of themselves; non-terminal entries are
/// grown to a fixed point. [`Symbol::epsilon`] is used as the in-band
/// nullability marker for sequences that can derive the empty string.
fn first_sets(grammar: &Grammar, productions: &[Production]) -> HashMap<Symbol, HashSet<Symbol>> {
    let mut first: HashMap<Symbol, HashSet<Symbol>> = HashMap::new();
    for t in &grammar.terminals {
        first.insert(t.clone(), HashSet::from([t.clone()]));
    }
    first.insert(Symbol::end(), HashSet::from([Symbol::end()]));
    for nt in grammar.nonterminals.iter().chain(productions.iter().map(|p| &p.left)) {
        first.entry(nt.clone()).or_default();
    }

    loop {
        let mut changed = false;
        for p in productions {
            let rhs_first = first_of_sequence(&first, &p.right);
            let entry = first.entry(p.left.clone()).or_default();
            for s in rhs_first {
                changed |= entry.insert(s);
            }
        }
        if !changed {
            break;
        }
    }

    first
}

fn first_of_symbol(first: &HashMap<Symbol, HashSet<Symbol>>, symbol: &Symbol) -> HashSet<Symbol> {
    if symbol.is_terminal() {
        HashSet::from([symbol.clone()])
    } else {
        first.get(symbol).cloned().unwrap_or_default()
    }
}

/// FIRST of a sequence of symbols: accumulate non-ε members of
/// FIRST(Xi) until one lacks ε; if every element is nullable
/// (including the empty sequence), the result contains ε.
fn first_of_sequence(first: &HashMap<Symbol, HashSet<Symbol>>, symbols: &[Symbol]) -> HashSet<Symbol> {
    let mut result = HashSet::new();
    let mut nullable = true;
    for symbol in symbols {
        let symbol_first = first_of_symbol(first, symbol);
        result.extend(symbol_first.iter().filter(|s| **s != Symbol::epsilon()).cloned());
        if !symbol_first.contains(&Symbol::epsilon()) {
            nullable = false;
            break;
        }
    }
    if nullable {
        result.insert(Symbol::epsilon());
    }
    result
}

/// CLOSURE(I): worklist fixed point. For every item with the dot
/// before a non-terminal `B`, add `[B -> ·γ, b]` for every production
/// `B -> γ` and every `b` in FIRST(βa), where `β` is what follows `B`
/// in the originating item and `a` its lookahead.
pub fn closure(productions: &[Production], first: &HashMap<Symbol, HashSet<Symbol>>, items: Lr1State) -> Lr1State {
    let mut result = items;
    let mut worklist: Vec<Item> = result.iter().cloned().collect();

    while let Some(item) = worklist.pop() {
        let production = &productions[item.production];
        let Some(after_dot) = production.right.get(item.dot) else {
            continue;
        };
        if !after_dot.is_nonterminal() {
            continue;
        }

        let mut beta_a: Vec<Symbol> = production.right[item.dot + 1..].to_vec();
        beta_a.push(item.lookahead.clone());
        let lookaheads = first_of_sequence(first, &beta_a);

        for (idx, candidate) in productions.iter().enumerate() {
            if &candidate.left != after_dot {
                continue;
            }
            for lookahead in &lookaheads {
                let new_item = Item {
                    production: idx,
                    dot: 0,
                    lookahead: lookahead.clone(),
                };
                if result.insert(new_item.clone()) {
                    worklist.push(new_item);
                }
            }
        }
    }

    result
}

/// GOTO(I, X): shift the dot past `x` in every item of `I` that
/// has it there, then close the result.
pub fn goto(
    productions: &[Production],
    first: &HashMap<Symbol, HashSet<Symbol>>,
    items: &Lr1State,
    x: &Symbol,
) -> Lr1State {
    let shifted: Lr1State = items
        .iter()
        .filter(|item| productions[item.production].right.get(item.dot) == Some(x))
        .map(|item| Item {
            production: item.production,
            dot: item.dot + 1,
            lookahead: item.lookahead.clone(),
        })
        .collect();
    closure(productions, first, shifted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

    fn paren_grammar() -> Grammar {
        let s = Symbol::nonterminal("S");
        let lparen = Symbol::terminal("(");
        let rparen = Symbol::terminal(")");
        Grammar::new(
            vec![s.clone()],
            vec![lparen.clone(), rparen.clone()],
            s.clone(),
            vec![
                Production::new(s.clone(), vec![lparen, s.clone(), rparen]),
                Production::new(s, vec![]),
            ],
        )
    }

    #[test]
    fn closure_is_idempotent() {
        let grammar = paren_grammar();
        let productions = augment(&grammar);
        let first = first_sets(&grammar, &productions);
        let start = HashSet::from([Item {
            production: 0,
            dot: 0,
            lookahead: Symbol::end(),
        }]);
        let once = closure(&productions, &first, start.clone());
        let twice = closure(&productions, &first, once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn goto_kernel_depends_only_on_source_kernel_and_symbol() {
        let grammar = paren_grammar();
        let automaton = Lr1Automaton::build(&grammar);
        // GOTO(I0, '(') must exist and contain a starter for every
        // S-production again (the grammar is recursive under '(').
        let lparen = Symbol::terminal("(");
        let target = automaton.transitions[0][&lparen];
        assert!(automaton.states[target]
            .iter()
            .any(|item| item.production == 1 && item.dot == 0));
    }

    #[test]
    fn canonical_collection_has_distinct_states_reachable_by_recursion() {
        // S -> C C ; C -> c C | d. The recursive `c C` alternative
        // means GOTO(I, c) on several different states reproduces the
        // same item set (a self-loop); LR(1) state identity must
        // still dedupe these by set equality rather than by the path
        // taken to reach them. LALR merging of the two differently-
        // followed copies of "C -> d·"/"C -> c C·" is exercised in
        // `crate::lalr`.
        let s = Symbol::nonterminal("S");
        let c = Symbol::nonterminal("C");
        let ct = Symbol::terminal("c");
        let dt = Symbol::terminal("d");
        let grammar = Grammar::new(
            vec![s.clone(), c.clone()],
            vec![ct.clone(), dt.clone()],
            s.clone(),
            vec![
                Production::new(s, vec![c.clone(), c.clone()]),
                Production::new(c.clone(), vec![ct, c.clone()]),
                Production::new(c, vec![dt]),
            ],
        );
        let automaton = Lr1Automaton::build(&grammar);
        assert_eq!(automaton.states.len(), 10);
    }
}
