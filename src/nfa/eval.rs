//! ε-closure and `move`, plus a small stepwise evaluator built on top of
//! them. Grounded in the same worklist shape used throughout this
//! pipeline: closure is a fixed point over a worklist of newly
//! discovered states, not a recursive walk.

use super::Nfa;
use std::collections::BTreeSet;

/// Smallest set containing `states` and closed under ε-transitions.
pub fn epsilon_closure<T>(nfa: &Nfa<T>, states: &BTreeSet<usize>) -> BTreeSet<usize> {
    let mut result = states.clone();
    let mut worklist: Vec<usize> = states.iter().copied().collect();
    while let Some(state) = worklist.pop() {
        for t in &nfa.states[state].transitions {
            if t.symbol.is_none() && result.insert(t.target) {
                worklist.push(t.target);
            }
        }
    }
    result
}

/// States reachable from any member of `states` via a transition
/// labelled exactly `symbol` (never ε).
pub fn mov<T>(nfa: &Nfa<T>, states: &BTreeSet<usize>, symbol: char) -> BTreeSet<usize> {
    let mut result = BTreeSet::new();
    for &state in states {
        for t in &nfa.states[state].transitions {
            if t.symbol == Some(symbol) {
                result.insert(t.target);
            }
        }
    }
    result
}

#[derive(Clone)]
pub struct NfaEvaluator<'a, T> {
    nfa: &'a Nfa<T>,
    current: BTreeSet<usize>,
}

impl<'a, T> NfaEvaluator<'a, T> {
    pub fn new(nfa: &'a Nfa<T>) -> Self {
        let start = BTreeSet::from([nfa.start]);
        Self {
            nfa,
            current: epsilon_closure(nfa, &start),
        }
    }

    pub fn step(&mut self, symbol: char) {
        let moved = mov(self.nfa, &self.current, symbol);
        self.current = epsilon_closure(self.nfa, &moved);
    }

    pub fn is_accepting(&self) -> bool {
        self.current.iter().any(|&s| self.nfa.states[s].accepting)
    }

    pub fn current_states(&self) -> Vec<&super::NfaState<T>> {
        self.current.iter().map(|&s| &self.nfa.states[s]).collect()
    }

    pub fn current_state_set(&self) -> &BTreeSet<usize> {
        &self.current
    }
}
