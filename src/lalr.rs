//! LALR(1) merger and ACTION/GOTO table fill: groups the LR(1)
//! canonical collection by kernel equivalence, merges lookaheads
//! within each group, and fills the shift/reduce/goto table a
//! [`crate::driver`] can execute against.

use crate::grammar::{Grammar, Production, Symbol};
use crate::lr1::{Item, Lr1Automaton};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::Rc;

/// A kernel is an item stripped of its lookahead — see [`Item::kernel`].
type Kernel = (usize, usize);

#[derive(Debug, Clone)]
struct LalrAutomaton {
    states: Vec<HashSet<Item>>,
    transitions: Vec<HashMap<Symbol, usize>>,
    productions: Vec<Production>,
    initial_state: usize,
}

/// The kernel of an LR(1) state: every item with `dot > 0`, plus the
/// augmented start item if present (dot 0, production 0 is a kernel
/// item by convention even though its dot is at the start).
fn kernel_of(state: &HashSet<Item>) -> BTreeSet<Kernel> {
    state
        .iter()
        .filter(|item| item.is_kernel_item())
        .map(Item::kernel)
        .collect()
}

/// Groups LR(1) states by kernel equivalence and merges each group
/// into one LALR state. Kernel-equivalent sources agree on
/// kernel-equivalent targets under the same symbol, so transitions
/// coalesce for free once states are remapped.
fn merge(lr1: &Lr1Automaton) -> LalrAutomaton {
    let mut groups: HashMap<BTreeSet<Kernel>, Vec<usize>> = HashMap::new();
    for (idx, state) in lr1.states.iter().enumerate() {
        groups.entry(kernel_of(state)).or_default().push(idx);
    }

    // Order groups by the lowest original state index they contain, so
    // the group holding LR(1) state 0 is always assigned id 0 -- this
    // is what "the LALR initial state is the image of LR(1) state 0"
    // requires, and it keeps numbering deterministic run to run.
    let mut kernels: Vec<BTreeSet<Kernel>> = groups.keys().cloned().collect();
    kernels.sort_by_key(|k| *groups[k].iter().min().unwrap());

    let mut old_to_new: HashMap<usize, usize> = HashMap::new();
    for (new_id, kernel) in kernels.iter().enumerate() {
        for &old in &groups[kernel] {
            old_to_new.insert(old, new_id);
        }
    }

    // For each merged state, union the lookaheads attached to each
    // kernel (production, dot) pair across every member of its group.
    let mut merged_lookaheads: Vec<HashMap<Kernel, HashSet<Symbol>>> = vec![HashMap::new(); kernels.len()];
    for (old_idx, state) in lr1.states.iter().enumerate() {
        let new_id = old_to_new[&old_idx];
        for item in state {
            merged_lookaheads[new_id]
                .entry(item.kernel())
                .or_default()
                .insert(item.lookahead.clone());
        }
    }

    let states: Vec<HashSet<Item>> = merged_lookaheads
        .into_iter()
        .map(|by_kernel| {
            by_kernel
                .into_iter()
                .flat_map(|((production, dot), lookaheads)| {
                    lookaheads.into_iter().map(move |lookahead| Item {
                        production,
                        dot,
                        lookahead,
                    })
                })
                .collect()
        })
        .collect();

    let mut transitions: Vec<HashMap<Symbol, usize>> = vec![HashMap::new(); kernels.len()];
    for (old_idx, edges) in lr1.transitions.iter().enumerate() {
        let from = old_to_new[&old_idx];
        for (symbol, &old_target) in edges {
            let to = old_to_new[&old_target];
            transitions[from].insert(symbol.clone(), to);
        }
    }

    LalrAutomaton {
        states,
        transitions,
        productions: lr1.productions.clone(),
        initial_state: old_to_new[&0],
    }
}

/// A single ACTION-table action, or a GOTO-table target (GOTO cells
/// are plain state indices and never conflict, so this enum is only
/// ever stored in the ACTION half of the table).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
    /// Vanishingly rare in practice (would require two distinct
    /// augmented-accept routes into the same cell); kept distinct
    /// from the other two kinds.
    Accept,
}

/// A parse-table cell two distinct actions both wanted. First-wins:
/// `existing` stays in the table, keeping it consultable for
/// inspection without silently resolving the ambiguity.
#[derive(Debug, Clone)]
pub struct Conflict {
    pub state: usize,
    pub symbol: Symbol,
    pub existing: Action,
    pub attempted: Action,
    pub kind: ConflictKind,
}

/// The ACTION/GOTO table produced by [`build`], plus the conflicts
/// recorded while filling it. Keyed by symbol *name* (`Rc<str>`)
/// rather than [`Symbol`] in the action/goto maps: ACTION only ever
/// holds terminals and GOTO only ever holds non-terminals, so there is
/// no risk of a name collision across the two namespaces within a
/// single map, and string lookup lets [`crate::driver`] key off a
/// token's lexeme/type directly.
#[derive(Debug, Clone)]
pub struct LalrTable {
    action: Vec<HashMap<Rc<str>, Action>>,
    goto: Vec<HashMap<Rc<str>, usize>>,
    productions: Vec<Production>,
    initial_state: usize,
    conflicts: Vec<Conflict>,
}

impl LalrTable {
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn initial_state(&self) -> usize {
        self.initial_state
    }

    pub fn state_count(&self) -> usize {
        self.action.len()
    }

    /// Runs the shift-reduce driver against this table.
    pub fn parse<T: crate::driver::Token>(&self, tokens: &[T]) -> crate::driver::ParseOutcome {
        crate::driver::run(&self.action, &self.goto, &self.productions, self.initial_state, tokens)
    }
}

/// Builds the full LR(1) -> LALR(1) -> ACTION/GOTO pipeline for
/// `grammar`. Never fails: conflicts are recorded, not thrown.
pub fn build(grammar: &Grammar) -> LalrTable {
    let lr1 = Lr1Automaton::build(grammar);
    fill_table(merge(&lr1))
}

fn fill_table(lalr: LalrAutomaton) -> LalrTable {
    let n = lalr.states.len();
    let mut action: Vec<HashMap<Rc<str>, Action>> = vec![HashMap::new(); n];
    let mut goto: Vec<HashMap<Rc<str>, usize>> = vec![HashMap::new(); n];
    let mut conflicts = Vec::new();

    for (state, edges) in lalr.transitions.iter().enumerate() {
        for (symbol, &target) in edges {
            if symbol.is_terminal() {
                set_action(&mut action[state], state, symbol, Action::Shift(target), &mut conflicts);
            } else {
                goto[state].insert(symbol.name.clone(), target);
            }
        }
    }

    for (state, items) in lalr.states.iter().enumerate() {
        for item in items {
            let production = &lalr.productions[item.production];
            if item.dot != production.right.len() {
                continue;
            }
            if item.production == 0 && item.lookahead == Symbol::end() {
                set_action(&mut action[state], state, &Symbol::end(), Action::Accept, &mut conflicts);
            } else {
                set_action(
                    &mut action[state],
                    state,
                    &item.lookahead,
                    Action::Reduce(item.production),
                    &mut conflicts,
                );
            }
        }
    }

    LalrTable {
        action,
        goto,
        productions: lalr.productions,
        initial_state: lalr.initial_state,
        conflicts,
    }
}

/// Writes `new_action` into `table[symbol]` unless a *different*
/// action is already there, in which case the existing one is kept
/// and the attempt is recorded as a [`Conflict`].
fn set_action(
    table: &mut HashMap<Rc<str>, Action>,
    state: usize,
    symbol: &Symbol,
    new_action: Action,
    conflicts: &mut Vec<Conflict>,
) {
    match table.get(symbol.name.as_ref()) {
        None => {
            table.insert(symbol.name.clone(), new_action);
        }
        Some(&existing) if existing == new_action => {}
        Some(&existing) => {
            let kind = match (existing, new_action) {
                (Action::Reduce(_), Action::Reduce(_)) => ConflictKind::ReduceReduce,
                (Action::Shift(_), Action::Reduce(_)) | (Action::Reduce(_), Action::Shift(_)) => {
                    ConflictKind::ShiftReduce
                }
                _ => ConflictKind::Accept,
            };
            conflicts.push(Conflict {
                state,
                symbol: symbol.clone(),
                existing,
                attempted: new_action,
                kind,
            });
        }
    }
}
