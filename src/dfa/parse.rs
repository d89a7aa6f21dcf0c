use crate::dfa::{Dfa, DfaState};
use crate::parser::{ParsedDfa, ParsedDfaState};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::ops::Not;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DfaParseError<'a> {
    #[error("Wrong number of transitions for state '{0}': has {1} expected {2}")]
    WrongNumberOfTransitions(&'a str, usize, usize),
    #[error("State '{1}' does not exist (in transition from state '{0}')")]
    TransitionDoesNotExist(&'a str, &'a str),
    #[error("There is no initial state")]
    MissingInitialState,
    #[error("There are two (or more) initial states")]
    MultipleInitialStates,
    #[error("'{0}' appears twice in the alphabet")]
    DuplicateAlphabetSymbol(&'a str),
    #[error("State '{0}' defined multiple times")]
    DuplicateStateDefinition(&'a str),
    #[error("alphabet symbol '{0}' is not a single character")]
    NotASingleCharacter(&'a str),
}

/// Validates a [`ParsedDfa`] and builds a [`Dfa`]. Each resulting state's
/// `name` is a singleton containing its own id — there is no NFA behind
/// a hand-written table, so the usual "name = originating NFA-state set"
/// meaning does not apply here.
pub fn from_parsed(value: ParsedDfa) -> Result<Dfa<()>, DfaParseError> {
    use DfaParseError::*;
    let ParsedDfa { head, states } = value;

    let mut alphabet = Vec::with_capacity(head.len());
    {
        let mut seen = HashSet::new();
        for &symbol in &head {
            if !seen.insert(symbol) {
                return Err(DuplicateAlphabetSymbol(symbol));
            }
            let mut chars = symbol.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => alphabet.push(c),
                _ => return Err(NotASingleCharacter(symbol)),
            }
        }
    }

    let state_name_map: HashMap<_, _> = states.iter().enumerate().map(|(i, s)| (s.name, i)).collect();
    if state_name_map.len() != states.len() {
        let mut seen = HashSet::new();
        let duplicate = states
            .iter()
            .find_map(|s| seen.insert(s.name).not().then_some(s.name))
            .unwrap_or("<unknown>");
        return Err(DuplicateStateDefinition(duplicate));
    }

    let mut initial_state = None;
    let mut new_states = Vec::with_capacity(states.len());

    for (idx, state) in states.into_iter().enumerate() {
        let ParsedDfaState {
            name,
            initial,
            accepting,
            transitions,
        } = state;

        if transitions.len() != head.len() {
            return Err(WrongNumberOfTransitions(name, transitions.len(), head.len()));
        }

        let mut new_transitions = HashMap::with_capacity(head.len());
        for (symbol, target) in alphabet.iter().zip(transitions) {
            // "-" denotes the absence of a transition for that symbol,
            // so partial (e.g. degenerate subset-construction) DFAs
            // can round-trip through the table format.
            if target == "-" {
                continue;
            }
            let Some(&target_idx) = state_name_map.get(target) else {
                return Err(TransitionDoesNotExist(name, target));
            };
            new_transitions.insert(*symbol, target_idx);
        }

        if initial {
            if initial_state.is_none() {
                initial_state = Some(idx);
            } else {
                return Err(MultipleInitialStates);
            }
        }

        new_states.push(DfaState {
            id: idx,
            name: BTreeSet::from([idx]),
            transitions: new_transitions,
            accepting,
            token_type: None,
            priority: usize::MAX,
        });
    }

    let Some(start) = initial_state else {
        return Err(MissingInitialState);
    };

    Ok(Dfa {
        alphabet,
        states: new_states,
        start,
    })
}
