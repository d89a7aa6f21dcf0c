//! Non-deterministic finite automata, built by Thompson construction
//! from a postfix regex stream (see [`crate::regex`]).
//!
//! States live in an arena (`Vec<NfaState<T>>`) addressed by integer
//! id; transitions store destination ids rather than owning references,
//! so the back-edges introduced by `*`/`+` never form an ownership
//! cycle.

pub mod eval;

use crate::regex::RegexError;
use eval::NfaEvaluator;

/// An outgoing edge. `symbol == None` means an ε-transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub symbol: Option<char>,
    pub target: usize,
}

#[derive(Debug, Clone)]
pub struct NfaState<T> {
    pub id: usize,
    pub transitions: Vec<Transition>,
    pub accepting: bool,
    /// Set when this state is the accepting end of a tagged pattern
    /// fed into [`union`] to build a multi-token lexer NFA.
    pub token_type: Option<T>,
    /// Lower wins on ties at accepting states; defaults to the
    /// maximum representable value.
    pub priority: usize,
}

#[derive(Debug, Clone)]
pub struct Nfa<T = ()> {
    pub states: Vec<NfaState<T>>,
    pub start: usize,
}

#[derive(Clone, Copy)]
struct Fragment {
    start: usize,
    end: usize,
}

fn new_state<T>(states: &mut Vec<NfaState<T>>) -> usize {
    let id = states.len();
    states.push(NfaState {
        id,
        transitions: Vec::new(),
        accepting: false,
        token_type: None,
        priority: usize::MAX,
    });
    id
}

fn add_eps<T>(states: &mut [NfaState<T>], from: usize, to: usize) {
    states[from].transitions.push(Transition {
        symbol: None,
        target: to,
    });
}

fn add_sym<T>(states: &mut [NfaState<T>], from: usize, symbol: char, to: usize) {
    states[from].transitions.push(Transition {
        symbol: Some(symbol),
        target: to,
    });
}

/// Thompson construction: consumes a postfix regex stream left to
/// right over a stack of fragments. The single resulting fragment's end
/// state becomes the accepting state of the returned NFA.
pub fn thompson_build(postfix: &str) -> Result<Nfa<()>, RegexError> {
    let mut states: Vec<NfaState<()>> = Vec::new();
    let mut stack: Vec<Fragment> = Vec::new();

    for c in postfix.chars() {
        match c {
            '·' => {
                let b = stack.pop().ok_or(RegexError::MalformedPostfix(stack.len()))?;
                let a = stack
                    .pop()
                    .ok_or(RegexError::MalformedPostfix(stack.len() + 1))?;
                add_eps(&mut states, a.end, b.start);
                stack.push(Fragment {
                    start: a.start,
                    end: b.end,
                });
            }
            '|' => {
                let b = stack.pop().ok_or(RegexError::MalformedPostfix(stack.len()))?;
                let a = stack
                    .pop()
                    .ok_or(RegexError::MalformedPostfix(stack.len() + 1))?;
                let s = new_state(&mut states);
                let e = new_state(&mut states);
                add_eps(&mut states, s, a.start);
                add_eps(&mut states, s, b.start);
                add_eps(&mut states, a.end, e);
                add_eps(&mut states, b.end, e);
                stack.push(Fragment { start: s, end: e });
            }
            '*' => {
                let a = stack.pop().ok_or(RegexError::MalformedPostfix(stack.len()))?;
                let s = new_state(&mut states);
                let e = new_state(&mut states);
                add_eps(&mut states, s, a.start);
                add_eps(&mut states, s, e);
                add_eps(&mut states, a.end, a.start);
                add_eps(&mut states, a.end, e);
                stack.push(Fragment { start: s, end: e });
            }
            '+' => {
                let a = stack.pop().ok_or(RegexError::MalformedPostfix(stack.len()))?;
                let s = new_state(&mut states);
                let e = new_state(&mut states);
                add_eps(&mut states, s, a.start);
                add_eps(&mut states, a.end, a.start);
                add_eps(&mut states, a.end, e);
                stack.push(Fragment { start: s, end: e });
            }
            '?' => {
                let a = stack.pop().ok_or(RegexError::MalformedPostfix(stack.len()))?;
                let s = new_state(&mut states);
                let e = new_state(&mut states);
                add_eps(&mut states, s, a.start);
                add_eps(&mut states, s, e);
                add_eps(&mut states, a.end, e);
                stack.push(Fragment { start: s, end: e });
            }
            c if is_regex_operator(c) => return Err(RegexError::UnknownOperator(c)),
            c => {
                let s = new_state(&mut states);
                let e = new_state(&mut states);
                add_sym(&mut states, s, c, e);
                stack.push(Fragment { start: s, end: e });
            }
        }
    }

    if stack.len() != 1 {
        return Err(RegexError::MalformedPostfix(stack.len()));
    }

    let frag = stack.pop().unwrap();
    states[frag.end].accepting = true;

    Ok(Nfa {
        states,
        start: frag.start,
    })
}

fn is_regex_operator(c: char) -> bool {
    matches!(c, '(' | ')')
}

impl<T> Nfa<T> {
    /// Tags every currently-accepting state with `token_type` and
    /// `priority`, in preparation for [`union`]. Intended to be called
    /// once per single-pattern NFA built by [`thompson_build`].
    pub fn with_token(mut self, token_type: T, priority: usize) -> Self
    where
        T: Clone,
    {
        for state in self.states.iter_mut().filter(|s| s.accepting) {
            state.token_type = Some(token_type.clone());
            state.priority = priority;
        }
        self
    }

    pub fn evaluator(&self) -> NfaEvaluator<'_, T> {
        NfaEvaluator::new(self)
    }

    pub fn accepts(&self, input: impl IntoIterator<Item = char>) -> bool {
        let mut eval = self.evaluator();
        for c in input {
            eval.step(c);
        }
        eval.is_accepting()
    }
}

/// Merges several already-built NFAs into one with a fresh start state
/// carrying ε-edges to each input NFA's start. The result has no single
/// end state; its accepting states are the individual input NFAs' ends,
/// each retaining whatever token type/priority was attached via
/// [`Nfa::with_token`]. This is the entry point for building a
/// multi-token lexer NFA.
pub fn union<T>(nfas: Vec<Nfa<T>>) -> Nfa<T> {
    let mut states: Vec<NfaState<T>> = vec![NfaState {
        id: 0,
        transitions: Vec::new(),
        accepting: false,
        token_type: None,
        priority: usize::MAX,
    }];

    let mut sub_starts = Vec::with_capacity(nfas.len());
    for nfa in nfas {
        let offset = states.len();
        for mut state in nfa.states {
            state.id += offset;
            for t in state.transitions.iter_mut() {
                t.target += offset;
            }
            states.push(state);
        }
        sub_starts.push(nfa.start + offset);
    }

    for target in sub_starts {
        add_eps(&mut states, 0, target);
    }

    Nfa { states, start: 0 }
}

/// Subset construction: NFA → DFA via ε-closure + move. Lives here
/// rather than in [`crate::dfa`] only to keep the NFA-side traversal
/// helpers ([`eval::epsilon_closure`], [`eval::mov`]) colocated with
/// their consumer; the returned type belongs to the DFA pipeline stage.
pub fn to_dfa<T>(nfa: &Nfa<T>, alphabet: &[char]) -> crate::dfa::Dfa<T>
where
    T: Clone,
{
    crate::dfa::from_nfa(nfa, alphabet)
}
