use super::{Dfa, DfaState};

/// Stepwise evaluator, for callers that want to inspect intermediate
/// state rather than get a single `accepts` bool back.
#[derive(Clone)]
pub struct DfaEvaluator<'a, T> {
    dfa: &'a Dfa<T>,
    current: Option<usize>,
}

impl<'a, T> DfaEvaluator<'a, T> {
    pub fn new(dfa: &'a Dfa<T>) -> Self {
        Self {
            dfa,
            current: Some(dfa.start),
        }
    }

    pub fn is_accepting(&self) -> bool {
        self.current_state().is_some_and(DfaState::is_accepting)
    }

    pub fn current_state(&self) -> Option<&'a DfaState<T>> {
        self.current.map(|id| &self.dfa.states[id])
    }

    /// Advances by one symbol. Returns `None` (and freezes the
    /// evaluator in a dead state) if there is no transition for
    /// `symbol` from the current state.
    pub fn step(&mut self, symbol: char) -> Option<&'a DfaState<T>> {
        let id = self.current?;
        match self.dfa.states[id].transitions.get(&symbol) {
            Some(&next) => {
                self.current = Some(next);
                Some(&self.dfa.states[next])
            }
            None => {
                self.current = None;
                None
            }
        }
    }
}

impl<T> DfaState<T> {
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }
}
