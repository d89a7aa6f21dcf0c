//! Deterministic finite automata, produced from an [`Nfa`](crate::nfa::Nfa)
//! by subset construction ([`from_nfa`]) and shrunk by table-filling
//! minimization ([`Dfa::minimize`]).

pub mod eval;
pub mod parse;

use crate::nfa::eval::{epsilon_closure, mov};
use crate::nfa::Nfa;
use eval::DfaEvaluator;
use std::collections::{BTreeSet, HashMap, VecDeque};

#[derive(Debug, Clone)]
pub struct DfaState<T> {
    pub id: usize,
    /// The set of NFA states this DFA state was built from; two DFA
    /// states produced by subset construction are equal iff this set
    /// is equal.
    pub name: BTreeSet<usize>,
    pub transitions: HashMap<char, usize>,
    pub accepting: bool,
    pub token_type: Option<T>,
    /// Carried from the winning accepting NFA state (min priority,
    /// then lowest id); used to break token-type ties again when
    /// states are later merged during minimization.
    pub priority: usize,
}

#[derive(Debug, Clone)]
pub struct Dfa<T = ()> {
    pub states: Vec<DfaState<T>>,
    pub start: usize,
    pub alphabet: Vec<char>,
}

fn build_state<T: Clone>(id: usize, name: BTreeSet<usize>, nfa: &Nfa<T>) -> DfaState<T> {
    let accepting = name.iter().any(|&s| nfa.states[s].accepting);

    let mut best: Option<(usize, usize)> = None;
    let mut token_type = None;
    for &s in &name {
        let state = &nfa.states[s];
        if !state.accepting {
            continue;
        }
        let key = (state.priority, state.id);
        if best.map_or(true, |b| key < b) {
            best = Some(key);
            token_type = state.token_type.clone();
        }
    }

    DfaState {
        id,
        name,
        transitions: HashMap::new(),
        accepting,
        token_type,
        priority: best.map(|(p, _)| p).unwrap_or(usize::MAX),
    }
}

/// Subset construction. `alphabet` is the explicit input alphabet;
/// symbols never seen on an NFA transition simply produce no outgoing
/// edge for that symbol (a degenerate, non-accepting start state if the
/// alphabet is empty or matches nothing — not an error).
pub fn from_nfa<T: Clone>(nfa: &Nfa<T>, alphabet: &[char]) -> Dfa<T> {
    let start_name = epsilon_closure(nfa, &BTreeSet::from([nfa.start]));

    let mut states = vec![build_state(0, start_name.clone(), nfa)];
    let mut name_to_id = HashMap::from([(start_name, 0)]);
    let mut worklist = VecDeque::from([0usize]);

    while let Some(id) = worklist.pop_front() {
        let name = states[id].name.clone();
        for &a in alphabet {
            let moved = mov(nfa, &name, a);
            if moved.is_empty() {
                continue;
            }
            let target_name = epsilon_closure(nfa, &moved);
            let target_id = *name_to_id.entry(target_name.clone()).or_insert_with(|| {
                let new_id = states.len();
                states.push(build_state(new_id, target_name, nfa));
                worklist.push_back(new_id);
                new_id
            });
            states[id].transitions.insert(a, target_id);
        }
    }

    Dfa {
        states,
        start: 0,
        alphabet: alphabet.to_vec(),
    }
}

impl<T> Dfa<T> {
    pub fn evaluator(&self) -> DfaEvaluator<'_, T> {
        DfaEvaluator::new(self)
    }

    pub fn accepts(&self, input: impl IntoIterator<Item = char>) -> bool {
        let mut eval = self.evaluator();
        for c in input {
            if eval.step(c).is_none() {
                return false;
            }
        }
        eval.is_accepting()
    }

    /// Renders this DFA as the table format [`crate::parser::dfa`]
    /// reads back; missing transitions are written as `-`. A fixture
    /// and debugging convenience, not a supported artifact format.
    pub fn to_table(&self) -> String {
        let mut table = crate::table::Table::default();
        let names: Vec<String> = (0..self.states.len()).map(|id| format!("s{id}")).collect();
        let alphabet_strs: Vec<String> = self.alphabet.iter().map(|c| c.to_string()).collect();
        let mut head_row = vec![""];
        head_row.extend(alphabet_strs.iter().map(|s| s.as_str()));
        table.push_row(head_row);

        let mut name_bufs: Vec<String> = Vec::with_capacity(self.states.len());
        for state in &self.states {
            let marker = match (state.id == self.start, state.accepting) {
                (true, true) => "→*",
                (true, false) => "→",
                (false, true) => "*",
                (false, false) => "",
            };
            name_bufs.push(format!("{marker}{}", names[state.id]));
        }

        for (state, name) in self.states.iter().zip(&name_bufs) {
            let mut row = vec![name.as_str()];
            for target in self.alphabet.iter().map(|a| state.transitions.get(a)) {
                row.push(match target {
                    Some(&t) => &names[t],
                    None => "-",
                });
            }
            table.push_row(row);
        }

        table.to_string(" ")
    }
}

fn canon(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // Keep the lower id as the representative so class roots
            // are deterministic without a second pass.
            let (hi, lo) = if ra > rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi] = lo;
        }
    }
}

impl<T: Clone> Dfa<T> {
    /// Table-filling equivalence: computes the distinguishability
    /// relation to a fixed point, partitions the non-distinguishable
    /// states with union-find, and rebuilds the automaton with one
    /// state per class.
    pub fn minimize(&mut self) {
        let n = self.states.len();
        if n <= 1 {
            return;
        }

        let mut distinguishable: std::collections::HashSet<(usize, usize)> = Default::default();
        for i in 0..n {
            for j in (i + 1)..n {
                if self.states[i].accepting != self.states[j].accepting {
                    distinguishable.insert((i, j));
                }
            }
        }

        loop {
            let mut changed = false;
            for i in 0..n {
                for j in (i + 1)..n {
                    if distinguishable.contains(&(i, j)) {
                        continue;
                    }
                    for &a in &self.alphabet {
                        let pi = self.states[i].transitions.get(&a).copied();
                        let pj = self.states[j].transitions.get(&a).copied();
                        let newly = match (pi, pj) {
                            (None, None) => false,
                            (Some(_), None) | (None, Some(_)) => true,
                            (Some(pi), Some(pj)) => {
                                pi != pj && distinguishable.contains(&canon(pi, pj))
                            }
                        };
                        if newly {
                            distinguishable.insert((i, j));
                            changed = true;
                            break;
                        }
                    }
                }
            }
            if !changed {
                break;
            }
        }

        let mut uf = UnionFind::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                if !distinguishable.contains(&(i, j)) {
                    uf.union(i, j);
                }
            }
        }

        let class_of: Vec<usize> = (0..n).map(|i| uf.find(i)).collect();
        let mut roots: Vec<usize> = class_of.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        roots.sort_unstable();
        let root_to_new: HashMap<usize, usize> =
            roots.iter().enumerate().map(|(new_id, &r)| (r, new_id)).collect();

        let mut new_states = Vec::with_capacity(roots.len());
        for (new_id, &root) in roots.iter().enumerate() {
            let members: Vec<usize> = (0..n).filter(|&i| class_of[i] == root).collect();
            let accepting = members.iter().any(|&i| self.states[i].accepting);

            let best = members
                .iter()
                .filter(|&&i| self.states[i].accepting)
                .min_by_key(|&&i| (self.states[i].priority, i))
                .copied();
            let (token_type, priority) = match best {
                Some(i) => (self.states[i].token_type.clone(), self.states[i].priority),
                None => (None, usize::MAX),
            };

            let mut transitions = HashMap::new();
            for &a in &self.alphabet {
                if let Some(&target) = self.states[root].transitions.get(&a) {
                    transitions.insert(a, root_to_new[&class_of[target]]);
                }
            }

            new_states.push(DfaState {
                id: new_id,
                name: self.states[root].name.clone(),
                transitions,
                accepting,
                token_type,
                priority,
            });
        }

        self.start = root_to_new[&class_of[self.start]];
        self.states = new_states;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nfa::thompson_build;
    use crate::regex::{insert_concatenation, to_postfix};

    fn compile(pattern: &str) -> Dfa<()> {
        let postfix = to_postfix(&insert_concatenation(pattern)).unwrap();
        let nfa = thompson_build(&postfix).unwrap();
        let alphabet: Vec<char> = pattern.chars().filter(|c| c.is_alphanumeric()).collect();
        from_nfa(&nfa, &alphabet)
    }

    #[test]
    fn dfa_is_functional() {
        // HashMap<char, usize> transitions already guarantee at most one
        // target per symbol; this pins the cardinality invariant down.
        let dfa = compile("a(b|c)*");
        for state in &dfa.states {
            assert!(state.transitions.len() <= dfa.alphabet.len());
        }
    }

    #[test]
    fn minimizing_a_or_aa_has_exactly_three_states() {
        let mut dfa = compile("a|aa");
        // No transition is ever added for an empty move(), so this
        // automaton is already minimal; minimize() is a no-op here.
        assert_eq!(dfa.states.len(), 3);
        dfa.minimize();
        assert_eq!(dfa.states.len(), 3);
        assert!(dfa.accepts("a".chars()));
        assert!(dfa.accepts("aa".chars()));
        assert!(!dfa.accepts("aaa".chars()));
        assert!(!dfa.accepts("".chars()));
    }

    #[test]
    fn minimization_preserves_language() {
        let mut dfa = compile("a(b|c)*");
        let before: Vec<&str> = vec!["a", "ab", "ac", "abcbc", "", "b", "ba"];
        let accepted_before: Vec<bool> = before.iter().map(|s| dfa.accepts(s.chars())).collect();
        dfa.minimize();
        let accepted_after: Vec<bool> = before.iter().map(|s| dfa.accepts(s.chars())).collect();
        assert_eq!(accepted_before, accepted_after);
    }

    #[test]
    fn empty_alphabet_produces_degenerate_dfa() {
        let postfix = to_postfix(&insert_concatenation("a(b|c)*")).unwrap();
        let nfa = thompson_build(&postfix).unwrap();
        let dfa = from_nfa(&nfa, &[]);
        assert_eq!(dfa.states.len(), 1);
        assert!(!dfa.states[0].accepting);
    }
}
