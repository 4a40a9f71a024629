/* Perform subset construction to convert an NFA descriptor into an
 * equivalent DFA descriptor. */

use crate::automaton::Automaton;
use crate::fa::Symbol;
use bitvec::prelude::*;
use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::{DefaultHasher, Hash, Hasher};

/// A state subset and its hash stored together, so structurally equal
/// subsets deduplicate in the discovery map without rehashing the bitvec on
/// every lookup. Two DFA states are the same iff their member sets are
/// equal, independent of discovery order.
#[derive(Clone)]
struct SubsetKey {
    bv: BitVec<u8>,
    hash: u64,
}

impl SubsetKey {
    fn new(bv: BitVec<u8>) -> Self {
        let mut hasher = DefaultHasher::new();
        bv.hash(&mut hasher);
        let hash = hasher.finish();
        Self { bv, hash }
    }
}

impl Hash for SubsetKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl PartialEq for SubsetKey {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.bv == other.bv
    }
}

impl Eq for SubsetKey {}

// The label of a DFA state lists its member NFA states in id order, so the
// same subset always gets the same label.
fn subset_label(nfa: &Automaton, subset: &BitVec<u8>) -> String {
    let members = nfa.labels_of(subset);
    format!("{{{}}}", members.join(","))
}

/// Apply the subset construction algorithm on an NFA descriptor to build an
/// equivalent DFA descriptor. The input descriptor is left untouched. Every
/// DFA state is an epsilon-closed subset of NFA states; a (subset, symbol)
/// pair whose move set is empty gets no transition, which is the implicit
/// reject path during simulation.
pub fn construct_dfa(nfa: &Automaton) -> Automaton {
    let mut alphabet: Vec<char> = nfa.get_alphabet().iter().copied().collect();
    alphabet.sort(); // Sort the alphabet so state discovery order is reproducible

    let nfa_accepts = nfa.get_acceptor_states();

    let mut states: Vec<String> = Vec::new();
    let mut accept_states: BitVec<u8> = BitVec::new();
    let mut transitions: Vec<HashMap<Symbol, HashSet<usize>>> = Vec::new();

    let mut subset_ids: HashMap<SubsetKey, usize> = HashMap::new(); // Mapping from nfa state subset to DFA state
    let mut work_list: VecDeque<SubsetKey> = VecDeque::new();

    let mut seed = nfa.empty_set();
    seed.set(nfa.get_start_state(), true);

    let q0 = SubsetKey::new(nfa.epsilon_closure(&seed)); // The DFA start state is the closure of the NFA start state

    states.push(subset_label(nfa, &q0.bv));
    accept_states.push((q0.bv.clone() & nfa_accepts).any());
    transitions.push(HashMap::new());

    subset_ids.insert(q0.clone(), 0);
    work_list.push_back(q0);

    while let Some(q) = work_list.pop_front() {
        let dq = *subset_ids.get(&q).unwrap();

        for c in alphabet.iter() {
            let moved = nfa.move_on(&q.bv, *c);
            if moved.not_any() {
                continue;
            }

            let t = SubsetKey::new(nfa.epsilon_closure(&moved));

            let dt = if let Some(&existing_dt) = subset_ids.get(&t) {
                existing_dt
            } else {
                let dt = states.len();

                states.push(subset_label(nfa, &t.bv));
                accept_states.push((t.bv.clone() & nfa_accepts).any()); // A DFA state accepts iff its
                                                                        // subset meets the NFA accept set
                transitions.push(HashMap::new());

                subset_ids.insert(t.clone(), dt);
                work_list.push_back(t);

                dt
            };

            transitions[dq].insert(Symbol::Char(*c), HashSet::from([dt]));
        }
    }

    Automaton::from_parts(
        states,
        nfa.get_alphabet().clone(),
        0,
        accept_states,
        transitions,
    )
}


#[cfg(test)]
mod dfa_tests {
    use super::dfa_test_helpers::{branching_nfa, epsilon_nfa};
    use super::construct_dfa;
    use crate::simulator::simulate;

    #[test]
    fn test_output_is_deterministic() {
        let nfa = branching_nfa();
        assert!(!nfa.is_deterministic());

        let dfa = construct_dfa(&nfa);
        assert!(dfa.is_deterministic());
    }

    #[test]
    fn test_epsilon_input_is_determinized() {
        let nfa = epsilon_nfa();
        let dfa = construct_dfa(&nfa);

        assert!(dfa.is_deterministic());

        // The DFA start state is the closure of the NFA start state
        let start = dfa.get_start_state();
        assert_eq!(dfa.get_label(start), "{q0,q1}");
    }

    #[test]
    fn test_reachable_subsets() {
        let nfa = branching_nfa();
        let dfa = construct_dfa(&nfa);

        // {q0} --a--> {q0,q1} --b--> {q2}, plus no other reachable subsets
        assert_eq!(dfa.get_num_states(), 3);
        assert!(dfa.get_state_id("{q0}").is_some());
        assert!(dfa.get_state_id("{q0,q1}").is_some());
        assert!(dfa.get_state_id("{q2}").is_some());

        let accepts: Vec<usize> = dfa.get_acceptor_states().iter_ones().collect();
        assert_eq!(accepts.len(), 1);
        assert_eq!(dfa.get_label(accepts[0]), "{q2}");
    }

    #[test]
    fn test_missing_move_leaves_no_transition() {
        let nfa = branching_nfa();
        let dfa = construct_dfa(&nfa);

        // No member of {q0} moves on b, so the DFA start state has no b entry
        let start_transitions = dfa.get_transitions(dfa.get_start_state());
        assert_eq!(start_transitions.len(), 1);
    }

    #[test]
    fn test_acceptance_is_preserved() {
        let nfa = branching_nfa();
        let dfa = construct_dfa(&nfa);

        for word in ["", "a", "b", "ab", "aa", "aab", "abb", "aaab", "ba"] {
            assert_eq!(
                simulate(&nfa, word).is_accepted(),
                simulate(&dfa, word).is_accepted(),
                "acceptance differs on {:?}",
                word
            );
        }
    }

    #[test]
    fn test_redeterminization_is_stable() {
        let nfa = epsilon_nfa();
        let dfa = construct_dfa(&nfa);
        let dfa_again = construct_dfa(&dfa);

        assert!(dfa_again.is_deterministic());
        assert_eq!(dfa_again.get_num_states(), dfa.get_num_states());
        assert_eq!(
            dfa_again.get_acceptor_states().count_ones(),
            dfa.get_acceptor_states().count_ones()
        );

        for word in ["", "a", "b", "ab", "aab", "abb"] {
            assert_eq!(
                simulate(&dfa, word).is_accepted(),
                simulate(&dfa_again, word).is_accepted()
            );
        }
    }
}
