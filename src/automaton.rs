/* The automaton descriptor. Holds the declared states, alphabet, start and
 * accept states and the multi-valued transition relation. Descriptors are
 * validated once on construction and never mutated afterwards; every core
 * operation builds a new descriptor instead. */

use bitvec::prelude::*;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::fa::Symbol;
use color_eyre::eyre::Result;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Write};

/// List of structural invariant violations caught when building a descriptor
#[derive(Debug, PartialEq, Eq)]
pub enum AutomatonError {
    /// The declared state set is empty
    EmptyStateSet,
    /// The same state label was declared twice
    DuplicateState(String),
    /// The epsilon marker was declared as an alphabet symbol
    EpsilonInAlphabet,
    /// The start state is not a declared state
    UnknownStart(String),
    /// An accept state is not a declared state
    UnknownFinal(String),
    /// A transition references an undeclared state
    UnknownTransitionState(String),
    /// A transition is labelled with a symbol outside the alphabet
    UnknownTransitionSymbol(char),
    /// A loaded descriptor's parts disagree in size or reference state ids
    /// out of range
    InconsistentDescriptor,
}

impl fmt::Display for AutomatonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyStateSet => write!(f, "Error: The automaton has no states!"),
            Self::DuplicateState(label) => {
                write!(f, "Error: State {} is declared more than once!", label)
            }
            Self::EpsilonInAlphabet => {
                write!(f, "Error: The epsilon marker # cannot be an alphabet symbol!")
            }
            Self::UnknownStart(label) => {
                write!(f, "Error: Start state {} is not a declared state!", label)
            }
            Self::UnknownFinal(label) => {
                write!(f, "Error: Accept state {} is not a declared state!", label)
            }
            Self::UnknownTransitionState(label) => write!(
                f,
                "Error: Transition references undeclared state {}!",
                label
            ),
            Self::UnknownTransitionSymbol(ch) => write!(
                f,
                "Error: Transition symbol {} is not in the alphabet!",
                ch
            ),
            Self::InconsistentDescriptor => {
                write!(f, "Error: The automaton descriptor is internally inconsistent!")
            }
        }
    }
}

impl std::error::Error for AutomatonError {}

type TransitionMap = HashMap<Symbol, HashSet<usize>>;

fn serialize_transitions<S>(
    transitions: &Vec<TransitionMap>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    use serde::ser::SerializeSeq;

    let mut seq = serializer.serialize_seq(Some(transitions.len()))?;

    for transition_map in transitions {
        let mut string_map: HashMap<String, &HashSet<usize>> = HashMap::new();
        for (symbol, targets) in transition_map {
            let key = match symbol {
                Symbol::Epsilon => "#".to_string(),
                Symbol::Char(ch) => ch.to_string(),
            };
            string_map.insert(key, targets);
        }
        seq.serialize_element(&string_map)?;
    }
    seq.end()
}

fn deserialize_transitions<'de, D>(deserializer: D) -> Result<Vec<TransitionMap>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<HashMap<String, HashSet<usize>>> = Vec::deserialize(deserializer)?;

    let mut result = Vec::new();

    for string_map in raw {
        let mut transition_map = TransitionMap::new();
        for (key, targets) in string_map {
            let symbol = if key == "#" {
                Symbol::Epsilon
            } else if key.chars().count() == 1 {
                Symbol::Char(key.chars().next().unwrap())
            } else {
                return Err(serde::de::Error::custom(format!(
                    "Invalid key for Symbol: {}",
                    key
                )));
            };
            transition_map.insert(symbol, targets);
        }
        result.push(transition_map);
    }

    Ok(result)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Automaton {
    states: Vec<String>,
    label_map: HashMap<String, usize>,
    alphabet: HashSet<char>,
    start_state: usize,
    accept_states: BitVec<u8>,
    #[serde(
        serialize_with = "serialize_transitions",
        deserialize_with = "deserialize_transitions"
    )]
    transitions: Vec<TransitionMap>,
}

impl Automaton {
    /// Build a validated descriptor from declared states, an alphabet, a
    /// start state, a list of accept states and a list of
    /// (from, symbol, to) transition triples. Any structural invariant
    /// violation is rejected here so the core operations never re-validate.
    pub fn new(
        states: Vec<String>,
        alphabet: HashSet<char>,
        start: &str,
        finals: &[String],
        triples: &[(String, Symbol, String)],
    ) -> Result<Self, AutomatonError> {
        if states.is_empty() {
            return Err(AutomatonError::EmptyStateSet);
        }

        if alphabet.contains(&'#') {
            return Err(AutomatonError::EpsilonInAlphabet);
        }

        let mut label_map = HashMap::new();

        for (id, label) in states.iter().enumerate() {
            let previous = label_map.insert(label.clone(), id);
            if previous.is_some() {
                return Err(AutomatonError::DuplicateState(label.clone()));
            }
        }

        let start_state = match label_map.get(start) {
            Some(&id) => id,
            None => return Err(AutomatonError::UnknownStart(start.to_string())),
        };

        let mut accept_states: BitVec<u8> = BitVec::repeat(false, states.len());

        for label in finals {
            match label_map.get(label) {
                Some(&id) => accept_states.set(id, true),
                None => return Err(AutomatonError::UnknownFinal(label.clone())),
            }
        }

        let mut transitions: Vec<TransitionMap> = vec![TransitionMap::new(); states.len()];

        for (from, symbol, to) in triples {
            let from_id = match label_map.get(from) {
                Some(&id) => id,
                None => return Err(AutomatonError::UnknownTransitionState(from.clone())),
            };

            let to_id = match label_map.get(to) {
                Some(&id) => id,
                None => return Err(AutomatonError::UnknownTransitionState(to.clone())),
            };

            if let Symbol::Char(ch) = symbol {
                if !alphabet.contains(ch) {
                    return Err(AutomatonError::UnknownTransitionSymbol(*ch));
                }
            }

            transitions[from_id]
                .entry(symbol.clone())
                .or_default()
                .insert(to_id);
        }

        Ok(Automaton {
            states,
            label_map,
            alphabet,
            start_state,
            accept_states,
            transitions,
        })
    }

    /* Assembles a descriptor whose parts are already consistent. Used by
     * subset construction which builds ids directly. */
    pub(crate) fn from_parts(
        states: Vec<String>,
        alphabet: HashSet<char>,
        start_state: usize,
        accept_states: BitVec<u8>,
        transitions: Vec<TransitionMap>,
    ) -> Self {
        let mut label_map = HashMap::new();
        for (id, label) in states.iter().enumerate() {
            label_map.insert(label.clone(), id);
        }

        Automaton {
            states,
            label_map,
            alphabet,
            start_state,
            accept_states,
            transitions,
        }
    }

    pub fn get_num_states(&self) -> usize {
        self.states.len()
    }

    pub fn get_start_state(&self) -> usize {
        self.start_state
    }

    pub fn get_alphabet(&self) -> &HashSet<char> {
        &self.alphabet
    }

    pub fn get_acceptor_states(&self) -> &BitVec<u8> {
        &self.accept_states
    }

    /// Get the list of declared state labels in id order
    pub fn get_states(&self) -> &Vec<String> {
        &self.states
    }

    /// Get the label of the state with the given id
    pub fn get_label(&self, id: usize) -> &String {
        &self.states[id]
    }

    /// Get the id of the state with the given label, if declared
    pub fn get_state_id(&self, label: &str) -> Option<usize> {
        self.label_map.get(label).copied()
    }

    /// Get a list of all outgoing transitions for the given state
    pub fn get_transitions(&self, state_id: usize) -> &HashMap<Symbol, HashSet<usize>> {
        &self.transitions[state_id]
    }

    /// An empty state set sized for this descriptor
    pub fn empty_set(&self) -> BitVec<u8> {
        BitVec::repeat(false, self.states.len())
    }

    /// Translate a state set back into labels, in id order
    pub fn labels_of(&self, set: &BitVec<u8>) -> Vec<String> {
        set.iter_ones().map(|id| self.states[id].clone()).collect()
    }

    /// Compute the epsilon closure of a seed state set: the smallest
    /// superset of the seed closed under epsilon moves. Each state is
    /// enqueued at most once so the walk terminates on any descriptor.
    pub fn epsilon_closure(&self, seed: &BitVec<u8>) -> BitVec<u8> {
        let mut closure = seed.clone();
        let mut work_list: VecDeque<usize> = seed.iter_ones().collect();

        while let Some(state) = work_list.pop_front() {
            let eps_targets = self.transitions[state].get(&Symbol::Epsilon);
            if let Some(targets) = eps_targets {
                for target in targets {
                    let target = *target;
                    if !closure[target] {
                        closure.set(target, true);
                        work_list.push_back(target);
                    }
                }
            }
        }

        closure
    }

    /// The set of states reachable from any member of the given set on one
    /// occurrence of the given character. Epsilon moves are not followed.
    pub fn move_on(&self, set: &BitVec<u8>, ch: char) -> BitVec<u8> {
        let mut result = self.empty_set();

        for state in set.iter_ones() {
            let targets = self.transitions[state].get(&Symbol::Char(ch));
            let targets = match targets {
                None => continue,
                Some(targets) => targets,
            };
            for target in targets {
                result.set(*target, true);
            }
        }

        result
    }

    /// True iff the relation has no epsilon entries and no (state, symbol)
    /// pair maps to more than one target
    pub fn is_deterministic(&self) -> bool {
        for transition_map in &self.transitions {
            if transition_map.contains_key(&Symbol::Epsilon) {
                return false;
            }

            for targets in transition_map.values() {
                if targets.len() > 1 {
                    return false;
                }
            }
        }
        true
    }

    /* Re-check the structural invariants on a descriptor that bypassed the
     * constructor (i.e. one deserialized from a file). */
    fn validate(&self) -> Result<(), AutomatonError> {
        if self.states.is_empty() {
            return Err(AutomatonError::EmptyStateSet);
        }

        if self.alphabet.contains(&'#') {
            return Err(AutomatonError::EpsilonInAlphabet);
        }

        let num_states = self.states.len();

        if self.transitions.len() != num_states
            || self.accept_states.len() != num_states
            || self.start_state >= num_states
            || self.label_map.len() != num_states
        {
            return Err(AutomatonError::InconsistentDescriptor);
        }

        for (id, label) in self.states.iter().enumerate() {
            if self.label_map.get(label) != Some(&id) {
                return Err(AutomatonError::InconsistentDescriptor);
            }
        }

        for transition_map in &self.transitions {
            for (symbol, targets) in transition_map {
                if let Symbol::Char(ch) = symbol {
                    if !self.alphabet.contains(ch) {
                        return Err(AutomatonError::UnknownTransitionSymbol(*ch));
                    }
                }

                for target in targets {
                    if *target >= num_states {
                        return Err(AutomatonError::InconsistentDescriptor);
                    }
                }
            }
        }

        Ok(())
    }

    /// Save the descriptor to a json file
    pub fn save_automaton(&self, file_name: &str) -> Result<()> {
        let json_string = serde_json::to_string_pretty(self)?;

        let mut file = File::create(file_name)?;

        writeln!(file, "{}", json_string)?;
        Ok(())
    }
}

/// Load a descriptor from a saved json file. A file whose parts violate the
/// structural invariants is rejected here, never handed to the core
/// operations.
pub fn load_automaton(file_name: &str) -> Result<Automaton> {
    let file = File::open(file_name)?;

    let buf_reader = BufReader::new(file);

    let automaton: Automaton = serde_json::from_reader(buf_reader)?;
    automaton.validate()?;
    Ok(automaton)
}

#[cfg(test)]
mod automaton_test_helpers {
    use super::Automaton;
    use crate::fa::Symbol;
    use std::collections::HashSet;

    pub fn triple(from: &str, symbol: Symbol, to: &str) -> (String, Symbol, String) {
        (from.to_string(), symbol, to.to_string())
    }

    pub fn labels(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|label| label.to_string()).collect()
    }

    // states q0 q1 q2, alphabet {a, b}, q0 --#--> q1, q1 --a--> q1,
    // q1 --b--> q2, accepting q2
    pub fn epsilon_automaton() -> Automaton {
        Automaton::new(
            labels(&["q0", "q1", "q2"]),
            HashSet::from(['a', 'b']),
            "q0",
            &labels(&["q2"]),
            &[
                triple("q0", Symbol::Epsilon, "q1"),
                triple("q1", Symbol::Char('a'), "q1"),
                triple("q1", Symbol::Char('b'), "q2"),
            ],
        )
        .unwrap()
    }
}
