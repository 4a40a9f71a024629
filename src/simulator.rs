/* Run a word against an automaton descriptor. The simulation tracks a
 * configuration (the epsilon-closed set of currently active states) rather
 * than a single state, so it works uniformly for deterministic and
 * nondeterministic descriptors. */

use crate::automaton::Automaton;

/// One entry of the simulation trace: the input split at the read position
/// and the configuration active at that point.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Step {
    consumed: String,
    remaining: String,
    configuration: Vec<String>,
}

impl Step {
    pub fn new(consumed: String, remaining: String, configuration: Vec<String>) -> Self {
        Step {
            consumed,
            remaining,
            configuration,
        }
    }
    /// Get the prefix of the word consumed so far
    pub fn get_consumed(&self) -> &String {
        &self.consumed
    }
    /// Get the suffix of the word not yet consumed
    pub fn get_remaining(&self) -> &String {
        &self.remaining
    }
    /// Get the labels of the active states, in state id order
    pub fn get_configuration(&self) -> &Vec<String> {
        &self.configuration
    }
}

/// The verdict of a simulation run together with its trace. The trace holds
/// one entry for the initial configuration and one per consumed symbol; a
/// run that dies mid-word stops early, so its trace is shorter than the
/// word.
#[derive(Debug)]
pub struct Run {
    accepted: bool,
    trace: Vec<Step>,
}

impl Run {
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    pub fn get_trace(&self) -> &Vec<Step> {
        &self.trace
    }
}

/// Simulate the automaton on the given word. The initial configuration is
/// the epsilon closure of the start state; each symbol maps the
/// configuration through move-then-close. An empty next configuration
/// rejects immediately without consuming the rest of the word. Once the
/// word is exhausted, the run accepts iff the configuration contains an
/// accept state.
pub fn simulate(automaton: &Automaton, word: &str) -> Run {
    let symbols: Vec<char> = word.chars().collect();

    let mut seed = automaton.empty_set();
    seed.set(automaton.get_start_state(), true);

    let mut configuration = automaton.epsilon_closure(&seed);

    let mut trace = Vec::new();
    trace.push(Step::new(
        String::new(),
        word.to_string(),
        automaton.labels_of(&configuration),
    ));

    for (position, symbol) in symbols.iter().enumerate() {
        let moved = automaton.move_on(&configuration, *symbol);

        if moved.not_any() {
            // Dead configuration, the remaining suffix is never consumed
            return Run {
                accepted: false,
                trace,
            };
        }

        configuration = automaton.epsilon_closure(&moved);

        let consumed: String = symbols[..=position].iter().collect();
        let remaining: String = symbols[position + 1..].iter().collect();

        trace.push(Step::new(
            consumed,
            remaining,
            automaton.labels_of(&configuration),
        ));
    }

    let accepted = (configuration & automaton.get_acceptor_states()).any();

    Run { accepted, trace }
}
