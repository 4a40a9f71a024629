//! # wordsim
//!
//! A finite automata simulator.
//!
//! This library provides functionality to:
//! - Parse a six line textual description of an automaton and a word
//! - Build validated automaton descriptors (NFA with epsilon transitions or DFA)
//! - Compute epsilon closures of state sets
//! - Classify a descriptor as deterministic or nondeterministic
//! - Convert NFAs to DFAs using Subset Construction
//! - Simulate a word against any descriptor, with a per-step trace
//! - Export the automata as Graphviz dot files

// Re-export the modules
pub mod automaton;
pub mod dfa;
pub mod fa;
pub mod parser;
pub mod simulator;
pub mod visualizer;

// Re-export commonly used items for convenience
pub use automaton::{load_automaton, Automaton, AutomatonError};
pub use dfa::construct_dfa;
pub use fa::Symbol;
pub use parser::{parse_description, read_description_file, Description, DescriptionError};
pub use simulator::{simulate, Run, Step};
pub use visualizer::export_dot;
