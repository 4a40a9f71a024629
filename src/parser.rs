/* Parse the six line textual description of an automaton and the word to
 * recognize. The grammar is line based:
 *
 *   1. state labels, whitespace separated
 *   2. alphabet symbols, one alphanumeric character each
 *   3. the start state
 *   4. the accept states (may be empty)
 *   5. transitions of the form (from,symbol,to), where symbol # is epsilon
 *   6. the word to recognize (may be empty)
 *
 * Every diagnostic reports the offending line number. The parser is the
 * only place descriptions are validated; the descriptor it hands out is
 * well formed by construction. */

use crate::automaton::Automaton;
use crate::fa::Symbol;
use color_eyre::eyre::{Report, Result};
use std::collections::HashSet;
use std::fmt;
use std::fs;

// Characters which may not appear in state labels or alphabet symbols
const PROHIBITED: [char; 6] = ['#', '"', '\'', ',', '.', '_'];

/// List of possible errors in a textual description, each tied to the input
/// line it was found on
#[derive(Debug, PartialEq, Eq)]
pub enum DescriptionError {
    /// The description ended before the given line
    MissingLine(usize),
    /// Line 1 is empty or a state label contains a prohibited character
    BadStates,
    /// Line 2 is empty or a symbol is not a single alphanumeric character
    BadAlphabet,
    /// Line 3 names a state not declared on line 1
    BadStart,
    /// Line 4 names a state not declared on line 1
    BadFinals,
    /// Line 5 has a malformed triple or one referencing undeclared names
    BadTransition,
    /// Line 6 contains a character outside the alphabet
    BadWord,
}

impl DescriptionError {
    /// The 1-based input line the error was found on
    pub fn line(&self) -> usize {
        match self {
            Self::MissingLine(line) => *line,
            Self::BadStates => 1,
            Self::BadAlphabet => 2,
            Self::BadStart => 3,
            Self::BadFinals => 4,
            Self::BadTransition => 5,
            Self::BadWord => 6,
        }
    }
}

impl fmt::Display for DescriptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLine(line) => write!(f, "Error found in line {}: line is missing!", line),
            Self::BadStates => write!(f, "Error found in line 1: invalid state list!"),
            Self::BadAlphabet => write!(f, "Error found in line 2: invalid alphabet!"),
            Self::BadStart => write!(f, "Error found in line 3: invalid start state!"),
            Self::BadFinals => write!(f, "Error found in line 4: invalid accept states!"),
            Self::BadTransition => write!(f, "Error found in line 5: invalid transition!"),
            Self::BadWord => write!(f, "Error found in line 6: invalid word!"),
        }
    }
}

impl std::error::Error for DescriptionError {}

/// A parsed description: the validated descriptor plus the word from line 6
#[derive(Debug)]
pub struct Description {
    automaton: Automaton,
    word: String,
}

impl Description {
    pub fn get_automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn get_word(&self) -> &String {
        &self.word
    }

    pub fn into_parts(self) -> (Automaton, String) {
        (self.automaton, self.word)
    }
}

fn parse_states(line: &str) -> Result<Vec<String>, DescriptionError> {
    let states: Vec<String> = line.split_whitespace().map(|s| s.to_string()).collect();

    if states.is_empty() {
        return Err(DescriptionError::BadStates);
    }

    for state in &states {
        if state.chars().any(|ch| PROHIBITED.contains(&ch)) {
            return Err(DescriptionError::BadStates);
        }
    }

    Ok(states)
}

fn parse_alphabet(line: &str) -> Result<HashSet<char>, DescriptionError> {
    let symbols: Vec<&str> = line.split_whitespace().collect();

    if symbols.is_empty() {
        return Err(DescriptionError::BadAlphabet);
    }

    let mut alphabet = HashSet::new();

    for symbol in symbols {
        if symbol.chars().count() != 1 {
            return Err(DescriptionError::BadAlphabet);
        }

        let ch = symbol.chars().next().unwrap();
        if !ch.is_alphanumeric() || PROHIBITED.contains(&ch) {
            return Err(DescriptionError::BadAlphabet);
        }

        alphabet.insert(ch);
    }

    Ok(alphabet)
}

fn parse_transitions(
    line: &str,
    states: &[String],
    alphabet: &HashSet<char>,
) -> Result<Vec<(String, Symbol, String)>, DescriptionError> {
    let mut triples = Vec::new();

    for item in line.split_whitespace() {
        // Each triple must look like (from,symbol,to)
        if !item.starts_with('(') || !item.ends_with(')') {
            return Err(DescriptionError::BadTransition);
        }

        let inner = &item[1..item.len() - 1];
        let parts: Vec<&str> = inner.split(',').collect();

        if parts.len() != 3 {
            return Err(DescriptionError::BadTransition);
        }

        let (from, symbol, to) = (parts[0], parts[1], parts[2]);

        if !states.contains(&from.to_string()) || !states.contains(&to.to_string()) {
            return Err(DescriptionError::BadTransition);
        }

        let symbol = if symbol == "#" {
            Symbol::Epsilon
        } else {
            if symbol.chars().count() != 1 {
                return Err(DescriptionError::BadTransition);
            }
            let ch = symbol.chars().next().unwrap();
            if !alphabet.contains(&ch) {
                return Err(DescriptionError::BadTransition);
            }
            Symbol::Char(ch)
        };

        triples.push((from.to_string(), symbol, to.to_string()));
    }

    Ok(triples)
}

/// Parse a six line description into a validated descriptor and a word.
/// Errors carry the 1-based line number of the offending line.
pub fn parse_description(input: &str) -> Result<Description> {
    let lines: Vec<&str> = input.lines().collect();

    // A description must carry at least the five automaton lines; a missing
    // sixth line is an empty word
    for line_number in 1..=5 {
        if lines.len() < line_number {
            let err = Report::new(DescriptionError::MissingLine(line_number));
            return Err(err);
        }
    }

    let states = parse_states(lines[0])?;
    let alphabet = parse_alphabet(lines[1])?;

    let start = lines[2].trim();
    if !states.contains(&start.to_string()) {
        let err = Report::new(DescriptionError::BadStart);
        return Err(err);
    }

    let finals: Vec<String> = lines[3]
        .split_whitespace()
        .map(|s| s.to_string())
        .collect();
    for label in &finals {
        if !states.contains(label) {
            let err = Report::new(DescriptionError::BadFinals);
            return Err(err);
        }
    }

    let triples = parse_transitions(lines[4], &states, &alphabet)?;

    let word = lines.get(5).map(|line| line.trim()).unwrap_or("");
    for ch in word.chars() {
        if !alphabet.contains(&ch) {
            let err = Report::new(DescriptionError::BadWord);
            return Err(err);
        }
    }

    let automaton = Automaton::new(states, alphabet, start, &finals, &triples)?;

    Ok(Description {
        automaton,
        word: word.to_string(),
    })
}

/// Read and parse a description file
pub fn read_description_file(file_path: String) -> Result<Description> {
    let input = fs::read_to_string(file_path)?;
    parse_description(&input)
}

#[cfg(test)]
mod parser_tests {
    use super::{parse_description, DescriptionError};
    use crate::simulator::simulate;

    fn expect_error_on_line(input: &str, line: usize) {
        let result = parse_description(input);
        assert!(result.is_err());

        let err = result.unwrap_err();
        let err: &DescriptionError = err.downcast_ref().unwrap();
        assert_eq!(err.line(), line);
    }

    #[test]
    fn test_well_formed_description() {
        let input = "q0 q1 q2\na b\nq0\nq2\n(q0,a,q0) (q0,a,q1) (q1,b,q2)\nab\n";

        let description = parse_description(input).unwrap();
        assert_eq!(description.get_word(), "ab");

        let automaton = description.get_automaton();
        assert_eq!(automaton.get_num_states(), 3);
        assert!(!automaton.is_deterministic());
        assert!(simulate(automaton, description.get_word()).is_accepted());
    }

    #[test]
    fn test_prohibited_character_in_state_label() {
        expect_error_on_line("q0 q.1\na\nq0\nq0\n\n", 1);
    }

    #[test]
    fn test_empty_states_line() {
        expect_error_on_line("\na\nq0\nq0\n\n", 1);
    }

    #[test]
    fn test_multi_character_alphabet_symbol() {
        expect_error_on_line("q0\nab\nq0\nq0\n\n", 2);
    }

    #[test]
    fn test_non_alphanumeric_alphabet_symbol() {
        expect_error_on_line("q0\n$\nq0\nq0\n\n", 2);
    }

    #[test]
    fn test_undeclared_start_state() {
        expect_error_on_line("q0\na\nq9\nq0\n\n", 3);
    }

    #[test]
    fn test_undeclared_final_state() {
        expect_error_on_line("q0\na\nq0\nq9\n\n", 4);
    }

    #[test]
    fn test_malformed_transition_triple() {
        expect_error_on_line("q0 q1\na\nq0\nq1\n(q0,a)\n", 5);
    }

    #[test]
    fn test_transition_with_undeclared_symbol() {
        expect_error_on_line("q0 q1\na\nq0\nq1\n(q0,b,q1)\n", 5);
    }

    #[test]
    fn test_word_outside_alphabet() {
        expect_error_on_line("q0\na\nq0\nq0\n\nz\n", 6);
    }

    #[test]
    fn test_missing_lines() {
        expect_error_on_line("q0\na\n", 3);
    }

    #[test]
    fn test_empty_finals_and_missing_word_line() {
        let input = "q0\na\nq0\n\n(q0,a,q0)";

        let description = parse_description(input).unwrap();
        assert_eq!(description.get_word(), "");

        // No accept states at all, every word is rejected
        let automaton = description.get_automaton();
        assert!(!simulate(automaton, "").is_accepted());
        assert!(!simulate(automaton, "a").is_accepted());
    }

    #[test]
    fn test_epsilon_transition_marker() {
        let input = "q0 q1\na\nq0\nq1\n(q0,#,q1)\n\n";

        let description = parse_description(input).unwrap();
        let automaton = description.get_automaton();

        assert!(!automaton.is_deterministic());
        assert!(simulate(automaton, "").is_accepted());
    }
}
