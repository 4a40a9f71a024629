use std::fmt;

/// A transition label. Epsilon consumes no input and is never a member of
/// the declared alphabet.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Symbol {
    Epsilon,
    Char(char),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Epsilon => write!(f, "𝛆"),
            Symbol::Char(ch) => write!(f, "{}", ch),
        }
    }
}
