//! # Deterministic finite automaton
//! The [Dfa] struct is a validated DFA ready for header emission. It is
//! created by parsing a description in two steps, the first one producing a
//! raw [ParsedDfa](crate::parser::ParsedDfa) and the second one checking all
//! cross-references with [TryInto::try_into]:
//!
//! ```
//! use macrofa::dfa::Dfa;
//!
//! // a*b
//! let parsed = macrofa::parser::dfa("
//!     alphabet = {a, b}
//!     states = {s, t}
//!     initial = s
//!     final = {t}
//!     transitions = {(s,a)->s, (s,b)->t}
//! ").unwrap();
//! let dfa: Dfa = parsed.try_into().unwrap();
//! assert!(dfa.accepts(&["a", "a", "b"]));
//! assert!(!dfa.accepts(&["a", "a"]));
//!
//! let headers = dfa.emit();
//! assert!(headers.iter().any(|h| h.name() == "dfa.h"));
//! assert!(headers.iter().any(|h| h.name() == "dfa_s.h"));
//! ```
//!
//! Unlike a textbook DFA, the transition function may be partial: a missing
//! transition is a rejecting dead end for the input that reaches it. The only
//! restriction is that a state with no outgoing transitions at all must be
//! final, since it could never contribute to recognition otherwise; the
//! validation step rejects such machines.
//!
//! Emission produces `dfa.h` (entry point and macro definitions), `get_sym.h`
//! (input-symbol decoder) and one `dfa_<state>.h` per state. The caller
//! defines `INPUT` and includes `dfa.h`; afterwards `RECOGNIZED` is defined
//! iff the encoded word is accepted. The headers advance through the input
//! with `__COUNTER__`, so the including translation unit must not use
//! `__COUNTER__` itself before the include.

use crate::emit::Header;
use crate::table::Table;
use std::rc::Rc;

pub use eval::DfaEvaluator;
pub use parse::DfaParseError;

mod emit;
pub mod eval;
pub mod parse;

/// A validated deterministic finite automaton: an alphabet, a set of states
/// with at most one transition per (state, symbol) pair, an initial state and
/// a set of accepting states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    pub(crate) alphabet: Rc<[Rc<str>]>,
    pub(crate) states: Vec<DfaState>,
    pub(crate) initial_state: usize,
}

/// A state of a [Dfa]. `transitions` is indexed by alphabet position;
/// `None` means the machine rejects on that symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaState {
    pub(crate) name: Rc<str>,
    pub(crate) initial: bool,
    pub(crate) accepting: bool,
    pub(crate) transitions: Vec<Option<usize>>,
}

impl DfaState {
    /// Gets the name of this state
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks if this state is the initial state
    pub fn is_initial(&self) -> bool {
        self.initial
    }

    /// Checks if this state is accepting
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// Gets the transition targets, one entry per alphabet symbol in the
    /// alphabet's ordering
    pub fn transitions(&self) -> &[Option<usize>] {
        self.transitions.as_slice()
    }
}

impl Dfa {
    /// Gets the alphabet of this DFA
    pub fn alphabet(&self) -> &[Rc<str>] {
        &self.alphabet
    }

    /// Gets the states of this DFA
    pub fn states(&self) -> &[DfaState] {
        self.states.as_slice()
    }

    /// Gets the initial state of this DFA
    pub fn initial_state(&self) -> &DfaState {
        &self.states[self.initial_state]
    }

    /// Gets an evaluator, which is a struct that is used to evaluate words
    /// with the automaton
    pub fn evaluator(&self) -> DfaEvaluator<'_> {
        self.into()
    }

    /// Checks if this automaton accepts the given word. This is equivalent to
    /// getting the evaluator, stepping it for each symbol and checking if it
    /// is accepting
    pub fn accepts(&self, word: &[&str]) -> bool {
        let mut eval = self.evaluator();
        eval.step_multiple(word);
        eval.is_accepting()
    }

    /// Emits the complete header file set realizing this DFA as a
    /// compile-time recognizer.
    pub fn emit(&self) -> Vec<Header> {
        emit::emit(self)
    }

    /// Generates a human-readable transition table of this DFA.
    pub fn to_table(&self) -> String {
        let mut table = Table::default();

        let mut head = vec!["".to_string(), "".to_string(), "".to_string()];
        head.extend(self.alphabet.iter().map(|s| s.to_string()));
        table.push_row(head);

        for state in &self.states {
            let mut row = vec![
                if state.initial { "→" } else { "" }.to_string(),
                if state.accepting { "*" } else { "" }.to_string(),
                state.name.to_string(),
            ];
            row.extend(state.transitions.iter().map(|t| match t {
                Some(idx) => self.states[*idx].name.to_string(),
                None => "-".to_string(),
            }));
            table.push_row(row);
        }
        table.to_string(" ")
    }
}
