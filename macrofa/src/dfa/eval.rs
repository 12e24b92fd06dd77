use crate::dfa::{Dfa, DfaState};
use std::collections::HashMap;

/// Step-by-step evaluation of a word against a [Dfa], used by
/// [Dfa::accepts] and by tests that compare machine semantics against the
/// emitted headers.
#[derive(Debug, Clone)]
pub struct DfaEvaluator<'a> {
    dfa: &'a Dfa,
    rev_map: HashMap<&'a str, usize>,
    current_state: Option<usize>,
}

impl<'a> DfaEvaluator<'a> {
    /// Checks if the evaluator is in an accepting state. A dead evaluator
    /// (one that saw a symbol with no transition) accepts nothing.
    pub fn is_accepting(&self) -> bool {
        self.current_state().map_or(false, DfaState::is_accepting)
    }

    pub fn current_state(&self) -> Option<&'a DfaState> {
        self.current_state.map(|idx| &self.dfa.states[idx])
    }

    /// Steps on one symbol, returning the new state, or `None` if the symbol
    /// is unknown or has no transition from the current state.
    pub fn step(&mut self, sym: &str) -> Option<&'a DfaState> {
        let state_idx = self.current_state?;
        let sym_idx = *self.rev_map.get(sym)?;
        self.current_state = self.dfa.states[state_idx].transitions[sym_idx];
        self.current_state()
    }

    pub fn step_multiple(&mut self, word: &[&str]) -> Option<&'a DfaState> {
        word.iter().for_each(|sym| {
            self.step(sym);
        });
        self.current_state()
    }
}

impl<'a> From<&'a Dfa> for DfaEvaluator<'a> {
    fn from(dfa: &'a Dfa) -> Self {
        let rev_map = dfa
            .alphabet
            .iter()
            .enumerate()
            .map(|(idx, sym)| (sym as &str, idx))
            .collect();
        DfaEvaluator {
            dfa,
            rev_map,
            current_state: Some(dfa.initial_state),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dfa::Dfa;
    use crate::parser;

    #[test]
    fn evaluator_dies_on_missing_transition() {
        let dfa: Dfa = parser::dfa(
            "alphabet={a,b} states={s,t} initial=s final={t} \
             transitions={(s,a)->s,(s,b)->t}",
        )
        .unwrap()
        .try_into()
        .unwrap();

        let mut eval = dfa.evaluator();
        eval.step("b");
        assert!(eval.is_accepting());
        // t has no outgoing transitions: the evaluator dies
        assert!(eval.step("a").is_none());
        assert!(!eval.is_accepting());
        // and stays dead
        assert!(eval.step("b").is_none());
    }
}
