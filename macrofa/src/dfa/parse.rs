use crate::dfa::{Dfa, DfaState};
use crate::parser::{ParsedDfa, ParsedDfaTransition};
use std::collections::{HashMap, HashSet};
use std::ops::Not;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DfaParseError<'a> {
    #[error("'{0}' appears twice in the alphabet")]
    DuplicateAlphabetSymbol(&'a str),
    #[error("State '{0}' defined multiple times")]
    DuplicateStateDefinition(&'a str),
    #[error("Initial state '{0}' does not exist")]
    UnknownInitialState(&'a str),
    #[error("Final state '{0}' does not exist")]
    UnknownFinalState(&'a str),
    #[error("State '{1}' does not exist (in transition from state '{0}')")]
    UnknownTransitionState(&'a str, &'a str),
    #[error("Symbol '{1}' is not in the alphabet (in transition from state '{0}')")]
    UnknownSymbol(&'a str, &'a str),
    #[error("Duplicate transition from state '{0}' on symbol '{1}'")]
    DuplicateTransition(&'a str, &'a str),
    #[error("Dead end non-final transition: state '{0}' has no outgoing transitions")]
    DeadEndState(&'a str),
}

impl<'a> TryFrom<ParsedDfa<'a>> for Dfa {
    type Error = DfaParseError<'a>;

    fn try_from(value: ParsedDfa<'a>) -> Result<Self, Self::Error> {
        use DfaParseError::*;
        let ParsedDfa {
            alphabet,
            states,
            initial,
            finals,
            transitions,
        } = value;

        let sym_map = index_unique(&alphabet).map_err(DuplicateAlphabetSymbol)?;
        let state_map = index_unique(&states).map_err(DuplicateStateDefinition)?;

        let initial_state = *state_map.get(initial).ok_or(UnknownInitialState(initial))?;

        let mut accepting = vec![false; states.len()];
        for name in finals {
            let idx = state_map.get(name).ok_or(UnknownFinalState(name))?;
            accepting[*idx] = true;
        }

        let mut transition_table = vec![vec![None; alphabet.len()]; states.len()];
        for ParsedDfaTransition { from, on, to } in transitions {
            let from_idx = *state_map
                .get(from)
                .ok_or(UnknownTransitionState(from, from))?;
            let to_idx = *state_map.get(to).ok_or(UnknownTransitionState(from, to))?;
            let sym_idx = *sym_map.get(on).ok_or(UnknownSymbol(from, on))?;
            let slot = &mut transition_table[from_idx][sym_idx];
            if slot.is_some() {
                return Err(DuplicateTransition(from, on));
            }
            *slot = Some(to_idx);
        }

        for (idx, name) in states.iter().enumerate() {
            let dead_end = transition_table[idx].iter().all(Option::is_none);
            if dead_end && !accepting[idx] {
                return Err(DeadEndState(name));
            }
        }

        let states = states
            .into_iter()
            .zip(transition_table)
            .enumerate()
            .map(|(idx, (name, transitions))| DfaState {
                name: Rc::from(name),
                initial: idx == initial_state,
                accepting: accepting[idx],
                transitions,
            })
            .collect();

        Ok(Dfa {
            alphabet: alphabet.into_iter().map(Rc::from).collect(),
            states,
            initial_state,
        })
    }
}

/// Maps each name to its position, erroring with the first duplicate.
pub(crate) fn index_unique<'a>(
    names: &[&'a str],
) -> Result<HashMap<&'a str, usize>, &'a str> {
    let mut seen = HashSet::new();
    if let Some(duplicate) = names
        .iter()
        .find_map(|name| seen.insert(*name).not().then_some(*name))
    {
        return Err(duplicate);
    }
    Ok(names.iter().enumerate().map(|(i, n)| (*n, i)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn build(input: &str) -> Result<Dfa, DfaParseError> {
        parser::dfa(input).unwrap().try_into()
    }

    #[test]
    fn valid_machine_builds() {
        let dfa = build(
            "alphabet={a,b} states={s,t} initial=s final={t} \
             transitions={(s,a)->s,(s,b)->t}",
        )
        .unwrap();
        assert_eq!(dfa.states().len(), 2);
        assert_eq!(dfa.initial_state().name(), "s");
        assert!(dfa.states()[1].is_accepting());
    }

    #[test]
    fn duplicate_transition_is_rejected() {
        let err = build(
            "alphabet={a} states={s,t,u} initial=s final={t,u} \
             transitions={(s,a)->t,(s,a)->u}",
        )
        .unwrap_err();
        assert_eq!(err, DfaParseError::DuplicateTransition("s", "a"));
    }

    #[test]
    fn dead_end_non_final_is_rejected() {
        let err = build(
            "alphabet={a} states={s,t} initial=s final={} \
             transitions={(s,a)->t}",
        )
        .unwrap_err();
        assert_eq!(err, DfaParseError::DeadEndState("t"));
        assert!(err
            .to_string()
            .starts_with("Dead end non-final transition"));
    }

    #[test]
    fn cross_references_are_checked() {
        assert_eq!(
            build("alphabet={a} states={s} initial=x final={} transitions={(s,a)->s}")
                .unwrap_err(),
            DfaParseError::UnknownInitialState("x")
        );
        assert_eq!(
            build("alphabet={a} states={s} initial=s final={x} transitions={(s,a)->s}")
                .unwrap_err(),
            DfaParseError::UnknownFinalState("x")
        );
        assert_eq!(
            build("alphabet={a} states={s} initial=s final={s} transitions={(s,a)->x}")
                .unwrap_err(),
            DfaParseError::UnknownTransitionState("s", "x")
        );
        assert_eq!(
            build("alphabet={a} states={s} initial=s final={s} transitions={(s,b)->s}")
                .unwrap_err(),
            DfaParseError::UnknownSymbol("s", "b")
        );
        assert_eq!(
            build("alphabet={a,a} states={s} initial=s final={s} transitions={}")
                .unwrap_err(),
            DfaParseError::DuplicateAlphabetSymbol("a")
        );
        assert_eq!(
            build("alphabet={a} states={s,s} initial=s final={s} transitions={}")
                .unwrap_err(),
            DfaParseError::DuplicateStateDefinition("s")
        );
    }

    #[test]
    fn final_sink_is_allowed() {
        let dfa = build(
            "alphabet={a} states={s,t} initial=s final={t} \
             transitions={(s,a)->t}",
        )
        .unwrap();
        assert_eq!(dfa.states()[1].transitions(), &[None]);
    }
}
