use crate::ctr::{Ctr, CtrAction, CtrEdge, CtrState, Guard};
use crate::dfa::parse::index_unique;
use crate::encoding::InputSymbol;
use crate::parser::{ActionRef, GuardRef, ParsedCtr, ParsedCtrTransition, SymbolRef};
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CtrParseError<'a> {
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
    #[error("Dead end non-final transition: state '{0}' has no outgoing transitions")]
    DeadEndState(&'a str),
}

impl<'a> TryFrom<ParsedCtr<'a>> for Ctr {
    type Error = CtrParseError<'a>;

    fn try_from(value: ParsedCtr<'a>) -> Result<Self, Self::Error> {
        use CtrParseError::*;
        let ParsedCtr {
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

        // Per-state edge lists in declaration order; states without any
        // transition keep an empty list and then face the dead-end check.
        let mut edges: Vec<Vec<CtrEdge>> = vec![Vec::new(); states.len()];
        let mut eps_entered = vec![false; states.len()];
        for ParsedCtrTransition {
            from,
            on,
            guard,
            to,
            action,
        } in transitions
        {
            let from_idx = *state_map
                .get(from)
                .ok_or(UnknownTransitionState(from, from))?;
            let target = *state_map.get(to).ok_or(UnknownTransitionState(from, to))?;
            let on = match on {
                SymbolRef::Sym(sym) => InputSymbol::Sym(
                    *sym_map.get(sym).ok_or(UnknownSymbol(from, sym))?,
                ),
                SymbolRef::End => InputSymbol::End,
                SymbolRef::Eps => InputSymbol::Eps,
            };
            if on == InputSymbol::Eps {
                eps_entered[target] = true;
            }
            edges[from_idx].push(CtrEdge {
                on,
                guard: match guard {
                    GuardRef::Any => Guard::Any,
                    GuardRef::Zero => Guard::Zero,
                    GuardRef::Positive => Guard::Positive,
                },
                target,
                action: match action {
                    ActionRef::Nop => CtrAction::Nop,
                    ActionRef::Inc => CtrAction::Inc,
                    ActionRef::Dec => CtrAction::Dec,
                },
            });
        }

        for (idx, name) in states.iter().enumerate() {
            if edges[idx].is_empty() && !accepting[idx] {
                return Err(DeadEndState(name));
            }
        }

        let states = states
            .into_iter()
            .zip(edges)
            .enumerate()
            .map(|(idx, (name, edges))| CtrState {
                name: Rc::from(name),
                initial: idx == initial_state,
                accepting: accepting[idx],
                eps_entered: eps_entered[idx],
                edges,
            })
            .collect();

        Ok(Ctr {
            alphabet: alphabet.into_iter().map(Rc::from).collect(),
            states,
            initial_state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn build(input: &str) -> Result<Ctr, CtrParseError> {
        parser::ctr(input).unwrap().try_into()
    }

    #[test]
    fn edges_keep_declaration_order() {
        let ctr = build(
            "alphabet={a,b} states={s,f} initial=s final={f} \
             transitions={(s,a,)->(s,i),(s,b,p)->(s,d),(s,$,z)->(f,)}",
        )
        .unwrap();
        let edges = ctr.states()[0].edges();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[0].on(), InputSymbol::Sym(0));
        assert_eq!(edges[0].action(), CtrAction::Inc);
        assert_eq!(edges[1].guard(), Guard::Positive);
        assert_eq!(edges[2].on(), InputSymbol::End);
        assert!(ctr.states()[1].edges().is_empty());
    }

    #[test]
    fn eps_entry_is_tracked() {
        let ctr = build(
            "alphabet={a} states={s,t,f} initial=s final={f} \
             transitions={(s,a,)->(s,),(s,ε,z)->(t,),(t,$,)->(f,)}",
        )
        .unwrap();
        assert!(!ctr.states()[0].eps_entered);
        assert!(ctr.states()[1].eps_entered);
        assert!(!ctr.states()[2].eps_entered);
    }

    #[test]
    fn dead_end_non_final_is_rejected() {
        let err = build(
            "alphabet={a} states={s,t} initial=s final={} \
             transitions={(s,a,)->(t,)}",
        )
        .unwrap_err();
        assert_eq!(err, CtrParseError::DeadEndState("t"));
    }

    #[test]
    fn unknown_references_are_rejected() {
        assert_eq!(
            build("alphabet={a} states={s} initial=s final={s} transitions={(s,b,)->(s,)}")
                .unwrap_err(),
            CtrParseError::UnknownSymbol("s", "b")
        );
        assert_eq!(
            build("alphabet={a} states={s} initial=s final={s} transitions={(s,a,)->(x,)}")
                .unwrap_err(),
            CtrParseError::UnknownTransitionState("s", "x")
        );
    }
}
