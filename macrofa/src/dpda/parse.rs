use crate::dpda::atomize::{atomize, RawEdge};
use crate::dpda::{Dpda, DpdaState};
use crate::encoding::InputSymbol;
use crate::parser::{ParsedDpda, ParsedDpdaTransition, SymbolRef};
use crate::dfa::parse::index_unique;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DpdaParseError<'a> {
    #[error("'{0}' appears twice in the alphabet")]
    DuplicateAlphabetSymbol(&'a str),
    #[error("'{0}' appears twice in the stack alphabet")]
    DuplicateStackSymbol(&'a str),
    #[error("State '{0}' defined multiple times")]
    DuplicateStateDefinition(&'a str),
    #[error("Initial state '{0}' does not exist")]
    UnknownInitialState(&'a str),
    #[error("Final state '{0}' does not exist")]
    UnknownFinalState(&'a str),
    #[error("Bottom symbol '{0}' is not in the stack alphabet")]
    UnknownBottom(&'a str),
    #[error("State '{1}' does not exist (in transition from state '{0}')")]
    UnknownTransitionState(&'a str, &'a str),
    #[error("Symbol '{1}' is not in the alphabet (in transition from state '{0}')")]
    UnknownSymbol(&'a str, &'a str),
    #[error("Stack symbol '{1}' is not in the stack alphabet (in transition from state '{0}')")]
    UnknownStackSymbol(&'a str, &'a str),
    #[error("Dead end non-final transition: state '{0}' has no outgoing transitions")]
    DeadEndState(&'a str),
}

impl<'a> TryFrom<ParsedDpda<'a>> for Dpda {
    type Error = DpdaParseError<'a>;

    fn try_from(value: ParsedDpda<'a>) -> Result<Self, Self::Error> {
        use DpdaParseError::*;
        let ParsedDpda {
            alphabet,
            states,
            initial,
            finals,
            stack,
            bottom,
            transitions,
        } = value;

        let sym_map = index_unique(&alphabet).map_err(DuplicateAlphabetSymbol)?;
        let stack_map = index_unique(&stack).map_err(DuplicateStackSymbol)?;
        let state_map = index_unique(&states).map_err(DuplicateStateDefinition)?;

        let initial_state = *state_map.get(initial).ok_or(UnknownInitialState(initial))?;
        let bottom = *stack_map.get(bottom).ok_or(UnknownBottom(bottom))?;

        let mut accepting = vec![false; states.len()];
        for name in finals {
            let idx = state_map.get(name).ok_or(UnknownFinalState(name))?;
            accepting[*idx] = true;
        }

        let mut raw: Vec<(usize, RawEdge)> = Vec::with_capacity(transitions.len());
        let mut has_edge = vec![false; states.len()];
        for ParsedDpdaTransition {
            from,
            on,
            top,
            to,
            push,
        } in transitions
        {
            let from_idx = *state_map
                .get(from)
                .ok_or(UnknownTransitionState(from, from))?;
            let to_idx = *state_map.get(to).ok_or(UnknownTransitionState(from, to))?;
            let on = match on {
                SymbolRef::Sym(sym) => InputSymbol::Sym(
                    *sym_map.get(sym).ok_or(UnknownSymbol(from, sym))?,
                ),
                SymbolRef::End => InputSymbol::End,
                SymbolRef::Eps => InputSymbol::Eps,
            };
            let top = *stack_map.get(top).ok_or(UnknownStackSymbol(from, top))?;
            // every written symbol is checked against Γ, not just the
            // consumed top
            let push = push
                .into_iter()
                .map(|sym| {
                    stack_map
                        .get(sym)
                        .copied()
                        .ok_or(UnknownStackSymbol(from, sym))
                })
                .collect::<Result<Vec<_>, _>>()?;
            has_edge[from_idx] = true;
            raw.push((from_idx, RawEdge { on, top, to: to_idx, push }));
        }

        for (idx, name) in states.iter().enumerate() {
            if !has_edge[idx] && !accepting[idx] {
                return Err(DeadEndState(name));
            }
        }

        let atomized = atomize(&states, raw);

        let mut eps_entered = vec![false; states.len() + atomized.synthetic_names.len()];
        for edges in &atomized.edges {
            for edge in edges {
                if edge.on == InputSymbol::Eps {
                    eps_entered[edge.target] = true;
                }
            }
        }

        let names: Vec<Rc<str>> = states
            .into_iter()
            .map(Rc::from)
            .chain(atomized.synthetic_names)
            .collect();
        let states = names
            .into_iter()
            .zip(atomized.edges)
            .enumerate()
            .map(|(idx, (name, edges))| DpdaState {
                name,
                initial: idx == initial_state,
                accepting: accepting.get(idx).copied().unwrap_or(false),
                eps_entered: eps_entered[idx],
                edges,
            })
            .collect();

        Ok(Dpda {
            alphabet: alphabet.into_iter().map(Rc::from).collect(),
            stack: stack.into_iter().map(Rc::from).collect(),
            bottom,
            states,
            initial_state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dpda::StackAction;
    use crate::parser;

    fn build(input: &str) -> Result<Dpda, DpdaParseError> {
        parser::dpda(input).unwrap().try_into()
    }

    #[test]
    fn balanced_parens_machine_builds_atomized() {
        let dpda = build(
            "alphabet={a,b} states={s} initial=s final={s} stack={Z,X} bottom=Z \
             transitions={(s,a,Z)->(s,ZX),(s,a,X)->(s,XX),(s,b,X)->(s,)}",
        )
        .unwrap();
        // ZX and XX keep the consumed top in place: single push atoms, no
        // synthetic states
        assert_eq!(dpda.states().len(), 1);
        let edges = dpda.states()[0].edges();
        assert_eq!(edges[0].action(), StackAction::Push(1));
        assert_eq!(edges[1].action(), StackAction::Push(1));
        assert_eq!(edges[2].action(), StackAction::Pop);
        assert_eq!(dpda.bottom(), 0);
    }

    #[test]
    fn synthetic_states_are_added_for_long_writes() {
        let dpda = build(
            "alphabet={a} states={s,t} initial=s final={t} stack={Z,X,Y} bottom=Z \
             transitions={(s,a,Z)->(t,XYY)}",
        )
        .unwrap();
        let names: Vec<&str> = dpda.states().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["s", "t", "s.0", "s.1"]);
        assert!(!dpda.states()[2].is_accepting());
        // chain interiors are entered by ε atoms
        assert!(dpda.states()[2].eps_entered || dpda.states()[3].eps_entered);
    }

    #[test]
    fn every_pushed_symbol_is_checked_against_the_stack_alphabet() {
        let err = build(
            "alphabet={a} states={s} initial=s final={s} stack={Z} bottom=Z \
             transitions={(s,a,Z)->(s,ZW)}",
        )
        .unwrap_err();
        assert_eq!(err, DpdaParseError::UnknownStackSymbol("s", "W"));
    }

    #[test]
    fn unknown_bottom_is_rejected() {
        let err = build(
            "alphabet={a} states={s} initial=s final={s} stack={Z} bottom=W \
             transitions={}",
        )
        .unwrap_err();
        assert_eq!(err, DpdaParseError::UnknownBottom("W"));
    }

    #[test]
    fn dead_end_non_final_is_rejected() {
        let err = build(
            "alphabet={a} states={s,t} initial=s final={} stack={Z} bottom=Z \
             transitions={(s,a,Z)->(t,Z)}",
        )
        .unwrap_err();
        assert_eq!(err, DpdaParseError::DeadEndState("t"));
    }
}
