//! # Description parser
//! This module parses the textual descriptions of the three recognizer
//! flavors into raw intermediate records. Parsing does not validate
//! cross-references: a parsed description may still name unknown states or
//! symbols, and is turned into a checked machine with [TryInto::try_into]
//! (see [crate::dfa], [crate::ctr] and [crate::dpda]).
//!
//! ## Format
//! A description is a sequence of `key=value` clauses, each appearing exactly
//! once, in this order (whitespace and newlines between tokens are ignored):
//!
//! 1. `alphabet={a,b,…}` — distinct single-character input symbols
//! 2. `states={q,…}` — identifier-named states
//! 3. `initial=q`
//! 4. `final={q,…}` — may be empty, in which case nothing is ever recognized
//! 5. pushdown only: `stack={g,…}` and `bottom=g`
//! 6. `transitions={…}` with flavor-specific transition syntax:
//!    - DFA: `(q,a)->q'`
//!    - counter: `(q,σ,c)->(q',α)` where σ is a symbol, `$` (end of input)
//!      or ε; c is `z` (counter is zero), `p` (positive) or ε (any); α is
//!      `i` (increment), `d` (decrement) or ε (no action)
//!    - pushdown: `(q,σ,g)->(q',w)` where g is the consumed stack top and w
//!      is the possibly-empty string written in its place, bottom first
//!
//! ε may be written as `ε`, as `eps`, or simply left out (`(q,,z)->(q,i)`).
//! Identifiers and symbols consist of `\w`-class characters.
//!
//! ```
//! let parsed = macrofa::parser::dfa("
//!     alphabet = {a, b}
//!     states = {s, t}
//!     initial = s
//!     final = {t}
//!     transitions = {(s,a)->s, (s,b)->t}
//! ").unwrap();
//! assert_eq!(parsed.alphabet, vec!["a", "b"]);
//! assert_eq!(parsed.transitions.len(), 2);
//! ```

mod desc;

use nom::IResult;
use thiserror::Error;

/// A structural parsing failure. The description is consumed clause by
/// clause; the first clause that cannot be read aborts the parse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Malformed '{0}' clause in description")]
    Clause(&'static str),
    #[error("Trailing text after the transitions clause")]
    Trailing,
}

/// An input symbol as written in a transition, before alphabet resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolRef<'a> {
    Sym(&'a str),
    End,
    Eps,
}

/// A counter-state guard as written in a counter transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardRef {
    Any,
    Zero,
    Positive,
}

/// A counter action as written in a counter transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionRef {
    Nop,
    Inc,
    Dec,
}

#[derive(Debug)]
pub struct ParsedDfa<'a> {
    pub alphabet: Vec<&'a str>,
    pub states: Vec<&'a str>,
    pub initial: &'a str,
    pub finals: Vec<&'a str>,
    pub transitions: Vec<ParsedDfaTransition<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct ParsedDfaTransition<'a> {
    pub from: &'a str,
    pub on: &'a str,
    pub to: &'a str,
}

#[derive(Debug)]
pub struct ParsedCtr<'a> {
    pub alphabet: Vec<&'a str>,
    pub states: Vec<&'a str>,
    pub initial: &'a str,
    pub finals: Vec<&'a str>,
    pub transitions: Vec<ParsedCtrTransition<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct ParsedCtrTransition<'a> {
    pub from: &'a str,
    pub on: SymbolRef<'a>,
    pub guard: GuardRef,
    pub to: &'a str,
    pub action: ActionRef,
}

#[derive(Debug)]
pub struct ParsedDpda<'a> {
    pub alphabet: Vec<&'a str>,
    pub states: Vec<&'a str>,
    pub initial: &'a str,
    pub finals: Vec<&'a str>,
    pub stack: Vec<&'a str>,
    pub bottom: &'a str,
    pub transitions: Vec<ParsedDpdaTransition<'a>>,
}

#[derive(Debug, Clone)]
pub struct ParsedDpdaTransition<'a> {
    pub from: &'a str,
    pub on: SymbolRef<'a>,
    pub top: &'a str,
    pub to: &'a str,
    /// Stack symbols written in place of the consumed top, bottom first.
    pub push: Vec<&'a str>,
}

/// Parses a DFA description. The result is a raw [ParsedDfa]; convert it
/// with [TryInto::try_into] to obtain a checked [crate::dfa::Dfa].
pub fn dfa(input: &str) -> Result<ParsedDfa, ParseError> {
    let (rest, (alphabet, states, initial, finals)) = common_clauses(input)?;
    let (rest, transitions) = clause(rest, "transitions", desc::dfa_transitions)?;
    finish(rest)?;
    Ok(ParsedDfa {
        alphabet,
        states,
        initial,
        finals,
        transitions,
    })
}

/// Parses a one-counter automaton description into a raw [ParsedCtr].
pub fn ctr(input: &str) -> Result<ParsedCtr, ParseError> {
    let (rest, (alphabet, states, initial, finals)) = common_clauses(input)?;
    let (rest, transitions) = clause(rest, "transitions", desc::ctr_transitions)?;
    finish(rest)?;
    Ok(ParsedCtr {
        alphabet,
        states,
        initial,
        finals,
        transitions,
    })
}

/// Parses a deterministic pushdown automaton description into a raw
/// [ParsedDpda].
pub fn dpda(input: &str) -> Result<ParsedDpda, ParseError> {
    let (rest, (alphabet, states, initial, finals)) = common_clauses(input)?;
    let (rest, stack) = clause(rest, "stack", desc::stack_clause)?;
    let (rest, bottom) = clause(rest, "bottom", desc::bottom_clause)?;
    let (rest, transitions) = clause(rest, "transitions", desc::dpda_transitions)?;
    finish(rest)?;
    Ok(ParsedDpda {
        alphabet,
        states,
        initial,
        finals,
        stack,
        bottom,
        transitions,
    })
}

type Common<'a> = (Vec<&'a str>, Vec<&'a str>, &'a str, Vec<&'a str>);

fn common_clauses(input: &str) -> Result<(&str, Common), ParseError> {
    let (rest, alphabet) = clause(input, "alphabet", desc::alphabet_clause)?;
    let (rest, states) = clause(rest, "states", desc::states_clause)?;
    let (rest, initial) = clause(rest, "initial", desc::initial_clause)?;
    let (rest, finals) = clause(rest, "final", desc::final_clause)?;
    Ok((rest, (alphabet, states, initial, finals)))
}

fn clause<'a, O>(
    input: &'a str,
    name: &'static str,
    mut parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> Result<(&'a str, O), ParseError> {
    parser(input).map_err(|_| ParseError::Clause(name))
}

fn finish(rest: &str) -> Result<(), ParseError> {
    if rest.trim_start().is_empty() {
        Ok(())
    } else {
        Err(ParseError::Trailing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dfa_description() {
        let parsed = dfa("alphabet={a,b} states={s,t} initial=s final={t} \
                          transitions={(s,a)->s,(s,b)->t}")
            .unwrap();
        assert_eq!(parsed.alphabet, vec!["a", "b"]);
        assert_eq!(parsed.states, vec!["s", "t"]);
        assert_eq!(parsed.initial, "s");
        assert_eq!(parsed.finals, vec!["t"]);
        assert_eq!(parsed.transitions.len(), 2);
        assert_eq!(parsed.transitions[1].on, "b");
        assert_eq!(parsed.transitions[1].to, "t");
    }

    #[test]
    fn whitespace_and_newlines_are_insignificant() {
        let parsed = dfa("\n  alphabet = { a , b }\n  states = { s }\n\
                          initial = s\n  final = { }\n  transitions = { ( s , a ) -> s }\n")
            .unwrap();
        assert!(parsed.finals.is_empty());
        assert_eq!(parsed.transitions[0].from, "s");
    }

    #[test]
    fn clause_order_is_fixed() {
        let err = dfa("states={s} alphabet={a} initial=s final={s} transitions={}")
            .unwrap_err();
        assert_eq!(err, ParseError::Clause("alphabet"));
    }

    #[test]
    fn missing_clause_is_named() {
        let err = dfa("alphabet={a} states={s} final={s} transitions={}").unwrap_err();
        assert_eq!(err, ParseError::Clause("initial"));
    }

    #[test]
    fn trailing_text_is_rejected() {
        let err = dfa("alphabet={a} states={s} initial=s final={s} \
                       transitions={(s,a)->s} garbage")
            .unwrap_err();
        assert_eq!(err, ParseError::Trailing);
    }

    #[test]
    fn ctr_description() {
        let parsed = ctr("alphabet={a,b} states={s,t,f} initial=s final={f} \
                          transitions={(s,a,)->(s,i),(s,b,p)->(t,d),(t,b,p)->(t,d),\
                          (t,$,z)->(f,),(s,$,z)->(f,)}")
            .unwrap();
        assert_eq!(parsed.transitions.len(), 5);
        let t = parsed.transitions[0];
        assert_eq!(t.on, SymbolRef::Sym("a"));
        assert_eq!(t.guard, GuardRef::Any);
        assert_eq!(t.action, ActionRef::Inc);
        let t = parsed.transitions[3];
        assert_eq!(t.on, SymbolRef::End);
        assert_eq!(t.guard, GuardRef::Zero);
        assert_eq!(t.action, ActionRef::Nop);
    }

    #[test]
    fn ctr_eps_spellings() {
        let parsed = ctr("alphabet={a} states={s} initial=s final={s} \
                          transitions={(s,ε,eps)->(s,ε),(s,,)->(s,)}")
            .unwrap();
        for t in &parsed.transitions {
            assert_eq!(t.on, SymbolRef::Eps);
            assert_eq!(t.guard, GuardRef::Any);
            assert_eq!(t.action, ActionRef::Nop);
        }
    }

    #[test]
    fn dpda_description() {
        let parsed = dpda("alphabet={a,b} states={s} initial=s final={s} \
                           stack={Z,X} bottom=Z \
                           transitions={(s,a,Z)->(s,ZX),(s,a,X)->(s,XX),(s,b,X)->(s,)}")
            .unwrap();
        assert_eq!(parsed.stack, vec!["Z", "X"]);
        assert_eq!(parsed.bottom, "Z");
        assert_eq!(parsed.transitions[0].push, vec!["Z", "X"]);
        assert!(parsed.transitions[2].push.is_empty());
    }

    #[test]
    fn dpda_requires_stack_clauses() {
        let err = dpda("alphabet={a} states={s} initial=s final={s} \
                        transitions={}")
            .unwrap_err();
        assert_eq!(err, ParseError::Clause("stack"));
    }

    #[test]
    fn multicharacter_symbol_is_rejected() {
        let err = dfa("alphabet={ab} states={s} initial=s final={s} transitions={}")
            .unwrap_err();
        assert_eq!(err, ParseError::Clause("alphabet"));
    }
}
