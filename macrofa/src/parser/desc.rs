use crate::parser::{
    ActionRef, GuardRef, ParsedCtrTransition, ParsedDfaTransition, ParsedDpdaTransition,
    SymbolRef,
};
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::{char, multispace0};
use nom::combinator::{map, opt, value};
use nom::error::{Error, ErrorKind};
use nom::multi::{many0, separated_list0};
use nom::sequence::{delimited, preceded, tuple};
use nom::IResult;
use unicode_segmentation::UnicodeSegmentation;

pub(crate) fn alphabet_clause(input: &str) -> IResult<&str, Vec<&str>> {
    keyed("alphabet", symbol_set)(input)
}

pub(crate) fn states_clause(input: &str) -> IResult<&str, Vec<&str>> {
    keyed("states", ident_set)(input)
}

pub(crate) fn initial_clause(input: &str) -> IResult<&str, &str> {
    keyed("initial", tok(ident))(input)
}

pub(crate) fn final_clause(input: &str) -> IResult<&str, Vec<&str>> {
    keyed("final", ident_set)(input)
}

pub(crate) fn stack_clause(input: &str) -> IResult<&str, Vec<&str>> {
    keyed("stack", symbol_set)(input)
}

pub(crate) fn bottom_clause(input: &str) -> IResult<&str, &str> {
    keyed("bottom", tok(sym_char))(input)
}

pub(crate) fn dfa_transitions(input: &str) -> IResult<&str, Vec<ParsedDfaTransition>> {
    keyed("transitions", set(dfa_transition))(input)
}

pub(crate) fn ctr_transitions(input: &str) -> IResult<&str, Vec<ParsedCtrTransition>> {
    keyed("transitions", set(ctr_transition))(input)
}

pub(crate) fn dpda_transitions(input: &str) -> IResult<&str, Vec<ParsedDpdaTransition>> {
    keyed("transitions", set(dpda_transition))(input)
}

fn dfa_transition(input: &str) -> IResult<&str, ParsedDfaTransition> {
    map(
        tuple((
            tok(char('(')),
            tok(ident),
            tok(char(',')),
            tok(sym_char),
            tok(char(')')),
            tok(tag("->")),
            tok(ident),
        )),
        |(_, from, _, on, _, _, to)| ParsedDfaTransition { from, on, to },
    )(input)
}

fn ctr_transition(input: &str) -> IResult<&str, ParsedCtrTransition> {
    map(
        tuple((
            tok(char('(')),
            tok(ident),
            tok(char(',')),
            input_symbol,
            tok(char(',')),
            guard,
            tok(char(')')),
            tok(tag("->")),
            tok(char('(')),
            tok(ident),
            tok(char(',')),
            action,
            tok(char(')')),
        )),
        |(_, from, _, on, _, guard, _, _, _, to, _, action, _)| ParsedCtrTransition {
            from,
            on,
            guard,
            to,
            action,
        },
    )(input)
}

fn dpda_transition(input: &str) -> IResult<&str, ParsedDpdaTransition> {
    map(
        tuple((
            tok(char('(')),
            tok(ident),
            tok(char(',')),
            input_symbol,
            tok(char(',')),
            tok(sym_char),
            tok(char(')')),
            tok(tag("->")),
            tok(char('(')),
            tok(ident),
            tok(char(',')),
            push_string,
            tok(char(')')),
        )),
        |(_, from, _, on, _, top, _, _, _, to, _, push, _)| ParsedDpdaTransition {
            from,
            on,
            top,
            to,
            push,
        },
    )(input)
}

/// A transition's input symbol: `$`, ε (also spelled `eps` or left out
/// entirely), or a single alphabet symbol.
fn input_symbol(input: &str) -> IResult<&str, SymbolRef> {
    map(
        preceded(
            multispace0,
            opt(alt((
                value(SymbolRef::End, char('$')),
                value(SymbolRef::Eps, eps),
                map(sym_char, SymbolRef::Sym),
            ))),
        ),
        |sym| sym.unwrap_or(SymbolRef::Eps),
    )(input)
}

fn guard(input: &str) -> IResult<&str, GuardRef> {
    map(
        preceded(
            multispace0,
            opt(alt((
                value(GuardRef::Zero, char('z')),
                value(GuardRef::Positive, char('p')),
                value(GuardRef::Any, eps),
            ))),
        ),
        |guard| guard.unwrap_or(GuardRef::Any),
    )(input)
}

fn action(input: &str) -> IResult<&str, ActionRef> {
    map(
        preceded(
            multispace0,
            opt(alt((
                value(ActionRef::Inc, char('i')),
                value(ActionRef::Dec, char('d')),
                value(ActionRef::Nop, eps),
            ))),
        ),
        |action| action.unwrap_or(ActionRef::Nop),
    )(input)
}

/// The string written onto the stack, bottom first. ε/`eps` denote the empty
/// string (so a push string cannot spell the sequence e·p·s; write it with
/// whitespace between the symbols if ever needed).
fn push_string(input: &str) -> IResult<&str, Vec<&str>> {
    preceded(
        multispace0,
        alt((value(Vec::new(), eps), many0(tok(sym_char)))),
    )(input)
}

fn keyed<'a, O>(
    name: &'static str,
    val: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> impl FnMut(&'a str) -> IResult<&'a str, O> {
    preceded(tuple((tok(tag(name)), tok(char('=')))), val)
}

fn set<'a, O>(
    elem: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> impl FnMut(&'a str) -> IResult<&'a str, Vec<O>> {
    delimited(
        tok(char('{')),
        separated_list0(tok(char(',')), elem),
        tok(char('}')),
    )
}

fn symbol_set(input: &str) -> IResult<&str, Vec<&str>> {
    set(tok(sym_char))(input)
}

fn ident_set(input: &str) -> IResult<&str, Vec<&str>> {
    set(tok(ident))(input)
}

fn tok<'a, O>(
    inner: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> impl FnMut(&'a str) -> IResult<&'a str, O> {
    preceded(multispace0, inner)
}

fn ident(input: &str) -> IResult<&str, &str> {
    take_while1(is_word_char)(input)
}

/// Exactly one `\w`-class grapheme cluster.
fn sym_char(input: &str) -> IResult<&str, &str> {
    match input.grapheme_indices(true).next() {
        Some((0, g)) if g.chars().all(is_word_char) => Ok((&input[g.len()..], g)),
        _ => Err(nom::Err::Error(Error::new(input, ErrorKind::Char))),
    }
}

fn eps(input: &str) -> IResult<&str, ()> {
    value((), alt((tag("ε"), tag("eps"))))(input)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_transition_forms() {
        let (rest, t) = dfa_transition("(s,a)->t").unwrap();
        assert!(rest.is_empty());
        assert_eq!((t.from, t.on, t.to), ("s", "a", "t"));

        let (_, t) = ctr_transition("(s,$,z)->(f,)").unwrap();
        assert_eq!(t.on, SymbolRef::End);
        assert_eq!(t.guard, GuardRef::Zero);
        assert_eq!(t.action, ActionRef::Nop);

        let (_, t) = dpda_transition("(s,a,Z)->(t,ZXX)").unwrap();
        assert_eq!(t.top, "Z");
        assert_eq!(t.push, vec!["Z", "X", "X"]);

        let (_, t) = dpda_transition("(s,b,X)->(t,ε)").unwrap();
        assert!(t.push.is_empty());
    }

    #[test]
    fn eps_is_not_an_alphabet_symbol() {
        // "eps" in symbol position denotes ε, never a symbol.
        let (_, t) = ctr_transition("(s,eps,)->(s,)").unwrap();
        assert_eq!(t.on, SymbolRef::Eps);
    }
}
