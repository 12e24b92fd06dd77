//!# macrofa
//!
//! `macrofa` compiles formal-language recognizers — deterministic finite
//! automata (DFA), one-counter automata (CTR) and deterministic pushdown
//! automata (DPDA) — from a compact textual description into families of C
//! preprocessor header files. The generated recognizer runs entirely inside
//! the host preprocessor: the caller defines an `INPUT` macro encoding the
//! word and includes the flavor's top-level header; after the include, the
//! macro `RECOGNIZED` is defined if and only if the word is in the language.
//! No executable code is emitted at any point.
//!
//! ## Usage
//!
//! ```rust
//! use macrofa::dfa::Dfa;
//!
//! // a*b
//! let description = "
//!     alphabet = {a, b}
//!     states = {s, t}
//!     initial = s
//!     final = {t}
//!     transitions = {(s,a)->s, (s,b)->t}
//! ";
//! // First pass parses without checking validity of the machine
//! let parsed = macrofa::parser::dfa(description).unwrap();
//! // Second step checks all cross-references
//! let dfa: Dfa = parsed.try_into().unwrap();
//! assert!(dfa.accepts(&["a", "a", "b"]));
//!
//! // The header file set, ready to be written to an output directory with
//! // macrofa::emit::write_headers
//! let headers = dfa.emit();
//! assert!(headers.iter().any(|h| h.name() == "dfa.h"));
//! ```
//!
//! ## Description format
//!
//! A description is a fixed-order sequence of `key=value` clauses; see
//! [parser] for the full grammar. For example, a pushdown machine for
//! balanced `a`/`b` blocks:
//!
//! ```text
//! alphabet = {a, b}
//! states = {s}
//! initial = s
//! final = {s}
//! stack = {Z, X}
//! bottom = Z
//! transitions = {
//!     (s,a,Z)->(s,ZX),
//!     (s,a,X)->(s,XX),
//!     (s,b,X)->(s,ε)
//! }
//! ```
//!
//! ## The compiled recognizer
//!
//! Input symbols are packed into `INPUT` as fixed-width bit fields with a
//! leading 1 bit, so the zero-filled tail of the integer reads as an endless
//! end-of-input marker (see [encoding]). For a word `aab` over the example
//! alphabet the caller writes:
//!
//! ```text
//! #define INPUT 0b11'10'10
//! #include "dfa.h"
//! #ifdef RECOGNIZED
//! ...
//! #endif
//! ```
//!
//! The three flavors thread their machine state through the preprocessor
//! differently: the DFA and DPDA advance through the input with `__COUNTER__`
//! (the including translation unit must not use `__COUNTER__` itself), the
//! CTR uses `__INCLUDE_LEVEL__` (its `ctr.h` must be included directly from
//! the top-level translation unit), the counter lives in a small set of
//! flag macros, and the DPDA stack rides on `#line` restamps. The emitted
//! headers are deliberately free of include guards: re-entering a state
//! header is how a state is visited again.
//!
//! ## Operations
//!
//! This library currently supports:
//!
//! * [Parsing](parser) the three description flavors into raw records
//! * Validating them into [Dfa](dfa::Dfa), [Ctr](ctr::Ctr) and
//!   [Dpda](dpda::Dpda) machines, rejecting dangling references, duplicate
//!   DFA transitions and dead-end non-final states
//! * [Atomizing](dpda) multi-symbol pushdown writes into elementary atoms
//! * Step-by-step evaluation of words ([dfa::eval], [ctr::eval],
//!   [dpda::eval]), mainly to let tests pin down the semantics the emitted
//!   headers must realize
//! * Emitting the complete header file set per machine and
//!   [writing it out](emit::write_headers)

pub mod ctr;
pub mod dfa;
pub mod dpda;
pub mod emit;
pub mod encoding;
pub mod parser;
mod table;
