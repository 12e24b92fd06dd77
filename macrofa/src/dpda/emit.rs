use crate::dpda::{AtomEdge, Dpda, DpdaState, StackAction};
use crate::emit::{self, Header};
use crate::encoding::{Encoding, InputSymbol};

/// Which entry path a state header serves: a fresh arrival (a consuming atom
/// got us here, so the next input symbol must be read) or a continuation
/// after an ε atom (the current symbol was already read and must not be read
/// again).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    Fresh,
    Empty,
}

pub(crate) fn emit(dpda: &Dpda) -> Vec<Header> {
    let enc = Encoding::new(dpda.alphabet.len());
    let mut headers = vec![
        top_header(dpda, &enc),
        emit::counter_get_sym(&dpda.alphabet, &enc),
    ];
    for state in &dpda.states {
        headers.push(state_header(dpda, state, Variant::Fresh));
        if state.eps_entered {
            headers.push(state_header(dpda, state, Variant::Empty));
        }
    }
    headers
}

fn file_name(state: &str, variant: Variant) -> String {
    match variant {
        Variant::Fresh => format!("dpda_{state}.h"),
        Variant::Empty => format!("dpda_{state}_empty.h"),
    }
}

/// The `ST_<g>` macro name of a stack symbol.
fn st_macro(sym: &str) -> String {
    format!("ST_{sym}")
}

/// Stack symbol ids are 1-based Γ indices: they double as `#line` stamps,
/// which must be positive.
fn st_id(idx: usize) -> usize {
    idx + 1
}

fn top_header(dpda: &Dpda, enc: &Encoding) -> Header {
    let mut header = Header::new("dpda.h");
    emit::push_alphabet_defines(&mut header, &dpda.alphabet, enc);
    header.push(format!("#define CTR (__COUNTER__ / {})", enc.stride()));
    header.push("#define GET_SYM ((INPUT >> (CTR * A_SIZE)) & A_MASK)");
    header.push("#define TOP(L) (__LINE__ - (L))");
    for (idx, sym) in dpda.stack.iter().enumerate() {
        header.push(format!("#define {} {}", st_macro(sym), st_id(idx)));
    }
    header.push(format!("#define ST_EMPTY {}", st_id(dpda.stack.len())));
    header.push(format!(
        "#define NEXT_ST_SYM {}",
        st_macro(&dpda.stack[dpda.bottom])
    ));
    header.push(format!(
        "#include \"{}\"",
        file_name(dpda.initial_state().name(), Variant::Fresh)
    ));
    // a pop of the bottom symbol unwinds to here; the stack is empty, so the
    // continuation is stamped with a sentinel no TOP test can match
    header.push("#ifdef POP");
    header.push("#undef POP");
    header.push("#undef NEXT_ST_SYM");
    header.push("#define NEXT_ST_SYM ST_EMPTY");
    header.push("#include NEXT_STATE");
    header.push("#endif");
    header
}

/// One state header. Physical line 1 restamps the file with the entry
/// top-of-stack, so every `TOP(L)` below reads that stamp back when L is the
/// line's distance from the stamp. The emitter computes each distance from
/// the tracked physical position: a line at physical ℓ sees
/// `__LINE__ == stamp + ℓ - 2`.
fn state_header(dpda: &Dpda, state: &DpdaState, variant: Variant) -> Header {
    let mut header = Header::new(file_name(state.name(), variant));
    header.push("#line NEXT_ST_SYM");
    if variant == Variant::Fresh {
        header.push("#include \"get_sym.h\"");
    }
    if state.accepting {
        header.push("#define RECOGNIZED");
    }

    let mut arm = 0usize;
    for edge in &state.edges {
        let guard = if arm == 0 { "#if" } else { "#elif" };
        arm += 1;
        header.push(format!("{guard} {}", condition(dpda, edge, &header)));
        if state.accepting {
            header.push("#undef RECOGNIZED");
        }
        push_action(dpda, edge, &mut header);
    }
    if state.accepting {
        let guard = if arm == 0 { "#if" } else { "#elif" };
        arm += 1;
        header.push(format!("{guard} CUR_SYM != END"));
        header.push("#undef RECOGNIZED");
    }
    if arm > 0 {
        header.push("#endif");
    }
    header
}

fn condition(dpda: &Dpda, edge: &AtomEdge, header: &Header) -> String {
    let top_test = format!(
        "TOP({}) == {}",
        header.next_line() - 2,
        st_macro(&dpda.stack[edge.top])
    );
    match edge.on {
        InputSymbol::Sym(idx) => format!(
            "CUR_SYM == {} && {top_test}",
            emit::sym_macro(&dpda.alphabet[idx])
        ),
        InputSymbol::End => format!("CUR_SYM == END && {top_test}"),
        InputSymbol::Eps => top_test,
    }
}

fn push_action(dpda: &Dpda, edge: &AtomEdge, header: &mut Header) {
    let successor = file_name(
        dpda.states[edge.target].name(),
        if edge.on.consumes() {
            Variant::Fresh
        } else {
            Variant::Empty
        },
    );
    match edge.action {
        StackAction::Push(sym) => {
            header.push("#undef NEXT_ST_SYM");
            header.push(format!("#define NEXT_ST_SYM {}", st_macro(&dpda.stack[sym])));
            header.push(format!("#include \"{successor}\""));
            // if the pushed symbol gets popped, the run resumes at this
            // file's stack level: re-read our stamp as the exposed top and
            // enter the popper's target here
            header.push("#ifdef POP");
            header.push("#undef POP");
            header.push("#undef NEXT_ST_SYM");
            for (idx, sym) in dpda.stack.iter().enumerate() {
                let guard = if idx == 0 { "#if" } else { "#elif" };
                header.push(format!(
                    "{guard} TOP({}) == {}",
                    header.next_line() - 2,
                    st_macro(sym)
                ));
                header.push(format!("#define NEXT_ST_SYM {}", st_macro(sym)));
            }
            header.push("#endif");
            header.push("#ifdef NEXT_ST_SYM");
            header.push("#include NEXT_STATE");
            header.push("#endif");
            header.push("#endif");
        }
        StackAction::Replace(sym) => {
            // same stack level: our own stamp goes stale, so a later pop
            // must fall through this file to the original pusher — no catch
            header.push("#undef NEXT_ST_SYM");
            header.push(format!("#define NEXT_ST_SYM {}", st_macro(&dpda.stack[sym])));
            header.push(format!("#include \"{successor}\""));
        }
        StackAction::Pop => {
            header.push("#undef NEXT_STATE");
            header.push(format!("#define NEXT_STATE \"{successor}\""));
            header.push("#define POP");
        }
    }
}
