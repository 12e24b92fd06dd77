use crate::ctr::{Ctr, CtrAction, CtrEdge, CtrState, Guard};
use crate::emit::{self, Header};
use crate::encoding::{Encoding, InputSymbol};

/// Width of the macro-flag binary counter. Bounded by the reachable include
/// depth long before these bits run out.
const COUNTER_BITS: usize = 16;

/// Include chain sitting above the symbol decoder when the caller includes
/// `ctr.h` from the top-level translation unit. `__INCLUDE_LEVEL__` minus
/// this depth is the 0-based input position being decoded.
fn wrapper_depth() -> usize {
    ["ctr.h", "ctr_<state>.h", "get_sym.h"].len()
}

pub(crate) fn emit(ctr: &Ctr) -> Vec<Header> {
    let enc = Encoding::new(ctr.alphabet.len());
    let mut headers = vec![
        top_header(ctr, &enc),
        get_sym(ctr),
        init_ctr(),
        stab(),
        inc(),
        dec(),
        advance_msb(),
        advance_lsb(),
        next2pow(),
    ];
    for state in &ctr.states {
        headers.push(state_header(ctr, state, true));
        if state.eps_entered {
            headers.push(state_header(ctr, state, false));
        }
    }
    headers
}

fn file_name(state: &str, consuming: bool) -> String {
    if consuming {
        format!("ctr_{state}.h")
    } else {
        format!("ctr_{state}_no_consume.h")
    }
}

fn top_header(ctr: &Ctr, enc: &Encoding) -> Header {
    let mut header = Header::new("ctr.h");
    emit::push_alphabet_defines(&mut header, &ctr.alphabet, enc);
    header.push(format!(
        "#define GET_SYM ((INPUT >> ((__INCLUDE_LEVEL__ - {}) * A_SIZE)) & A_MASK)",
        wrapper_depth()
    ));
    header.push("#include \"init_ctr.h\"");
    header.push(format!(
        "#include \"{}\"",
        file_name(ctr.initial_state().name(), true)
    ));
    header
}

/// The decoder. Unlike the `__COUNTER__` flavors there is no stabilization:
/// the input position is wherever the include level says it is.
fn get_sym(ctr: &Ctr) -> Header {
    let mut header = Header::new("get_sym.h");
    header.push("#undef CUR_SYM");
    for (pos, arm) in ctr
        .alphabet
        .iter()
        .map(|s| emit::sym_macro(s))
        .chain(std::iter::once("END".to_string()))
        .enumerate()
    {
        let guard = if pos == 0 { "#if" } else { "#elif" };
        header.push(format!("{guard} GET_SYM == {arm}"));
        header.push(format!("#define CUR_SYM {arm}"));
    }
    header.push("#else");
    header.push("#define CUR_SYM A_NONE");
    header.push("#endif");
    header
}

/// One state header. `consuming` selects the fresh-arrival variant (which
/// reads the next input symbol and anchors the include level) over the
/// `_no_consume` continuation entered by ε edges (which must re-dispatch on
/// the symbol already read by its consuming ancestor).
fn state_header(ctr: &Ctr, state: &CtrState, consuming: bool) -> Header {
    let mut header = Header::new(file_name(state.name(), consuming));
    if consuming {
        header.push("#include \"get_sym.h\"");
    }
    if state.accepting {
        header.push("#define RECOGNIZED");
    }

    let mut arm = 0usize;
    for edge in &state.edges {
        let guard = if arm == 0 { "#if" } else { "#elif" };
        arm += 1;
        header.push(format!("{guard} {}", condition(ctr, edge)));
        if state.accepting {
            header.push("#undef RECOGNIZED");
        }
        match edge.action {
            CtrAction::Nop => {}
            CtrAction::Inc => header.push("#include \"inc.h\""),
            CtrAction::Dec => header.push("#include \"dec.h\""),
        }
        let target = ctr.states[edge.target].name();
        if !edge.on.consumes() {
            // ε edge: continue at the same input position
            header.push(format!("#include \"{}\"", file_name(target, false)));
        } else if consuming {
            header.push(format!("#include \"{}\"", file_name(target, true)));
        } else {
            // A continuation header sits at an inflated include level, so the
            // consuming successor is deferred to the consuming ancestor's
            // shim, which includes it at the anchored level.
            header.push("#undef NEXT_STATE");
            header.push(format!("#define NEXT_STATE \"{}\"", file_name(target, true)));
            header.push("#define CONSUME");
        }
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
    if consuming {
        header.push("#ifdef CONSUME");
        header.push("#undef CONSUME");
        header.push("#include NEXT_STATE");
        header.push("#endif");
    }
    header
}

fn condition(ctr: &Ctr, edge: &CtrEdge) -> String {
    let mut parts = Vec::with_capacity(2);
    match edge.on {
        InputSymbol::Sym(idx) => {
            parts.push(format!("CUR_SYM == {}", emit::sym_macro(&ctr.alphabet[idx])))
        }
        InputSymbol::End => parts.push("CUR_SYM == END".to_string()),
        InputSymbol::Eps => {}
    }
    match edge.guard {
        Guard::Any => {}
        Guard::Zero => parts.push("IS_ZERO".to_string()),
        Guard::Positive => parts.push("!IS_ZERO".to_string()),
    }
    if parts.is_empty() {
        "1".to_string()
    } else {
        parts.join(" && ")
    }
}

fn init_ctr() -> Header {
    let mut header = Header::new("init_ctr.h");
    header.push("#include \"stab.h\"");
    for bit in 0..COUNTER_BITS {
        header.push(format!("#undef CNT{bit}"));
    }
    header.push("#undef IS_ZERO");
    header.push("#define IS_ZERO 1");
    header
}

/// Pads `__COUNTER__` to the next multiple of four so files doing counter
/// arithmetic can rely on modular alignment.
fn stab() -> Header {
    let mut header = Header::new("stab.h");
    header.push("#if (__COUNTER__ & 3) != 0");
    header.push("#include \"stab.h\"");
    header.push("#endif");
    header
}

fn inc() -> Header {
    let mut header = Header::new("inc.h");
    header.push("#include \"stab.h\"");
    header.push("#undef IS_ZERO");
    header.push("#define IS_ZERO 0");
    header.push("#ifndef CNT0");
    header.push("#define CNT0");
    header.push("#else");
    header.push("#undef CNT0");
    header.push("#include \"advance_msb.h\"");
    header.push("#endif");
    header
}

fn dec() -> Header {
    let mut header = Header::new("dec.h");
    header.push("#include \"stab.h\"");
    header.push("#ifdef CNT0");
    header.push("#undef CNT0");
    header.push("#else");
    header.push("#define CNT0");
    header.push("#include \"advance_lsb.h\"");
    header.push("#endif");
    header.push("#include \"next2pow.h\"");
    header
}

/// Carry walk toward the most significant bit: the lowest clear bit above
/// bit 0 is set and everything below it has been cleared by the callers.
fn advance_msb() -> Header {
    let mut header = Header::new("advance_msb.h");
    for bit in 1..COUNTER_BITS {
        header.push(format!("#ifndef CNT{bit}"));
        header.push(format!("#define CNT{bit}"));
        header.push("#else");
        header.push(format!("#undef CNT{bit}"));
    }
    for _ in 1..COUNTER_BITS {
        header.push("#endif");
    }
    header
}

/// Borrow walk toward the most significant bit: the lowest set bit above
/// bit 0 is cleared and everything below it has been set by the callers.
fn advance_lsb() -> Header {
    let mut header = Header::new("advance_lsb.h");
    for bit in 1..COUNTER_BITS {
        header.push(format!("#ifdef CNT{bit}"));
        header.push(format!("#undef CNT{bit}"));
        header.push("#else");
        header.push(format!("#define CNT{bit}"));
    }
    for _ in 1..COUNTER_BITS {
        header.push("#endif");
    }
    header
}

/// Re-derives `IS_ZERO` after a decrement: the counter is back at zero iff
/// no bit remains set.
fn next2pow() -> Header {
    let mut header = Header::new("next2pow.h");
    header.push("#undef IS_ZERO");
    let all_bits = (0..COUNTER_BITS)
        .map(|bit| format!("defined(CNT{bit})"))
        .collect::<Vec<_>>()
        .join(" || ");
    header.push(format!("#if {all_bits}"));
    header.push("#define IS_ZERO 0");
    header.push("#else");
    header.push("#define IS_ZERO 1");
    header.push("#endif");
    header
}
