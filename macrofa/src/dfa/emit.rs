use crate::dfa::Dfa;
use crate::emit::{self, Header};
use crate::encoding::Encoding;

pub(crate) fn emit(dfa: &Dfa) -> Vec<Header> {
    let enc = Encoding::new(dfa.alphabet.len());
    let mut headers = vec![
        top_header(dfa, &enc),
        emit::counter_get_sym(&dfa.alphabet, &enc),
    ];
    headers.extend(dfa.states.iter().map(|state| state_header(dfa, state)));
    headers
}

fn file_name(state: &str) -> String {
    format!("dfa_{state}.h")
}

fn top_header(dfa: &Dfa, enc: &Encoding) -> Header {
    let mut header = Header::new("dfa.h");
    emit::push_alphabet_defines(&mut header, &dfa.alphabet, enc);
    header.push(format!("#define CTR (__COUNTER__ / {})", enc.stride()));
    header.push("#define GET_SYM ((INPUT >> (CTR * A_SIZE)) & A_MASK)");
    header.push(format!(
        "#include \"{}\"",
        file_name(dfa.initial_state().name())
    ));
    header
}

/// One state header. The decoder is included first (advancing the input
/// position), then for a final state `RECOGNIZED` is defined optimistically:
/// every dispatch arm revokes it before following its edge, and the trailing
/// arm revokes it when input remains but nothing matched, so it survives
/// exactly when the word ends here.
fn state_header(dfa: &Dfa, state: &crate::dfa::DfaState) -> Header {
    let mut header = Header::new(file_name(state.name()));
    header.push("#include \"get_sym.h\"");
    if state.accepting {
        header.push("#define RECOGNIZED");
    }

    let mut arm = 0usize;
    for (sym_idx, target) in state.transitions.iter().enumerate() {
        let Some(target) = target else { continue };
        let guard = if arm == 0 { "#if" } else { "#elif" };
        arm += 1;
        header.push(format!(
            "{guard} CUR_SYM == {}",
            emit::sym_macro(&dfa.alphabet[sym_idx])
        ));
        if state.accepting {
            header.push("#undef RECOGNIZED");
        }
        header.push(format!(
            "#include \"{}\"",
            file_name(dfa.states[*target].name())
        ));
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn a_star_b() -> Dfa {
        parser::dfa(
            "alphabet={a,b} states={s,t} initial=s final={t} \
             transitions={(s,a)->s,(s,b)->t}",
        )
        .unwrap()
        .try_into()
        .unwrap()
    }

    #[test]
    fn file_set_is_complete() {
        let headers = emit(&a_star_b());
        let names: Vec<&str> = headers.iter().map(|h| h.name()).collect();
        assert_eq!(names, vec!["dfa.h", "get_sym.h", "dfa_s.h", "dfa_t.h"]);
    }

    #[test]
    fn top_header_defines_the_contract() {
        let headers = emit(&a_star_b());
        let top = headers[0].contents();
        assert!(top.contains("#define A_SIZE 2"));
        assert!(top.contains("#define A_MASK 3"));
        assert!(top.contains("#define A_a 2"));
        assert!(top.contains("#define A_b 3"));
        assert!(top.contains("#define END 0"));
        assert!(top.contains("#define CTR (__COUNTER__ / 3)"));
        assert!(top.ends_with("#include \"dfa_s.h\"\n"));
    }

    #[test]
    fn nonfinal_state_has_no_recognized_handling() {
        let headers = emit(&a_star_b());
        let s = headers.iter().find(|h| h.name() == "dfa_s.h").unwrap();
        assert!(!s.contents().contains("RECOGNIZED"));
        assert_eq!(
            s.contents(),
            "#include \"get_sym.h\"\n\
             #if CUR_SYM == A_a\n\
             #include \"dfa_s.h\"\n\
             #elif CUR_SYM == A_b\n\
             #include \"dfa_t.h\"\n\
             #endif\n"
        );
    }

    #[test]
    fn final_sink_keeps_recognized_only_at_end() {
        let headers = emit(&a_star_b());
        let t = headers.iter().find(|h| h.name() == "dfa_t.h").unwrap();
        assert_eq!(
            t.contents(),
            "#include \"get_sym.h\"\n\
             #define RECOGNIZED\n\
             #if CUR_SYM != END\n\
             #undef RECOGNIZED\n\
             #endif\n"
        );
    }
}
