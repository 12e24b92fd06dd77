//! # Header emission plumbing
//! Emitters build the complete file set in memory as [Header] values; actually
//! writing them to an output directory is a separate, final step. This keeps
//! the emitters pure (and directly testable) and confines all I/O to
//! [write_headers].

use crate::encoding::Encoding;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("Error creating output directory {0}: {1}")]
    CreateDir(PathBuf, io::Error),
    #[error("Error writing {0}: {1}")]
    WriteFile(PathBuf, io::Error),
}

/// One emitted header file: a name and its lines. Line numbers are tracked
/// while building because the pushdown emitter computes `TOP(L)` offsets from
/// the physical position of each condition relative to the file's `#line`
/// stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    name: String,
    lines: Vec<String>,
}

impl Header {
    pub fn new(name: impl Into<String>) -> Self {
        Header {
            name: name.into(),
            lines: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// The 1-based physical line number that the next [Header::push] will
    /// occupy.
    pub fn next_line(&self) -> usize {
        self.lines.len() + 1
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn contents(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

/// Creates `dir` if absent and writes every header into it. Files are opened
/// one at a time and closed on all paths before the next one is started.
pub fn write_headers(headers: &[Header], dir: &Path) -> Result<(), EmitError> {
    std::fs::create_dir_all(dir).map_err(|e| EmitError::CreateDir(dir.to_path_buf(), e))?;
    for header in headers {
        let path = dir.join(header.name());
        let mut file = File::create(&path).map_err(|e| EmitError::WriteFile(path.clone(), e))?;
        file.write_all(header.contents().as_bytes())
            .map_err(|e| EmitError::WriteFile(path, e))?;
    }
    Ok(())
}

/// The `A_<sym>` macro name of an alphabet symbol.
pub(crate) fn sym_macro(sym: &str) -> String {
    format!("A_{sym}")
}

/// Emits the `A_*` macro block shared by every flavor's top-level header.
pub(crate) fn push_alphabet_defines(header: &mut Header, alphabet: &[Rc<str>], enc: &Encoding) {
    header.push(format!("#define A_SIZE {}", enc.a_size()));
    header.push(format!("#define A_MASK {}", enc.mask()));
    header.push(format!("#define END {}", enc.end()));
    header.push(format!("#define A_NONE {}", enc.none()));
    for (idx, sym) in alphabet.iter().enumerate() {
        header.push(format!("#define {} {}", sym_macro(sym), enc.code(idx)));
    }
}

/// The `get_sym.h` decoder for the `__COUNTER__`-driven flavors (DFA and
/// DPDA).
///
/// Every inclusion must advance `__COUNTER__` by exactly one stride (one
/// condition evaluation per ladder arm, padded in the matched arm), so that
/// `CTR = __COUNTER__ / stride` moves to the next input field exactly once
/// per inclusion no matter which arm matched. Skipped `#elif` arms after a
/// match do not expand their conditions, which is why the matched arm must
/// carry the remaining expansions itself in a dead `#if 0` directive.
pub(crate) fn counter_get_sym(alphabet: &[Rc<str>], enc: &Encoding) -> Header {
    let stride = enc.stride();
    let mut header = Header::new("get_sym.h");
    header.push("#undef CUR_SYM");
    for (pos, arm) in alphabet
        .iter()
        .map(|s| sym_macro(s))
        .chain(std::iter::once("END".to_string()))
        .enumerate()
    {
        let position = pos + 1;
        let guard = if position == 1 { "#if" } else { "#elif" };
        header.push(format!("{guard} GET_SYM == {arm}"));
        header.push(format!("#define CUR_SYM {arm}"));
        let padding = stride - position;
        if padding > 0 {
            let pads: String = " && CTR".repeat(padding);
            header.push(format!("#if 0{pads}"));
            header.push("#endif");
        }
    }
    header.push("#else");
    header.push("#define CUR_SYM A_NONE");
    header.push("#endif");
    header
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alphabet(syms: &[&str]) -> Rc<[Rc<str>]> {
        syms.iter().map(|s| Rc::from(*s)).collect()
    }

    #[test]
    fn header_tracks_physical_lines() {
        let mut header = Header::new("x.h");
        assert_eq!(header.next_line(), 1);
        header.push("#define X 1");
        assert_eq!(header.next_line(), 2);
        assert_eq!(header.contents(), "#define X 1\n");
    }

    #[test]
    fn decoder_pads_every_arm_to_one_stride() {
        let alphabet = alphabet(&["a", "b", "c"]);
        let enc = Encoding::new(alphabet.len());
        let header = counter_get_sym(&alphabet, &enc);
        let text = header.contents();
        // Arm p consumes p condition expansions; padding supplies the rest.
        for (arm, pads) in [("A_a", 3), ("A_b", 2), ("A_c", 1), ("END", 0)] {
            if pads > 0 {
                let pad_line = format!("#if 0{}", " && CTR".repeat(pads));
                assert!(text.contains(&pad_line), "missing pad for {arm}: {pad_line}");
            }
        }
        let total_ctr_mentions = text.matches("CTR").count();
        // 3 pad lines carry 3 + 2 + 1 expansions; conditions mention GET_SYM,
        // not CTR, and expand it through the GET_SYM definition instead.
        assert_eq!(total_ctr_mentions, 6);
        assert!(text.ends_with("#else\n#define CUR_SYM A_NONE\n#endif\n"));
    }
}
