use crate::ctr::{Ctr, CtrAction, CtrEdge, CtrState, Guard};
use crate::encoding::InputSymbol;
use std::collections::HashMap;

/// Step-by-step evaluation of a word against a [Ctr]. A configuration is
/// (state, counter, input position); each step takes the first edge in
/// declaration order whose symbol and guard match, mirroring the dispatch
/// ladders of the emitted headers.
#[derive(Debug, Clone)]
pub struct CtrEvaluator<'a> {
    ctr: &'a Ctr,
    rev_map: HashMap<&'a str, usize>,
    state: usize,
    counter: u64,
    halted: bool,
}

impl<'a> CtrEvaluator<'a> {
    pub fn current_state(&self) -> &'a CtrState {
        &self.ctr.states[self.state]
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// True once no edge of the current state matches any more.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Whether the machine, after [CtrEvaluator::run], ended in an accepting
    /// state. Only meaningful once halted with the input exhausted, which is
    /// what `run` guarantees on a halt.
    pub fn is_accepting(&self) -> bool {
        self.halted && self.current_state().accepting
    }

    /// Runs the machine over the whole word until no edge matches. An
    /// ε-cycle that never consumes would run forever (just like the emitted
    /// headers would exhaust the include depth), so a fuel bound makes such
    /// machines reject instead.
    pub fn run(&mut self, word: &[&str]) {
        let mut position = 0usize;
        let mut fuel = (word.len() + 2) * self.ctr.states.len() * 4 + 16;
        loop {
            let at_end = position >= word.len();
            let sym_idx = if at_end {
                None
            } else {
                match self.rev_map.get(word[position]) {
                    Some(idx) => Some(*idx),
                    // unknown symbol: nothing can match it
                    None => return,
                }
            };
            let Some(edge) = self.matching_edge(sym_idx, at_end) else {
                self.halted = at_end;
                return;
            };
            if fuel == 0 {
                return;
            }
            fuel -= 1;
            match edge.action {
                CtrAction::Nop => {}
                CtrAction::Inc => self.counter += 1,
                CtrAction::Dec => self.counter = self.counter.saturating_sub(1),
            }
            self.state = edge.target;
            if edge.on.consumes() && !at_end {
                position += 1;
            }
        }
    }

    fn matching_edge(&self, sym_idx: Option<usize>, at_end: bool) -> Option<CtrEdge> {
        self.current_state()
            .edges
            .iter()
            .find(|edge| {
                let sym_ok = match edge.on {
                    InputSymbol::Sym(idx) => sym_idx == Some(idx),
                    InputSymbol::End => at_end,
                    InputSymbol::Eps => true,
                };
                let guard_ok = match edge.guard {
                    Guard::Any => true,
                    Guard::Zero => self.counter == 0,
                    Guard::Positive => self.counter > 0,
                };
                sym_ok && guard_ok
            })
            .copied()
    }
}

impl<'a> From<&'a Ctr> for CtrEvaluator<'a> {
    fn from(ctr: &'a Ctr) -> Self {
        let rev_map = ctr
            .alphabet
            .iter()
            .enumerate()
            .map(|(idx, sym)| (sym as &str, idx))
            .collect();
        CtrEvaluator {
            ctr,
            rev_map,
            state: ctr.initial_state,
            counter: 0,
            halted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ctr::Ctr;
    use crate::parser;

    fn anbn() -> Ctr {
        parser::ctr(
            "alphabet={a,b} states={s,t,f} initial=s final={f} \
             transitions={(s,a,)->(s,i),(s,b,p)->(t,d),(s,$,z)->(f,),\
             (t,b,p)->(t,d),(t,$,z)->(f,)}",
        )
        .unwrap()
        .try_into()
        .unwrap()
    }

    #[test]
    fn accepts_balanced_words() {
        let ctr = anbn();
        assert!(ctr.accepts(&[]));
        assert!(ctr.accepts(&["a", "b"]));
        assert!(ctr.accepts(&["a", "a", "a", "b", "b", "b"]));
    }

    #[test]
    fn rejects_unbalanced_words() {
        let ctr = anbn();
        assert!(!ctr.accepts(&["a"]));
        assert!(!ctr.accepts(&["b"]));
        assert!(!ctr.accepts(&["a", "a", "b"]));
        assert!(!ctr.accepts(&["a", "b", "b"]));
        assert!(!ctr.accepts(&["b", "a"]));
    }

    #[test]
    fn eps_cycle_rejects_instead_of_spinning() {
        let ctr: Ctr = parser::ctr(
            "alphabet={a} states={s,t} initial=s final={t} \
             transitions={(s,ε,)->(t,),(t,ε,)->(s,)}",
        )
        .unwrap()
        .try_into()
        .unwrap();
        assert!(!ctr.accepts(&[]));
    }
}
