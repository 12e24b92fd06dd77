use crate::dpda::{AtomEdge, Dpda, DpdaState, StackAction};
use crate::encoding::InputSymbol;
use std::collections::HashMap;

/// Step-by-step evaluation of a word against an atomized [Dpda]. A
/// configuration is (state, stack, input position); each step takes the
/// first edge in declaration order whose input symbol matches and whose
/// required top equals the actual top of the stack, mirroring the dispatch
/// ladders of the emitted headers. Nothing matches on an empty stack.
#[derive(Debug, Clone)]
pub struct DpdaEvaluator<'a> {
    dpda: &'a Dpda,
    rev_map: HashMap<&'a str, usize>,
    state: usize,
    stack: Vec<usize>,
    halted: bool,
}

impl<'a> DpdaEvaluator<'a> {
    pub fn current_state(&self) -> &'a DpdaState {
        &self.dpda.states[self.state]
    }

    /// The current stack, bottom first, as indices into the stack alphabet.
    pub fn stack(&self) -> &[usize] {
        &self.stack
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Whether the machine, after [DpdaEvaluator::run], ended in an
    /// accepting state with the input exhausted.
    pub fn is_accepting(&self) -> bool {
        self.halted && self.current_state().accepting
    }

    /// Runs the machine over the whole word until no edge matches. A fuel
    /// bound turns non-consuming ε cycles into rejections (the emitted
    /// headers would exhaust the include depth on such machines).
    pub fn run(&mut self, word: &[&str]) {
        let mut position = 0usize;
        let mut fuel =
            (word.len() + 2) * self.dpda.states.len() * (self.dpda.stack.len() + 2) * 4 + 16;
        loop {
            let at_end = position >= word.len();
            let sym_idx = if at_end {
                None
            } else {
                match self.rev_map.get(word[position]) {
                    Some(idx) => Some(*idx),
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
                StackAction::Pop => {
                    self.stack.pop();
                }
                StackAction::Replace(sym) => {
                    *self.stack.last_mut().expect("matched edge needs a top") = sym;
                }
                StackAction::Push(sym) => self.stack.push(sym),
            }
            self.state = edge.target;
            if edge.on.consumes() && !at_end {
                position += 1;
            }
        }
    }

    fn matching_edge(&self, sym_idx: Option<usize>, at_end: bool) -> Option<AtomEdge> {
        let top = *self.stack.last()?;
        self.current_state()
            .edges
            .iter()
            .find(|edge| {
                let sym_ok = match edge.on {
                    InputSymbol::Sym(idx) => sym_idx == Some(idx),
                    InputSymbol::End => at_end,
                    InputSymbol::Eps => true,
                };
                sym_ok && edge.top == top
            })
            .copied()
    }
}

impl<'a> From<&'a Dpda> for DpdaEvaluator<'a> {
    fn from(dpda: &'a Dpda) -> Self {
        let rev_map = dpda
            .alphabet
            .iter()
            .enumerate()
            .map(|(idx, sym)| (sym as &str, idx))
            .collect();
        DpdaEvaluator {
            dpda,
            rev_map,
            state: dpda.initial_state,
            stack: vec![dpda.bottom],
            halted: false,
        }
    }
}
