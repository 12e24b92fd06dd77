use crate::dpda::{AtomEdge, StackAction};
use crate::encoding::InputSymbol;
use std::rc::Rc;

/// A transition as validated from the description, before atomization. The
/// written string is bottom first; its last symbol is the resulting top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawEdge {
    pub on: InputSymbol,
    pub top: usize,
    pub to: usize,
    pub push: Vec<usize>,
}

/// The result of atomization: synthetic chain states (appended after the
/// user's states) and the per-state atom edge lists covering both.
pub(crate) struct Atomized {
    pub synthetic_names: Vec<Rc<str>>,
    pub edges: Vec<Vec<AtomEdge>>,
}

/// Rewrites raw transitions into atom transitions. A write of k symbols
/// becomes: nothing extra for k ≤ 1 (a pop or a replace); for k ≥ 2, an
/// optional leading replace (when the bottom-most written symbol differs from
/// the consumed top) followed by one push atom per remaining symbol, threaded
/// through synthetic states. Only the first atom of a chain carries the
/// original input symbol.
pub(crate) fn atomize(state_names: &[&str], raw: Vec<(usize, RawEdge)>) -> Atomized {
    let mut synthetic_names: Vec<Rc<str>> = Vec::new();
    let mut edges: Vec<Vec<AtomEdge>> = vec![Vec::new(); state_names.len()];
    // one counter across the whole machine, so chains out of the same state
    // cannot collide
    let mut next_id = 0usize;

    for (from, RawEdge { on, top, to, push }) in raw {
        match push.as_slice() {
            [] => edges[from].push(AtomEdge {
                on,
                top,
                target: to,
                action: StackAction::Pop,
            }),
            [single] => edges[from].push(AtomEdge {
                on,
                top,
                target: to,
                action: StackAction::Replace(*single),
            }),
            [bottom, rest @ ..] => {
                let mut synthesize = |names: &mut Vec<Rc<str>>, edges: &mut Vec<Vec<AtomEdge>>| {
                    let name = Rc::from(format!("{}.{}", state_names[from], next_id));
                    next_id += 1;
                    names.push(name);
                    edges.push(Vec::new());
                    state_names.len() + names.len() - 1
                };

                let mut cur_state = from;
                let mut cur_on = on;
                let mut cur_top = top;
                if *bottom != top {
                    let step = synthesize(&mut synthetic_names, &mut edges);
                    edges[cur_state].push(AtomEdge {
                        on: cur_on,
                        top: cur_top,
                        target: step,
                        action: StackAction::Replace(*bottom),
                    });
                    cur_state = step;
                    cur_on = InputSymbol::Eps;
                    cur_top = *bottom;
                }
                for (idx, &sym) in rest.iter().enumerate() {
                    let target = if idx == rest.len() - 1 {
                        to
                    } else {
                        synthesize(&mut synthetic_names, &mut edges)
                    };
                    edges[cur_state].push(AtomEdge {
                        on: cur_on,
                        top: cur_top,
                        target,
                        action: StackAction::Push(sym),
                    });
                    cur_state = target;
                    cur_on = InputSymbol::Eps;
                    cur_top = sym;
                }
            }
        }
    }

    Atomized {
        synthetic_names,
        edges,
    }
}
