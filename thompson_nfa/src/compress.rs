//! Table compression.
//!
//! The builder leaves a lot of indirection behind: the entry placeholder,
//! merge states after `?` and `|`, and the terminal branch. All of these are
//! branches whose two successors are equal. This pass routes transitions
//! around them and renumbers what is still reachable from the start.

use crate::{
    nfa::{Fsm, State, StateId, TableDefect, Target},
    CompileError, CompileResult,
};

/// Compress a finished table into an equivalent, usually smaller one.
///
/// The result is entered at state 0 like any other table and accepts
/// exactly the same lines. Compressing a compressed table returns it
/// unchanged.
pub fn compress(fsm: Fsm) -> CompileResult<Fsm> {
    let before = fsm.len();
    let mut states = fsm.into_states();
    if states.is_empty() {
        return Err(CompileError::internal(
            TableDefect::Empty.to_string(),
            &Fsm::from_raw(states),
        ));
    }

    // Every round either rewrites at least one transition or stops; a table
    // of n states cannot need more than n rounds unless it loops on itself.
    let mut rounds = 0;
    let pass_through = loop {
        rounds += 1;
        if rounds > states.len() + 1 {
            return Err(CompileError::internal(
                "compression did not converge",
                &Fsm::from_raw(states),
            ));
        }

        let mut changed = canonicalize_start(&mut states);
        let pass_through: Vec<bool> = states
            .iter()
            .enumerate()
            .map(|(id, state)| id != Fsm::START && state.is_pass_through())
            .collect();

        for id in 0..states.len() {
            if pass_through[id] {
                continue;
            }
            let Some((next1, next2)) = redirect(&states, &pass_through, id) else {
                return Err(CompileError::internal(
                    format!("cycle of pass-through states reached from state {}", id),
                    &Fsm::from_raw(states),
                ));
            };
            let state = &mut states[id];
            if (state.next1, state.next2) != (next1, next2) {
                state.next1 = next1;
                state.next2 = next2;
                changed = true;
            }
        }

        if !changed {
            break pass_through;
        }
    };

    let compressed = renumber(&states, &pass_through)?;
    log::debug!(
        "compressed {} states into {} in {} rounds",
        before,
        compressed.len(),
        rounds
    );
    Ok(compressed)
}

/// Moves the real start to index 0 when state 0 only forwards to it.
fn canonicalize_start(states: &mut [State]) -> bool {
    let entry = states[Fsm::START];
    let start = match (entry.is_pass_through(), entry.next1) {
        (true, Target::State(start)) if start != Fsm::START => start,
        _ => return false,
    };

    states.swap(Fsm::START, start);
    let swap = |target: Target| match target {
        Target::State(id) if id == start => Target::State(Fsm::START),
        Target::State(id) if id == Fsm::START => Target::State(start),
        other => other,
    };
    for state in states.iter_mut() {
        state.next1 = swap(state.next1);
        state.next2 = swap(state.next2);
    }
    true
}

/// Computes the new successor pair of `id`, or `None` on a pass-through cycle.
fn redirect(states: &[State], pass_through: &[bool], id: StateId) -> Option<(Target, Target)> {
    let mut next1 = states[id].next1;
    let mut next2 = states[id].next2;

    // A straight-through transition into a branch can take the branch's
    // successors directly.
    let mut steps = 0;
    while next1 == next2 {
        let Some(next) = next1.state() else { break };
        if next == id || !states[next].is_branch() {
            break;
        }
        next1 = states[next].next1;
        next2 = states[next].next2;
        steps += 1;
        if steps > states.len() {
            return None;
        }
    }

    Some((skip(states, pass_through, next1)?, skip(states, pass_through, next2)?))
}

/// Follows `target` past pass-through states.
fn skip(states: &[State], pass_through: &[bool], mut target: Target) -> Option<Target> {
    let mut steps = 0;
    while let Some(id) = target.state().filter(|&id| pass_through[id]) {
        target = states[id].next1;
        steps += 1;
        if steps > states.len() {
            return None;
        }
    }
    Some(target)
}

/// Keeps the states reachable from the start, in their original order.
fn renumber(states: &[State], pass_through: &[bool]) -> CompileResult<Fsm> {
    let mut reachable = vec![false; states.len()];
    reachable[Fsm::START] = true;
    let mut stack = vec![Fsm::START];
    while let Some(id) = stack.pop() {
        for next in states[id].successors().filter_map(Target::state) {
            if pass_through[next] {
                return Err(CompileError::internal(
                    format!("state {} still refers to pass-through state {}", id, next),
                    &Fsm::from_raw(states.to_vec()),
                ));
            }
            if !reachable[next] {
                reachable[next] = true;
                stack.push(next);
            }
        }
    }

    let mut mapping = vec![None; states.len()];
    let mut kept = Vec::new();
    for (id, state) in states.iter().enumerate() {
        if reachable[id] {
            mapping[id] = Some(kept.len());
            kept.push(*state);
        }
    }

    let relabel = |target: Target| match target {
        Target::State(id) => mapping[id].map(Target::State).unwrap_or(Target::Unresolved),
        other => other,
    };
    for state in kept.iter_mut() {
        state.next1 = relabel(state.next1);
        state.next2 = relabel(state.next2);
    }

    let fsm = Fsm::from_raw(kept);
    if let Err(defect) = fsm.check() {
        return Err(CompileError::internal(defect.to_string(), &fsm));
    }
    Ok(fsm)
}
