use crate::nfa::{Fsm, StateId, StateKind, Target};
use std::collections::{HashSet, VecDeque};

/// An entry of the simulation worklist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Work {
    Visit(Target),
    /// Separates work for the current position from work for the next one
    Scan,
}

/// A matcher that simulates an FSM table against lines of text.
///
/// Every start offset of a line is tried, and all attempts run in the same
/// pass: each position seeds a fresh thread at state 0 behind the threads
/// carried over from earlier positions.
pub struct Matcher<'a> {
    nfa: &'a Fsm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    /// Character position at which acceptance was reached
    pub end: usize,
    /// No character of the line had been consumed when the match was found
    pub without_char: bool,
}

impl<'a> Matcher<'a> {
    /// Create a new matcher for the given table
    pub fn new(nfa: &'a Fsm) -> Self {
        Self { nfa }
    }

    /// Returns true if any substring of `line` matches
    pub fn is_match(&self, line: &str) -> bool {
        self.find(line).is_some()
    }

    /// Find the first position at which some substring of `line` matches
    pub fn find(&self, line: &str) -> Option<MatchResult> {
        let mut sim = Simulation::new(self.nfa);
        let mut position = 0;
        for ch in line.chars() {
            if let Some(found) = sim.step(position, Some(ch)) {
                return Some(found);
            }
            position += 1;
        }
        // Threads waiting for another character can still accept through
        // branches alone.
        sim.step(position, None)
    }
}

struct Simulation<'a> {
    nfa: &'a Fsm,
    queue: VecDeque<Work>,
    visited: HashSet<StateId>,
    consumed: bool,
}

impl<'a> Simulation<'a> {
    fn new(nfa: &'a Fsm) -> Self {
        Self {
            nfa,
            queue: VecDeque::new(),
            visited: HashSet::new(),
            consumed: false,
        }
    }

    /// Runs every thread at `position` against `ch`, `None` being the end of
    /// the line.
    fn step(&mut self, position: usize, ch: Option<char>) -> Option<MatchResult> {
        self.queue.push_back(Work::Visit(Target::State(Fsm::START)));
        self.queue.push_back(Work::Scan);

        let found = self.scan(ch).then_some(MatchResult {
            end: position,
            without_char: !self.consumed,
        });
        self.visited.clear();
        if found.is_some() {
            log::trace!("accepted at position {}", position);
        }
        found
    }

    /// Pops work up to the scan marker. Returns true on acceptance.
    fn scan(&mut self, ch: Option<char>) -> bool {
        while let Some(Work::Visit(target)) = self.queue.pop_front() {
            let id = match target {
                Target::Accept => return true,
                Target::State(id) => id,
                Target::Unresolved => continue,
            };
            if !self.visited.insert(id) {
                continue;
            }

            // States outside the table are dead ends.
            let nfa = self.nfa;
            let Some(state) = nfa.get(id) else {
                continue;
            };
            match (state.kind, ch) {
                (StateKind::Branch, _) => {
                    for next in state.successors() {
                        self.queue.push_front(Work::Visit(next));
                    }
                }
                (_, Some(ch)) if state.consumes(ch) => {
                    self.consumed = true;
                    for next in state.successors() {
                        self.queue.push_back(Work::Visit(next));
                    }
                }
                _ => {}
            }
        }
        false
    }
}
