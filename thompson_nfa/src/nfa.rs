use std::ops::Index;

/// A state ID in the FSM table
pub type StateId = usize;

/// Where a transition leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Another state of the table
    State(StateId),
    /// The accepting sentinel, written as `-1`
    Accept,
    /// Placeholder used while building, patched once the enclosing
    /// construct knows where control continues
    Unresolved,
}

impl Target {
    /// The state index this target names, if any
    pub fn state(self) -> Option<StateId> {
        match self {
            Target::State(id) => Some(id),
            Target::Accept | Target::Unresolved => None,
        }
    }

    pub fn is_unresolved(self) -> bool {
        matches!(self, Target::Unresolved)
    }
}

/// What a state does with the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    /// Epsilon fan-out, consumes nothing
    Branch,
    /// Consumes exactly one character equal to the given one
    Literal(char),
    /// Consumes any one character
    Wildcard,
}

/// A single FSM state with up to two successors.
///
/// `next1 == next2` is a straight-through transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    pub kind: StateKind,
    pub next1: Target,
    pub next2: Target,
}

impl State {
    pub fn new(kind: StateKind, next1: Target, next2: Target) -> Self {
        State { kind, next1, next2 }
    }

    /// A state whose successors are still unknown
    pub fn unresolved(kind: StateKind) -> Self {
        State::new(kind, Target::Unresolved, Target::Unresolved)
    }

    pub fn is_branch(&self) -> bool {
        matches!(self.kind, StateKind::Branch)
    }

    /// Returns true for a branch that does not actually branch.
    pub fn is_pass_through(&self) -> bool {
        self.is_branch() && self.next1 == self.next2
    }

    /// Returns true if this state consumes `ch`
    pub fn consumes(&self, ch: char) -> bool {
        match self.kind {
            StateKind::Branch => false,
            StateKind::Literal(lit) => lit == ch,
            StateKind::Wildcard => true,
        }
    }

    /// Iterates over the distinct successors of this state
    pub fn successors(&self) -> impl Iterator<Item = Target> {
        let second = (self.next2 != self.next1).then_some(self.next2);
        std::iter::once(self.next1).chain(second)
    }
}

/// Fragment of an FSM under construction.
///
/// `end` is the state still holding the fragment's unresolved transitions.
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    pub start: StateId,
    pub end: StateId,
}

/// A finite state machine stored as an arena of states.
///
/// The machine is always entered at state 0.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fsm {
    states: Vec<State>,
}

/// Reasons a sequence of states is not a usable table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableDefect {
    Empty,
    DanglingTarget { state: StateId, target: StateId },
    UnresolvedTarget { state: StateId },
}

impl std::fmt::Display for TableDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableDefect::Empty => write!(f, "table has no states"),
            TableDefect::DanglingTarget { state, target } => {
                write!(f, "state {} refers to missing state {}", state, target)
            }
            TableDefect::UnresolvedTarget { state } => {
                write!(f, "state {} has an unresolved transition", state)
            }
        }
    }
}

impl Fsm {
    /// Index every machine is entered at
    pub const START: StateId = 0;

    /// Create an empty table for the builder to fill
    pub fn new() -> Self {
        Fsm { states: Vec::new() }
    }

    /// Build a finished table, checking that every transition is usable.
    pub fn from_states(states: Vec<State>) -> Result<Self, TableDefect> {
        let fsm = Fsm { states };
        fsm.check()?;
        Ok(fsm)
    }

    /// Wrap states without checking them, for diagnostics of broken tables
    pub(crate) fn from_raw(states: Vec<State>) -> Self {
        Fsm { states }
    }

    /// Check that the table is non-empty and every transition is usable.
    pub fn check(&self) -> Result<(), TableDefect> {
        if self.states.is_empty() {
            return Err(TableDefect::Empty);
        }
        for (id, state) in self.states.iter().enumerate() {
            for target in [state.next1, state.next2] {
                match target {
                    Target::State(to) if to >= self.states.len() => {
                        return Err(TableDefect::DanglingTarget { state: id, target: to });
                    }
                    Target::Unresolved => {
                        return Err(TableDefect::UnresolvedTarget { state: id });
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Add a new state and return its ID
    pub fn add_state(&mut self, state: State) -> StateId {
        let id = self.states.len();
        self.states.push(state);
        id
    }

    /// Create a branch state
    pub fn branch(&mut self, next1: Target, next2: Target) -> StateId {
        self.add_state(State::new(StateKind::Branch, next1, next2))
    }

    /// Point every unresolved transition of `from` at `to`
    pub fn connect(&mut self, from: StateId, to: Target) {
        let Some(state) = self.states.get_mut(from) else {
            return;
        };
        if state.next1.is_unresolved() {
            state.next1 = to;
        }
        if state.next2.is_unresolved() {
            state.next2 = to;
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, id: StateId) -> Option<&State> {
        self.states.get(id)
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn into_states(self) -> Vec<State> {
        self.states
    }

    /// Iterate over `(id, state)` pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.states.iter().enumerate()
    }
}

impl Index<StateId> for Fsm {
    type Output = State;

    fn index(&self, id: StateId) -> &State {
        &self.states[id]
    }
}
