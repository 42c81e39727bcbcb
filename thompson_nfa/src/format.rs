//! Textual form of an FSM table.
//!
//! One state per line, `index,type,next1,next2`, where `type` is `BR` for
//! a branch, `WC` for the wildcard, or the literal character itself. A
//! literal comma therefore spreads over five fields: `3,,,4,4`. The accept
//! sentinel is written as `-1`; unresolved transitions only show up in
//! diagnostic dumps, as `-2`.

use std::fmt;
use std::str::FromStr;

use crate::nfa::{Fsm, State, StateId, StateKind, Target, TableDefect};

const BRANCH: &str = "BR";
const WILDCARD: &str = "WC";

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::State(id) => write!(f, "{}", id),
            Target::Accept => write!(f, "-1"),
            Target::Unresolved => write!(f, "-2"),
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateKind::Branch => f.write_str(BRANCH),
            StateKind::Wildcard => f.write_str(WILDCARD),
            StateKind::Literal(c) => write!(f, "{}", c),
        }
    }
}

impl fmt::Display for Fsm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, state) in self.iter() {
            writeln!(f, "{},{},{},{}", id, state.kind, state.next1, state.next2)?;
        }
        Ok(())
    }
}

/// A table that could not be read back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableError {
    /// 1-based line of the offending record, if the problem has one
    pub line: Option<usize>,
    pub kind: TableErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableErrorKind {
    FieldCount(usize),
    BadIndex(String),
    IndexMismatch { expected: StateId, found: StateId },
    BadType(String),
    BadTarget(String),
    Defect(TableDefect),
}

impl fmt::Display for TableErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableErrorKind::FieldCount(n) => write!(f, "expected 4 or 5 fields, found {}", n),
            TableErrorKind::BadIndex(s) => write!(f, "invalid state index {:?}", s),
            TableErrorKind::IndexMismatch { expected, found } => {
                write!(f, "expected state {}, found state {}", expected, found)
            }
            TableErrorKind::BadType(s) => write!(f, "invalid state type {:?}", s),
            TableErrorKind::BadTarget(s) => write!(f, "invalid transition {:?}", s),
            TableErrorKind::Defect(defect) => write!(f, "{}", defect),
        }
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "malformed FSM table at line {}: {}", line, self.kind),
            None => write!(f, "malformed FSM table: {}", self.kind),
        }
    }
}

impl std::error::Error for TableError {}

impl FromStr for Fsm {
    type Err = TableError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut states = Vec::new();
        let mut lines = Vec::new();

        for (n, line) in text.lines().enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                continue;
            }
            let state = parse_state(line, states.len())
                .map_err(|kind| TableError { line: Some(n + 1), kind })?;
            states.push(state);
            lines.push(n + 1);
        }

        Fsm::from_states(states).map_err(|defect| {
            let line = match defect {
                TableDefect::Empty => None,
                TableDefect::DanglingTarget { state, .. }
                | TableDefect::UnresolvedTarget { state } => lines.get(state).copied(),
            };
            TableError { line, kind: TableErrorKind::Defect(defect) }
        })
    }
}

fn parse_state(line: &str, expected: StateId) -> Result<State, TableErrorKind> {
    let fields: Vec<&str> = line.split(',').collect();
    let (index, kind, next1, next2) = match fields.as_slice() {
        [index, kind, next1, next2] => (*index, parse_kind(kind)?, *next1, *next2),
        [index, "", "", next1, next2] => (*index, StateKind::Literal(','), *next1, *next2),
        _ => return Err(TableErrorKind::FieldCount(fields.len())),
    };

    let found: StateId = index
        .parse()
        .map_err(|_| TableErrorKind::BadIndex(index.to_string()))?;
    if found != expected {
        return Err(TableErrorKind::IndexMismatch { expected, found });
    }

    Ok(State::new(kind, parse_target(next1)?, parse_target(next2)?))
}

fn parse_kind(s: &str) -> Result<StateKind, TableErrorKind> {
    match s {
        BRANCH => return Ok(StateKind::Branch),
        WILDCARD => return Ok(StateKind::Wildcard),
        _ => {}
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(StateKind::Literal(c)),
        _ => Err(TableErrorKind::BadType(s.to_string())),
    }
}

fn parse_target(s: &str) -> Result<Target, TableErrorKind> {
    match s.parse::<i64>() {
        Ok(-1) => Ok(Target::Accept),
        Ok(id) if id >= 0 => usize::try_from(id)
            .map(Target::State)
            .map_err(|_| TableErrorKind::BadTarget(s.to_string())),
        _ => Err(TableErrorKind::BadTarget(s.to_string())),
    }
}
