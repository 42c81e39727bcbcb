/*!
This crate is a small `grep`. A pattern is compiled into a flat table of
states (an FSM), and the table is simulated against every line of a text,
printing the lines that contain a match.

The pattern language has literal characters, `.` for any character, `\` to
take the next character literally, `|` for alternation, concatenation,
`*`, `+` and `?` for repetition, and parentheses for grouping. Matching is
unanchored: a line matches if any part of it does.

# Example

```
use regrep::{Compiler, Searcher};

let fsm = Compiler::new().compile("a|b").unwrap();
let mut out = Vec::new();
let summary = Searcher::new(&fsm).search_slice(b"xay\nxby\nxcy\n", &mut out).unwrap();
assert_eq!(out, b"xay\nxby\n");
assert_eq!(summary.matched, 2);
```

# Two processes

The `recompile` binary prints the table in a line based text format and the
`research` binary reads it back from standard input, so the two can be
connected by a pipe:

```text
$ recompile 'ab*c' | research notes.txt
```

The same round trip is available in process through the `Display` and
`FromStr` implementations of [`Fsm`].
*/

pub use thompson_nfa::{
    compress, CompileError, CompileResult, Compiler, Config, Fsm, MatchResult, Matcher, State,
    StateId, StateKind, SyntaxErrorKind, TableError, Target,
};

pub use crate::search::{SearchSummary, Searcher};

mod search;

/// Compile `pattern` into a table using `config`.
///
/// This is a shortcut for `Compiler::new().configure(config).compile(pattern)`.
pub fn compile(pattern: &str, config: Config) -> CompileResult<Fsm> {
    Compiler::new().configure(config).compile(pattern)
}

#[cfg(doctest)]
doc_comment::doctest!("../README.md");
