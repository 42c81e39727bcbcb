use crate::{
    compress,
    nfa::{Fragment, Fsm, State, StateKind, Target},
    CompileError, CompileResult, SyntaxErrorKind,
};

/// Characters with a meaning of their own; everything else is a literal.
const OPERATORS: &[char] = &['.', '*', '+', '?', '|', '(', ')', '\\'];

fn is_literal(c: char) -> bool {
    !OPERATORS.contains(&c)
}

fn is_repetition(c: char) -> bool {
    matches!(c, '*' | '+' | '?')
}

/// Returns true if `c` can start a factor, and so continue a concatenation.
fn begins_factor(c: char) -> bool {
    is_literal(c) || matches!(c, '.' | '\\' | '(')
}

/// Options for [`Compiler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    compress: bool,
}

impl Config {
    /// Default configuration: compression enabled.
    pub fn new() -> Self {
        Config { compress: true }
    }

    /// Whether to run the compression pass on the finished table.
    pub fn compress(mut self, yes: bool) -> Self {
        self.compress = yes;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Compiler that turns a pattern into an FSM table by recursive descent.
///
/// The grammar is:
///
/// ```text
/// expression := term ('|' expression)?
/// term       := factor factor*
/// factor     := atom ('*' | '+' | '?')?
/// atom       := literal | '.' | '\' any | '(' expression ')'
/// ```
///
/// States are appended to a single arena as they are parsed. Transitions
/// that lead somewhere not yet known are left [`Target::Unresolved`] and
/// patched by the enclosing rule.
pub struct Compiler {
    nfa: Fsm,
    config: Config,
    pattern: Vec<char>,
    pos: usize,
}

impl Compiler {
    /// Create a new compiler
    pub fn new() -> Self {
        Self {
            nfa: Fsm::new(),
            config: Config::default(),
            pattern: Vec::new(),
            pos: 0,
        }
    }

    pub fn configure(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Compile a pattern into a finished table
    pub fn compile(mut self, pattern: &str) -> CompileResult<Fsm> {
        self.pattern = pattern.chars().collect();
        check_parens(&self.pattern)?;

        // State 0 is where every search enters. It is patched to the real
        // start once the top level expression is known.
        let entry = self.nfa.branch(Target::Unresolved, Target::Unresolved);
        let fragment = self.compile_expression()?;
        self.nfa.connect(entry, Target::State(fragment.start));

        if self.pos < self.pattern.len() {
            return Err(self.error(SyntaxErrorKind::UnexpectedCharacter));
        }

        let last = self.nfa.len() - 1;
        if let Some((id, _)) = self
            .nfa
            .iter()
            .take(last)
            .find(|(_, state)| state.next1.is_unresolved() || state.next2.is_unresolved())
        {
            return Err(CompileError::internal(
                format!("unresolved transition at state {}", id),
                &self.nfa,
            ));
        }

        let accept = self.nfa.len();
        self.nfa.connect(last, Target::State(accept));
        self.nfa.branch(Target::Accept, Target::Accept);

        if let Err(defect) = self.nfa.check() {
            return Err(CompileError::internal(defect.to_string(), &self.nfa));
        }

        log::debug!(
            "compiled {:?} into {} states",
            pattern,
            self.nfa.len()
        );

        if self.config.compress {
            compress(self.nfa)
        } else {
            Ok(self.nfa)
        }
    }

    fn peek(&self) -> Option<char> {
        self.pattern.get(self.pos).copied()
    }

    fn error(&self, kind: SyntaxErrorKind) -> CompileError {
        CompileError::Syntax {
            kind,
            position: self.pos,
            found: self.peek(),
        }
    }

    /// expression := term ('|' expression)?
    fn compile_expression(&mut self) -> CompileResult<Fragment> {
        let term = self.compile_term()?;
        if self.peek() != Some('|') {
            return Ok(term);
        }
        self.pos += 1;

        let branch = self.nfa.branch(Target::State(term.start), Target::Unresolved);
        let rest = self.compile_expression()?;
        let merge = self.nfa.branch(Target::Unresolved, Target::Unresolved);

        self.nfa.connect(branch, Target::State(rest.start));
        self.nfa.connect(term.end, Target::State(merge));
        self.nfa.connect(rest.end, Target::State(merge));

        Ok(Fragment { start: branch, end: merge })
    }

    /// term := factor factor*
    fn compile_term(&mut self) -> CompileResult<Fragment> {
        let first = self.compile_factor()?;
        let mut end = first.end;

        loop {
            match self.peek() {
                None | Some('|') | Some(')') => break,
                Some(c) if begins_factor(c) => {
                    let next = self.compile_factor()?;
                    self.nfa.connect(end, Target::State(next.start));
                    end = next.end;
                }
                Some(_) => return Err(self.error(SyntaxErrorKind::UnexpectedInput)),
            }
        }

        Ok(Fragment { start: first.start, end })
    }

    /// factor := atom ('*' | '+' | '?')?
    fn compile_factor(&mut self) -> CompileResult<Fragment> {
        let atom = self.compile_atom()?;
        let Some(op) = self.peek().filter(|&c| is_repetition(c)) else {
            return Ok(atom);
        };
        self.pos += 1;
        if self.peek().is_some_and(is_repetition) {
            return Err(self.error(SyntaxErrorKind::MultipleRepetition));
        }

        match op {
            '*' => Ok(self.compile_loop(atom, false)),
            '+' => Ok(self.compile_loop(atom, true)),
            _ => Ok(self.compile_optional(atom)),
        }
    }

    /// `a*` and `a+`: a branch that either re-enters the atom or leaves.
    fn compile_loop(&mut self, atom: Fragment, at_least_once: bool) -> Fragment {
        let branch = self.nfa.branch(Target::State(atom.start), Target::Unresolved);
        self.nfa.connect(atom.end, Target::State(branch));

        let start = if at_least_once { atom.start } else { branch };
        Fragment { start, end: branch }
    }

    /// `a?`: a branch around the atom joined by a merge state right after it.
    fn compile_optional(&mut self, atom: Fragment) -> Fragment {
        let merge = self.nfa.len() + 1;
        self.nfa.connect(atom.end, Target::State(merge));
        let branch = self.nfa.branch(Target::State(atom.start), Target::State(merge));
        self.nfa.branch(Target::Unresolved, Target::Unresolved);

        Fragment { start: branch, end: merge }
    }

    /// atom := literal | '.' | '\' any | '(' expression ')'
    fn compile_atom(&mut self) -> CompileResult<Fragment> {
        let Some(c) = self.peek() else {
            return Err(self.error(SyntaxErrorKind::UnexpectedEnd));
        };

        match c {
            c if is_literal(c) => {
                self.pos += 1;
                Ok(self.compile_single(StateKind::Literal(c)))
            }
            '.' => {
                self.pos += 1;
                Ok(self.compile_single(StateKind::Wildcard))
            }
            '\\' => {
                self.pos += 1;
                let Some(escaped) = self.peek() else {
                    return Err(self.error(SyntaxErrorKind::IncompleteEscape));
                };
                self.pos += 1;
                Ok(self.compile_single(StateKind::Literal(escaped)))
            }
            '(' => {
                self.pos += 1;
                let inner = self.compile_expression()?;
                if self.peek() != Some(')') {
                    return Err(self.error(SyntaxErrorKind::MissingClosingParen));
                }
                self.pos += 1;
                Ok(inner)
            }
            _ => Err(self.error(SyntaxErrorKind::UnexpectedInput)),
        }
    }

    fn compile_single(&mut self, kind: StateKind) -> Fragment {
        let id = self.nfa.add_state(State::unresolved(kind));
        Fragment { start: id, end: id }
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks that parentheses balance, ignoring escaped characters.
fn check_parens(pattern: &[char]) -> CompileResult<()> {
    let mut depth: usize = 0;
    let mut chars = pattern.iter();
    while let Some(&c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or(CompileError::UnbalancedParens)?;
            }
            _ => {}
        }
    }

    if depth == 0 {
        Ok(())
    } else {
        Err(CompileError::UnbalancedParens)
    }
}
