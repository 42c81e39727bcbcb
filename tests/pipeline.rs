use regrep::{compile, CompileError, Config, Fsm, Matcher, SyntaxErrorKind};

/// Compiles `pattern` with and without compression.
fn tables(pattern: &str) -> [Fsm; 2] {
    [true, false].map(|yes| compile(pattern, Config::new().compress(yes)).unwrap())
}

/// Checks that both tables, and both tables after a trip through their
/// text form, agree on `line`, and returns the verdict.
fn matches(pattern: &str, line: &str) -> bool {
    let mut verdicts = vec![];
    for fsm in tables(pattern) {
        let reparsed: Fsm = fsm.to_string().parse().unwrap();
        verdicts.push(Matcher::new(&fsm).is_match(line));
        verdicts.push(Matcher::new(&reparsed).is_match(line));
    }
    assert!(
        verdicts.iter().all(|&v| v == verdicts[0]),
        "tables for {:?} disagree on {:?}: {:?}",
        pattern,
        line,
        verdicts
    );
    verdicts[0]
}

#[test]
fn alternation() {
    assert!(matches("a|b", "xay"));
    assert!(matches("a|b", "xby"));
    assert!(!matches("a|b", "xcy"));
}

#[test]
fn star_inside_concatenation() {
    assert!(matches("ab*c", "ac"));
    assert!(matches("ab*c", "abc"));
    assert!(matches("ab*c", "abbbc"));
    assert!(!matches("ab*c", "abd"));
}

#[test]
fn plus_needs_one() {
    assert!(!matches("ab+c", "ac"));
    assert!(matches("ab+c", "abc"));
    assert!(matches("ab+c", "xxabbbbcxx"));
}

#[test]
fn optional() {
    assert!(matches("colou?r", "color"));
    assert!(matches("colou?r", "colour"));
    assert!(!matches("colou?r", "colouur"));
}

#[test]
fn wildcard() {
    assert!(matches("a.c", "abc"));
    assert!(matches("a.c", "a c"));
    assert!(matches("a.c", "a.c"));
    assert!(!matches("a.c", "ac"));
}

#[test]
fn escapes() {
    assert!(matches(r"\*", "5*9"));
    assert!(!matches(r"\*", "5x9"));
    assert!(matches(r"f\(\)", "call f() now"));
    assert!(!matches(r"a\.c", "abc"));
    assert!(matches(r"a\.c", "a.c"));
    assert!(matches(r"\\", r"C:\dir"));
}

#[test]
fn groups() {
    assert!(matches("(ab)+c", "ababc"));
    assert!(!matches("(ab)+c", "aac"));
    assert!(matches("x(y|z)*w", "xw"));
    assert!(matches("x(y|z)*w", "xyzzyw"));
    assert!(!matches("x(y|z)*w", "xyaw"));
    assert!(matches("(a*)*b", "aaab"));
}

#[test]
fn comma_literal() {
    assert!(matches("a,b", "x a,b y"));
    assert!(!matches("a,b", "a;b"));
}

#[test]
fn unicode() {
    assert!(matches("é.", "café!"));
    assert!(!matches("é.", "café"));
}

#[test]
fn nullable_pattern_matches_every_line() {
    for fsm in tables("a*") {
        let matcher = Matcher::new(&fsm);
        for line in ["", "b", "aaa"] {
            let found = matcher.find(line).unwrap();
            assert!(found.without_char, "{:?}", line);
        }
    }
}

#[test]
fn consuming_match_is_not_empty() {
    for fsm in tables("ab") {
        let found = Matcher::new(&fsm).find("xab").unwrap();
        assert!(!found.without_char);
        assert_eq!(found.end, 3);
    }
}

#[test]
fn empty_line_needs_a_nullable_pattern() {
    for fsm in tables("a?b?") {
        assert!(Matcher::new(&fsm).is_match(""));
    }
    for fsm in tables("a|b") {
        assert!(!Matcher::new(&fsm).is_match(""));
    }
}

#[test]
fn empty_pattern_is_rejected() {
    let err = compile("", Config::new()).unwrap_err();
    assert_eq!(err.syntax_kind(), Some(SyntaxErrorKind::UnexpectedEnd));
    assert_eq!(err.to_string(), "unexpected end of input at position 0: end of input");
}

#[test]
fn unbalanced_parens_are_rejected() {
    assert_eq!(compile("(ab", Config::new()), Err(CompileError::UnbalancedParens));
    assert_eq!(compile("a|b)", Config::new()), Err(CompileError::UnbalancedParens));
}

#[test]
fn uncompressed_table_text() {
    let fsm = compile("a|b", Config::new().compress(false)).unwrap();
    assert_eq!(
        fsm.to_string(),
        "0,BR,2,2\n1,a,4,4\n2,BR,1,3\n3,b,4,4\n4,BR,5,5\n5,BR,-1,-1\n"
    );
}

#[test]
fn compressed_table_text() {
    let fsm = compile("a|b", Config::new()).unwrap();
    assert_eq!(fsm.to_string(), "0,BR,1,2\n1,a,-1,-1\n2,b,-1,-1\n");
}
