use quickcheck::{Arbitrary, Gen, QuickCheck};
use regrep::{compile, compress, Config, Fsm, Matcher};

/// Characters patterns are built from. Operators among them are escaped.
const LITERALS: &[char] = &['a', 'b', 'c', '*', '.', '|', '(', '\\', ','];
/// Characters lines are built from.
const LINE_CHARS: &[char] = &['a', 'b', 'c', 'd', '*', '.', ','];

/// A pattern in a form that can be printed for both engines.
#[derive(Clone, Debug)]
enum Ast {
    Literal(char),
    Any,
    Concat(Box<Ast>, Box<Ast>),
    Alternate(Box<Ast>, Box<Ast>),
    Star(Box<Ast>),
    Plus(Box<Ast>),
    Optional(Box<Ast>),
}

impl Ast {
    fn generate(g: &mut Gen, depth: usize) -> Ast {
        if depth == 0 || u8::arbitrary(g) % 3 == 0 {
            return if u8::arbitrary(g) % 4 == 0 {
                Ast::Any
            } else {
                Ast::Literal(*g.choose(LITERALS).unwrap())
            };
        }
        let a = Box::new(Ast::generate(g, depth - 1));
        match u8::arbitrary(g) % 6 {
            0 | 1 => Ast::Concat(a, Box::new(Ast::generate(g, depth - 1))),
            2 => Ast::Alternate(a, Box::new(Ast::generate(g, depth - 1))),
            3 => Ast::Star(a),
            4 => Ast::Plus(a),
            _ => Ast::Optional(a),
        }
    }

    /// The pattern in the language compiled by this crate.
    fn pattern(&self) -> String {
        let group = |ast: &Ast| match ast {
            Ast::Literal(_) | Ast::Any => ast.pattern(),
            _ => format!("({})", ast.pattern()),
        };
        match self {
            Ast::Literal(c) if ".*+?|()\\".contains(*c) => format!("\\{}", c),
            Ast::Literal(c) => c.to_string(),
            Ast::Any => ".".to_string(),
            Ast::Concat(a, b) => format!("{}{}", group(a), group(b)),
            Ast::Alternate(a, b) => format!("{}|{}", group(a), group(b)),
            Ast::Star(a) => format!("{}*", group(a)),
            Ast::Plus(a) => format!("{}+", group(a)),
            Ast::Optional(a) => format!("{}?", group(a)),
        }
    }

    /// The same pattern in the syntax of the `regex` crate.
    fn oracle(&self) -> String {
        match self {
            Ast::Literal(c) => regex::escape(&c.to_string()),
            Ast::Any => "(?s:.)".to_string(),
            Ast::Concat(a, b) => format!("(?:{})(?:{})", a.oracle(), b.oracle()),
            Ast::Alternate(a, b) => format!("(?:{}|{})", a.oracle(), b.oracle()),
            Ast::Star(a) => format!("(?:{})*", a.oracle()),
            Ast::Plus(a) => format!("(?:{})+", a.oracle()),
            Ast::Optional(a) => format!("(?:{})?", a.oracle()),
        }
    }
}

impl Arbitrary for Ast {
    fn arbitrary(g: &mut Gen) -> Ast {
        Ast::generate(g, 4)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Ast>> {
        match self {
            Ast::Literal(_) | Ast::Any => Box::new(std::iter::empty()),
            Ast::Concat(a, b) | Ast::Alternate(a, b) => {
                Box::new(vec![(**a).clone(), (**b).clone()].into_iter())
            }
            Ast::Star(a) | Ast::Plus(a) | Ast::Optional(a) => {
                Box::new(std::iter::once((**a).clone()))
            }
        }
    }
}

#[derive(Clone, Debug)]
struct Line(String);

impl Arbitrary for Line {
    fn arbitrary(g: &mut Gen) -> Line {
        let len = usize::arbitrary(g) % 10;
        Line((0..len).map(|_| *g.choose(LINE_CHARS).unwrap()).collect())
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Line>> {
        Box::new(self.0.shrink().map(Line))
    }
}

fn tables(ast: &Ast) -> (Fsm, Fsm) {
    let pattern = ast.pattern();
    let full = compile(&pattern, Config::new().compress(false)).unwrap();
    let small = compile(&pattern, Config::new()).unwrap();
    (full, small)
}

fn run(tests: u64, prop: fn(Ast, Vec<Line>) -> bool) {
    QuickCheck::new()
        .tests(tests)
        .max_tests(tests * 10)
        .quickcheck(prop);
}

#[test]
fn generated_patterns_compile() {
    fn p(ast: Ast, _: Vec<Line>) -> bool {
        compile(&ast.pattern(), Config::new()).is_ok()
    }
    run(1_000, p);
}

#[test]
fn compression_preserves_matches() {
    fn p(ast: Ast, lines: Vec<Line>) -> bool {
        let (full, small) = tables(&ast);
        let (full, small) = (Matcher::new(&full), Matcher::new(&small));
        lines
            .iter()
            .all(|Line(line)| full.is_match(line) == small.is_match(line))
    }
    run(1_000, p);
}

#[test]
fn agrees_with_regex_crate() {
    fn p(ast: Ast, lines: Vec<Line>) -> bool {
        let oracle = regex::Regex::new(&ast.oracle()).unwrap();
        let (full, small) = tables(&ast);
        let (full, small) = (Matcher::new(&full), Matcher::new(&small));
        lines.iter().all(|Line(line)| {
            let expected = oracle.is_match(line);
            full.is_match(line) == expected && small.is_match(line) == expected
        })
    }
    run(1_000, p);
}

#[test]
fn compression_is_a_fixed_point() {
    fn p(ast: Ast, _: Vec<Line>) -> bool {
        let (full, small) = tables(&ast);
        let again = compress(small.clone()).unwrap();
        again == small && small.len() < full.len()
    }
    run(1_000, p);
}

#[test]
fn text_form_round_trips() {
    fn p(ast: Ast, _: Vec<Line>) -> bool {
        let (full, small) = tables(&ast);
        [full, small]
            .into_iter()
            .all(|fsm| fsm.to_string().parse::<Fsm>().ok() == Some(fsm))
    }
    run(500, p);
}
