use super::*;
use pretty_assertions::assert_eq;
use tern_ir::{Datum, Number};

fn ctx() -> SourceContext {
    SourceContext::new("test")
}

fn read(text: &str) -> ParseTree {
    parse_str(&ctx(), text)
}

fn kinds(tree: &ParseTree) -> Vec<ProblemKind> {
    tree.problems()
        .into_iter()
        .map(|(_, p)| p.kind.clone())
        .collect()
}

fn int(v: i32) -> Datum {
    Datum::lit(Literal::Number(Number::Int(v)))
}

#[test]
fn reads_nested_lists() {
    let tree = read("(a (1 2) \"s\")");
    assert!(!tree.has_problems());
    assert_eq!(tree.expression_count(), 1);
    assert_eq!(
        tree.datum(tree.root()),
        Datum::List(vec![Datum::List(vec![
            Datum::symbol("a"),
            Datum::List(vec![int(1), int(2)]),
            Datum::lit(Literal::Str("s".into())),
        ])])
    );
}

#[test]
fn top_level_atoms_are_expressions() {
    let tree = read("1 two :three");
    assert_eq!(tree.expression_count(), 3);
    assert_eq!(tree.print_forms(), "1\ntwo\n:three");
}

#[test]
fn extra_right_paren() {
    let tree = read(")");
    assert!(tree.has_problems());
    assert_eq!(kinds(&tree).first(), Some(&ProblemKind::TooManyRightParens));
    let stray = tree.children(tree.root())[0];
    assert_eq!(tree.node(stray).value(), None);
    assert_eq!(tree.node(stray).span, Span::new(Position::START, 1));
}

#[test]
fn reading_continues_after_extra_paren() {
    let tree = read("a) (b)");
    assert_eq!(kinds(&tree), vec![ProblemKind::TooManyRightParens]);
    assert_eq!(tree.expression_count(), 2);
    assert_eq!(tree.print_forms(), "a\n(b)");
}

#[test]
fn unclosed_string_inside_open_list() {
    let tree = read("(aaa \"bbb");
    assert_eq!(
        kinds(&tree),
        vec![ProblemKind::UnclosedString, ProblemKind::UnbalancedOpenParen]
    );
    let list = tree.children(tree.root())[0];
    assert_eq!(tree.datum(list), Datum::List(vec![Datum::symbol("aaa")]));
    let (at, _) = tree.problems()[0];
    assert_eq!(at, tree.root());
}

#[test]
fn unbalanced_lists_close_at_end_of_input() {
    let tree = read("(a (b");
    assert_eq!(
        kinds(&tree),
        vec![
            ProblemKind::UnbalancedOpenParen,
            ProblemKind::UnbalancedOpenParen
        ]
    );
    let outer = tree.children(tree.root())[0];
    assert_eq!(tree.node(outer).span.to_range(), 0..5);
    let problem = tree.node(outer).problem.as_ref().map(|p| p.span);
    assert_eq!(problem, Some(Span::new(Position::START, 1)));
}

#[test]
fn unterminated_pipe() {
    let tree = read("(x |abc");
    assert_eq!(
        kinds(&tree),
        vec![ProblemKind::UnbalancedOpenParen, ProblemKind::UnterminatedAtom]
    );
    let list = tree.children(tree.root())[0];
    let leaf = tree.children(list)[1];
    assert_eq!(tree.node(leaf).value(), None);
    assert_eq!(tree.node(leaf).span.to_range(), 3..7);
}

#[test]
fn malformed_atom_keeps_siblings() {
    let tree = read("(a v\"nope\" b)");
    let problems = tree.problems();
    assert_eq!(problems.len(), 1);
    let ProblemKind::InvalidAtom { token, .. } = &problems[0].1.kind else {
        panic!("expected an invalid atom, got {:?}", problems[0].1.kind);
    };
    assert_eq!(token, "v\"nope\"");
    let list = tree.children(tree.root())[0];
    assert_eq!(
        tree.datum(list),
        Datum::List(vec![Datum::symbol("a"), Datum::Atom(None), Datum::symbol("b")])
    );
}

#[test]
fn strings_hold_structural_characters() {
    let tree = read("(\"a (b) ; c\" d)");
    assert!(!tree.has_problems());
    let list = tree.children(tree.root())[0];
    assert_eq!(
        tree.datum(list),
        Datum::List(vec![
            Datum::lit(Literal::Str("a (b) ; c".into())),
            Datum::symbol("d")
        ])
    );
}

#[test]
fn escaped_quote_does_not_close_string() {
    let tree = read(r#""say \"hi\"" x"#);
    assert_eq!(
        tree.datum(tree.root()),
        Datum::List(vec![
            Datum::lit(Literal::Str("say \"hi\"".into())),
            Datum::symbol("x")
        ])
    );
}

#[test]
fn pipes_and_escapes_embed_structure() {
    let tree = read(r"(|a (b)| c\ d e\)f)");
    assert!(!tree.has_problems());
    let list = tree.children(tree.root())[0];
    assert_eq!(
        tree.datum(list),
        Datum::List(vec![
            Datum::symbol("a (b)"),
            Datum::symbol("c d"),
            Datum::symbol("e)f")
        ])
    );
}

#[test]
fn function_reference_expands() {
    let tree = read("f\"car\"");
    assert_eq!(
        tree.datum(tree.root()),
        Datum::List(vec![Datum::List(vec![
            Datum::symbol(FUNCTION_MARKER),
            Datum::symbol("car")
        ])])
    );
    assert_eq!(tree.expression_count(), 1);
}

#[test]
fn comments_are_skipped_by_default() {
    let tree = read("; header\n(a ; trailing\n b)");
    assert!(!tree.has_problems());
    assert_eq!(tree.len(), 4);
    assert_eq!(tree.print_forms(), "(a b)");
}

#[test]
fn comments_kept_on_request() {
    let config = ReaderConfig::new().with_comments(true);
    let text = "; header\n(a ; trailing\n b)";
    let tree = parse_with_config(&ctx(), &mut text.chars().peekable(), &config);
    let header = tree.children(tree.root())[0];
    assert!(tree.node(header).is_comment);
    assert_eq!(
        tree.node(header).value(),
        Some(&Literal::Str("; header".into()))
    );
    assert_eq!(tree.node(header).span.to_range(), 0..8);

    let list = tree.children(tree.root())[1];
    assert_eq!(tree.children(list).len(), 3);
    assert_eq!(tree.children_without_comments(list).count(), 2);
    assert_eq!(tree.expression_count(), 1);
    assert_eq!(tree.print_forms(), "(a b)");
}

#[test]
fn positions_track_lines_and_columns() {
    let tree = read("(a\n  bc)\n\"é\" d");
    let list = tree.children(tree.root())[0];
    let bc = tree.node(tree.children(list)[1]);
    assert_eq!(bc.span, Span::new(Position::new(2, 3, 5), 2));
    let d = tree.node(tree.children(tree.root())[2]);
    assert_eq!(d.span.start, Position::new(3, 5, 14));
    assert_eq!(tree.end(), Position::new(3, 6, 15));
}

#[test]
fn newlines_inside_strings_count() {
    let tree = read("\"a\nb\" c");
    let c = tree.node(tree.children(tree.root())[1]);
    assert_eq!(c.span.start, Position::new(2, 4, 6));
}

#[test]
fn limit_leaves_delimiter_unconsumed() {
    let mut chars = "a b (c) d".chars().peekable();
    let tree = parse(&ctx(), &mut chars, Some(1));
    assert_eq!(tree.expression_count(), 1);
    assert!(!tree.is_exhausted());
    assert_eq!(chars.collect::<String>(), " b (c) d");
    assert_eq!(tree.end(), Position::new(1, 2, 1));
}

#[test]
fn limit_after_list_stops_at_close_paren() {
    let mut chars = "(a)(b) c".chars().peekable();
    let tree = parse(&ctx(), &mut chars, Some(1));
    assert_eq!(tree.print_forms(), "(a)");
    assert_eq!(chars.collect::<String>(), "(b) c");
}

#[test]
fn limit_zero_reads_nothing() {
    let mut chars = "a".chars().peekable();
    let tree = parse(&ctx(), &mut chars, Some(0));
    assert!(tree.is_empty());
    assert_eq!(chars.next(), Some('a'));
}

#[test]
fn resume_continues_positions() {
    let ctx = ctx();
    let text = "first\n(second)";
    let mut chars = text.chars().peekable();
    let head = parse(&ctx, &mut chars, Some(1));
    let rest = parse(&ctx.resume(&head), &mut chars, None);
    let list = rest.forms().next().map(|id| rest.node(id).span);
    assert_eq!(list, Some(Span::new(Position::new(2, 1, 6), 8)));
    assert!(rest.is_exhausted());
}

#[test]
fn limited_reads_count_completed_forms_only() {
    let tree = parse_str_limited(&ctx(), "(a (b c) d) e", 1);
    assert_eq!(tree.print_forms(), "(a (b c) d)");
    assert_eq!(tree.expression_count(), 1);
}

#[test]
fn empty_input() {
    let tree = read("");
    assert!(tree.is_empty());
    assert!(!tree.has_problems());
    assert_eq!(tree.end(), Position::START);
    assert!(tree.is_exhausted());
}

#[test]
fn list_spans_enclose_children() {
    let tree = read("(defn f (x &optional (y 2)) ; c\n  (+ x y))");
    for id in tree.ids() {
        let node = tree.node(id);
        for &child in node.children() {
            assert!(node.span.encloses(tree.node(child).span));
            assert_eq!(tree.parent(child), Some(id));
        }
    }
}

#[test]
fn source_name_is_kept() {
    let tree = parse_str(&SourceContext::new("lib.tern"), "x");
    assert_eq!(tree.source_name(), "lib.tern");
}

#[test]
fn deeply_nested_input_reads_and_converts() {
    let depth = 200_000;
    let tree = read(&"(".repeat(depth));
    assert_eq!(tree.problems().len(), depth);

    let datum = tree.datum(tree.root());
    let mut level = &datum;
    let mut seen = 0;
    while let Datum::List(items) = level {
        match items.first() {
            Some(inner) => level = inner,
            None => break,
        }
        seen += 1;
    }
    assert_eq!(seen, depth);
    drop(datum);
}
