#![expect(clippy::unwrap_used, reason = "tests unwrap known-good fixtures")]

use super::*;
use pretty_assertions::assert_eq;
use tern_ir::Position;
use tern_reader::{parse_str, SourceContext};

fn name() -> Arc<str> {
    Arc::from("demo.tern")
}

#[test]
fn problem_diagnostic_points_at_the_problem() {
    let source = "(a)\n  )";
    let tree = parse_str(&SourceContext::new("demo.tern"), source);
    let (_, problem) = tree.problems()[0];

    let diagnostic = Diagnostic::from_problem(name(), problem).with_source(source);
    assert_eq!(
        diagnostic.to_string(),
        "demo.tern:2:3: error: too many right parentheses"
    );
    assert_eq!(
        diagnostic.excerpt,
        Some(Excerpt {
            text: "  )".into(),
            column: 3,
            width: 1,
        })
    );
    assert!(diagnostic.is_error());
}

#[test]
fn unclosed_list_gets_a_note() {
    let tree = parse_str(&SourceContext::new("demo.tern"), "(a");
    let (_, problem) = tree.problems()[0];
    let diagnostic = Diagnostic::from_problem(name(), problem);
    assert_eq!(diagnostic.message, "unbalanced open parenthesis");
    assert_eq!(diagnostic.notes, vec!["this list is never closed".to_string()]);
}

#[test]
fn excerpt_is_clipped_to_its_line() {
    let span = Span::new(Position::new(1, 2, 1), 10);
    let excerpt = Excerpt::from_source("(abc\r\nd)", span).unwrap();
    assert_eq!(excerpt.text, "(abc");
    assert_eq!(excerpt.column, 2);
    assert_eq!(excerpt.width, 3);
}

#[test]
fn excerpt_counts_characters() {
    let span = Span::new(Position::new(1, 2, 1), 4);
    let excerpt = Excerpt::from_source("(éé)", span).unwrap();
    assert_eq!(excerpt.width, 2);
}

#[test]
fn excerpt_outside_the_source() {
    let span = Span::new(Position::new(3, 1, 40), 1);
    assert_eq!(Excerpt::from_source("(a)", span), None);
}

#[test]
fn empty_span_still_gets_a_caret() {
    let span = Span::point(Position::new(1, 4, 3));
    let excerpt = Excerpt::from_source("(a ", span).unwrap();
    assert_eq!(excerpt.width, 1);
}

#[test]
fn bind_error_diagnostics() {
    let located = BindError::new(BindErrorKind::MisplacedMarker("&REST".into()))
        .at(Span::new(Position::new(1, 9, 8), 5));
    let diagnostic = Diagnostic::from_bind_error(name(), &located);
    assert_eq!(
        diagnostic.to_string(),
        "demo.tern:1:9: error: misplaced argument keyword `&REST`"
    );
    assert_eq!(diagnostic.notes.len(), 1);

    let unlocated = BindError::new(BindErrorKind::TooManyArguments { extra: 1 });
    let diagnostic = Diagnostic::from_bind_error(name(), &unlocated).with_source("(a)");
    assert_eq!(
        diagnostic.to_string(),
        "demo.tern: error: too many arguments: 1 left over"
    );
    assert_eq!(diagnostic.excerpt, None);
}
