//! Property-based tests for the reader.
//!
//! 1. Totality and determinism: any text reads without panicking, and
//!    reading it twice gives the same tree.
//! 2. Round-trip: printing a problem-free tree and reading the output again
//!    gives structurally equal data.

#![allow(
    clippy::doc_markdown,
    clippy::uninlined_format_args,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use proptest::prelude::*;
use tern_ir::ParseTree;
use tern_reader::{parse_str, parse_str_limited, SourceContext};

fn read(text: &str) -> ParseTree {
    parse_str(&SourceContext::new("prop"), text)
}

// -- Text Generation Strategies --

/// Arbitrary text biased toward the reader's structural characters.
fn noisy_text_strategy() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        4 => prop::sample::select(vec![
            "(", ")", "\"", "|", "\\", ";", " ", "\n", ":", "r\"", "v\"", "f\"", "g\"",
        ])
        .prop_map(str::to_string),
        4 => "[a-z0-9.+-]{1,4}",
        1 => any::<char>().prop_map(|c| c.to_string()),
    ];
    prop::collection::vec(piece, 0..40).prop_map(|pieces| pieces.concat())
}

fn atom_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9*?!-]{0,8}",
        ":[a-z][a-z0-9-]{0,8}",
        any::<i32>().prop_map(|n| n.to_string()),
        any::<i64>().prop_map(|n| format!("{n}L")),
        any::<i8>().prop_map(|n| format!("{n}b")),
        (-1.0e6f64..1.0e6).prop_map(|f| format!("{f:?}")),
        (-1.0e3f32..1.0e3).prop_map(|f| format!("{f:?}f")),
        "[a-z (;)|\\\\]{0,8}".prop_map(|s| format!("{s:?}")),
        "\\|[a-z ()]{1,8}\\|",
        (0u32..20, 0u32..20, 0u32..20).prop_map(|(a, b, c)| format!("v\"{a}.{b}.{c}\"")),
        Just("r\"[a-z]+\\d\"i".to_string()),
        Just("g\"*.tern\"".to_string()),
        Just("nil".to_string()),
        Just("true".to_string()),
        Just("f\"car\"".to_string()),
    ]
}

/// Well-formed source: nested lists of atoms, with comments sprinkled in.
fn form_strategy() -> impl Strategy<Value = String> {
    atom_strategy().prop_recursive(4, 48, 6, |inner| {
        prop::collection::vec(
            prop_oneof![
                6 => inner,
                1 => Just("; note\n".to_string()),
            ],
            0..6,
        )
        .prop_map(|items| format!("({})", items.join(" ")))
    })
}

fn program_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(form_strategy(), 0..5).prop_map(|forms| forms.join("\n"))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 1000,
        ..ProptestConfig::default()
    })]

    /// Reading never panics, and reading twice agrees.
    #[test]
    fn prop_reading_is_total_and_deterministic(text in noisy_text_strategy()) {
        let first = read(&text);
        let second = read(&text);
        prop_assert_eq!(first.datum(first.root()), second.datum(second.root()));
        prop_assert_eq!(first.problems(), second.problems());
        prop_assert_eq!(first.end(), second.end());
        prop_assert!(first.is_exhausted());
        prop_assert_eq!(first.end().offset as usize, text.len());
    }

    /// Every node lies inside its parent and inside the input.
    #[test]
    fn prop_spans_nest(text in noisy_text_strategy()) {
        let tree = read(&text);
        for id in tree.ids() {
            let node = tree.node(id);
            prop_assert!(node.span.end() as usize <= text.len());
            for &child in node.children() {
                prop_assert!(node.span.encloses(tree.node(child).span));
                prop_assert_eq!(tree.parent(child), Some(id));
            }
        }
    }

    /// Well-formed programs read without problems.
    #[test]
    fn prop_generated_programs_are_clean(text in program_strategy()) {
        let tree = read(&text);
        prop_assert!(!tree.has_problems(), "problems in {:?}: {:?}", text, tree.problems());
    }

    /// Print then re-read gives the same data.
    #[test]
    fn prop_print_round_trips(text in program_strategy()) {
        let tree = read(&text);
        if tree.has_problems() {
            return Ok(());
        }
        let printed = tree.print_forms();
        let reread = read(&printed);
        prop_assert!(!reread.has_problems(), "printed {:?} has problems", printed);
        prop_assert_eq!(tree.datum(tree.root()), reread.datum(reread.root()));
    }

    /// Noisy input that happens to be clean round-trips too.
    #[test]
    fn prop_noisy_print_round_trips(text in noisy_text_strategy()) {
        let tree = read(&text);
        if tree.has_problems() {
            return Ok(());
        }
        let reread = read(&tree.print_forms());
        prop_assert_eq!(tree.datum(tree.root()), reread.datum(reread.root()));
    }

    /// Reading in chunks of one expression sees the same forms as one read.
    #[test]
    fn prop_limited_reads_partition_input(text in program_strategy()) {
        let whole = read(&text);
        let ctx = SourceContext::new("prop");
        let mut chars = text.chars().peekable();
        let mut context = ctx.clone();
        let mut forms = Vec::new();
        loop {
            let chunk = tern_reader::parse(&context, &mut chars, Some(1));
            forms.extend(chunk.forms().map(|id| chunk.datum(id)));
            context = context.resume(&chunk);
            if chunk.is_exhausted() {
                break;
            }
        }
        let expected: Vec<_> = whole.forms().map(|id| whole.datum(id)).collect();
        prop_assert_eq!(forms, expected);

        let unbounded = parse_str_limited(&ctx, &text, usize::MAX);
        prop_assert_eq!(unbounded.datum(unbounded.root()), whole.datum(whole.root()));
    }
}
