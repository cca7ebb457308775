#![expect(clippy::unwrap_used, reason = "tests unwrap known-good fixtures")]

use std::cell::Cell;

use super::*;
use crate::{EvalResult, Evaluable, SimpleCompiler};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tern_ir::NodeKind;
use tern_reader::{parse_str, SourceContext};

fn spec(params: &str) -> ParamSpec {
    let tree = parse_str(&SourceContext::new("params"), params);
    let spec = ParamSpec::parse(&tree, tree.forms().next().unwrap(), &SimpleCompiler).unwrap();
    spec
}

fn args_tree(args: &str) -> (ParseTree, Vec<NodeId>) {
    let tree = parse_str(&SourceContext::new("args"), args);
    let ids = tree.forms().collect();
    (tree, ids)
}

fn bind(params: &str, args: &str) -> Result<ArgumentBinding, BindError> {
    let spec = spec(params);
    let (tree, ids) = args_tree(args);
    ArgumentBinder::new(&spec, &SimpleCompiler).bind(&tree, &ids)
}

fn bind_error(params: &str, args: &str) -> BindErrorKind {
    bind(params, args).unwrap_err().kind
}

fn env() -> Environment {
    Environment::new(Rc::new(SimpleCompiler))
}

fn call(params: &str, args: &str) -> Vec<Value> {
    bind(params, args).unwrap().evaluate(&env()).unwrap().values
}

fn rest(items: impl IntoIterator<Item = Value>) -> Value {
    Value::Rest(RestView::new(items.into_iter().collect()))
}

fn kw(name: &str) -> Value {
    Value::Keyword(Rc::from(name))
}

#[test]
fn optional_slots_take_what_is_left() {
    let binding = bind("(a &OPTIONAL b c)", "1 2").unwrap();
    assert_eq!(binding.supplied(), &[true, true, false]);
    let frame = binding.evaluate(&env()).unwrap();
    assert_eq!(frame.values, vec![Value::int(1), Value::int(2), Value::Nil]);
    assert_eq!(frame.env.lookup("c"), Some(Value::Nil));
}

#[test]
fn rest_takes_the_middle_between_required_slots() {
    assert_eq!(
        call("(a &REST b &REQUIRED c)", "1 2 3 4"),
        vec![
            Value::int(1),
            rest([Value::int(2), Value::int(3)]),
            Value::int(4)
        ]
    );
}

#[test]
fn rest_without_actuals_is_empty_and_unsupplied() {
    let binding = bind("(a &REST r)", "1").unwrap();
    assert!(!binding.is_supplied(1));
    assert_eq!(
        binding.evaluate(&env()).unwrap().values,
        vec![Value::int(1), rest([])]
    );
}

#[test]
fn keywords_match_by_name() {
    assert_eq!(call("(&KEY a b)", ":a 1"), vec![Value::int(1), Value::Nil]);
    assert_eq!(
        call("(&KEY a b)", ":b 2 :A 1"),
        vec![Value::int(1), Value::int(2)]
    );
}

#[test]
fn keyword_slots_record_whether_they_were_supplied() {
    let binding = bind("(&KEY a b)", ":a 1").unwrap();
    assert_eq!(binding.supplied(), &[true, false]);

    let frame = bind("(&KEY (a 0 a?) (b 5 b?))", ":a 1")
        .unwrap()
        .evaluate(&env())
        .unwrap();
    assert_eq!(frame.values, vec![Value::int(1), Value::int(5)]);
    assert_eq!(frame.env.lookup("a?"), Some(Value::Bool(true)));
    assert_eq!(frame.env.lookup("b?"), Some(Value::Bool(false)));
}

#[test]
fn first_keyword_occurrence_wins() {
    assert_eq!(call("(&KEY a)", ":a 1 :a 2"), vec![Value::int(1)]);
}

#[test]
fn rest_before_keywords_stays_empty() {
    assert_eq!(
        call("(&REST r &KEY k)", ":k 1"),
        vec![rest([]), Value::int(1)]
    );
}

#[test]
fn rest_key_collects_what_keywords_leave() {
    assert_eq!(
        call("(&KEY k &REST-KEY more)", ":k 1 2 3"),
        vec![Value::int(1), rest([Value::int(2), Value::int(3)])]
    );
}

#[test]
fn other_keys_need_permission() {
    assert_eq!(
        bind_error("(&KEY a)", ":b 1"),
        BindErrorKind::UnexpectedKeyword("b".into())
    );
    assert_eq!(
        call("(&KEY a &ALLOW-OTHER-KEYS)", ":b 1 :a 2"),
        vec![Value::int(2)]
    );
    assert_eq!(
        call("(&KEY a &ALLOW-OTHER-KEYS &REST-KEY more)", ":b 1 :a 2"),
        vec![Value::int(2), rest([kw("b"), Value::int(1)])]
    );
}

#[test]
fn keyword_errors() {
    assert_eq!(
        bind_error("(&KEY a)", "1"),
        BindErrorKind::ExpectedKeyword("1".into())
    );
    assert_eq!(
        bind_error("(&KEY a)", ":a"),
        BindErrorKind::MissingKeywordValue("a".into())
    );
}

#[test]
fn too_few_arguments() {
    let err = bind("(a b &REQUIRED)", "1").unwrap_err();
    assert_eq!(
        err.kind,
        BindErrorKind::InsufficientArguments {
            expected: 2,
            got: 1
        }
    );
    assert_eq!(
        bind_error("(a &OPTIONAL b &REQUIRED c)", "1"),
        BindErrorKind::InsufficientArguments {
            expected: 2,
            got: 1
        }
    );
}

#[test]
fn too_many_arguments_points_at_the_first_extra() {
    let err = bind("(a)", "1 2 3").unwrap_err();
    assert_eq!(err.kind, BindErrorKind::TooManyArguments { extra: 2 });
    assert_eq!(err.span.map(|s| s.column()), Some(3));
}

#[test]
fn unreadable_argument_is_a_compile_error() {
    let spec = spec("(a)");
    let (tree, ids) = args_tree("1 )");
    assert!(ids
        .iter()
        .any(|&id| matches!(tree.node(id).kind, NodeKind::Leaf(None))));
    let err = ArgumentBinder::new(&spec, &SimpleCompiler)
        .bind(&tree, &ids)
        .unwrap_err();
    assert!(matches!(err.kind, BindErrorKind::Compile(_)));
}

#[test]
fn defaults_see_earlier_slots_and_store_vars_record_supply() {
    let frame = bind("(a &OPTIONAL (b a b?) (c 9 c?))", "5 6")
        .unwrap()
        .evaluate(&env())
        .unwrap();
    assert_eq!(
        frame.values,
        vec![Value::int(5), Value::int(6), Value::int(9)]
    );
    assert_eq!(frame.env.lookup("b?"), Some(Value::Bool(true)));
    assert_eq!(frame.env.lookup("c?"), Some(Value::Bool(false)));

    let frame = bind("(a &OPTIONAL (b a))", "5")
        .unwrap()
        .evaluate(&env())
        .unwrap();
    assert_eq!(frame.values, vec![Value::int(5), Value::int(5)]);
}

#[test]
fn supplied_arguments_evaluate_in_the_caller() {
    let caller = env();
    caller.define("x", Value::int(7));
    let binding = bind("(a &OPTIONAL (b x))", "x").unwrap();

    let frame = binding.evaluate(&caller).unwrap();
    assert_eq!(frame.values, vec![Value::int(7), Value::int(7)]);
    assert!(!frame.env.same_scope(&caller));
    assert!(frame.env.defines_locally("a"));
    assert!(!caller.defines_locally("a"));

    assert_eq!(
        bind("(a)", "y").unwrap().evaluate(&caller).unwrap_err(),
        EvalError::UndefinedVariable("y".into())
    );
}

#[test]
fn binding_is_reusable_across_calls() {
    let binding = bind("(a)", "1").unwrap();
    let first = binding.evaluate(&env()).unwrap();
    let second = binding.evaluate(&env()).unwrap();
    assert_eq!(first.values, second.values);
    assert!(!first.env.same_scope(&second.env));
}

/// Counts its evaluations and returns the count.
#[derive(Debug)]
struct Tick(Rc<Cell<i32>>);

impl Evaluable for Tick {
    fn eval(&self, _env: &Environment) -> EvalResult {
        self.0.set(self.0.get() + 1);
        Ok(Value::int(self.0.get()))
    }
}

/// Compiles every form to a shared [`Tick`].
struct TickCompiler(Rc<Cell<i32>>);

impl Compiler for TickCompiler {
    fn compile(&self, _tree: &ParseTree, _node: NodeId) -> Result<CompiledExpr, BindError> {
        Ok(Rc::new(Tick(Rc::clone(&self.0))))
    }
}

#[test]
fn lazy_arguments_run_only_when_forced() {
    let count = Rc::new(Cell::new(0));
    let spec = spec("(&LAZY a &REST more)");
    let (tree, ids) = args_tree("x y z");
    let binding = ArgumentBinder::new(&spec, &TickCompiler(Rc::clone(&count)))
        .bind(&tree, &ids)
        .unwrap();

    let frame = binding.evaluate(&env()).unwrap();
    assert_eq!(count.get(), 0);

    let Value::Deferred(a) = &frame.values[0] else {
        panic!("expected a deferred value, got {:?}", frame.values[0]);
    };
    assert!(a.is_bound());
    assert_eq!(a.force(), Ok(Value::int(1)));
    assert_eq!(a.force(), Ok(Value::int(2)));

    let Value::Rest(more) = &frame.values[1] else {
        panic!("expected rest arguments");
    };
    assert_eq!(count.get(), 2);
    assert_eq!(more.get(1), Ok(Value::int(3)));
    assert_eq!(count.get(), 3);
}

#[test]
fn lazy_default_is_bound_to_the_call_environment() {
    let frame = bind("(a &LAZY &OPTIONAL (b a))", "4")
        .unwrap()
        .evaluate(&env())
        .unwrap();
    let Value::Deferred(b) = &frame.values[1] else {
        panic!("expected a deferred value");
    };
    assert!(b.env().is_some_and(|e| e.same_scope(&frame.env)));
    assert_eq!(b.force(), Ok(Value::int(4)));
}

fn bind_piped(params: &str, args: &str) -> Vec<Value> {
    let spec = spec(params);
    let (tree, ids) = args_tree(args);
    ArgumentBinder::new(&spec, &SimpleCompiler)
        .bind_piped(&tree, ids[0], &ids[1..])
        .unwrap()
        .evaluate(&env())
        .unwrap()
        .values
}

#[test]
fn piped_argument_goes_to_the_pipe_slot() {
    assert_eq!(
        bind_piped("(a &PIPE b)", "9 1"),
        vec![Value::int(1), Value::int(9)]
    );
}

#[test]
fn piped_argument_leads_without_a_pipe_slot() {
    assert_eq!(
        bind_piped("(a b)", "9 1"),
        vec![Value::int(9), Value::int(1)]
    );
}

#[test]
fn piped_argument_heads_a_rest_pipe_slot() {
    assert_eq!(
        bind_piped("(a &PIPE &REST r)", "9 1 2"),
        vec![Value::int(1), rest([Value::int(9), Value::int(2)])]
    );
}

#[test]
fn piped_argument_heads_a_rest_key_pipe_slot() {
    assert_eq!(
        bind_piped("(&KEY k &PIPE &REST-KEY more)", "9 :k 1 2"),
        vec![Value::int(1), rest([Value::int(9), Value::int(2)])]
    );
    assert_eq!(
        bind_piped("(&KEY k &PIPE &REST-KEY more)", "9 :k 1"),
        vec![Value::int(1), rest([Value::int(9)])]
    );
}

#[test]
fn piped_keyword_slot_still_matches_by_name() {
    assert_eq!(bind_piped("(&PIPE &KEY k)", "9"), vec![Value::int(9)]);
    assert_eq!(bind_piped("(&PIPE &KEY k)", "9 :k 1"), vec![Value::int(1)]);
    assert_eq!(
        bind_piped("(&PIPE &KEY k j)", "9 :j 2"),
        vec![Value::int(9), Value::int(2)]
    );
}

fn names(prefix: &str, count: usize) -> String {
    (0..count)
        .map(|i| format!("{prefix}{i}"))
        .collect::<Vec<_>>()
        .join(" ")
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 1000,
        ..ProptestConfig::default()
    })]

    /// Positional binding succeeds exactly when the argument count fits.
    #[test]
    fn positional_arity(
        required in 0usize..4,
        optional in 0usize..3,
        with_rest in any::<bool>(),
        supplied in 0usize..9,
    ) {
        let mut params = format!("({} &OPTIONAL {}", names("r", required), names("o", optional));
        if with_rest {
            params.push_str(" &REST more");
        }
        params.push(')');
        let args = (0..supplied).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");

        let fits = supplied >= required && (with_rest || supplied <= required + optional);
        match bind(&params, &args) {
            Ok(binding) => {
                prop_assert!(fits);
                let flags = binding.supplied();
                let used = flags.iter().take(required + optional).filter(|&&s| s).count();
                prop_assert_eq!(used, supplied.min(required + optional));
            }
            Err(err) => {
                prop_assert!(!fits);
                let expected_kind = if supplied < required {
                    matches!(err.kind, BindErrorKind::InsufficientArguments { .. })
                } else {
                    matches!(err.kind, BindErrorKind::TooManyArguments { .. })
                };
                prop_assert!(expected_kind);
            }
        }
    }
}
