//! Property tests over generated criteria trees

use jpql_criteria_ast::placeholder::{PlaceholderKind, placeholders};
use jpql_criteria_ast::{Comparison, Composite, Criteria, Value};
use jpql_criteria_compiler::{Compiler, Parameters};
use proptest::prelude::*;

fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z ]{0,10}".prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        Just(Value::Null),
    ]
}

fn leaf() -> impl Strategy<Value = Criteria> {
    (
        "[a-z]{1,8}(\\.[a-z]{1,6})?",
        prop_oneof![Just("="), Just(">"), Just("!="), Just("LIKE")],
        value(),
    )
        .prop_map(|(field, op, value)| Criteria::from(Comparison::with_op(field, op, value).unwrap()))
}

fn tree() -> impl Strategy<Value = Criteria> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        (prop::collection::vec((inner, any::<bool>()), 1..4), any::<bool>()).prop_map(
            |(children, negated)| {
                let composite = children
                    .into_iter()
                    .fold(Composite::new(), |acc, (child, or)| {
                        if or { acc.or(child) } else { acc.and(child) }
                    });
                Criteria::from(composite.not_if(negated))
            },
        )
    })
}

proptest! {
    #[test]
    fn compile_is_deterministic(criteria in tree()) {
        let compiler = Compiler::with_alias("e").unwrap();
        let first = compiler.compile(&criteria, &[]).unwrap();
        let second = compiler.compile(&criteria, &[]).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn positional_numbers_follow_the_sequence(criteria in tree()) {
        let compiled = Compiler::with_alias("e").unwrap().compile(&criteria, &[]).unwrap();
        let Parameters::Positional(values) = &compiled.parameters else {
            return Err(TestCaseError::fail("expected positional parameters"));
        };
        let numbers: Vec<usize> = placeholders(&compiled.text)
            .filter_map(|p| match p.kind {
                PlaceholderKind::Positional(n) => n,
                PlaceholderKind::Named(_) => None,
            })
            .collect();
        let expected: Vec<usize> = (1..=values.len()).collect();
        prop_assert_eq!(numbers, expected);
        prop_assert!(values.iter().all(|v| !v.is_null()));
    }
}
