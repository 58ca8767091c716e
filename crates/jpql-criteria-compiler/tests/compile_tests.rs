//! Binding-mode selection and argument handling of the top-level compiler

use chrono::NaiveDate;
use jpql_criteria_ast::{
    Argument, Assignments, Comparison, Composite, Criteria, Fragment, Injector, NamedBindings,
    Operand, Selector, Sentinel, Statement, Value, agg, cri, group, having_text, limit, offset,
    order, sql, sub,
};
use jpql_criteria_compiler::{BindingMode, Compiler, CompilerConfig, EntityQuery, Parameters};
use jpql_criteria_diagnostics::{JPQ0004, JPQ0100, JPQ0101, JPQ0102, JPQ0200, JPQ0201};
use pretty_assertions::assert_eq;
use rstest::rstest;
use rust_decimal::Decimal;

fn compiler() -> Compiler {
    Compiler::with_alias("e").unwrap()
}

fn bindings<const N: usize>(pairs: [(&str, Value); N]) -> NamedBindings {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn adult_and_active() -> Criteria {
    Composite::of(Comparison::gt("age", 18).unwrap())
        .and(Comparison::eq("status", "ACTIVE").unwrap())
        .into()
}

#[test]
fn test_positional_conjunction() {
    let compiled = compiler().compile(&adult_and_active(), &[]).unwrap();
    assert_eq!(compiled.text, "(e.age > ?1 AND e.status = ?2)");
    assert_eq!(
        compiled.parameters,
        Parameters::Positional(vec![Value::from(18), Value::from("ACTIVE")])
    );
}

#[rstest]
#[case(Value::from(42))]
#[case(Value::from("x"))]
#[case(Value::from(true))]
#[case(Value::list([1, 2]))]
fn test_single_value_binds_first(#[case] value: Value) {
    let criteria = Criteria::from(Comparison::new("f", value.clone()).unwrap());
    let compiled = compiler().compile(&criteria, &[]).unwrap();
    assert_eq!(compiled.text, "e.f = ?1");
    assert_eq!(compiled.parameters, Parameters::Positional(vec![value]));
}

#[test]
fn test_null_has_no_binding() {
    let criteria = Criteria::from(Comparison::new("f", Value::Null).unwrap());
    let compiled = compiler().compile(&criteria, &[]).unwrap();
    assert_eq!(compiled.text, "e.f IS NULL");
    assert!(compiled.parameters.values().is_empty());
}

#[test]
fn test_single_negated_child() {
    let criteria = Criteria::from(cri("a", 1).unwrap().not());
    let compiled = compiler().compile(&criteria, &[]).unwrap();
    assert_eq!(compiled.text, "NOT (e.a = ?1)");
}

#[test]
fn test_trailing_values_seed_positional_sequence() {
    let criteria = Criteria::from(Comparison::gt("age", 18).unwrap());
    let compiled = compiler()
        .compile(&criteria, &[Argument::from("seed")])
        .unwrap();
    assert_eq!(compiled.text, "e.age > ?2");
    assert_eq!(
        compiled.parameters,
        Parameters::Positional(vec![Value::from("seed"), Value::from(18)])
    );
}

#[test]
fn test_leading_mapping_selects_named_mode() {
    let seed = bindings([("tenant", Value::from(3))]);
    let args = [Argument::Map(seed), Argument::from("extra")];
    let compiled = compiler().compile(&adult_and_active(), &args).unwrap();

    assert_eq!(compiled.text, "(e.age > :age AND e.status = :status)");
    assert_eq!(
        compiled.parameters,
        Parameters::Named {
            bindings: bindings([
                ("tenant", Value::from(3)),
                ("age", Value::from(18)),
                ("status", Value::from("ACTIVE")),
            ]),
            passthrough: vec![Value::from("extra")],
        }
    );
}

#[test]
fn test_naming_tree_selects_named_mode() {
    let criteria = Criteria::from(
        Composite::of(Comparison::ge("age", 21).unwrap().named("minAge"))
            .or(Comparison::eq("vip", true).unwrap()),
    );
    let compiled = compiler()
        .compile(&criteria, &[Argument::from(99)])
        .unwrap();
    assert_eq!(compiled.text, "(e.age >= :minAge OR e.vip = :vip)");
    assert_eq!(compiled.parameters.mode(), BindingMode::Named);
    let Parameters::Named { passthrough, .. } = compiled.parameters else {
        panic!("expected named parameters");
    };
    assert_eq!(passthrough, vec![Value::from(99)]);
}

#[test]
fn test_named_same_value_twice_is_accepted() {
    let criteria = Criteria::from(
        Composite::of(Comparison::eq("x", 1).unwrap().named("x"))
            .or(Comparison::eq("y.x", 1).unwrap().named("x")),
    );
    let compiled = compiler().compile(&criteria, &[]).unwrap();
    assert_eq!(compiled.text, "(e.x = :x OR e.y.x = :x)");
    assert_eq!(compiled.parameters.values(), vec![&Value::from(1)]);
}

#[test]
fn test_named_conflict() {
    let criteria = Criteria::from(
        Composite::of(Comparison::eq("x", 1).unwrap().named("x"))
            .or(Comparison::eq("y", 2).unwrap().named("x")),
    );
    let err = compiler().compile(&criteria, &[]).unwrap_err();
    assert_eq!(err.code(), JPQ0100);

    let seed = bindings([("status", Value::from("DELETED"))]);
    let err = compiler()
        .compile(&adult_and_active(), &[Argument::Map(seed)])
        .unwrap_err();
    assert_eq!(err.code(), JPQ0100);
}

#[test]
fn test_late_mapping_is_rejected() {
    let args = [Argument::from(1), Argument::Map(NamedBindings::new())];
    let err = compiler().compile(&adult_and_active(), &args).unwrap_err();
    assert_eq!(err.code(), JPQ0101);
}

#[test]
fn test_trailing_statements_and_injectors() {
    let args = [
        Argument::from(group("dept").unwrap()),
        Argument::from(having_text("COUNT(e) > ?", [2])),
        Argument::from(order("dept DESC").unwrap()),
        offset(20),
        limit(10),
    ];
    let compiled = compiler().compile(&adult_and_active(), &args).unwrap();
    assert_eq!(compiled.text, "(e.age > ?1 AND e.status = ?2)");
    assert_eq!(compiled.tail, " GROUP BY e.dept HAVING COUNT(e) > ?3 ORDER BY e.dept DESC");
    assert_eq!(
        compiled.query(),
        "(e.age > ?1 AND e.status = ?2) GROUP BY e.dept HAVING COUNT(e) > ?3 ORDER BY e.dept DESC"
    );
    assert_eq!(compiled.parameters.values().len(), 3);
    assert_eq!(compiled.injectors, vec![Injector::Offset(20), Injector::Limit(10)]);
}

#[test]
fn test_sub_and_native_inside_tree() {
    let criteria = Criteria::from(
        Composite::of(Comparison::eq("a", 1).unwrap())
            .and(Criteria::Sub(Fragment::with_args(
                "e.b BETWEEN ? AND ?",
                [5, 9],
            )))
            .and(Comparison::with_op("c", ">", sql("NOW()", Vec::<Value>::new())).unwrap()),
    );
    let compiled = compiler().compile(&criteria, &[]).unwrap();
    assert_eq!(
        compiled.text,
        "(e.a = ?1 AND e.b BETWEEN ?2 AND ?3 AND e.c > (SQL('NOW()')))"
    );
}

#[test]
fn test_nested_sub_shares_numbering() {
    let inner = sub("SELECT d.id FROM Dept d WHERE d.region = ?", ["EU"]);
    let criteria = Criteria::from(
        Composite::of(Comparison::eq("active", true).unwrap())
            .and(Comparison::with_op("dept.id", "IN", inner).unwrap())
            .and(Comparison::lt("age", 65).unwrap()),
    );
    let compiled = compiler().compile(&criteria, &[]).unwrap();
    assert_eq!(
        compiled.text,
        "(e.active = ?1 AND e.dept.id IN (SELECT d.id FROM Dept d WHERE d.region = ?2) AND e.age < ?3)"
    );
}

#[test]
fn test_named_sub_needs_mapping() {
    let criteria = Criteria::from(
        Composite::of(Comparison::eq("a", 1).unwrap().named("a"))
            .and(Criteria::Sub(Fragment::with_args("e.b = :b", [2]))),
    );
    let err = compiler().compile(&criteria, &[]).unwrap_err();
    assert_eq!(err.code(), JPQ0102);
}

#[test]
fn test_having_count_mismatch() {
    let args = [Argument::from(having_text("COUNT(e) > ? AND MAX(e.x) < ?", [1]))];
    let err = compiler().compile(&adult_and_active(), &args).unwrap_err();
    assert_eq!(err.code(), JPQ0200);
}

#[test]
fn test_update_positional() {
    let assignments = Assignments::new()
        .set("salary", 2000)
        .unwrap()
        .set("title", "Lead")
        .unwrap();
    let criteria = Criteria::from(Comparison::eq("id", 7).unwrap());
    let compiled = compiler()
        .compile_update(&assignments, Some(&criteria), &[])
        .unwrap();
    assert_eq!(compiled.set.as_deref(), Some("e.salary = ?1, e.title = ?2"));
    assert_eq!(compiled.text, "e.id = ?3");
    assert_eq!(
        compiled.parameters,
        Parameters::Positional(vec![Value::from(2000), Value::from("Lead"), Value::from(7)])
    );
}

#[test]
fn test_update_named_keys() {
    let assignments = Assignments::from_pairs([("address.city", "Oslo")]).unwrap();
    let criteria = Criteria::from(Comparison::eq("id", 7).unwrap().named("id"));
    let compiled = compiler()
        .compile_update(&assignments, Some(&criteria), &[])
        .unwrap();
    assert_eq!(compiled.set.as_deref(), Some("e.address.city = :address_city"));
    assert_eq!(compiled.text, "e.id = :id");
    assert_eq!(
        compiled.parameters.named().map(|b| b.keys().cloned().collect::<Vec<_>>()),
        Some(vec!["address_city".to_string(), "id".to_string()])
    );
}

#[test]
fn test_update_without_assignments() {
    let err = compiler()
        .compile_update(&Assignments::new(), None, &[])
        .unwrap_err();
    assert_eq!(err.code(), JPQ0004);
}

#[test]
fn test_tree_reuse_is_deterministic() {
    let criteria = adult_and_active();
    let compiler = compiler();
    let first = compiler.compile(&criteria, &[]).unwrap();
    let second = compiler.compile(&criteria, &[]).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_shared_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Compiler>();
    assert_send_sync::<EntityQuery>();
    assert_send_sync::<Criteria>();

    let compiler = compiler();
    let criteria = adult_and_active();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| compiler.compile(&criteria, &[]).unwrap().text))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "(e.age > ?1 AND e.status = ?2)");
        }
    });
}

#[test]
fn test_config_alias() {
    let config = CompilerConfig::new().with_alias("emp");
    let compiled = Compiler::new(&config)
        .unwrap()
        .compile(&adult_and_active(), &[])
        .unwrap();
    assert_eq!(compiled.text, "(emp.age > ?1 AND emp.status = ?2)");
}

#[rstest]
#[case("=", "e.f IS NULL")]
#[case("<>", "e.f IS NOT NULL")]
#[case("!=", "e.f IS NOT NULL")]
fn test_scalar_null_renders_null_check(#[case] op: &str, #[case] expected: &str) {
    let criteria = Criteria::from(Comparison::with_op("f", op, Operand::Scalar(Value::Null)).unwrap());
    let compiled = compiler().compile(&criteria, &[]).unwrap();
    assert_eq!(compiled.text, expected);
    assert_eq!(compiled.parameters, Parameters::Positional(vec![]));
}

#[test]
fn test_scalar_null_from_json() {
    let doc = serde_json::json!({ "comparison": { "field": "f", "op": "<>", "value": { "scalar": "null" } } });
    let criteria: Criteria = serde_json::from_value(doc).unwrap();
    let compiled = compiler().compile(&criteria, &[]).unwrap();
    assert_eq!(compiled.text, "e.f IS NOT NULL");
    assert!(compiled.parameters.values().is_empty());
}

#[test]
fn test_decimal_and_date_values_bind() {
    let hired = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let criteria = Criteria::from(
        Composite::of(Comparison::ge("salary", Decimal::new(250_050, 2)).unwrap())
            .and(Comparison::lt("hired", hired).unwrap()),
    );
    let compiled = compiler().compile(&criteria, &[]).unwrap();
    assert_eq!(compiled.text, "(e.salary >= ?1 AND e.hired < ?2)");
    assert_eq!(
        compiled.parameters,
        Parameters::Positional(vec![Value::Decimal(Decimal::new(250_050, 2)), Value::Date(hired)])
    );

    let stamp = hired.and_hms_opt(12, 30, 0).unwrap();
    let assignments = Assignments::new().set("reviewed_at", stamp).unwrap();
    let compiled = compiler().compile_update(&assignments, None, &[]).unwrap();
    assert_eq!(compiled.set.as_deref(), Some("e.reviewed_at = ?1"));
    assert_eq!(compiled.parameters.values(), vec![&Value::DateTime(stamp)]);
}

#[test]
fn test_sentinels_in_named_mode_bind_nothing() {
    let criteria = Criteria::from(
        Composite::of(Comparison::eq("tenant_id", 1).unwrap().named("tenant"))
            .and(Comparison::with_op("active", ">", Sentinel::NoValue).unwrap().named("active"))
            .and(Comparison::bare("archived").unwrap()),
    );
    let compiled = compiler()
        .compile(&criteria, &[Argument::Map(NamedBindings::new())])
        .unwrap();
    assert_eq!(compiled.text, "(e.tenant_id = :tenant AND e.active AND e.archived)");
    assert_eq!(compiled.parameters, Parameters::Named {
        bindings: bindings([("tenant", Value::from(1))]),
        passthrough: vec![],
    });
}

#[test]
fn test_null_with_embedded_placeholder() {
    let criteria = Criteria::from(Comparison::new("COALESCE(e.ended, ?)", Value::Null).unwrap());
    let compiled = compiler().compile(&criteria, &[]).unwrap();
    assert_eq!(compiled.text, "COALESCE(e.ended, ?1)");
    assert_eq!(compiled.parameters, Parameters::Positional(vec![Value::Null]));

    let criteria = Criteria::from(Comparison::with_op("ended", "= :ended", Value::Null).unwrap());
    let compiled = compiler().compile(&criteria, &[]).unwrap();
    assert_eq!(compiled.text, "e.ended = :ended");
    assert_eq!(compiled.parameters.named(), Some(&bindings([("ended", Value::Null)])));
}

#[test]
fn test_cast_in_field_is_not_a_parameter() {
    let criteria = Criteria::from(Comparison::new("e.tag::text", "a").unwrap());
    assert!(!criteria.is_naming());
    let compiled = compiler().compile(&criteria, &[]).unwrap();
    assert_eq!(compiled.text, "e.tag::text = ?1");
}

#[test]
fn test_aggregate_select_maps_result_rows() {
    let aggregate = agg("dept, role")
        .unwrap()
        .with("total", "SUM(e.salary)")
        .with("headcount", "COUNT(e)");
    let query = EntityQuery::new("Employee", compiler()).unwrap();
    let compiled = query
        .select_with(&Selector::Aggregate(aggregate.clone()), None, &[])
        .unwrap();
    assert_eq!(
        compiled.text,
        "SELECT e.dept, e.role, SUM(e.salary), COUNT(e) FROM Employee e GROUP BY e.dept, e.role"
    );

    let row = aggregate
        .result([Value::from("Eng"), Value::from("Lead"), Value::from(9000), Value::from(3)])
        .unwrap();
    assert_eq!(row.keys().collect::<Vec<_>>(), ["dept", "role", "total", "headcount"]);
    assert_eq!(row.get("total"), Some(&Value::from(9000)));
}

#[test]
fn test_native_named_with_nested_statement() {
    let bonus = Statement::from(Criteria::from(Comparison::eq("bonus", 5).unwrap().named("bonus")));
    let criteria = Criteria::from(
        Composite::of(Comparison::eq("a", 1).unwrap().named("a"))
            .and(Criteria::Native(Fragment::with_args("COALESCE(?, 0) > 0", [Argument::from(bonus)]))),
    );
    let compiled = compiler().compile(&criteria, &[]).unwrap();
    assert_eq!(compiled.text, "(e.a = :a AND SQL('COALESCE(?, 0) > 0', e.bonus = :bonus))");
    assert_eq!(
        compiled.parameters.named(),
        Some(&bindings([("a", Value::from(1)), ("bonus", Value::from(5))]))
    );
}

#[test]
fn test_having_oversized_placeholder_number() {
    let args = [Argument::from(having_text("COUNT(e) > ?99999999999999999999999", [5]))];
    let err = compiler().compile(&adult_and_active(), &args).unwrap_err();
    assert_eq!(err.code(), JPQ0201);
}

#[test]
fn test_update_named_set_and_where_share_keys() {
    let assignments = Assignments::from_pairs([("status", "ARCHIVED")]).unwrap();
    let seed = [Argument::Map(NamedBindings::new())];

    let criteria = Criteria::from(Comparison::eq("status", "ACTIVE").unwrap());
    let err = compiler()
        .compile_update(&assignments, Some(&criteria), &seed)
        .unwrap_err();
    assert_eq!(err.code(), JPQ0100);

    let criteria = Criteria::from(Comparison::eq("status", "ACTIVE").unwrap().named("current"));
    let compiled = compiler()
        .compile_update(&assignments, Some(&criteria), &seed)
        .unwrap();
    assert_eq!(compiled.set.as_deref(), Some("e.status = :status"));
    assert_eq!(compiled.text, "e.status = :current");
}
