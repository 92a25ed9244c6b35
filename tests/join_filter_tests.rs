mod common;

use common::{account_entity, manager, sql};
use filtercrate::{Criteria, FilterError, FilterSpec, SortSpec};
use sea_orm::EntityTrait;
use serde_json::json;

fn compile(criteria: &Criteria) -> String {
    let select = manager()
        .apply(account_entity::Entity::find(), "account", criteria)
        .expect("criteria should compile");
    sql(&select)
}

#[test]
fn leftjoin_renders_the_association_on_clause() {
    let criteria = Criteria::default()
        .with_filter(FilterSpec::join("leftjoin", "orders", vec![]).with_alias("o"));
    let rendered = compile(&criteria);
    assert!(
        rendered.contains(r#"LEFT JOIN "orders" AS "o" ON "accounts"."id" = "o"."account_id""#),
        "sql was: {rendered}"
    );
}

#[test]
fn innerjoin_merges_nested_conditions_into_the_on_clause() {
    let criteria = Criteria::default().with_filter(
        FilterSpec::join(
            "innerjoin",
            "orders",
            vec![FilterSpec::comparison("gt", "total", json!(99.5))],
        )
        .with_alias("o"),
    );
    let rendered = compile(&criteria);
    assert!(
        rendered.contains(
            r#"INNER JOIN "orders" AS "o" ON "accounts"."id" = "o"."account_id" AND "o"."total" > 99.5"#
        ),
        "sql was: {rendered}"
    );
}

#[test]
fn join_aliases_stay_visible_to_later_filters_and_sorts() {
    let criteria = Criteria::default()
        .with_filter(FilterSpec::join("leftjoin", "orders", vec![]).with_alias("o"))
        .with_filter(FilterSpec::comparison("eq", "o.status", json!("paid")))
        .with_sort(SortSpec::desc("o.total"));
    let rendered = compile(&criteria);
    assert!(
        rendered.contains(r#""o"."status" = 'paid'"#),
        "sql was: {rendered}"
    );
    assert!(
        rendered.contains(r#"ORDER BY "o"."total" DESC"#),
        "sql was: {rendered}"
    );
}

#[test]
fn omitted_aliases_are_generated() {
    let criteria = Criteria::default().with_filter(FilterSpec::join(
        "leftjoin",
        "orders",
        vec![FilterSpec::comparison("gte", "total", json!(10))],
    ));
    let rendered = compile(&criteria);
    assert!(
        rendered.contains(r#"LEFT JOIN "orders" AS "j1""#),
        "sql was: {rendered}"
    );
    assert!(
        rendered.contains(r#""j1"."total" >= 10"#),
        "sql was: {rendered}"
    );
}

#[test]
fn nested_joins_walk_associations_transitively() {
    // account -> orders, then from the joined orders back to the account.
    let criteria = Criteria::default().with_filter(
        FilterSpec::join(
            "leftjoin",
            "orders",
            vec![FilterSpec::join(
                "innerjoin",
                "account",
                vec![FilterSpec::comparison("gte", "age", json!(18))],
            )
            .with_alias("owner")],
        )
        .with_alias("o"),
    );
    let rendered = compile(&criteria);
    assert!(
        rendered.contains(r#"LEFT JOIN "orders" AS "o" ON "accounts"."id" = "o"."account_id""#),
        "sql was: {rendered}"
    );
    assert!(
        rendered.contains(
            r#"INNER JOIN "accounts" AS "owner" ON "o"."account_id" = "owner"."id" AND "owner"."age" >= 18"#
        ),
        "sql was: {rendered}"
    );
}

#[test]
fn join_errors_are_typed() {
    let err = manager()
        .compile(
            "account",
            &Criteria::default().with_filter(FilterSpec::join("leftjoin", "invoices", vec![])),
        )
        .unwrap_err();
    assert!(matches!(err, FilterError::UnknownAssociation { .. }), "{err}");

    // The root scope owns the table-name alias.
    let err = manager()
        .compile(
            "account",
            &Criteria::default()
                .with_filter(FilterSpec::join("leftjoin", "orders", vec![]).with_alias("accounts")),
        )
        .unwrap_err();
    assert!(matches!(err, FilterError::DuplicateAlias(_)), "{err}");

    let err = manager()
        .compile(
            "account",
            &Criteria::default()
                .with_filter(FilterSpec::comparison("eq", "o.total", json!(1))),
        )
        .unwrap_err();
    assert!(matches!(err, FilterError::UnknownAlias(_)), "{err}");
}

#[test]
fn duplicate_explicit_aliases_are_rejected() {
    let criteria = Criteria::default()
        .with_filter(FilterSpec::join("leftjoin", "orders", vec![]).with_alias("o"))
        .with_filter(FilterSpec::join("innerjoin", "orders", vec![]).with_alias("o"));
    let err = manager().compile("account", &criteria).unwrap_err();
    assert!(matches!(err, FilterError::DuplicateAlias(_)), "{err}");
}

#[test]
fn self_referencing_joins_use_distinct_aliases() {
    let criteria = Criteria::default()
        .with_filter(FilterSpec::join("leftjoin", "orders", vec![]).with_alias("a"))
        .with_filter(FilterSpec::join("leftjoin", "orders", vec![]).with_alias("b"))
        .with_filter(FilterSpec::comparison("gt", "a.total", json!(10)))
        .with_filter(FilterSpec::comparison("lt", "b.total", json!(5)));
    let rendered = compile(&criteria);
    assert!(rendered.contains(r#"AS "a""#), "sql was: {rendered}");
    assert!(rendered.contains(r#"AS "b""#), "sql was: {rendered}");
    assert!(
        rendered.contains(r#""a"."total" > 10 AND "b"."total" < 5"#),
        "sql was: {rendered}"
    );
}
