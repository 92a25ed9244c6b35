use criterion::{criterion_group, criterion_main, Criterion};
use filtercrate::{
    AssociationDef, Criteria, EntityMetadata, FieldDef, FieldType, MetadataRegistry,
    QueryFilterManager,
};
use std::hint::black_box;

fn build_manager() -> QueryFilterManager {
    let registry = MetadataRegistry::default()
        .with_entity(
            EntityMetadata::new("account", "accounts")
                .with_field(FieldDef::new("id", "id", FieldType::Uuid))
                .with_field(FieldDef::new("name", "name", FieldType::String))
                .with_field(FieldDef::new("age", "age", FieldType::Integer))
                .with_field(FieldDef::new("balance", "balance", FieldType::Float))
                .with_field(FieldDef::new("active", "active", FieldType::Boolean))
                .with_field(FieldDef::new("created_at", "created_at", FieldType::DateTime))
                .with_association(AssociationDef::new("orders", "order", "id", "account_id")),
        )
        .with_entity(
            EntityMetadata::new("order", "orders")
                .with_field(FieldDef::new("id", "id", FieldType::Uuid))
                .with_field(FieldDef::new("total", "total", FieldType::Float))
                .with_field(FieldDef::new("status", "status", FieldType::String)),
        );
    QueryFilterManager::new(registry)
}

fn nested_criteria() -> Criteria {
    Criteria::parse(
        r#"{
            "filters": [
                {"name": "eq", "field": "active", "value": true},
                {"name": "between", "field": "created_at",
                 "from": "2024-01-01", "to": "2024-12-31"},
                {"name": "or", "conditions": [
                    {"name": "lt", "field": "age", "value": 30},
                    {"name": "and", "conditions": [
                        {"name": "gte", "field": "balance", "value": 1000.5},
                        {"name": "beginswith", "field": "name", "value": "A"}
                    ]}
                ]},
                {"name": "leftjoin", "field": "orders", "alias": "o", "conditions": [
                    {"name": "in", "field": "status", "value": ["paid", "shipped"]}
                ]},
                {"name": "gt", "field": "o.total", "value": 50}
            ],
            "sort": [
                {"field": "created_at", "direction": "desc"},
                {"field": "o.total", "direction": "desc"}
            ]
        }"#,
    )
    .expect("benchmark criteria should parse")
}

fn bench_compile(c: &mut Criterion) {
    let manager = build_manager();
    let criteria = nested_criteria();

    c.bench_function("compile_nested_criteria", |b| {
        b.iter(|| {
            manager
                .compile(black_box("account"), black_box(&criteria))
                .expect("criteria should compile")
        });
    });

    c.bench_function("parse_and_compile_nested_criteria", |b| {
        let json = serde_json::to_string(&criteria).unwrap();
        b.iter(|| {
            let criteria = Criteria::parse(black_box(&json)).unwrap();
            manager.compile("account", &criteria).unwrap()
        });
    });
}

criterion_group!(benches, bench_compile);
criterion_main!(benches);
