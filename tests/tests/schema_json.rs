use pretty_assertions::assert_eq;
use quarry_core::{
    schema::{CollectionSchema, FieldSchema, IndexFieldSchema, IndexSchema},
    stmt::{ColumnType, Direction, IndexType},
    Schema,
};
use tests::*;

const ORDERS: &str = r#"{
    "namespace": "app",
    "collections": [
        {
            "handle": "orders",
            "fields": [
                { "handle": "id", "type": "int", "auto_increment": true },
                { "handle": "customer", "type": "text", "size": 64 },
                { "handle": "total", "type": "float" },
                { "handle": "placed_at", "type": "datetime" }
            ],
            "indexes": [
                {
                    "handle": "by_customer",
                    "type": "index",
                    "fields": [
                        { "field": "customer" },
                        { "field": "placed_at", "direction": "desc" }
                    ]
                }
            ]
        }
    ]
}"#;

fn orders() -> Schema {
    serde_json::from_str(ORDERS).unwrap()
}

#[test]
fn loads_schema_from_json() {
    let expected = Schema {
        namespace: Some("app".to_string()),
        collections: vec![CollectionSchema::new("orders")
            .field(FieldSchema::new("id", ColumnType::Int).auto_increment())
            .field(FieldSchema::new("customer", ColumnType::Text).size(64))
            .field(FieldSchema::new("total", ColumnType::Float))
            .field(FieldSchema::new("placed_at", ColumnType::DateTime))
            .index(IndexSchema {
                handle: "by_customer".to_string(),
                ty: IndexType::Index,
                fields: vec![
                    IndexFieldSchema {
                        field: "customer".to_string(),
                        direction: Direction::Asc,
                    },
                    IndexFieldSchema {
                        field: "placed_at".to_string(),
                        direction: Direction::Desc,
                    },
                ],
            })],
    };

    assert_eq!(orders(), expected);
}

#[test]
fn rejects_unknown_types() {
    let json = r#"{ "collections": [{ "handle": "t", "fields": [{ "handle": "x", "type": "money" }] }] }"#;
    assert!(serde_json::from_str::<Schema>(json).is_err());
}

async fn json_schema_applies_cleanly(mut test: DbTest) {
    let target = orders();
    test.migrate_to(&target).await;

    let live = test.introspect().await;
    assert!(test.diff(&live, &target).is_empty(), "{live:#?}");

    let indexes = &live.collections[0].indexes;
    assert!(indexes
        .iter()
        .any(|index| index.handle == "by_customer" && index.fields[1].direction == Direction::Desc));
}

tests!(json_schema_applies_cleanly);
