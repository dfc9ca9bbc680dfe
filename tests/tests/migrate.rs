use pretty_assertions::assert_eq;
use quarry_core::{
    migrate::TEMP_PREFIX,
    schema::{
        detect_collection_renames, diff_with_hints, CollectionSchema, FieldSchema, IndexSchema,
    },
    stmt::{self, Collection, ColumnType, IndexType, Query, Value},
    Schema,
};
use tests::*;

fn users_v1() -> CollectionSchema {
    CollectionSchema::new("users")
        .field(FieldSchema::new("id", ColumnType::Int).auto_increment())
        .field(FieldSchema::new("name", ColumnType::Text))
        .field(FieldSchema::new("age", ColumnType::Int))
        .index(IndexSchema::new("by_name", IndexType::Index, ["name"]))
}

fn users_v2() -> CollectionSchema {
    CollectionSchema::new("users")
        .field(FieldSchema::new("id", ColumnType::Int).auto_increment())
        .field(FieldSchema::new("name", ColumnType::Text))
        .field(FieldSchema::new("email", ColumnType::Text).size(255))
        .index(IndexSchema::new("by_name", IndexType::Index, ["name"]))
        .index(IndexSchema::new("by_email", IndexType::Unique, ["email"]))
}

fn posts() -> CollectionSchema {
    CollectionSchema::new("posts")
        .field(FieldSchema::new("id", ColumnType::Int))
        .field(FieldSchema::new("title", ColumnType::Text))
        .index(IndexSchema::new("pk", IndexType::Primary, ["id"]))
}

fn schema(collections: Vec<CollectionSchema>) -> Schema {
    Schema {
        namespace: Some(NAMESPACE.to_string()),
        collections,
    }
}

fn users() -> Collection {
    Collection::namespaced("users", NAMESPACE)
}

async fn seed(test: &mut DbTest, names: &[&str]) {
    for (i, name) in names.iter().enumerate() {
        test.exec(
            stmt::insert(users())
                .set("name", *name)
                .set("age", 20 + i as i64),
        )
        .await;
    }
}

async fn user_names(test: &mut DbTest, collection: Collection) -> Vec<Value> {
    test.rows(stmt::select().from(collection).fields(["name"]).sort("id"))
        .await
        .into_iter()
        .map(|mut row| row.swap_remove("name").unwrap())
        .collect()
}

/// Temporary collections created by the migrator, by name.
fn temp_collections(log: &[Query]) -> Vec<&str> {
    log.iter()
        .filter_map(|query| match query {
            Query::CreateCollection(create) if create.collection.name.starts_with(TEMP_PREFIX) => {
                Some(create.collection.name.as_str())
            }
            _ => None,
        })
        .collect()
}

async fn create_from_empty(mut test: DbTest) {
    let target = schema(vec![users_v2(), posts()]);
    test.migrate_to(&target).await;

    let live = test.introspect().await;
    assert_eq_unordered!(
        live.collections.iter().map(|c| c.handle.as_str()),
        &["posts", "users"]
    );
    assert!(test.diff(&live, &target).is_empty());
}

async fn converges_and_keeps_rows(mut test: DbTest) {
    test.migrate_to(&schema(vec![users_v1()])).await;
    seed(&mut test, &["Alice", "Bob"]).await;
    test.take_log();

    let target = schema(vec![users_v2(), posts()]);
    let live = test.introspect().await;
    let diffs = test.diff(&live, &target);
    assert!(!diffs.is_empty());

    test.migrate(&live, &diffs).await.unwrap();

    // Dropping a column is a rebuild on backends that cannot drop in place
    let log = test.take_log();
    if test.capability().schema_mutations.drop_column {
        assert!(temp_collections(&log).is_empty());
    } else {
        assert_eq!(temp_collections(&log), ["_quarry_tmp1_users"]);
    }

    let live = test.introspect().await;
    assert!(test.diff(&live, &target).is_empty(), "{:#?}", test.diff(&live, &target));

    assert_eq!(
        user_names(&mut test, users()).await,
        vec![Value::from("Alice"), Value::from("Bob")]
    );

    let rows = test.rows(stmt::select().from(users()).sort("id")).await;
    assert_eq!(rows[0].keys().collect::<Vec<_>>(), ["id", "name", "email"]);
    assert_eq!(rows[1]["email"], Value::Null);

    // The auto-increment counter survives the rebuild
    let id = test
        .exec(stmt::insert(users()).set("name", "Carol"))
        .await
        .into_inserted_id()
        .unwrap();
    assert_eq!(id, Value::I64(3));
}

async fn failed_migration_rolls_back(mut test: DbTest) {
    test.migrate_to(&schema(vec![users_v1()])).await;
    seed(&mut test, &["Alice", "Alice"]).await;

    let before = test.introspect().await;

    // Making `by_name` unique fails on the duplicate names
    let mut unique_names = users_v1().field(FieldSchema::new("nickname", ColumnType::Text));
    unique_names.indexes[0].ty = IndexType::Unique;

    let target = schema(vec![unique_names, posts()]);
    let diffs = test.diff(&before, &target);
    assert!(test.migrate(&before, &diffs).await.is_err());

    let after = test.introspect().await;
    assert!(test.diff(&after, &before).is_empty());
    assert_eq!(after.collections.len(), 1);

    assert_eq!(
        user_names(&mut test, users()).await,
        vec![Value::from("Alice"), Value::from("Alice")]
    );
}

async fn detected_rename_moves_rows(mut test: DbTest) {
    test.migrate_to(&schema(vec![users_v1()])).await;
    seed(&mut test, &["Alice", "Bob"]).await;

    let mut members = users_v1();
    members.handle = "members".to_string();
    let target = schema(vec![members]);

    let live = test.introspect().await;
    let compare = |from, from_size, to, to_size| test.compare_types(from, from_size, to, to_size);

    let hints = detect_collection_renames(&live, &target, compare);
    assert_eq!(hints.get_collection("users"), Some("members"));

    let diffs = diff_with_hints(&live, &target, compare, &hints);
    test.migrate(&live, &diffs).await.unwrap();

    let live = test.introspect().await;
    assert!(test.diff(&live, &target).is_empty());

    assert_eq!(
        user_names(&mut test, Collection::namespaced("members", NAMESPACE)).await,
        vec![Value::from("Alice"), Value::from("Bob")]
    );
}

async fn up_to_date_schema_runs_nothing(mut test: DbTest) {
    let target = schema(vec![users_v1()]);
    test.migrate_to(&target).await;
    test.take_log();

    test.migrate_to(&target).await;

    let log = test.take_log();
    assert!(!log.iter().any(Query::is_ddl), "{log:#?}");
}

tests!(
    create_from_empty,
    converges_and_keeps_rows,
    failed_migration_rolls_back,
    detected_rename_moves_rows,
    up_to_date_schema_runs_nothing,
);
