use pretty_assertions::assert_eq;
use quarry_core::{
    driver::{Connection, Driver, Response, Row},
    schema::Compatibility,
    stmt::{
        self, eq, Collection, Column, ColumnType, Field, Index, Query, Value, Variables,
    },
};
use quarry_driver_sqlite::Sqlite;

async fn connect() -> Box<dyn Connection> {
    Sqlite::in_memory().connect().await.unwrap()
}

async fn exec(connection: &mut dyn Connection, query: impl Into<Query>) -> Response {
    connection.execute(&query.into(), None).await.unwrap()
}

async fn create_users(connection: &mut dyn Connection) {
    exec(
        connection,
        stmt::create_collection("users")
            .column(Column::new("id", ColumnType::Int).auto_increment())
            .column(Column::new("name", ColumnType::Text))
            .column(Column::new("age", ColumnType::Int))
            .index(Index::index("by_name", ["name"]).unwrap()),
    )
    .await;
}

async fn insert_user(connection: &mut dyn Connection, name: &str, age: i64) -> Value {
    exec(
        connection,
        stmt::insert("users").set("name", name).set("age", age),
    )
    .await
    .into_inserted_id()
    .unwrap()
}

fn column(rows: &[Row], name: &str) -> Vec<Value> {
    rows.iter().map(|row| row[name].clone()).collect()
}

// ----- Connection URLs -----

#[test]
fn parses_connection_urls() {
    assert!(matches!(Sqlite::new("sqlite::memory:").unwrap(), Sqlite::InMemory));
    assert!(matches!(
        Sqlite::new("sqlite:/tmp/quarry.db").unwrap(),
        Sqlite::File(path) if path.to_str() == Some("/tmp/quarry.db")
    ));
    assert!(Sqlite::new("postgres://localhost/db")
        .unwrap_err()
        .is_invalid_connection_url());
    assert!(Sqlite::new("not a url").unwrap_err().is_invalid_connection_url());
}

#[test]
fn url_round_trips() {
    assert_eq!(Sqlite::in_memory().url(), "sqlite::memory:");
    assert_eq!(Sqlite::open("/tmp/quarry.db").url(), "sqlite:/tmp/quarry.db");
}

// ----- Reads and writes -----

#[tokio::test]
async fn insert_select_update_delete() {
    let mut connection = connect().await;
    let connection = &mut *connection;
    create_users(connection).await;

    assert_eq!(insert_user(connection, "Alice", 30).await, Value::I64(1));
    assert_eq!(insert_user(connection, "Bob", 19).await, Value::I64(2));
    assert_eq!(insert_user(connection, "Carol", 42).await, Value::I64(3));

    let rows = exec(
        connection,
        stmt::select()
            .from("users")
            .fields(["name"])
            .gt("age", 20)
            .sort(Field::new("name").desc()),
    )
    .await
    .into_rows()
    .unwrap();

    assert_eq!(column(&rows, "name"), vec![Value::from("Carol"), Value::from("Alice")]);

    let updated = exec(connection, stmt::update("users").set("age", 31).eq("name", "Alice")).await;
    let Response::Updated { data } = &updated else {
        panic!("expected update response, got {updated:?}")
    };
    assert_eq!(data.get("age"), Some(&Value::I64(31)));

    assert!(exec(connection, stmt::delete("users").eq("name", "Bob"))
        .await
        .is_acknowledged());

    let rows = exec(connection, stmt::select().from("users").sort("id"))
        .await
        .into_rows()
        .unwrap();

    assert_eq!(column(&rows, "age"), vec![Value::I64(31), Value::I64(42)]);
    assert_eq!(rows[0].keys().collect::<Vec<_>>(), ["id", "name", "age"]);
}

#[tokio::test]
async fn or_filters_run_natively() {
    let mut connection = connect().await;
    let connection = &mut *connection;
    create_users(connection).await;

    for (name, age) in [("Alice", 30), ("Bob", 19), ("Carol", 42)] {
        insert_user(connection, name, age).await;
    }

    let rows = exec(
        connection,
        stmt::select()
            .from("users")
            .filter(stmt::or(eq("name", "Bob"), stmt::gt("age", 40)))
            .sort("name"),
    )
    .await
    .into_rows()
    .unwrap();

    assert_eq!(column(&rows, "name"), vec![Value::from("Bob"), Value::from("Carol")]);
}

#[tokio::test]
async fn variables_are_bound_as_parameters() {
    let mut connection = connect().await;
    let connection = &mut *connection;
    create_users(connection).await;
    insert_user(connection, "Alice", 30).await;

    let query: Query = stmt::select()
        .from("users")
        .eq("name", stmt::variable("who"))
        .into();

    let err = connection.execute(&query, None).await.unwrap_err();
    assert!(err.is_missing_variable());

    let mut variables = Variables::new();
    variables.insert("who".to_string(), Value::from("Alice"));

    let rows = connection
        .execute(&query, Some(&variables))
        .await
        .unwrap()
        .into_rows()
        .unwrap();
    assert_eq!(column(&rows, "age"), vec![Value::I64(30)]);
}

// ----- Introspection -----

#[tokio::test]
async fn describe_reads_back_the_definition() {
    let mut connection = connect().await;
    let connection = &mut *connection;

    let people = Collection::namespaced("people", "app");

    let columns = vec![
        Column::new("id", ColumnType::Int),
        Column::new("email", ColumnType::Text).size(64),
        Column::new("active", ColumnType::Boolean).default_value(true),
        Column::new("score", ColumnType::Float),
    ];

    let mut create = stmt::create_collection(&people)
        .index(Index::primary("pk", ["id"]).unwrap())
        .index(Index::unique("by_email", [Field::new("email").desc()]).unwrap());
    create.columns = columns.clone();

    exec(connection, create).await;

    let (described, indexes) = exec(connection, stmt::describe_collection(&people))
        .await
        .into_description()
        .unwrap();

    assert_eq!(described, columns);
    assert_eq!(
        indexes,
        vec![
            Index::primary("primary", ["id"]).unwrap(),
            Index::unique("by_email", [Field::new("email").desc()]).unwrap(),
        ]
    );
}

#[tokio::test]
async fn describe_flags_auto_increment() {
    let mut connection = connect().await;
    let connection = &mut *connection;
    create_users(connection).await;

    let (columns, indexes) = exec(connection, stmt::describe_collection("users"))
        .await
        .into_description()
        .unwrap();

    assert!(columns[0].auto_increment);
    assert!(!columns[1].auto_increment);
    assert_eq!(indexes[0], Index::primary("primary", ["id"]).unwrap());
    assert_eq!(indexes[1], Index::index("by_name", ["name"]).unwrap());
}

#[tokio::test]
async fn describe_ignores_autoincrement_outside_the_key() {
    let mut connection = connect().await;
    let connection = &mut *connection;

    exec(
        connection,
        stmt::create_collection("autoincrement_log")
            .column(Column::new("id", ColumnType::Int))
            .column(Column::new("autoincrement", ColumnType::Text).default_value("AUTOINCREMENT"))
            .index(Index::primary("pk", ["id"]).unwrap()),
    )
    .await;

    let (columns, _) = exec(connection, stmt::describe_collection("autoincrement_log"))
        .await
        .into_description()
        .unwrap();

    assert!(columns.iter().all(|column| !column.auto_increment));
}

#[tokio::test]
async fn describe_missing_collection() {
    let mut connection = connect().await;

    let err = connection
        .execute(&stmt::describe_collection("ghost").into(), None)
        .await
        .unwrap_err();
    assert!(err.is_invalid_schema());
}

#[tokio::test]
async fn exists_and_show_respect_namespaces() {
    let mut connection = connect().await;
    let connection = &mut *connection;

    for collection in [
        Collection::namespaced("a", "app"),
        Collection::namespaced("b", "app"),
        Collection::namespaced("c", "other"),
        Collection::new("d"),
    ] {
        exec(
            connection,
            stmt::create_collection(collection).column(Column::new("x", ColumnType::Int)),
        )
        .await;
    }

    assert_eq!(
        exec(connection, stmt::collection_exists(("a", "app"))).await,
        Response::Exists(true)
    );
    assert_eq!(
        exec(connection, stmt::collection_exists(("z", "app"))).await,
        Response::Exists(false)
    );

    assert_eq!(
        exec(connection, stmt::show_collection(Some("app")))
            .await
            .into_collections()
            .unwrap(),
        vec![
            Collection::namespaced("a", "app"),
            Collection::namespaced("b", "app"),
        ]
    );

    assert_eq!(
        exec(connection, stmt::show_collection(None))
            .await
            .into_collections()
            .unwrap(),
        vec![
            Collection::new("app_a"),
            Collection::new("app_b"),
            Collection::new("d"),
            Collection::new("other_c"),
        ]
    );
}

#[tokio::test]
async fn compare_types_by_affinity() {
    let connection = connect().await;

    assert_eq!(
        connection.compare_types(ColumnType::Int, None, ColumnType::UInt, None),
        Compatibility::Castable
    );
    assert_eq!(
        connection.compare_types(ColumnType::Text, Some(64), ColumnType::Text, Some(255)),
        Compatibility::Castable
    );
    assert_eq!(
        connection.compare_types(ColumnType::Int, None, ColumnType::Text, None),
        Compatibility::Different
    );
}

// ----- Transactions -----

async fn count_users(connection: &mut dyn Connection) -> usize {
    exec(connection, stmt::select().from("users"))
        .await
        .into_rows()
        .unwrap()
        .len()
}

#[tokio::test]
async fn rollback_discards_writes() {
    let mut connection = connect().await;
    let connection = &mut *connection;
    create_users(connection).await;

    let mut transaction = connection.transaction().await.unwrap();
    transaction
        .execute(&stmt::insert("users").set("name", "Alice").into(), None)
        .await
        .unwrap();
    transaction.rollback().await.unwrap();

    assert_eq!(count_users(connection).await, 0);
}

#[tokio::test]
async fn commit_keeps_writes() {
    let mut connection = connect().await;
    let connection = &mut *connection;
    create_users(connection).await;

    let mut transaction = connection.transaction().await.unwrap();
    transaction
        .execute(&stmt::insert("users").set("name", "Alice").into(), None)
        .await
        .unwrap();
    transaction.commit().await.unwrap();

    assert_eq!(count_users(connection).await, 1);
}

#[tokio::test]
async fn dropped_transaction_rolls_back() {
    let mut connection = connect().await;
    let connection = &mut *connection;
    create_users(connection).await;

    {
        let mut transaction = connection.transaction().await.unwrap();
        transaction
            .execute(&stmt::insert("users").set("name", "Alice").into(), None)
            .await
            .unwrap();
    }

    assert_eq!(count_users(connection).await, 0);
}

#[tokio::test]
async fn ddl_is_transactional() {
    let mut connection = connect().await;
    let connection = &mut *connection;

    let mut transaction = connection.transaction().await.unwrap();
    transaction
        .execute(
            &stmt::create_collection("t")
                .column(Column::new("x", ColumnType::Int))
                .into(),
            None,
        )
        .await
        .unwrap();
    transaction.rollback().await.unwrap();

    assert_eq!(
        exec(connection, stmt::collection_exists("t")).await,
        Response::Exists(false)
    );
}
