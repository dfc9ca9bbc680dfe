use pretty_assertions::assert_eq;
use quarry_core::{
    schema::{CollectionSchema, FieldSchema},
    stmt::{
        self, begins_with, eq, gt, in_list, lt, ne, Collection, ColumnType, Field, Union, Value,
    },
    Schema,
};
use tests::*;

fn people() -> Collection {
    Collection::namespaced("people", NAMESPACE)
}

fn names(rows: Vec<quarry_core::driver::Row>) -> Vec<Value> {
    rows.into_iter()
        .map(|mut row| row.swap_remove("name").unwrap())
        .collect()
}

fn expect(names: &[&str]) -> Vec<Value> {
    names.iter().map(|name| Value::from(*name)).collect()
}

async fn setup(test: &mut DbTest) {
    test.migrate_to(&Schema {
        namespace: Some(NAMESPACE.to_string()),
        collections: vec![CollectionSchema::new("people")
            .field(FieldSchema::new("id", ColumnType::Int).auto_increment())
            .field(FieldSchema::new("name", ColumnType::Text))
            .field(FieldSchema::new("age", ColumnType::Int))
            .field(FieldSchema::new("nick", ColumnType::Text))],
    })
    .await;

    for (name, age) in [("Alice", 30), ("Bob", 19), ("Carol", 42), ("Dave", 30)] {
        test.exec(stmt::insert(people()).set("name", name).set("age", age))
            .await;
    }

    test.exec(stmt::update(people()).set("nick", "Ally").eq("name", "Alice"))
        .await;
}

async fn by_name(test: &mut DbTest, filter: stmt::Condition) -> Vec<Value> {
    names(
        test.rows(stmt::select().from(people()).filter(filter).sort("name"))
            .await,
    )
}

async fn or_with_window(mut test: DbTest) {
    setup(&mut test).await;

    let rows = test
        .rows(
            stmt::select()
                .from(people())
                .fields(["name"])
                .filter(stmt::or(eq("name", "Alice"), gt("age", 25)))
                .sort(Field::new("name").desc())
                .offset(1)
                .limit(2),
        )
        .await;

    assert_eq!(names(rows), expect(&["Carol", "Alice"]));
}

async fn nested_or_under_and(mut test: DbTest) {
    setup(&mut test).await;

    let filter = stmt::and(
        stmt::or(eq("age", 30), eq("age", 19)),
        stmt::or(eq("name", "Bob"), eq("name", "Dave")),
    );

    let rows = test
        .rows(stmt::select().from(people()).filter(filter).sort("name"))
        .await;

    assert_eq!(names(rows), expect(&["Bob", "Dave"]));
}

async fn in_list_by_key(mut test: DbTest) {
    setup(&mut test).await;

    let rows = test
        .rows(
            stmt::select()
                .from(people())
                .filter(in_list("id", [3, 1, 7]).unwrap())
                .sort("id"),
        )
        .await;

    assert_eq!(names(rows), expect(&["Alice", "Carol"]));
}

async fn union_of_selects(mut test: DbTest) {
    setup(&mut test).await;

    let union = Union::new([
        stmt::select().from(people()).fields(["name"]).filter(lt("age", 20)),
        stmt::select().from(people()).fields(["name"]).filter(gt("age", 40)),
        stmt::select().from(people()).fields(["name"]).eq("name", "Bob"),
    ])
    .unwrap()
    .sort(Field::new("name").desc());

    assert_eq!(names(test.rows(union).await), expect(&["Carol", "Bob"]));
}

async fn xor_is_rejected_without_native_or(mut test: DbTest) {
    setup(&mut test).await;

    let select = stmt::select()
        .from(people())
        .filter(stmt::xor(eq("name", "Alice"), gt("age", 25)));
    let result = test.connection().execute(&select.into(), None).await;

    if test.capability().or {
        // Alice is 30, so only Carol and Dave match exactly one side
        let mut rows = names(result.unwrap().into_rows().unwrap());
        rows.sort_by(|a, b| a.sort_cmp(b));
        assert_eq!(rows, expect(&["Carol", "Dave"]));
    } else {
        assert!(result.unwrap_err().is_too_complex_query());
    }
}

async fn begins_with_is_case_sensitive(mut test: DbTest) {
    setup(&mut test).await;

    assert_eq!(by_name(&mut test, begins_with("name", "al")).await, expect(&[]));
    assert_eq!(by_name(&mut test, begins_with("name", "Al")).await, expect(&["Alice"]));
    assert_eq!(by_name(&mut test, begins_with("name", "")).await.len(), 4);
}

async fn begins_with_matches_wildcards_literally(mut test: DbTest) {
    setup(&mut test).await;

    for name in ["50%_off", "50% more", "5000", "5*0", "5?", "[5]"] {
        test.exec(stmt::insert(people()).set("name", name).set("age", 1))
            .await;
    }

    assert_eq!(
        by_name(&mut test, begins_with("name", "50%")).await,
        expect(&["50% more", "50%_off"])
    );
    assert_eq!(
        by_name(&mut test, begins_with("name", "50%_")).await,
        expect(&["50%_off"])
    );
    assert_eq!(by_name(&mut test, begins_with("name", "5*")).await, expect(&["5*0"]));
    assert_eq!(by_name(&mut test, begins_with("name", "5?")).await, expect(&["5?"]));
    assert_eq!(by_name(&mut test, begins_with("name", "[5")).await, expect(&["[5]"]));
}

async fn null_operands_test_for_null(mut test: DbTest) {
    setup(&mut test).await;

    assert_eq!(
        by_name(&mut test, eq("nick", Value::Null)).await,
        expect(&["Bob", "Carol", "Dave"])
    );
    assert_eq!(by_name(&mut test, ne("nick", Value::Null)).await, expect(&["Alice"]));

    // Other comparisons never match a null field
    assert_eq!(by_name(&mut test, ne("nick", "Ally")).await, expect(&[]));
    assert_eq!(by_name(&mut test, gt("nick", "A")).await, expect(&["Alice"]));
}

tests!(
    begins_with_is_case_sensitive,
    begins_with_matches_wildcards_literally,
    null_operands_test_for_null,
    or_with_window,
    nested_or_under_and,
    in_list_by_key,
    union_of_selects,
    xor_is_rejected_without_native_or,
);
