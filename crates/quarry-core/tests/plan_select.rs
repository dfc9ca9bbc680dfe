use pretty_assertions::assert_eq;
use quarry_core::driver::{Capability, Row};
use quarry_core::plan::{Branch, Planner, Window};
use quarry_core::stmt::{self, eq, gt, in_list, or, variable, Field, Join, Value, Variables};

fn row(id: i64, name: &str) -> Row {
    let mut row = Row::new();
    row.insert("id".to_string(), id.into());
    row.insert("name".to_string(), name.into());
    row
}

#[test]
fn join_rejected_without_join_support() {
    let select = stmt::select()
        .from("posts")
        .join(Join::inner(
            stmt::select().from("users"),
            "u",
            eq("user_id", Field::qualified("u", "id")),
        ));

    let err = Planner::new(&Capability::MEMORY)
        .plan_select(&select)
        .unwrap_err();
    assert!(err.is_query_not_supported());
    assert!(err.to_string().contains("join not supported"));

    assert!(Planner::new(&Capability::SQLITE).plan_select(&select).is_ok());
}

#[test]
fn or_splits_into_branches_with_widened_limit() {
    let select = stmt::select()
        .from("users")
        .filter(or(eq("name", "Alice"), gt("age", 30)))
        .sort(Field::new("name").desc())
        .offset(2)
        .limit(3);

    let plan = Planner::new(&Capability::MEMORY)
        .plan_select(&select)
        .unwrap();

    assert_eq!(plan.branches.len(), 2);
    for branch in &plan.branches {
        let branch = branch.select();
        assert_eq!(branch.offset, None);
        assert_eq!(branch.limit, Some(5));
        assert_eq!(branch.sort, select.sort);
    }

    assert_eq!(
        plan.merge,
        Some(Window {
            sort: vec![Field::new("name").desc()],
            offset: Some(2),
            limit: Some(3),
        })
    );
}

#[test]
fn single_branch_keeps_its_window() {
    let select = stmt::select().from("users").eq("name", "Alice").limit(10);

    let plan = Planner::new(&Capability::MEMORY)
        .plan_select(&select)
        .unwrap();

    assert_eq!(plan.merge, None);
    assert_eq!(plan.branches.len(), 1);
    assert_eq!(plan.branches[0].select().limit, Some(10));
}

#[test]
fn native_or_is_not_decomposed() {
    let select = stmt::select()
        .from("users")
        .filter(or(eq("name", "Alice"), eq("name", "Bob")));

    let plan = Planner::new(&Capability::SQLITE)
        .plan_select(&select)
        .unwrap();

    assert_eq!(plan.branches.len(), 1);
    assert_eq!(plan.branches[0].select().filter, select.filter);
}

#[test]
fn point_lookups() {
    let planner = Planner::new(&Capability::MEMORY).primary_key(Some("id"));

    let by_eq = stmt::select().from("users").eq("id", 7).limit(1);
    let plan = planner.plan_select(&by_eq).unwrap();
    assert!(matches!(
        &plan.branches[..],
        [Branch::GetByKey { keys, .. }] if keys == &vec![Value::I64(7)]
    ));

    // Without a limit of one the eq is evaluated as a scan
    let unlimited = stmt::select().from("users").eq("id", 7);
    let plan = planner.plan_select(&unlimited).unwrap();
    assert!(!plan.branches[0].is_get_by_key());

    let by_in = stmt::select()
        .from("users")
        .filter(in_list("id", [1, 2, 3]).unwrap());
    let plan = planner.plan_select(&by_in).unwrap();
    assert!(matches!(
        &plan.branches[..],
        [Branch::GetByKey { keys, .. }] if keys.len() == 3
    ));

    let other_field = stmt::select().from("users").eq("name", "x").limit(1);
    let plan = planner.plan_select(&other_field).unwrap();
    assert!(!plan.branches[0].is_get_by_key());
}

#[test]
fn variables_bound_before_point_lookup() {
    let mut vars = Variables::new();
    vars.insert("user_id".to_string(), 42.into());

    let select = stmt::select()
        .from("users")
        .eq("id", variable("user_id"))
        .limit(1);

    let plan = Planner::new(&Capability::MEMORY)
        .primary_key(Some("id"))
        .variables(Some(&vars))
        .plan_select(&select)
        .unwrap();

    assert!(matches!(
        &plan.branches[..],
        [Branch::GetByKey { keys, .. }] if keys == &vec![Value::I64(42)]
    ));

    let err = Planner::new(&Capability::MEMORY)
        .plan_select(&select)
        .unwrap_err();
    assert!(err.is_missing_variable());
}

#[test]
fn select_without_collection_is_rejected() {
    let err = Planner::new(&Capability::MEMORY)
        .plan_select(&stmt::select().eq("id", 1))
        .unwrap_err();
    assert!(err.is_query_syntax());
}

#[test]
fn window_sorts_then_pages() {
    let rows = vec![row(3, "c"), row(1, "a"), row(4, "d"), row(2, "b")];

    let window = Window {
        sort: vec![Field::new("id").desc()],
        offset: Some(1),
        limit: Some(2),
    };

    let ids: Vec<_> = window
        .apply(rows, |row| row)
        .into_iter()
        .map(|row| row["id"].clone())
        .collect();

    assert_eq!(ids, vec![Value::I64(3), Value::I64(2)]);
}
