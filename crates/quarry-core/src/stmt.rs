mod aggregate;
pub use aggregate::Aggregate;

mod alter_collection;
pub use alter_collection::{AlterCollection, Change, ColumnSource};

mod binary;
pub use binary::{Binary, BinaryOp};

mod collection;
pub use collection::Collection;

mod column;
pub use column::{Column, ColumnType};

mod comparison;
pub use comparison::{Comparison, ComparisonOp};

mod condition;
pub use condition::Condition;

mod create_collection;
pub use create_collection::CreateCollection;

mod decompose;

mod delete;
pub use delete::Delete;

mod drop_collection;
pub use drop_collection::DropCollection;

mod eval;

mod expr;
pub use expr::Expr;

mod field;
pub use field::{Direction, Field, FieldAs, FieldDirection};

mod func;
pub use func::{Function, FunctionKind};

mod index;
pub use index::{Index, IndexType};

mod insert;
pub use insert::{Insert, InsertSource};

mod introspect;
pub use introspect::{CollectionExists, DescribeCollection, ShowCollection};

mod join;
pub use join::{Join, JoinKind};

mod query;
pub use query::Query;

mod select;
pub use select::Select;

mod simplify;

mod union;
pub use union::Union;

mod update;
pub use update::Update;

mod value;
pub use value::Value;

mod variable;
pub use variable::{Variable, Variables};

/// Returns a reference to the field `name`.
pub fn field(name: impl Into<String>) -> Field {
    Field::new(name)
}

/// Returns a reference to the variable `name`, resolved when the query is
/// compiled or executed.
pub fn variable(name: impl Into<String>) -> Expr {
    Expr::Variable(Variable::new(name))
}

pub fn eq(field: impl Into<Field>, value: impl Into<Expr>) -> Condition {
    Comparison::eq(field, value).into()
}

pub fn ne(field: impl Into<Field>, value: impl Into<Expr>) -> Condition {
    Comparison::ne(field, value).into()
}

pub fn gt(field: impl Into<Field>, value: impl Into<Expr>) -> Condition {
    Comparison::gt(field, value).into()
}

pub fn gte(field: impl Into<Field>, value: impl Into<Expr>) -> Condition {
    Comparison::ge(field, value).into()
}

pub fn lt(field: impl Into<Field>, value: impl Into<Expr>) -> Condition {
    Comparison::lt(field, value).into()
}

pub fn lte(field: impl Into<Field>, value: impl Into<Expr>) -> Condition {
    Comparison::le(field, value).into()
}

pub fn begins_with(field: impl Into<Field>, prefix: impl Into<Expr>) -> Condition {
    Comparison::begins_with(field, prefix).into()
}

/// Matches rows whose `field` equals any of `values`. Fails when `values` is
/// empty.
pub fn in_list<T: Into<Expr>>(
    field: impl Into<Field>,
    values: impl IntoIterator<Item = T>,
) -> crate::Result<Condition> {
    Ok(Comparison::in_list(field, values)?.into())
}

pub fn and(lhs: impl Into<Condition>, rhs: impl Into<Condition>) -> Condition {
    Condition::and(lhs, rhs)
}

pub fn or(lhs: impl Into<Condition>, rhs: impl Into<Condition>) -> Condition {
    Condition::or(lhs, rhs)
}

pub fn xor(lhs: impl Into<Condition>, rhs: impl Into<Condition>) -> Condition {
    Condition::xor(lhs, rhs)
}

pub fn select() -> Select {
    Select::new()
}

pub fn aggregate() -> Aggregate {
    Aggregate::new()
}

pub fn insert(collection: impl Into<Collection>) -> Insert {
    Insert::new(collection)
}

pub fn update(collection: impl Into<Collection>) -> Update {
    Update::new(collection)
}

pub fn delete(collection: impl Into<Collection>) -> Delete {
    Delete::new(collection)
}

pub fn create_collection(collection: impl Into<Collection>) -> CreateCollection {
    CreateCollection::new(collection)
}

pub fn alter_collection(collection: impl Into<Collection>) -> AlterCollection {
    AlterCollection::new(collection)
}

pub fn drop_collection(collection: impl Into<Collection>) -> DropCollection {
    DropCollection::new(collection)
}

pub fn describe_collection(collection: impl Into<Collection>) -> DescribeCollection {
    DescribeCollection::new(collection)
}

pub fn collection_exists(collection: impl Into<Collection>) -> CollectionExists {
    CollectionExists::new(collection)
}

pub fn show_collection(namespace: Option<&str>) -> ShowCollection {
    ShowCollection::new(namespace)
}
