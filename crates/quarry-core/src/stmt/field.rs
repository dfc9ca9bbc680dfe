use super::{Expr, Function};

/// A reference to a field, optionally qualified by the collection (or join
/// alias) it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: String,
    pub collection: Option<String>,
}

/// A projected expression with an optional output alias.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAs {
    pub expr: Expr,
    pub alias: Option<String>,
}

/// A field paired with a sort direction, used by ORDER BY clauses and index
/// definitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDirection {
    pub field: Field,
    pub direction: Direction,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collection: None,
        }
    }

    pub fn qualified(collection: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collection: Some(collection.into()),
        }
    }

    pub fn alias(self, alias: impl Into<String>) -> FieldAs {
        FieldAs {
            expr: Expr::Field(self),
            alias: Some(alias.into()),
        }
    }

    pub fn asc(self) -> FieldDirection {
        FieldDirection {
            field: self,
            direction: Direction::Asc,
        }
    }

    pub fn desc(self) -> FieldDirection {
        FieldDirection {
            field: self,
            direction: Direction::Desc,
        }
    }
}

impl FieldAs {
    /// The key under which this projection appears in a result row.
    pub fn output_name(&self) -> Option<&str> {
        match (&self.alias, &self.expr) {
            (Some(alias), _) => Some(alias.as_str()),
            (None, Expr::Field(field)) => Some(field.name.as_str()),
            _ => None,
        }
    }
}

impl FieldDirection {
    pub fn new(field: impl Into<Field>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

impl Direction {
    pub fn is_desc(self) -> bool {
        matches!(self, Self::Desc)
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Field::new(value)
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Field::new(value)
    }
}

impl From<&str> for FieldAs {
    fn from(value: &str) -> Self {
        Field::new(value).into()
    }
}

impl From<Field> for FieldAs {
    fn from(value: Field) -> Self {
        FieldAs {
            expr: Expr::Field(value),
            alias: None,
        }
    }
}

impl From<Function> for FieldAs {
    fn from(value: Function) -> Self {
        FieldAs {
            expr: Expr::Func(value),
            alias: None,
        }
    }
}

impl From<&str> for FieldDirection {
    fn from(value: &str) -> Self {
        Field::new(value).asc()
    }
}

impl From<Field> for FieldDirection {
    fn from(value: Field) -> Self {
        value.asc()
    }
}
