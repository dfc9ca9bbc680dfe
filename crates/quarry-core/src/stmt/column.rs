use super::Value;

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColumnType {
    Boolean,
    Bit,
    UInt,
    Int,
    Float,
    Text,
    Blob,
    Date,
    DateTime,
}

/// A column definition used by `create` and `alter` statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,

    /// Maximum length, where the type has one.
    pub size: Option<u32>,

    pub default: Option<Value>,

    /// The backend assigns increasing values on insert. Only valid on the
    /// sole column of the primary index.
    pub auto_increment: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
            size: None,
            default: None,
            auto_increment: false,
        }
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// True when `other` differs from this column by name only.
    pub fn is_rename_of(&self, other: &Column) -> bool {
        self.ty == other.ty
            && self.size == other.size
            && self.default == other.default
            && self.auto_increment == other.auto_increment
    }
}
