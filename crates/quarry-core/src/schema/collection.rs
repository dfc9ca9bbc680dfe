use crate::stmt::{
    Collection, Column, ColumnType, CreateCollection, Direction, Field, FieldDirection, Index,
    IndexType,
};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollectionSchema {
    pub handle: String,
    pub fields: Vec<FieldSchema>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub indexes: Vec<IndexSchema>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldSchema {
    pub handle: String,

    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub ty: ColumnType,

    #[cfg_attr(feature = "serde", serde(default))]
    pub size: Option<u32>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub auto_increment: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexSchema {
    pub handle: String,

    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub ty: IndexType,

    pub fields: Vec<IndexFieldSchema>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexFieldSchema {
    pub field: String,

    #[cfg_attr(feature = "serde", serde(default))]
    pub direction: Direction,
}

impl CollectionSchema {
    pub fn new(handle: impl Into<String>) -> CollectionSchema {
        CollectionSchema {
            handle: handle.into(),
            fields: vec![],
            indexes: vec![],
        }
    }

    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    pub fn index(mut self, index: IndexSchema) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn field_by_handle(&self, handle: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.handle == handle)
    }

    pub fn primary_index(&self) -> Option<&IndexSchema> {
        self.indexes.iter().find(|index| index.ty.is_primary())
    }

    /// Builds the schema of a collection from its live definition.
    pub fn from_definition(
        handle: impl Into<String>,
        columns: &[Column],
        indexes: &[Index],
    ) -> CollectionSchema {
        CollectionSchema {
            handle: handle.into(),
            fields: columns.iter().map(FieldSchema::from_column).collect(),
            indexes: indexes.iter().map(IndexSchema::from_index).collect(),
        }
    }

    pub fn columns(&self) -> Vec<Column> {
        self.fields.iter().map(FieldSchema::to_column).collect()
    }

    pub fn to_indexes(&self) -> Vec<Index> {
        self.indexes.iter().map(IndexSchema::to_index).collect()
    }

    pub fn to_create(&self, collection: Collection) -> CreateCollection {
        CreateCollection {
            collection,
            columns: self.columns(),
            indexes: self.to_indexes(),
        }
    }
}

impl FieldSchema {
    pub fn new(handle: impl Into<String>, ty: ColumnType) -> FieldSchema {
        FieldSchema {
            handle: handle.into(),
            ty,
            size: None,
            auto_increment: false,
        }
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn from_column(column: &Column) -> FieldSchema {
        FieldSchema {
            handle: column.name.clone(),
            ty: column.ty,
            size: column.size,
            auto_increment: column.auto_increment,
        }
    }

    pub fn to_column(&self) -> Column {
        Column {
            name: self.handle.clone(),
            ty: self.ty,
            size: self.size,
            default: None,
            auto_increment: self.auto_increment,
        }
    }
}

impl IndexSchema {
    pub fn new<T: Into<String>>(
        handle: impl Into<String>,
        ty: IndexType,
        fields: impl IntoIterator<Item = T>,
    ) -> IndexSchema {
        IndexSchema {
            handle: handle.into(),
            ty,
            fields: fields
                .into_iter()
                .map(|field| IndexFieldSchema {
                    field: field.into(),
                    direction: Direction::Asc,
                })
                .collect(),
        }
    }

    pub fn from_index(index: &Index) -> IndexSchema {
        IndexSchema {
            handle: index.name.clone(),
            ty: index.ty,
            fields: index
                .columns
                .iter()
                .map(|column| IndexFieldSchema {
                    field: column.field.name.clone(),
                    direction: column.direction,
                })
                .collect(),
        }
    }

    pub fn to_index(&self) -> Index {
        Index {
            name: self.handle.clone(),
            ty: self.ty,
            columns: self
                .fields
                .iter()
                .map(|field| FieldDirection::new(Field::new(&field.field), field.direction))
                .collect(),
        }
    }
}
