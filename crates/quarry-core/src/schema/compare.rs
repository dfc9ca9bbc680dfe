use crate::stmt::ColumnType;

/// Whether a column of one type can hold the data of another without a
/// schema change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compatibility {
    /// The backend stores both the same way.
    Castable,

    /// The column must be altered.
    Different,
}

impl Compatibility {
    /// Backend-independent comparison: types and sizes must match exactly.
    pub fn strict(
        from: ColumnType,
        from_size: Option<u32>,
        to: ColumnType,
        to_size: Option<u32>,
    ) -> Compatibility {
        if from == to && from_size == to_size {
            Compatibility::Castable
        } else {
            Compatibility::Different
        }
    }

    pub fn is_different(self) -> bool {
        matches!(self, Self::Different)
    }
}
