#[derive(Debug)]
pub struct Capability {
    /// When true, the backend uses a SQL-based query language.
    pub sql: bool,

    /// Supports joining collections.
    pub join: bool,

    /// Supports `or` in predicates. When false, selects are decomposed into
    /// OR-free branches by the planner.
    pub or: bool,

    /// Schema changes the backend can make in place.
    pub schema_mutations: SchemaMutations,
}

/// Schema changes a backend supports without rebuilding the collection.
#[derive(Debug)]
pub struct SchemaMutations {
    pub add_column: bool,

    /// Changing a column's type, size, default or auto-increment flag.
    pub alter_column: bool,

    pub drop_column: bool,
    pub rename_column: bool,

    /// Adding, dropping or changing the primary index.
    pub alter_primary_key: bool,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        sql: true,
        join: true,
        or: true,
        schema_mutations: SchemaMutations::SQLITE,
    };

    /// PostgreSQL capabilities
    pub const POSTGRESQL: Self = Self {
        schema_mutations: SchemaMutations::POSTGRESQL,
        ..Self::SQLITE
    };

    /// In-memory key-value store capabilities
    pub const MEMORY: Self = Self {
        sql: false,
        join: false,
        or: false,
        schema_mutations: SchemaMutations::ALL,
    };
}

impl SchemaMutations {
    /// SQLite can add and rename columns. Everything else goes through a
    /// table rebuild.
    pub const SQLITE: Self = Self {
        add_column: true,
        alter_column: false,
        drop_column: false,
        rename_column: true,
        alter_primary_key: false,
    };

    pub const POSTGRESQL: Self = Self {
        add_column: true,
        alter_column: true,
        drop_column: true,
        rename_column: true,
        alter_primary_key: false,
    };

    pub const ALL: Self = Self {
        add_column: true,
        alter_column: true,
        drop_column: true,
        rename_column: true,
        alter_primary_key: true,
    };
}
