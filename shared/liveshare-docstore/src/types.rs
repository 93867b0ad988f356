//! Query option types

use std::fmt;

/// Sort direction for `find`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub(crate) fn as_sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Sort on a top-level document field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

/// Options for `Collection::find`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub sort: Option<SortSpec>,
    pub limit: Option<i64>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort_desc(mut self, field: impl Into<String>) -> Self {
        self.sort = Some(SortSpec {
            field: field.into(),
            direction: SortDirection::Descending,
        });
        self
    }

    pub fn sort_asc(mut self, field: impl Into<String>) -> Self {
        self.sort = Some(SortSpec {
            field: field.into(),
            direction: SortDirection::Ascending,
        });
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}
